use serde::{Deserialize, Serialize};

/// Engine configuration, fixed at construction.
///
/// All fields have defaults, so a host may deserialize a partial document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum nesting of recursive resolve calls within one pass. A
    /// declaration graph deeper than this is treated as runaway; the triple that
    /// trips the guard keeps its previous value.
    pub max_resolve_depth: usize,
    /// Maximum length of a chain of binding pointers and redirects.
    pub max_pointer_depth: usize,
    /// Layout units per screen pixel, applied to `Pixel` position declarations.
    pub units_per_pixel: f32,
    /// Resolved values that move by no more than this are not reported as
    /// changed.
    pub epsilon: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_resolve_depth: 512,
            max_pointer_depth: 32,
            units_per_pixel: 1.0,
            epsilon: 0.0,
        }
    }
}

impl Config {
    /// Construct the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the recursion-depth guard.
    pub fn with_max_resolve_depth(mut self, depth: usize) -> Self {
        self.max_resolve_depth = depth;
        self
    }

    /// Set the pointer-chain limit.
    pub fn with_max_pointer_depth(mut self, depth: usize) -> Self {
        self.max_pointer_depth = depth;
        self
    }

    /// Set the pixel scale.
    pub fn with_units_per_pixel(mut self, scale: f32) -> Self {
        self.units_per_pixel = scale;
        self
    }

    /// Set the change threshold.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }
}
