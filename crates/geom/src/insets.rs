use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Insets on one axis: space reserved at the near and far edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    /// Left or top inset.
    pub near: f32,
    /// Right or bottom inset.
    pub far: f32,
}

impl Insets {
    /// No inset on either edge.
    pub const ZERO: Self = Self { near: 0.0, far: 0.0 };

    /// Construct from near and far insets.
    pub fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }

    /// The same inset on both edges.
    pub fn uniform(v: f32) -> Self {
        Self { near: v, far: v }
    }

    /// Combined inset of both edges.
    pub fn total(&self) -> f32 {
        self.near + self.far
    }
}

impl Add for Insets {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            near: self.near + other.near,
            far: self.far + other.far,
        }
    }
}

impl AddAssign for Insets {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl std::iter::Sum for Insets {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}
