//! Geometry primitives used across trellis.
//!
//! Everything here is a small `Copy` value type keyed by the closed [`Axis`]
//! enumeration. The engine stores three position axes and two dimension axes
//! per widget, so accessors take an `Axis` instead of exposing raw fields.

/// Axis enumeration.
mod axis;
/// Anchor corners.
mod corner;
/// Error types for geometry operations.
mod error;
/// Two-axis sizes.
mod extent;
/// Near/far edge insets.
mod insets;
/// Three-axis positions.
mod point;
/// Screen-space rectangles.
mod rect;

pub use axis::Axis;
pub use corner::Corner;
pub use error::{Error, Result};
pub use extent::Extent;
pub use insets::Insets;
pub use point::Point3;
pub use rect::Rect;
