use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Axis, Error, Result};

/// The corner of a rectangle that a declaration anchors against.
///
/// On each planar axis a corner selects either the near edge (left/top) or the
/// far edge (right/bottom). The depth axis is always anchored at its near edge.
#[derive(
    Debug, Clone, Copy, Default, Hash, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum Corner {
    /// Near on both axes.
    #[default]
    TopLeft,
    /// Far on X, near on Y.
    TopRight,
    /// Near on X, far on Y.
    BottomLeft,
    /// Far on both axes.
    BottomRight,
}

impl Corner {
    /// True if this corner selects the far edge on `axis`.
    pub fn is_far(self, axis: Axis) -> bool {
        match axis {
            Axis::X => matches!(self, Self::TopRight | Self::BottomRight),
            Axis::Y => matches!(self, Self::BottomLeft | Self::BottomRight),
            Axis::Z => false,
        }
    }
}

impl FromStr for Corner {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace(['_', '-', ' '], "").as_str() {
            "topleft" => Ok(Self::TopLeft),
            "topright" => Ok(Self::TopRight),
            "bottomleft" => Ok(Self::BottomLeft),
            "bottomright" => Ok(Self::BottomRight),
            _ => Err(Error::UnknownCorner(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn far_edges() {
        assert!(!Corner::TopLeft.is_far(Axis::X));
        assert!(!Corner::TopLeft.is_far(Axis::Y));
        assert!(Corner::TopRight.is_far(Axis::X));
        assert!(!Corner::TopRight.is_far(Axis::Y));
        assert!(Corner::BottomLeft.is_far(Axis::Y));
        assert!(Corner::BottomRight.is_far(Axis::X));
        assert!(!Corner::BottomRight.is_far(Axis::Z));
    }

    #[test]
    fn parse_loose() {
        assert_eq!("bottom_right".parse::<Corner>(), Ok(Corner::BottomRight));
        assert_eq!("TopLeft".parse::<Corner>(), Ok(Corner::TopLeft));
        assert!("middle".parse::<Corner>().is_err());
    }
}
