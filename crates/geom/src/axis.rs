use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A layout axis. `Z` carries a position but never a dimension.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
    /// Depth.
    Z,
}

impl Axis {
    /// All three axes, in index order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];
    /// The two axes that carry a dimension.
    pub const PLANAR: [Self; 2] = [Self::X, Self::Y];

    /// Storage index of this axis.
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Look an axis up by storage index.
    pub fn from_index(index: usize) -> Result<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| Error::UnknownAxis(index.to_string()))
    }

    /// True for axes that have a dimension.
    pub fn is_planar(self) -> bool {
        self != Self::Z
    }

    /// The other planar axis. `Z` has no counterpart.
    pub fn other(self) -> Option<Self> {
        match self {
            Self::X => Some(Self::Y),
            Self::Y => Some(Self::X),
            Self::Z => None,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        };
        f.write_str(s)
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            _ => Err(Error::UnknownAxis(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_roundtrip() -> Result<()> {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_index(axis.index())?, axis);
        }
        assert!(Axis::from_index(3).is_err());
        Ok(())
    }

    #[test]
    fn other_axis() {
        assert_eq!(Axis::X.other(), Some(Axis::Y));
        assert_eq!(Axis::Y.other(), Some(Axis::X));
        assert_eq!(Axis::Z.other(), None);
        assert!(!Axis::Z.is_planar());
    }

    #[test]
    fn parse() {
        assert_eq!("X".parse::<Axis>(), Ok(Axis::X));
        assert!("w".parse::<Axis>().is_err());
    }
}
