//! Declarations: how a widget's position or dimension on one axis is computed.

use geom::Corner;
use serde::{Deserialize, Serialize};

use crate::NodeName;

/// How a widget's position on one axis is computed.
///
/// Unless noted otherwise, positions are measured from the parent's client
/// origin: the parent's resolved position, plus its near client inset, minus
/// its scroll offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Position {
    /// A constant offset from the anchored edge of the parent's client area.
    Fixed {
        /// Distance from the anchored edge.
        offset: f32,
        /// Which parent edge to measure from.
        anchor: Corner,
    },
    /// A fraction of the parent's client size, measured from the anchored edge.
    Proportional {
        /// Fraction of the parent's client size.
        fraction: f32,
        /// Which parent edge to measure from.
        anchor: Corner,
        /// Place the widget's center, rather than its edge, at the point.
        center: bool,
    },
    /// Centered in the parent's client area.
    Centered,
    /// Placed against a named widget anywhere in the tree, independent of the
    /// parent. If the target is hidden the offset is treated as zero.
    Relative {
        /// Name of the reference widget.
        target: NodeName,
        /// Gap between the two anchored edges.
        offset: f32,
        /// Edge of the target to measure from.
        target_anchor: Corner,
        /// Edge of this widget placed against the target.
        self_anchor: Corner,
    },
    /// A screen-space coordinate in layout units, independent of the parent.
    Absolute {
        /// Coordinate from the anchored screen edge.
        coord: f32,
        /// Which screen edge to measure from.
        anchor: Corner,
    },
    /// A raw screen-pixel coordinate, scaled by
    /// [`Config::units_per_pixel`](crate::Config::units_per_pixel).
    Pixel {
        /// Pixel coordinate from the anchored screen edge.
        coord: f32,
        /// Which screen edge to measure from.
        anchor: Corner,
    },
}

impl Default for Position {
    fn default() -> Self {
        Self::fixed(0.0)
    }
}

impl Position {
    /// Offset from the parent's near edge.
    pub fn fixed(offset: f32) -> Self {
        Self::Fixed {
            offset,
            anchor: Corner::TopLeft,
        }
    }

    /// Offset from an arbitrary parent corner.
    pub fn fixed_at(offset: f32, anchor: Corner) -> Self {
        Self::Fixed { offset, anchor }
    }

    /// Fraction of the parent's client size from its near edge.
    pub fn proportional(fraction: f32) -> Self {
        Self::Proportional {
            fraction,
            anchor: Corner::TopLeft,
            center: false,
        }
    }

    /// Relative to a named widget.
    pub fn relative(
        target: NodeName,
        offset: f32,
        target_anchor: Corner,
        self_anchor: Corner,
    ) -> Self {
        Self::Relative {
            target,
            offset,
            target_anchor,
            self_anchor,
        }
    }

    /// Screen-space coordinate from the near edge.
    pub fn absolute(coord: f32) -> Self {
        Self::Absolute {
            coord,
            anchor: Corner::TopLeft,
        }
    }

    /// True for declarations that ignore the parent entirely. Such widgets
    /// float above their parent and do not contribute to wrap-content sizing.
    pub fn is_screen_space(&self) -> bool {
        matches!(self, Self::Absolute { .. } | Self::Pixel { .. })
    }

    /// The named widget this declaration refers to, if any.
    pub fn target(&self) -> Option<&NodeName> {
        match self {
            Self::Relative { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// How a widget's size on one planar axis is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Dimension {
    /// A constant size.
    Fixed(f32),
    /// The parent's client size plus a delta, which may be negative.
    RelativeToParent(f32),
    /// A fraction of the parent's client size.
    Proportional(f32),
    /// Extend from this widget's position to the parent's far client edge,
    /// leaving a gap.
    ExpandToParent(f32),
    /// Extend from this widget's position to the near edge of a named widget,
    /// leaving a gap.
    ExpandToTarget {
        /// Name of the widget to expand towards.
        target: NodeName,
        /// Space left before the target.
        gap: f32,
    },
    /// The largest size any registered backend reports for the content.
    Intrinsic {
        /// Lower bound.
        min: Option<f32>,
        /// Upper bound.
        max: Option<f32>,
    },
    /// The extent spanned by the children, plus client insets.
    WrapContent {
        /// Lower bound.
        min: Option<f32>,
        /// Upper bound.
        max: Option<f32>,
    },
    /// Wrap the children, but grow to the parent's far client edge when that
    /// is larger.
    WrapContentOrFill,
}

impl Default for Dimension {
    fn default() -> Self {
        Self::wrap()
    }
}

impl Dimension {
    /// Unbounded intrinsic size.
    pub fn intrinsic() -> Self {
        Self::Intrinsic {
            min: None,
            max: None,
        }
    }

    /// Unbounded wrap-content size.
    pub fn wrap() -> Self {
        Self::WrapContent {
            min: None,
            max: None,
        }
    }

    /// True for intrinsic declarations.
    pub fn is_intrinsic(&self) -> bool {
        matches!(self, Self::Intrinsic { .. })
    }

    /// True for wrap-content declarations of either flavour.
    pub fn is_wrap(&self) -> bool {
        matches!(self, Self::WrapContent { .. } | Self::WrapContentOrFill)
    }

    /// True if the size is derived from the parent. A wrap-content parent must
    /// not require such a child's dimension, or the two would require each
    /// other.
    pub fn depends_on_parent(&self) -> bool {
        matches!(
            self,
            Self::RelativeToParent(_)
                | Self::Proportional(_)
                | Self::ExpandToParent(_)
                | Self::ExpandToTarget { .. }
                | Self::WrapContentOrFill
        )
    }

    /// The named widget this declaration refers to, if any.
    pub fn target(&self) -> Option<&NodeName> {
        match self {
            Self::ExpandToTarget { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// Clamp a size to optional bounds. When the bounds conflict the maximum wins.
pub(crate) fn clamp_size(value: f32, min: Option<f32>, max: Option<f32>) -> f32 {
    let mut v = value;
    if let Some(min) = min {
        v = v.max(min);
    }
    if let Some(max) = max {
        v = v.min(max);
    }
    v.max(0.0)
}
