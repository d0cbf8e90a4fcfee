use bitflags::bitflags;
use geom::Axis;

use crate::layout::Kind;

bitflags! {
    /// Recalculation work queued on a widget for the next update pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Pending: u16 {
        /// Partial position on X.
        const PARTIAL_X = 1 << 0;
        /// Partial position on Y.
        const PARTIAL_Y = 1 << 1;
        /// Position on X.
        const POSITION_X = 1 << 2;
        /// Position on Y.
        const POSITION_Y = 1 << 3;
        /// Position on Z.
        const POSITION_Z = 1 << 4;
        /// Width.
        const DIMENSIONS_X = 1 << 5;
        /// Height.
        const DIMENSIONS_Y = 1 << 6;
        /// Re-evaluate bindable properties of this widget and its visible
        /// descendants.
        const BINDINGS = 1 << 7;
        /// Like `BINDINGS`, but ignore dirty keys and descend into hidden
        /// widgets.
        const FORCE_BINDINGS = 1 << 8;
        /// Visual content changed independent of geometry.
        const CONTENT = 1 << 9;

        /// Both partial position axes.
        const PARTIAL = Self::PARTIAL_X.bits() | Self::PARTIAL_Y.bits();
        /// All position axes.
        const POSITION = Self::POSITION_X.bits() | Self::POSITION_Y.bits() | Self::POSITION_Z.bits();
        /// Both dimension axes.
        const DIMENSIONS = Self::DIMENSIONS_X.bits() | Self::DIMENSIONS_Y.bits();
        /// Every geometry quantity.
        const GEOMETRY = Self::PARTIAL.bits() | Self::POSITION.bits() | Self::DIMENSIONS.bits();
    }
}

impl Pending {
    /// The flag for one quantity on one axis. Combinations that do not exist,
    /// such as a depth dimension, produce an empty set.
    pub fn of(kind: Kind, axis: Axis) -> Self {
        match (kind, axis) {
            (Kind::PartialPosition, Axis::X) => Self::PARTIAL_X,
            (Kind::PartialPosition, Axis::Y) => Self::PARTIAL_Y,
            (Kind::Position, Axis::X) => Self::POSITION_X,
            (Kind::Position, Axis::Y) => Self::POSITION_Y,
            (Kind::Position, Axis::Z) => Self::POSITION_Z,
            (Kind::Dimensions, Axis::X) => Self::DIMENSIONS_X,
            (Kind::Dimensions, Axis::Y) => Self::DIMENSIONS_Y,
            (Kind::PartialPosition | Kind::Dimensions, Axis::Z) => Self::empty(),
        }
    }

    /// Position on `axis`, plus partial position where the axis has one.
    pub fn position(axis: Axis) -> Self {
        Self::of(Kind::Position, axis) | Self::of(Kind::PartialPosition, axis)
    }

    /// Dimension on `axis`.
    pub fn dimension(axis: Axis) -> Self {
        Self::of(Kind::Dimensions, axis)
    }

    /// True if any geometry quantity is queued.
    pub fn has_geometry(self) -> bool {
        self.intersects(Self::GEOMETRY)
    }

    /// The geometry quantities in this set.
    pub fn quantities(self) -> impl Iterator<Item = (Kind, Axis)> {
        Kind::ALL
            .into_iter()
            .flat_map(|kind| Axis::ALL.into_iter().map(move |axis| (kind, axis)))
            .filter(move |(kind, axis)| {
                let flag = Self::of(*kind, *axis);
                !flag.is_empty() && self.contains(flag)
            })
    }
}
