use std::cell::{Ref, RefCell};

use geom::{Axis, Extent, Insets, Point3, Rect};
use indexmap::IndexMap;

use crate::{
    binding::{Bindable, Bindings, Value},
    core::{id::NodeId, name::NodeName, pending::Pending},
    layout::{Dependents, Dimension, Position},
};

/// A bindable widget property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// The value cell.
    pub(crate) value: Bindable<Value>,
    /// A change re-resolves the widget's dimensions, e.g. label text.
    pub(crate) affects_layout: bool,
}

impl Property {
    /// A property that does not influence layout.
    pub fn new(value: Bindable<Value>) -> Self {
        Self {
            value,
            affects_layout: false,
        }
    }

    /// A property whose changes invalidate the widget's intrinsic size.
    pub fn layout(value: Bindable<Value>) -> Self {
        Self {
            value,
            affects_layout: true,
        }
    }

    /// The current value.
    pub fn get(&self) -> &Value {
        self.value.get()
    }

    /// An unpopulated copy for a new template instance.
    pub(crate) fn independent_copy(&self) -> Self {
        Self {
            value: self.value.independent_copy(),
            affects_layout: self.affects_layout,
        }
    }
}

/// Widget data stored in the arena.
pub struct Node {
    /// Identifier used by relative declarations.
    pub(crate) name: Option<NodeName>,
    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Children, ordered by `order` after the next pass.
    pub(crate) children: Vec<NodeId>,
    /// Sort key among siblings.
    pub(crate) order: i32,
    /// Children need re-sorting.
    pub(crate) unsorted: bool,

    /// Position declarations, indexed by axis.
    pub(crate) position: [Position; 3],
    /// Dimension declarations for X and Y.
    pub(crate) dimension: [Dimension; 2],

    /// Resolved position.
    pub(crate) resolved_position: Point3,
    /// Resolved dimension.
    pub(crate) resolved_dimension: Extent,
    /// Resolved partial position for X and Y.
    pub(crate) partial: [f32; 2],
    /// Client insets for X and Y, summed over backends.
    pub(crate) client: [Insets; 2],
    /// Scroll offset applied to children, X and Y.
    pub(crate) scroll: [f32; 2],
    /// Screen rectangle after the last pass.
    pub(crate) bounds: Rect,
    /// Screen rectangle clipped by every ancestor.
    pub(crate) clip: Rect,

    /// Visibility.
    pub(crate) visible: RefCell<Bindable<bool>>,
    /// Local bindings and redirects.
    pub(crate) bindings: Bindings,
    /// Named bindable properties.
    pub(crate) props: RefCell<IndexMap<String, Property>>,

    /// Work queued for the next pass.
    pub(crate) pending: Pending,
    /// Triples on other widgets that depend on this widget's quantities.
    pub(crate) dependents: Dependents,
}

impl Node {
    /// A fresh, unattached widget.
    pub(crate) fn new() -> Self {
        Self {
            name: None,
            parent: None,
            children: Vec::new(),
            order: 0,
            unsorted: false,
            position: [Position::default(), Position::default(), Position::default()],
            dimension: [Dimension::default(), Dimension::default()],
            resolved_position: Point3::ZERO,
            resolved_dimension: Extent::ZERO,
            partial: [0.0; 2],
            client: [Insets::ZERO; 2],
            scroll: [0.0; 2],
            bounds: Rect::default(),
            clip: Rect::default(),
            visible: RefCell::new(Bindable::constant(true)),
            bindings: Bindings::new(),
            props: RefCell::new(IndexMap::new()),
            pending: Pending::empty(),
            dependents: Dependents::default(),
        }
    }

    /// The widget's name.
    pub fn name(&self) -> Option<&NodeName> {
        self.name.as_ref()
    }

    /// The widget's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The widget's children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Sort key among siblings.
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Position declaration on `axis`.
    pub fn position_decl(&self, axis: Axis) -> &Position {
        &self.position[axis.index()]
    }

    /// Dimension declaration on a planar axis.
    ///
    /// # Panics
    ///
    /// Panics on `Axis::Z`.
    pub fn dimension_decl(&self, axis: Axis) -> &Dimension {
        &self.dimension[planar(axis)]
    }

    /// Resolved position.
    pub fn position(&self) -> Point3 {
        self.resolved_position
    }

    /// Resolved dimension.
    pub fn dimension(&self) -> Extent {
        self.resolved_dimension
    }

    /// Resolved partial position. The depth axis has none and reports zero.
    pub fn partial_position(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Z => 0.0,
            _ => self.partial[axis.index()],
        }
    }

    /// Client insets on a planar axis.
    ///
    /// # Panics
    ///
    /// Panics on `Axis::Z`.
    pub fn client_insets(&self, axis: Axis) -> Insets {
        self.client[planar(axis)]
    }

    /// Scroll offset on `axis`. Depth does not scroll.
    pub fn scroll(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Z => 0.0,
            _ => self.scroll[axis.index()],
        }
    }

    /// Screen rectangle.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Screen rectangle clipped by ancestors.
    pub fn clip(&self) -> Rect {
        self.clip
    }

    /// True if the widget is visible.
    pub fn is_visible(&self) -> bool {
        *self.visible.borrow().get()
    }

    /// Local bindings.
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Current value of a property.
    pub fn property(&self, key: &str) -> Option<Value> {
        self.props.borrow().get(key).map(|p| p.get().clone())
    }

    /// All properties.
    pub fn properties(&self) -> Ref<'_, IndexMap<String, Property>> {
        self.props.borrow()
    }

    /// Work queued for the next pass.
    pub fn pending(&self) -> Pending {
        self.pending
    }

    /// Number of recorded dependent edges.
    pub fn dependent_count(&self) -> usize {
        self.dependents.len()
    }
}

/// Storage index for a planar axis.
///
/// # Panics
///
/// Panics on `Axis::Z`, which has no dimension.
pub(crate) fn planar(axis: Axis) -> usize {
    assert!(axis.is_planar(), "axis {axis} has no dimension");
    axis.index()
}
