//! Rendering and content backends.
//!
//! Backends are the engine's window onto widget content it does not own: they
//! report intrinsic sizes and chrome insets, and they are told which widgets to
//! re-emit after each pass. The registry is built by the host and handed to
//! [`Core::new`]; there is no process-wide registration.

use geom::{Axis, Insets};

use crate::{Core, NodeId};

/// Bounds passed to an intrinsic size query.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SizeBounds {
    /// Declared lower bound.
    pub min: Option<f32>,
    /// Declared upper bound.
    pub max: Option<f32>,
    /// Resolved size on the other planar axis, when that axis is not itself
    /// intrinsic. Text uses this as its wrap width.
    pub cross: Option<f32>,
}

/// A content or rendering backend.
pub trait Backend {
    /// Backend name, for diagnostics.
    fn name(&self) -> &str;

    /// A candidate intrinsic size for `node` on `axis`, or `None` if this
    /// backend has no content for the widget.
    fn intrinsic_size(
        &self,
        _core: &Core,
        _node: NodeId,
        _axis: Axis,
        _bounds: SizeBounds,
    ) -> Option<f32> {
        None
    }

    /// Chrome this backend draws around `node`'s client area on `axis`.
    ///
    /// Queried during a pass for every widget with pending geometry or
    /// changed content. Call [`Core::mark_content_changed`] when chrome
    /// changes on its own.
    fn client_insets(&self, _core: &Core, _node: NodeId, _axis: Axis) -> Insets {
        Insets::ZERO
    }

    /// `node`'s resolved geometry changed in the pass that just finished.
    /// Widgets marked dirty from here are queued for the next pass.
    fn geometry_changed(&mut self, _core: &mut Core, _node: NodeId) {}

    /// `node`'s content changed independently of geometry.
    fn content_changed(&mut self, _core: &mut Core, _node: NodeId) {}
}

/// The set of registered backends.
#[derive(Default)]
pub struct BackendRegistry {
    /// Backends in registration order.
    backends: Vec<Box<dyn Backend>>,
}

impl BackendRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a backend, builder style.
    pub fn with(mut self, backend: impl Backend + 'static) -> Self {
        self.register(backend);
        self
    }

    /// Add a backend.
    pub fn register(&mut self, backend: impl Backend + 'static) {
        self.backends.push(Box::new(backend));
    }

    /// Number of backends.
    pub fn len(&self) -> usize {
        self.backends.len()
    }

    /// True if no backends are registered.
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    /// Names of the registered backends.
    pub fn names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// The largest candidate size across all backends.
    pub fn intrinsic_size(
        &self,
        core: &Core,
        node: NodeId,
        axis: Axis,
        bounds: SizeBounds,
    ) -> Option<f32> {
        self.backends
            .iter()
            .filter_map(|b| b.intrinsic_size(core, node, axis, bounds))
            .reduce(f32::max)
    }

    /// Insets summed across all backends.
    pub fn client_insets(&self, core: &Core, node: NodeId, axis: Axis) -> Insets {
        self.backends
            .iter()
            .map(|b| b.client_insets(core, node, axis))
            .sum()
    }

    /// Deliver change notifications.
    pub(crate) fn notify(&mut self, core: &mut Core, geometry: &[NodeId], content: &[NodeId]) {
        for backend in &mut self.backends {
            for node in geometry {
                if core.contains(*node) {
                    backend.geometry_changed(core, *node);
                }
            }
            for node in content {
                if core.contains(*node) {
                    backend.content_changed(core, *node);
                }
            }
        }
    }
}

/// Finds the widget a declaration refers to by name.
pub trait Lookup {
    /// The widget named `name` as seen from `from`, if any.
    fn find(&self, core: &Core, from: NodeId, name: &str) -> Option<NodeId>;
}

/// The default lookup: the nearest widget with the name, searching siblings
/// first, then each ancestor's children and the ancestor itself, and finally
/// the whole tree in pre-order.
#[derive(Debug, Default, Clone, Copy)]
pub struct SiblingLookup;

impl Lookup for SiblingLookup {
    fn find(&self, core: &Core, from: NodeId, name: &str) -> Option<NodeId> {
        let named = |id: &NodeId| {
            *id != from
                && core
                    .node(*id)
                    .and_then(|n| n.name())
                    .is_some_and(|n| n == name)
        };
        let mut scope = core.node(from)?.parent();
        while let Some(parent) = scope {
            let p = core.node(parent)?;
            if let Some(found) = p.children().iter().find(|c| named(c)) {
                return Some(*found);
            }
            if named(&parent) {
                return Some(parent);
            }
            scope = p.parent();
        }
        core.descendants(core.root_id()).into_iter().find(named)
    }
}
