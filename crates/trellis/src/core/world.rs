use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use geom::{Axis, Extent, Insets, Point3, Rect};
use indexmap::IndexSet;
use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::{
    binding::{BindPath, Binding, Bindable, DirtyKeys, Sources, Value},
    core::{
        backend::{BackendRegistry, Lookup, SiblingLookup},
        config::Config,
        error::{Error, Result},
        id::NodeId,
        name::NodeName,
        node::{Node, Property, planar},
        pending::Pending,
    },
    layout::{Dimension, Position},
};

/// The widget arena, its declarations and resolved geometry, and the
/// bookkeeping that drives incremental update passes.
pub struct Core {
    /// Widget arena.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// The desktop widget, sized by the viewport.
    pub(crate) root: NodeId,

    /// Engine configuration.
    pub(crate) config: Config,
    /// Registered content and rendering backends.
    pub(crate) backends: BackendRegistry,
    /// Identifier resolution for relative declarations.
    pub(crate) lookup: Box<dyn Lookup>,

    /// Named external state.
    pub(crate) sources: Sources,
    /// Binding paths changed since the last pass.
    pub(crate) dirty_keys: DirtyKeys,

    /// Widgets with pending flags.
    pub(crate) dirty: IndexSet<NodeId>,
    /// Marks made while a pass is running, merged when it finishes.
    pub(crate) deferred: Vec<(NodeId, Pending)>,
    /// Set while a pass is running.
    pub(crate) updating: Arc<AtomicBool>,
    /// Viewport size to apply at the start of the next pass.
    pub(crate) viewport: Option<Extent>,
    /// Widgets whose declarations name a target that could not be found.
    pub(crate) unresolved: IndexSet<NodeId>,
    /// A widget was attached, detached or renamed since the last pass.
    pub(crate) structure_changed: bool,
    /// Names that appeared in or left the tree since the last pass. Widgets
    /// declaring one of these as a target look it up again.
    pub(crate) touched_names: IndexSet<NodeName>,
    /// Number of completed passes.
    pub(crate) pass: u64,
}

impl Default for Core {
    fn default() -> Self {
        Self::new(Config::default(), BackendRegistry::default())
    }
}

impl Core {
    /// Create a core with a root widget. The root is sized by the viewport
    /// and is zero-sized until [`Core::set_viewport`] is called.
    pub fn new(config: Config, backends: BackendRegistry) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root = Node::new();
        root.name = Some(NodeName::convert("root"));
        root.dimension = [Dimension::Fixed(0.0), Dimension::Fixed(0.0)];
        root.pending = Pending::GEOMETRY | Pending::BINDINGS;
        let root = nodes.insert(root);
        let mut dirty = IndexSet::new();
        dirty.insert(root);
        Self {
            nodes,
            root,
            config,
            backends,
            lookup: Box::new(SiblingLookup),
            sources: Sources::new(),
            dirty_keys: DirtyKeys::everything(),
            dirty,
            deferred: Vec::new(),
            updating: Arc::new(AtomicBool::new(false)),
            viewport: None,
            unresolved: IndexSet::new(),
            structure_changed: false,
            touched_names: IndexSet::new(),
            pass: 0,
        }
    }

    /// Replace the identifier lookup, builder style.
    pub fn with_lookup(mut self, lookup: impl Lookup + 'static) -> Self {
        self.lookup = Box::new(lookup);
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The registered backends.
    pub fn backends(&self) -> &BackendRegistry {
        &self.backends
    }

    /// The registered backends, for registering more after construction.
    pub fn backends_mut(&mut self) -> &mut BackendRegistry {
        &mut self.backends
    }

    /// The root widget.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Number of completed passes.
    pub fn pass(&self) -> u64 {
        self.pass
    }

    /// Number of widgets in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the arena holds no widgets. The root is never removed, so this
    /// is always false.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a widget.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// True if the handle refers to a live widget.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// A widget's parent.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// A widget's children, in sibling order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(id)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// `id` and all its descendants in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.nodes.get(node_id) else {
                continue;
            };
            out.push(node_id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Ancestors of `id`, nearest first, not including `id`.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    /// True if `ancestor` is a strict ancestor of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Find the widget `name` refers to as seen from `from`. A handle the
    /// lookup returns for a widget no longer in the arena counts as not found.
    pub fn find(&self, from: NodeId, name: &NodeName) -> Option<NodeId> {
        let found = self.lookup.find(self, from, name.as_str())?;
        if self.nodes.contains_key(found) {
            Some(found)
        } else {
            warn!(from = ?from, name = %name, found = ?found, "lookup returned a removed widget");
            None
        }
    }

    /// Look up a widget by name from the root.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|id| self.nodes[*id].name.as_ref().is_some_and(|n| n == name))
    }

    /// Create a widget with no parent.
    pub fn create_detached(&mut self) -> NodeId {
        let id = self.nodes.insert(Node::new());
        self.mark_dirty(id, Pending::GEOMETRY | Pending::BINDINGS);
        id
    }

    /// Create a widget under `parent`.
    pub fn add_child(&mut self, parent: NodeId) -> Result<NodeId> {
        let child = self.create_detached();
        if let Err(e) = self.attach(parent, child) {
            self.nodes.remove(child);
            self.dirty.shift_remove(&child);
            return Err(e);
        }
        Ok(child)
    }

    /// Create a named widget under `parent`.
    pub fn add_named_child(&mut self, parent: NodeId, name: &str) -> Result<NodeId> {
        let child = self.add_child(parent)?;
        self.set_name(child, name)?;
        Ok(child)
    }

    /// Attach a detached widget under `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::NodeNotFound(parent));
        }
        let Some(c) = self.nodes.get(child) else {
            return Err(Error::NodeNotFound(child));
        };
        if c.parent.is_some() || child == self.root {
            return Err(Error::AlreadyAttached(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        let p = &mut self.nodes[parent];
        p.children.push(child);
        p.unsorted = true;
        self.nodes[child].parent = Some(parent);
        self.touch_subtree_names(child);
        self.mark_dirty(parent, Pending::DIMENSIONS);
        self.mark_dirty(
            child,
            Pending::GEOMETRY | Pending::BINDINGS | Pending::FORCE_BINDINGS,
        );
        Ok(())
    }

    /// Detach a widget from its parent. The widget and its subtree stay in
    /// the arena.
    pub fn detach(&mut self, child: NodeId) -> Result<()> {
        let Some(parent) = self.nodes.get(child).map(|n| n.parent) else {
            return Err(Error::NodeNotFound(child));
        };
        let Some(parent) = parent else {
            return Ok(());
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|id| *id != child);
        }
        self.nodes[child].parent = None;
        self.touch_subtree_names(child);
        self.mark_dirty(parent, Pending::DIMENSIONS);
        self.mark_dirty(child, Pending::GEOMETRY);
        Ok(())
    }

    /// Remove a widget and its subtree. Every surviving widget that recorded
    /// a dependency on a removed widget is flagged for re-resolution.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::InvalidOperation("cannot remove root".into()));
        }
        if !self.nodes.contains_key(id) {
            return Err(Error::NodeNotFound(id));
        }
        self.detach(id)?;
        let removed = self.descendants(id);
        let mut orphaned = Vec::new();
        for node_id in removed.iter().rev() {
            if let Some(node) = self.nodes.remove(*node_id) {
                orphaned.extend(node.dependents.all().copied());
            }
            self.dirty.shift_remove(node_id);
            self.unresolved.shift_remove(node_id);
        }
        for t in orphaned {
            if self.nodes.contains_key(t.node) {
                self.mark_dirty(t.node, Pending::of(t.kind, t.axis));
            }
        }
        debug!(root = ?id, count = removed.len(), "removed subtree");
        Ok(())
    }

    /// Set the name relative declarations use to refer to this widget. The
    /// name is normalized to snake case. Widgets that target the old or the
    /// new name look their target up again on the next pass.
    pub fn set_name(&mut self, id: NodeId, name: &str) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        let name = NodeName::convert(name);
        if node.name.as_ref() == Some(&name) {
            return Ok(());
        }
        let previous = node.name.replace(name.clone());
        self.touched_names.extend(previous);
        self.touched_names.insert(name);
        self.structure_changed = true;
        Ok(())
    }

    /// Record every name in the subtree at `id` as touched.
    pub(crate) fn touch_subtree_names(&mut self, id: NodeId) {
        for node_id in self.descendants(id) {
            if let Some(name) = self.nodes[node_id].name.clone() {
                self.touched_names.insert(name);
            }
        }
        self.structure_changed = true;
    }

    /// Set the sort key among siblings. Children are re-sorted at the start
    /// of the next pass.
    pub fn set_order(&mut self, id: NodeId, order: i32) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        if node.order == order {
            return Ok(());
        }
        node.order = order;
        if let Some(p) = node.parent {
            self.nodes[p].unsorted = true;
        }
        Ok(())
    }

    /// Set a position declaration.
    pub fn set_position(&mut self, id: NodeId, axis: Axis, decl: Position) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        let slot = &mut node.position[axis.index()];
        if *slot == decl {
            return Ok(());
        }
        let floating_changed = slot.is_screen_space() != decl.is_screen_space();
        *slot = decl;
        let parent = node.parent;
        if floating_changed && let Some(p) = parent {
            self.mark_dirty(p, Pending::dimension(axis));
        }
        self.mark_dirty(id, Pending::position(axis));
        Ok(())
    }

    /// Set a dimension declaration. Depth has no dimension.
    pub fn set_dimension(&mut self, id: NodeId, axis: Axis, decl: Dimension) -> Result<()> {
        if !axis.is_planar() {
            return Err(Error::InvalidOperation(format!(
                "axis {axis} has no dimension"
            )));
        }
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        let slot = &mut node.dimension[planar(axis)];
        if *slot == decl {
            return Ok(());
        }
        let intrinsic_changed = slot.is_intrinsic() != decl.is_intrinsic();
        let coupling_changed = slot.depends_on_parent() != decl.depends_on_parent();
        *slot = decl;
        let parent = node.parent;
        let mut flags = Pending::dimension(axis);
        if intrinsic_changed {
            flags |= Pending::DIMENSIONS;
        }
        if coupling_changed && let Some(p) = parent {
            self.mark_dirty(p, Pending::dimension(axis));
        }
        self.mark_dirty(id, flags);
        Ok(())
    }

    /// Set a constant visibility. Returns `true` if it changed.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<bool> {
        let node = self.nodes.get(id).ok_or(Error::NodeNotFound(id))?;
        let changed = node.visible.borrow_mut().set(visible);
        if changed {
            self.visibility_changed(id, visible, false);
        }
        Ok(changed)
    }

    /// Bind visibility to a path. Takes effect on the next pass.
    pub fn set_visibility_binding(&mut self, id: NodeId, visible: Bindable<bool>) -> Result<()> {
        let node = self.nodes.get(id).ok_or(Error::NodeNotFound(id))?;
        *node.visible.borrow_mut() = visible;
        self.mark_dirty(id, Pending::BINDINGS | Pending::FORCE_BINDINGS);
        Ok(())
    }

    /// Flag everything a visibility flip affects.
    pub(crate) fn visibility_changed(&mut self, id: NodeId, visible: bool, in_pass: bool) {
        let mut flags = Pending::GEOMETRY | Pending::CONTENT;
        if visible && !in_pass {
            flags |= Pending::BINDINGS | Pending::FORCE_BINDINGS;
        }
        let parent = self.parent(id);
        if in_pass {
            self.mark_now(id, flags);
            if let Some(p) = parent {
                self.mark_now(p, Pending::DIMENSIONS);
            }
        } else {
            self.mark_dirty(id, flags);
            if let Some(p) = parent {
                self.mark_dirty(p, Pending::DIMENSIONS);
            }
        }
    }

    /// Set the scroll offset applied to a widget's children.
    pub fn set_scroll(&mut self, id: NodeId, axis: Axis, offset: f32) -> Result<()> {
        if !axis.is_planar() {
            return Err(Error::InvalidOperation(format!("axis {axis} does not scroll")));
        }
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        let slot = &mut node.scroll[planar(axis)];
        if *slot == offset {
            return Ok(());
        }
        *slot = offset;
        for child in node.children.clone() {
            self.mark_dirty(child, Pending::position(axis));
        }
        Ok(())
    }

    /// Declare a local binding on a widget.
    pub fn set_binding(&mut self, id: NodeId, path: &str, binding: Binding) -> Result<()> {
        let path = BindPath::parse(path)?;
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        node.bindings.set(&path, binding);
        self.dirty_keys.mark(path);
        self.mark_dirty(id, Pending::BINDINGS);
        Ok(())
    }

    /// Remove a local binding. Returns the removed binding.
    pub fn remove_binding(&mut self, id: NodeId, path: &str) -> Result<Option<Binding>> {
        let path = BindPath::parse(path)?;
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        let removed = node.bindings.remove(&path);
        if removed.is_some() {
            self.dirty_keys.mark(path);
            self.mark_dirty(id, Pending::BINDINGS);
        }
        Ok(removed)
    }

    /// Rewrite lookups under `from` to `to` within a widget's scope.
    pub fn add_redirect(&mut self, id: NodeId, from: &str, to: &str) -> Result<()> {
        let from = BindPath::parse(from)?;
        let to = BindPath::parse(to)?;
        let node = self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))?;
        node.bindings.redirect(from.clone(), to);
        self.dirty_keys.mark(from);
        self.mark_dirty(id, Pending::BINDINGS);
        Ok(())
    }

    /// Add or replace a bindable property.
    pub fn set_property(&mut self, id: NodeId, key: &str, property: Property) -> Result<()> {
        let node = self.nodes.get(id).ok_or(Error::NodeNotFound(id))?;
        node.props.borrow_mut().insert(key.to_string(), property);
        let mut flags = Pending::BINDINGS | Pending::CONTENT;
        if node.dimension.iter().any(Dimension::is_intrinsic) {
            flags |= Pending::DIMENSIONS;
        }
        self.mark_dirty(id, flags);
        Ok(())
    }

    /// Register or replace a named external source.
    pub fn set_source(&mut self, name: &str, value: impl Into<Value>) {
        self.sources.insert(name.to_string(), value.into());
        if let Ok(path) = BindPath::parse(name) {
            self.notify_path(path);
        }
    }

    /// Remove a named external source.
    pub fn remove_source(&mut self, name: &str) -> Option<Value> {
        let removed = self.sources.shift_remove(name);
        if removed.is_some()
            && let Ok(path) = BindPath::parse(name)
        {
            self.notify_path(path);
        }
        removed
    }

    /// Report that the external state at `path` changed.
    pub fn notify_changed(&mut self, path: &str) -> Result<()> {
        let path = BindPath::parse(path)?;
        self.notify_path(path);
        Ok(())
    }

    /// Report that any external state may have changed.
    pub fn notify_all(&mut self) {
        self.dirty_keys.mark_all();
        self.mark_dirty(self.root, Pending::BINDINGS);
    }

    /// Mark a path dirty and schedule propagation from the root.
    fn notify_path(&mut self, path: BindPath) {
        self.dirty_keys.mark(path);
        self.mark_dirty(self.root, Pending::BINDINGS);
    }

    /// Set the viewport size. The root is resized on the next pass if the
    /// size differs.
    pub fn set_viewport(&mut self, size: Extent) {
        self.viewport = Some(size);
    }

    /// Mark a widget's content changed independent of geometry. Intrinsic
    /// dimensions and chrome insets are re-queried.
    pub fn mark_content_changed(&mut self, id: NodeId) -> Result<()> {
        let node = self.nodes.get(id).ok_or(Error::NodeNotFound(id))?;
        let mut flags = Pending::CONTENT;
        for axis in Axis::PLANAR {
            if node.dimension_decl(axis).is_intrinsic() {
                flags |= Pending::dimension(axis);
            }
        }
        self.mark_dirty(id, flags);
        Ok(())
    }

    /// Queue work for a widget. Marks made while a pass is running are held
    /// back and merged once it completes.
    pub fn mark_dirty(&mut self, id: NodeId, flags: Pending) {
        if self.is_updating() {
            self.deferred.push((id, flags));
        } else {
            self.mark_now(id, flags);
        }
    }

    /// Queue work for a widget in the current pass.
    pub(crate) fn mark_now(&mut self, id: NodeId, flags: Pending) {
        if flags.is_empty() {
            return;
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.pending |= flags;
            self.dirty.insert(id);
        }
    }

    /// True if any widget has queued work.
    pub fn has_pending(&self) -> bool {
        !self.dirty.is_empty() || self.viewport.is_some() || !self.deferred.is_empty()
    }

    /// True while a pass is running.
    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::SeqCst)
    }

    /// Resolved position.
    pub fn position(&self, id: NodeId) -> Option<Point3> {
        self.nodes.get(id).map(|n| n.resolved_position)
    }

    /// Resolved dimension.
    pub fn dimension(&self, id: NodeId) -> Option<Extent> {
        self.nodes.get(id).map(|n| n.resolved_dimension)
    }

    /// Screen rectangle after the last pass.
    pub fn bounds(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.bounds)
    }

    /// Screen rectangle clipped by every ancestor.
    pub fn clip(&self, id: NodeId) -> Option<Rect> {
        self.nodes.get(id).map(|n| n.clip)
    }

    /// Client insets on a planar axis.
    pub fn client_insets(&self, id: NodeId, axis: Axis) -> Option<Insets> {
        self.nodes
            .get(id)
            .filter(|_| axis.is_planar())
            .map(|n| n.client_insets(axis))
    }

    /// Children that contribute to a wrap-content size on `axis`: visible,
    /// and not placed in screen space on that axis.
    pub(crate) fn wrap_children(&self, id: NodeId, axis: Axis) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        node.children
            .iter()
            .copied()
            .filter(|c| {
                self.nodes.get(*c).is_some_and(|n| {
                    n.is_visible() && !n.position_decl(axis).is_screen_space()
                })
            })
            .collect()
    }
}
