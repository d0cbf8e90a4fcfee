//! The per-pass update driver.
//!
//! A pass runs these steps in order, each skipped when it has nothing to do:
//!
//! 1. re-sort children whose order keys changed, and resize the root if the
//!    viewport changed;
//! 2. propagate binding changes into widget properties;
//! 3. re-derive dependent edges for every widget with pending geometry;
//! 4. close the pending triples over dependent edges into the required set;
//! 5. resolve every required triple exactly once, pulling in its needs first;
//! 6. recompute screen bounds and clipping for changed subtrees and notify the
//!    backends.

use std::{
    collections::HashSet,
    mem,
    sync::{Arc, atomic::Ordering},
};

use geom::{Axis, Rect};
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace, warn};

use super::{
    decl::Dimension,
    deps::{Kind, Triple, requirements},
    eval,
    report::{FrameReport, UpdateOutcome},
};
use crate::{
    Core, NodeId, NodeName,
    binding::{DirtyKeys, propagate},
    core::pending::Pending,
};

impl Core {
    /// Run one update pass.
    ///
    /// Returns [`UpdateOutcome::Skipped`] immediately if a pass is already
    /// running, e.g. when called from a backend notification.
    pub fn update(&mut self) -> UpdateOutcome {
        if self
            .updating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("update skipped: pass already running");
            return UpdateOutcome::Skipped;
        }
        let guard = scopeguard::guard(Arc::clone(&self.updating), |flag| {
            flag.store(false, Ordering::SeqCst);
        });

        self.pass += 1;
        let mut report = FrameReport {
            pass: self.pass,
            ..FrameReport::default()
        };
        self.sort_children();
        self.apply_viewport();
        self.propagate_bindings(&mut report);

        let pending = self.take_pending();
        let mut content: IndexSet<NodeId> = pending
            .iter()
            .filter(|(_, p)| p.contains(Pending::CONTENT))
            .map(|(id, _)| *id)
            .collect();
        content.extend(mem::take(&mut report.content_changed));

        if pending.iter().any(|(_, p)| p.has_geometry()) {
            let required = self.required(&pending);
            report.required = required.len();
            let mut pass = ResolvePass::new(required);
            let order: Vec<Triple> = pass.required.iter().copied().collect();
            for t in order {
                pass.resolve(self, t);
            }
            report.resolved = pass.resolved;
            report.geometry_changed = pass.changed;
        }

        content.retain(|id| self.nodes.contains_key(*id));
        report.content_changed = content;
        self.update_bounds(&report.geometry_changed);

        let geometry: Vec<NodeId> = report.geometry_changed.iter().copied().collect();
        let content: Vec<NodeId> = report.content_changed.iter().copied().collect();
        if !geometry.is_empty() || !content.is_empty() {
            let mut backends = mem::take(&mut self.backends);
            backends.notify(self, &geometry, &content);
            self.backends = backends;
        }

        drop(guard);
        let deferred = mem::take(&mut self.deferred);
        report.deferred = deferred.len();
        for (id, flags) in deferred {
            self.mark_now(id, flags);
        }
        debug!(
            pass = report.pass,
            required = report.required,
            resolved = report.resolve_count(),
            geometry = report.geometry_changed.len(),
            content = report.content_changed.len(),
            bindings = report.binding_updates,
            deferred = report.deferred,
            "update pass"
        );
        UpdateOutcome::Completed(report)
    }

    /// Stable-sort children of every widget whose child order keys changed.
    /// Sibling order decides which of several same-named widgets a lookup
    /// finds first, so a reorder touches every name below the parent.
    fn sort_children(&mut self) {
        let unsorted: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.unsorted)
            .map(|(id, _)| id)
            .collect();
        for id in unsorted {
            let before = mem::take(&mut self.nodes[id].children);
            let mut children = before.clone();
            children.sort_by_key(|c| self.nodes.get(*c).map_or(0, |n| n.order));
            let moved = children != before;
            let node = &mut self.nodes[id];
            node.children = children;
            node.unsorted = false;
            if moved {
                for child in before {
                    self.touch_subtree_names(child);
                }
            }
        }
    }

    /// Resize the root if the viewport changed.
    fn apply_viewport(&mut self) {
        let Some(size) = self.viewport.take() else {
            return;
        };
        let root = self.root;
        let node = &mut self.nodes[root];
        let mut flags = Pending::empty();
        for axis in Axis::PLANAR {
            let decl = Dimension::Fixed(size[axis]);
            let slot = &mut node.dimension[axis.index()];
            if *slot != decl {
                *slot = decl;
                flags |= Pending::dimension(axis);
            }
        }
        self.mark_now(root, flags);
    }

    /// Propagate binding changes from every widget flagged for bindings, then
    /// turn the resulting property and visibility changes into pending work.
    fn propagate_bindings(&mut self, report: &mut FrameReport) {
        let flagged: IndexMap<NodeId, bool> = self
            .dirty
            .iter()
            .filter_map(|id| {
                let node = self.nodes.get(*id)?;
                node.pending
                    .contains(Pending::BINDINGS)
                    .then(|| (*id, node.pending.contains(Pending::FORCE_BINDINGS)))
            })
            .collect();
        if flagged.is_empty() {
            return;
        }
        let run = propagate::propagate(self, &flagged);
        self.dirty_keys = DirtyKeys::new();
        for id in flagged.keys() {
            if let Some(node) = self.nodes.get_mut(*id) {
                node.pending -= Pending::BINDINGS | Pending::FORCE_BINDINGS;
            }
        }
        report.binding_updates = run.updates;
        for change in run.changes {
            if change.content || change.visibility.is_some() {
                report.content_changed.insert(change.node);
                self.mark_now(change.node, Pending::CONTENT);
            }
            if change.layout {
                self.mark_now(change.node, Pending::DIMENSIONS);
            }
            if let Some(visible) = change.visibility {
                self.visibility_changed(change.node, visible, true);
            }
        }
        trace!(visited = run.visited, updates = run.updates, "bindings propagated");
    }

    /// Drain the pending flags of every dirty widget. Chrome insets are
    /// re-queried for widgets with pending geometry or content, and dependent
    /// edges are re-derived for every pending geometry quantity.
    fn take_pending(&mut self) -> Vec<(NodeId, Pending)> {
        if mem::take(&mut self.structure_changed) {
            for id in mem::take(&mut self.unresolved) {
                self.mark_now(id, Pending::GEOMETRY);
            }
            let names = mem::take(&mut self.touched_names);
            self.flag_referrers(&names);
        }
        let geometric: Vec<NodeId> = self
            .dirty
            .iter()
            .copied()
            .filter(|id| {
                self.nodes.get(*id).is_some_and(|n| {
                    n.pending.has_geometry() || n.pending.contains(Pending::CONTENT)
                })
            })
            .collect();
        for id in geometric {
            self.refresh_insets(id);
        }
        let dirty = mem::take(&mut self.dirty);
        let mut out = Vec::with_capacity(dirty.len());
        for id in dirty {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            let pending = mem::take(&mut node.pending);
            if pending.has_geometry() {
                self.rebuild_edges(id, pending);
            }
            out.push((id, pending));
        }
        out
    }

    /// Flag the targeted quantities of every widget whose declarations name
    /// one of `names`. A rename or a nearer widget with the same name can
    /// change what a target resolves to even though the old target is still
    /// in the tree.
    fn flag_referrers(&mut self, names: &IndexSet<NodeName>) {
        if names.is_empty() {
            return;
        }
        let named = |target: Option<&NodeName>| target.is_some_and(|t| names.contains(t));
        let flagged: Vec<(NodeId, Pending)> = self
            .nodes
            .iter()
            .filter_map(|(id, n)| {
                let mut flags = Pending::empty();
                for axis in Axis::ALL {
                    if named(n.position_decl(axis).target()) {
                        flags |= Pending::position(axis);
                    }
                }
                for axis in Axis::PLANAR {
                    if named(n.dimension_decl(axis).target()) {
                        flags |= Pending::dimension(axis);
                    }
                }
                (!flags.is_empty()).then_some((id, flags))
            })
            .collect();
        trace!(names = names.len(), widgets = flagged.len(), "re-flagging name referrers");
        for (id, flags) in flagged {
            self.mark_now(id, flags);
        }
    }

    /// Re-query chrome insets. A change moves the children and may resize the
    /// widget itself.
    fn refresh_insets(&mut self, id: NodeId) {
        for axis in Axis::PLANAR {
            let insets = self.backends.client_insets(self, id, axis);
            let node = &mut self.nodes[id];
            let slot = &mut node.client[axis.index()];
            if *slot == insets {
                continue;
            }
            *slot = insets;
            let children = node.children.clone();
            self.mark_now(id, Pending::dimension(axis));
            for child in children {
                self.mark_now(child, Pending::position(axis));
            }
        }
    }

    /// Add an edge on every widget whose quantity `id`'s pending quantities
    /// read. Edges are never removed.
    fn rebuild_edges(&mut self, id: NodeId, pending: Pending) {
        for (kind, axis) in pending.quantities() {
            let dependent = Triple::new(id, kind, axis);
            let needs = requirements(self, dependent);
            if needs.unresolved {
                self.unresolved.insert(id);
            }
            for need in needs.triples {
                if let Some(node) = self.nodes.get_mut(need.node) {
                    node.dependents.add(need.kind, need.axis, dependent);
                }
            }
        }
    }

    /// Close the pending triples over dependent edges.
    fn required(&self, pending: &[(NodeId, Pending)]) -> IndexSet<Triple> {
        let mut required = IndexSet::new();
        let mut stack: Vec<Triple> = pending
            .iter()
            .flat_map(|(id, p)| p.quantities().map(|(k, a)| Triple::new(*id, k, a)))
            .collect();
        stack.reverse();
        while let Some(t) = stack.pop() {
            let Some(node) = self.nodes.get(t.node) else {
                continue;
            };
            if !required.insert(t) {
                continue;
            }
            if t.kind == Kind::Position && t.axis.is_planar() {
                stack.push(Triple::partial(t.node, t.axis));
            }
            for dep in node.dependents.of(t.kind, t.axis) {
                if !self.nodes.contains_key(dep.node) {
                    continue;
                }
                stack.push(*dep);
                if dep.kind == Kind::Position && dep.axis.is_planar() {
                    stack.push(Triple::partial(dep.node, dep.axis));
                }
            }
        }
        required
    }

    /// Recompute screen bounds and clip rectangles for every changed widget and
    /// its descendants, parents before children.
    fn update_bounds(&mut self, changed: &IndexSet<NodeId>) {
        let tops: Vec<NodeId> = changed
            .iter()
            .copied()
            .filter(|id| !self.ancestors(*id).iter().any(|a| changed.contains(a)))
            .collect();
        for top in tops {
            for node_id in self.descendants(top) {
                let node = &self.nodes[node_id];
                let p = node.resolved_position;
                let d = node.resolved_dimension;
                let bounds = Rect::new(p.x, p.y, d.w, d.h);
                let clip = match node.parent.and_then(|parent| self.nodes.get(parent)) {
                    Some(parent) => parent.clip.intersect(&bounds),
                    None => bounds,
                };
                let node = &mut self.nodes[node_id];
                node.bounds = bounds;
                node.clip = clip;
            }
        }
    }
}

/// State of step 5.
struct ResolvePass {
    /// Triples to resolve.
    required: IndexSet<Triple>,
    /// Triples resolved this pass.
    completed: HashSet<Triple>,
    /// Triples on the current resolution path.
    active: HashSet<Triple>,
    /// Current recursion depth.
    depth: usize,
    /// Widgets whose position or dimension changed.
    changed: IndexSet<NodeId>,
    /// Triples resolved, in order.
    resolved: Vec<Triple>,
}

impl ResolvePass {
    /// A pass over `required`.
    fn new(required: IndexSet<Triple>) -> Self {
        Self {
            required,
            completed: HashSet::new(),
            active: HashSet::new(),
            depth: 0,
            changed: IndexSet::new(),
            resolved: Vec::new(),
        }
    }

    /// True if `t` still has to be resolved this pass.
    fn outstanding(&self, t: &Triple) -> bool {
        self.required.contains(t) && !self.completed.contains(t)
    }

    /// Resolve `t` after everything it needs. A triple that is not required
    /// or already completed is left alone; a cycle or a runaway chain leaves
    /// the triple at its previous value.
    fn resolve(&mut self, core: &mut Core, t: Triple) {
        if !self.outstanding(&t) || !t.kind.exists_on(t.axis) || !core.nodes.contains_key(t.node)
        {
            return;
        }
        if self.active.contains(&t) {
            warn!(triple = %t, "declaration cycle; keeping previous value");
            return;
        }
        if self.depth >= core.config.max_resolve_depth {
            warn!(triple = %t, depth = self.depth, "resolve depth limit reached; keeping previous value");
            return;
        }
        self.active.insert(t);
        self.depth += 1;
        for need in requirements(core, t).triples {
            self.resolve(core, need);
        }
        self.depth -= 1;
        self.active.remove(&t);
        if !self.completed.insert(t) {
            return;
        }
        self.store(core, t);
        if t.kind == Kind::Position && t.axis.is_planar() {
            self.resolve(core, Triple::partial(t.node, t.axis));
        }
    }

    /// Evaluate and store one triple.
    fn store(&mut self, core: &mut Core, t: Triple) {
        let epsilon = core.config.epsilon;
        let axis = t.axis;
        let (old, new) = match t.kind {
            Kind::Position => {
                let new = eval::position(core, t.node, axis);
                let slot = &mut core.nodes[t.node].resolved_position[axis];
                (mem::replace(slot, new), new)
            }
            Kind::Dimensions => {
                let new = eval::dimension(core, t.node, axis);
                let slot = &mut core.nodes[t.node].resolved_dimension[axis];
                (mem::replace(slot, new), new)
            }
            Kind::PartialPosition => {
                let new = eval::partial_position(core, t.node, axis);
                core.nodes[t.node].partial[axis.index()] = new;
                self.resolved.push(t);
                trace!(triple = %t, value = new, "resolved");
                return;
            }
        };
        self.resolved.push(t);
        trace!(triple = %t, value = new, "resolved");
        if (new - old).abs() > epsilon {
            self.changed.insert(t.node);
        }
    }
}
