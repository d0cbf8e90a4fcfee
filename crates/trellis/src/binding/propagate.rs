//! Depth-first propagation of binding changes into widget properties.

use indexmap::IndexMap;
use tracing::trace;

use super::context::BindingContext;
use crate::{Core, NodeId};

/// What changed on one widget during propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Change {
    /// Widget.
    pub(crate) node: NodeId,
    /// A property value changed.
    pub(crate) content: bool,
    /// A property that feeds intrinsic sizing changed.
    pub(crate) layout: bool,
    /// Visibility flipped to this value.
    pub(crate) visibility: Option<bool>,
}

/// The result of one propagation.
#[derive(Debug, Default)]
pub(crate) struct Propagation {
    /// Per-widget changes, in visit order.
    pub(crate) changes: Vec<Change>,
    /// Number of bindable values that changed.
    pub(crate) updates: usize,
    /// Number of widgets visited.
    pub(crate) visited: usize,
}

/// Re-derive the bindables of every flagged widget and its visible
/// descendants. `flagged` maps each widget to its force flag.
///
/// Only reads the tree: values live in interior-mutable cells, and the caller
/// applies the returned changes.
pub(crate) fn propagate(core: &Core, flagged: &IndexMap<NodeId, bool>) -> Propagation {
    let mut out = Propagation::default();
    let root = BindingContext::root(
        &core.sources,
        &core.dirty_keys,
        core.config.max_pointer_depth,
    );
    for id in flagged.keys() {
        if !core.contains(*id) {
            continue;
        }
        let ancestors = core.ancestors(*id);
        if ancestors.iter().any(|a| flagged.contains_key(a)) {
            continue;
        }
        let chain: Vec<NodeId> = ancestors.into_iter().rev().collect();
        enter(core, &chain, &root, *id, flagged, &mut out);
    }
    out
}

/// Build the scope chain down to `target`'s parent, then visit `target`.
fn enter(
    core: &Core,
    chain: &[NodeId],
    ctx: &BindingContext<'_>,
    target: NodeId,
    flagged: &IndexMap<NodeId, bool>,
    out: &mut Propagation,
) {
    match chain.split_first() {
        Some((first, rest)) => {
            let scope = ctx.child(*first, &core.nodes[*first].bindings);
            enter(core, rest, &scope, target, flagged, out);
        }
        None => visit(core, target, ctx, false, flagged, out),
    }
}

/// Update one widget, then its children if it is visible or forced.
fn visit(
    core: &Core,
    id: NodeId,
    parent: &BindingContext<'_>,
    force: bool,
    flagged: &IndexMap<NodeId, bool>,
    out: &mut Propagation,
) {
    let Some(node) = core.nodes.get(id) else {
        return;
    };
    out.visited += 1;
    let force = force || flagged.get(&id).copied().unwrap_or(false);
    let ctx = parent.child(id, &node.bindings).forced(force);

    let was_visible = node.is_visible();
    if node.visible.borrow_mut().update(&ctx) {
        out.updates += 1;
    }
    let visible = node.is_visible();

    let mut content = false;
    let mut layout = false;
    for (key, prop) in node.props.borrow_mut().iter_mut() {
        if prop.value.update(&ctx) {
            trace!(node = ?id, key = %key, value = ?prop.value.get(), "property changed");
            out.updates += 1;
            content = true;
            layout |= prop.affects_layout;
        }
    }
    let visibility = (was_visible != visible).then_some(visible);
    if content || visibility.is_some() {
        out.changes.push(Change {
            node: id,
            content,
            layout,
            visibility,
        });
    }

    if visible || ctx.force() {
        let revealed = visible && !was_visible;
        for child in &node.children {
            visit(core, *child, &ctx, revealed, flagged, out);
        }
    }
}
