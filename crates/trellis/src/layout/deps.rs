//! Dependency triples and the reverse dependent-edge registry.

use std::fmt;

use geom::Axis;
use indexmap::{IndexMap, IndexSet};

use super::decl::{Dimension, Position};
use crate::{Core, NodeId};

/// The quantity a triple refers to.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    /// Best-effort position that does not require the parent's placement.
    PartialPosition,
    /// Fully resolved position.
    Position,
    /// Resolved size.
    Dimensions,
}

impl Kind {
    /// All kinds.
    pub const ALL: [Self; 3] = [Self::PartialPosition, Self::Position, Self::Dimensions];

    /// True if this kind exists on `axis`. Only position exists on depth.
    pub fn exists_on(self, axis: Axis) -> bool {
        axis.is_planar() || self == Self::Position
    }
}

/// One unit of resolver work: a quantity of a widget on an axis.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Triple {
    /// Widget.
    pub node: NodeId,
    /// Quantity.
    pub kind: Kind,
    /// Axis.
    pub axis: Axis,
}

impl Triple {
    /// Construct a triple.
    pub fn new(node: NodeId, kind: Kind, axis: Axis) -> Self {
        Self { node, kind, axis }
    }

    /// Partial position of `node` on `axis`.
    pub fn partial(node: NodeId, axis: Axis) -> Self {
        Self::new(node, Kind::PartialPosition, axis)
    }

    /// Position of `node` on `axis`.
    pub fn position(node: NodeId, axis: Axis) -> Self {
        Self::new(node, Kind::Position, axis)
    }

    /// Dimension of `node` on `axis`.
    pub fn dimensions(node: NodeId, axis: Axis) -> Self {
        Self::new(node, Kind::Dimensions, axis)
    }

    /// Every valid triple of a widget.
    pub fn all_of(node: NodeId) -> impl Iterator<Item = Self> {
        Kind::ALL.into_iter().flat_map(move |kind| {
            Axis::ALL
                .into_iter()
                .filter(move |axis| kind.exists_on(*axis))
                .map(move |axis| Self::new(node, kind, axis))
        })
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}.{:?}.{}", self.node, self.kind, self.axis)
    }
}

/// Reverse edges stored on a depended-upon widget: for each of its quantities,
/// the triples elsewhere that must be recomputed when it changes.
///
/// Edges are only ever added. A widget whose declaration stops needing a
/// dependency leaves a stale edge behind, which costs an extra recompute but
/// never produces wrong geometry.
#[derive(Debug, Default, Clone)]
pub struct Dependents {
    /// Dependents keyed by the quantity they read.
    by_quantity: IndexMap<(Kind, Axis), IndexSet<Triple>>,
}

impl Dependents {
    /// Record that `dependent` reads this widget's `(kind, axis)`. Returns
    /// `true` if the edge is new.
    pub fn add(&mut self, kind: Kind, axis: Axis, dependent: Triple) -> bool {
        self.by_quantity
            .entry((kind, axis))
            .or_default()
            .insert(dependent)
    }

    /// Triples that read this widget's `(kind, axis)`.
    pub fn of(&self, kind: Kind, axis: Axis) -> impl Iterator<Item = &Triple> {
        self.by_quantity.get(&(kind, axis)).into_iter().flatten()
    }

    /// Every recorded dependent triple.
    pub fn all(&self) -> impl Iterator<Item = &Triple> {
        self.by_quantity.values().flatten()
    }

    /// Total number of edges.
    pub fn len(&self) -> usize {
        self.by_quantity.values().map(IndexSet::len).sum()
    }

    /// True if there are no edges.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The triples a declaration needs resolved before it can be evaluated.
#[derive(Debug, Default)]
pub(crate) struct Needs {
    /// Required triples.
    pub(crate) triples: Vec<Triple>,
    /// A named target could not be found.
    pub(crate) unresolved: bool,
}

impl Needs {
    /// Require a triple.
    fn push(&mut self, t: Triple) {
        if !self.triples.contains(&t) {
            self.triples.push(t);
        }
    }

    /// Require `node`'s dimension on `axis` if the axis has one.
    fn dims(&mut self, node: NodeId, axis: Axis) {
        if axis.is_planar() {
            self.push(Triple::dimensions(node, axis));
        }
    }
}

/// Work out which triples `t` needs. Evaluation in `eval` reads exactly these;
/// the two must stay in step.
pub(crate) fn requirements(core: &Core, t: Triple) -> Needs {
    let mut needs = Needs::default();
    if core.nodes.get(t.node).is_none() || !t.kind.exists_on(t.axis) {
        return needs;
    }
    match t.kind {
        Kind::PartialPosition => partial_needs(core, t.node, t.axis, &mut needs),
        Kind::Position => position_needs(core, t.node, t.axis, &mut needs),
        Kind::Dimensions => dimension_needs(core, t.node, t.axis, &mut needs),
    }
    needs
}

/// Requirements of a full position.
fn position_needs(core: &Core, node: NodeId, axis: Axis, needs: &mut Needs) {
    let n = &core.nodes[node];
    let parent = n.parent;
    let parent_pos = |needs: &mut Needs| {
        if let Some(p) = parent {
            needs.push(Triple::position(p, axis));
        }
    };
    let parent_dims = |needs: &mut Needs| {
        if let Some(p) = parent {
            needs.dims(p, axis);
        }
    };
    match n.position_decl(axis) {
        Position::Fixed { anchor, .. } => {
            parent_pos(needs);
            if anchor.is_far(axis) {
                parent_dims(needs);
                needs.dims(node, axis);
            }
        }
        Position::Proportional { anchor, center, .. } => {
            parent_pos(needs);
            parent_dims(needs);
            if *center || anchor.is_far(axis) {
                needs.dims(node, axis);
            }
        }
        Position::Centered => {
            parent_pos(needs);
            parent_dims(needs);
            needs.dims(node, axis);
        }
        Position::Relative {
            target,
            target_anchor,
            self_anchor,
            ..
        } => match core.find(node, target) {
            Some(t) => {
                needs.push(Triple::position(t, axis));
                if target_anchor.is_far(axis) {
                    needs.dims(t, axis);
                }
                if self_anchor.is_far(axis) {
                    needs.dims(node, axis);
                }
            }
            None => needs.unresolved = true,
        },
        Position::Absolute { anchor, .. } | Position::Pixel { anchor, .. } => {
            if anchor.is_far(axis) {
                if core.root != node {
                    needs.dims(core.root, axis);
                }
                needs.dims(node, axis);
            }
        }
    }
}

/// Requirements of a partial position. Nothing here may reach the parent.
fn partial_needs(core: &Core, node: NodeId, axis: Axis, needs: &mut Needs) {
    let n = &core.nodes[node];
    let Position::Relative {
        target,
        target_anchor,
        self_anchor,
        ..
    } = n.position_decl(axis)
    else {
        return;
    };
    match core.find(node, target) {
        Some(t) if core.nodes.get(t).is_some_and(|tn| tn.parent == n.parent) && t != node => {
            needs.push(Triple::partial(t, axis));
            if target_anchor.is_far(axis) {
                needs.dims(t, axis);
            }
            if self_anchor.is_far(axis) {
                needs.dims(node, axis);
            }
        }
        Some(_) => {}
        None => needs.unresolved = true,
    }
}

/// Requirements of a dimension.
fn dimension_needs(core: &Core, node: NodeId, axis: Axis, needs: &mut Needs) {
    let n = &core.nodes[node];
    let parent = n.parent;
    match n.dimension_decl(axis) {
        Dimension::Fixed(_) => {}
        Dimension::RelativeToParent(_) | Dimension::Proportional(_) => {
            if let Some(p) = parent {
                needs.dims(p, axis);
            }
        }
        Dimension::ExpandToParent(_) => {
            needs.push(Triple::position(node, axis));
            if let Some(p) = parent {
                needs.push(Triple::position(p, axis));
                needs.dims(p, axis);
            }
        }
        Dimension::ExpandToTarget { target, .. } => match core.find(node, target) {
            Some(t) => {
                needs.push(Triple::position(node, axis));
                needs.push(Triple::position(t, axis));
            }
            None => needs.unresolved = true,
        },
        Dimension::Intrinsic { .. } => {
            if let Some(other) = axis.other()
                && !n.dimension_decl(other).is_intrinsic()
            {
                needs.dims(node, other);
            }
        }
        Dimension::WrapContent { .. } => wrap_needs(core, node, axis, needs),
        Dimension::WrapContentOrFill => {
            wrap_needs(core, node, axis, needs);
            needs.push(Triple::position(node, axis));
            if let Some(p) = parent {
                needs.push(Triple::position(p, axis));
                needs.dims(p, axis);
            }
        }
    }
}

/// Requirements of wrap-content sizing: the partial position and, unless it is
/// derived from this parent, the dimension of every contributing child.
fn wrap_needs(core: &Core, node: NodeId, axis: Axis, needs: &mut Needs) {
    for child in core.wrap_children(node, axis) {
        needs.push(Triple::partial(child, axis));
        if !core.nodes[child].dimension_decl(axis).depends_on_parent() {
            needs.dims(child, axis);
        }
    }
}

#[cfg(test)]
mod tests {
    use geom::Corner;

    use super::*;
    use crate::{NodeName, error::Result};

    #[test]
    fn triples_of_a_widget() {
        let n = NodeId::default();
        let all: Vec<_> = Triple::all_of(n).collect();
        assert_eq!(all.len(), 7);
        assert!(!all.contains(&Triple::dimensions(n, Axis::Z)));
        assert!(all.contains(&Triple::position(n, Axis::Z)));
    }

    #[test]
    fn dependents_dedupe() {
        let mut d = Dependents::default();
        let t = Triple::position(NodeId::default(), Axis::X);
        assert!(d.add(Kind::Dimensions, Axis::X, t));
        assert!(!d.add(Kind::Dimensions, Axis::X, t));
        assert_eq!(d.len(), 1);
        assert_eq!(d.of(Kind::Dimensions, Axis::X).count(), 1);
        assert_eq!(d.of(Kind::Position, Axis::X).count(), 0);
    }

    #[test]
    fn fixed_far_needs_parent_and_own_dims() -> Result<()> {
        let mut core = Core::default();
        let root = core.root_id();
        let a = core.add_child(root)?;
        core.set_position(a, Axis::X, Position::fixed_at(2.0, Corner::TopRight))?;
        let needs = requirements(&core, Triple::position(a, Axis::X));
        assert_eq!(
            needs.triples,
            vec![
                Triple::position(root, Axis::X),
                Triple::dimensions(root, Axis::X),
                Triple::dimensions(a, Axis::X),
            ]
        );
        let near = requirements(&core, Triple::position(a, Axis::Y));
        assert_eq!(near.triples, vec![Triple::position(root, Axis::Y)]);
        Ok(())
    }

    #[test]
    fn wrap_skips_parent_derived_dims() -> Result<()> {
        let mut core = Core::default();
        let root = core.root_id();
        let p = core.add_child(root)?;
        let fixed = core.add_child(p)?;
        let fill = core.add_child(p)?;
        let floating = core.add_child(p)?;
        core.set_dimension(fixed, Axis::X, Dimension::Fixed(4.0))?;
        core.set_dimension(fill, Axis::X, Dimension::Proportional(1.0))?;
        core.set_position(floating, Axis::X, Position::absolute(3.0))?;
        let needs = requirements(&core, Triple::dimensions(p, Axis::X));
        assert_eq!(
            needs.triples,
            vec![
                Triple::partial(fixed, Axis::X),
                Triple::dimensions(fixed, Axis::X),
                Triple::partial(fill, Axis::X),
            ]
        );
        Ok(())
    }

    #[test]
    fn missing_target_is_unresolved() -> Result<()> {
        let mut core = Core::default();
        let root = core.root_id();
        let a = core.add_child(root)?;
        core.set_position(
            a,
            Axis::Y,
            Position::relative(NodeName::convert("ghost"), 1.0, Corner::TopLeft, Corner::TopLeft),
        )?;
        let needs = requirements(&core, Triple::position(a, Axis::Y));
        assert!(needs.unresolved);
        assert!(needs.triples.is_empty());
        Ok(())
    }

    #[test]
    fn single_intrinsic_axis_needs_cross_axis() -> Result<()> {
        let mut core = Core::default();
        let root = core.root_id();
        let a = core.add_child(root)?;
        core.set_dimension(a, Axis::X, Dimension::Fixed(10.0))?;
        core.set_dimension(a, Axis::Y, Dimension::intrinsic())?;
        let needs = requirements(&core, Triple::dimensions(a, Axis::Y));
        assert_eq!(needs.triples, vec![Triple::dimensions(a, Axis::X)]);
        core.set_dimension(a, Axis::X, Dimension::intrinsic())?;
        let needs = requirements(&core, Triple::dimensions(a, Axis::Y));
        assert!(needs.triples.is_empty());
        Ok(())
    }
}
