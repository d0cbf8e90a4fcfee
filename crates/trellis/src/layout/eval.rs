//! Evaluation of declarations against already-resolved quantities.
//!
//! Each function reads only the triples that `deps::requirements` lists for
//! the same declaration; the resolver guarantees those are current.

use geom::Axis;
use tracing::warn;

use super::decl::{Dimension, Position, clamp_size};
use crate::{Core, NodeId, backend::SizeBounds};

/// The span a child is positioned within on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frame {
    /// Coordinate of the near client edge.
    origin: f32,
    /// Client size.
    inner: f32,
}

impl Frame {
    /// Coordinate of the far client edge.
    fn far(&self) -> f32 {
        self.origin + self.inner
    }
}

/// The parent's client frame for `node`. The root is framed by the viewport.
fn parent_frame(core: &Core, node: NodeId, axis: Axis) -> Frame {
    match core.nodes[node].parent.and_then(|p| core.nodes.get(p)) {
        Some(p) if axis.is_planar() => {
            let inset = p.client_insets(axis);
            Frame {
                origin: p.resolved_position[axis] + inset.near - p.scroll(axis),
                inner: (p.resolved_dimension[axis] - inset.total()).max(0.0),
            }
        }
        Some(p) => Frame {
            origin: p.resolved_position[axis],
            inner: 0.0,
        },
        None => Frame {
            origin: 0.0,
            inner: screen_size(core, axis),
        },
    }
}

/// Size of the screen on `axis`: the root's resolved dimension.
fn screen_size(core: &Core, axis: Axis) -> f32 {
    if axis.is_planar() {
        core.nodes[core.root].resolved_dimension[axis]
    } else {
        0.0
    }
}

/// The widget's own resolved size on `axis`, zero for depth.
fn own_size(core: &Core, node: NodeId, axis: Axis) -> f32 {
    core.nodes[node].resolved_dimension.try_get(axis).unwrap_or(0.0)
}

/// Evaluate a full position.
pub(crate) fn position(core: &Core, node: NodeId, axis: Axis) -> f32 {
    let own = own_size(core, node, axis);
    match core.nodes[node].position_decl(axis) {
        Position::Fixed { offset, anchor } => {
            let f = parent_frame(core, node, axis);
            if anchor.is_far(axis) {
                f.far() - own - offset
            } else {
                f.origin + offset
            }
        }
        Position::Proportional {
            fraction,
            anchor,
            center,
        } => {
            let f = parent_frame(core, node, axis);
            let far = anchor.is_far(axis);
            let along = fraction * f.inner;
            let point = if far { f.far() - along } else { f.origin + along };
            if *center {
                point - own / 2.0
            } else if far {
                point - own
            } else {
                point
            }
        }
        Position::Centered => {
            let f = parent_frame(core, node, axis);
            f.origin + (f.inner - own) / 2.0
        }
        Position::Relative {
            target,
            offset,
            target_anchor,
            self_anchor,
        } => {
            let Some(tn) = core.find(node, target).and_then(|t| core.nodes.get(t)) else {
                warn!(node = ?node, target = %target, axis = %axis, "relative target not found");
                return 0.0;
            };
            let offset = if tn.is_visible() { *offset } else { 0.0 };
            let mut reference = tn.resolved_position[axis];
            if target_anchor.is_far(axis) {
                reference += tn.resolved_dimension.try_get(axis).unwrap_or(0.0);
            }
            if self_anchor.is_far(axis) {
                reference - offset - own
            } else {
                reference + offset
            }
        }
        Position::Absolute { coord, anchor } => screen_coord(core, axis, *coord, own, anchor.is_far(axis)),
        Position::Pixel { coord, anchor } => {
            let coord = coord * core.config.units_per_pixel;
            screen_coord(core, axis, coord, own, anchor.is_far(axis))
        }
    }
}

/// A screen-space coordinate measured from the near or far screen edge.
fn screen_coord(core: &Core, axis: Axis, coord: f32, own: f32, far: bool) -> f32 {
    if far {
        screen_size(core, axis) - own - coord
    } else {
        coord
    }
}

/// Evaluate a partial position: the offset within the parent's client area as
/// far as it can be known without the parent's own placement or size.
pub(crate) fn partial_position(core: &Core, node: NodeId, axis: Axis) -> f32 {
    if !axis.is_planar() {
        return 0.0;
    }
    let n = &core.nodes[node];
    match n.position_decl(axis) {
        Position::Fixed { offset, anchor } if !anchor.is_far(axis) => *offset,
        Position::Relative {
            target,
            offset,
            target_anchor,
            self_anchor,
        } => {
            let Some((t, tn)) = core
                .find(node, target)
                .and_then(|t| core.nodes.get(t).map(|tn| (t, tn)))
            else {
                return 0.0;
            };
            if tn.parent != n.parent || t == node {
                return 0.0;
            }
            let offset = if tn.is_visible() { *offset } else { 0.0 };
            let mut reference = tn.partial_position(axis);
            if target_anchor.is_far(axis) {
                reference += tn.resolved_dimension[axis];
            }
            if self_anchor.is_far(axis) {
                reference - offset - n.resolved_dimension[axis]
            } else {
                reference + offset
            }
        }
        _ => 0.0,
    }
}

/// Evaluate a dimension on a planar axis.
pub(crate) fn dimension(core: &Core, node: NodeId, axis: Axis) -> f32 {
    let n = &core.nodes[node];
    let value = match n.dimension_decl(axis) {
        Dimension::Fixed(size) => *size,
        Dimension::RelativeToParent(delta) => parent_frame(core, node, axis).inner + delta,
        Dimension::Proportional(fraction) => parent_frame(core, node, axis).inner * fraction,
        Dimension::ExpandToParent(gap) => {
            parent_frame(core, node, axis).far() - gap - n.resolved_position[axis]
        }
        Dimension::ExpandToTarget { target, gap } => {
            match core.find(node, target).and_then(|t| core.nodes.get(t)) {
                Some(tn) => tn.resolved_position[axis] - gap - n.resolved_position[axis],
                None => {
                    warn!(node = ?node, target = %target, axis = %axis, "expansion target not found");
                    0.0
                }
            }
        }
        Dimension::Intrinsic { min, max } => {
            let cross = axis
                .other()
                .filter(|other| !n.dimension_decl(*other).is_intrinsic())
                .map(|other| n.resolved_dimension[other]);
            let bounds = SizeBounds {
                min: *min,
                max: *max,
                cross,
            };
            let size = core.backends.intrinsic_size(core, node, axis, bounds);
            clamp_size(size.unwrap_or(0.0), *min, *max)
        }
        Dimension::WrapContent { min, max } => {
            let wrapped = wrap_extent(core, node, axis) + n.client_insets(axis).total();
            clamp_size(wrapped, *min, *max)
        }
        Dimension::WrapContentOrFill => {
            let wrapped = wrap_extent(core, node, axis) + n.client_insets(axis).total();
            let fill = parent_frame(core, node, axis).far() - n.resolved_position[axis];
            wrapped.max(fill)
        }
    };
    value.max(0.0)
}

/// Span of the contributing children on `axis`: the furthest far edge minus
/// the nearest near edge, in partial-position space.
fn wrap_extent(core: &Core, node: NodeId, axis: Axis) -> f32 {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for child in core.wrap_children(node, axis) {
        let c = &core.nodes[child];
        let start = c.partial_position(axis);
        let size = if c.dimension_decl(axis).depends_on_parent() {
            0.0
        } else {
            c.resolved_dimension[axis]
        };
        lo = lo.min(start);
        hi = hi.max(start + size);
    }
    if lo.is_finite() { hi - lo } else { 0.0 }
}
