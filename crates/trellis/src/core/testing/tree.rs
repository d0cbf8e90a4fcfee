use geom::{Axis, Extent};

use crate::{
    Core, NodeId, Result,
    backend::BackendRegistry,
    config::Config,
    layout::{Dimension, Position},
};

/// A core with the given backends and a viewport of `w` by `h`.
pub fn core_with(backends: BackendRegistry, w: f32, h: f32) -> Core {
    let mut core = Core::new(Config::default(), backends);
    core.set_viewport(Extent::new(w, h));
    core
}

/// Add a child with fixed offsets and a fixed size.
pub fn fixed_box(core: &mut Core, parent: NodeId, x: f32, y: f32, w: f32, h: f32) -> Result<NodeId> {
    let id = core.add_child(parent)?;
    core.set_position(id, Axis::X, Position::fixed(x))?;
    core.set_position(id, Axis::Y, Position::fixed(y))?;
    core.set_dimension(id, Axis::X, Dimension::Fixed(w))?;
    core.set_dimension(id, Axis::Y, Dimension::Fixed(h))?;
    Ok(id)
}

/// Add a named child with fixed offsets and a fixed size.
pub fn named_box(
    core: &mut Core,
    parent: NodeId,
    name: &str,
    (x, y): (f32, f32),
    (w, h): (f32, f32),
) -> Result<NodeId> {
    let id = fixed_box(core, parent, x, y, w, h)?;
    core.set_name(id, name)?;
    Ok(id)
}

/// Build a complete tree of the given depth and fan-out where every widget
/// fills its share of the parent horizontally. Returns the widgets in
/// creation order.
pub fn grid_tree(core: &mut Core, depth: usize, fanout: usize) -> Result<Vec<NodeId>> {
    let mut out = Vec::new();
    let mut frontier = vec![core.root_id()];
    for _ in 0..depth {
        let mut next = Vec::new();
        for parent in frontier {
            for i in 0..fanout {
                let fraction = 1.0 / fanout as f32;
                let id = core.add_child(parent)?;
                core.set_position(id, Axis::X, Position::proportional(fraction * i as f32))?;
                core.set_position(id, Axis::Y, Position::fixed(1.0))?;
                core.set_dimension(id, Axis::X, Dimension::Proportional(fraction))?;
                core.set_dimension(id, Axis::Y, Dimension::RelativeToParent(-1.0))?;
                out.push(id);
                next.push(id);
            }
        }
        frontier = next;
    }
    Ok(out)
}
