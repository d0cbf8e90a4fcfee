//! Reusable widget subtrees.

use geom::Axis;
use indexmap::IndexMap;

use crate::{
    Core, NodeId, Result,
    binding::{Bindable, Binding},
    core::node::Property,
    layout::{Dimension, Position},
};

/// A description of a widget subtree that can be instantiated any number of
/// times. Every instance gets its own copies of the template's bindables.
#[derive(Debug, Clone, Default)]
pub struct NodeTemplate {
    /// Widget name.
    name: Option<String>,
    /// Sort key among siblings.
    order: i32,
    /// Position declarations that differ from the default.
    positions: Vec<(Axis, Position)>,
    /// Dimension declarations that differ from the default.
    dimensions: Vec<(Axis, Dimension)>,
    /// Visibility, if not constantly visible.
    visible: Option<Bindable<bool>>,
    /// Local bindings, by dotted path.
    bindings: Vec<(String, Binding)>,
    /// Redirect rules.
    redirects: Vec<(String, String)>,
    /// Bindable properties.
    properties: IndexMap<String, Property>,
    /// Child templates, in order.
    children: Vec<NodeTemplate>,
}

impl NodeTemplate {
    /// An empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the widget name.
    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Set the sort key.
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Declare a position.
    pub fn position(mut self, axis: Axis, decl: Position) -> Self {
        self.positions.push((axis, decl));
        self
    }

    /// Declare a dimension.
    pub fn dimension(mut self, axis: Axis, decl: Dimension) -> Self {
        self.dimensions.push((axis, decl));
        self
    }

    /// Declare both planar dimensions as fixed sizes.
    pub fn size(self, w: f32, h: f32) -> Self {
        self.dimension(Axis::X, Dimension::Fixed(w))
            .dimension(Axis::Y, Dimension::Fixed(h))
    }

    /// Set visibility.
    pub fn visible(mut self, visible: Bindable<bool>) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Add a local binding.
    pub fn bind(mut self, path: &str, binding: Binding) -> Self {
        self.bindings.push((path.to_string(), binding));
        self
    }

    /// Add a redirect rule.
    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.push((from.to_string(), to.to_string()));
        self
    }

    /// Add a bindable property.
    pub fn property(mut self, key: &str, property: Property) -> Self {
        self.properties.insert(key.to_string(), property);
        self
    }

    /// Add a child template.
    pub fn child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Number of widgets an instance creates.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }

    /// Apply everything but the children to a fresh widget.
    fn apply(&self, core: &mut Core, id: NodeId) -> Result<()> {
        if let Some(name) = &self.name {
            core.set_name(id, name)?;
        }
        core.set_order(id, self.order)?;
        for (axis, decl) in &self.positions {
            core.set_position(id, *axis, decl.clone())?;
        }
        for (axis, decl) in &self.dimensions {
            core.set_dimension(id, *axis, decl.clone())?;
        }
        if let Some(visible) = &self.visible {
            core.set_visibility_binding(id, visible.independent_copy())?;
        }
        for (path, binding) in &self.bindings {
            core.set_binding(id, path, binding.clone())?;
        }
        for (from, to) in &self.redirects {
            core.add_redirect(id, from, to)?;
        }
        for (key, prop) in &self.properties {
            core.set_property(id, key, prop.independent_copy())?;
        }
        Ok(())
    }
}

impl Core {
    /// Create an instance of `template` under `parent` and return its top
    /// widget. On failure, nothing is left in the tree.
    pub fn instantiate(&mut self, parent: NodeId, template: &NodeTemplate) -> Result<NodeId> {
        let top = self.add_child(parent)?;
        let mut work = vec![(top, template)];
        while let Some((id, t)) = work.pop() {
            let built = t.apply(self, id).and_then(|()| {
                t.children
                    .iter()
                    .map(|c| Ok((self.add_child(id)?, c)))
                    .collect::<Result<Vec<_>>>()
            });
            match built {
                Ok(children) => work.extend(children.into_iter().rev()),
                Err(e) => {
                    self.remove_subtree(top)?;
                    return Err(e);
                }
            }
        }
        Ok(top)
    }
}
