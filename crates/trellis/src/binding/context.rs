use std::{collections::HashSet, fmt, rc::Rc};

use indexmap::IndexMap;
use tracing::warn;

use super::{
    path::{BindPath, call_name},
    value::Value,
};
use crate::NodeId;

/// Function applied to the target value of a pointer binding.
pub type Transform = Rc<dyn Fn(&Value) -> Value>;

/// Named external state objects, consulted when no widget binds a path.
pub type Sources = IndexMap<String, Value>;

/// One entry in a widget's binding map.
#[derive(Clone)]
pub enum Binding {
    /// A literal value.
    Value(Value),
    /// An alias for another path, optionally transformed. Pointers resolve
    /// transitively.
    Pointer {
        /// Path the pointer refers to.
        path: BindPath,
        /// Applied to the resolved target.
        transform: Option<Transform>,
    },
}

impl Binding {
    /// A literal binding.
    pub fn value(v: impl Into<Value>) -> Self {
        Self::Value(v.into())
    }

    /// A pointer to another path.
    pub fn pointer(path: BindPath) -> Self {
        Self::Pointer {
            path,
            transform: None,
        }
    }

    /// A pointer to another path with a transform.
    pub fn pointer_with(path: BindPath, f: impl Fn(&Value) -> Value + 'static) -> Self {
        Self::Pointer {
            path,
            transform: Some(Rc::new(f)),
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Pointer { path, transform } => f
                .debug_struct("Pointer")
                .field("path", &path.to_string())
                .field("transform", &transform.is_some())
                .finish(),
        }
    }
}

/// A prefix rewrite applied before local lookup: a path starting with `from`
/// is looked up as `to` followed by the remaining segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Prefix to match.
    pub from: BindPath,
    /// Replacement prefix.
    pub to: BindPath,
}

/// A widget's local bindings and redirect rules.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    /// Bindings keyed by canonical dotted path.
    map: IndexMap<String, Binding>,
    /// Redirect rules, tried in order.
    redirects: Vec<Redirect>,
}

impl Bindings {
    /// Construct an empty binding map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a path, replacing any previous binding.
    pub fn set(&mut self, path: &BindPath, binding: Binding) -> Option<Binding> {
        self.map.insert(path.key(), binding)
    }

    /// Remove a binding.
    pub fn remove(&mut self, path: &BindPath) -> Option<Binding> {
        self.map.shift_remove(&path.key())
    }

    /// The binding at exactly this path.
    pub fn get(&self, path: &BindPath) -> Option<&Binding> {
        self.map.get(&path.key())
    }

    /// Add a redirect rule.
    pub fn redirect(&mut self, from: BindPath, to: BindPath) {
        self.redirects.push(Redirect { from, to });
    }

    /// Apply the first matching redirect rule.
    pub fn rewrite(&self, path: &BindPath) -> Option<BindPath> {
        self.redirects
            .iter()
            .find_map(|r| path.rebase(&r.from, &r.to))
    }

    /// True if there are no bindings and no redirects.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty() && self.redirects.is_empty()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.map.len()
    }
}

/// The set of paths whose values may have changed since the last pass.
#[derive(Debug, Clone, Default)]
pub struct DirtyKeys {
    /// Everything is dirty.
    all: bool,
    /// Individual dirty paths.
    keys: HashSet<BindPath>,
}

impl DirtyKeys {
    /// No dirty keys.
    pub fn new() -> Self {
        Self::default()
    }

    /// The "everything is dirty" sentinel.
    pub fn everything() -> Self {
        Self {
            all: true,
            keys: HashSet::new(),
        }
    }

    /// Mark one path dirty.
    pub fn mark(&mut self, path: BindPath) {
        if !self.all {
            self.keys.insert(path);
        }
    }

    /// Mark everything dirty.
    pub fn mark_all(&mut self) {
        self.all = true;
        self.keys.clear();
    }

    /// True if nothing is dirty.
    pub fn is_empty(&self) -> bool {
        !self.all && self.keys.is_empty()
    }

    /// True if a value read through `path` may have changed: the path itself,
    /// one of its ancestors, or one of its descendants is dirty.
    pub fn affects(&self, path: &BindPath) -> bool {
        self.all
            || self
                .keys
                .iter()
                .any(|k| path.starts_with(k) || k.starts_with(path))
    }

    /// Merge another set into this one.
    pub fn extend(&mut self, other: Self) {
        if other.all {
            self.mark_all();
        } else {
            for k in other.keys {
                self.mark(k);
            }
        }
    }
}

/// A parent-chained lookup scope for one widget during one propagation pass.
///
/// Lookups check this widget's bindings first, then each ancestor's, and
/// finally the named external sources.
#[derive(Clone, Copy)]
pub struct BindingContext<'a> {
    /// Widget this scope belongs to. `None` for the root scope.
    node: Option<NodeId>,
    /// Bindings declared on the widget.
    locals: Option<&'a Bindings>,
    /// Enclosing scope.
    parent: Option<&'a BindingContext<'a>>,
    /// External state.
    sources: &'a Sources,
    /// Paths changed since the last pass.
    dirty: &'a DirtyKeys,
    /// Re-derive every bindable regardless of dirtiness.
    force: bool,
    /// Maximum pointer and redirect chain length.
    max_depth: usize,
}

impl<'a> BindingContext<'a> {
    /// The outermost scope, which only sees external sources.
    pub fn root(sources: &'a Sources, dirty: &'a DirtyKeys, max_depth: usize) -> Self {
        Self {
            node: None,
            locals: None,
            parent: None,
            sources,
            dirty,
            force: false,
            max_depth,
        }
    }

    /// A nested scope for a widget.
    pub fn child(&'a self, node: NodeId, locals: &'a Bindings) -> Self {
        Self {
            node: Some(node),
            locals: Some(locals),
            parent: Some(self),
            ..*self
        }
    }

    /// A copy of this scope with the force flag set.
    pub fn forced(self, force: bool) -> Self {
        Self {
            force: self.force || force,
            ..self
        }
    }

    /// The widget this scope belongs to.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// True if every bindable must be re-derived.
    pub fn force(&self) -> bool {
        self.force
    }

    /// True if a bindable reading `path` must be re-derived: forced, or the
    /// path or anything it aliases is dirty.
    pub fn should_update(&self, path: &BindPath) -> bool {
        if self.force || self.dirty.affects(path) {
            return true;
        }
        self.aliases(path).iter().any(|p| self.dirty.affects(p))
    }

    /// Resolve a path to a value, following pointers and redirects.
    pub fn lookup(&self, path: &BindPath) -> Option<Value> {
        self.lookup_depth(path, 0)
    }

    /// Find the binding declared for exactly `path` in this scope or an
    /// enclosing one, without evaluating pointers.
    pub fn lookup_raw(&self, path: &BindPath) -> Option<&'a Binding> {
        let mut scope = Some(self);
        while let Some(ctx) = scope {
            if let Some(b) = ctx.locals.and_then(|l| l.get(path)) {
                return Some(b);
            }
            scope = ctx.parent;
        }
        None
    }

    /// Every path that `path` is rewritten to through redirects and pointers.
    fn aliases(&self, path: &BindPath) -> Vec<BindPath> {
        let mut out = Vec::new();
        let mut current = path.clone();
        while out.len() < self.max_depth {
            let Some(next) = self.alias_once(&current) else {
                break;
            };
            if next == current || out.contains(&next) {
                break;
            }
            out.push(next.clone());
            current = next;
        }
        out
    }

    /// Apply one redirect or pointer step to a path.
    fn alias_once(&self, path: &BindPath) -> Option<BindPath> {
        let mut scope = Some(self);
        while let Some(ctx) = scope {
            if let Some(locals) = ctx.locals {
                if let Some(p) = locals.rewrite(path) {
                    return Some(p);
                }
                for n in (1..=path.len()).rev() {
                    let prefix = path.prefix(n);
                    if let Some(Binding::Pointer { path: target, .. }) = locals.get(&prefix) {
                        return path.rebase(&prefix, target);
                    }
                }
            }
            scope = ctx.parent;
        }
        None
    }

    /// Lookup with an explicit chain depth.
    fn lookup_depth(&self, path: &BindPath, depth: usize) -> Option<Value> {
        if depth > self.max_depth {
            warn!(path = %path, "binding pointer chain too deep");
            return None;
        }
        if let Some(locals) = self.locals {
            if let Some(rewritten) = locals.rewrite(path) {
                return self.lookup_depth(&rewritten, depth + 1);
            }
            if let Some(binding) = locals.get(path) {
                return self.evaluate(path, binding, depth);
            }
            for n in 1..path.len() {
                let prefix = path.prefix(n);
                let Some(binding) = locals.get(&prefix) else {
                    continue;
                };
                // Only a complex value can answer the rest of the path.
                match self.evaluate(&prefix, binding, depth) {
                    Some(base) if base.is_complex() => {
                        return sub_access(base, &path.segments()[n..]);
                    }
                    _ => continue,
                }
            }
        }
        match self.parent {
            Some(parent) => parent.lookup_depth(path, depth),
            None => {
                let base = self.sources.get(path.head())?.clone();
                sub_access(base, &path.segments()[1..])
            }
        }
    }

    /// Evaluate a binding found at `key` in this scope.
    fn evaluate(&self, key: &BindPath, binding: &Binding, depth: usize) -> Option<Value> {
        match binding {
            Binding::Value(v) => Some(v.clone()),
            Binding::Pointer { path, transform } => {
                // A pointer into its own key refers to the enclosing scope.
                let v = if path.starts_with(key) {
                    match self.parent {
                        Some(parent) => parent.lookup_depth(path, depth + 1),
                        None => self.sources.get(path.head()).cloned().and_then(|base| {
                            sub_access(base, &path.segments()[1..])
                        }),
                    }
                } else {
                    self.lookup_depth(path, depth + 1)
                }?;
                Some(match transform {
                    Some(f) => f(&v),
                    None => v,
                })
            }
        }
    }
}

/// Resolve the remaining segments of a path against a value.
fn sub_access(base: Value, rest: &[String]) -> Option<Value> {
    let mut v = base;
    for seg in rest {
        v = match call_name(seg) {
            Some(name) => v.call(name)?,
            None => v.field(seg)?,
        };
    }
    Some(v)
}
