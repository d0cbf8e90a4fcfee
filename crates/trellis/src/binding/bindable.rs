use std::fmt::Debug;

use tracing::warn;

use super::{
    context::BindingContext,
    path::BindPath,
    value::{FromValue, Value},
};

/// Where a bindable gets its value from.
#[derive(Debug, Clone, PartialEq)]
enum Origin<T> {
    /// A constant.
    Constant(T),
    /// A path resolved through the binding context.
    Bound {
        /// Path to resolve.
        path: BindPath,
        /// Used until the path first resolves.
        fallback: T,
    },
}

/// An observable value cell that re-derives itself from a binding context.
#[derive(Debug, Clone, PartialEq)]
pub struct Bindable<T> {
    /// Value source.
    origin: Origin<T>,
    /// Last derived value, `None` until the first update.
    value: Option<T>,
}

impl<T> Bindable<T>
where
    T: FromValue + Clone + PartialEq + Debug,
{
    /// A bindable holding a constant.
    pub fn constant(v: T) -> Self {
        Self {
            origin: Origin::Constant(v),
            value: None,
        }
    }

    /// A bindable reading `path`, reporting `fallback` until the path resolves.
    pub fn bound(path: BindPath, fallback: T) -> Self {
        Self {
            origin: Origin::Bound { path, fallback },
            value: None,
        }
    }

    /// The current value. Before the first update this is the constant or the
    /// fallback.
    pub fn get(&self) -> &T {
        match (&self.value, &self.origin) {
            (Some(v), _) => v,
            (None, Origin::Constant(v)) => v,
            (None, Origin::Bound { fallback, .. }) => fallback,
        }
    }

    /// True once an update has stored a value.
    pub fn is_populated(&self) -> bool {
        self.value.is_some()
    }

    /// The bound path, if any.
    pub fn path(&self) -> Option<&BindPath> {
        match &self.origin {
            Origin::Bound { path, .. } => Some(path),
            Origin::Constant(_) => None,
        }
    }

    /// Replace the source with a constant and take the value immediately.
    /// Returns `true` if the current value changed.
    pub fn set(&mut self, v: T) -> bool {
        let changed = self.get() != &v;
        self.value = Some(v.clone());
        self.origin = Origin::Constant(v);
        changed
    }

    /// Re-derive the value from `ctx`. Returns `true` if it changed, which
    /// includes the first population.
    ///
    /// Bound values whose path is not dirty in `ctx` are not re-derived. A path
    /// that fails to resolve keeps the previous value; a value of the wrong type
    /// is logged and also keeps the previous value.
    pub fn update(&mut self, ctx: &BindingContext<'_>) -> bool {
        let next = match &self.origin {
            Origin::Constant(v) => v.clone(),
            Origin::Bound { path, fallback } => {
                if self.value.is_some() && !ctx.should_update(path) {
                    return false;
                }
                match ctx.lookup(path) {
                    Some(v) => match T::from_value(&v) {
                        Some(t) => t,
                        None => {
                            warn!(path = %path, value = ?v, node = ?ctx.node(), "binding type mismatch");
                            self.value.clone().unwrap_or_else(|| fallback.clone())
                        }
                    },
                    None => self.value.clone().unwrap_or_else(|| fallback.clone()),
                }
            }
        };
        if self.value.as_ref() == Some(&next) {
            return false;
        }
        self.value = Some(next);
        true
    }

    /// An unpopulated copy sharing no state with this one. Templates hand these
    /// out to each instance.
    pub fn independent_copy(&self) -> Self {
        Self {
            origin: self.origin.clone(),
            value: None,
        }
    }
}

impl<T> Default for Bindable<T>
where
    T: FromValue + Clone + PartialEq + Debug + Default,
{
    fn default() -> Self {
        Self::constant(T::default())
    }
}

impl From<Value> for Bindable<Value> {
    fn from(v: Value) -> Self {
        Self::constant(v)
    }
}
