//! Reactive bindings: paths, scopes, and bindable value cells.

/// Bindable value cells.
mod bindable;
/// Binding maps and lookup scopes.
mod context;
/// Dotted binding paths.
mod path;
/// Propagation of binding changes through the tree.
pub(crate) mod propagate;
/// Values and opaque sources.
mod value;

pub use bindable::Bindable;
pub use context::{Binding, BindingContext, Bindings, DirtyKeys, Redirect, Sources, Transform};
pub use path::BindPath;
pub use value::{FromValue, Source, Value};
