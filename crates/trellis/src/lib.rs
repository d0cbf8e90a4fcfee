//! Trellis: incremental geometry resolution and reactive bindings for
//! retained-mode widget trees.
//!
//! Widgets declare, per axis, how their position and size are computed:
//! fixed offsets, proportions of the parent, anchoring to a named sibling,
//! intrinsic content size, or wrapping their children. Each call to
//! [`Core::update`] resolves only the quantities affected by what changed
//! since the last pass, and reports which widgets need redrawing.
//!
//! # Module Organization
//!
//! - [`layout`] - Declarations, dependency triples, and pass reports
//! - [`binding`] - Binding paths, scopes, and bindable values
//! - [`backend`] - The backend and identifier-lookup interfaces
//! - [`template`] - Reusable widget subtrees

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

pub mod binding;
pub mod layout;
pub mod template;

pub use core::{
    Config, Core, Node, NodeId, NodeName, Pending, Property, backend, config, error, name,
};
#[cfg(any(test, feature = "testing"))]
pub use core::testing;

pub use error::{Error, Result};
pub use geom;
pub use template::NodeTemplate;
