//! The widget arena and the types stored in it.

/// Content and rendering backends.
pub mod backend;
/// Engine configuration.
pub mod config;
/// Core error types.
pub mod error;
/// Node ID types.
pub mod id;
/// Widget names.
pub mod name;
/// Widget data.
pub mod node;
/// Pending recalculation flags.
pub mod pending;
/// Testing utilities.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// The arena and its structural operations.
pub mod world;

pub use config::Config;
pub use id::NodeId;
pub use name::NodeName;
pub use node::{Node, Property};
pub use pending::Pending;
pub use world::Core;
