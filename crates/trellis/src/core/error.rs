use std::result::Result as StdResult;

use thiserror::Error;

use crate::NodeId;

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
///
/// Only structural operations on the widget tree return errors. Geometry
/// resolution and binding propagation degrade to safe defaults and log instead.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    #[error("node not found: {0:?}")]
    /// The handle does not refer to a live widget.
    NodeNotFound(NodeId),
    #[error("node already attached: {0:?}")]
    /// The widget already has a parent.
    AlreadyAttached(NodeId),
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    /// The child is an ancestor of the parent.
    WouldCreateCycle {
        /// Prospective parent.
        parent: NodeId,
        /// Prospective child.
        child: NodeId,
    },
    #[error("invalid operation: {0}")]
    /// Operation not permitted on this widget, e.g. removing the root.
    InvalidOperation(String),
    #[error("invalid name: {0}")]
    /// Identifier contains characters outside the node-name alphabet.
    InvalidName(String),
    #[error("invalid binding path: {0}")]
    /// Dotted binding path failed to parse.
    InvalidPath(String),
    #[error("geometry: {0}")]
    /// Geometry failure.
    Geometry(String),
}

impl From<geom::Error> for Error {
    fn from(e: geom::Error) -> Self {
        Self::Geometry(e.to_string())
    }
}
