//! Declarations and the incremental geometry resolver.

/// Position and dimension declarations.
mod decl;
/// Dependency triples and dependent edges.
mod deps;
/// Declaration evaluation.
mod eval;
/// Pass reports.
mod report;
/// The update driver.
mod resolver;

pub use decl::{Dimension, Position};
pub use deps::{Dependents, Kind, Triple};
pub use report::{FrameReport, UpdateOutcome};
