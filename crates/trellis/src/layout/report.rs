use indexmap::IndexSet;

use super::deps::Triple;
use crate::NodeId;

/// What one update pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Pass number, starting at 1.
    pub pass: u64,
    /// Widgets whose resolved position or dimension changed.
    pub geometry_changed: IndexSet<NodeId>,
    /// Widgets whose content changed independent of geometry: property
    /// updates, visibility flips, and explicit content marks.
    pub content_changed: IndexSet<NodeId>,
    /// Every triple resolved, in resolution order.
    pub resolved: Vec<Triple>,
    /// Size of the required set.
    pub required: usize,
    /// Number of bindable values that changed.
    pub binding_updates: usize,
    /// Marks made during the pass and carried to the next one.
    pub deferred: usize,
}

impl FrameReport {
    /// Number of triples resolved.
    pub fn resolve_count(&self) -> usize {
        self.resolved.len()
    }

    /// True if the pass changed nothing a backend needs to redraw.
    pub fn is_empty(&self) -> bool {
        self.geometry_changed.is_empty() && self.content_changed.is_empty()
    }

    /// True if `node` needs to be redrawn.
    pub fn needs_redraw(&self, node: NodeId) -> bool {
        self.geometry_changed.contains(&node) || self.content_changed.contains(&node)
    }
}

/// Result of a call to [`Core::update`](crate::Core::update).
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The pass ran.
    Completed(FrameReport),
    /// Another pass was already running. Nothing was done.
    Skipped,
}

impl UpdateOutcome {
    /// The report, if the pass ran.
    pub fn report(&self) -> Option<&FrameReport> {
        match self {
            Self::Completed(r) => Some(r),
            Self::Skipped => None,
        }
    }

    /// Consume the outcome, returning the report or an empty one if skipped.
    pub fn into_report(self) -> FrameReport {
        match self {
            Self::Completed(r) => r,
            Self::Skipped => FrameReport::default(),
        }
    }

    /// True if the pass was skipped by the re-entrancy guard.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }
}
