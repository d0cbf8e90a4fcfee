use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use geom::{Axis, Insets};

use crate::{
    Core, NodeId,
    backend::{Backend, SizeBounds},
    layout::UpdateOutcome,
};

/// Intrinsic sizes served by [`FixedContent`].
#[derive(Debug, Default)]
pub struct ContentSizes {
    /// Size per widget and axis.
    pub sizes: HashMap<(NodeId, Axis), f32>,
    /// Number of intrinsic size queries answered.
    pub queries: usize,
}

impl ContentSizes {
    /// Set the intrinsic size of a widget on one axis.
    pub fn set(&mut self, node: NodeId, axis: Axis, size: f32) {
        self.sizes.insert((node, axis), size);
    }
}

/// A content backend reporting preset intrinsic sizes.
pub struct FixedContent {
    /// Shared size table.
    pub sizes: Arc<Mutex<ContentSizes>>,
}

impl FixedContent {
    /// Create a backend and a handle to its size table.
    pub fn create() -> (Arc<Mutex<ContentSizes>>, Self) {
        let sizes = Arc::new(Mutex::new(ContentSizes::default()));
        (sizes.clone(), Self { sizes })
    }
}

impl Backend for FixedContent {
    fn name(&self) -> &str {
        "fixed_content"
    }

    fn intrinsic_size(
        &self,
        _core: &Core,
        node: NodeId,
        axis: Axis,
        _bounds: SizeBounds,
    ) -> Option<f32> {
        let mut sizes = self.sizes.lock().unwrap();
        sizes.queries += 1;
        sizes.sizes.get(&(node, axis)).copied()
    }
}

/// A content backend sizing runs of fixed-width glyphs: one unit per glyph
/// across, wrapped to the resolved width when the height is intrinsic.
pub struct TextContent {
    /// Glyph count per widget.
    pub glyphs: Arc<Mutex<HashMap<NodeId, usize>>>,
}

impl TextContent {
    /// Create a backend and a handle to its glyph table.
    pub fn create() -> (Arc<Mutex<HashMap<NodeId, usize>>>, Self) {
        let glyphs = Arc::new(Mutex::new(HashMap::new()));
        (glyphs.clone(), Self { glyphs })
    }
}

impl Backend for TextContent {
    fn name(&self) -> &str {
        "text_content"
    }

    fn intrinsic_size(
        &self,
        _core: &Core,
        node: NodeId,
        axis: Axis,
        bounds: SizeBounds,
    ) -> Option<f32> {
        let len = *self.glyphs.lock().unwrap().get(&node)? as f32;
        match axis {
            Axis::X => Some(len),
            _ => match bounds.cross {
                Some(width) if width >= 1.0 => Some((len / width.floor()).ceil()),
                _ => Some(1.0),
            },
        }
    }
}

/// A backend drawing fixed chrome around selected widgets.
pub struct Chrome {
    /// Insets per widget and axis.
    pub insets: Arc<Mutex<HashMap<(NodeId, Axis), Insets>>>,
}

impl Chrome {
    /// Create a backend and a handle to its inset table.
    pub fn create() -> (Arc<Mutex<HashMap<(NodeId, Axis), Insets>>>, Self) {
        let insets = Arc::new(Mutex::new(HashMap::new()));
        (insets.clone(), Self { insets })
    }
}

impl Backend for Chrome {
    fn name(&self) -> &str {
        "chrome"
    }

    fn client_insets(&self, _core: &Core, node: NodeId, axis: Axis) -> Insets {
        self.insets
            .lock()
            .unwrap()
            .get(&(node, axis))
            .copied()
            .unwrap_or(Insets::ZERO)
    }
}

/// Notifications captured by [`Recorder`].
#[derive(Debug, Default)]
pub struct Recorded {
    /// Geometry-changed notifications, in delivery order.
    pub geometry: Vec<NodeId>,
    /// Content-changed notifications, in delivery order.
    pub content: Vec<NodeId>,
}

impl Recorded {
    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.geometry.clear();
        self.content.clear();
    }
}

/// A backend that records every notification.
pub struct Recorder {
    /// Shared record.
    pub record: Arc<Mutex<Recorded>>,
}

impl Recorder {
    /// Create a backend and a handle to its record.
    pub fn create() -> (Arc<Mutex<Recorded>>, Self) {
        let record = Arc::new(Mutex::new(Recorded::default()));
        (record.clone(), Self { record })
    }
}

impl Backend for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    fn geometry_changed(&mut self, _core: &mut Core, node: NodeId) {
        self.record.lock().unwrap().geometry.push(node);
    }

    fn content_changed(&mut self, _core: &mut Core, node: NodeId) {
        self.record.lock().unwrap().content.push(node);
    }
}

/// What [`Reentrant`] saw when it called back into the core.
#[derive(Debug, Default)]
pub struct Reentry {
    /// Outcome of every nested update call.
    pub outcomes: Vec<bool>,
}

/// A backend that, when `trigger` changes geometry, tries to run a nested
/// pass and marks `target` content-changed.
pub struct Reentrant {
    /// Widget whose geometry change triggers the callback.
    pub trigger: NodeId,
    /// Widget marked from inside the callback.
    pub target: NodeId,
    /// Shared record of nested outcomes; `true` means the nested call was
    /// skipped.
    pub seen: Arc<Mutex<Reentry>>,
}

impl Reentrant {
    /// Create a backend and a handle to its record.
    pub fn create(trigger: NodeId, target: NodeId) -> (Arc<Mutex<Reentry>>, Self) {
        let seen = Arc::new(Mutex::new(Reentry::default()));
        (
            seen.clone(),
            Self {
                trigger,
                target,
                seen,
            },
        )
    }
}

impl Backend for Reentrant {
    fn name(&self) -> &str {
        "reentrant"
    }

    fn geometry_changed(&mut self, core: &mut Core, node: NodeId) {
        if node != self.trigger {
            return;
        }
        let outcome = core.update();
        self.seen
            .lock()
            .unwrap()
            .outcomes
            .push(matches!(outcome, UpdateOutcome::Skipped));
        core.mark_content_changed(self.target).unwrap();
    }
}
