//! Change notifications emitted by a [`Scene`](crate::Scene)

use crate::ObjectId;
use dataviz3d_core::{Rect, ScreenPoint, Size};
use serde::Serialize;

/// A value-changing mutation of the scene.
///
/// Events are delivered synchronously from inside the mutating call, after
/// the new value and every value derived from it are in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SceneEvent {
    ViewportChanged(Rect),
    PrimarySubViewportChanged(Rect),
    SecondarySubViewportChanged(Rect),
    SecondarySubviewOnTopChanged(bool),
    SelectionQueryPositionChanged(ScreenPoint),
    SlicingActiveChanged(bool),
    WindowSizeChanged(Size),
    ActiveCameraChanged(ObjectId),
    ActiveLightChanged(ObjectId),
    DevicePixelRatioChanged(f32),
    /// Something visible changed and the renderer should draw a new frame
    NeedRender,
}

/// Handle returned by [`Scene::subscribe`](crate::Scene::subscribe)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type SceneListener = Box<dyn FnMut(&SceneEvent) + Send>;

/// Ordered list of scene listeners
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, SceneListener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: SceneListener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn emit(&mut self, event: SceneEvent) {
        for (_, listener) in self.entries.iter_mut() {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_listeners_add_emit_remove() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::default();

        let sink = Arc::clone(&seen);
        let id = listeners.add(Box::new(move |event| sink.lock().unwrap().push(*event)));
        assert_eq!(listeners.len(), 1);

        listeners.emit(SceneEvent::NeedRender);
        assert_eq!(seen.lock().unwrap().as_slice(), &[SceneEvent::NeedRender]);

        assert!(listeners.remove(id));
        assert!(!listeners.remove(id));
        listeners.emit(SceneEvent::SlicingActiveChanged(true));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
