//! Event recording
//!
//! [`EventRecorder`] is a ready-made subscriber that keeps every event it sees,
//! in order. Editors use it as the raw material for an undo log or an
//! activity feed; tests use it to assert on the exact notification trail of
//! an operation.

use super::{EventKind, GraphEvent, NotificationBus, SubscriptionId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct RecorderState {
    events: Mutex<Vec<GraphEvent>>,
    recording: AtomicBool,
}

/// Shared, cloneable event log. Clones observe the same log.
#[derive(Debug, Clone)]
pub struct EventRecorder {
    state: Arc<RecorderState>,
}

impl Default for EventRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRecorder {
    /// Create a recorder that starts in the recording state
    pub fn new() -> Self {
        Self {
            state: Arc::new(RecorderState {
                events: Mutex::new(Vec::new()),
                recording: AtomicBool::new(true),
            }),
        }
    }

    /// Subscribe this recorder to every event kind on `bus`
    pub fn attach(&self, bus: &mut NotificationBus) -> SubscriptionId {
        let recorder = self.clone();
        bus.subscribe_all(move |event| {
            recorder.record(event);
            Ok(())
        })
    }

    /// Subscribe this recorder to the given kinds only
    pub fn attach_kinds(&self, bus: &mut NotificationBus, kinds: &[EventKind]) -> Vec<SubscriptionId> {
        kinds
            .iter()
            .map(|&kind| {
                let recorder = self.clone();
                bus.subscribe(kind, move |event| {
                    recorder.record(event);
                    Ok(())
                })
            })
            .collect()
    }

    fn record(&self, event: &GraphEvent) {
        if self.is_recording() {
            self.state.events.lock().push(event.clone());
        }
    }

    /// Resume capturing events
    pub fn start(&self) {
        self.state.recording.store(true, Ordering::Release);
    }

    /// Pause capturing; events published meanwhile are dropped
    pub fn stop(&self) {
        self.state.recording.store(false, Ordering::Release);
    }

    pub fn is_recording(&self) -> bool {
        self.state.recording.load(Ordering::Acquire)
    }

    /// Copy of the captured events, oldest first
    pub fn events(&self) -> Vec<GraphEvent> {
        self.state.events.lock().clone()
    }

    /// Kinds of the captured events, oldest first
    pub fn kinds(&self) -> Vec<EventKind> {
        self.state.events.lock().iter().map(GraphEvent::kind).collect()
    }

    /// Take the captured events, leaving the log empty
    pub fn drain(&self) -> Vec<GraphEvent> {
        std::mem::take(&mut *self.state.events.lock())
    }

    pub fn clear(&self) {
        self.state.events.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.state.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
