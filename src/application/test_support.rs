//! Shared fakes for use case tests

use std::sync::{Arc, Mutex};

use crate::domain::ports::{PipelineEvent, PipelineEventSink};

/// Event sink that keeps every event for later assertions
#[derive(Clone, Default)]
pub struct RecordingEventSink {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl PipelineEventSink for RecordingEventSink {
    fn on_event(&self, event: PipelineEvent) {
        self.events.lock().unwrap().push(event);
    }
}
