// src/workflow/mod.rs
//! Observable page controllers that sequence the pipeline operations.
//!
//! Each workflow is a small state machine over the phases below, with one
//! in-flight request at most and a subscription mechanism so a frontend can
//! render transitions without polling.

pub mod screen;
pub mod search;
pub mod tailor;
pub mod upload;

pub use screen::{ScreenState, ScreenWorkflow};
pub use search::{SearchState, SearchWorkflow};
pub use tailor::{TailorState, TailorWorkflow};
pub use upload::{UploadState, UploadWorkflow};

use std::sync::{Arc, Mutex, MutexGuard};

/// Request lifecycle of a single workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    InFlight,
    Succeeded,
    Failed,
}

/// What a subscriber sees as a workflow moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    Phase(Phase),
    Notice(String),
    Failure(String),
}

/// Receives workflow events; the rendering half of a controller.
pub trait StateSink: Send + Sync {
    fn emit(&self, event: WorkflowEvent);
}

/// Fan-out to every registered sink.
#[derive(Default)]
pub(crate) struct Notifier {
    sinks: Mutex<Vec<Arc<dyn StateSink>>>,
}

impl Notifier {
    pub(crate) fn subscribe(&self, sink: Arc<dyn StateSink>) {
        lock(&self.sinks).push(sink);
    }

    pub(crate) fn emit(&self, event: WorkflowEvent) {
        let sinks = lock(&self.sinks).clone();
        for sink in sinks {
            sink.emit(event.clone());
        }
    }

    pub(crate) fn phase(&self, phase: Phase) {
        self.emit(WorkflowEvent::Phase(phase));
    }

    pub(crate) fn notice(&self, message: impl Into<String>) {
        self.emit(WorkflowEvent::Notice(message.into()));
    }

    pub(crate) fn failure(&self, message: impl Into<String>) {
        self.emit(WorkflowEvent::Failure(message.into()));
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
