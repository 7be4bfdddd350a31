// src/workflow/upload.rs
//! Upload page controller: one resume into the registry at a time.

use std::sync::{Arc, Mutex};

use tracing::warn;

use super::{lock, Notifier, Phase, StateSink};
use crate::core::ServiceClient;
use crate::types::request::ResumeFile;
use crate::types::response::UploadResult;

/// Observable state of the upload page.
#[derive(Debug, Clone, Default)]
pub struct UploadState {
    pub phase: Phase,
    pub result: Option<UploadResult>,
    pub error: Option<String>,
}

struct Inner {
    state: UploadState,
    generation: u64,
}

pub struct UploadWorkflow {
    client: Arc<ServiceClient>,
    inner: Mutex<Inner>,
    notifier: Notifier,
}

impl UploadWorkflow {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner {
                state: UploadState::default(),
                generation: 0,
            }),
            notifier: Notifier::default(),
        }
    }

    pub fn subscribe(&self, sink: Arc<dyn StateSink>) {
        self.notifier.subscribe(sink);
    }

    pub fn snapshot(&self) -> UploadState {
        lock(&self.inner).state.clone()
    }

    /// Upload one resume. A call while a previous upload is still in flight
    /// is a no-op; a file of the wrong type never reaches the network.
    pub async fn submit(&self, file: ResumeFile) {
        let generation = {
            let mut inner = lock(&self.inner);
            if inner.state.phase == Phase::InFlight {
                warn!("Upload already in flight; ignoring duplicate submission");
                return;
            }
            inner.generation += 1;
            inner.state.phase = Phase::Validating;
            inner.state.result = None;
            inner.state.error = None;
            inner.generation
        };
        self.notifier.phase(Phase::Validating);

        if let Err(err) = file.ensure_pdf() {
            self.fail(generation, err.to_string());
            return;
        }

        {
            let mut inner = lock(&self.inner);
            if inner.generation != generation {
                return;
            }
            inner.state.phase = Phase::InFlight;
        }
        self.notifier.phase(Phase::InFlight);

        match self.client.upload_resume(&file).await {
            Ok(result) => {
                let message = format!(
                    "Processed {} into {} chunks",
                    result.filename, result.chunks_processed
                );
                {
                    let mut inner = lock(&self.inner);
                    if inner.generation != generation {
                        return;
                    }
                    inner.state.phase = Phase::Succeeded;
                    inner.state.result = Some(result);
                }
                self.notifier.phase(Phase::Succeeded);
                self.notifier.notice(message);
            }
            Err(err) => self.fail(generation, err.to_string()),
        }
    }

    /// Back to Idle for another upload. A response still pending from before
    /// the reset is discarded when it lands.
    pub fn reset(&self) {
        {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            inner.state = UploadState::default();
        }
        self.notifier.phase(Phase::Idle);
    }

    fn fail(&self, generation: u64, message: String) {
        {
            let mut inner = lock(&self.inner);
            if inner.generation != generation {
                return;
            }
            inner.state.phase = Phase::Failed;
            inner.state.error = Some(message.clone());
        }
        self.notifier.phase(Phase::Failed);
        self.notifier.failure(message);
    }
}
