// src/workflow/screen.rs
//! Screener page controller: one stored resume against one job description.

use std::sync::{Arc, Mutex};

use tracing::warn;

use super::{lock, Notifier, Phase, StateSink};
use crate::core::ServiceClient;
use crate::types::response::ScreeningResult;

/// Observable state of the screener page.
#[derive(Debug, Clone, Default)]
pub struct ScreenState {
    pub phase: Phase,
    pub result: Option<ScreeningResult>,
    pub error: Option<String>,
}

struct Inner {
    state: ScreenState,
    generation: u64,
}

pub struct ScreenWorkflow {
    client: Arc<ServiceClient>,
    inner: Mutex<Inner>,
    notifier: Notifier,
}

impl ScreenWorkflow {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner {
                state: ScreenState::default(),
                generation: 0,
            }),
            notifier: Notifier::default(),
        }
    }

    pub fn subscribe(&self, sink: Arc<dyn StateSink>) {
        self.notifier.subscribe(sink);
    }

    pub fn snapshot(&self) -> ScreenState {
        lock(&self.inner).state.clone()
    }

    /// Screen a stored resume. Both inputs are required before anything
    /// leaves this machine; a missing one blocks with a message and no
    /// network call.
    pub async fn submit(&self, job_description: &str, resume_filename: &str) {
        let generation = {
            let mut inner = lock(&self.inner);
            if inner.state.phase == Phase::InFlight {
                warn!("Screening already in flight; ignoring duplicate submission");
                return;
            }
            inner.generation += 1;
            inner.state.phase = Phase::Validating;
            inner.state.result = None;
            inner.state.error = None;
            inner.generation
        };
        self.notifier.phase(Phase::Validating);

        if job_description.trim().is_empty() {
            self.fail(generation, "Please enter a job description".to_string());
            return;
        }
        if resume_filename.trim().is_empty() {
            self.fail(
                generation,
                "Please select a resume from your library".to_string(),
            );
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

        match self
            .client
            .screen_candidate(job_description, resume_filename)
            .await
        {
            Ok(result) => {
                {
                    let mut inner = lock(&self.inner);
                    if inner.generation != generation {
                        return;
                    }
                    inner.state.phase = Phase::Succeeded;
                    inner.state.result = Some(result);
                }
                self.notifier.phase(Phase::Succeeded);
                self.notifier.notice("Screening complete!");
            }
            Err(err) => self.fail(generation, err.to_string()),
        }
    }

    pub fn reset(&self) {
        {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            inner.state = ScreenState::default();
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
