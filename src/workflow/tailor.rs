// src/workflow/tailor.rs
//! Two-phase tailor controller: preview the rewritten resume text, then
//! export it as a PDF.
//!
//! Unlike the other controllers this one owns its inputs, because editing
//! the job description or switching the resume source must discard any held
//! preview and return to Idle.

use std::sync::{Arc, Mutex};

use tracing::warn;

use super::{lock, Notifier, Phase, StateSink};
use crate::core::ServiceClient;
use crate::types::request::ResumeSource;
use crate::types::response::TailoredDraft;

/// Observable state of the tailor page. A held `draft` means the preview
/// phase completed and export is reachable.
#[derive(Debug, Clone, Default)]
pub struct TailorState {
    pub phase: Phase,
    pub job_description: String,
    pub source: Option<ResumeSource>,
    pub draft: Option<TailoredDraft>,
    pub error: Option<String>,
}

impl TailorState {
    pub fn preview_ready(&self) -> bool {
        self.draft.is_some()
    }
}

struct Inner {
    state: TailorState,
    generation: u64,
}

pub struct TailorWorkflow {
    client: Arc<ServiceClient>,
    inner: Mutex<Inner>,
    notifier: Notifier,
}

impl TailorWorkflow {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner {
                state: TailorState::default(),
                generation: 0,
            }),
            notifier: Notifier::default(),
        }
    }

    pub fn subscribe(&self, sink: Arc<dyn StateSink>) {
        self.notifier.subscribe(sink);
    }

    pub fn snapshot(&self) -> TailorState {
        lock(&self.inner).state.clone()
    }

    /// Edit the job description. Discards any held preview.
    pub fn set_job_description(&self, text: impl Into<String>) {
        {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            inner.state.job_description = text.into();
            inner.state.draft = None;
            inner.state.error = None;
            inner.state.phase = Phase::Idle;
        }
        self.notifier.phase(Phase::Idle);
    }

    /// Switch between the library and an uploaded file (or clear the
    /// selection). Discards any held preview.
    pub fn set_source(&self, source: Option<ResumeSource>) {
        {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            inner.state.source = source;
            inner.state.draft = None;
            inner.state.error = None;
            inner.state.phase = Phase::Idle;
        }
        self.notifier.phase(Phase::Idle);
    }

    /// Phase 1: produce the tailored draft text.
    pub async fn generate_preview(&self) {
        let (generation, job_description, source) = {
            let mut inner = lock(&self.inner);
            if inner.state.phase == Phase::InFlight {
                warn!("Tailor request already in flight; ignoring duplicate submission");
                return;
            }
            inner.generation += 1;
            inner.state.phase = Phase::Validating;
            inner.state.draft = None;
            inner.state.error = None;
            (
                inner.generation,
                inner.state.job_description.clone(),
                inner.state.source.clone(),
            )
        };
        self.notifier.phase(Phase::Validating);

        if job_description.trim().is_empty() {
            self.fail(generation, "Please provide a job description".to_string());
            return;
        }
        let source = match source {
            Some(source) => source,
            None => {
                self.fail(
                    generation,
                    "Please select a resume from your library or upload one".to_string(),
                );
                return;
            }
        };

        {
            let mut inner = lock(&self.inner);
            if inner.generation != generation {
                return;
            }
            inner.state.phase = Phase::InFlight;
        }
        self.notifier.phase(Phase::InFlight);

        match self.client.tailor_resume(&job_description, &source).await {
            Ok(draft) => {
                {
                    let mut inner = lock(&self.inner);
                    if inner.generation != generation {
                        return;
                    }
                    inner.state.phase = Phase::Succeeded;
                    inner.state.draft = Some(draft);
                }
                self.notifier.phase(Phase::Succeeded);
                self.notifier.notice("Preview generated successfully!");
            }
            Err(err) => self.fail(generation, err.to_string()),
        }
    }

    /// Phase 2: export the held draft as a PDF. Only reachable once a
    /// preview is held; the caller saves the returned bytes. The draft stays
    /// held so the export can be repeated.
    pub async fn export_pdf(&self) -> Option<Vec<u8>> {
        let (generation, draft) = {
            let mut inner = lock(&self.inner);
            if inner.state.phase == Phase::InFlight {
                warn!("Export already in flight; ignoring duplicate submission");
                return None;
            }
            inner.generation += 1;
            inner.state.error = None;
            (inner.generation, inner.state.draft.clone())
        };

        let draft = match draft {
            Some(draft) => draft,
            None => {
                self.fail(generation, "No preview to download".to_string());
                return None;
            }
        };

        {
            let mut inner = lock(&self.inner);
            if inner.generation != generation {
                return None;
            }
            inner.state.phase = Phase::InFlight;
        }
        self.notifier.phase(Phase::InFlight);

        match self.client.generate_pdf(&draft.tailored_text).await {
            Ok(bytes) => {
                {
                    let mut inner = lock(&self.inner);
                    if inner.generation != generation {
                        return None;
                    }
                    inner.state.phase = Phase::Succeeded;
                }
                self.notifier.phase(Phase::Succeeded);
                self.notifier.notice("PDF downloaded successfully!");
                Some(bytes)
            }
            Err(err) => {
                self.fail(generation, err.to_string());
                None
            }
        }
    }

    /// Drop the held preview without touching the inputs.
    pub fn discard_preview(&self) {
        {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            inner.state.draft = None;
            inner.state.phase = Phase::Idle;
        }
        self.notifier.phase(Phase::Idle);
    }

    pub fn reset(&self) {
        {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            inner.state = TailorState::default();
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
