// src/workflow/search.rs
//! Search-and-rank page controller.

use std::sync::{Arc, Mutex};

use tracing::warn;

use super::{lock, Notifier, Phase, StateSink};
use crate::core::ServiceClient;
use crate::types::response::{RankedCandidate, SearchOutcome};

/// Observable state of the search page. `preview` is the candidate whose
/// detail view is open, if any.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub phase: Phase,
    pub outcome: Option<SearchOutcome>,
    pub preview: Option<RankedCandidate>,
    pub error: Option<String>,
}

struct Inner {
    state: SearchState,
    generation: u64,
}

pub struct SearchWorkflow {
    client: Arc<ServiceClient>,
    inner: Mutex<Inner>,
    notifier: Notifier,
}

impl SearchWorkflow {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner {
                state: SearchState::default(),
                generation: 0,
            }),
            notifier: Notifier::default(),
        }
    }

    pub fn subscribe(&self, sink: Arc<dyn StateSink>) {
        self.notifier.subscribe(sink);
    }

    pub fn snapshot(&self) -> SearchState {
        lock(&self.inner).state.clone()
    }

    /// Run the ranked search. An empty candidate set is a success with the
    /// server's explanatory message, not a failure.
    pub async fn submit(&self, job_description: &str) {
        let generation = {
            let mut inner = lock(&self.inner);
            if inner.state.phase == Phase::InFlight {
                warn!("Search already in flight; ignoring duplicate submission");
                return;
            }
            inner.generation += 1;
            inner.state.phase = Phase::Validating;
            inner.state.outcome = None;
            inner.state.preview = None;
            inner.state.error = None;
            inner.generation
        };
        self.notifier.phase(Phase::Validating);

        if job_description.trim().is_empty() {
            self.fail(generation, "Please enter a job description".to_string());
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

        match self.client.search_candidates(job_description).await {
            Ok(outcome) => {
                let message = if outcome.is_empty() {
                    outcome
                        .message
                        .clone()
                        .unwrap_or_else(|| "No candidates found. Upload resumes first!".to_string())
                } else {
                    format!("Found {} top candidates", outcome.count)
                };
                {
                    let mut inner = lock(&self.inner);
                    if inner.generation != generation {
                        return;
                    }
                    inner.state.phase = Phase::Succeeded;
                    inner.state.outcome = Some(outcome);
                }
                self.notifier.phase(Phase::Succeeded);
                self.notifier.notice(message);
            }
            Err(err) => self.fail(generation, err.to_string()),
        }
    }

    /// Open the detail view for a ranked candidate. Pure local transition;
    /// no network call.
    pub fn select_candidate(&self, rank: u32) -> Option<RankedCandidate> {
        let mut inner = lock(&self.inner);
        let candidate = inner
            .state
            .outcome
            .as_ref()?
            .candidates
            .iter()
            .find(|candidate| candidate.rank == rank)
            .cloned()?;
        inner.state.preview = Some(candidate.clone());
        Some(candidate)
    }

    /// Close the detail view, leaving the ranked list untouched.
    pub fn close_preview(&self) {
        lock(&self.inner).state.preview = None;
    }

    pub fn reset(&self) {
        {
            let mut inner = lock(&self.inner);
            inner.generation += 1;
            inner.state = SearchState::default();
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
