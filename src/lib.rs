// src/lib.rs
//! Client core for an AI-assisted recruiting service: typed pipeline
//! operations over the remote API, observable per-page workflow state
//! machines, and a read-through resume registry accessor.

pub mod core;
pub mod endpoint;
pub mod error;
pub mod registry;
pub mod types;
pub mod workflow;

pub use crate::core::ServiceClient;
pub use crate::endpoint::Endpoint;
pub use crate::error::{ApiError, ApiResult};
pub use crate::registry::ResumeRegistry;
pub use crate::types::request::{ResumeFile, ResumeSource};
pub use crate::types::response::{
    MatchTier, RankedCandidate, ScreeningResult, SearchOutcome, TailoredDraft, UploadResult,
};
pub use crate::workflow::{Phase, StateSink, WorkflowEvent};

/// Convenience constructor: a client against the environment-configured
/// endpoint.
pub fn default_client() -> ApiResult<ServiceClient> {
    ServiceClient::new(Endpoint::from_env())
}
