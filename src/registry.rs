// src/registry.rs
//! Read-through accessor over the server-side resume registry.

use std::collections::HashSet;
use std::sync::Arc;

use crate::core::ServiceClient;
use crate::error::ApiResult;

/// Lists previously uploaded resumes. Fetches on demand and never caches;
/// consumers re-fetch on mount, on explicit refresh, and after an upload.
pub struct ResumeRegistry {
    client: Arc<ServiceClient>,
}

impl ResumeRegistry {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self { client }
    }

    /// Ordered listing, deduplicated by filename. An empty registry is a
    /// valid outcome, distinct from a fetch failure.
    pub async fn list(&self) -> ApiResult<Vec<String>> {
        let names = self.client.list_resumes().await?;
        let mut seen = HashSet::new();
        Ok(names
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .collect())
    }
}
