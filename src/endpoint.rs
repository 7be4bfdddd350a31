// src/endpoint.rs
//! Base endpoint configuration for the remote recruiting service.

use std::env;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Immutable base endpoint, normalized once at construction and passed into
/// the service client explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    /// Normalize a raw base URL: trim whitespace and trailing slashes, and
    /// upgrade to https unless the host is a local loopback address.
    pub fn new(raw: &str) -> Self {
        let mut base = raw.trim().trim_end_matches('/').to_string();

        if is_loopback(&base) {
            if !base.starts_with("http://") && !base.starts_with("https://") {
                base = format!("http://{}", base);
            }
        } else if let Some(rest) = base.strip_prefix("http://") {
            base = format!("https://{}", rest);
        } else if !base.starts_with("https://") {
            base = format!("https://{}", base);
        }

        Self { base }
    }

    /// Resolve the endpoint from the environment, falling back to the local
    /// development server.
    pub fn from_env() -> Self {
        let raw = env::var("HIREFLOW_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&raw)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Join a path starting with '/' onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

fn is_loopback(url: &str) -> bool {
    let without_scheme = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let authority = without_scheme.split('/').next().unwrap_or("");
    if authority.starts_with("[::1]") {
        return true;
    }
    let host = authority.split(':').next().unwrap_or("");
    host == "localhost" || host.starts_with("127.")
}
