// src/types/request.rs
//! Request-side inputs for the pipeline operations.

use crate::error::{ApiError, ApiResult};

/// An in-memory resume document selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// The accepted document type is PDF; anything else is rejected before
    /// a request is built.
    pub fn ensure_pdf(&self) -> ApiResult<()> {
        let name = self.file_name.trim();
        if name.is_empty() {
            return Err(ApiError::validation("Resume file has no name"));
        }
        if !name.to_lowercase().ends_with(".pdf") {
            return Err(ApiError::validation(format!(
                "Only PDF files are supported: {}",
                name
            )));
        }
        if self.bytes.is_empty() {
            return Err(ApiError::validation(format!("Resume file is empty: {}", name)));
        }
        Ok(())
    }

    pub fn content_type(&self) -> &'static str {
        "application/pdf"
    }
}

/// Where the resume for a tailor request comes from. The two cases are
/// mutually exclusive by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeSource {
    /// A previously uploaded resume, referenced by registry filename.
    Library(String),
    /// A fresh local file, sent along with the request.
    Upload(ResumeFile),
}
