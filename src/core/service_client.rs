// src/core/service_client.rs
//! HTTP client for the recruiting service - one method per pipeline
//! operation, every failure normalized into a single `ApiError`.

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, warn};

use crate::endpoint::Endpoint;
use crate::error::{ApiError, ApiResult};
use crate::types::request::{ResumeFile, ResumeSource};
use crate::types::response::{
    ResumeListPayload, ScreeningPayload, ScreeningResult, SearchOutcome, SearchPayload,
    TailoredDraft, UploadResult,
};

const UPLOAD_ENDPOINT: &str = "/upload";
const SEARCH_ENDPOINT: &str = "/search_candidates";
const SCREEN_ENDPOINT: &str = "/screen_candidate";
const TAILOR_ENDPOINT: &str = "/tailor_resume";
const GENERATE_PDF_ENDPOINT: &str = "/generate_pdf";
const RESUMES_ENDPOINT: &str = "/resumes";

/// Structured error body returned by every endpoint.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

pub struct ServiceClient {
    client: reqwest::Client,
    endpoint: Endpoint,
}

impl ServiceClient {
    /// Create a client against the given endpoint. No timeout is applied at
    /// this layer; the transport defaults are in effect.
    pub fn new(endpoint: Endpoint) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ApiError::transport(format!("Failed to create HTTP client: {err}")))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// 1. Resume upload - sends the file, receives chunk accounting.
    pub async fn upload_resume(&self, file: &ResumeFile) -> ApiResult<UploadResult> {
        file.ensure_pdf()?;

        let form = Form::new().part("file", file_part(file)?);

        info!("Uploading {} to {}", file.file_name, self.endpoint.url(UPLOAD_ENDPOINT));
        self.post_multipart(UPLOAD_ENDPOINT, form, "upload resume").await
    }

    /// 2. Candidate search - job description in, ranked candidates out. An
    /// empty candidate set is a valid outcome, not an error.
    pub async fn search_candidates(&self, job_description: &str) -> ApiResult<SearchOutcome> {
        let job_description = non_empty(job_description, "Please enter a job description")?;

        let form = Form::new().text("job_description", job_description.to_string());

        info!("Searching candidates via {}", self.endpoint.url(SEARCH_ENDPOINT));
        let payload: SearchPayload = self
            .post_multipart(SEARCH_ENDPOINT, form, "search candidates")
            .await?;
        SearchOutcome::from_payload(payload)
    }

    /// 3. Screening - one stored resume against a job description.
    pub async fn screen_candidate(
        &self,
        job_description: &str,
        resume_filename: &str,
    ) -> ApiResult<ScreeningResult> {
        let job_description = non_empty(job_description, "Please enter a job description")?;
        let resume_filename =
            non_empty(resume_filename, "Please select a resume from your library")?;

        let form = Form::new()
            .text("job_description", job_description.to_string())
            .text("resume_filename", resume_filename.to_string());

        info!("Screening {} via {}", resume_filename, self.endpoint.url(SCREEN_ENDPOINT));
        let payload: ScreeningPayload = self
            .post_multipart(SCREEN_ENDPOINT, form, "screen candidate")
            .await?;
        Ok(ScreeningResult::from(payload))
    }

    /// 4. Tailoring - produces the draft text held for a later export.
    pub async fn tailor_resume(
        &self,
        job_description: &str,
        source: &ResumeSource,
    ) -> ApiResult<TailoredDraft> {
        let job_description = non_empty(job_description, "Please provide a job description")?;

        let form = Form::new().text("job_description", job_description.to_string());
        let form = match source {
            ResumeSource::Library(filename) => {
                let filename = non_empty(filename, "Please select a resume from your library")?;
                form.text("resume_filename", filename.to_string())
            }
            ResumeSource::Upload(file) => {
                file.ensure_pdf()?;
                form.part("resume_file", file_part(file)?)
            }
        };

        info!("Tailoring resume via {}", self.endpoint.url(TAILOR_ENDPOINT));
        self.post_multipart(TAILOR_ENDPOINT, form, "tailor resume").await
    }

    /// 5. PDF export - plain text in, binary artifact out.
    pub async fn generate_pdf(&self, content: &str) -> ApiResult<Vec<u8>> {
        non_empty(content, "No preview to download")?;

        let url = self.endpoint.url(GENERATE_PDF_ENDPOINT);
        info!("Generating PDF via {}", url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .map_err(|err| transport_error("generate PDF", &err))?;

        binary_body(response, "generate PDF").await
    }

    /// Stored-resume listing for the registry accessor.
    pub async fn list_resumes(&self) -> ApiResult<Vec<String>> {
        let payload: ResumeListPayload = self.get_json(RESUMES_ENDPOINT, "fetch resumes").await?;
        Ok(payload.resumes)
    }

    /// Download a stored resume, preferring the server-supplied relative URL
    /// when one was returned with a search result.
    pub async fn download_resume(
        &self,
        filename: &str,
        download_url: Option<&str>,
    ) -> ApiResult<Vec<u8>> {
        let path = match download_url {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => {
                let filename = non_empty(filename, "No resume selected for download")?;
                format!("{}/{}", RESUMES_ENDPOINT, encode_path_segment(filename))
            }
        };

        let url = self.endpoint.url(&path);
        info!("Downloading resume from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| transport_error("download resume", &err))?;

        binary_body(response, "download resume").await
    }

    async fn post_multipart<R>(&self, path: &str, form: Form, action: &'static str) -> ApiResult<R>
    where
        R: DeserializeOwned,
    {
        let url = self.endpoint.url(path);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| transport_error(action, &err))?;

        json_body(response, action).await
    }

    async fn get_json<R>(&self, path: &str, action: &'static str) -> ApiResult<R>
    where
        R: DeserializeOwned,
    {
        let url = self.endpoint.url(path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| transport_error(action, &err))?;

        json_body(response, action).await
    }
}

async fn json_body<R>(response: Response, action: &'static str) -> ApiResult<R>
where
    R: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        return Err(error_from_response(response, action).await);
    }

    let text = response
        .text()
        .await
        .map_err(|err| transport_error(action, &err))?;

    serde_json::from_str(&text).map_err(|err| {
        warn!("Malformed response while trying to {}: {}", action, err);
        ApiError::transport(format!("Failed to {action}: malformed response from server"))
    })
}

/// The binary endpoints answer with either the artifact bytes or a JSON
/// error envelope on the same path; the Content-Type decides which.
async fn binary_body(response: Response, action: &'static str) -> ApiResult<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_from_response(response, action).await);
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("application/json"))
        .unwrap_or(false);

    let bytes = response
        .bytes()
        .await
        .map_err(|err| transport_error(action, &err))?;

    if is_json {
        return match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(body) => {
                warn!("Server answered {} with an error envelope: {}", action, body.detail);
                Err(ApiError::remote(status.as_u16(), body.detail))
            }
            Err(_) => Err(ApiError::transport(format!(
                "Failed to {action}: expected binary data, got JSON"
            ))),
        };
    }

    // An error envelope served without a JSON Content-Type still decodes
    // as { detail }; never hand that back as artifact bytes.
    if bytes.first() == Some(&b'{') {
        if let Ok(body) = serde_json::from_slice::<ErrorBody>(&bytes) {
            return Err(ApiError::remote(status.as_u16(), body.detail));
        }
    }

    Ok(bytes.to_vec())
}

async fn error_from_response(response: Response, action: &'static str) -> ApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|body| body.detail)
        .unwrap_or_else(|_| format!("Failed to {action} (status {status})"));

    warn!("Server rejected {} request: {} - {}", action, status, message);
    ApiError::remote(status.as_u16(), message)
}

fn transport_error(action: &str, err: &dyn std::fmt::Display) -> ApiError {
    ApiError::transport(format!("Failed to {action}: {err}"))
}

fn non_empty<'a>(value: &'a str, message: &str) -> ApiResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(message));
    }
    Ok(trimmed)
}

fn file_part(file: &ResumeFile) -> ApiResult<Part> {
    Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(file.content_type())
        .map_err(|err| ApiError::transport(format!("Failed to build multipart body: {err}")))
}

fn encode_path_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_path_segments_like_a_browser() {
        assert_eq!(encode_path_segment("plain.pdf"), "plain.pdf");
        assert_eq!(encode_path_segment("my resume.pdf"), "my%20resume.pdf");
        assert_eq!(encode_path_segment("a/b.pdf"), "a%2Fb.pdf");
    }

    #[test]
    fn non_empty_trims_before_checking() {
        assert!(non_empty("  ", "msg").unwrap_err().is_validation());
        assert_eq!(non_empty(" text ", "msg").unwrap(), "text");
    }
}
