// src/types/response.rs
//! Response contracts for the recruiting service.

use serde::{Deserialize, Deserializer};

use crate::error::{ApiError, ApiResult};

fn clamp_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(raw.clamp(0.0, 100.0).round() as u8)
}

/// Outcome of a successful resume upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadResult {
    pub filename: String,
    pub chunks_processed: u32,
    pub message: String,
}

/// Quality band derived from a numeric score, fixed at result construction
/// and never re-derived from status labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Excellent,
    High,
    Moderate,
    Low,
    Poor,
}

impl MatchTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=100 => Self::Excellent,
            75..=89 => Self::High,
            60..=74 => Self::Moderate,
            40..=59 => Self::Low,
            _ => Self::Poor,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent Match",
            Self::High => "High Match",
            Self::Moderate => "Moderate Match",
            Self::Low => "Low Match",
            Self::Poor => "Poor Match",
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScreeningPayload {
    #[serde(deserialize_with = "clamp_score")]
    pub score: u8,
    pub match_status: String,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    pub reasoning: String,
    pub resume_filename: String,
}

/// Result of screening one stored resume against a job description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreeningResult {
    pub score: u8,
    pub tier: MatchTier,
    pub match_status: String,
    pub missing_skills: Vec<String>,
    pub reasoning: String,
    pub resume_filename: String,
}

impl From<ScreeningPayload> for ScreeningResult {
    fn from(payload: ScreeningPayload) -> Self {
        Self {
            tier: MatchTier::from_score(payload.score),
            score: payload.score,
            match_status: payload.match_status,
            missing_skills: payload.missing_skills,
            reasoning: payload.reasoning,
            resume_filename: payload.resume_filename,
        }
    }
}

/// One entry in a ranked search result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RankedCandidate {
    pub rank: u32,
    #[serde(deserialize_with = "clamp_score")]
    pub score: u8,
    #[serde(default)]
    pub name: Option<String>,
    pub filename: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl RankedCandidate {
    /// Human-friendly name, falling back to a cleaned-up filename when the
    /// server could not extract one.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() && name != "Unknown Candidate" => name.clone(),
            _ => prettify_filename(&self.filename),
        }
    }
}

fn prettify_filename(filename: &str) -> String {
    let stem = filename
        .strip_suffix(".pdf")
        .or_else(|| filename.strip_suffix(".PDF"))
        .unwrap_or(filename);
    stem.replace(['_', '-'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchPayload {
    #[serde(default)]
    pub candidates: Vec<RankedCandidate>,
    pub count: u32,
    #[serde(default)]
    pub message: Option<String>,
}

/// Ordered search result; ranks are guaranteed dense 1..count, best first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub candidates: Vec<RankedCandidate>,
    pub count: u32,
    pub message: Option<String>,
}

impl SearchOutcome {
    pub(crate) fn from_payload(payload: SearchPayload) -> ApiResult<Self> {
        let mut candidates = payload.candidates;
        candidates.sort_by_key(|candidate| candidate.rank);

        if payload.count as usize != candidates.len() {
            return Err(ApiError::transport(
                "Candidate ranking from the server is malformed",
            ));
        }
        for (index, candidate) in candidates.iter().enumerate() {
            if candidate.rank as usize != index + 1 {
                return Err(ApiError::transport(
                    "Candidate ranking from the server is malformed",
                ));
            }
        }

        Ok(Self {
            candidates,
            count: payload.count,
            message: payload.message,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Tailored resume text held client-side until exported.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TailoredDraft {
    pub tailored_text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResumeListPayload {
    #[serde(default)]
    pub resumes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(rank: u32, filename: &str) -> RankedCandidate {
        RankedCandidate {
            rank,
            score: 80,
            name: None,
            filename: filename.to_string(),
            reasoning: String::new(),
            download_url: None,
        }
    }

    #[test]
    fn tiers_follow_score_bands() {
        assert_eq!(MatchTier::from_score(100), MatchTier::Excellent);
        assert_eq!(MatchTier::from_score(90), MatchTier::Excellent);
        assert_eq!(MatchTier::from_score(89), MatchTier::High);
        assert_eq!(MatchTier::from_score(75), MatchTier::High);
        assert_eq!(MatchTier::from_score(60), MatchTier::Moderate);
        assert_eq!(MatchTier::from_score(40), MatchTier::Low);
        assert_eq!(MatchTier::from_score(39), MatchTier::Poor);
        assert_eq!(MatchTier::from_score(0), MatchTier::Poor);
    }

    #[test]
    fn display_name_prefers_extracted_name() {
        let mut with_name = candidate(1, "jane_doe-resume.pdf");
        with_name.name = Some("Jane Doe".to_string());
        assert_eq!(with_name.display_name(), "Jane Doe");
    }

    #[test]
    fn display_name_cleans_filename_when_name_is_unusable() {
        let mut unknown = candidate(1, "jane_doe-resume.pdf");
        unknown.name = Some("Unknown Candidate".to_string());
        assert_eq!(unknown.display_name(), "Jane Doe Resume");

        let missing = candidate(2, "JOHN-SMITH.pdf");
        assert_eq!(missing.display_name(), "John Smith");
    }

    #[test]
    fn search_outcome_sorts_by_rank() {
        let payload = SearchPayload {
            candidates: vec![
                candidate(3, "c.pdf"),
                candidate(1, "a.pdf"),
                candidate(2, "b.pdf"),
            ],
            count: 3,
            message: None,
        };
        let outcome = SearchOutcome::from_payload(payload).unwrap();
        let order: Vec<&str> = outcome
            .candidates
            .iter()
            .map(|c| c.filename.as_str())
            .collect();
        assert_eq!(order, vec!["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn search_outcome_rejects_gapped_ranks() {
        let payload = SearchPayload {
            candidates: vec![candidate(1, "a.pdf"), candidate(3, "c.pdf")],
            count: 2,
            message: None,
        };
        assert!(SearchOutcome::from_payload(payload)
            .unwrap_err()
            .is_transport());
    }

    #[test]
    fn search_outcome_rejects_duplicate_ranks() {
        let payload = SearchPayload {
            candidates: vec![candidate(1, "a.pdf"), candidate(1, "b.pdf")],
            count: 2,
            message: None,
        };
        assert!(SearchOutcome::from_payload(payload)
            .unwrap_err()
            .is_transport());
    }

    #[test]
    fn search_outcome_rejects_count_mismatch() {
        let payload = SearchPayload {
            candidates: vec![candidate(1, "a.pdf")],
            count: 3,
            message: None,
        };
        assert!(SearchOutcome::from_payload(payload)
            .unwrap_err()
            .is_transport());
    }

    #[test]
    fn scores_are_clamped_on_deserialization() {
        let json = r#"{"rank": 1, "score": 140, "filename": "a.pdf"}"#;
        let high: RankedCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(high.score, 100);

        let json = r#"{"rank": 1, "score": -5, "filename": "a.pdf"}"#;
        let low: RankedCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(low.score, 0);
    }
}
