use serde::{Deserialize, Serialize};
use crate::models::domain::MatchResult;

/// Response for the match-trigger endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchEmailResponse {
    pub matches: Vec<MatchResult>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response for the stored-matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMatchesResponse {
    #[serde(rename = "emailId")]
    pub email_id: String,
    pub matches: Vec<MatchResult>,
    #[serde(rename = "matchedAt")]
    pub matched_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
