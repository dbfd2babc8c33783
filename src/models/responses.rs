use serde::{Deserialize, Serialize};
use crate::models::domain::{CompatibilityEntry, LikeOutcome, LikeStatus, UserId};

/// Response for the compatibility shortlist endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopMatchesResponse {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub entries: Vec<CompatibilityEntry>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Response after storing a quiz attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswersResponse {
    pub success: bool,
    #[serde(rename = "questionCount")]
    pub question_count: usize,
}

/// Response after registering a like
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub status: LikeOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeStatusResponse {
    pub status: LikeStatus,
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
