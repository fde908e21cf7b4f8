use serde::{Deserialize, Serialize};
use crate::models::domain::ScoredMatch;

/// Response for the similar items endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarItemsResponse {
    pub query: String,
    #[serde(rename = "totalAnalyzed")]
    pub total_analyzed: usize,
    pub matches: Vec<ScoredMatch>,
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

/// Cache invalidation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidateResponse {
    pub success: bool,
}
