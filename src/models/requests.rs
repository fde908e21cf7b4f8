use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::ItemStatus;

/// Request to score free-text search input against reported items
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimilarItemsRequest {
    #[validate(length(min = 2))]
    pub query: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Status of the searcher's own report; matches come from the opposite status
    pub status: ItemStatus,
    #[serde(alias = "dateLostFound", rename = "dateLostFound", default)]
    pub date_lost_found: Option<chrono::DateTime<chrono::Utc>>,
}
