use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether an item was reported lost or found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "item_status", rename_all = "lowercase")]
pub enum ItemStatus {
    Lost,
    Found,
}

impl ItemStatus {
    /// The status a matching report must have
    pub fn opposite(self) -> Self {
        match self {
            ItemStatus::Lost => ItemStatus::Found,
            ItemStatus::Found => ItemStatus::Lost,
        }
    }
}

/// A lost or found report
///
/// Optional free-text fields deserialize to empty strings so scoring never has
/// to deal with missing values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    #[serde(alias = "_id")]
    pub id: Uuid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    pub status: ItemStatus,
    #[serde(rename = "reportedBy")]
    pub reported_by: String,
    #[serde(rename = "dateLostFound", default)]
    pub date_lost_found: Option<DateTime<Utc>>,
    /// Set once the report is claimed, returned or otherwise closed
    #[serde(rename = "resolvedAt", default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Item {
    /// Lowercased `title + description`, the text all token signals scan
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }

    /// Open reports take part in matching, closed ones never do
    pub fn is_open(&self) -> bool {
        self.resolved_at.is_none()
    }

    /// Timestamp used for recency: when it was lost/found, else when it was reported
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.date_lost_found.unwrap_or(self.created_at)
    }
}

/// A candidate item together with its match score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub item: Item,
    #[serde(rename = "matchScore")]
    pub match_score: u32,
}

/// Kind of heuristic signal that contributed to a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Category,
    LocationExact,
    LocationPartial,
    Color,
    Brand,
    Material,
    Size,
    Condition,
    Feature,
    Value,
    Keyword,
    Recency,
}

/// One fired signal: what matched and how many points it was worth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSignal {
    pub kind: SignalKind,
    pub term: Option<String>,
    pub points: u32,
}

/// Per-signal weights for the pair scorer
///
/// Every scoring path reads from one table so weights cannot drift between
/// call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringWeights {
    pub category: u32,
    pub location_exact: u32,
    pub location_partial: u32,
    pub color: u32,
    pub brand: u32,
    pub material: u32,
    pub size: u32,
    pub condition: u32,
    pub feature: u32,
    pub value: u32,
    pub keyword: u32,
    pub keyword_cap: u32,
    pub recent_week: u32,
    pub recent_month: u32,
    pub max_score: u32,
}

impl ScoringWeights {
    /// Weight of a single vocabulary hit for the given kind
    pub fn weight_for(&self, kind: SignalKind) -> u32 {
        match kind {
            SignalKind::Category => self.category,
            SignalKind::LocationExact => self.location_exact,
            SignalKind::LocationPartial => self.location_partial,
            SignalKind::Color => self.color,
            SignalKind::Brand => self.brand,
            SignalKind::Material => self.material,
            SignalKind::Size => self.size,
            SignalKind::Condition => self.condition,
            SignalKind::Feature => self.feature,
            SignalKind::Value => self.value,
            SignalKind::Keyword => self.keyword,
            SignalKind::Recency => self.recent_week,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            category: 40,
            location_exact: 30,
            location_partial: 20,
            color: 20,
            brand: 25,
            material: 10,
            size: 15,
            condition: 5,
            feature: 15,
            value: 10,
            keyword: 3,
            keyword_cap: 30,
            recent_week: 10,
            recent_month: 5,
            max_score: 100,
        }
    }
}

/// Threshold and result size for a ranking run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub min_score: u32,
    pub limit: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            min_score: 15,
            limit: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_status() {
        assert_eq!(ItemStatus::Lost.opposite(), ItemStatus::Found);
        assert_eq!(ItemStatus::Found.opposite(), ItemStatus::Lost);
    }

    #[test]
    fn test_missing_text_fields_default_to_empty() {
        let json = r#"{
            "id": "7f6f1c1e-7d2b-4c1a-9a51-0a2b3c4d5e6f",
            "title": "Umbrella",
            "status": "found",
            "reportedBy": "u1",
            "createdAt": "2025-03-01T10:00:00Z"
        }"#;

        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.category, "");
        assert_eq!(item.location, "");
        assert_eq!(item.description, "");
        assert_eq!(item.reference_time(), item.created_at);
    }

    #[test]
    fn test_scored_match_wire_shape() {
        let json = r#"{
            "id": "7f6f1c1e-7d2b-4c1a-9a51-0a2b3c4d5e6f",
            "status": "lost",
            "reportedBy": "u1",
            "createdAt": "2025-03-01T10:00:00Z"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        let value = serde_json::to_value(ScoredMatch { item, match_score: 55 }).unwrap();

        assert_eq!(value["matchScore"], 55);
        assert_eq!(value["item"]["reportedBy"], "u1");
        assert_eq!(value["item"]["status"], "lost");
    }
}
