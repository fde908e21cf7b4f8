// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Item, ItemStatus, ScoredMatch, SignalKind, MatchSignal, ScoringWeights, MatchOptions};
pub use requests::SimilarItemsRequest;
pub use responses::{SimilarItemsResponse, HealthResponse, ErrorResponse, InvalidateResponse};
