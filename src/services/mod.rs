// Service exports
pub mod auth;
pub mod cache;
pub mod matches;
pub mod postgres;
pub mod store;
pub mod sweep;

pub use auth::{AuthError, Claims, TokenVerifier};
pub use cache::{CacheManager, CacheKey, CacheError};
pub use matches::{MatchService, SimilarItemsQuery, SimilarItemsResult, SweepStats};
pub use postgres::PostgresClient;
pub use store::{InMemoryStore, ItemSource, StoreError};
pub use sweep::spawn_sweeper;
