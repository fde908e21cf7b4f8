//! Lost & Found Algo - item matching service for the campus lost & found app
//!
//! This library provides the scorer that pairs lost reports with found ones,
//! plus the store, cache, sweep and HTTP layers the service runs it in.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchResult, calculate_match_score};
pub use models::{Item, ItemStatus, ScoredMatch, ScoringWeights, MatchOptions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        assert_eq!(matcher.weights(), &ScoringWeights::default());
        assert_eq!(matcher.options(), &MatchOptions::default());
    }
}
