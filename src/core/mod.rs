// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod scoring;
pub mod text;
pub mod vocabulary;

pub use filters::{is_eligible_candidate, within_window, build_candidate_pool};
pub use matcher::{Matcher, MatchResult};
pub use scoring::{calculate_match_score, ScoreBreakdown};
pub use text::{tokenize, ItemText};
pub use vocabulary::Vocabulary;
