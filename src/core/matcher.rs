use crate::models::{Item, ScoredMatch, ScoringWeights, MatchOptions};
use crate::core::{
    filters::is_eligible_candidate,
    scoring::calculate_match_score,
};
use std::collections::HashMap;
use uuid::Uuid;

/// Result of the matching process
#[derive(Debug)]
pub struct MatchResult {
    pub matches: Vec<ScoredMatch>,
    pub total_candidates: usize,
}

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Eligibility (opposite status, different owner)
/// 2. Pair scoring against every reference
/// 3. Threshold and per-item deduplication
/// 4. Stable ranking and truncation
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
    options: MatchOptions,
}

impl Matcher {
    pub fn new(weights: ScoringWeights, options: MatchOptions) -> Self {
        Self { weights, options }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
            options: MatchOptions::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Same weights, different threshold or limit
    pub fn with_options(&self, options: MatchOptions) -> Self {
        Self {
            weights: self.weights,
            options,
        }
    }

    /// Rank the candidate pool against a single reference item
    pub fn compute_matches(&self, reference: &Item, candidates: &[Item]) -> MatchResult {
        self.compute_matches_for_items(std::slice::from_ref(reference), candidates)
    }

    /// Rank the candidate pool against all of a user's open reports
    ///
    /// # Arguments
    /// * `references` - The reports matches are sought for
    /// * `candidates` - Pool built by the caller; ineligible entries are skipped
    ///
    /// # Returns
    /// MatchResult with at most `limit` matches, highest score first. A
    /// candidate that qualifies against several references appears once, with
    /// its best score, at the position it was first discovered.
    ///
    /// Discovery is reference-major: every candidate of the first reference is
    /// visited before any of the second. Ties therefore follow reference order
    /// first and pool order only within one reference.
    pub fn compute_matches_for_items(&self, references: &[Item], candidates: &[Item]) -> MatchResult {
        let total_candidates = candidates.len();

        let mut scored_matches: Vec<ScoredMatch> = Vec::new();
        let mut positions: HashMap<Uuid, usize> = HashMap::new();

        for reference in references {
            for candidate in candidates {
                if !is_eligible_candidate(reference, candidate) {
                    continue;
                }

                let breakdown = calculate_match_score(reference, candidate, &self.weights);
                if breakdown.score < self.options.min_score {
                    continue;
                }

                tracing::trace!(
                    "Candidate {} scored {} against {} ({:?})",
                    candidate.id,
                    breakdown.score,
                    reference.id,
                    breakdown.signals
                );

                match positions.get(&candidate.id) {
                    Some(&index) => {
                        let existing = &mut scored_matches[index];
                        existing.match_score = existing.match_score.max(breakdown.score);
                    }
                    None => {
                        positions.insert(candidate.id, scored_matches.len());
                        scored_matches.push(ScoredMatch {
                            item: candidate.clone(),
                            match_score: breakdown.score,
                        });
                    }
                }
            }
        }

        // Stable: equal scores keep discovery order
        scored_matches.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        scored_matches.truncate(self.options.limit);

        MatchResult {
            matches: scored_matches,
            total_candidates,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
