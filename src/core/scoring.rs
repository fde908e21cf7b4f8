use crate::core::{text::ItemText, vocabulary::Vocabulary};
use crate::models::{Item, MatchSignal, ScoringWeights, SignalKind};
use chrono::Duration;

/// Outcome of scoring one (reference, candidate) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Sum of all contributions clamped to `max_score`
    pub score: u32,
    /// Sum before clamping
    pub raw: u32,
    pub signals: Vec<MatchSignal>,
}

impl ScoreBreakdown {
    /// Points contributed by one kind of signal
    pub fn points_for(&self, kind: SignalKind) -> u32 {
        self.signals
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.points)
            .sum()
    }
}

/// Score how likely `candidate` is the same physical object as `reference`
///
/// Scoring formula (default weights):
/// ```text
/// category equal             +40
/// location equal             +30   | location substring  +20
/// per shared color           +20
/// per shared brand           +25
/// per shared material        +10
/// per shared size            +15
/// per shared condition        +5
/// per shared feature phrase  +15
/// per shared value word      +10
/// per shared keyword (>2ch)   +3   (total capped at 30)
/// |Δt| <= 7 days             +10   | |Δt| <= 30 days     +5
/// ```
/// The total is clamped once, after every signal is summed.
pub fn calculate_match_score(
    reference: &Item,
    candidate: &Item,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let reference_text = ItemText::new(&reference.text());
    let candidate_text = ItemText::new(&candidate.text());

    let mut signals = Vec::new();

    if let Some(signal) = category_signal(&reference.category, &candidate.category, weights) {
        signals.push(signal);
    }

    if let Some(signal) = location_signal(&reference.location, &candidate.location, weights) {
        signals.push(signal);
    }

    vocabulary_signals(&reference_text, &candidate_text, weights, &mut signals);

    if let Some(signal) = keyword_signal(&reference_text, &candidate_text, weights) {
        signals.push(signal);
    }

    if let Some(signal) = recency_signal(reference, candidate, weights) {
        signals.push(signal);
    }

    let raw: u32 = signals.iter().map(|s| s.points).sum();

    ScoreBreakdown {
        score: raw.min(weights.max_score),
        raw,
        signals,
    }
}

#[inline]
fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

fn category_signal(a: &str, b: &str, weights: &ScoringWeights) -> Option<MatchSignal> {
    let (a, b) = (normalize(a), normalize(b));
    if a.is_empty() || a != b {
        return None;
    }

    Some(MatchSignal {
        kind: SignalKind::Category,
        term: Some(a),
        points: weights.category,
    })
}

/// Exact equality wins over containment; the two never stack
fn location_signal(a: &str, b: &str, weights: &ScoringWeights) -> Option<MatchSignal> {
    let (a, b) = (normalize(a), normalize(b));
    if a.is_empty() || b.is_empty() {
        return None;
    }

    if a == b {
        Some(MatchSignal {
            kind: SignalKind::LocationExact,
            term: Some(a),
            points: weights.location_exact,
        })
    } else if a.contains(&b) || b.contains(&a) {
        let shorter = if a.len() <= b.len() { a } else { b };
        Some(MatchSignal {
            kind: SignalKind::LocationPartial,
            term: Some(shorter),
            points: weights.location_partial,
        })
    } else {
        None
    }
}

fn vocabulary_signals(
    reference: &ItemText,
    candidate: &ItemText,
    weights: &ScoringWeights,
    signals: &mut Vec<MatchSignal>,
) {
    for vocab in Vocabulary::all() {
        let points = weights.weight_for(vocab.kind);
        for group in vocab.terms {
            let in_reference = group.iter().any(|term| reference.contains(term));
            if in_reference && group.iter().any(|term| candidate.contains(term)) {
                signals.push(MatchSignal {
                    kind: vocab.kind,
                    term: Some(Vocabulary::label(*group).to_string()),
                    points,
                });
            }
        }
    }
}

fn keyword_signal(
    reference: &ItemText,
    candidate: &ItemText,
    weights: &ScoringWeights,
) -> Option<MatchSignal> {
    let shared = reference
        .keywords()
        .into_iter()
        .filter(|word| candidate.contains_term(word))
        .count() as u32;

    if shared == 0 {
        return None;
    }

    Some(MatchSignal {
        kind: SignalKind::Keyword,
        term: None,
        points: shared.saturating_mul(weights.keyword).min(weights.keyword_cap),
    })
}

fn recency_signal(reference: &Item, candidate: &Item, weights: &ScoringWeights) -> Option<MatchSignal> {
    let gap = (reference.reference_time() - candidate.reference_time()).abs();

    let points = if gap <= Duration::days(7) {
        weights.recent_week
    } else if gap <= Duration::days(30) {
        weights.recent_month
    } else {
        return None;
    };

    Some(MatchSignal {
        kind: SignalKind::Recency,
        term: None,
        points,
    })
}
