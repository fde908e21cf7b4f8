use crate::models::Item;
use chrono::{DateTime, Duration, Utc};

/// Check whether `candidate` may be offered as a match for `reference`
///
/// A candidate must carry the opposite status and belong to someone else.
/// Closed reports never match in either direction.
#[inline]
pub fn is_eligible_candidate(reference: &Item, candidate: &Item) -> bool {
    reference.is_open()
        && candidate.is_open()
        && candidate.id != reference.id
        && candidate.status == reference.status.opposite()
        && candidate.reported_by != reference.reported_by
}

/// Check whether an item was reported within the last `window_days` days
#[inline]
pub fn within_window(item: &Item, now: DateTime<Utc>, window_days: i64) -> bool {
    item.created_at >= now - Duration::days(window_days)
}

/// Build the candidate pool for a user's reports from already loaded items
///
/// Keeps items of other users, reported inside the window, whose status is the
/// opposite of at least one reference.
pub fn build_candidate_pool(
    references: &[Item],
    items: &[Item],
    now: DateTime<Utc>,
    window_days: i64,
) -> Vec<Item> {
    items
        .iter()
        .filter(|item| within_window(item, now, window_days))
        .filter(|item| references.iter().any(|r| is_eligible_candidate(r, item)))
        .cloned()
        .collect()
}
