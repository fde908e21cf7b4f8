use crate::core::{build_candidate_pool, Matcher};
use crate::models::{Item, ItemStatus, MatchOptions, ScoredMatch};
use crate::services::cache::{CacheKey, CacheManager};
use crate::services::store::{ItemSource, StoreError};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Free-text description of an item, scored like a report that was never saved
#[derive(Debug, Clone)]
pub struct SimilarItemsQuery {
    pub query: String,
    pub category: Option<String>,
    pub location: Option<String>,
    pub status: ItemStatus,
    pub date_lost_found: Option<DateTime<Utc>>,
}

/// Matches for a transient query plus how many items were looked at
#[derive(Debug, Clone)]
pub struct SimilarItemsResult {
    pub total_analyzed: usize,
    pub matches: Vec<ScoredMatch>,
}

/// Outcome of one sweep over all reporters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepStats {
    pub users: usize,
    pub cached: usize,
    pub failed: usize,
}

/// Binds an item source, the matcher and the match cache
///
/// Cache trouble never fails a call: a miss or an error falls through to a
/// fresh computation, and write errors are only logged.
pub struct MatchService<S: ItemSource> {
    store: Arc<S>,
    cache: Arc<CacheManager>,
    matcher: Matcher,
    window_days: i64,
    similar_limit: usize,
}

impl<S: ItemSource> MatchService<S> {
    pub fn new(
        store: Arc<S>,
        cache: Arc<CacheManager>,
        matcher: Matcher,
        window_days: i64,
        similar_limit: usize,
    ) -> Self {
        Self {
            store,
            cache,
            matcher,
            window_days,
            similar_limit,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Matches for every open report of a user, served from cache when fresh
    pub async fn matches_for_user(&self, user_id: &str) -> Result<Vec<ScoredMatch>, StoreError> {
        let key = CacheKey::matches(user_id);

        match self.cache.get::<Vec<ScoredMatch>>(&key).await {
            Ok(cached) => {
                tracing::debug!("Serving {} cached matches for {}", cached.len(), user_id);
                return Ok(cached);
            }
            Err(crate::services::CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Cache read failed for {}, recomputing: {}", user_id, e),
        }

        self.refresh_user(user_id).await
    }

    /// Recompute a user's matches and overwrite the cache entry
    pub async fn refresh_user(&self, user_id: &str) -> Result<Vec<ScoredMatch>, StoreError> {
        let matches = self.compute_for_user(user_id).await?;

        let key = CacheKey::matches(user_id);
        if let Err(e) = self.cache.set(&key, &matches).await {
            tracing::warn!("Failed to cache matches for {}: {}", user_id, e);
        }

        Ok(matches)
    }

    async fn compute_for_user(&self, user_id: &str) -> Result<Vec<ScoredMatch>, StoreError> {
        let references = self.store.items_reported_by(user_id).await?;
        if references.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let since = now - Duration::days(self.window_days);
        let loaded = self.store.candidate_pool(user_id, Some(since)).await?;
        let pool = build_candidate_pool(&references, &loaded, now, self.window_days);

        let result = self.matcher.compute_matches_for_items(&references, &pool);

        tracing::info!(
            "Computed {} matches for user {} ({} reports, {} candidates)",
            result.matches.len(),
            user_id,
            references.len(),
            result.total_candidates
        );

        Ok(result.matches)
    }

    /// Matches for one stored report, uncached
    ///
    /// Returns `None` when the item does not exist.
    pub async fn matches_for_item(&self, item_id: Uuid) -> Result<Option<Vec<ScoredMatch>>, StoreError> {
        let Some(reference) = self.store.get_item(item_id).await? else {
            return Ok(None);
        };

        let pool = self.store.candidate_pool(&reference.reported_by, None).await?;
        let result = self.matcher.compute_matches(&reference, &pool);

        tracing::debug!(
            "Item {} has {} matches from {} candidates",
            item_id,
            result.matches.len(),
            result.total_candidates
        );

        Ok(Some(result.matches))
    }

    /// Score free-text search input against other users' reports
    pub async fn similar_items(
        &self,
        user_id: &str,
        query: SimilarItemsQuery,
    ) -> Result<SimilarItemsResult, StoreError> {
        let now = Utc::now();
        let reference = Item {
            id: Uuid::new_v4(),
            title: query.query,
            description: String::new(),
            category: query.category.unwrap_or_default(),
            location: query.location.unwrap_or_default(),
            status: query.status,
            reported_by: user_id.to_string(),
            date_lost_found: query.date_lost_found,
            resolved_at: None,
            created_at: now,
        };

        let target = reference.status.opposite();
        let pool: Vec<Item> = self
            .store
            .candidate_pool(user_id, None)
            .await?
            .into_iter()
            .filter(|item| item.status == target)
            .collect();

        let matcher = self.matcher.with_options(MatchOptions {
            min_score: self.matcher.options().min_score,
            limit: self.similar_limit,
        });
        let result = matcher.compute_matches(&reference, &pool);

        Ok(SimilarItemsResult {
            total_analyzed: result.total_candidates,
            matches: result.matches,
        })
    }

    /// Drop a user's cached matches
    pub async fn invalidate(&self, user_id: &str) {
        if let Err(e) = self.cache.delete(&CacheKey::matches(user_id)).await {
            tracing::warn!("Failed to invalidate cached matches for {}: {}", user_id, e);
        }
    }

    /// Recompute and cache matches for everyone with at least one report
    ///
    /// A failure for one user is logged and counted; the sweep carries on.
    pub async fn refresh_all(&self) -> Result<SweepStats, StoreError> {
        let users = self.store.active_reporters().await?;
        let mut stats = SweepStats {
            users: users.len(),
            ..SweepStats::default()
        };

        for user_id in &users {
            match self.refresh_user(user_id).await {
                Ok(_) => stats.cached += 1,
                Err(e) => {
                    tracing::warn!("Sweep failed for user {}: {}", user_id, e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::store::InMemoryStore;

    fn create_item(title: &str, status: ItemStatus, owner: &str) -> Item {
        Item {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            category: "Electronics".to_string(),
            location: "Library".to_string(),
            status,
            reported_by: owner.to_string(),
            date_lost_found: None,
            resolved_at: None,
            created_at: Utc::now(),
        }
    }

    fn create_service(items: Vec<Item>) -> MatchService<InMemoryStore> {
        MatchService::new(
            Arc::new(InMemoryStore::new(items)),
            Arc::new(CacheManager::in_memory(100, 600)),
            Matcher::with_default_weights(),
            30,
            10,
        )
    }

    #[tokio::test]
    async fn test_user_without_reports_gets_nothing() {
        let service = create_service(vec![create_item("Found phone", ItemStatus::Found, "bob")]);

        let matches = service.matches_for_user("alice").await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn test_matches_are_cached_until_invalidated() {
        let service = create_service(vec![
            create_item("Lost phone", ItemStatus::Lost, "alice"),
            create_item("Found phone", ItemStatus::Found, "bob"),
        ]);

        let first = service.matches_for_user("alice").await.unwrap();
        assert_eq!(first.len(), 1);

        // New report is invisible while the cached entry lives
        service
            .store()
            .insert(create_item("Found phone charger", ItemStatus::Found, "carol"))
            .await;
        let cached = service.matches_for_user("alice").await.unwrap();
        assert_eq!(cached.len(), 1);

        service.invalidate("alice").await;
        let fresh = service.matches_for_user("alice").await.unwrap();
        assert_eq!(fresh.len(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_cache_entry_is_recomputed() {
        let service = create_service(vec![
            create_item("Lost phone", ItemStatus::Lost, "alice"),
            create_item("Found phone", ItemStatus::Found, "bob"),
        ]);

        let key = CacheKey::matches("alice");
        service.cache.set(&key, &"garbage").await.unwrap();

        let matches = service.matches_for_user("alice").await.unwrap();
        assert_eq!(matches.len(), 1);

        // The bad entry was overwritten with the fresh result
        let cached: Vec<ScoredMatch> = service.cache.get(&key).await.unwrap();
        assert_eq!(cached.len(), 1);
    }

    #[tokio::test]
    async fn test_resolved_reports_never_match() {
        let mut returned = create_item("Found phone", ItemStatus::Found, "bob");
        returned.resolved_at = Some(Utc::now());
        let mut closed_reference = create_item("Lost tablet", ItemStatus::Lost, "carol");
        closed_reference.resolved_at = Some(Utc::now());
        let closed_id = closed_reference.id;

        let service = create_service(vec![
            create_item("Lost phone", ItemStatus::Lost, "alice"),
            returned,
            closed_reference,
        ]);

        // Resolved found item is not a candidate
        assert!(service.matches_for_user("alice").await.unwrap().is_empty());

        // Resolved lost item is not a reference
        assert!(service.matches_for_user("carol").await.unwrap().is_empty());
        let item_matches = service.matches_for_item(closed_id).await.unwrap().expect("item exists");
        assert!(item_matches.is_empty());

        // Only owners of open reports are swept
        let stats = service.refresh_all().await.unwrap();
        assert_eq!(stats, SweepStats { users: 1, cached: 1, failed: 0 });
    }

    #[tokio::test]
    async fn test_matches_for_missing_item() {
        let service = create_service(vec![]);
        assert!(service.matches_for_item(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_similar_items_only_opposite_status() {
        let service = create_service(vec![
            create_item("Found phone", ItemStatus::Found, "bob"),
            create_item("Lost phone", ItemStatus::Lost, "carol"),
        ]);

        let result = service
            .similar_items(
                "alice",
                SimilarItemsQuery {
                    query: "black phone".to_string(),
                    category: Some("electronics".to_string()),
                    location: None,
                    status: ItemStatus::Lost,
                    date_lost_found: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(result.total_analyzed, 1);
        assert_eq!(result.matches.len(), 1);
        assert_eq!(result.matches[0].item.status, ItemStatus::Found);
    }

    #[tokio::test]
    async fn test_refresh_all_is_repeatable() {
        let service = create_service(vec![
            create_item("Lost phone", ItemStatus::Lost, "alice"),
            create_item("Found phone", ItemStatus::Found, "bob"),
        ]);

        let first = service.refresh_all().await.unwrap();
        let second = service.refresh_all().await.unwrap();

        assert_eq!(first, SweepStats { users: 2, cached: 2, failed: 0 });
        assert_eq!(first, second);

        let alice: Vec<u32> = service
            .matches_for_user("alice")
            .await
            .unwrap()
            .iter()
            .map(|m| m.match_score)
            .collect();
        let again: Vec<u32> = service
            .refresh_user("alice")
            .await
            .unwrap()
            .iter()
            .map(|m| m.match_score)
            .collect();
        assert_eq!(alice, again);
    }
}
