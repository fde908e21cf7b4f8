use crate::services::matches::MatchService;
use crate::services::store::ItemSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn the periodic match refresh
///
/// Runs `refresh_all` every `interval`, starting one interval after spawn.
/// A slow sweep delays the next tick instead of queueing extra runs, and the
/// sweep shares no lock with request handlers: each cache write replaces one
/// user's entry and the last writer wins.
pub fn spawn_sweeper<S: ItemSource>(service: Arc<MatchService<S>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            match service.refresh_all().await {
                Ok(stats) => tracing::info!(
                    "Match sweep finished: {} users, {} cached, {} failed",
                    stats.users,
                    stats.cached,
                    stats.failed
                ),
                Err(e) => tracing::error!("Match sweep failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Matcher;
    use crate::models::{Item, ItemStatus, ScoredMatch};
    use crate::services::cache::{CacheKey, CacheManager};
    use crate::services::store::InMemoryStore;
    use chrono::Utc;
    use uuid::Uuid;

    fn create_item(title: &str, status: ItemStatus, owner: &str) -> Item {
        Item {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: String::new(),
            category: "Bags".to_string(),
            location: "Gym".to_string(),
            status,
            reported_by: owner.to_string(),
            date_lost_found: None,
            resolved_at: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_populates_cache() {
        let cache = Arc::new(CacheManager::in_memory(100, 3600));
        let store = Arc::new(InMemoryStore::new(vec![
            create_item("Lost backpack", ItemStatus::Lost, "alice"),
            create_item("Found backpack", ItemStatus::Found, "bob"),
        ]));
        let service = Arc::new(MatchService::new(
            store,
            cache.clone(),
            Matcher::with_default_weights(),
            30,
            10,
        ));

        let handle = spawn_sweeper(service, Duration::from_secs(600));

        // Nothing before the first tick
        assert!(cache.get::<Vec<ScoredMatch>>(&CacheKey::matches("alice")).await.is_err());

        tokio::time::sleep(Duration::from_secs(601)).await;
        tokio::task::yield_now().await;

        let cached: Vec<ScoredMatch> = tokio_test::assert_ok!(
            cache.get(&CacheKey::matches("alice")).await
        );
        assert_eq!(cached.len(), 1);

        handle.abort();
    }
}
