//! In-memory counter store - used for tests and single-process deployments.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use tollgate_core::ports::{CounterStore, StoreError, WindowState};

struct Window {
    count: u64,
    expires_at: Instant,
}

/// Counter store backed by process memory.
///
/// The mutex plays the role the store's script engine plays remotely: each
/// hit reads, increments, and observes the window in one critical section,
/// so concurrent hits see strictly increasing counts.
/// Note: counters are per-process, not shared across instances.
#[derive(Default)]
pub struct InMemoryCounterStore {
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn hit(&self, key: &str, window: Duration) -> Result<WindowState, StoreError> {
        let now = Instant::now();
        let mut windows = self.windows.lock().await;

        let entry = windows
            .entry(key.to_string())
            .and_modify(|w| {
                // An elapsed window behaves exactly like an expired key.
                if w.expires_at <= now {
                    w.count = 0;
                    w.expires_at = now + window;
                }
            })
            .or_insert_with(|| Window {
                count: 0,
                expires_at: now + window,
            });

        entry.count += 1;
        Ok(WindowState {
            count: entry.count,
            expires_in: entry.expires_at.saturating_duration_since(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tollgate_core::{EventContext, Limiter, Rule};

    #[tokio::test]
    async fn test_counts_hits_within_a_window() {
        let store = InMemoryCounterStore::new();
        let window = Duration::from_secs(5);

        let first = store.hit("k", window).await.unwrap();
        assert_eq!(first.count, 1);
        assert!(first.expires_in <= window);

        let second = store.hit("k", window).await.unwrap();
        assert_eq!(second.count, 2);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = InMemoryCounterStore::new();
        let window = Duration::from_secs(5);

        store.hit("a", window).await.unwrap();
        store.hit("a", window).await.unwrap();
        let other = store.hit("b", window).await.unwrap();
        assert_eq!(other.count, 1);
    }

    #[tokio::test]
    async fn test_window_resets_after_expiry() {
        let store = InMemoryCounterStore::new();
        let window = Duration::from_millis(50);

        store.hit("k", window).await.unwrap();
        store.hit("k", window).await.unwrap();

        tokio::time::sleep(Duration::from_millis(80)).await;

        let fresh = store.hit("k", window).await.unwrap();
        assert_eq!(fresh.count, 1);
    }

    #[tokio::test]
    async fn test_end_to_end_admission_scenario() {
        let limiter = Limiter::new(Arc::new(InMemoryCounterStore::new()));
        let event = EventContext::from_origin("10.0.0.1");
        let rule = Rule::new(2, Duration::from_millis(100)).unwrap();

        assert!(limiter.check(&event, &rule).await.unwrap().admitted);
        assert!(limiter.check(&event, &rule).await.unwrap().admitted);

        let denied = limiter.check(&event, &rule).await.unwrap();
        assert!(!denied.admitted);
        assert!(denied.retry_after <= Duration::from_millis(100));
        assert!(denied.retry_after > Duration::ZERO);

        tokio::time::sleep(Duration::from_millis(130)).await;
        assert!(limiter.check(&event, &rule).await.unwrap().admitted);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_hits_admit_exactly_capacity() {
        let limiter = Limiter::new(Arc::new(InMemoryCounterStore::new()));
        let rule = Rule::new(5, Duration::from_secs(30)).unwrap();

        let mut tasks = Vec::new();
        for _ in 0..20 {
            let limiter = limiter.clone();
            let rule = rule.clone();
            tasks.push(tokio::spawn(async move {
                let event = EventContext::from_origin("10.0.0.1");
                limiter.check(&event, &rule).await.unwrap().admitted
            }));
        }

        let mut admitted = 0;
        for task in tasks {
            if task.await.unwrap() {
                admitted += 1;
            }
        }
        assert_eq!(admitted, 5);
    }

    #[tokio::test]
    async fn test_context_keys_are_tracked_independently() {
        let limiter = Limiter::new(Arc::new(InMemoryCounterStore::new()));
        let rule = Rule::new(1, Duration::from_secs(30)).unwrap();

        let alice = EventContext::from_origin("10.0.0.1").with_context_key("alice");
        let bob = EventContext::from_origin("10.0.0.1").with_context_key("bob");

        assert!(limiter.check(&alice, &rule).await.unwrap().admitted);
        // Same origin, different context key: independent counter.
        assert!(limiter.check(&bob, &rule).await.unwrap().admitted);
        assert!(!limiter.check(&alice, &rule).await.unwrap().admitted);
    }

    #[tokio::test]
    async fn test_identical_rules_share_counter_state() {
        let limiter = Limiter::new(Arc::new(InMemoryCounterStore::new()));
        let event = EventContext::from_origin("10.0.0.1");
        let a = Rule::new(2, Duration::from_secs(30)).unwrap();
        let b = Rule::new(2, Duration::from_secs(30)).unwrap();

        assert!(limiter.check(&event, &a).await.unwrap().admitted);
        assert!(limiter.check(&event, &b).await.unwrap().admitted);
        // Both rules drained the same counter.
        assert!(!limiter.check(&event, &a).await.unwrap().admitted);
    }

    #[tokio::test]
    async fn test_zero_capacity_always_denies() {
        let limiter = Limiter::new(Arc::new(InMemoryCounterStore::new()));
        let event = EventContext::from_origin("10.0.0.1");
        let rule = Rule::new(0, Duration::from_millis(50)).unwrap();

        assert!(!limiter.check(&event, &rule).await.unwrap().admitted);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!limiter.check(&event, &rule).await.unwrap().admitted);
    }
}
