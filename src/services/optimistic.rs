use std::{collections::HashMap, fmt::Debug, future::Future, hash::Hash, sync::Arc};
use tokio::sync::Mutex;

use crate::error::AppResult;

/// Snapshot cache with optimistic writes.
///
/// `mutate` publishes a predicted value immediately, then swaps in the
/// confirmed value once the remote write resolves, or restores the prior
/// snapshot if it fails. Last writer wins; there is no merge.
#[derive(Clone)]
pub struct OptimisticCache<K, V> {
    entries: Arc<Mutex<HashMap<K, V>>>,
}

impl<K, V> Default for OptimisticCache<K, V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, V> OptimisticCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.lock().await.get(key).cloned()
    }

    pub async fn insert(&self, key: K, value: V) {
        self.entries.lock().await.insert(key, value);
    }

    pub async fn remove(&self, key: &K) -> Option<V> {
        self.entries.lock().await.remove(key)
    }

    /// Apply `predict` to the cached value (or `seed` when nothing is cached),
    /// publish it, then run `write`.
    ///
    /// A failing `predict` aborts before anything is published. The lock is
    /// never held across the remote write.
    pub async fn mutate<P, W, Fut>(
        &self,
        key: K,
        seed: impl FnOnce() -> V,
        predict: P,
        write: W,
    ) -> AppResult<V>
    where
        P: FnOnce(&V) -> AppResult<V>,
        W: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<V>>,
    {
        let previous = {
            let mut entries = self.entries.lock().await;
            let previous = entries.get(&key).cloned();
            let base = previous.clone().unwrap_or_else(seed);
            let predicted = predict(&base)?;
            entries.insert(key.clone(), predicted);
            previous
        };

        match write().await {
            Ok(confirmed) => {
                self.entries
                    .lock()
                    .await
                    .insert(key.clone(), confirmed.clone());
                tracing::debug!(key = ?key, "Optimistic write confirmed");
                Ok(confirmed)
            }
            Err(e) => {
                let mut entries = self.entries.lock().await;
                match previous {
                    Some(snapshot) => {
                        entries.insert(key.clone(), snapshot);
                    }
                    None => {
                        entries.remove(&key);
                    }
                }
                tracing::warn!(key = ?key, error = %e, "Optimistic write failed, rolled back");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_confirmed_value_replaces_prediction() {
        let cache: OptimisticCache<&str, u32> = OptimisticCache::new();
        cache.insert("water", 250).await;

        let result = cache
            .mutate("water", || 0, |v| Ok(v + 250), || async { Ok(600) })
            .await
            .unwrap();

        assert_eq!(result, 600);
        assert_eq!(cache.get(&"water").await, Some(600));
    }

    #[tokio::test]
    async fn test_prediction_visible_before_write_resolves() {
        let cache: OptimisticCache<&str, u32> = OptimisticCache::new();
        cache.insert("water", 250).await;
        let observer = cache.clone();

        cache
            .mutate(
                "water",
                || 0,
                |v| Ok(v + 250),
                || async move {
                    assert_eq!(observer.get(&"water").await, Some(500));
                    Ok(500)
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failed_write_restores_snapshot() {
        let cache: OptimisticCache<&str, u32> = OptimisticCache::new();
        cache.insert("water", 250).await;

        let result = cache
            .mutate(
                "water",
                || 0,
                |v| Ok(v + 250),
                || async { Err(AppError::Upstream("network down".into())) },
            )
            .await;

        assert!(matches!(result, Err(AppError::Upstream(_))));
        assert_eq!(cache.get(&"water").await, Some(250));
    }

    #[tokio::test]
    async fn test_failed_write_without_snapshot_clears_key() {
        let cache: OptimisticCache<&str, u32> = OptimisticCache::new();

        let result = cache
            .mutate(
                "water",
                || 0,
                |v| Ok(v + 250),
                || async { Err(AppError::Unauthorized) },
            )
            .await;

        assert!(result.is_err());
        assert_eq!(cache.get(&"water").await, None);
    }

    #[tokio::test]
    async fn test_validation_error_skips_write() {
        let cache: OptimisticCache<&str, u32> = OptimisticCache::new();
        cache.insert("water", 250).await;
        let mut write_called = false;

        let result = cache
            .mutate(
                "water",
                || 0,
                |_| Err(AppError::Validation("nope".into())),
                || {
                    write_called = true;
                    async { Ok(0) }
                },
            )
            .await;

        assert!(result.is_err());
        assert!(!write_called);
        assert_eq!(cache.get(&"water").await, Some(250));
    }
}
