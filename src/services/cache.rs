//! Read-through cache for reference data
//!
//! Categories change rarely, so the list endpoint serves from memory and
//! refreshes on expiry. There is no invalidation path; stale entries are
//! simply outlived by the TTL.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::category::Category;

struct CachedCategories {
    fetched_at: Instant,
    categories: Vec<Category>,
}

#[derive(Clone)]
pub struct CategoryCache {
    inner: Arc<RwLock<Option<CachedCategories>>>,
    ttl: Duration,
}

impl CategoryCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    /// Returns the cached list while it is still fresh
    pub async fn get(&self) -> Option<Vec<Category>> {
        let guard = self.inner.read().await;
        guard
            .as_ref()
            .filter(|cached| cached.fetched_at.elapsed() < self.ttl)
            .map(|cached| cached.categories.clone())
    }

    /// Stores a freshly fetched list
    pub async fn put(&self, categories: Vec<Category>) {
        let mut guard = self.inner.write().await;
        *guard = Some(CachedCategories {
            fetched_at: Instant::now(),
            categories,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(id: i32, nome: &str) -> Category {
        Category {
            id,
            nome: nome.to_string(),
            tipo: "som".to_string(),
            descricao: None,
            criado_em: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = CategoryCache::new(3600);
        assert!(cache.get().await.is_none());

        cache.put(vec![category(1, "Microfone com Fio")]).await;
        let hit = cache.get().await.unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].nome, "Microfone com Fio");
    }

    #[tokio::test]
    async fn test_zero_ttl_always_expires() {
        let cache = CategoryCache::new(0);
        cache.put(vec![category(1, "Mesa de Som")]).await;
        assert!(cache.get().await.is_none());
    }
}
