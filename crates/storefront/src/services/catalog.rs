//! Cached product catalog.
//!
//! The public product list is the most requested endpoint and changes only
//! when an admin edits the catalog, so the full list is cached with `moka` and
//! dropped on every product write. A generation counter keeps a load that
//! raced with a write from caching the list it read before the write.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;
use tracing::debug;

use crate::db::{ProductRepository, RepositoryError};
use crate::models::product::Product;

const ALL_PRODUCTS: &str = "products:all";

/// Product list cache shared by all handlers.
#[derive(Clone)]
pub struct ProductCatalog {
    cache: Cache<&'static str, Arc<Vec<Product>>>,
    generation: Arc<AtomicU64>,
}

impl ProductCatalog {
    /// Create an empty catalog cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self {
            cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// All products, oldest first, from the cache when warm.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the cache is cold and the query fails.
    pub async fn all(&self, pool: &PgPool) -> Result<Arc<Vec<Product>>, RepositoryError> {
        self.get_or_load(ProductRepository::new(pool).list()).await
    }

    async fn get_or_load<F, E>(&self, load: F) -> Result<Arc<Vec<Product>>, E>
    where
        F: Future<Output = Result<Vec<Product>, E>>,
    {
        if let Some(products) = self.cache.get(ALL_PRODUCTS).await {
            debug!(count = products.len(), "Product list served from cache");
            return Ok(products);
        }

        let generation = self.generation.load(Ordering::Acquire);
        let products = Arc::new(load.await?);
        if self.generation.load(Ordering::Acquire) != generation {
            debug!("Catalog changed during load, not caching product list");
            return Ok(products);
        }

        self.cache.insert(ALL_PRODUCTS, Arc::clone(&products)).await;
        // An invalidate between the check and the insert must still win.
        if self.generation.load(Ordering::Acquire) != generation {
            self.cache.invalidate(ALL_PRODUCTS).await;
        }
        Ok(products)
    }

    /// Drop the cached list after a catalog write.
    pub async fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate(ALL_PRODUCTS).await;
    }
}

impl Default for ProductCatalog {
    fn default() -> Self {
        Self::new(Duration::from_secs(300))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_is_cached() {
        let catalog = ProductCatalog::default();
        let products = catalog
            .get_or_load(async { Ok::<_, RepositoryError>(Vec::new()) })
            .await
            .unwrap();
        assert!(products.is_empty());
        assert!(catalog.cache.get(ALL_PRODUCTS).await.is_some());

        catalog.invalidate().await;
        assert!(catalog.cache.get(ALL_PRODUCTS).await.is_none());
    }

    #[tokio::test]
    async fn test_invalidate_during_load_skips_insert() {
        let catalog = ProductCatalog::default();
        let writer = catalog.clone();
        catalog
            .get_or_load(async move {
                writer.invalidate().await;
                Ok::<_, RepositoryError>(Vec::new())
            })
            .await
            .unwrap();
        assert!(catalog.cache.get(ALL_PRODUCTS).await.is_none());

        catalog
            .get_or_load(async { Ok::<_, RepositoryError>(Vec::new()) })
            .await
            .unwrap();
        assert!(catalog.cache.get(ALL_PRODUCTS).await.is_some());
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let catalog = ProductCatalog::default();
        let result = catalog
            .get_or_load(async { Err::<Vec<Product>, _>(RepositoryError::NotFound) })
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
        assert!(catalog.cache.get(ALL_PRODUCTS).await.is_none());
    }
}
