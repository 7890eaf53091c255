use nexin_core::{
    normalize, Error, ModelGeneration, RecommendConfig, RecommendationCache, Recommender, Result,
};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::source::CatalogSource;

/// The published model together with its generation number
#[derive(Clone)]
struct Active {
    generation: u64,
    model: Option<Arc<ModelGeneration>>,
}

/// Owns the active model generation and its recommendation cache.
///
/// Readers clone the active `Arc` under a short read lock and score against
/// it without further locking. A rebuild fetches and builds off to the side,
/// then swaps the new generation in and resets the cache under the write
/// lock, so readers see either the old or the new generation in full.
/// Rebuilds are serialized.
pub struct ModelManager {
    source: Arc<dyn CatalogSource>,
    active: RwLock<Active>,
    cache: RecommendationCache,
    recommender: Recommender,
    rebuild_lock: tokio::sync::Mutex<()>,
}

impl ModelManager {
    pub fn new(source: Arc<dyn CatalogSource>, config: RecommendConfig, cache_capacity: usize) -> Self {
        Self {
            source,
            active: RwLock::new(Active {
                generation: 0,
                model: None,
            }),
            cache: RecommendationCache::new(cache_capacity),
            recommender: Recommender::new(config),
            rebuild_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Fetch the catalog, build a new generation and publish it.
    ///
    /// Returns false, leaving the current generation in place, when the
    /// fetch fails or the catalog is empty.
    pub async fn rebuild(&self) -> bool {
        let _guard = self.rebuild_lock.lock().await;
        let started = Instant::now();

        match self.build_next().await {
            Ok(model) => {
                let products = model.len();
                let generation = self.publish(model);
                info!(
                    "Model rebuilt from {}: generation {}, {} products in {:?}, cache cleared",
                    self.source.name(),
                    generation,
                    products,
                    started.elapsed()
                );
                true
            }
            Err(e) => {
                warn!("Model rebuild failed: {}", e);
                false
            }
        }
    }

    async fn build_next(&self) -> Result<ModelGeneration> {
        let records = self.source.fetch().await?;
        let products = normalize(&records);
        if products.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        build_off_thread(move || ModelGeneration::build(products)).await
    }

    fn publish(&self, model: ModelGeneration) -> u64 {
        let mut active = self.active.write();
        active.generation += 1;
        active.model = Some(Arc::new(model));
        self.cache.reset(active.generation);
        active.generation
    }

    fn snapshot(&self) -> Active {
        self.active.read().clone()
    }

    /// Cached top-N ids for `product_id`; empty when no model is loaded or
    /// the id is unknown.
    pub fn recommend(&self, product_id: &str) -> Arc<Vec<String>> {
        let Active { generation, model } = self.snapshot();
        let Some(model) = model else {
            return Arc::new(Vec::new());
        };

        self.cache.get_or_compute(generation, product_id, || {
            debug!("Cache miss for {}", product_id);
            self.recommender.recommend(&model, product_id)
        })
    }

    pub fn generation(&self) -> u64 {
        self.active.read().generation
    }

    pub fn products_loaded(&self) -> usize {
        self.active.read().model.as_ref().map_or(0, |m| m.len())
    }

    pub fn is_ready(&self) -> bool {
        self.active.read().model.is_some()
    }

    pub fn cache(&self) -> &RecommendationCache {
        &self.cache
    }
}

/// Run a CPU-heavy model build on the blocking pool. A panic inside the
/// build surfaces as `Error::Build`.
async fn build_off_thread<F>(build: F) -> Result<ModelGeneration>
where
    F: FnOnce() -> Result<ModelGeneration> + Send + 'static,
{
    tokio::task::spawn_blocking(build)
        .await
        .map_err(|e| Error::Build(format!("build task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticCatalog;
    use async_trait::async_trait;
    use nexin_core::RawProduct;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingCatalog;

    #[async_trait]
    impl CatalogSource for FailingCatalog {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch(&self) -> Result<Vec<RawProduct>> {
            Err(Error::Fetch("connection refused".to_string()))
        }
    }

    /// Tracks how many fetches are in flight at once
    struct CountingCatalog {
        inner: StaticCatalog,
        fetches: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl CountingCatalog {
        fn new(records: Vec<RawProduct>) -> Self {
            Self {
                inner: StaticCatalog::new(records),
                fetches: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CatalogSource for CountingCatalog {
        fn name(&self) -> &str {
            "counting"
        }

        async fn fetch(&self) -> Result<Vec<RawProduct>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.inner.fetch().await
        }
    }

    fn catalog() -> Vec<RawProduct> {
        vec![
            RawProduct::new("a", "Wireless Mouse", "Logi", "Electronics", "optical mouse", 25.0),
            RawProduct::new("b", "Wireless Mouse Pro", "Logi", "Electronics", "laser mouse", 28.0),
            RawProduct::new("c", "Gaming Keyboard", "Razer", "Electronics", "mechanical keys", 27.0),
        ]
    }

    fn manager_with(source: Arc<dyn CatalogSource>) -> ModelManager {
        ModelManager::new(source, RecommendConfig::default(), 100)
    }

    #[tokio::test]
    async fn test_not_ready_before_rebuild() {
        let manager = manager_with(Arc::new(StaticCatalog::new(catalog())));
        assert!(!manager.is_ready());
        assert_eq!(manager.products_loaded(), 0);
        assert!(manager.recommend("a").is_empty());
    }

    #[tokio::test]
    async fn test_rebuild_publishes_model() {
        let manager = manager_with(Arc::new(StaticCatalog::new(catalog())));
        assert!(manager.rebuild().await);
        assert!(manager.is_ready());
        assert_eq!(manager.products_loaded(), 3);
        assert_eq!(manager.generation(), 1);
        assert_eq!(manager.recommend("a")[0], "b");
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_nothing_loaded() {
        let manager = manager_with(Arc::new(FailingCatalog));
        assert!(!manager.rebuild().await);
        assert!(!manager.is_ready());
        assert_eq!(manager.generation(), 0);
    }

    #[tokio::test]
    async fn test_empty_catalog_keeps_previous_generation() {
        let source = Arc::new(StaticCatalog::new(catalog()));
        let manager = manager_with(source.clone());
        assert!(manager.rebuild().await);
        let before = manager.recommend("a");

        source.set(Vec::new());
        assert!(!manager.rebuild().await);
        assert_eq!(manager.generation(), 1);
        assert_eq!(manager.products_loaded(), 3);
        assert_eq!(manager.recommend("a"), before);
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let manager = manager_with(Arc::new(StaticCatalog::new(catalog())));
        manager.rebuild().await;

        let first = manager.recommend("a");
        let second = manager.recommend("a");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(manager.cache().hits(), 1);
    }

    #[tokio::test]
    async fn test_rebuild_invalidates_cache() {
        let source = Arc::new(StaticCatalog::new(catalog()));
        let manager = manager_with(source.clone());
        manager.rebuild().await;
        assert_eq!(manager.recommend("a")[0], "b");
        assert_eq!(manager.cache().len(), 1);

        // "b" leaves the catalog; "a" must be recomputed against the new rows
        source.set(vec![
            RawProduct::new("a", "Wireless Mouse", "Logi", "Electronics", "optical mouse", 25.0),
            RawProduct::new("c", "Gaming Keyboard", "Razer", "Electronics", "mechanical keys", 27.0),
        ]);
        assert!(manager.rebuild().await);
        assert!(manager.cache().is_empty());

        let after = manager.recommend("a");
        assert!(!after.contains(&"b".to_string()));
        assert_eq!(after[0], "c");
    }

    #[tokio::test]
    async fn test_build_panic_reported_as_build_error() {
        let result = build_off_thread(|| -> Result<ModelGeneration> { panic!("matrix construction blew up") }).await;
        assert!(matches!(result, Err(Error::Build(_))));

        let ok = build_off_thread(|| ModelGeneration::build(normalize(&catalog()))).await;
        assert_eq!(ok.unwrap().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_rebuilds_serialize() {
        let source = Arc::new(CountingCatalog::new(catalog()));
        let manager = Arc::new(manager_with(source.clone()));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.rebuild().await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap());
        }

        assert_eq!(source.fetches.load(Ordering::SeqCst), 4);
        assert_eq!(source.max_in_flight.load(Ordering::SeqCst), 1);
        assert_eq!(manager.generation(), 4);
        assert_eq!(manager.products_loaded(), 3);
    }
}
