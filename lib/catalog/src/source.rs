use async_trait::async_trait;
use nexin_core::{RawProduct, Result};
use parking_lot::RwLock;

/// Read-only access to the product catalog.
///
/// Implementations report every failure (transport, timeout, bad status,
/// malformed body) as an error; they never panic.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<RawProduct>>;
}

/// In-memory catalog whose contents can be swapped between fetches.
#[derive(Default)]
pub struct StaticCatalog {
    records: RwLock<Vec<RawProduct>>,
}

impl StaticCatalog {
    pub fn new(records: Vec<RawProduct>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn set(&self, records: Vec<RawProduct>) {
        *self.records.write() = records;
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self) -> Result<Vec<RawProduct>> {
        Ok(self.records.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_catalog_swaps_contents() {
        let catalog = StaticCatalog::new(vec![RawProduct::new("a", "Mouse", "", "", "", 1.0)]);
        assert_eq!(catalog.fetch().await.unwrap().len(), 1);

        catalog.set(Vec::new());
        assert!(catalog.fetch().await.unwrap().is_empty());
        assert!(catalog.is_empty());
    }
}
