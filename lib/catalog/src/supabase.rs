//! Catalog source backed by a Supabase (PostgREST) `products` table.

use async_trait::async_trait;
use nexin_core::{Error, RawProduct, Result};
use std::time::Duration;
use tracing::{debug, info};

use crate::source::CatalogSource;

pub const PRODUCTS_PATH: &str = "/rest/v1/products?select=id,name,brand,category,description,price";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the catalog store
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl CatalogConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Both the URL and the key must be non-blank.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::InvalidConfig("catalog URL is not set".to_string()));
        }
        if self.api_key.trim().is_empty() {
            return Err(Error::InvalidConfig("catalog key is not set".to_string()));
        }
        Ok(())
    }

    pub fn products_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), PRODUCTS_PATH)
    }
}

pub struct SupabaseCatalog {
    config: CatalogConfig,
    client: reqwest::Client,
}

impl SupabaseCatalog {
    pub fn new(config: CatalogConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }
}

#[async_trait]
impl CatalogSource for SupabaseCatalog {
    fn name(&self) -> &str {
        "supabase"
    }

    async fn fetch(&self) -> Result<Vec<RawProduct>> {
        let url = self.config.products_url();
        debug!("Fetching catalog from {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Fetch(format!("HTTP {}: {}", status, body)));
        }

        let records: Vec<RawProduct> = response
            .json()
            .await
            .map_err(|e| Error::Fetch(format!("invalid catalog body: {}", e)))?;

        info!("Loaded {} products from {}", records.len(), self.name());
        Ok(records)
    }
}
