//! # Nexin
//!
//! A content-based product recommendation service.
//!
//! Given a product id, Nexin returns the most similar products in the
//! catalog by blending TF-IDF text similarity, price proximity and brand
//! affinity.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! SUPABASE_URL=https://xyz.supabase.co \
//! SUPABASE_SERVICE_ROLE_KEY=... \
//! ADMIN_RELOAD_TOKEN=... \
//! nexin --port 5000
//! ```
//!
//! ```bash
//! curl -X POST localhost:5000/recommend -d '{"product_id": "42"}'
//! curl -X POST localhost:5000/reload -H 'X-ADMIN-TOKEN: ...'
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use nexin::prelude::*;
//!
//! let records = vec![
//!     RawProduct::new("a", "Wireless Mouse", "Logi", "Electronics", "optical", 25.0),
//!     RawProduct::new("b", "Wireless Mouse Pro", "Logi", "Electronics", "laser", 29.0),
//! ];
//! let model = ModelGeneration::build(normalize(&records)).unwrap();
//! let ids = Recommender::default().recommend(&model, "a");
//! assert_eq!(ids[0], "b");
//! ```
//!
//! ## Crate Structure
//!
//! - `nexin-core` - Normalization, TF-IDF, similarity matrix, scoring, cache
//! - `nexin-catalog` - Catalog sources and the model lifecycle manager
//! - `nexin-api` - REST API

// Re-export core types
pub use nexin_core::{
    normalize, Error, FallbackPolicy, ModelGeneration, Product, RawProduct, RecommendConfig,
    RecommendationCache, Recommender, Result, SimilarityMatrix, TfidfVectorizer, VectorizerConfig,
};

// Re-export catalog
pub use nexin_catalog::{CatalogConfig, CatalogSource, ModelManager, StaticCatalog, SupabaseCatalog};

// Re-export API
pub use nexin_api::{ApiConfig, ApiState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        normalize, ApiConfig, CatalogConfig, CatalogSource, Error, FallbackPolicy,
        ModelGeneration, ModelManager, Product, RawProduct, RecommendConfig, Recommender,
        RestApi, Result, StaticCatalog, SupabaseCatalog,
    };
}
