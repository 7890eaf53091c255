//! # Nexin Catalog
//!
//! Catalog sources and the model lifecycle for the Nexin recommendation service.
//!
//! - [`CatalogSource`] - async, read-only product fetch
//! - [`SupabaseCatalog`] - PostgREST `products` table over HTTP
//! - [`StaticCatalog`] - in-memory source for tests and offline runs
//! - [`ModelManager`] - rebuilds, publishes and serves model generations

pub mod manager;
pub mod source;
pub mod supabase;

pub use manager::ModelManager;
pub use source::{CatalogSource, StaticCatalog};
pub use supabase::{CatalogConfig, SupabaseCatalog, DEFAULT_FETCH_TIMEOUT};
