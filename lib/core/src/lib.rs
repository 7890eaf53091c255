//! # Nexin Core
//!
//! Core library for the Nexin recommendation service.
//!
//! This crate provides the model and scoring pipeline:
//!
//! - [`Product`] / [`RawProduct`] - Lenient catalog record normalization
//! - [`TfidfVectorizer`] - Unigram + bigram TF-IDF with English stop words
//! - [`SimilarityMatrix`] - Dense all-pairs cosine similarity
//! - [`ModelGeneration`] - Immutable snapshot of catalog, matrix, id index and max price
//! - [`Recommender`] - Category-first, price-banded scoring with text-only fallback
//! - [`RecommendationCache`] - Generation-bound LRU cache of results
//!
//! ## Example
//!
//! ```rust
//! use nexin_core::{normalize, ModelGeneration, RawProduct, Recommender};
//!
//! let records = vec![
//!     RawProduct::new("a", "Wireless Mouse", "Logi", "Electronics", "optical mouse", 25.0),
//!     RawProduct::new("b", "Wireless Mouse Pro", "Logi", "Electronics", "laser mouse", 28.0),
//!     RawProduct::new("c", "Steel Kettle", "Brew", "Kitchen", "1.7 litre", 30.0),
//! ];
//! let model = ModelGeneration::build(normalize(&records)).unwrap();
//!
//! let ids = Recommender::default().recommend(&model, "a");
//! assert_eq!(ids[0], "b");
//! ```

pub mod cache;
pub mod error;
pub mod model;
pub mod product;
pub mod recommend;
pub mod similarity;
pub mod stopwords;
pub mod tfidf;
pub mod vector;

pub use cache::{RecommendationCache, DEFAULT_CACHE_CAPACITY};
pub use error::{Error, Result};
pub use model::ModelGeneration;
pub use product::{normalize, Product, RawProduct};
pub use recommend::{FallbackPolicy, RecommendConfig, Recommender, ScoreSource, ScoredCandidate};
pub use similarity::SimilarityMatrix;
pub use tfidf::{TfidfVectorizer, VectorizerConfig};
pub use vector::SparseVector;
