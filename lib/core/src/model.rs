use ahash::AHashMap;
use std::time::Instant;
use tracing::debug;

use crate::product::Product;
use crate::similarity::SimilarityMatrix;
use crate::tfidf::{TfidfVectorizer, VectorizerConfig};
use crate::{Error, Result};

/// One immutable snapshot of the catalog and everything derived from it.
///
/// Products, the similarity matrix and the id index are built together from
/// one pass over the composite texts and only ever replaced as a whole, so
/// every row index in `index` is valid for `products` and `similarity`.
#[derive(Debug, Clone)]
pub struct ModelGeneration {
    products: Vec<Product>,
    similarity: SimilarityMatrix,
    index: AHashMap<String, usize>,
    max_price: f64,
    vocabulary_len: usize,
}

impl ModelGeneration {
    /// Build with the default vectorizer settings
    pub fn build(products: Vec<Product>) -> Result<Self> {
        Self::build_with(products, VectorizerConfig::default())
    }

    pub fn build_with(products: Vec<Product>, config: VectorizerConfig) -> Result<Self> {
        if products.is_empty() {
            return Err(Error::EmptyCatalog);
        }

        let started = Instant::now();
        let texts: Vec<String> = products.iter().map(Product::composite_text).collect();

        let mut vectorizer = TfidfVectorizer::new(config);
        let rows = vectorizer.fit_transform(&texts);
        let similarity = SimilarityMatrix::from_normalized_rows(&rows);

        // First occurrence of a duplicated id wins
        let mut index = AHashMap::with_capacity(products.len());
        for (row, product) in products.iter().enumerate() {
            index.entry(product.id.clone()).or_insert(row);
        }

        let max_price = products.iter().map(|p| p.price).fold(0.0f64, f64::max);
        let max_price = if max_price > 0.0 { max_price } else { 1.0 };

        debug!(
            "Built model: {} products, {} terms in {:?}",
            products.len(),
            vectorizer.vocabulary_len(),
            started.elapsed()
        );

        Ok(Self {
            products,
            similarity,
            index,
            max_price,
            vocabulary_len: vectorizer.vocabulary_len(),
        })
    }

    #[inline]
    pub fn row_of(&self, product_id: &str) -> Option<usize> {
        self.index.get(product_id).copied()
    }

    #[inline]
    pub fn product(&self, row: usize) -> &Product {
        &self.products[row]
    }

    #[inline]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[inline]
    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    #[inline]
    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    #[inline]
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary_len
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
