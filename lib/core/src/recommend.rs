//! Candidate filtering, blended scoring and text-only fallback.
//!
//! Scoring for a source product `s` and candidate `c`:
//!
//! ```text
//! final = text_weight * sim[s][c] + price_weight * price_sim + brand_boost?
//! price_sim = 1 - |price(c) - price(s)| / max_price   (0 when price(s) == 0)
//! ```
//!
//! Candidates come from the source's category (or the whole catalog when
//! the category has fewer than two rows) and are dropped outright when their
//! price falls outside `price_range` of a positive source price. When fewer
//! than `top_n` survive, a text-only ranking of the whole catalog is appended.

use serde::{Deserialize, Serialize};

use crate::model::ModelGeneration;

/// How the fallback ranking is merged after the primary pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FallbackPolicy {
    /// Append the full fallback ranking; a candidate may appear twice.
    #[default]
    Append,
    /// Append only candidates not already present.
    AppendDistinct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendConfig {
    pub top_n: usize,
    pub price_range: f64,
    pub text_weight: f64,
    pub price_weight: f64,
    pub brand_boost: f64,
    pub fallback: FallbackPolicy,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            price_range: 0.30,
            text_weight: 0.80,
            price_weight: 0.15,
            brand_boost: 0.05,
            fallback: FallbackPolicy::Append,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreSource {
    Primary,
    Fallback,
}

/// A ranked candidate row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate {
    pub row: usize,
    pub score: f64,
    pub source: ScoreSource,
}

#[derive(Debug, Clone, Default)]
pub struct Recommender {
    config: RecommendConfig,
}

impl Recommender {
    pub fn new(config: RecommendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Ids of the top `config.top_n` recommendations.
    pub fn recommend(&self, model: &ModelGeneration, product_id: &str) -> Vec<String> {
        self.recommend_n(model, product_id, self.config.top_n)
    }

    /// Ids of the top `top_n` recommendations. Unknown ids and `top_n == 0`
    /// yield an empty list.
    pub fn recommend_n(&self, model: &ModelGeneration, product_id: &str, top_n: usize) -> Vec<String> {
        self.rank(model, product_id, top_n)
            .into_iter()
            .map(|candidate| model.product(candidate.row).id.clone())
            .collect()
    }

    /// Ranked candidates, at most `top_n`.
    pub fn rank(&self, model: &ModelGeneration, product_id: &str, top_n: usize) -> Vec<ScoredCandidate> {
        if top_n == 0 {
            return Vec::new();
        }
        let Some(idx) = model.row_of(product_id) else {
            return Vec::new();
        };

        let mut ranked = self.primary_pass(model, idx);

        if ranked.len() < top_n {
            let fallback = self.fallback_pass(model, idx);
            match self.config.fallback {
                FallbackPolicy::Append => ranked.extend(fallback),
                FallbackPolicy::AppendDistinct => {
                    let mut seen = vec![false; model.len()];
                    for candidate in &ranked {
                        seen[candidate.row] = true;
                    }
                    ranked.extend(fallback.into_iter().filter(|c| !seen[c.row]));
                }
            }
        }

        ranked.truncate(top_n);
        ranked
    }

    /// Rows sharing the source's category, or every row when fewer than two do.
    pub fn candidate_rows(&self, model: &ModelGeneration, idx: usize) -> Vec<usize> {
        let category = &model.product(idx).category;
        let same_category: Vec<usize> = model
            .products()
            .iter()
            .enumerate()
            .filter(|(_, p)| &p.category == category)
            .map(|(row, _)| row)
            .collect();

        if same_category.len() <= 1 {
            (0..model.len()).collect()
        } else {
            same_category
        }
    }

    fn primary_pass(&self, model: &ModelGeneration, idx: usize) -> Vec<ScoredCandidate> {
        let source = model.product(idx);
        let base_price = source.price;
        let max_price = model.max_price();
        let sims = model.similarity().row(idx);

        let mut scores: Vec<ScoredCandidate> = self
            .candidate_rows(model, idx)
            .into_iter()
            .filter(|&row| row != idx)
            .filter_map(|row| {
                let candidate = model.product(row);
                let price_gap = (candidate.price - base_price).abs();

                if base_price > 0.0 && price_gap > self.config.price_range * base_price {
                    return None;
                }

                let text_sim = sims[row];
                let price_sim = if base_price > 0.0 {
                    1.0 - price_gap / max_price
                } else {
                    0.0
                };
                let brand_sim = if candidate.brand == source.brand {
                    self.config.brand_boost
                } else {
                    0.0
                };

                Some(ScoredCandidate {
                    row,
                    score: self.config.text_weight * text_sim
                        + self.config.price_weight * price_sim
                        + brand_sim,
                    source: ScoreSource::Primary,
                })
            })
            .collect();

        sort_descending(&mut scores);
        scores
    }

    fn fallback_pass(&self, model: &ModelGeneration, idx: usize) -> Vec<ScoredCandidate> {
        let sims = model.similarity().row(idx);
        let mut scores: Vec<ScoredCandidate> = (0..model.len())
            .filter(|&row| row != idx)
            .map(|row| ScoredCandidate {
                row,
                score: sims[row],
                source: ScoreSource::Fallback,
            })
            .collect();

        sort_descending(&mut scores);
        scores
    }
}

// Stable: equal scores keep catalog row order
fn sort_descending(scores: &mut [ScoredCandidate]) {
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
}
