//! All-pairs cosine similarity over TF-IDF rows.

use rayon::prelude::*;

use crate::vector::SparseVector;

/// Dense, symmetric `n x n` similarity matrix with a unit diagonal.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// Rows must already be L2-normalized, so cosine reduces to a dot product.
    /// Each upper-triangle cell is computed once and mirrored.
    pub fn from_normalized_rows(rows: &[SparseVector]) -> Self {
        let n = rows.len();

        let upper: Vec<Vec<f64>> = (0..n)
            .into_par_iter()
            .map(|i| {
                rows[i + 1..]
                    .iter()
                    .map(|other| rows[i].dot(other).clamp(0.0, 1.0))
                    .collect()
            })
            .collect();

        let mut data = vec![0.0f64; n * n];
        for (i, row) in upper.into_iter().enumerate() {
            data[i * n + i] = 1.0;
            for (offset, sim) in row.into_iter().enumerate() {
                let j = i + 1 + offset;
                data[i * n + j] = sim;
                data[j * n + i] = sim;
            }
        }

        Self { n, data }
    }

    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}
