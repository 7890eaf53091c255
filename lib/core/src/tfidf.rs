// TF-IDF vectorizer over unigrams and bigrams
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::stopwords::is_english_stop_word;
use crate::vector::SparseVector;

/// Vectorizer settings. Defaults: (1, 2)-grams, English stop words,
/// terms in more than 80% of documents dropped, no frequency floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    pub ngram_range: (usize, usize),
    pub max_df: f64,
    pub min_df: usize,
    pub english_stop_words: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            max_df: 0.8,
            min_df: 1,
            english_stop_words: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    // term -> column
    vocabulary: AHashMap<String, u32>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    #[must_use]
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            vocabulary: AHashMap::new(),
            idf: Vec::new(),
        }
    }

    /// Tokenize text: lowercase, split on anything that is not alphanumeric
    /// or `_`, keep tokens of at least two characters.
    #[inline]
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|s| s.chars().count() >= 2)
            .map(str::to_string)
            .collect()
    }

    /// Stop-word filtered tokens expanded into the configured n-grams.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let tokens: Vec<String> = Self::tokenize(text)
            .into_iter()
            .filter(|t| !(self.config.english_stop_words && is_english_stop_word(t)))
            .collect();

        let (min_n, max_n) = self.config.ngram_range;
        let min_n = min_n.max(1);
        let mut terms = Vec::new();
        for n in min_n..=max_n.max(min_n) {
            if n == 1 {
                terms.extend(tokens.iter().cloned());
                continue;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }

    /// Learn the vocabulary and idf weights, then return one L2-normalized
    /// row per document.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> Vec<SparseVector> {
        let analyzed: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| self.analyze(doc.as_ref()))
            .collect();

        // term -> document frequency
        let mut term_dfs: AHashMap<&str, u32> = AHashMap::new();
        for terms in &analyzed {
            let mut seen: Vec<&str> = terms.iter().map(String::as_str).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *term_dfs.entry(term).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len() as f64;
        let max_doc_count = self.config.max_df * n_docs;
        let min_doc_count = self.config.min_df as u32;

        let mut kept: Vec<(&str, u32)> = term_dfs
            .into_iter()
            .filter(|(_, df)| (*df as f64) <= max_doc_count && *df >= min_doc_count)
            .collect();
        kept.sort_unstable_by(|a, b| a.0.cmp(b.0));

        self.vocabulary = kept
            .iter()
            .enumerate()
            .map(|(col, (term, _))| (term.to_string(), col as u32))
            .collect();
        self.idf = kept
            .iter()
            .map(|(_, df)| ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();

        analyzed.iter().map(|terms| self.weigh(terms)).collect()
    }

    fn weigh(&self, terms: &[String]) -> SparseVector {
        let mut counts: AHashMap<u32, u32> = AHashMap::new();
        for term in terms {
            if let Some(&col) = self.vocabulary.get(term) {
                *counts.entry(col).or_insert(0) += 1;
            }
        }

        let pairs = counts
            .into_iter()
            .map(|(col, tf)| (col, tf as f64 * self.idf[col as usize]))
            .collect();
        let mut row = SparseVector::from_pairs(pairs);
        row.normalize();
        row
    }

    #[inline]
    #[must_use]
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    #[inline]
    #[must_use]
    pub fn contains_term(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(VectorizerConfig::default())
    }
}
