//! # vectorize: TF-IDF vectors and keyword extraction
//!
//! One parameterized vectorizer serves both clustering passes (unbounded
//! vocabulary) and keyword extraction (at most `max_features` terms per
//! document). The vocabulary is always built jointly over the whole batch.
//!
//! Weighting follows the usual smoothed scheme:
//! `tfidf(t, d) = count(t, d) * (ln((1 + n) / (1 + df(t))) + 1)`, after which
//! every row is L2-normalized. Rows with no surviving terms stay all-zero.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::stop_words::is_stop_word;

/// Default number of keywords kept per ticket.
pub const DEFAULT_KEYWORD_COUNT: usize = 5;

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

/// Lower-cases `text` and splits it into tokens of two or more word
/// characters, dropping English stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// A sparse, L2-normalized document vector: `(vocabulary index, weight)`
/// pairs sorted by index, zero weights omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product by merging the two sorted index lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Output of [`TfidfVectorizer::fit_transform`]: the shared vocabulary (sorted)
/// and one row per input text.
#[derive(Debug, Clone, Default)]
pub struct TfidfMatrix {
    pub vocabulary: Vec<String>,
    pub rows: Vec<SparseVector>,
}

impl TfidfMatrix {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    max_features: Option<usize>,
}

impl TfidfVectorizer {
    /// Vectorizer over the full vocabulary, as used for similarity.
    pub fn new() -> Self {
        Self { max_features: None }
    }

    /// Bounds keyword extraction to the `n` highest-weighted terms per document.
    pub fn with_max_features(n: usize) -> Self {
        Self {
            max_features: Some(n),
        }
    }

    pub fn max_features(&self) -> Option<usize> {
        self.max_features
    }

    pub fn fit_transform<S: AsRef<str>>(&self, texts: &[S]) -> TfidfMatrix {
        if texts.is_empty() {
            return TfidfMatrix::default();
        }

        let tokenized: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t.as_ref())).collect();

        let vocabulary: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.as_str(), i))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        let counts: Vec<BTreeMap<usize, usize>> = tokenized
            .iter()
            .map(|tokens| {
                let mut counts = BTreeMap::new();
                for token in tokens {
                    *counts.entry(index[token.as_str()]).or_insert(0) += 1;
                }
                for term in counts.keys() {
                    document_frequency[*term] += 1;
                }
                counts
            })
            .collect();

        let n = texts.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        let rows = counts
            .into_iter()
            .map(|counts| {
                let mut entries: Vec<(usize, f64)> = counts
                    .into_iter()
                    .map(|(term, count)| (term, count as f64 * idf[term]))
                    .collect();
                let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    for (_, w) in entries.iter_mut() {
                        *w /= norm;
                    }
                }
                SparseVector { entries }
            })
            .collect();

        debug!(
            documents = texts.len(),
            vocabulary = vocabulary.len(),
            "Fitted TF-IDF vectorizer"
        );
        TfidfMatrix { vocabulary, rows }
    }

    /// Per document, the terms with positive weight ranked by weight
    /// (ties keep vocabulary order), truncated to `max_features` if set.
    pub fn keywords<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<String>> {
        let matrix = self.fit_transform(texts);
        matrix
            .rows
            .iter()
            .map(|row| {
                let mut ranked: Vec<&(usize, f64)> =
                    row.entries.iter().filter(|(_, w)| *w > 0.0).collect();
                // Stable sort keeps vocabulary order among equal weights.
                ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
                let limit = self.max_features.unwrap_or(ranked.len());
                ranked
                    .into_iter()
                    .take(limit)
                    .map(|(term, _)| matrix.vocabulary[*term].clone())
                    .collect()
            })
            .collect()
    }
}

/// Top `max_features` keywords for each text.
pub fn extract_keywords<S: AsRef<str>>(texts: &[S], max_features: usize) -> Vec<Vec<String>> {
    TfidfVectorizer::with_max_features(max_features).keywords(texts)
}
