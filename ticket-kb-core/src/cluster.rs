//! # cluster: cosine similarity and greedy seed-centred clustering
//!
//! Clusters are star-shaped: each cluster is seeded by the first unclustered
//! index, and only indices directly similar to that seed join it. Similarity
//! is not followed transitively, so this is not connected-components
//! clustering.
//!
//! Every pass materializes the full N×N similarity matrix, so memory grows
//! quadratically with the batch. Batches of a few thousand tickets are the
//! practical ceiling.

use tracing::{debug, info};

use crate::vectorize::{SparseVector, TfidfMatrix, TfidfVectorizer};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.75;

/// `dot(a, b) / (|a| |b|)`, or 0 when either vector has zero norm.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let norms = a.norm() * b.norm();
    if norms == 0.0 {
        return 0.0;
    }
    a.dot(b) / norms
}

/// Full symmetric similarity matrix over the rows of `matrix`.
pub fn similarity_matrix(matrix: &TfidfMatrix) -> Vec<Vec<f64>> {
    let n = matrix.len();
    debug!(
        documents = n,
        cells = n * n,
        "Allocating pairwise similarity matrix"
    );
    let mut similarity = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in i..n {
            let value = cosine_similarity(&matrix.rows[i], &matrix.rows[j]);
            similarity[i][j] = value;
            similarity[j][i] = value;
        }
    }
    similarity
}

#[derive(Debug, Clone)]
pub struct SimilarityClusterer {
    threshold: f64,
    vectorizer: TfidfVectorizer,
}

impl Default for SimilarityClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl SimilarityClusterer {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            vectorizer: TfidfVectorizer::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Partitions `0..texts.len()` into clusters. Indices inside a cluster
    /// appear in the order they were claimed: the seed first, then members
    /// in ascending order.
    pub fn cluster<S: AsRef<str>>(&self, texts: &[S]) -> Vec<Vec<usize>> {
        if texts.is_empty() {
            return Vec::new();
        }

        let matrix = self.vectorizer.fit_transform(texts);
        let similarity = similarity_matrix(&matrix);

        let mut visited = vec![false; texts.len()];
        let mut clusters = Vec::new();
        for seed in 0..texts.len() {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;
            let mut cluster = vec![seed];
            for other in 0..texts.len() {
                if !visited[other] && similarity[seed][other] >= self.threshold {
                    visited[other] = true;
                    cluster.push(other);
                }
            }
            clusters.push(cluster);
        }

        info!(
            texts = texts.len(),
            clusters = clusters.len(),
            threshold = self.threshold,
            "Clustered texts by similarity"
        );
        clusters
    }
}

pub fn cluster_by_similarity<S: AsRef<str>>(texts: &[S], threshold: f64) -> Vec<Vec<usize>> {
    SimilarityClusterer::new(threshold).cluster(texts)
}
