//! # synthesize: knowledge-base articles from clusters of similar tickets
//!
//! Article synthesis runs its own clustering pass over `description + resolution`
//! and emits one [`Article`] per cluster. Aggregation per cluster:
//!   - title and category from the first member
//!   - symptoms are every member description, in cluster order
//!   - resolution is the longest member resolution (first one wins a tie)
//!   - keywords are the sorted union of member keywords
//!   - confidence is the mean member confidence plus a cluster-size boost

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::cluster::{SimilarityClusterer, DEFAULT_SIMILARITY_THRESHOLD};
use crate::quality::round2;
use crate::ticket::ProcessedTicket;
use crate::vectorize::{extract_keywords, DEFAULT_KEYWORD_COUNT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub similarity_threshold: f64,
    pub keyword_count: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            keyword_count: DEFAULT_KEYWORD_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub article_id: String,
    pub title: String,
    pub category: String,
    pub symptoms: Vec<String>,
    pub resolution: String,
    pub related_tickets: Vec<String>,
    pub confidence_score: f64,
    pub last_updated: String,
    pub keywords: Vec<String>,
}

/// `kb-` followed by the first eight hex digits of a v4 UUID.
pub fn new_article_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("kb-{}", &hex[..8])
}

/// Mean member confidence plus `min(len / 10, 0.3)`, capped at 1.0.
pub fn article_confidence(member_confidences: &[f64]) -> f64 {
    if member_confidences.is_empty() {
        return 0.0;
    }
    let count = member_confidences.len() as f64;
    let mean = member_confidences.iter().sum::<f64>() / count;
    round2((mean + (count / 10.0).min(0.3)).min(1.0))
}

/// Builds the article for one cluster. `cluster` must be non-empty and index
/// into both `tickets` and `keywords`.
pub fn build_article_from_cluster(
    tickets: &[ProcessedTicket],
    cluster: &[usize],
    keywords: &[Vec<String>],
    now: DateTime<Utc>,
) -> Article {
    let members: Vec<&ProcessedTicket> = cluster.iter().map(|&i| &tickets[i]).collect();
    let first = members[0];

    // Strict `>` keeps the first of equally long resolutions.
    let mut longest = first;
    for &member in &members[1..] {
        if member.resolution.chars().count() > longest.resolution.chars().count() {
            longest = member;
        }
    }

    let mut combined_keywords: Vec<String> = cluster
        .iter()
        .flat_map(|&i| keywords[i].iter().cloned())
        .collect();
    combined_keywords.sort();
    combined_keywords.dedup();

    let confidences: Vec<f64> = members.iter().map(|t| t.confidence_score).collect();

    Article {
        article_id: new_article_id(),
        title: first.title.trim().to_string(),
        category: first.category.clone(),
        symptoms: members.iter().map(|t| t.description.clone()).collect(),
        resolution: longest.resolution.trim().to_string(),
        related_tickets: members.iter().map(|t| t.ticket_id.clone()).collect(),
        confidence_score: article_confidence(&confidences),
        last_updated: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        keywords: combined_keywords,
    }
}

pub fn build_articles(tickets: &[ProcessedTicket], config: &SynthesisConfig) -> Vec<Article> {
    info!(tickets = tickets.len(), "Synthesizing articles");
    let combined_texts: Vec<String> = tickets
        .iter()
        .map(|t| format!("{} {}", t.description, t.resolution).trim().to_string())
        .collect();

    let keywords = extract_keywords(&combined_texts, config.keyword_count);
    let clusters = SimilarityClusterer::new(config.similarity_threshold).cluster(&combined_texts);

    let now = Utc::now();
    let articles: Vec<Article> = clusters
        .iter()
        .map(|cluster| {
            let article = build_article_from_cluster(tickets, cluster, &keywords, now);
            debug!(
                article_id = %article.article_id,
                related = article.related_tickets.len(),
                confidence = article.confidence_score,
                "Built article"
            );
            article
        })
        .collect();

    info!(articles = articles.len(), "Synthesized articles");
    articles
}
