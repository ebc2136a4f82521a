//! # process: per-ticket enrichment
//!
//! Turns an extracted batch of [`Ticket`]s into [`ProcessedTicket`]s:
//!   - titles normalized, categories inferred, resolution quality and time scored
//!   - tickets with too short a resolution dropped
//!   - a similarity pass over `title + description` counts corroborating tickets
//!   - a confidence score derived from quality and that count
//!
//! The similarity pass here is independent of the one article synthesis runs
//! over descriptions and resolutions. Each feeds a different consumer.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::{infer_category, CategoryConfig};
use crate::cluster::{SimilarityClusterer, DEFAULT_SIMILARITY_THRESHOLD};
use crate::quality::{calculate_confidence, resolution_time_hours, score_resolution_quality};
use crate::ticket::{ProcessedTicket, Ticket};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    pub min_resolution_length: usize,
    pub max_title_length: usize,
    pub similarity_threshold: f64,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            min_resolution_length: 40,
            max_title_length: 140,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Collapses whitespace runs to single spaces and truncates to `max_length`
/// characters.
pub fn normalize_title(title: &str, max_length: usize) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_length)
        .collect()
}

pub fn process_tickets(
    tickets: Vec<Ticket>,
    config: &ProcessConfig,
    categories: &CategoryConfig,
) -> Vec<ProcessedTicket> {
    info!(tickets = tickets.len(), "Processing tickets");
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut processed: Vec<ProcessedTicket> = tickets
        .into_iter()
        .filter_map(|ticket| {
            let title = normalize_title(&ticket.title, config.max_title_length);
            let category = infer_category(&format!("{} {}", title, ticket.description), categories);
            if ticket.resolution.chars().count() < config.min_resolution_length {
                debug!(
                    ticket_id = %ticket.ticket_id,
                    resolution_length = ticket.resolution.chars().count(),
                    "Dropping ticket with short resolution"
                );
                return None;
            }
            Some(ProcessedTicket {
                resolution_quality: score_resolution_quality(&ticket.resolution),
                resolution_time_hours: resolution_time_hours(
                    ticket.created_date.as_deref(),
                    ticket.resolved_date.as_deref(),
                ),
                ticket_id: ticket.ticket_id,
                title,
                description: ticket.description,
                resolution: ticket.resolution,
                status: ticket.status,
                created_date: ticket.created_date,
                resolved_date: ticket.resolved_date,
                category,
                similar_issue_count: 0,
                confidence_score: 0.0,
                last_updated: Some(now.clone()),
            })
        })
        .collect();

    let texts: Vec<String> = processed
        .iter()
        .map(|t| format!("{} {}", t.title, t.description))
        .collect();
    let clusters = SimilarityClusterer::new(config.similarity_threshold).cluster(&texts);
    for cluster in &clusters {
        for &index in cluster {
            processed[index].similar_issue_count = cluster.len();
        }
    }

    for ticket in processed.iter_mut() {
        ticket.confidence_score =
            calculate_confidence(ticket.resolution_quality, ticket.similar_issue_count);
    }

    info!(
        processed = processed.len(),
        similarity_clusters = clusters.len(),
        "Processed tickets"
    );
    processed
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn ticket(id: &str, title: &str, description: &str, resolution: &str) -> Ticket {
        Ticket {
            ticket_id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            resolution: resolution.to_string(),
            status: "Resolved".to_string(),
            created_date: Some("2024-01-01".to_string()),
            resolved_date: Some("2024-01-02".to_string()),
            category: Some("software".to_string()),
        }
    }

    fn config(min_resolution_length: usize) -> ProcessConfig {
        ProcessConfig {
            min_resolution_length,
            ..ProcessConfig::default()
        }
    }

    #[test]
    fn normalize_title_collapses_and_truncates() {
        assert_eq!(normalize_title("  VPN \t  keeps\n dropping ", 140), "VPN keeps dropping");
        assert_eq!(normalize_title("abcdef", 3), "abc");
    }

    #[test]
    fn short_resolution_is_dropped() {
        let processed = process_tickets(
            vec![ticket("1", "Test", "desc", "short")],
            &config(10),
            &CategoryConfig::default(),
        );
        assert!(processed.is_empty());
    }

    #[test]
    fn resolution_at_min_length_is_kept() {
        let processed = process_tickets(
            vec![ticket("1", "Test", "desc", "0123456789")],
            &config(10),
            &CategoryConfig::default(),
        );
        assert_eq!(processed.len(), 1);
    }

    #[test]
    fn derived_columns_are_filled() {
        let mut keywords = IndexMap::new();
        keywords.insert("software".to_string(), vec!["desc".to_string()]);
        let processed = process_tickets(
            vec![ticket(
                "2",
                "Long title",
                "desc",
                "This is a sufficiently long resolution text.",
            )],
            &config(10),
            &CategoryConfig::new(keywords),
        );
        let row = &processed[0];
        assert_eq!(row.category, "software");
        assert_eq!(row.similar_issue_count, 1);
        assert_eq!(row.resolution_time_hours, 24.0);
        assert_eq!(row.resolution_quality, 0.11);
        assert_eq!(row.confidence_score, calculate_confidence(0.11, 1));
        assert!(row.confidence_score >= 0.5);
        assert!(row.last_updated.is_some());
    }

    #[test]
    fn similar_titles_raise_similar_issue_count() {
        let resolution = "Reinstalled the VPN client and reissued the certificate.";
        let processed = process_tickets(
            vec![
                ticket("1", "VPN issue", "VPN drops", resolution),
                ticket("2", "VPN issue", "VPN drops", resolution),
                ticket("3", "Printer jam", "Paper stuck in tray", resolution),
            ],
            &config(10),
            &CategoryConfig::default(),
        );
        let counts: Vec<usize> = processed.iter().map(|t| t.similar_issue_count).collect();
        assert_eq!(counts, vec![2, 2, 1]);
        assert!(processed[0].confidence_score > processed[2].confidence_score);
        assert!(processed.iter().all(|t| t.category == "general"));
    }
}
