//! # extract: export rows to normalized tickets
//!
//! Exports name their columns however the helpdesk does. A field map from
//! canonical name to export column renames them, then rows are checked and
//! deserialized into [`Ticket`]s. Two filters finish extraction: only tickets
//! in a resolved status, and only those with a long enough resolution.

use std::collections::BTreeSet;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::PipelineError;
use crate::ticket::{RawRow, Ticket};

pub const REQUIRED_FIELDS: [&str; 8] = [
    "ticket_id",
    "title",
    "description",
    "resolution",
    "status",
    "created_date",
    "resolved_date",
    "category",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// JSON export to read.
    pub path: PathBuf,
    /// Canonical field name → export column name.
    #[serde(default)]
    pub fields: IndexMap<String, String>,
    #[serde(default = "default_resolved_status_values")]
    pub resolved_status_values: Vec<String>,
    #[serde(default = "default_min_resolution_length")]
    pub min_resolution_length: usize,
}

fn default_resolved_status_values() -> Vec<String> {
    vec!["Resolved".to_string(), "Closed".to_string()]
}

fn default_min_resolution_length() -> usize {
    40
}

impl ExtractConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fields: IndexMap::new(),
            resolved_status_values: default_resolved_status_values(),
            min_resolution_length: default_min_resolution_length(),
        }
    }
}

/// Renames export columns to canonical names and deserializes each row.
///
/// With a non-empty `fields` map only mapped columns are kept, in map order.
/// With an empty map the export must already use the canonical
/// [`REQUIRED_FIELDS`].
pub fn normalize_fields(
    rows: Vec<RawRow>,
    fields: &IndexMap<String, String>,
) -> Result<Vec<Ticket>, PipelineError> {
    let expected: Vec<&str> = if fields.is_empty() {
        REQUIRED_FIELDS.to_vec()
    } else {
        fields.keys().map(String::as_str).collect()
    };

    let renamed: Vec<RawRow> = if fields.is_empty() {
        rows
    } else {
        rows.into_iter()
            .map(|mut row| {
                fields
                    .iter()
                    .filter_map(|(canonical, column)| {
                        row.remove(column).map(|value| (canonical.clone(), value))
                    })
                    .collect()
            })
            .collect()
    };

    let missing: BTreeSet<String> = renamed
        .iter()
        .flat_map(|row| {
            expected
                .iter()
                .filter(|field| !row.contains_key(**field))
                .map(|field| field.to_string())
        })
        .collect();
    if !missing.is_empty() {
        let missing: Vec<String> = missing.into_iter().collect();
        error!(?missing, "Export is missing required fields");
        return Err(PipelineError::MissingFields(missing));
    }

    renamed
        .into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value(serde_json::Value::Object(row))
                .map_err(|source| PipelineError::InvalidRow { index, source })
        })
        .collect()
}

pub fn filter_resolved(tickets: Vec<Ticket>, resolved_status_values: &[String]) -> Vec<Ticket> {
    let before = tickets.len();
    let kept: Vec<Ticket> = tickets
        .into_iter()
        .filter(|t| resolved_status_values.iter().any(|s| *s == t.status))
        .collect();
    info!(before, after = kept.len(), "Filtered tickets by resolved status");
    kept
}

/// Keeps tickets whose resolution has at least `min_resolution_length` characters.
pub fn filter_quality(tickets: Vec<Ticket>, min_resolution_length: usize) -> Vec<Ticket> {
    let before = tickets.len();
    let kept: Vec<Ticket> = tickets
        .into_iter()
        .filter(|t| t.resolution.chars().count() >= min_resolution_length)
        .collect();
    info!(before, after = kept.len(), "Filtered tickets by resolution length");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRow {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn ticket(status: &str, resolution: &str) -> Ticket {
        Ticket {
            ticket_id: "1".into(),
            title: "Issue".into(),
            description: String::new(),
            resolution: resolution.into(),
            status: status.into(),
            created_date: None,
            resolved_date: None,
            category: None,
        }
    }

    #[test]
    fn filter_resolved_keeps_listed_statuses() {
        let kept = filter_resolved(
            vec![ticket("Resolved", "ok"), ticket("Open", "ok")],
            &["Resolved".to_string()],
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].status, "Resolved");
    }

    #[test]
    fn filter_quality_is_inclusive() {
        let kept = filter_quality(
            vec![ticket("Resolved", "short"), ticket("Resolved", "long enough")],
            8,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(filter_quality(vec![ticket("Resolved", "12345678")], 8).len(), 1);
    }

    #[test]
    fn normalize_fields_renames_columns() {
        let mut fields = IndexMap::new();
        fields.insert("ticket_id".to_string(), "id".to_string());
        fields.insert("title".to_string(), "title".to_string());
        fields.insert("status".to_string(), "state".to_string());
        let tickets = normalize_fields(
            vec![raw(json!({"id": 1, "title": "Issue", "state": "Resolved", "extra": "x"}))],
            &fields,
        )
        .unwrap();
        assert_eq!(tickets[0].ticket_id, "1");
        assert_eq!(tickets[0].status, "Resolved");
        assert_eq!(tickets[0].resolution, "");
    }

    #[test]
    fn normalize_fields_reports_missing_fields_sorted() {
        let mut fields = IndexMap::new();
        fields.insert("ticket_id".to_string(), "id".to_string());
        fields.insert("status".to_string(), "state".to_string());
        fields.insert("resolution".to_string(), "fix".to_string());
        let err = normalize_fields(vec![raw(json!({"id": 1}))], &fields).unwrap_err();
        match err {
            PipelineError::MissingFields(missing) => {
                assert_eq!(missing, vec!["resolution", "status"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn null_ticket_id_is_an_invalid_row() {
        let mut fields = IndexMap::new();
        fields.insert("ticket_id".to_string(), "id".to_string());
        fields.insert("title".to_string(), "title".to_string());
        let err = normalize_fields(
            vec![
                raw(json!({"id": 7, "title": "Printer"})),
                raw(json!({"id": null, "title": "Outlook"})),
            ],
            &fields,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRow { index: 1, .. }));
    }

    #[test]
    fn empty_field_map_requires_canonical_columns() {
        let err = normalize_fields(
            vec![raw(json!({"ticket_id": "1", "title": "Issue"}))],
            &IndexMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::MissingFields(ref m) if m.len() == 6));
    }
}
