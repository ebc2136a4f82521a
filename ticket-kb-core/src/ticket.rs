//! Ticket records as they move through the pipeline.
//!
//! Exports are loosely typed: ids may be numbers, text columns may be `null`.
//! The deserializers here accept both and normalise to strings so that
//! downstream stages never see a missing text field.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One untyped row as read from an export, keyed by the export's column names.
pub type RawRow = serde_json::Map<String, Value>;

/// A ticket after field normalisation, before enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    #[serde(deserialize_with = "required_text")]
    pub ticket_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub resolution: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub created_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub resolved_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub category: Option<String>,
}

/// A ticket with every derived column filled in. This is the row shape of
/// `processed.json` and the input of article synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedTicket {
    #[serde(deserialize_with = "required_text")]
    pub ticket_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub resolution: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub created_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub resolved_date: Option<String>,
    #[serde(default = "default_category", deserialize_with = "lenient_category")]
    pub category: String,
    #[serde(default)]
    pub resolution_quality: f64,
    #[serde(default)]
    pub resolution_time_hours: f64,
    #[serde(default)]
    pub similar_issue_count: usize,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub last_updated: Option<String>,
}

fn default_category() -> String {
    crate::classify::DEFAULT_CATEGORY.to_string()
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(value_to_text)
        .unwrap_or_default())
}

/// Like `lenient_text`, but `null` or blank is an error. Ids must stay unique
/// within a batch, so an id-less row is rejected rather than given `""`.
fn required_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_optional_text(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("ticket_id must not be null or empty"))
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(value_to_text)
        .filter(|s| !s.trim().is_empty()))
}

fn lenient_category<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_text(deserializer)?.unwrap_or_else(default_category))
}
