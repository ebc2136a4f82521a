//! Keyword-table categorisation.
//!
//! The first category, in the order the config file lists them, with any
//! keyword occurring in the text wins. Order matters and is preserved from the
//! JSON object via [`IndexMap`].

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::PipelineError;

pub const DEFAULT_CATEGORY: &str = "general";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryConfig {
    pub category_keywords: IndexMap<String, Vec<String>>,
}

impl CategoryConfig {
    pub fn new(category_keywords: IndexMap<String, Vec<String>>) -> Self {
        Self { category_keywords }
    }
}

/// Loads the category → keywords mapping from a JSON object file.
pub fn load_categories<P: AsRef<Path>>(path: P) -> Result<CategoryConfig, PipelineError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to read category config");
        PipelineError::io(path, e)
    })?;
    let config: CategoryConfig = serde_json::from_str(&content).map_err(|e| {
        error!(error = ?e, path = %path.display(), "Failed to parse category config");
        PipelineError::json(path, e)
    })?;
    info!(
        path = %path.display(),
        categories = config.category_keywords.len(),
        "Loaded category config"
    );
    Ok(config)
}

pub fn infer_category(text: &str, config: &CategoryConfig) -> String {
    let lowered = text.to_lowercase();
    config
        .category_keywords
        .iter()
        .find(|(_, keywords)| {
            keywords
                .iter()
                .any(|keyword| lowered.contains(&keyword.to_lowercase()))
        })
        .map(|(category, _)| category.clone())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config(pairs: &[(&str, &[&str])]) -> CategoryConfig {
        CategoryConfig::new(
            pairs
                .iter()
                .map(|(c, kws)| (c.to_string(), kws.iter().map(|k| k.to_string()).collect()))
                .collect(),
        )
    }

    #[test]
    fn empty_mapping_is_general() {
        assert_eq!(infer_category("VPN drops", &CategoryConfig::default()), "general");
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let cfg = config(&[("network", &["VPN"])]);
        assert_eq!(infer_category("my vpnclient fails", &cfg), "network");
    }

    #[test]
    fn first_category_in_insertion_order_wins() {
        let text = "Outlook crashes when VPN connects";
        let net_first = config(&[("network", &["vpn"]), ("software", &["outlook"])]);
        let sw_first = config(&[("software", &["outlook"]), ("network", &["vpn"])]);
        assert_eq!(infer_category(text, &net_first), "network");
        assert_eq!(infer_category(text, &sw_first), "software");
    }

    #[test]
    fn load_categories_keeps_file_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"zeta": ["printer"], "alpha": ["printer"], "mid": ["vpn"]}}"#
        )
        .unwrap();
        let cfg = load_categories(file.path()).unwrap();
        let names: Vec<&String> = cfg.category_keywords.keys().collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(infer_category("printer jam", &cfg), "zeta");
    }

    #[test]
    fn load_categories_missing_file_is_an_error() {
        let err = load_categories("/nonexistent/categories.json").unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
