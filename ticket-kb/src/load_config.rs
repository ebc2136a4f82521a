/// `load_config` module: loads a static YAML pipeline config into the typed
/// settings of `ticket-kb-core`.
///
/// This is the only place where user-supplied YAML is parsed.
///
/// # Responsibilities
/// - Parse the YAML file into [`CliConfig`], filling section defaults
/// - Surface read and parse failures with the file path for the CLI
/// - Build the core [`PipelineConfig`] from the loaded sections
///
/// # Schema
/// ```yaml
/// extract:
///   path: exports/tickets.json
///   fields: { ticket_id: id, title: subject }   # optional
///   resolved_status_values: [Resolved, Closed]   # optional
///   min_resolution_length: 40                    # optional
/// process:
///   categories_path: config/categories.json
///   min_resolution_length: 40                    # optional
///   max_title_length: 140                        # optional
///   similarity_threshold: 0.75                   # optional
/// generate:                                      # optional
///   similarity_threshold: 0.75
///   keyword_count: 5
/// output_dir: knowledge_base                     # optional
/// ```
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use ticket_kb_core::extract::ExtractConfig;
use ticket_kb_core::pipeline::PipelineConfig;
use ticket_kb_core::process::ProcessConfig;
use ticket_kb_core::synthesize::SynthesisConfig;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct CliConfig {
    pub extract: Option<ExtractConfig>,
    pub process: ProcessSection,
    #[serde(default)]
    pub generate: SynthesisConfig,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct ProcessSection {
    pub categories_path: PathBuf,
    #[serde(flatten)]
    pub settings: ProcessConfig,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("knowledge_base")
}

impl CliConfig {
    /// The full pipeline settings. Requires an `extract` section.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let extract = self
            .extract
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Config has no extract section"))?;
        Ok(PipelineConfig {
            extract,
            process: self.process.settings.clone(),
            synthesis: self.generate.clone(),
        })
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let config: CliConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => conf,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    info!(
        config_path = ?path_ref,
        has_extract = config.extract.is_some(),
        output_dir = %config.output_dir.display(),
        "Parsed config YAML successfully"
    );
    Ok(config)
}
