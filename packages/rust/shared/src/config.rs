//! Application configuration for LaunchKit.
//!
//! User config lives at `~/.launchkit/launchkit.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LaunchKitError, Result};
use crate::outcome::DEFAULT_REVIEW_THRESHOLD;
use crate::types::Variant;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "launchkit.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".launchkit";

// ---------------------------------------------------------------------------
// Config structs (matching launchkit.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Orchestrator settings.
    #[serde(default)]
    pub pipeline: PipelineSection,

    /// Review gating.
    #[serde(default)]
    pub review: ReviewConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Language code passed to intake.
    #[serde(default = "default_language")]
    pub language: String,

    /// Tone override. Each variant has its own default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,

    /// Content strategy.
    #[serde(default)]
    pub variant: Variant,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            tone: None,
            variant: Variant::default(),
        }
    }
}

fn default_language() -> String {
    "en".into()
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSection {
    /// Worker slots for the research/brand/pricing fan-out.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

fn default_workers() -> usize {
    3
}

/// `[review]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Stages scoring strictly below this are flagged.
    #[serde(default = "default_threshold")]
    pub confidence_threshold: f64,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_threshold(),
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_REVIEW_THRESHOLD
}

// ---------------------------------------------------------------------------
// Runtime config (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime pipeline configuration, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub variant: Variant,
    pub workers: usize,
    pub review_threshold: f64,
    pub tool_version: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            variant: config.defaults.variant,
            workers: config.pipeline.workers,
            review_threshold: config.review.confidence_threshold,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.launchkit/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LaunchKitError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.launchkit/launchkit.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LaunchKitError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        LaunchKitError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LaunchKitError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LaunchKitError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LaunchKitError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject values the pipeline cannot run with.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.pipeline.workers == 0 {
        return Err(LaunchKitError::config("pipeline.workers must be at least 1"));
    }

    let threshold = config.review.confidence_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(LaunchKitError::config(format!(
            "review.confidence_threshold must be within [0, 1], got {threshold}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("variant = \"fusion\""));
        assert!(toml_str.contains("confidence_threshold"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.pipeline.workers, 3);
        assert_eq!(parsed.review.confidence_threshold, 0.6);
        assert_eq!(parsed.defaults.language, "en");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
variant = "required"
tone = "playful"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.variant, Variant::Required);
        assert_eq!(config.defaults.tone.as_deref(), Some("playful"));
        assert_eq!(config.pipeline.workers, 3);
    }

    #[test]
    fn pipeline_config_from_app_config() {
        let mut app = AppConfig::default();
        app.defaults.variant = Variant::Legacy;
        app.pipeline.workers = 5;
        let runtime = PipelineConfig::from(&app);
        assert_eq!(runtime.variant, Variant::Legacy);
        assert_eq!(runtime.workers, 5);
        assert_eq!(runtime.review_threshold, 0.6);
        assert!(!runtime.tool_version.is_empty());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.pipeline.workers = 0;
        assert!(validate_config(&config).unwrap_err().to_string().contains("workers"));

        let mut config = AppConfig::default();
        config.review.confidence_threshold = 1.5;
        assert!(
            validate_config(&config)
                .unwrap_err()
                .to_string()
                .contains("confidence_threshold")
        );
    }

    #[test]
    fn load_config_from_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!(
            "lk-config-test-{}.toml",
            uuid::Uuid::now_v7()
        ));
        std::fs::write(&path, "[pipeline]\nworkers = \"many\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));

        let _ = std::fs::remove_file(&path);
    }
}
