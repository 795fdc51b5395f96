use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::criteria::MissingCriterionPolicy;

const ENV_CONFIG_PATH: &str = "TRIAGE_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const DEFAULT_PRIMARY_MODEL: &str = "gpt-4o-mini";
const DEFAULT_CONCURRENCY: usize = 4;

/// Screening pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScreeningConfig {
    /// Model used by the primary extraction engine
    #[serde(default = "default_primary_model")]
    pub primary_model: String,
    /// Optional second engine for dual-run agreement checks
    #[serde(default)]
    pub secondary_model: Option<String>,
    /// Bound on concurrent extractions within a batch
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// How the reducer boundary treats a criterion absent from the
    /// extractor output: strict (reject) or unclear (default the gap)
    #[serde(default)]
    pub missing_criterion: MissingCriterionPolicy,
}

fn default_primary_model() -> String {
    DEFAULT_PRIMARY_MODEL.to_string()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            primary_model: default_primary_model(),
            secondary_model: None,
            concurrency: DEFAULT_CONCURRENCY,
            missing_criterion: MissingCriterionPolicy::default(),
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub screening: ScreeningConfig,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub screening: ScreeningConfig,
    pub port: u16,
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screening: ScreeningConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let screening = Self::load_config_file(&config_path)
            .map(|cf| cf.screening)
            .unwrap_or_default();

        Self {
            screening,
            port,
            host,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_screening_section() {
        let yaml = r#"
screening:
  primary_model: gpt-4o
  secondary_model: claude-3-haiku
  concurrency: 8
  missing_criterion: unclear
"#;
        let cf: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cf.screening.primary_model, "gpt-4o");
        assert_eq!(
            cf.screening.secondary_model.as_deref(),
            Some("claude-3-haiku")
        );
        assert_eq!(cf.screening.concurrency, 8);
        assert_eq!(
            cf.screening.missing_criterion,
            MissingCriterionPolicy::Unclear
        );
    }

    #[test]
    fn defaults_apply_for_empty_section() {
        let cf: ConfigFile = serde_yaml::from_str("screening: {}").unwrap();
        assert_eq!(cf.screening.primary_model, DEFAULT_PRIMARY_MODEL);
        assert_eq!(
            cf.screening.missing_criterion,
            MissingCriterionPolicy::Strict
        );
    }
}
