use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_API_URL: &str = "https://services.runescape.com/m=itemdb_rs";
pub const DEFAULT_CATALOGUE_URL: &str = "https://secure.runescape.com/m=itemdb_rs";
pub const DEFAULT_USER_AGENT: &str = "grand-exchanger/0.1";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GrandExchangeConfig {
    /// Base URL of the JSON catalogue and graph endpoints
    pub api_url: String,
    /// Base URL of the HTML catalogue pages
    pub catalogue_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for GrandExchangeConfig {
    fn default() -> Self {
        GrandExchangeConfig {
            api_url: DEFAULT_API_URL.to_string(),
            catalogue_url: DEFAULT_CATALOGUE_URL.to_string(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub grand_exchange: GrandExchangeConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    pub min_wait_ms: u64,
    pub max_wait_ms: u64,
    /// Unbounded when absent
    pub max_attempts: Option<u32>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            min_wait_ms: 1000,
            max_wait_ms: 3000,
            max_attempts: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

impl AppConfig {
    /// Loads the default config file, or built-in defaults if there is none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "grand-exchanger", "grand-exchanger")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  grand_exchange:
    api_url: "http://example.com/api"
    catalogue_url: "http://example.com/catalogue"
retry:
  min_wait_ms: 10
  max_wait_ms: 20
  max_attempts: 5
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        let ge = &config.providers.grand_exchange;
        assert_eq!(ge.api_url, "http://example.com/api");
        assert_eq!(ge.catalogue_url, "http://example.com/catalogue");
        assert_eq!(ge.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.retry.min_wait_ms, 10);
        assert_eq!(config.retry.max_wait_ms, 20);
        assert_eq!(config.retry.max_attempts, Some(5));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AppConfig = serde_yaml::from_str("retry:\n  max_attempts: 3\n").unwrap();
        assert_eq!(config.providers.grand_exchange.api_url, DEFAULT_API_URL);
        assert_eq!(config.retry.min_wait_ms, 1000);
        assert_eq!(config.retry.max_wait_ms, 3000);
        assert_eq!(config.retry.max_attempts, Some(3));

        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.retry.max_attempts.is_none());
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = AppConfig::load_from_path(dir.path().join("absent.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
