use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::extraction::HtmlHeuristics;

/// Configuration for the Stage Identity engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page fetch settings
    pub fetch: FetchConfig,

    /// Extraction pipeline settings
    pub extraction: ExtractionConfig,

    /// Output and logging settings
    pub output: OutputConfig,

    /// Performance and resource settings
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Browser-like User-Agent sent with every page request
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Domain that content URLs must belong to
    pub site_domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Bare site name, never accepted as a content title
    pub site_name: String,

    /// Minimum description length (characters) for markup-derived descriptions
    pub min_description_chars: usize,

    /// Run the raw-markup heuristics
    pub enable_html_heuristics: bool,

    /// Consult the known-titles exception list
    pub apply_manual_overrides: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Log level
    pub log_level: String,

    /// Pretty-print JSON output
    pub pretty_json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Maximum number of pages fetched concurrently
    pub max_concurrent_requests: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            timeout_seconds: 30,
            site_domain: "stage.in".to_string(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            site_name: "STAGE".to_string(),
            min_description_chars: 50,
            enable_html_heuristics: true,
            apply_manual_overrides: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pretty_json: true,
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: num_cpus::get().min(8), // Use available cores, max 8
        }
    }
}

impl From<&ExtractionConfig> for HtmlHeuristics {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            enabled: config.enable_html_heuristics,
            site_name: config.site_name.clone(),
            min_description_chars: config.min_description_chars,
            apply_manual_overrides: config.apply_manual_overrides,
        }
    }
}

impl Config {
    /// Load configuration from the first readable config file, else from the environment
    pub fn load() -> Result<Self> {
        let mut config_paths = vec![
            PathBuf::from("stage-identity.toml"),
            PathBuf::from("config/stage-identity.toml"),
        ];
        if let Ok(home) = std::env::var("HOME") {
            config_paths.push(PathBuf::from(home).join(".config/stage-identity/config.toml"));
        }
        config_paths.push(PathBuf::from("/etc/stage-identity/config.toml"));

        for path in &config_paths {
            if !path.exists() {
                continue;
            }
            match Self::load_from(path) {
                Ok(config) => {
                    tracing::info!("📄 Loaded configuration from: {}", path.display());
                    return Ok(config);
                }
                Err(e) => {
                    tracing::warn!("Failed to load config file {}: {}", path.display(), e);
                }
            }
        }

        Self::from_env()
    }

    /// Load configuration from a specific TOML file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Cannot read {}: {}", path.display(), e))?;
        let config = toml::from_str(&config_str)?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        // Override with environment variables
        if let Ok(timeout) = std::env::var("STAGE_IDENTITY_TIMEOUT") {
            config.fetch.timeout_seconds = timeout.parse().unwrap_or(30);
        }

        if let Ok(user_agent) = std::env::var("STAGE_IDENTITY_USER_AGENT") {
            config.fetch.user_agent = user_agent;
        }

        if let Ok(log_level) = std::env::var("STAGE_IDENTITY_LOG_LEVEL") {
            config.output.log_level = log_level;
        }

        if let Ok(workers) = std::env::var("STAGE_IDENTITY_WORKERS") {
            config.performance.max_concurrent_requests = workers.parse().unwrap_or(4);
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.performance.max_concurrent_requests == 0 {
            return Err(anyhow!("max_concurrent_requests must be greater than 0"));
        }

        if self.fetch.timeout_seconds == 0 {
            return Err(anyhow!("timeout_seconds must be greater than 0"));
        }

        if self.fetch.user_agent.trim().is_empty() {
            return Err(anyhow!("user_agent must not be empty"));
        }

        if self.fetch.site_domain.trim().is_empty() {
            return Err(anyhow!("site_domain must not be empty"));
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Settings handed to the markup heuristics
    pub fn heuristics(&self) -> HtmlHeuristics {
        HtmlHeuristics::from(&self.extraction)
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Stage Identity Configuration:\n\
            - Site Domain: {}\n\
            - Request Timeout: {}s\n\
            - Concurrent Requests: {}\n\
            - HTML Heuristics: {}\n\
            - Manual Overrides: {}\n\
            - Log Level: {}",
            self.fetch.site_domain,
            self.fetch.timeout_seconds,
            self.performance.max_concurrent_requests,
            self.extraction.enable_html_heuristics,
            self.extraction.apply_manual_overrides,
            self.output.log_level
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.fetch.timeout_seconds = seconds;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.fetch.user_agent = user_agent.into();
        self
    }

    pub fn with_concurrency(mut self, requests: usize) -> Self {
        self.config.performance.max_concurrent_requests = requests;
        self
    }

    pub fn enable_html_heuristics(mut self, enable: bool) -> Self {
        self.config.extraction.enable_html_heuristics = enable;
        self
    }

    pub fn apply_manual_overrides(mut self, enable: bool) -> Self {
        self.config.extraction.apply_manual_overrides = enable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fetch.timeout_seconds, 30);
        assert_eq!(config.fetch.site_domain, "stage.in");
        assert_eq!(config.extraction.min_description_chars, 50);
        assert!(config.extraction.enable_html_heuristics);
        assert!(config.performance.max_concurrent_requests <= 8);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .with_timeout(5)
            .with_concurrency(2)
            .apply_manual_overrides(false)
            .build();

        assert_eq!(config.fetch.timeout_seconds, 5);
        assert_eq!(config.performance.max_concurrent_requests, 2);
        assert!(!config.heuristics().apply_manual_overrides);
    }

    #[test]
    fn test_config_validation() {
        assert!(Config::default().validate().is_ok());
        assert!(ConfigBuilder::new().with_concurrency(0).build().validate().is_err());
        assert!(ConfigBuilder::new().with_timeout(0).build().validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stage-identity.toml");

        let config = ConfigBuilder::new().with_timeout(12).build();
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.fetch.timeout_seconds, 12);
        assert_eq!(loaded.extraction.site_name, "STAGE");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[fetch]\ntimeout_seconds = 7\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.fetch.timeout_seconds, 7);
        assert_eq!(loaded.fetch.site_domain, "stage.in");
        assert!(loaded.output.pretty_json);
    }
}
