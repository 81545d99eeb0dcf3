//! CLI configuration
//!
//! Layered with the `config` crate: built-in defaults, then the TOML file,
//! then `JOBLLAMA_*` environment variables (`JOBLLAMA_API_URL`,
//! `JOBLLAMA_TIMEOUT_SECS`, ...).

use anyhow::{Context, Result};
use jobllama_http::ClientConfig;
use jobllama_http::client::DEFAULT_API_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Base URL of the API
    pub api_url: String,
    /// Per-request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Where the session cookies are kept; defaults to the state directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie_file: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: Some(30),
            user_agent: None,
            cookie_file: None,
        }
    }
}

impl CliConfig {
    /// Load configuration from `path`, falling back to defaults
    ///
    /// A missing file is fine unless `required` is set.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("api_url", defaults.api_url)?
            .add_source(config::File::from(path).required(required))
            .add_source(config::Environment::with_prefix("JOBLLAMA").try_parsing(true));
        if let Some(timeout_secs) = defaults.timeout_secs {
            builder = builder.set_default("timeout_secs", timeout_secs)?;
        }

        let settings = builder
            .build()
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        Ok(settings.try_deserialize()?)
    }

    /// Settings handed to the HTTP client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_url: self.api_url.clone(),
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
        }
    }

    /// Cookie file to use, given the default from the state directory
    pub fn cookie_path(&self, default: PathBuf) -> PathBuf {
        self.cookie_file.clone().unwrap_or(default)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Save configuration to a TOML file
pub fn save_config<P: AsRef<Path>>(config: &CliConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, config.to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Generate a default configuration file
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    save_config(&CliConfig::default(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_optional_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = CliConfig::load(&temp_dir.path().join("jobllama.toml"), false).unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout_secs, Some(30));
        assert_eq!(config.cookie_file, None);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = CliConfig::load(&temp_dir.path().join("nope.toml"), true);
        assert!(result.is_err());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("jobllama.toml");
        std::fs::write(
            &path,
            "api_url = \"https://jobs.example.com/api\"\ntimeout_secs = 5\ncookie_file = \"/tmp/cookies.json\"\n",
        )
        .unwrap();

        let config = CliConfig::load(&path, true).unwrap();
        assert_eq!(config.api_url, "https://jobs.example.com/api");
        assert_eq!(config.timeout_secs, Some(5));
        assert_eq!(
            config.cookie_path(PathBuf::from("unused")),
            PathBuf::from("/tmp/cookies.json")
        );

        let client = config.client_config();
        assert_eq!(client.api_url, "https://jobs.example.com/api");
        assert_eq!(client.timeout_secs, Some(5));
    }

    #[test]
    fn test_generated_config_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config").join("jobllama.toml");

        generate_default_config(&path).unwrap();
        let config = CliConfig::load(&path, true).unwrap();

        assert_eq!(config, CliConfig::default());
    }
}
