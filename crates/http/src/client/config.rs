//! Client configuration

use crate::client::{ClientError, DEFAULT_API_URL, TypedClientBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings needed to reach the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL, e.g. `https://api.example.com/api`
    pub api_url: String,
    /// Per-request timeout in seconds; none when unset or zero
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// A builder preloaded with these settings
    pub fn builder(&self) -> Result<TypedClientBuilder, ClientError> {
        if self.api_url.trim().is_empty() {
            return Err(ClientError::Configuration("api_url is empty".into()));
        }

        let mut builder = TypedClientBuilder::new().base_url(self.api_url.clone());
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        Ok(builder)
    }
}
