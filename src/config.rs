use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::util::is_local_endpoint_url;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub request_timeout: Option<Duration>,
    pub reveal_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: None,
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let api_key = env_value("CODELENS_API_KEY").or_else(|| env_value("CHAT_GPT_TOKEN"));
        let api_url = env_value("CODELENS_API_URL")
            .or_else(|| env_value("CHAT_GPT_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let model = env_value("CODELENS_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let request_timeout = env_value("CODELENS_REQUEST_TIMEOUT_SECS")
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("Invalid CODELENS_REQUEST_TIMEOUT_SECS '{raw}'"))
            })
            .transpose()?
            .map(Duration::from_secs);

        let reveal_interval = env_value("CODELENS_REVEAL_INTERVAL_MS")
            .map(|raw| {
                raw.parse::<u64>()
                    .with_context(|| format!("Invalid CODELENS_REVEAL_INTERVAL_MS '{raw}'"))
            })
            .transpose()?
            .map(|ms| Duration::from_millis(ms.max(1)))
            .unwrap_or(DEFAULT_REVEAL_INTERVAL);

        Ok(Self {
            api_key,
            api_url,
            model,
            request_timeout,
            reveal_interval,
        })
    }

    /// Problems worth reporting at startup. None of them stop the app: a bad
    /// endpoint or a missing key shows up as a failed analysis instead.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            warnings.push(format!(
                "CODELENS_API_URL '{}' is not an http:// or https:// URL",
                self.api_url
            ));
        }

        if self.api_key.is_none() && !self.is_local_endpoint() {
            warnings.push(format!(
                "CODELENS_API_KEY is not set for non-local endpoint '{}'",
                self.api_url
            ));
        }

        warnings
    }

    fn is_local_endpoint(&self) -> bool {
        is_local_endpoint_url(&self.api_url)
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
