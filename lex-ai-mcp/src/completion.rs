//! Chat-completion client for answer synthesis.
//!
//! Thin REST glue around an Azure-OpenAI-style chat-completion deployment.
//! The retrieval core contributes only the context passages; everything
//! about the wire protocol lives here, behind [`CompletionClient::complete`].

use anyhow::{Context, Result, anyhow};
use serde_json::json;
use tracing::debug;

/// Environment variable names for the completion service.
const ENV_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
const ENV_API_KEY: &str = "AZURE_OPENAI_API_KEY";
const ENV_DEPLOYMENT: &str = "AZURE_DEPLOYMENT_NAME";
const ENV_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";

/// Connection settings for the chat-completion deployment.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
}

impl CompletionConfig {
    /// Read the configuration from environment variables. Returns `None`
    /// when any of the four variables is missing, in which case the server
    /// runs retrieval-only.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            endpoint: std::env::var(ENV_ENDPOINT).ok()?,
            api_key: std::env::var(ENV_API_KEY).ok()?,
            deployment: std::env::var(ENV_DEPLOYMENT).ok()?,
            api_version: std::env::var(ENV_API_VERSION).ok()?,
        })
    }
}

/// HTTP client for the chat-completion service.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    config: CompletionConfig,
    http: reqwest::Client,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Send a system + user message pair and return the first choice's
    /// content. No retries; transient-failure policy belongs to the caller's
    /// deployment, not to this client.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        );

        let payload = json!({
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user }
            ],
            "temperature": 0.5,
            "max_tokens": 800,
            "top_p": 0.95
        });

        debug!("Requesting completion from deployment {}", self.config.deployment);

        let response = self
            .http
            .post(&url)
            .header("api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await
            .context("completion request failed")?
            .error_for_status()
            .context("completion service returned an error status")?;

        let body: serde_json::Value = response
            .json()
            .await
            .context("completion response was not valid JSON")?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("completion response missing choices[0].message.content"))
    }
}
