//! OpenAI-compatible chat-completions provider over `reqwest`

use super::error::HttpError;
use super::{CompletionParams, CompletionProvider, CompletionResponse};
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const PROVIDER_NAME: &str = "openai";

/// Connection settings for [`OpenAiProvider`]
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API root, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub api_key: String,
    /// Request timeout in seconds; `None` waits indefinitely
    pub timeout_secs: Option<u64>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            timeout_secs: Some(120),
        }
    }
}

/// Chat-completions client for OpenAI and compatible gateways
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: ReqwestClient,
    endpoint: Url,
    api_key: String,
}

impl OpenAiProvider {
    /// Create a provider from its configuration
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::configuration("OpenAI API key is not set"));
        }

        let mut builder = ReqwestClient::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| Error::Configuration {
            message: format!("Failed to create HTTP client: {}", e),
            source: Some(e.into()),
        })?;

        let endpoint = chat_endpoint(&config.base_url)?;

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key,
        })
    }

    /// The resolved chat-completions URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn chat_endpoint(base_url: &str) -> Result<Url> {
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    };
    Url::parse(&base)
        .and_then(|url| url.join("chat/completions"))
        .map_err(|e| Error::Configuration {
            message: format!("Invalid provider base URL '{}': {}", base_url, e),
            source: Some(e.into()),
        })
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn create_completion(&self, params: &CompletionParams) -> Result<CompletionResponse> {
        debug!(endpoint = %self.endpoint, model = %params.model, "POST chat completion");

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(params)
            .send()
            .await
            .map_err(|e| HttpError::from_request_error(e).into_provider_error(PROVIDER_NAME))?;

        if !response.status().is_success() {
            let error = HttpError::from_response(response).await;
            warn!(
                status = ?error.status_code,
                classification = ?error.classification,
                code = ?error.provider_code,
                "Provider rejected completion request"
            );
            return Err(error.into_provider_error(PROVIDER_NAME));
        }

        response.json::<CompletionResponse>().await.map_err(|e| Error::Provider {
            provider: PROVIDER_NAME.to_string(),
            message: format!("Failed to decode provider response: {}", e),
            status_code: None,
            source: Some(e.into()),
        })
    }
}
