//! Multimodal structured-output completion
//!
//! The [`CompletionClient`] assembles one chat request (system instructions,
//! user text and an image part) with a strict JSON-schema response format,
//! hands it to an injected [`CompletionProvider`] and extracts the text of
//! the first choice. Nothing here retries.

pub mod error;
pub mod image;
pub mod openai;

pub use error::{ErrorClassification, HttpError};
pub use image::{ImageRef, DEFAULT_IMAGE_FORMAT};
pub use openai::{OpenAiConfig, OpenAiProvider};

use crate::error::{Error, Result};
use crate::types::ApiParameters;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Image URL with optional detail level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// One part of a multimodal message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Message content: plain text or a list of parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

/// Parameters for one completion call, shaped like the chat-completions body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionParams {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_effort: Option<String>,
}

/// Message returned inside a choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<String>,
}

/// One returned choice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ResponseMessage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token usage reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Provider response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// External multimodal completion provider
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name used in errors and logs
    fn name(&self) -> &str;

    /// Execute one completion call
    async fn create_completion(&self, params: &CompletionParams) -> Result<CompletionResponse>;
}

/// Text of the first choice plus usage
#[derive(Debug, Clone, PartialEq)]
pub struct RawModelOutput {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// Builds structured-output requests and extracts the model's text
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn CompletionProvider>,
}

impl CompletionClient {
    /// Create a client over a provider
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Build the request body without sending it
    pub fn build_params(
        system_prompt: &str,
        prompt: &str,
        image: &ImageRef,
        schema_name: &str,
        schema: &Value,
        params: &ApiParameters,
    ) -> CompletionParams {
        let user_parts = vec![
            ContentPart::Text {
                text: prompt.to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image.as_url().to_string(),
                    detail: params.image_detail.clone(),
                },
            },
        ];

        CompletionParams {
            model: params.model.clone(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: MessageContent::Text(system_prompt.to_string()),
                },
                ChatMessage {
                    role: Role::User,
                    content: MessageContent::Parts(user_parts),
                },
            ],
            response_format: json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema_name,
                    "strict": true,
                    "schema": schema,
                }
            }),
            max_completion_tokens: params.max_completion_tokens,
            verbosity: params.verbosity.clone(),
            reasoning_effort: params.reasoning_effort.clone(),
        }
    }

    /// Send one structured-output request and return the first choice's text
    #[instrument(skip_all, fields(provider = %self.provider.name(), model = %params.model, image = %image.describe()))]
    pub async fn request_completion(
        &self,
        system_prompt: &str,
        prompt: &str,
        image: &ImageRef,
        schema_name: &str,
        schema: &Value,
        params: &ApiParameters,
    ) -> Result<RawModelOutput> {
        let request = Self::build_params(system_prompt, prompt, image, schema_name, schema, params);
        debug!(prompt_chars = prompt.len(), "Sending completion request");

        let response = self.provider.create_completion(&request).await?;

        if let Some(usage) = response.usage {
            info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Completion finished"
            );
        }

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::EmptyResponse {
                provider: self.provider.name().to_string(),
            })?;

        Ok(RawModelOutput {
            text,
            usage: response.usage,
        })
    }
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient")
            .field("provider", &self.provider.name())
            .finish()
    }
}
