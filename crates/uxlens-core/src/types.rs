//! Core types and data structures for the analysis pipeline
//!
//! This module defines the inbound request, the configuration rows read from
//! the store, and the events emitted on a request's progress stream.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// How the `image` field of a request is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Raw base64 payload or a `data:` URI
    Base64,
    /// HTTP(S) URL fetched by the provider
    Url,
}

/// Inbound analysis request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Free-text description of the screen and product
    #[serde(default)]
    pub context: String,

    /// The user goal the screen is meant to serve
    #[serde(default)]
    pub job_to_be_done: String,

    /// Screenshot as URL, base64 payload or data URI
    #[serde(default)]
    pub image: String,

    /// Explicit encoding of `image`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_type: Option<ImageType>,

    /// Image format used when wrapping a bare base64 payload (default `jpeg`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_format: Option<String>,
}

impl AnalysisRequest {
    /// Create a request with the three text fields set
    pub fn new(
        context: impl Into<String>,
        job_to_be_done: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            context: context.into(),
            job_to_be_done: job_to_be_done.into(),
            image: image.into(),
            image_type: None,
            image_format: None,
        }
    }

    /// Check required fields; `require_job` is set for the streaming endpoint
    pub fn validate(&self, require_job: bool) -> Result<()> {
        if self.context.trim().is_empty() {
            return Err(Error::invalid_request("context", "context is required"));
        }
        if require_job && self.job_to_be_done.trim().is_empty() {
            return Err(Error::invalid_request("jobToBeDone", "jobToBeDone is required"));
        }
        if self.image.trim().is_empty() {
            return Err(Error::invalid_request("image", "image is required"));
        }
        Ok(())
    }
}

/// Model call parameters stored alongside the prompts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiParameters {
    /// Model identifier
    pub model: String,
    /// Upper bound on generated tokens
    pub max_completion_tokens: Option<u32>,
    /// Output verbosity hint (`low`, `medium`, `high`)
    pub verbosity: Option<String>,
    /// Reasoning effort hint (`minimal`, `low`, `medium`, `high`)
    pub reasoning_effort: Option<String>,
    /// Image detail level passed with the image part
    pub image_detail: Option<String>,
}

impl Default for ApiParameters {
    fn default() -> Self {
        Self {
            model: "gpt-5".to_string(),
            max_completion_tokens: Some(8000),
            verbosity: Some("medium".to_string()),
            reasoning_effort: Some("low".to_string()),
            image_detail: Some("high".to_string()),
        }
    }
}

/// The AI configuration row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// System instructions sent with every request
    #[serde(alias = "systemPrompt")]
    pub system_prompt: String,
    /// User prompt template with `{{NAME}}` placeholders
    #[serde(alias = "promptTemplate")]
    pub prompt_template: String,
    /// Model call parameters
    #[serde(default, alias = "apiParameters")]
    pub api_parameters: ApiParameters,
}

/// The brand manual row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandManual {
    /// Voice and tone principles (free text or structured)
    #[serde(alias = "voicePrinciples")]
    pub voice_principles: Value,
    /// Brand rules (free text or structured)
    #[serde(default)]
    pub rules: Value,
}

/// Identifier of an orchestration step, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    ConfigLoading,
    BrandLoading,
    PromptReady,
    ImagePrepared,
    ModelCalling,
    ParsingResult,
    Normalizing,
    Validating,
}

impl Step {
    /// Wire name of the step
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::ConfigLoading => "config_loading",
            Step::BrandLoading => "brand_loading",
            Step::PromptReady => "prompt_ready",
            Step::ImagePrepared => "image_prepared",
            Step::ModelCalling => "model_calling",
            Step::ParsingResult => "parsing_result",
            Step::Normalizing => "normalizing",
            Step::Validating => "validating",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Informative, non-terminal progress notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub step: Step,
    pub message: String,
}

/// An event on a request's progress stream
///
/// Serialized as `{"type": "progress" | "result" | "error", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum StreamEvent {
    Progress(Progress),
    Result(Value),
    Error(Value),
}

impl StreamEvent {
    /// Create a progress event
    pub fn progress(step: Step, message: impl Into<String>) -> Self {
        StreamEvent::Progress(Progress {
            step,
            message: message.into(),
        })
    }

    /// Create an error event from a pipeline error
    pub fn error(error: &Error) -> Self {
        StreamEvent::Error(error.to_payload())
    }

    /// Whether this event ends the stream
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Progress(_))
    }
}
