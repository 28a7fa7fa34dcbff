//! Analysis orchestration
//!
//! One request runs as one sequential async flow:
//! config, brand manual, prompt, image, model call, parse, normalize,
//! validate. Every step reports progress before it starts; the first failure
//! ends the flow. [`AnalysisOrchestrator::stream`] runs the flow on its own
//! task and turns the outcome into exactly one terminal event.

use crate::completion::{CompletionClient, CompletionProvider, ImageRef};
use crate::error::{Error, Result};
use crate::normalizer::Normalizer;
use crate::prompt::PromptBuilder;
use crate::store::ConfigStore;
use crate::stream::{EventStream, ProgressReporter, ProgressStream};
use crate::types::{AnalysisRequest, Step};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument};
use uuid::Uuid;
use uxlens_schemas::analysis::SCHEMA_NAME;
use uxlens_schemas::{analysis_schema, analysis_schema_json, unknown_root_properties, validate, SchemaNode};

/// Runs analysis requests against injected collaborators
pub struct AnalysisOrchestrator {
    config_store: Arc<dyn ConfigStore>,
    client: CompletionClient,
    schema: &'static SchemaNode,
    schema_json: &'static Value,
    normalizer: Normalizer<'static>,
}

impl AnalysisOrchestrator {
    /// Create an orchestrator for the built-in analysis schema
    pub fn new(config_store: Arc<dyn ConfigStore>, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            config_store,
            client: CompletionClient::new(provider),
            schema: analysis_schema(),
            schema_json: analysis_schema_json(),
            normalizer: Normalizer::ux_analysis(),
        }
    }

    /// Run every step and return the conformant document
    #[instrument(
        skip_all,
        fields(request_id = %Uuid::new_v4(), provider = %self.client.provider_name())
    )]
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
        reporter: &mut dyn ProgressReporter,
    ) -> Result<Value> {
        reporter.progress(Step::ConfigLoading, "Loading AI configuration");
        let config = self
            .config_store
            .get_ai_config()
            .await?
            .ok_or_else(|| Error::ConfigNotFound {
                what: "AI configuration".to_string(),
            })?;

        reporter.progress(Step::BrandLoading, "Loading brand manual");
        let brand = self
            .config_store
            .get_brand_manual()
            .await?
            .ok_or_else(|| Error::ConfigNotFound {
                what: "brand manual".to_string(),
            })?;

        reporter.progress(Step::PromptReady, "Building prompt");
        let prompt = PromptBuilder::for_analysis(request, &brand).render(&config.prompt_template);

        reporter.progress(Step::ImagePrepared, "Preparing image");
        let image = ImageRef::from_request(request);

        reporter.progress(Step::ModelCalling, "Analyzing screenshot");
        let output = self
            .client
            .request_completion(
                &config.system_prompt,
                &prompt,
                &image,
                SCHEMA_NAME,
                self.schema_json,
                &config.api_parameters,
            )
            .await?;

        reporter.progress(Step::ParsingResult, "Parsing model output");
        let raw = parse_model_output(&output.text)?;

        reporter.progress(Step::Normalizing, "Normalizing analysis");
        let document = self.normalizer.normalize(raw);

        reporter.progress(Step::Validating, "Validating analysis");
        let mut violations = validate(&document, self.schema);
        violations.extend(unknown_root_properties(&document, self.schema));
        if !violations.is_empty() {
            return Err(Error::SchemaViolation { errors: violations });
        }

        info!(
            total_tokens = output.usage.map(|u| u.total_tokens),
            "Analysis complete"
        );
        Ok(document)
    }

    /// Run the flow and deliver its outcome as the terminal event
    pub async fn run(&self, request: &AnalysisRequest, mut stream: ProgressStream) {
        match self.analyze(request, &mut stream).await {
            Ok(document) => stream.result(document),
            Err(err) => {
                error!(code = %err.code(), error = %err, "Analysis failed");
                stream.error(&err);
            }
        }
    }

    /// Start the flow on a new task and return its event stream
    pub fn stream(self: Arc<Self>, request: AnalysisRequest) -> EventStream {
        let (stream, events) = ProgressStream::channel();
        tokio::spawn(async move {
            self.run(&request, stream).await;
        });
        events
    }
}

impl std::fmt::Debug for AnalysisOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisOrchestrator")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

/// Parse the model's text, unwrapping a fenced code block first
pub fn parse_model_output(text: &str) -> Result<Value> {
    serde_json::from_str(strip_code_fence(text)).map_err(|e| Error::InvalidModelOutput {
        message: e.to_string(),
        source: Some(e),
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_end();
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // Drop the info string (e.g. `json`); on a one-line fence it runs up to the payload
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest.find(['{', '[']).map_or("", |start| &rest[start..]),
    };
    body.trim()
}
