//! Uxlens Core - screenshot UX analysis pipeline
//!
//! This crate turns a UI screenshot plus a short description into a
//! schema-conformant UX analysis produced by a multimodal language model.
//!
//! # Main Components
//!
//! - **Error Handling**: pipeline error taxonomy with stable wire codes
//! - **Prompt Builder**: `{{NAME}}` template rendering from stored configuration
//! - **Completion Client**: structured-output requests through an injected provider
//! - **Config Store**: AI configuration and brand manual lookup
//! - **Normalizer**: best-effort repair of near-conformant model output
//! - **Progress Stream**: per-request `progress* -> result | error` channel
//! - **Orchestrator**: sequences the steps and emits the terminal event
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use uxlens_core::{AnalysisOrchestrator, AnalysisRequest, NoopReporter, OpenAiConfig, OpenAiProvider, StaticConfigStore};
//!
//! async fn example() -> uxlens_core::Result<()> {
//!     let store = StaticConfigStore::from_file(std::path::Path::new("store.yaml"))?;
//!     let provider = OpenAiProvider::new(OpenAiConfig {
//!         api_key: std::env::var("OPENAI_API_KEY").unwrap_or_default(),
//!         ..OpenAiConfig::default()
//!     })?;
//!     let orchestrator = AnalysisOrchestrator::new(Arc::new(store), Arc::new(provider));
//!
//!     let request = AnalysisRequest::new("Checkout page", "Pay in under a minute", "https://example.com/shot.png");
//!     let document = orchestrator.analyze(&request, &mut NoopReporter).await?;
//!     println!("{}", document["pontuacaoGeral"]);
//!     Ok(())
//! }
//! ```

pub mod completion;
pub mod error;
pub mod normalizer;
pub mod orchestrator;
pub mod prompt;
pub mod store;
pub mod stream;
pub mod types;

// Re-export main types for convenience
pub use completion::{
    CompletionClient, CompletionParams, CompletionProvider, CompletionResponse, ImageRef,
    OpenAiConfig, OpenAiProvider, RawModelOutput, TokenUsage,
};
pub use error::{Error, ErrorCode, Result};
pub use normalizer::Normalizer;
pub use orchestrator::{parse_model_output, AnalysisOrchestrator};
pub use prompt::PromptBuilder;
pub use store::{ConfigStore, RestConfigStore, RestStoreConfig, StaticConfigStore, StoreDocument};
pub use stream::{EventStream, NoopReporter, ProgressReporter, ProgressStream, StreamState};
pub use types::{AiConfig, AnalysisRequest, ApiParameters, BrandManual, ImageType, Step, StreamEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
