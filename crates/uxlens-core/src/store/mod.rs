//! Configuration store
//!
//! The orchestrator reads two rows per request: the AI configuration
//! (prompts and model parameters) and the brand manual. Stores return
//! `Ok(None)` when a row is absent; only I/O or decoding problems are errors.

pub mod rest;

pub use rest::{RestConfigStore, RestStoreConfig};

use crate::error::{Error, Result};
use crate::types::{AiConfig, BrandManual};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Source of per-request configuration rows
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch the AI configuration row
    async fn get_ai_config(&self) -> Result<Option<AiConfig>>;

    /// Fetch the brand manual row
    async fn get_brand_manual(&self) -> Result<Option<BrandManual>>;
}

/// On-disk layout read by [`StaticConfigStore::from_file`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default, alias = "aiConfig")]
    pub ai_config: Option<AiConfig>,
    #[serde(default, alias = "brandManual")]
    pub brand_manual: Option<BrandManual>,
}

/// In-memory store, optionally loaded from a YAML or JSON file
#[derive(Debug, Clone, Default)]
pub struct StaticConfigStore {
    ai_config: Option<AiConfig>,
    brand_manual: Option<BrandManual>,
}

impl StaticConfigStore {
    /// Create a store holding the given rows
    pub fn new(ai_config: Option<AiConfig>, brand_manual: Option<BrandManual>) -> Self {
        Self {
            ai_config,
            brand_manual,
        }
    }

    /// Load rows from a file; `.json` is read as JSON, anything else as YAML
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Configuration {
            message: format!("Failed to read config store file {}: {}", path.display(), e),
            source: Some(e.into()),
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let document: StoreDocument = if is_json {
            serde_json::from_str(&content).map_err(|e| Error::Configuration {
                message: format!("Invalid JSON in {}: {}", path.display(), e),
                source: Some(e.into()),
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| Error::Configuration {
                message: format!("Invalid YAML in {}: {}", path.display(), e),
                source: Some(e.into()),
            })?
        };

        debug!(
            path = %path.display(),
            has_ai_config = document.ai_config.is_some(),
            has_brand_manual = document.brand_manual.is_some(),
            "Loaded static config store"
        );

        Ok(Self::from(document))
    }
}

impl From<StoreDocument> for StaticConfigStore {
    fn from(document: StoreDocument) -> Self {
        Self::new(document.ai_config, document.brand_manual)
    }
}

#[async_trait]
impl ConfigStore for StaticConfigStore {
    async fn get_ai_config(&self) -> Result<Option<AiConfig>> {
        Ok(self.ai_config.clone())
    }

    async fn get_brand_manual(&self) -> Result<Option<BrandManual>> {
        Ok(self.brand_manual.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::Builder;

    #[tokio::test]
    async fn test_from_yaml_file() {
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            r#"
ai_config:
  system_prompt: "Voce e um especialista em UX"
  prompt_template: "Contexto: {{{{CONTEXT}}}}"
  api_parameters:
    model: gpt-5-mini
brand_manual:
  voice_principles:
    - Clareza
    - Empatia
  rules: "Sem jargao"
"#
        )
        .unwrap();

        let store = StaticConfigStore::from_file(file.path()).unwrap();
        let config = store.get_ai_config().await.unwrap().unwrap();
        assert_eq!(config.prompt_template, "Contexto: {{CONTEXT}}");
        assert_eq!(config.api_parameters.model, "gpt-5-mini");

        let brand = store.get_brand_manual().await.unwrap().unwrap();
        assert_eq!(brand.voice_principles, json!(["Clareza", "Empatia"]));
    }

    #[tokio::test]
    async fn test_from_json_file_with_missing_brand() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"aiConfig": {{"systemPrompt": "s", "promptTemplate": "t"}}}}"#
        )
        .unwrap();

        let store = StaticConfigStore::from_file(file.path()).unwrap();
        assert!(store.get_ai_config().await.unwrap().is_some());
        assert!(store.get_brand_manual().await.unwrap().is_none());
    }

    #[test]
    fn test_invalid_file_is_configuration_error() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{not json").unwrap();
        let err = StaticConfigStore::from_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = StaticConfigStore::from_file(Path::new("/nonexistent/uxlens-store.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config store file"));
    }
}
