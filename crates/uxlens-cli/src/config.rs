//! Configuration management for the CLI
//!
//! This module handles loading and merging configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Environment variables (a `.env` file is loaded first)
//! - Command-line arguments

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};
use uxlens_core::{
    AiConfig, AnalysisOrchestrator, BrandManual, CompletionProvider, ConfigStore, OpenAiConfig,
    OpenAiProvider, RestConfigStore, RestStoreConfig, StaticConfigStore,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Completion provider settings
    pub provider: ProviderConfig,

    /// Where the AI configuration and brand manual come from
    pub store: StoreConfig,

    /// Logging settings
    pub logging: LoggingSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind: String,

    /// Origins allowed by CORS; empty allows any origin
    pub allowed_origins: Vec<String>,
}

/// Completion provider configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API root of an OpenAI-compatible endpoint
    pub base_url: String,

    /// API key
    pub api_key: Option<String>,

    /// Model forced on every request, replacing the stored model
    pub model: Option<String>,

    /// Timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Config store backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// YAML or JSON file holding both rows
    #[default]
    File,
    /// PostgREST-style tables
    Rest,
}

/// Config store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub kind: StoreKind,

    /// Store file for `kind: file`
    pub path: Option<PathBuf>,

    /// Project URL for `kind: rest`
    pub url: Option<String>,

    /// Service key for `kind: rest`
    pub key: Option<String>,

    pub ai_config_table: String,
    pub brand_manual_table: String,
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<String>,

    /// Log file path
    pub file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let defaults = OpenAiConfig::default();
        Self {
            base_url: defaults.base_url,
            api_key: None,
            model: None,
            timeout_secs: defaults.timeout_secs,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        let defaults = RestStoreConfig::default();
        Self {
            kind: StoreKind::File,
            path: Some(PathBuf::from("store.yaml")),
            url: None,
            key: None,
            ai_config_table: defaults.ai_config_table,
            brand_manual_table: defaults.brand_manual_table,
            timeout_secs: defaults.timeout_secs,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = if is_json(path) {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in &Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        debug!(path = %path.display(), "Loaded configuration file");
                        return Ok(config);
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "Failed to load config file");
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load from a specific file or default locations, then apply the environment
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::load()?,
        };
        config.merge_env();
        Ok(config)
    }

    /// Get default configuration file paths to check
    pub fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".uxlens.yaml"), PathBuf::from("uxlens.yaml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("uxlens").join("config.yaml"));
        }

        paths
    }

    /// Apply environment overrides from the process environment
    pub fn merge_env(&mut self) {
        self.merge_env_from(|name| std::env::var(name).ok());
    }

    /// Apply environment overrides from a lookup function
    pub fn merge_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.provider.api_key = Some(key);
        }
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            self.provider.base_url = base_url;
        }
        if let Some(model) = lookup("UXLENS_MODEL") {
            self.provider.model = Some(model);
        }
        if let Some(bind) = lookup("UXLENS_BIND") {
            self.server.bind = bind;
        }
        // A store URL in the environment selects the REST backend
        if let Some(url) = lookup("UXLENS_STORE_URL") {
            self.store.url = Some(url);
            self.store.kind = StoreKind::Rest;
        }
        if let Some(key) = lookup("UXLENS_STORE_KEY") {
            self.store.key = Some(key);
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            serde_yaml::to_string(self)?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Copy with API and store keys masked, for display
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.provider.api_key.is_some() {
            config.provider.api_key = Some("***".to_string());
        }
        if config.store.key.is_some() {
            config.store.key = Some("***".to_string());
        }
        config
    }

    /// Parsed listen address
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| Error::config(format!("invalid server.bind '{}': {}", self.server.bind, e)))
    }

    /// Settings for the OpenAI-compatible provider
    pub fn openai_config(&self) -> Result<OpenAiConfig> {
        let api_key = self.provider.api_key.clone().ok_or_else(|| {
            Error::config("missing API key; set provider.api_key or OPENAI_API_KEY")
        })?;
        Ok(OpenAiConfig {
            base_url: self.provider.base_url.clone(),
            api_key,
            timeout_secs: self.provider.timeout_secs,
        })
    }

    /// Build the completion provider
    pub fn completion_provider(&self) -> Result<Arc<dyn CompletionProvider>> {
        Ok(Arc::new(OpenAiProvider::new(self.openai_config()?)?))
    }

    /// Build the config store; `file_override` replaces the configured backend
    pub fn config_store(&self, file_override: Option<&Path>) -> Result<Arc<dyn ConfigStore>> {
        let store: Arc<dyn ConfigStore> = match (file_override, self.store.kind) {
            (Some(path), _) => Arc::new(StaticConfigStore::from_file(path)?),
            (None, StoreKind::File) => {
                let path = self
                    .store
                    .path
                    .as_deref()
                    .ok_or_else(|| Error::config("store.path is required for a file store"))?;
                Arc::new(StaticConfigStore::from_file(path)?)
            }
            (None, StoreKind::Rest) => {
                let (Some(url), Some(key)) = (&self.store.url, &self.store.key) else {
                    return Err(Error::config(
                        "store.url and store.key are required for a rest store",
                    ));
                };
                Arc::new(RestConfigStore::new(RestStoreConfig {
                    url: url.clone(),
                    key: key.clone(),
                    ai_config_table: self.store.ai_config_table.clone(),
                    brand_manual_table: self.store.brand_manual_table.clone(),
                    timeout_secs: self.store.timeout_secs,
                })?)
            }
        };

        Ok(match &self.provider.model {
            Some(model) => Arc::new(ModelOverride {
                inner: store,
                model: model.clone(),
            }),
            None => store,
        })
    }

    /// Wire the store and provider into an orchestrator
    pub fn orchestrator(&self, store_override: Option<&Path>) -> Result<Arc<AnalysisOrchestrator>> {
        let store = self.config_store(store_override)?;
        let provider = self.completion_provider()?;
        Ok(Arc::new(AnalysisOrchestrator::new(store, provider)))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Store wrapper forcing the configured model onto the AI configuration
struct ModelOverride {
    inner: Arc<dyn ConfigStore>,
    model: String,
}

#[async_trait]
impl ConfigStore for ModelOverride {
    async fn get_ai_config(&self) -> uxlens_core::Result<Option<AiConfig>> {
        Ok(self.inner.get_ai_config().await?.map(|mut config| {
            config.api_parameters.model = self.model.clone();
            config
        }))
    }

    async fn get_brand_manual(&self) -> uxlens_core::Result<Option<BrandManual>> {
        self.inner.get_brand_manual().await
    }
}

/// Builder for creating configurations programmatically
#[cfg_attr(not(test), allow(dead_code))]
pub struct ConfigBuilder {
    config: Config,
}

#[cfg_attr(not(test), allow(dead_code))]
impl ConfigBuilder {
    /// Create a new config builder
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the listen address
    pub fn bind(mut self, bind: impl Into<String>) -> Self {
        self.config.server.bind = bind.into();
        self
    }

    /// Set the provider API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.provider.api_key = Some(key.into());
        self
    }

    /// Force a model on every request
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.provider.model = Some(model.into());
        self
    }

    /// Use a file store
    pub fn store_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.store.kind = StoreKind::File;
        self.config.store.path = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const STORE: &str = r#"
ai_config:
  system_prompt: "Voce e um especialista em UX."
  prompt_template: "Contexto: {{CONTEXT}}"
  api_parameters:
    model: gpt-5
brand_manual:
  voice_principles: "Clara"
  rules: []
"#;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.store.kind, StoreKind::File);
        assert_eq!(config.store.ai_config_table, "ai_config");
        assert_eq!(config.provider.timeout_secs, Some(120));
        assert!(config.bind_addr().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "server:\n  allowed_origins: [\"https://app.example.com\"]").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.allowed_origins, vec!["https://app.example.com"]);
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.store.brand_manual_table, "brand_manual");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let err = Config::from_file(Path::new("/nonexistent/uxlens.yaml")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.merge_env_from(env(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("UXLENS_BIND", "127.0.0.1:9999"),
            ("UXLENS_STORE_URL", "https://db.example.com"),
            ("UXLENS_STORE_KEY", "service-key"),
            ("UXLENS_MODEL", "gpt-5-mini"),
            ("OPENAI_BASE_URL", ""),
        ]));

        assert_eq!(config.provider.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.provider.model.as_deref(), Some("gpt-5-mini"));
        assert_eq!(config.server.bind, "127.0.0.1:9999");
        assert_eq!(config.store.kind, StoreKind::Rest);
        assert_eq!(config.store.key.as_deref(), Some("service-key"));
        // Empty values are ignored
        assert_eq!(config.provider.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_save_and_reload_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("uxlens.json");
        let config = ConfigBuilder::new().bind("127.0.0.1:3000").model("gpt-5").build();

        config.save(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_redacted_masks_keys() {
        let config = ConfigBuilder::new().api_key("sk-secret").build().redacted();
        assert_eq!(config.provider.api_key.as_deref(), Some("***"));
        assert!(config.store.key.is_none());
    }

    #[test]
    fn test_provider_requires_api_key() {
        let err = Config::default().openai_config().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_rest_store_requires_url_and_key() {
        let mut config = Config::default();
        config.store.kind = StoreKind::Rest;
        let err = config.config_store(None).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_model_override_replaces_stored_model() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(file, "{}", STORE).unwrap();

        let config = ConfigBuilder::new()
            .store_file(file.path())
            .model("gpt-5-mini")
            .build();
        let store = config.config_store(None).unwrap();

        let ai_config = store.get_ai_config().await.unwrap().unwrap();
        assert_eq!(ai_config.api_parameters.model, "gpt-5-mini");
        assert!(store.get_brand_manual().await.unwrap().is_some());
    }
}
