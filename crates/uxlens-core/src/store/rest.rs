//! PostgREST-backed configuration store
//!
//! Reads the first row of the `ai_config` and `brand_manual` tables through a
//! PostgREST endpoint (Supabase style: `apikey` header plus bearer token).

use super::ConfigStore;
use crate::completion::HttpError;
use crate::error::{Error, Result};
use crate::types::{AiConfig, BrandManual};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Connection settings for [`RestConfigStore`]
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Project URL; `/rest/v1/` is appended
    pub url: String,
    /// Service key sent as `apikey` and bearer token
    pub key: String,
    pub ai_config_table: String,
    pub brand_manual_table: String,
    pub timeout_secs: u64,
}

impl Default for RestStoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key: String::new(),
            ai_config_table: "ai_config".to_string(),
            brand_manual_table: "brand_manual".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Config store reading single rows over HTTP
#[derive(Debug, Clone)]
pub struct RestConfigStore {
    client: ReqwestClient,
    base: Url,
    key: String,
    ai_config_table: String,
    brand_manual_table: String,
}

impl RestConfigStore {
    /// Create a store from its connection settings
    pub fn new(config: RestStoreConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(Error::configuration("Config store URL is not set"));
        }

        let root = format!("{}/rest/v1/", config.url.trim_end_matches('/'));
        let base = Url::parse(&root).map_err(|e| Error::Configuration {
            message: format!("Invalid config store URL '{}': {}", config.url, e),
            source: Some(e.into()),
        })?;

        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
                source: Some(e.into()),
            })?;

        Ok(Self {
            client,
            base,
            key: config.key,
            ai_config_table: config.ai_config_table,
            brand_manual_table: config.brand_manual_table,
        })
    }

    /// URL used to fetch the first row of `table`
    pub fn table_url(&self, table: &str) -> Result<Url> {
        let mut url = self.base.join(table).map_err(|e| Error::Configuration {
            message: format!("Invalid table name '{}': {}", table, e),
            source: Some(e.into()),
        })?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("limit", "1");
        Ok(url)
    }

    #[instrument(skip(self))]
    async fn first_row<T: DeserializeOwned>(&self, table: &str) -> Result<Option<T>> {
        let url = self.table_url(table)?;
        let response = self
            .client
            .get(url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| store_error(table, HttpError::from_request_error(e)))?;

        if !response.status().is_success() {
            let error = HttpError::from_response(response).await;
            return Err(store_error(table, error));
        }

        let rows: Vec<T> = response.json().await.map_err(|e| Error::Configuration {
            message: format!("Failed to decode rows from '{}': {}", table, e),
            source: Some(e.into()),
        })?;
        debug!(rows = rows.len(), "Fetched config rows");

        Ok(rows.into_iter().next())
    }
}

fn store_error(table: &str, error: HttpError) -> Error {
    Error::Configuration {
        message: format!("Failed to read '{}': {}", table, error.message),
        source: Some(error.into()),
    }
}

#[async_trait]
impl ConfigStore for RestConfigStore {
    async fn get_ai_config(&self) -> Result<Option<AiConfig>> {
        self.first_row(&self.ai_config_table).await
    }

    async fn get_brand_manual(&self) -> Result<Option<BrandManual>> {
        self.first_row(&self.brand_manual_table).await
    }
}
