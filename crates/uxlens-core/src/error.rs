//! Error types for the uxlens core library
//!
//! This module defines the error taxonomy of the analysis pipeline, using
//! thiserror for ergonomic error definitions and anyhow for flexible sources.
//! Every variant maps to a stable wire code sent to callers in the terminal
//! `error` event.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;
use uxlens_schemas::{ValidationError, SCHEMA_VERSION};

/// Main error type for uxlens operations
#[derive(Error, Debug)]
pub enum Error {
    /// Inbound request is malformed or incomplete
    #[error("Invalid request: {field} - {message}")]
    InvalidRequest { field: String, message: String },

    /// A required configuration row is absent
    #[error("Configuration not found: {what}")]
    ConfigNotFound { what: String },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The completion provider call failed
    #[error("Provider error: {provider} - {message}")]
    Provider {
        provider: String,
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// The provider answered without any textual payload
    #[error("Empty response from provider {provider}")]
    EmptyResponse { provider: String },

    /// The model's text is not well-formed JSON
    #[error("Model produced invalid structured output: {message}")]
    InvalidModelOutput {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The normalized document still violates the schema
    #[error("Model output violates the analysis schema ({} violation(s))", .errors.len())]
    SchemaViolation { errors: Vec<ValidationError> },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Stable machine-readable error codes sent to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidRequest,
    ConfigNotFound,
    ConfigError,
    ProviderError,
    EmptyModelResponse,
    InvalidModelOutput,
    #[serde(rename = "LLM_SCHEMA_VIOLATION")]
    SchemaViolation,
    InternalError,
}

impl ErrorCode {
    /// The wire representation of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::ConfigNotFound => "CONFIG_NOT_FOUND",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::ProviderError => "PROVIDER_ERROR",
            ErrorCode::EmptyModelResponse => "EMPTY_MODEL_RESPONSE",
            ErrorCode::InvalidModelOutput => "INVALID_MODEL_OUTPUT",
            ErrorCode::SchemaViolation => "LLM_SCHEMA_VIOLATION",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Create an invalid request error
    pub fn invalid_request(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error without a source
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a provider error without a source
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            message: message.into(),
            status_code: None,
            source: None,
        }
    }

    /// The wire code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::Configuration { .. } => ErrorCode::ConfigError,
            Error::Provider { .. } => ErrorCode::ProviderError,
            Error::EmptyResponse { .. } => ErrorCode::EmptyModelResponse,
            Error::InvalidModelOutput { .. } => ErrorCode::InvalidModelOutput,
            Error::SchemaViolation { .. } => ErrorCode::SchemaViolation,
            Error::Json { .. } | Error::Io { .. } | Error::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Render the JSON body sent to callers for this error
    ///
    /// Schema violations carry the full violation list and the schema
    /// version; provider errors carry the upstream status when known.
    pub fn to_payload(&self) -> Value {
        match self {
            Error::SchemaViolation { errors } => json!({
                "error": "The model response does not match the expected analysis schema",
                "code": self.code(),
                "details": { "errors": errors },
                "schema_version": SCHEMA_VERSION,
            }),
            Error::Provider {
                provider,
                message,
                status_code,
                ..
            } => json!({
                "error": self.to_string(),
                "code": self.code(),
                "details": {
                    "provider": provider,
                    "message": message,
                    "status": status_code,
                },
            }),
            Error::InvalidRequest { field, .. } => json!({
                "error": self.to_string(),
                "code": self.code(),
                "details": { "field": field },
            }),
            _ => json!({
                "error": self.to_string(),
                "code": self.code(),
            }),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
