//! HTTP error classification for completion providers
//!
//! Turns non-success responses and transport failures into a uniform shape,
//! pulling the provider's own message out of the body when it has one.

use crate::error::Error;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Broad class of a provider failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClassification {
    /// Client errors (4xx)
    ClientError,
    /// Server errors (5xx)
    ServerError,
    /// Connection or timeout failures
    NetworkError,
    /// Quota or rate limiting (429)
    RateLimitError,
    /// Rejected credentials (401/403)
    AuthenticationError,
    Unknown,
}

/// Normalized HTTP error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpError {
    /// HTTP status code if available
    pub status_code: Option<u16>,
    pub classification: ErrorClassification,
    /// Provider-specific error code
    pub provider_code: Option<String>,
    /// Human-readable error message
    pub message: String,
    /// Parsed response body, when it was JSON
    pub details: Option<Value>,
}

impl HttpError {
    /// Build from a non-success response
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Self::from_parts(status, &body)
    }

    /// Build from a status and raw body
    pub fn from_parts(status: StatusCode, body: &str) -> Self {
        let details = serde_json::from_str::<Value>(body).ok();
        let (provider_code, message) = Self::extract_provider_error(&details, body);

        Self {
            status_code: Some(status.as_u16()),
            classification: Self::classify_status(status),
            provider_code,
            message,
            details,
        }
    }

    /// Build from a transport failure
    pub fn from_request_error(error: reqwest::Error) -> Self {
        let classification = if error.is_timeout() || error.is_connect() {
            ErrorClassification::NetworkError
        } else {
            ErrorClassification::Unknown
        };

        Self {
            status_code: error.status().map(|s| s.as_u16()),
            classification,
            provider_code: None,
            message: error.to_string(),
            details: None,
        }
    }

    fn classify_status(status: StatusCode) -> ErrorClassification {
        match status.as_u16() {
            401 | 403 => ErrorClassification::AuthenticationError,
            429 => ErrorClassification::RateLimitError,
            400..=499 => ErrorClassification::ClientError,
            500..=599 => ErrorClassification::ServerError,
            _ => ErrorClassification::Unknown,
        }
    }

    fn extract_provider_error(details: &Option<Value>, body: &str) -> (Option<String>, String) {
        if let Some(json) = details {
            // OpenAI: {"error": {"code": ..., "message": ...}}
            if let Some(error) = json.get("error") {
                let code = error
                    .get("code")
                    .or_else(|| error.get("type"))
                    .and_then(|c| c.as_str())
                    .map(|s| s.to_string());
                let message = error
                    .get("message")
                    .and_then(|m| m.as_str())
                    .or_else(|| error.as_str())
                    .unwrap_or(body)
                    .to_string();
                return (code, message);
            }

            // PostgREST and generic {"message": ...}
            if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
                let code = json.get("code").and_then(|c| c.as_str()).map(|s| s.to_string());
                return (code, message.to_string());
            }
        }

        (None, body.trim().to_string())
    }

    /// Convert into a provider error attributed to `provider`
    pub fn into_provider_error(self, provider: &str) -> Error {
        Error::Provider {
            provider: provider.to_string(),
            message: self.message.clone(),
            status_code: self.status_code,
            source: Some(anyhow::Error::new(self)),
        }
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HTTP Error [{}]: {} (classification: {:?})",
            self.status_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            self.message,
            self.classification
        )
    }
}

impl std::error::Error for HttpError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            HttpError::classify_status(StatusCode::UNAUTHORIZED),
            ErrorClassification::AuthenticationError
        );
        assert_eq!(
            HttpError::classify_status(StatusCode::TOO_MANY_REQUESTS),
            ErrorClassification::RateLimitError
        );
        assert_eq!(
            HttpError::classify_status(StatusCode::BAD_REQUEST),
            ErrorClassification::ClientError
        );
        assert_eq!(
            HttpError::classify_status(StatusCode::BAD_GATEWAY),
            ErrorClassification::ServerError
        );
    }

    #[test]
    fn test_openai_error_extraction() {
        let body = r#"{"error": {"code": "insufficient_quota", "message": "You exceeded your current quota"}}"#;
        let error = HttpError::from_parts(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(error.provider_code.as_deref(), Some("insufficient_quota"));
        assert_eq!(error.message, "You exceeded your current quota");
        assert_eq!(error.classification, ErrorClassification::RateLimitError);
    }

    #[test]
    fn test_postgrest_error_extraction() {
        let body = r#"{"code": "42P01", "message": "relation \"ai_config\" does not exist"}"#;
        let error = HttpError::from_parts(StatusCode::NOT_FOUND, body);
        assert_eq!(error.provider_code.as_deref(), Some("42P01"));
        assert!(error.message.contains("does not exist"));
    }

    #[test]
    fn test_plain_body_fallback() {
        let error = HttpError::from_parts(StatusCode::BAD_GATEWAY, "upstream timeout\n");
        assert_eq!(error.message, "upstream timeout");
        assert!(error.details.is_none());
    }

    #[test]
    fn test_into_provider_error_keeps_message_and_status() {
        let error = HttpError::from_parts(StatusCode::UNAUTHORIZED, r#"{"error": {"message": "bad key"}}"#)
            .into_provider_error("openai");
        match error {
            Error::Provider { provider, message, status_code, .. } => {
                assert_eq!(provider, "openai");
                assert_eq!(message, "bad key");
                assert_eq!(status_code, Some(401));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
