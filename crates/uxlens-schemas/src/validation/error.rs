//! Validation error type
//!
//! Copyright (c) 2025 Uxlens Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single schema violation with its location in the document
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub struct ValidationError {
    /// Human-readable description of the violation
    pub message: String,
    /// Dotted/bracketed path, e.g. `root.achados[2].titulo`
    pub path: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error at '{}': {}", self.path, self.message)
    }
}

impl ValidationError {
    /// Create a new validation error
    pub fn new<P, M>(path: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_path() {
        let err = ValidationError::new("root.score", "must be <= 10");
        assert_eq!(err.to_string(), "Validation error at 'root.score': must be <= 10");
    }

    #[test]
    fn test_serializes_message_and_path() {
        let err = ValidationError::new("root.items", "must contain at least 3 items");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["path"], "root.items");
        assert_eq!(json["message"], "must contain at least 3 items");
    }
}
