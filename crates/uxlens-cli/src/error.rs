//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;
use uxlens_schemas::ValidationError;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from the analysis pipeline
    #[error("{0}")]
    Core(#[from] uxlens_core::Error),

    /// File not found
    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {}", .path.display(), .expected)]
    InvalidFormat { path: PathBuf, expected: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// A document failed schema validation
    #[error("Document has {} schema violation(s)", .errors.len())]
    Invalid { errors: Vec<ValidationError> },

    /// The HTTP server could not start or stopped with an error
    #[error("Server error: {0}")]
    Server(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML serialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::Core(_) => 2,
            Self::FileNotFound { .. } => 3,
            Self::InvalidFormat { .. } => 4,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::Invalid { .. } => 7,
            Self::Server(_) => 8,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let label = match error {
        Error::Core(core) => format!("Error [{}]:", core.code()),
        _ => "Error:".to_string(),
    };

    let mut message = if use_color {
        use colored::Colorize;
        format!("{} {}", label.red().bold(), error)
    } else {
        format!("{} {}", label, error)
    };

    // `validate` prints its own list; model output violations are listed here
    if let Error::Core(uxlens_core::Error::SchemaViolation { errors }) = error {
        for violation in errors {
            message.push_str(&format!("\n  - {}: {}", violation.path, violation.message));
        }
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_distinct_for_core_and_io() {
        let core = Error::from(uxlens_core::Error::configuration("no key"));
        let io = Error::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(core.exit_code(), 2);
        assert_eq!(io.exit_code(), 1);
        assert!(Error::invalid_args("x").should_show_help());
        assert!(!core.should_show_help());
    }

    #[test]
    fn test_format_core_error_includes_code() {
        let err = Error::from(uxlens_core::Error::ConfigNotFound {
            what: "brand manual".to_string(),
        });
        let text = format_error(&err, false);
        assert!(text.starts_with("Error [CONFIG_NOT_FOUND]:"));
        assert!(text.contains("brand manual"));
    }

    #[test]
    fn test_format_lists_model_violations() {
        let err = Error::from(uxlens_core::Error::SchemaViolation {
            errors: vec![
                ValidationError::new("root.pontuacaoGeral", "missing required property"),
                ValidationError::new("root.achados", "must contain at least 3 items"),
            ],
        });
        let text = format_error(&err, false);
        assert!(text.starts_with("Error [LLM_SCHEMA_VIOLATION]:"));
        assert!(text.contains("\n  - root.pontuacaoGeral: missing required property"));
        assert!(text.contains("\n  - root.achados: must contain at least 3 items"));
    }
}
