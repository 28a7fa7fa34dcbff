//! Path tracking for recursive validation
//!
//! Copyright (c) 2025 Uxlens Team
//! Licensed under the Apache-2.0 license

/// Name of the document root in reported paths
pub const ROOT: &str = "root";

/// Validation context carrying the address of the value being checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    /// Current path, e.g. `root.experiencia.cta`
    pub path: String,
}

impl ValidationContext {
    /// Context for the document root
    pub fn root() -> Self {
        Self {
            path: ROOT.to_string(),
        }
    }

    /// Create a child context for an object key
    pub fn child<P: AsRef<str>>(&self, key: P) -> Self {
        Self {
            path: format!("{}.{}", self.path, key.as_ref()),
        }
    }

    /// Create a child context for an array index
    pub fn child_index(&self, index: usize) -> Self {
        Self {
            path: format!("{}[{}]", self.path, index),
        }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::root()
    }
}
