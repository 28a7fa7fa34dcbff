//! Uxlens Schemas - schema model and structural validation
//!
//! This crate provides the declarative schema model used to check documents
//! produced by a multimodal language model, and a recursive validator that
//! reports every violation with its location in the document.
//!
//! ## Features
//!
//! - **Schema Nodes**: a tagged-variant model of a JSON-Schema subset
//!   (object, array, string, number, boolean, union of primitive kinds)
//! - **Recursive Validation**: depth-first descent collecting all violations
//! - **Path Reporting**: every error is addressed as `root.field[2].child`
//! - **Built-in Analysis Schema**: the UX-analysis document schema, embedded
//!   at compile time and parsed once per process
//!
//! ## Quick Start
//!
//! ```rust
//! use uxlens_schemas::{validate, SchemaNode};
//! use serde_json::json;
//!
//! let schema = SchemaNode::from_json(&json!({
//!     "type": "object",
//!     "required": ["score"],
//!     "properties": {
//!         "score": {"type": "number", "minimum": 0, "maximum": 10}
//!     }
//! }))
//! .unwrap();
//!
//! let errors = validate(&json!({"score": 12}), &schema);
//! assert_eq!(errors.len(), 1);
//! assert_eq!(errors[0].path, "root.score");
//! ```
//!
//! Copyright (c) 2025 Uxlens Team
//! Licensed under the Apache-2.0 license

pub mod analysis;
pub mod node;
pub mod validation;

// Re-export commonly used types for convenience
pub use analysis::{analysis_schema, analysis_schema_json, SCHEMA_VERSION};
pub use node::{Kind, SchemaError, SchemaNode};
pub use validation::{
    unknown_root_properties, validate, ValidationContext, ValidationError, Validator,
};
