//! Structural validation of JSON documents against schema nodes
//!
//! The validator walks a document and its schema together, depth first,
//! and accumulates every violation instead of stopping at the first one.
//! Object properties are visited in schema declaration order and array
//! elements by ascending index, so two runs over the same input always
//! produce the same, identically ordered error list.
//!
//! Copyright (c) 2025 Uxlens Team
//! Licensed under the Apache-2.0 license

pub mod base;
pub mod error;
pub mod validator;

// Re-export commonly used types
pub use base::ValidationContext;
pub use error::ValidationError;
pub use validator::{unknown_root_properties, validate, Validator};
