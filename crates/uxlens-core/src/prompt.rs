//! Prompt template rendering
//!
//! Templates carry `{{NAME}}` tokens. Every occurrence of a known token is
//! replaced; tokens without a substitution are left in place and logged so a
//! missing brand field shows up as a visible artifact instead of a failure.

use crate::types::{AnalysisRequest, BrandManual};
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::warn;

/// Placeholder for the screen description
pub const CONTEXT: &str = "CONTEXT";
/// Placeholder for the user goal
pub const JOB_TO_BE_DONE: &str = "JOB_TO_BE_DONE";
/// Placeholder for the brand voice principles
pub const VOICE_PRINCIPLES: &str = "VOICE_PRINCIPLES";
/// Placeholder for the brand rules
pub const BRAND_RULES: &str = "BRAND_RULES";

static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Renders templates from a substitution table
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    substitutions: BTreeMap<String, String>,
}

impl PromptBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the standard analysis placeholders filled
    pub fn for_analysis(request: &AnalysisRequest, brand: &BrandManual) -> Self {
        Self::new()
            .with(CONTEXT, request.context.as_str())
            .with(JOB_TO_BE_DONE, request.job_to_be_done.as_str())
            .with(VOICE_PRINCIPLES, render_value(&brand.voice_principles))
            .with(BRAND_RULES, render_value(&brand.rules))
    }

    /// Add or replace one substitution
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.substitutions.insert(name.into(), value.into());
        self
    }

    /// Render a template with this builder's substitutions
    pub fn render(&self, template: &str) -> String {
        build(template, &self.substitutions)
    }
}

/// Replace every `{{NAME}}` token in `template` with its substitution
///
/// Whitespace inside the braces is tolerated. Unknown tokens are kept
/// verbatim.
pub fn build(template: &str, substitutions: &BTreeMap<String, String>) -> String {
    let mut unresolved = Vec::new();
    let rendered = placeholder_regex().replace_all(template, |caps: &regex::Captures<'_>| {
        match substitutions.get(&caps[1]) {
            Some(value) => value.clone(),
            None => {
                unresolved.push(caps[1].to_string());
                caps[0].to_string()
            }
        }
    });

    if !unresolved.is_empty() {
        unresolved.sort();
        unresolved.dedup();
        warn!(placeholders = ?unresolved, "Template placeholders left unresolved");
    }

    rendered.into_owned()
}

/// Render a brand-manual value as prompt text
///
/// Strings are inserted as-is, null becomes empty, anything else is
/// pretty-printed JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
