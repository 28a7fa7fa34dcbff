//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), with specialized
//! rendering for analysis documents and schema violations.

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::logging::redaction;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tracing::{debug, trace};
use uxlens_schemas::ValidationError;

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format an analysis document
    fn format_analysis(&self, document: &Value) -> Result<String>;

    /// Format a list of schema violations
    fn format_violations(&self, errors: &[ValidationError]) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_analysis(&self, document: &Value) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_analysis_human(document)),
            _ => self.format(document),
        }
    }

    fn format_violations(&self, errors: &[ValidationError]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_violations_human(errors)),
            _ => self.format(&serde_json::json!({ "errors": errors })),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && io::stderr().is_terminal(),
            quiet,
            verbose,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            verbose,
            writer,
        }
    }

    /// Get the output format
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Get verbosity level
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let mut value_json = serde_json::to_value(value)?;
        redaction::redact_json_value(&mut value_json);
        trace!(data = %value_json, "Outputting data");

        let formatted = self.format.format(value)?;
        self.writeln(formatted.trim_end())
    }

    /// Write an analysis document
    pub fn analysis(&mut self, document: &Value) -> Result<()> {
        let formatted = self.format.format_analysis(document)?;
        let formatted = if self.use_color && self.format == OutputFormat::Human {
            colorize_severities(&formatted)
        } else {
            formatted
        };
        self.writeln(formatted.trim_end())
    }

    /// Write schema violations
    pub fn violations(&mut self, errors: &[ValidationError]) -> Result<()> {
        let formatted = self.format.format_violations(errors)?;
        self.writeln(formatted.trim_end())
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(default_spinner_style());
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Helper function to create a spinner style
pub fn default_spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
}

/// Format an analysis document for human reading
fn format_analysis_human(document: &Value) -> String {
    let mut output = String::new();

    if let Some(summary) = document["resumo"].as_str() {
        output.push_str(&format!("{}\n\n", summary));
    }
    output.push_str(&format!(
        "Overall score: {}/10\n",
        format_value_compact(&document["pontuacaoGeral"])
    ));

    let scores = collect_scores(document);
    if !scores.is_empty() {
        output.push_str("\nScores:\n");
        let width = scores.iter().map(|(path, _)| path.len()).max().unwrap_or(0);
        for (path, score) in scores {
            output.push_str(&format!("  {:width$}  {}\n", path, score, width = width));
        }
    }

    if let Some(findings) = document["achados"].as_array() {
        output.push_str(&format!("\nFindings ({}):\n", findings.len()));
        for (i, finding) in findings.iter().enumerate() {
            output.push_str(&format!(
                "  {}. [{}] {}\n",
                i + 1,
                finding["severidade"].as_str().unwrap_or("?"),
                finding["titulo"].as_str().unwrap_or("(untitled)")
            ));
            if let Some(recommendation) = finding["recomendacao"].as_str() {
                output.push_str(&format!("     → {}\n", recommendation));
            }
        }
    }

    if let Some(priorities) = document["prioridades"].as_array() {
        output.push_str("\nPriorities:\n");
        for (i, priority) in priorities.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} (impact: {}, effort: {})\n",
                i + 1,
                priority["titulo"].as_str().unwrap_or("(untitled)"),
                priority["impacto"].as_str().unwrap_or("?"),
                priority["esforco"].as_str().unwrap_or("?")
            ));
        }
    }

    output
}

/// Numeric leaves of the scored sections, as `section.field` paths
fn collect_scores(document: &Value) -> Vec<(String, String)> {
    fn walk(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
        match value {
            Value::Number(n) => out.push((prefix.to_string(), n.to_string())),
            Value::Object(map) => {
                for (key, child) in map {
                    walk(&format!("{}.{}", prefix, key), child, out);
                }
            }
            _ => {}
        }
    }

    let mut scores = Vec::new();
    for section in ["experiencia", "acessibilidade", "marca"] {
        walk(section, &document[section], &mut scores);
    }
    scores
}

/// Format violations for human reading
fn format_violations_human(errors: &[ValidationError]) -> String {
    if errors.is_empty() {
        return "✅ Document is valid\n".to_string();
    }

    let mut output = format!("❌ Validation Failed - {} Error(s)\n\n", errors.len());
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("{}. 📍 {}\n   💬 {}\n", i + 1, error.path, error.message));
    }
    output
}

fn colorize_severities(text: &str) -> String {
    text.replace("[alta]", &"[alta]".red().bold().to_string())
        .replace("[media]", &"[media]".yellow().to_string())
        .replace("[baixa]", &"[baixa]".green().to_string())
}

/// Format a JSON value in a compact, readable way
fn format_value_compact(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) if arr.len() <= 3 => {
            let items: Vec<String> = arr.iter().map(format_value_compact).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) if obj.len() <= 2 => {
            let items: Vec<String> = obj
                .iter()
                .map(|(k, v)| format!("{}: {}", k, format_value_compact(v)))
                .collect();
            format!("{{{}}}", items.join(", "))
        }
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
