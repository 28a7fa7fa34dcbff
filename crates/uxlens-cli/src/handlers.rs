//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod analyze;
mod completions;
mod config;
mod serve;
mod validate;

pub use analyze::handle_analyze;
pub use completions::handle_completions;
pub use config::handle_config;
pub use serve::handle_serve;
pub use validate::handle_validate;

use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Read a JSON or YAML document, choosing the parser by extension
pub(crate) fn read_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        serde_yaml::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
        })
    } else {
        serde_json::from_str(&content).map_err(|_| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_yaml_and_json_documents() {
        let mut yaml = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(yaml, "resumo: ok\npontuacaoGeral: 7").unwrap();
        assert_eq!(read_document(yaml.path()).unwrap()["pontuacaoGeral"], 7);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, "{{\"resumo\": \"ok\"}}").unwrap();
        assert_eq!(read_document(json.path()).unwrap()["resumo"], "ok");
    }

    #[test]
    fn test_read_document_errors() {
        let missing = read_document(Path::new("/nonexistent/analysis.json")).unwrap_err();
        assert!(matches!(missing, Error::FileNotFound { .. }));

        let mut broken = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(broken, "{{\"resumo\": ").unwrap();
        let err = read_document(broken.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat { ref expected, .. } if expected == "JSON"));
    }
}
