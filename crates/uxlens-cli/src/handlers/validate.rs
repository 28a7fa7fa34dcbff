//! Validate command handler

use crate::cli::ValidateArgs;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use tracing::{info, instrument};
use uxlens_core::Normalizer;
use uxlens_schemas::{analysis_schema, unknown_root_properties, validate};

/// Handle the validate command
#[instrument(skip(output), fields(file = %args.document.display()))]
pub async fn handle_validate(args: ValidateArgs, output: &mut OutputWriter) -> Result<()> {
    output.info(&format!("Validating analysis: {}", args.document.display()))?;

    let raw = super::read_document(&args.document)?;
    let document = if args.no_normalize {
        raw
    } else {
        Normalizer::ux_analysis().normalize(raw)
    };

    let schema = analysis_schema();
    let mut errors = validate(&document, schema);
    errors.extend(unknown_root_properties(&document, schema));
    info!(violations = errors.len(), "Validation finished");

    output.violations(&errors)?;
    if !errors.is_empty() {
        return Err(Error::Invalid { errors });
    }

    if args.print {
        output.section("Normalized document")?;
        output.data(&document)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use serde_json::{json, Value};
    use std::io::Write;
    use std::path::PathBuf;

    fn complete_analysis() -> Value {
        serde_json::from_str(include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../uxlens-schemas/tests/fixtures/complete_analysis.json"
        )))
        .unwrap()
    }

    fn write_document(document: &Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{}", document).unwrap();
        file
    }

    fn args(path: PathBuf, no_normalize: bool) -> ValidateArgs {
        ValidateArgs {
            document: path,
            no_normalize,
            print: false,
        }
    }

    fn quiet_output() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Json, false, true, 0, Box::new(std::io::sink()))
    }

    #[tokio::test]
    async fn test_complete_document_is_valid() {
        let file = write_document(&complete_analysis());
        handle_validate(args(file.path().to_path_buf(), true), &mut quiet_output())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_normalization_repairs_missing_priorities() {
        let mut document = complete_analysis();
        document.as_object_mut().unwrap().remove("prioridades");
        let file = write_document(&document);

        let strict = handle_validate(args(file.path().to_path_buf(), true), &mut quiet_output()).await;
        let Err(Error::Invalid { errors }) = strict else {
            panic!("expected violations without normalization");
        };
        assert_eq!(errors[0].path, "root.prioridades");

        handle_validate(args(file.path().to_path_buf(), false), &mut quiet_output())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_root_property_is_reported() {
        let mut document = complete_analysis();
        document["extra"] = json!(true);
        let file = write_document(&document);

        let err = handle_validate(args(file.path().to_path_buf(), false), &mut quiet_output())
            .await
            .unwrap_err();
        let Error::Invalid { errors } = err else {
            panic!("expected violations");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "root.extra");
    }
}
