//! Analyze command handler

use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use indicatif::ProgressBar;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};
use uxlens_core::{AnalysisRequest, ImageType, ProgressReporter, Step};

/// Handle the analyze command
#[instrument(skip(config, output), fields(image = %args.image))]
pub async fn handle_analyze(
    args: AnalyzeArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let timer = Timer::with_details("analyze_command", &args.image);

    let request = build_request(&args)?;
    request.validate(true)?;
    let orchestrator = config.orchestrator(args.store.as_deref())?;

    let mut reporter = SpinnerReporter {
        spinner: output.spinner("Starting analysis..."),
    };
    let outcome = orchestrator.analyze(&request, &mut reporter).await;
    reporter.finish(outcome.is_ok());
    let document = outcome?;

    info!(elapsed_ms = timer.elapsed().as_millis() as u64, "Analysis finished");
    timer.finish();

    if let Some(path) = &args.save_to {
        debug!("Writing analysis to file: {}", path.display());
        fs::write(path, serde_json::to_string_pretty(&document)?)?;
        output.success(&format!("✓ Analysis saved to {}", path.display()))?;
    }

    output.section("Analysis")?;
    output.analysis(&document)
}

/// Turn the image argument into a request: URLs pass through, files are inlined
fn build_request(args: &AnalyzeArgs) -> Result<AnalysisRequest> {
    let mut request = AnalysisRequest::new(&*args.context, &*args.job_to_be_done, "");

    if args.image.starts_with("http://") || args.image.starts_with("https://") {
        if args.image_format.is_some() {
            return Err(Error::invalid_args("--image-format only applies to image files"));
        }
        request.image = args.image.clone();
        request.image_type = Some(ImageType::Url);
        return Ok(request);
    }

    let path = Path::new(&args.image);
    if !path.is_file() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path)?;
    debug!(bytes = bytes.len(), "Read screenshot");

    request.image = STANDARD.encode(bytes);
    request.image_type = Some(ImageType::Base64);
    request.image_format = args.image_format.clone().or_else(|| format_from_extension(path));
    Ok(request)
}

fn format_from_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    Some(if ext == "jpg" { "jpeg".to_string() } else { ext })
}

/// Shows each pipeline step on the terminal spinner
struct SpinnerReporter {
    spinner: Option<ProgressBar>,
}

impl SpinnerReporter {
    fn finish(&self, success: bool) {
        if let Some(spinner) = &self.spinner {
            if success {
                spinner.finish_with_message("Analysis complete");
            } else {
                spinner.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for SpinnerReporter {
    fn progress(&mut self, step: Step, message: &str) {
        debug!(step = %step, "{}", message);
        if let Some(spinner) = &self.spinner {
            spinner.set_message(format!("{}...", message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(image: &str) -> AnalyzeArgs {
        AnalyzeArgs {
            image: image.to_string(),
            context: "Checkout".to_string(),
            job_to_be_done: "Pay quickly".to_string(),
            image_format: None,
            store: None,
            save_to: None,
        }
    }

    #[test]
    fn test_url_passes_through() {
        let request = build_request(&args("https://cdn.example.com/shot.png")).unwrap();
        assert_eq!(request.image, "https://cdn.example.com/shot.png");
        assert_eq!(request.image_type, Some(ImageType::Url));
        assert!(request.image_format.is_none());
    }

    #[test]
    fn test_file_is_base64_encoded() {
        let mut file = tempfile::Builder::new().suffix(".JPG").tempfile().unwrap();
        file.write_all(b"\x89PNG").unwrap();

        let request = build_request(&args(&file.path().display().to_string())).unwrap();
        assert_eq!(request.image, "iVBORw==");
        assert_eq!(request.image_type, Some(ImageType::Base64));
        assert_eq!(request.image_format.as_deref(), Some("jpeg"));
        assert!(request.validate(true).is_ok());
    }

    #[test]
    fn test_explicit_format_wins() {
        let file = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
        let mut args = args(&file.path().display().to_string());
        args.image_format = Some("webp".to_string());

        let request = build_request(&args).unwrap();
        assert_eq!(request.image_format.as_deref(), Some("webp"));
    }

    #[test]
    fn test_missing_file_and_format_on_url() {
        let err = build_request(&args("/nonexistent/shot.png")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));

        let mut url_args = args("https://cdn.example.com/shot.png");
        url_args.image_format = Some("png".to_string());
        assert!(build_request(&url_args).unwrap_err().should_show_help());
    }
}
