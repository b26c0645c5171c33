//! Common plumbing shared by the generation commands.
//!
//! Builds the pipeline from CLI options, picks the output sink, maps library
//! errors onto exit codes and prints the run summary.

use crate::formatters::format_output;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use stubgen_codegen::{
    FileSink, GenerationReport, Inputs, Manifest, OutputSink, Pipeline, SkippedEntity, StdoutSink,
    Surface, TemplateEngine,
};
use stubgen_core::cli::{ExitCode, OutputFormat};
use tracing::{error, info};

/// Options shared by the `realtime` and `rest` commands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Output file; stdout when `None`
    pub output: Option<PathBuf>,
    /// Manifest file replacing the built-in lists
    pub manifest: Option<PathBuf>,
    /// Directory of template overrides
    pub template_dir: Option<PathBuf>,
}

/// Run summary printed to stderr after a successful generation.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Generated surface
    pub surface: Surface,
    /// Output file, or `stdout`
    pub output: String,
    /// Number of emitted functions and constant groups
    pub generated: usize,
    /// Entities left out, with reasons
    pub skipped: Vec<SkippedEntity>,
    /// Names emitted more than once
    pub collisions: Vec<String>,
    /// Size of the generated module
    pub bytes: usize,
}

impl RunSummary {
    /// Summarizes `report` for a run that wrote to `output`.
    #[must_use]
    pub fn new(report: &GenerationReport, output: Option<&Path>) -> Self {
        Self {
            surface: report.surface,
            output: output.map_or_else(|| "stdout".to_string(), |p| p.display().to_string()),
            generated: report.generated.len(),
            skipped: report.skipped.clone(),
            collisions: report.collisions.clone(),
            bytes: report.bytes,
        }
    }
}

/// Builds a pipeline from the manifest and template options.
///
/// # Errors
///
/// Returns [`stubgen_core::Error::ConfigError`] for an unreadable or invalid
/// manifest and [`stubgen_core::Error::TemplateError`] for a bad override.
///
/// # Examples
///
/// ```
/// use stubgen_cli::commands::common::{GenerateOptions, build_pipeline};
///
/// let pipeline = build_pipeline(&GenerateOptions::default()).unwrap();
/// assert_eq!(pipeline.manifest().messages.len(), 25);
/// ```
pub fn build_pipeline(options: &GenerateOptions) -> stubgen_core::Result<Pipeline> {
    let manifest = match &options.manifest {
        Some(path) => Manifest::load(path)?,
        None => Manifest::default(),
    };
    let engine = match &options.template_dir {
        Some(dir) => TemplateEngine::with_template_dir(dir)?,
        None => TemplateEngine::new()?,
    };
    Pipeline::with_engine(manifest, engine)
}

/// Runs one generation and prints its summary.
///
/// Missing or unparseable inputs and invalid manifests yield
/// [`ExitCode::INVALID_INPUT`]. Skipped entities do not change the exit code.
///
/// # Errors
///
/// Returns an error if rendering or writing the output fails.
pub fn generate(
    inputs: &Inputs,
    options: &GenerateOptions,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let pipeline = match build_pipeline(options) {
        Ok(pipeline) => pipeline,
        Err(e) if e.is_config_error() => {
            error!(error = %e, "Invalid manifest");
            return Ok(ExitCode::INVALID_INPUT);
        }
        Err(e) => return Err(e).context("failed to prepare generator"),
    };

    let mut sink: Box<dyn OutputSink> = match &options.output {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(StdoutSink),
    };

    let report = match pipeline.run(inputs, sink.as_mut()) {
        Ok(report) => report,
        Err(e) if e.is_input_error() => {
            error!(error = %e, "Invalid input");
            return Ok(ExitCode::INVALID_INPUT);
        }
        Err(e) => return Err(e).context("generation failed"),
    };

    if let Some(path) = &options.output {
        info!(path = %path.display(), bytes = report.bytes, "Wrote generated module");
    }

    let summary = RunSummary::new(&report, options.output.as_deref());
    eprintln!("{}", format_output(&summary, output_format)?);
    Ok(ExitCode::SUCCESS)
}
