//! REST client generation command.

use super::common::{GenerateOptions, generate};
use anyhow::Result;
use std::path::PathBuf;
use stubgen_codegen::Inputs;
use stubgen_core::cli::{ExitCode, OutputFormat};
use tracing::info;

/// Generates the REST client module from a Swagger document.
pub fn run(
    swagger: PathBuf,
    options: &GenerateOptions,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    info!(swagger = %swagger.display(), "Generating REST client module");
    generate(&Inputs::Rest { swagger }, options, output_format)
}
