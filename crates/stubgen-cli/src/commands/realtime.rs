//! Realtime socket generation command.

use super::common::{GenerateOptions, generate};
use anyhow::Result;
use std::path::PathBuf;
use stubgen_codegen::Inputs;
use stubgen_core::cli::{ExitCode, OutputFormat};
use tracing::info;

/// Generates the realtime socket module from the two protocol descriptions.
///
/// # Arguments
///
/// * `realtime` - Realtime protocol `.proto` file
/// * `api` - API protocol `.proto` file declaring API events
/// * `options` - Output, manifest and template options
/// * `output_format` - Format of the run summary
pub fn run(
    realtime: PathBuf,
    api: PathBuf,
    options: &GenerateOptions,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    info!(
        realtime = %realtime.display(),
        api = %api.display(),
        "Generating realtime socket module"
    );
    generate(&Inputs::Realtime { realtime, api }, options, output_format)
}
