//! Shell completion generation command.
//!
//! Generates shell completion scripts for bash, zsh, fish, and `PowerShell`.

use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io;
use stubgen_core::cli::ExitCode;
use tracing::info;

/// Writes the completion script for `shell` to stdout.
///
/// # Examples
///
/// ```no_run
/// use stubgen_cli::commands::completions;
/// use clap_complete::Shell;
/// use clap::Command;
///
/// let cmd = Command::new("stubgen");
/// completions::generate_completions(Shell::Bash, &mut cmd.clone());
/// ```
pub fn generate_completions(shell: Shell, cmd: &mut Command) {
    info!("Generating {} completions", shell);
    generate(shell, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Runs the completions command.
///
/// Returns `Ok(ExitCode::SUCCESS)` on successful generation.
pub fn run(shell: Shell, cmd: &mut Command) -> Result<ExitCode> {
    generate_completions(shell, cmd);
    Ok(ExitCode::SUCCESS)
}
