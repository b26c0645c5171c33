//! stubgen command-line interface.
//!
//! Generates the Lua realtime socket module and the Lua REST client module
//! from protocol and API descriptions.
//!
//! # Architecture
//!
//! The CLI is organized around subcommands:
//! - `realtime` - Generate the realtime socket module from `.proto` files
//! - `rest` - Generate the REST client module from a Swagger document
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! # Realtime socket module
//! stubgen realtime realtime.proto api.proto -o nakama/socket.lua
//!
//! # REST client module with a custom manifest
//! stubgen rest apigrpc.swagger.json --manifest stubgen.toml > nakama/nakama.lua
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use stubgen_cli::commands::{self, common::GenerateOptions};
use stubgen_core::cli::{ExitCode, OutputFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Lua client stub generator.
#[derive(Parser, Debug)]
#[command(name = "stubgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Run summary format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the realtime socket module.
    ///
    /// Messages are read from the realtime protocol description. Events are
    /// read from the document their manifest entry names.
    ///
    /// # Examples
    ///
    /// ```bash
    /// stubgen realtime realtime.proto api.proto -o nakama/socket.lua
    /// ```
    Realtime {
        /// Realtime protocol description (.proto)
        realtime: PathBuf,

        /// API protocol description (.proto)
        api: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Manifest replacing the built-in message and event lists
        #[arg(long, env = "STUBGEN_MANIFEST")]
        manifest: Option<PathBuf>,

        /// Directory with template overrides (e.g. realtime/socket.lua.hbs)
        #[arg(long)]
        template_dir: Option<PathBuf>,
    },

    /// Generate the REST client module.
    ///
    /// # Examples
    ///
    /// ```bash
    /// stubgen rest apigrpc.swagger.json -o nakama/nakama.lua
    /// ```
    Rest {
        /// API description (Swagger 2.0 JSON)
        swagger: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Manifest carrying the REST naming settings
        #[arg(long, env = "STUBGEN_MANIFEST")]
        manifest: Option<PathBuf>,

        /// Directory with template overrides (e.g. rest/endpoint.lua.hbs)
        #[arg(long)]
        template_dir: Option<PathBuf>,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell for completion generation
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let exit_code = execute_command(cli.command, output_format)?;

    std::process::exit(exit_code.as_i32());
}

/// Installs the stderr subscriber.
///
/// `--verbose` forces debug level; otherwise `RUST_LOG` applies, defaulting
/// to info.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Routes a command to its handler and returns the exit code.
fn execute_command(command: Commands, output_format: OutputFormat) -> Result<ExitCode> {
    match command {
        Commands::Realtime {
            realtime,
            api,
            output,
            manifest,
            template_dir,
        } => {
            let options = GenerateOptions {
                output,
                manifest,
                template_dir,
            };
            commands::realtime::run(realtime, api, &options, output_format)
        }
        Commands::Rest {
            swagger,
            output,
            manifest,
            template_dir,
        } => {
            let options = GenerateOptions {
                output,
                manifest,
                template_dir,
            };
            commands::rest::run(swagger, &options, output_format)
        }
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_realtime() {
        let cli = Cli::parse_from([
            "stubgen",
            "realtime",
            "realtime.proto",
            "api.proto",
            "-o",
            "socket.lua",
        ]);
        if let Commands::Realtime {
            realtime,
            api,
            output,
            ..
        } = cli.command
        {
            assert_eq!(realtime, PathBuf::from("realtime.proto"));
            assert_eq!(api, PathBuf::from("api.proto"));
            assert_eq!(output, Some(PathBuf::from("socket.lua")));
        } else {
            panic!("Expected Realtime command");
        }
    }

    #[test]
    fn test_cli_parsing_realtime_requires_both_documents() {
        assert!(Cli::try_parse_from(["stubgen", "realtime", "realtime.proto"]).is_err());
    }

    #[test]
    fn test_cli_parsing_rest() {
        let cli = Cli::parse_from([
            "stubgen",
            "rest",
            "apigrpc.swagger.json",
            "--template-dir",
            "templates",
        ]);
        if let Commands::Rest {
            swagger,
            output,
            template_dir,
            ..
        } = cli.command
        {
            assert_eq!(swagger, PathBuf::from("apigrpc.swagger.json"));
            assert_eq!(output, None);
            assert_eq!(template_dir, Some(PathBuf::from("templates")));
        } else {
            panic!("Expected Rest command");
        }
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["stubgen", "--verbose", "rest", "api.json"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_output_format_default() {
        let cli = Cli::parse_from(["stubgen", "rest", "api.json"]);
        assert_eq!(cli.format, "pretty");
    }

    #[test]
    fn test_cli_output_format_global() {
        let cli = Cli::parse_from(["stubgen", "rest", "api.json", "--format", "json"]);
        assert_eq!(cli.format, "json");
    }

    #[test]
    fn test_cli_parsing_completions_zsh() {
        let cli = Cli::parse_from(["stubgen", "completions", "zsh"]);
        if let Commands::Completions { shell } = cli.command {
            assert_eq!(shell, Shell::Zsh);
        } else {
            panic!("Expected Completions command");
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
