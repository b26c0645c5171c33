//! stubgen CLI library.
//!
//! Exposes the command implementations and output formatters so they can be
//! tested without spawning the binary.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unnecessary_wraps)] // every command returns Result<ExitCode>

pub mod commands;
pub mod formatters;
