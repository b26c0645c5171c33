//! Command implementations for the stubgen CLI.
//!
//! Each generation command reads its inputs, runs the pipeline, writes the
//! generated module and prints a run summary in the requested format.

pub mod common;
pub mod completions;
pub mod realtime;
pub mod rest;
