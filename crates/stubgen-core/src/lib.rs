//! Core types and errors for stubgen.
//!
//! This crate provides the foundational types shared by the code generator
//! and the command-line interface.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`Identifier`, `PrimitiveCategory`, `EntityKind`)
//! - The identifier normalizer used by every other component
//! - Error hierarchy with contextual information
//! - CLI types (`OutputFormat`, `ExitCode`)

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod error;
mod types;

pub mod cli;
pub mod naming;

pub use error::{Error, Result};
pub use types::{EntityKind, Identifier, PrimitiveCategory};
