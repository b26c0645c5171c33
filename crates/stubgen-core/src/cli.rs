//! CLI-specific types and utilities.
//!
//! # Examples
//!
//! ```
//! use stubgen_core::cli::{ExitCode, OutputFormat};
//!
//! let format = OutputFormat::Pretty;
//! assert_eq!(format.as_str(), "pretty");
//!
//! let code = ExitCode::SUCCESS;
//! assert_eq!(code.as_i32(), 0);
//! ```

use std::fmt;
use std::str::FromStr;

/// CLI output format for run summaries.
///
/// # Examples
///
/// ```
/// use stubgen_core::cli::OutputFormat;
///
/// let format: OutputFormat = "json".parse().unwrap();
/// assert_eq!(format, OutputFormat::Json);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// JSON output for machine parsing
    Json,
    /// Plain text output for scripts
    Text,
    /// Pretty-printed output with colors for human reading
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Returns the string representation of the format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "text",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            "pretty" => Ok(Self::Pretty),
            _ => Err(crate::Error::InvalidArgument(format!(
                "invalid output format: '{s}' (expected: json, text, or pretty)"
            ))),
        }
    }
}

/// CLI exit code with semantic meaning.
///
/// # Examples
///
/// ```
/// use stubgen_core::cli::ExitCode;
///
/// assert!(ExitCode::SUCCESS.is_success());
/// assert!(!ExitCode::INVALID_INPUT.is_success());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Successful execution (exit code 0), including runs with skipped entities.
    pub const SUCCESS: Self = Self(0);

    /// General error (exit code 1).
    pub const ERROR: Self = Self(1);

    /// Missing or unparseable input documents (exit code 2).
    pub const INVALID_INPUT: Self = Self(2);

    /// Creates an exit code from an integer value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }

    /// Returns the exit code as an integer.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }

    /// Checks if the exit code represents success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitCode {
    fn default() -> Self {
        Self::SUCCESS
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
