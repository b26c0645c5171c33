//! Error types for stubgen.
//!
//! Errors fall in two groups. Fatal errors (`InputUnreadable`,
//! `InvalidDocument`, `TemplateError`, `OutputFailed`) abort a generation
//! run. Entity errors (`EntityNotFound`, `MalformedEntity`) are reported
//! per entity and the run continues without that entity.
//!
//! # Examples
//!
//! ```
//! use stubgen_core::{EntityKind, Error, Result};
//!
//! fn find_message(name: &str) -> Result<()> {
//!     Err(Error::EntityNotFound {
//!         kind: EntityKind::Message,
//!         name: name.to_string(),
//!     })
//! }
//!
//! let err = find_message("Ping").unwrap_err();
//! assert!(err.is_not_found());
//! assert!(!err.is_fatal());
//! ```

use crate::types::EntityKind;
use thiserror::Error;

/// Main error type for stubgen.
///
/// All errors in the system use this type, providing consistent error handling
/// across all crates in the workspace.
#[derive(Error, Debug)]
pub enum Error {
    /// An input document could not be read.
    ///
    /// Raised before any extraction takes place; the run aborts.
    #[error("Unable to read input '{path}'")]
    InputUnreadable {
        /// Path of the input document
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A top-level input document could not be parsed.
    #[error("Invalid document '{document}': {message}")]
    InvalidDocument {
        /// Name of the document (usually its path)
        document: String,
        /// Description of the parse failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A named entity is absent from its schema document.
    ///
    /// The entity is skipped; generation continues for all other entities.
    #[error("Unable to find {kind} '{name}'")]
    EntityNotFound {
        /// Kind of the missing entity
        kind: EntityKind,
        /// Name as listed in the manifest or referenced in the document
        name: String,
    },

    /// An entity exists but its structure cannot be used.
    #[error("Malformed {kind} '{name}': {reason}")]
    MalformedEntity {
        /// Kind of the malformed entity
        kind: EntityKind,
        /// Name or location of the entity
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Template registration or rendering failed.
    #[error("Template error: {message}")]
    TemplateError {
        /// Description of the template failure
        message: String,
    },

    /// Configuration error.
    ///
    /// Raised when a manifest is invalid or contains unknown keys.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Generated output could not be written.
    #[error("Unable to write output '{path}'")]
    OutputFailed {
        /// Destination path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid argument error.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns `true` if this is an entity-not-found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use stubgen_core::{EntityKind, Error};
    ///
    /// let err = Error::EntityNotFound {
    ///     kind: EntityKind::Event,
    ///     name: "Status".to_string(),
    /// };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::EntityNotFound { .. })
    }

    /// Returns `true` if this error concerns a single entity.
    ///
    /// Entity errors are recorded as skips and never abort a run.
    #[must_use]
    pub const fn is_entity_error(&self) -> bool {
        matches!(
            self,
            Self::EntityNotFound { .. } | Self::MalformedEntity { .. }
        )
    }

    /// Returns `true` if this error aborts a generation run.
    ///
    /// # Examples
    ///
    /// ```
    /// use stubgen_core::Error;
    ///
    /// let err = Error::InvalidDocument {
    ///     document: "api.swagger.json".to_string(),
    ///     message: "expected value".to_string(),
    ///     source: None,
    /// };
    /// assert!(err.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_entity_error()
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a template error.
    #[must_use]
    pub const fn is_template_error(&self) -> bool {
        matches!(self, Self::TemplateError { .. })
    }

    /// Returns `true` if an input document was missing or unparseable.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InputUnreadable { .. } | Self::InvalidDocument { .. }
        )
    }
}

/// Result type alias for stubgen operations.
///
/// # Examples
///
/// ```
/// use stubgen_core::{Error, Result};
///
/// fn check(value: &str) -> Result<&str> {
///     if value.is_empty() {
///         return Err(Error::InvalidArgument("empty".to_string()));
///     }
///     Ok(value)
/// }
///
/// assert!(check("ok").is_ok());
/// assert!(check("").is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_entity_error() {
        let err = Error::EntityNotFound {
            kind: EntityKind::Message,
            name: "MatchCreate".to_string(),
        };
        assert!(err.is_not_found());
        assert!(err.is_entity_error());
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_malformed_is_entity_error() {
        let err = Error::MalformedEntity {
            kind: EntityKind::Endpoint,
            name: "GET /v2/account".to_string(),
            reason: "missing operationId".to_string(),
        };
        assert!(err.is_entity_error());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_input_errors_are_fatal() {
        let err = Error::InputUnreadable {
            path: "realtime.proto".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.is_fatal());
        assert!(err.is_input_error());
    }

    #[test]
    fn test_template_error_detection() {
        let err = Error::TemplateError {
            message: "unclosed tag".to_string(),
        };
        assert!(err.is_template_error());
        assert!(err.is_fatal());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = Error::EntityNotFound {
            kind: EntityKind::Event,
            name: "StreamData".to_string(),
        };
        let display = format!("{err}");
        assert_eq!(display, "Unable to find event 'StreamData'");
    }

    #[test]
    fn test_result_alias() {
        fn returns_err() -> Result<i32> {
            Err(Error::ConfigError {
                message: "test error".to_string(),
            })
        }

        assert!(returns_err().unwrap_err().is_config_error());
    }
}
