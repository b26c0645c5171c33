//! Strong domain types for stubgen.
//!
//! # Examples
//!
//! ```
//! use stubgen_core::{Identifier, PrimitiveCategory};
//!
//! let id = Identifier::new("ChannelMessageSend");
//! assert_eq!(id.as_str(), "channel_message_send");
//!
//! assert_eq!(PrimitiveCategory::Composite.lua_type(), "table");
//! ```

use crate::naming;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized identifier (newtype over String).
///
/// Every `Identifier` holds the output of [`naming::normalize`], so two
/// identifiers compare equal exactly when their normalized forms do.
///
/// # Examples
///
/// ```
/// use stubgen_core::Identifier;
///
/// let id = Identifier::new("MatchDataSend");
/// assert_eq!(id.as_str(), "match_data_send");
/// assert_eq!(Identifier::new(id.as_str()), id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Creates an identifier by normalizing `raw`.
    #[inline]
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(naming::normalize(raw))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Removes the first matching prefix from `prefixes`.
    ///
    /// Prefixes are compared against the normalized form. Stripping never
    /// produces an empty identifier: a name equal to a prefix is kept as is.
    ///
    /// # Examples
    ///
    /// ```
    /// use stubgen_core::Identifier;
    ///
    /// let id = Identifier::new("Nakama_AuthenticateDevice");
    /// let stripped = id.strip_prefixes(&["satori_", "nakama_"]);
    /// assert_eq!(stripped.as_str(), "authenticate_device");
    /// ```
    #[must_use]
    pub fn strip_prefixes<S: AsRef<str>>(&self, prefixes: &[S]) -> Self {
        prefixes
            .iter()
            .find_map(|prefix| {
                self.0
                    .strip_prefix(prefix.as_ref())
                    .filter(|rest| !rest.is_empty())
            })
            .map_or_else(|| self.clone(), Self::new)
    }

    /// Returns `true` if the identifier contains `token`.
    #[inline]
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Target-language-agnostic type bucket for generated stubs.
///
/// The only type vocabulary exposed to generated code. Anything that is not a
/// string, number or boolean is an opaque `Composite` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveCategory {
    /// Textual value
    String,
    /// Integer or floating point value
    Number,
    /// Boolean value
    Boolean,
    /// Structured value (objects, arrays, maps, nested messages)
    Composite,
}

impl PrimitiveCategory {
    /// Returns the Lua type name checked by generated `type()` asserts.
    ///
    /// # Examples
    ///
    /// ```
    /// use stubgen_core::PrimitiveCategory;
    ///
    /// assert_eq!(PrimitiveCategory::String.lua_type(), "string");
    /// assert_eq!(PrimitiveCategory::Number.lua_type(), "number");
    /// assert_eq!(PrimitiveCategory::Boolean.lua_type(), "boolean");
    /// assert_eq!(PrimitiveCategory::Composite.lua_type(), "table");
    /// ```
    #[must_use]
    pub const fn lua_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Composite => "table",
        }
    }

    /// Returns the category name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Composite => "composite",
        }
    }

    /// Returns `true` for every category except `Composite`.
    #[must_use]
    pub const fn is_primitive(self) -> bool {
        !matches!(self, Self::Composite)
    }
}

impl fmt::Display for PrimitiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of schema entity a descriptor or skip refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Realtime protocol message
    Message,
    /// Server-pushed realtime event
    Event,
    /// REST endpoint operation
    Endpoint,
    /// Reusable schema definition
    Definition,
}

impl EntityKind {
    /// Returns the entity kind name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Event => "event",
            Self::Endpoint => "endpoint",
            Self::Definition => "definition",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
