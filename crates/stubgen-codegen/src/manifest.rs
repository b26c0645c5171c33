//! Generation manifest.
//!
//! The manifest lists which realtime messages and events to generate, in
//! emission order, and carries the REST naming settings. The built-in
//! default targets the Nakama realtime and REST APIs; a TOML file can
//! replace any top-level section.
//!
//! # Examples
//!
//! ```toml
//! [[messages]]
//! name = "ChannelJoin"
//!
//! [[messages]]
//! name = "ChannelLeave"
//! expects_response = false
//!
//! [[events]]
//! name = "ChannelMessage"
//! source = "api"
//!
//! [rest]
//! namespace_prefixes = ["nakama_"]
//! session_definition = "apiSession"
//! authenticate_token = "authenticate"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use stubgen_core::{Error, Result};
use tracing::debug;

/// Messages generated by default, in emission order.
const DEFAULT_MESSAGES: &[&str] = &[
    "ChannelJoin",
    "ChannelLeave",
    "ChannelMessageSend",
    "ChannelMessageRemove",
    "ChannelMessageUpdate",
    "MatchDataSend",
    "MatchCreate",
    "MatchJoin",
    "MatchLeave",
    "MatchmakerAdd",
    "MatchmakerRemove",
    "PartyCreate",
    "PartyJoin",
    "PartyLeave",
    "PartyPromote",
    "PartyAccept",
    "PartyRemove",
    "PartyClose",
    "PartyJoinRequestList",
    "PartyMatchmakerAdd",
    "PartyMatchmakerRemove",
    "PartyDataSend",
    "StatusFollow",
    "StatusUnfollow",
    "StatusUpdate",
];

/// Default messages the server does not answer.
const FIRE_AND_FORGET: &[&str] = &[
    "ChannelLeave",
    "MatchLeave",
    "MatchDataSend",
    "MatchmakerRemove",
    "PartyDataSend",
    "PartyAccept",
    "PartyClose",
    "PartyJoin",
    "PartyLeave",
    "PartyPromote",
    "PartyRemove",
    "PartyMatchmakerRemove",
    "StatusUnfollow",
    "StatusUpdate",
];

/// Events declared in the realtime protocol, in emission order.
const DEFAULT_REALTIME_EVENTS: &[&str] = &[
    "ChannelPresenceEvent",
    "MatchPresenceEvent",
    "MatchData",
    "Match",
    "MatchmakerMatched",
    "Notifications",
    "PartyPresenceEvent",
    "Party",
    "PartyData",
    "PartyJoinRequest",
    "PartyLeader",
    "StatusPresenceEvent",
    "Status",
    "StreamData",
    "Error",
];

/// Events declared in the API protocol.
const DEFAULT_API_EVENTS: &[&str] = &["ChannelMessage"];

/// One realtime message to generate a sender for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MessageEntry {
    /// Message name as declared in the realtime protocol
    pub name: String,

    /// Whether the server answers with a correlated reply
    #[serde(default = "default_expects_response")]
    pub expects_response: bool,
}

const fn default_expects_response() -> bool {
    true
}

impl MessageEntry {
    /// Creates a response-expecting entry.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expects_response: true,
        }
    }

    /// Creates a fire-and-forget entry.
    #[must_use]
    pub fn fire_and_forget(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expects_response: false,
        }
    }
}

/// Which protocol document declares an event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    /// The realtime protocol document
    #[default]
    Realtime,
    /// The API protocol document
    Api,
}

/// One realtime event to generate a subscriber for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EventEntry {
    /// Event name as declared
    pub name: String,

    /// Document the event is declared in
    #[serde(default)]
    pub source: EventSource,
}

impl EventEntry {
    /// Creates an entry for an event declared in the realtime protocol.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: EventSource::Realtime,
        }
    }

    /// Creates an entry for an event declared in the API protocol.
    #[must_use]
    pub fn from_api(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: EventSource::Api,
        }
    }
}

/// REST naming settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RestConfig {
    /// Normalized prefixes removed from operation ids, first match wins
    pub namespace_prefixes: Vec<String>,

    /// Definition whose presence in a success response marks an
    /// authentication endpoint
    pub session_definition: String,

    /// Operation id token marking an authentication endpoint when responses
    /// carry no schema, compared in normalized form
    pub authenticate_token: String,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            namespace_prefixes: vec!["nakama_".to_string(), "satori_".to_string()],
            session_definition: "apiSession".to_string(),
            authenticate_token: "authenticate".to_string(),
        }
    }
}

/// Generation manifest.
///
/// # Examples
///
/// ```
/// use stubgen_codegen::Manifest;
///
/// let manifest = Manifest::from_toml_str("[[messages]]\nname = \"Ping\"\n").unwrap();
/// assert_eq!(manifest.messages.len(), 1);
/// assert!(manifest.messages[0].expects_response);
/// // sections not given keep their defaults
/// assert!(!manifest.events.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Manifest {
    /// Messages to generate senders for, in emission order
    pub messages: Vec<MessageEntry>,

    /// Events to generate subscribers for, in emission order
    pub events: Vec<EventEntry>,

    /// REST naming settings
    pub rest: RestConfig,
}

impl Default for Manifest {
    fn default() -> Self {
        let messages = DEFAULT_MESSAGES
            .iter()
            .map(|name| MessageEntry {
                name: (*name).to_string(),
                expects_response: !FIRE_AND_FORGET.contains(name),
            })
            .collect();
        let events = DEFAULT_REALTIME_EVENTS
            .iter()
            .map(|name| EventEntry::new(*name))
            .chain(DEFAULT_API_EVENTS.iter().map(|name| EventEntry::from_api(*name)))
            .collect();

        Self {
            messages,
            events,
            rest: RestConfig::default(),
        }
    }
}

impl Manifest {
    /// Parses and validates a TOML manifest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] on invalid TOML, unknown keys, empty
    /// names or duplicate entries.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(text).map_err(|e| Error::ConfigError {
            message: format!("failed to parse manifest: {e}"),
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Loads a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the file cannot be read or is not a
    /// valid manifest.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::ConfigError {
            message: format!("failed to read manifest {}: {e}", path.display()),
        })?;
        let manifest = Self::from_toml_str(&text)?;
        debug!(
            path = %path.display(),
            messages = manifest.messages.len(),
            events = manifest.events.len(),
            "Loaded manifest"
        );
        Ok(manifest)
    }

    /// Checks names are non-empty and listed once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] naming the first offending entry.
    pub fn validate(&self) -> Result<()> {
        check_names("messages", self.messages.iter().map(|m| m.name.as_str()))?;
        check_names("events", self.events.iter().map(|e| e.name.as_str()))?;
        if self.rest.session_definition.trim().is_empty() {
            return Err(Error::ConfigError {
                message: "rest.session_definition must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn check_names<'a>(section: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(Error::ConfigError {
                message: format!("{section}: entry with empty name"),
            });
        }
        if !seen.insert(name) {
            return Err(Error::ConfigError {
                message: format!("{section}: '{name}' listed more than once"),
            });
        }
    }
    Ok(())
}
