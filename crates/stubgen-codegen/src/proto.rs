//! Message block extraction from protocol description text.
//!
//! This is a shallow textual scan, not a protobuf compiler. It finds a
//! top-level `message <Name> {` block, drops nested type declarations and
//! reads the remaining field declarations in source order.
//!
//! # Examples
//!
//! ```
//! use stubgen_codegen::proto::ProtoDocument;
//!
//! let document = ProtoDocument::parse(
//!     "message MatchJoin {\n  string match_id = 1;\n  map<string, string> metadata = 2;\n}\n",
//! );
//! let message = document.extract_message("MatchJoin").unwrap();
//!
//! assert_eq!(message.fields().len(), 2);
//! assert_eq!(message.fields()[1].wire_type, "map");
//! ```

use crate::descriptors::{EventDescriptor, FieldDescriptor, MessageDescriptor};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use stubgen_core::{EntityKind, Error, Result};
use tracing::{debug, warn};

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//[^\n]*").expect("valid regex"));

static MESSAGE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^message[ \t]+([A-Za-z_]\w*)[ \t]*\{").expect("valid regex")
});

static NESTED_DECLARATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:enum|message)\s+\w+\s*\{").expect("valid regex"));

static MAP_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"map\s*<[^>]*>").expect("valid regex"));

static FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*(?:(repeated|optional)\s+)?([A-Za-z_.][\w.]*)\s+([A-Za-z_]\w*)\s*=\s*(\d+)\s*(?:\[[^\]]*\])?\s*;",
    )
    .expect("valid regex")
});

/// A protocol description with comments removed.
#[derive(Debug, Clone)]
pub struct ProtoDocument {
    text: String,
}

impl ProtoDocument {
    /// Prepares `source` for extraction.
    #[must_use]
    pub fn parse(source: &str) -> Self {
        let without_blocks = BLOCK_COMMENT.replace_all(source, "");
        let text = LINE_COMMENT.replace_all(&without_blocks, "").into_owned();
        Self { text }
    }

    /// Returns the body of the first top-level block named `id`.
    ///
    /// The body runs from the opening brace up to the first `}` that starts
    /// a line.
    fn block(&self, kind: EntityKind, id: &str) -> Result<&str> {
        let header = MESSAGE_HEADER
            .captures_iter(&self.text)
            .find(|captures| &captures[1] == id)
            .and_then(|captures| captures.get(0))
            .ok_or_else(|| Error::EntityNotFound {
                kind,
                name: id.to_string(),
            })?;

        let rest = &self.text[header.end()..];
        let close = rest.find("\n}").ok_or_else(|| Error::MalformedEntity {
            kind,
            name: id.to_string(),
            reason: "block has no closing brace at line start".to_string(),
        })?;

        Ok(&rest[..close])
    }

    /// Returns `true` if a top-level block named `id` exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        MESSAGE_HEADER
            .captures_iter(&self.text)
            .any(|captures| &captures[1] == id)
    }

    /// Extracts the field list of message `id`.
    ///
    /// The returned descriptor is fire-and-forget; the caller applies the
    /// manifest classification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntityNotFound`] if no block named `id` exists and
    /// [`Error::MalformedEntity`] if the block is not closed.
    pub fn extract_message(&self, id: &str) -> Result<MessageDescriptor> {
        let body = self.block(EntityKind::Message, id)?;
        let body = strip_nested_declarations(body);
        let body = MAP_TYPE.replace_all(&body, "map");

        let mut seen = HashSet::new();
        let mut fields = Vec::new();
        for captures in FIELD.captures_iter(&body) {
            let name = &captures[3];
            if !seen.insert(name.to_string()) {
                warn!(message = id, field = name, "Duplicate field declaration dropped");
                continue;
            }
            let repeated = captures.get(1).is_some_and(|q| q.as_str() == "repeated");
            fields.push(FieldDescriptor::new(name, &captures[2], repeated));
        }

        debug!(message = id, fields = fields.len(), "Extracted message");
        Ok(MessageDescriptor::new(id, fields))
    }

    /// Verifies that event `id` is declared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntityNotFound`] if no block named `id` exists and
    /// [`Error::MalformedEntity`] if the block is not closed.
    pub fn extract_event(&self, id: &str) -> Result<EventDescriptor> {
        self.block(EntityKind::Event, id)?;
        debug!(event = id, "Extracted event");
        Ok(EventDescriptor::new(id))
    }
}

/// Extracts message `id` from raw protocol text.
///
/// # Errors
///
/// See [`ProtoDocument::extract_message`].
pub fn extract_message(schema_text: &str, id: &str) -> Result<MessageDescriptor> {
    ProtoDocument::parse(schema_text).extract_message(id)
}

/// Extracts event `id` from raw protocol text.
///
/// # Errors
///
/// See [`ProtoDocument::extract_event`].
pub fn extract_event(schema_text: &str, id: &str) -> Result<EventDescriptor> {
    ProtoDocument::parse(schema_text).extract_event(id)
}

/// Removes nested `enum` and `message` declarations, braces included.
///
/// `oneof` groups are kept since their members are fields of the message.
/// An unbalanced declaration is cut to the end of the body.
fn strip_nested_declarations(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;

    while let Some(found) = NESTED_DECLARATION.find(rest) {
        out.push_str(&rest[..found.start()]);

        let mut depth = 1usize;
        let mut end = rest.len();
        for (offset, ch) in rest[found.end()..].char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = found.end() + offset + ch.len_utf8();
                        break;
                    }
                }
                _ => {}
            }
        }
        rest = &rest[end..];
    }

    out.push_str(rest);
    out
}
