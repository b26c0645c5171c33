//! Swagger document model.
//!
//! Only the parts the generator reads are modelled. Unknown keys are ignored.
//! Path items and definitions are kept as [`IndexMap`]s so iteration follows
//! declaration order.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use stubgen_core::{Error, Result};
use tracing::{debug, warn};

/// `info` block of the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Info {
    /// API title
    #[serde(default)]
    pub title: Option<String>,
    /// API version
    #[serde(default)]
    pub version: Option<String>,
}

/// JSON schema object as used by Swagger 2.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Schema {
    /// `$ref` target, e.g. `#/definitions/apiSession`
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    /// JSON schema type
    #[serde(rename = "type", default)]
    pub schema_type: Option<String>,
    /// Title
    #[serde(default)]
    pub title: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Object properties in declaration order
    #[serde(default)]
    pub properties: IndexMap<String, Schema>,
    /// Array element schema
    #[serde(default)]
    pub items: Option<Box<Schema>>,
    /// Enumeration values
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<Value>,
    /// Names of required properties
    #[serde(default)]
    pub required: Vec<String>,
}

impl Schema {
    /// Returns the title or description, whichever is set, title first.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.title.as_deref().or(self.description.as_deref())
    }
}

/// One operation parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    /// Wire name
    pub name: String,
    /// Location (`path`, `query`, `body`, `header` or `formData`)
    #[serde(rename = "in")]
    pub location: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the parameter is mandatory
    #[serde(default)]
    pub required: bool,
    /// Type of non-body parameters
    #[serde(rename = "type", default)]
    pub param_type: Option<String>,
    /// Schema of body parameters
    #[serde(default)]
    pub schema: Option<Schema>,
}

/// One declared response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Response {
    /// Description
    #[serde(default)]
    pub description: String,
    /// Body schema
    #[serde(default)]
    pub schema: Option<Schema>,
}

/// One operation of a path item.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation identifier
    #[serde(default)]
    pub operation_id: Option<String>,
    /// Short summary
    #[serde(default)]
    pub summary: Option<String>,
    /// Long description
    #[serde(default)]
    pub description: Option<String>,
    /// Parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Responses keyed by status code, in declaration order
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    info: Info,
    #[serde(default)]
    paths: IndexMap<String, IndexMap<String, Value>>,
    #[serde(default)]
    definitions: IndexMap<String, Value>,
}

/// A parsed HTTP API description.
///
/// # Examples
///
/// ```
/// use stubgen_codegen::openapi::ApiDocument;
///
/// let json = r#"{
///     "info": { "title": "Nakama API v2", "version": "2.0" },
///     "paths": {},
///     "definitions": { "apiSession": { "type": "object", "properties": { "token": { "type": "string" } } } }
/// }"#;
/// let document = ApiDocument::from_json(json, "apigrpc.swagger.json").unwrap();
///
/// assert!(document.definition("apiSession").is_some());
/// assert_eq!(document.info().title.as_deref(), Some("Nakama API v2"));
/// ```
#[derive(Debug, Clone)]
pub struct ApiDocument {
    info: Info,
    paths: IndexMap<String, IndexMap<String, Value>>,
    definitions: IndexMap<String, Schema>,
    rejected_definitions: Vec<(String, String)>,
}

impl ApiDocument {
    /// Parses a JSON document.
    ///
    /// Definitions that do not fit the schema model are set aside and
    /// reported through [`rejected_definitions`](Self::rejected_definitions)
    /// instead of failing the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] if `text` is not a JSON object with
    /// the expected top-level shape.
    pub fn from_json(text: &str, name: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(text).map_err(|e| Error::InvalidDocument {
            document: name.to_string(),
            message: e.to_string(),
            source: Some(e),
        })?;

        let mut definitions = IndexMap::with_capacity(raw.definitions.len());
        let mut rejected_definitions = Vec::new();
        for (definition_name, value) in raw.definitions {
            match serde_json::from_value::<Schema>(value) {
                Ok(schema) => {
                    definitions.insert(definition_name, schema);
                }
                Err(e) => {
                    warn!(definition = %definition_name, error = %e, "Rejected malformed definition");
                    rejected_definitions.push((definition_name, e.to_string()));
                }
            }
        }

        debug!(
            document = name,
            paths = raw.paths.len(),
            definitions = definitions.len(),
            "Parsed API document"
        );

        Ok(Self {
            info: raw.info,
            paths: raw.paths,
            definitions,
            rejected_definitions,
        })
    }

    /// Returns the `info` block.
    #[must_use]
    pub const fn info(&self) -> &Info {
        &self.info
    }

    /// Returns path items in declaration order.
    #[must_use]
    pub const fn paths(&self) -> &IndexMap<String, IndexMap<String, Value>> {
        &self.paths
    }

    /// Returns definitions in declaration order.
    #[must_use]
    pub const fn definitions(&self) -> &IndexMap<String, Schema> {
        &self.definitions
    }

    /// Looks up a definition by its declared name.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&Schema> {
        self.definitions.get(name)
    }

    /// Definitions that failed to deserialize, with the reason.
    #[must_use]
    pub fn rejected_definitions(&self) -> &[(String, String)] {
        &self.rejected_definitions
    }
}
