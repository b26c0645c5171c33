//! Normalized schema descriptors.
//!
//! Descriptors are the in-memory records that sit between extraction and
//! emission. Each one is built once per generation run by the proto
//! extractor or the `OpenAPI` resolver and never changed afterwards.
//!
//! # Examples
//!
//! ```
//! use stubgen_codegen::{FieldDescriptor, MessageDescriptor};
//! use stubgen_core::PrimitiveCategory;
//!
//! let message = MessageDescriptor::new(
//!     "Ping",
//!     vec![FieldDescriptor::new("text", "string", false)],
//! )
//! .with_expects_response(true);
//!
//! assert_eq!(message.key().as_str(), "ping");
//! assert_eq!(message.fields()[0].category(), PrimitiveCategory::String);
//! ```

use crate::type_map::map_type;
use serde::Serialize;
use std::fmt;
use stubgen_core::{Identifier, PrimitiveCategory};

/// One field declaration of a protocol message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Field name as declared (also the payload key on the wire)
    pub name: String,
    /// Declared wire type (`map<..>` collapsed to `map`)
    pub wire_type: String,
    /// Whether the field carries the `repeated` qualifier
    pub repeated: bool,
}

impl FieldDescriptor {
    /// Creates a field descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, wire_type: impl Into<String>, repeated: bool) -> Self {
        Self {
            name: name.into(),
            wire_type: wire_type.into(),
            repeated,
        }
    }

    /// Returns the category used for the generated argument check.
    ///
    /// Repeated fields are always composite, whatever their element type.
    ///
    /// # Examples
    ///
    /// ```
    /// use stubgen_codegen::FieldDescriptor;
    /// use stubgen_core::PrimitiveCategory;
    ///
    /// let ids = FieldDescriptor::new("user_ids", "string", true);
    /// assert_eq!(ids.category(), PrimitiveCategory::Composite);
    /// ```
    #[must_use]
    pub fn category(&self) -> PrimitiveCategory {
        if self.repeated {
            PrimitiveCategory::Composite
        } else {
            map_type(&self.wire_type)
        }
    }
}

/// A realtime protocol message the client sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDescriptor {
    id: String,
    key: Identifier,
    fields: Vec<FieldDescriptor>,
    expects_response: bool,
}

impl MessageDescriptor {
    /// Creates a fire-and-forget message descriptor.
    ///
    /// Use [`with_expects_response`](Self::with_expects_response) to apply the
    /// manifest classification.
    #[must_use]
    pub fn new(id: &str, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            id: id.to_string(),
            key: Identifier::new(id),
            fields,
            expects_response: false,
        }
    }

    /// Sets whether the server answers this message with a correlated reply.
    #[must_use]
    pub const fn with_expects_response(mut self, expects_response: bool) -> Self {
        self.expects_response = expects_response;
        self
    }

    /// Message name as declared in the protocol description.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Normalized name, used as function name and payload key.
    #[must_use]
    pub const fn key(&self) -> &Identifier {
        &self.key
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Whether a correlation id must be allocated for this message.
    #[must_use]
    pub const fn expects_response(&self) -> bool {
        self.expects_response
    }
}

/// A server-pushed realtime notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDescriptor {
    id: String,
    key: Identifier,
}

impl EventDescriptor {
    /// Creates an event descriptor.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            key: Identifier::new(id),
        }
    }

    /// Event name as declared.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Normalized name, used as handler registry key.
    #[must_use]
    pub const fn key(&self) -> &Identifier {
        &self.key
    }

    /// Name of the generated registration function.
    #[must_use]
    pub fn hook_name(&self) -> String {
        format!("on_{}", self.key)
    }
}

/// Where a REST parameter travels in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Substituted into the URL path
    Path,
    /// Appended as a query string parameter
    Query,
    /// Encoded into the JSON request body
    Body,
}

impl ParameterLocation {
    /// Parses a Swagger `in` value. Other locations are not supported.
    ///
    /// # Examples
    ///
    /// ```
    /// use stubgen_codegen::ParameterLocation;
    ///
    /// assert_eq!(ParameterLocation::parse("query"), Some(ParameterLocation::Query));
    /// assert_eq!(ParameterLocation::parse("header"), None);
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "body" => Some(Self::Body),
            _ => None,
        }
    }

    /// Returns the location name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Body => "body",
        }
    }
}

/// One flat, classified REST parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescriptor {
    /// Wire name (path placeholder, query key or body property)
    pub name: String,
    /// Lua argument name in the generated signature
    pub arg_name: String,
    /// Request location
    pub location: ParameterLocation,
    /// Mapped type category
    pub category: PrimitiveCategory,
    /// Human readable description
    pub description: String,
    /// Whether the caller must supply a value
    pub required: bool,
    /// Name of the body parameter this property was flattened from
    pub flattened_from: Option<String>,
}

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// PATCH
    Patch,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl HttpMethod {
    /// Parses a Swagger path item key. Non-method keys yield `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stubgen_codegen::HttpMethod;
    ///
    /// assert_eq!(HttpMethod::parse("post"), Some(HttpMethod::Post));
    /// assert_eq!(HttpMethod::parse("parameters"), None);
    /// ```
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "delete" => Some(Self::Delete),
            "patch" => Some(Self::Patch),
            "head" => Some(Self::Head),
            "options" => Some(Self::Options),
            _ => None,
        }
    }

    /// Returns the upper case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response status code key.
///
/// The literal `default` key is kept as its own variant and never treated as
/// a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Numeric HTTP status
    Code(u16),
    /// The `default` response
    Default,
}

impl StatusCode {
    /// Parses a response key.
    ///
    /// # Examples
    ///
    /// ```
    /// use stubgen_codegen::StatusCode;
    ///
    /// assert_eq!(StatusCode::parse("200"), Some(StatusCode::Code(200)));
    /// assert_eq!(StatusCode::parse("default"), Some(StatusCode::Default));
    /// assert_eq!(StatusCode::parse("2XX"), None);
    /// ```
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        if key == "default" {
            return Some(Self::Default);
        }
        key.parse().ok().map(Self::Code)
    }

    /// Returns `true` for 2xx codes.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Code(200..=299))
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Default => f.write_str("default"),
        }
    }
}

impl Serialize for StatusCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One declared response of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseDescriptor {
    /// Status code key
    pub code: StatusCode,
    /// Response description
    pub description: String,
    /// Whether the response declares a schema, inline or referenced
    pub has_schema: bool,
    /// Normalized name of the referenced definition, when it resolves
    pub schema_ref: Option<Identifier>,
    /// Category of the response body
    pub category: PrimitiveCategory,
}

/// A REST operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointDescriptor {
    /// Normalized operation id with namespace prefixes removed
    pub operation_id: Identifier,
    /// HTTP method
    pub http_method: HttpMethod,
    /// URL path template, e.g. `/v2/account/{id}`
    pub path: String,
    /// Summary used as doc comment
    pub summary: String,
    /// Parameters in declaration order, body objects already flattened
    pub parameters: Vec<ParameterDescriptor>,
    /// Whether a successful call yields session credentials
    pub is_authentication_method: bool,
    /// Whether a success response references the session definition
    pub returns_session: bool,
    /// Declared responses in declaration order
    pub responses: Vec<ResponseDescriptor>,
}

impl EndpointDescriptor {
    /// Returns the parameters declared in `location`, in declaration order.
    pub fn parameters_in(
        &self,
        location: ParameterLocation,
    ) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters
            .iter()
            .filter(move |parameter| parameter.location == location)
    }

    /// Returns parameters grouped path first, then query, then body.
    ///
    /// Each group keeps its declaration order.
    #[must_use]
    pub fn ordered_parameters(&self) -> Vec<&ParameterDescriptor> {
        [
            ParameterLocation::Path,
            ParameterLocation::Query,
            ParameterLocation::Body,
        ]
        .into_iter()
        .flat_map(|location| self.parameters_in(location))
        .collect()
    }

    /// Returns `true` if any parameter is substituted into the path.
    #[must_use]
    pub fn has_path_parameters(&self) -> bool {
        self.parameters_in(ParameterLocation::Path).next().is_some()
    }

    /// Returns `true` if any parameter is sent in the query string.
    #[must_use]
    pub fn has_query_parameters(&self) -> bool {
        self.parameters_in(ParameterLocation::Query).next().is_some()
    }

    /// Returns `true` if any parameter is sent in the body.
    #[must_use]
    pub fn has_body_parameters(&self) -> bool {
        self.parameters_in(ParameterLocation::Body).next().is_some()
    }

    /// Looks up the response declared for `code`.
    #[must_use]
    pub fn response(&self, code: StatusCode) -> Option<&ResponseDescriptor> {
        self.responses.iter().find(|response| response.code == code)
    }
}

/// One property of a reusable schema definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyDescriptor {
    /// Property name as declared
    pub name: String,
    /// Lua argument name in the generated constructor
    pub arg_name: String,
    /// Mapped type category
    pub category: PrimitiveCategory,
    /// Human readable description
    pub description: String,
    /// Normalized name of the referenced definition, if any
    pub schema_ref: Option<Identifier>,
}

/// A named reusable schema object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinitionDescriptor {
    /// Normalized definition name
    pub name: Identifier,
    /// Name as declared in the definition table
    pub raw_name: String,
    /// Human readable description
    pub description: String,
    /// Properties in declaration order
    pub properties: Vec<PropertyDescriptor>,
    /// Enum values, empty unless the definition is an enumeration
    pub enum_values: Vec<String>,
}

impl DefinitionDescriptor {
    /// Returns `true` if the definition is an enumeration.
    #[must_use]
    pub fn has_enum(&self) -> bool {
        !self.enum_values.is_empty()
    }

    /// Returns `true` if the definition declares properties.
    #[must_use]
    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parameter(name: &str, location: ParameterLocation) -> ParameterDescriptor {
        ParameterDescriptor {
            name: name.to_string(),
            arg_name: format!("{name}_string"),
            location,
            category: PrimitiveCategory::String,
            description: String::new(),
            required: false,
            flattened_from: None,
        }
    }

    fn endpoint(parameters: Vec<ParameterDescriptor>) -> EndpointDescriptor {
        EndpointDescriptor {
            operation_id: Identifier::new("UpdateGroup"),
            http_method: HttpMethod::Put,
            path: "/v2/group/{group_id}".to_string(),
            summary: String::new(),
            parameters,
            is_authentication_method: false,
            returns_session: false,
            responses: vec![],
        }
    }

    #[test]
    fn test_ordered_parameters_groups_by_location() {
        let endpoint = endpoint(vec![
            parameter("name", ParameterLocation::Body),
            parameter("limit", ParameterLocation::Query),
            parameter("group_id", ParameterLocation::Path),
            parameter("open", ParameterLocation::Body),
            parameter("cursor", ParameterLocation::Query),
        ]);

        let names: Vec<_> = endpoint
            .ordered_parameters()
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, ["group_id", "limit", "cursor", "name", "open"]);
    }

    #[test]
    fn test_location_flags() {
        let endpoint = endpoint(vec![parameter("limit", ParameterLocation::Query)]);
        assert!(endpoint.has_query_parameters());
        assert!(!endpoint.has_path_parameters());
        assert!(!endpoint.has_body_parameters());
    }

    #[test]
    fn test_status_code_success() {
        assert!(StatusCode::Code(200).is_success());
        assert!(StatusCode::Code(204).is_success());
        assert!(!StatusCode::Code(404).is_success());
        assert!(!StatusCode::Default.is_success());
    }

    #[test]
    fn test_status_code_serializes_as_string() {
        assert_eq!(serde_json::to_string(&StatusCode::Default).unwrap(), "\"default\"");
        assert_eq!(serde_json::to_string(&StatusCode::Code(200)).unwrap(), "\"200\"");
    }

    #[test]
    fn test_message_defaults_to_fire_and_forget() {
        let message = MessageDescriptor::new("MatchLeave", vec![]);
        assert!(!message.expects_response());
        assert_eq!(message.key().as_str(), "match_leave");
    }

    #[test]
    fn test_event_hook_name() {
        let event = EventDescriptor::new("MatchmakerMatched");
        assert_eq!(event.hook_name(), "on_matchmaker_matched");
    }

    #[test]
    fn test_http_method_case_insensitive() {
        assert_eq!(HttpMethod::parse("DELETE"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
