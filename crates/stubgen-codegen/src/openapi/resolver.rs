//! Reference resolution and descriptor building for API documents.
//!
//! Every function here is pure: descriptors are built from the document and
//! the REST configuration and never modified afterwards.

use super::document::{ApiDocument, Operation, Parameter, Schema};
use crate::descriptors::{
    DefinitionDescriptor, EndpointDescriptor, HttpMethod, ParameterDescriptor, ParameterLocation,
    PropertyDescriptor, ResponseDescriptor, StatusCode,
};
use crate::manifest::RestConfig;
use crate::report::SkippedEntity;
use crate::type_map::map_type;
use serde_json::Value;
use stubgen_core::naming::{normalize, to_lua_arg_name};
use stubgen_core::{EntityKind, Error, Identifier, PrimitiveCategory, Result};
use tracing::{debug, warn};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Endpoints and definitions resolved from one document.
#[derive(Debug, Clone, Default)]
pub struct ResolvedApi {
    /// Endpoints in path, then method, declaration order
    pub endpoints: Vec<EndpointDescriptor>,
    /// Definitions in declaration order
    pub definitions: Vec<DefinitionDescriptor>,
    /// Entities left out, one entry each
    pub skipped: Vec<SkippedEntity>,
}

/// Returns the definition name a `$ref` points to.
///
/// # Examples
///
/// ```
/// use stubgen_codegen::openapi::resolve_ref;
///
/// assert_eq!(resolve_ref("#/definitions/apiSession"), "apiSession");
/// ```
#[must_use]
pub fn resolve_ref(reference: &str) -> &str {
    reference
        .strip_prefix(DEFINITIONS_PREFIX)
        .unwrap_or(reference)
}

/// Follows the schema's `$ref`, if it has one that resolves.
fn referenced<'d>(document: &'d ApiDocument, schema: &Schema) -> Option<(&'d str, &'d Schema)> {
    let reference = schema.reference.as_deref()?;
    let found = document.definitions().get_key_value(resolve_ref(reference));
    if found.is_none() {
        debug!(reference, "Dangling reference");
    }
    found.map(|(name, target)| (name.as_str(), target))
}

/// Category of a parameter, property or response schema.
///
/// A reference to an enumeration is a string. Any other reference is
/// composite, as is a reference that does not resolve.
fn schema_category(document: &ApiDocument, schema: &Schema) -> PrimitiveCategory {
    if schema.reference.is_some() {
        return match referenced(document, schema) {
            Some((_, target)) if !target.enum_values.is_empty() => PrimitiveCategory::String,
            _ => PrimitiveCategory::Composite,
        };
    }
    schema
        .schema_type
        .as_deref()
        .map_or(PrimitiveCategory::Composite, map_type)
}

/// Normalized name of the definition `schema` points to, directly or
/// through its array items.
fn schema_ref(document: &ApiDocument, schema: &Schema) -> Option<Identifier> {
    referenced(document, schema)
        .or_else(|| {
            schema
                .items
                .as_deref()
                .and_then(|items| referenced(document, items))
        })
        .map(|(name, _)| Identifier::new(name))
}

fn describe(schema: &Schema) -> String {
    schema.summary().unwrap_or_default().to_string()
}

fn simple_parameter(
    parameter: &Parameter,
    location: ParameterLocation,
    category: PrimitiveCategory,
) -> ParameterDescriptor {
    ParameterDescriptor {
        name: parameter.name.clone(),
        arg_name: to_lua_arg_name(&parameter.name, category),
        location,
        category,
        description: parameter.description.clone().unwrap_or_default(),
        required: parameter.required,
        flattened_from: None,
    }
}

/// Expands a body parameter into flat parameters.
///
/// An object schema with properties yields one parameter per property.
/// Anything else stays a single parameter.
fn flatten_body(document: &ApiDocument, parameter: &Parameter) -> Vec<ParameterDescriptor> {
    let Some(schema) = parameter.schema.as_ref() else {
        let category = parameter
            .param_type
            .as_deref()
            .map_or(PrimitiveCategory::Composite, map_type);
        return vec![simple_parameter(parameter, ParameterLocation::Body, category)];
    };

    let object = referenced(document, schema).map_or(schema, |(_, target)| target);
    let is_object = object.schema_type.as_deref().is_none_or(|t| t == "object");
    if !is_object || object.properties.is_empty() {
        let category = schema_category(document, schema);
        return vec![simple_parameter(parameter, ParameterLocation::Body, category)];
    }

    object
        .properties
        .iter()
        .map(|(name, property)| {
            let category = schema_category(document, property);
            let required = if object.required.is_empty() {
                parameter.required
            } else {
                object.required.iter().any(|r| r == name)
            };
            ParameterDescriptor {
                name: name.clone(),
                arg_name: to_lua_arg_name(name, category),
                location: ParameterLocation::Body,
                category,
                description: property
                    .summary()
                    .or(parameter.description.as_deref())
                    .unwrap_or_default()
                    .to_string(),
                required,
                flattened_from: Some(parameter.name.clone()),
            }
        })
        .collect()
}

/// Parameters declared on the path item, shared by all its operations.
fn shared_parameters(
    document: &ApiDocument,
    path: &str,
) -> std::result::Result<Vec<Parameter>, String> {
    document
        .paths()
        .get(path)
        .and_then(|item| item.get("parameters"))
        .map_or_else(
            || Ok(Vec::new()),
            |raw| serde_json::from_value(raw.clone()).map_err(|e| e.to_string()),
        )
}

/// Builds the descriptor for one operation.
///
/// Parameters declared on the path item apply too, unless the operation
/// redeclares one with the same name and location.
///
/// # Errors
///
/// Returns [`Error::MalformedEntity`] if the operation cannot be
/// deserialized or has no operation id.
pub fn resolve_endpoint(
    document: &ApiDocument,
    path: &str,
    method: HttpMethod,
    raw: &Value,
    rest: &RestConfig,
) -> Result<EndpointDescriptor> {
    let malformed = |reason: String| Error::MalformedEntity {
        kind: EntityKind::Endpoint,
        name: format!("{method} {path}"),
        reason,
    };

    let operation: Operation =
        serde_json::from_value(raw.clone()).map_err(|e| malformed(e.to_string()))?;
    let raw_id = operation
        .operation_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| malformed("missing operationId".to_string()))?;
    let operation_id =
        Identifier::new(raw_id).strip_prefixes(rest.namespace_prefixes.as_slice());

    let shared = shared_parameters(document, path).map_err(&malformed)?;
    let inherited = shared.iter().filter(|common| {
        !operation
            .parameters
            .iter()
            .any(|p| p.name == common.name && p.location == common.location)
    });

    let mut parameters = Vec::with_capacity(shared.len() + operation.parameters.len());
    for parameter in inherited.chain(&operation.parameters) {
        match ParameterLocation::parse(&parameter.location) {
            Some(ParameterLocation::Body) => {
                parameters.extend(flatten_body(document, parameter));
            }
            Some(location) => {
                let category = parameter
                    .param_type
                    .as_deref()
                    .map_or(PrimitiveCategory::Composite, map_type);
                parameters.push(simple_parameter(parameter, location, category));
            }
            None => {
                warn!(
                    operation = %operation_id,
                    parameter = %parameter.name,
                    location = %parameter.location,
                    "Unsupported parameter location, skipped"
                );
            }
        }
    }

    let mut responses = Vec::with_capacity(operation.responses.len());
    for (key, response) in &operation.responses {
        let Some(code) = StatusCode::parse(key) else {
            warn!(operation = %operation_id, code = %key, "Unrecognized response code, skipped");
            continue;
        };
        let (schema_ref, category) = response.schema.as_ref().map_or(
            (None, PrimitiveCategory::Composite),
            |schema| {
                (
                    schema_ref(document, schema),
                    schema_category(document, schema),
                )
            },
        );
        responses.push(ResponseDescriptor {
            code,
            description: response.description.clone(),
            has_schema: response.schema.is_some(),
            schema_ref,
            category,
        });
    }

    let session = Identifier::new(&rest.session_definition);
    let mut success = responses.iter().filter(|r| r.code.is_success());
    let returns_session = success
        .clone()
        .any(|r| r.schema_ref.as_ref() == Some(&session));
    let has_schema_info = success.any(|r| r.has_schema);
    let is_authentication_method = returns_session
        || (!has_schema_info
            && operation_id.contains(&normalize(&rest.authenticate_token)));

    let summary = operation
        .summary
        .or(operation.description)
        .unwrap_or_default();

    debug!(
        operation = %operation_id,
        method = %method,
        path,
        parameters = parameters.len(),
        authentication = is_authentication_method,
        "Resolved endpoint"
    );

    Ok(EndpointDescriptor {
        operation_id,
        http_method: method,
        path: path.to_string(),
        summary,
        parameters,
        is_authentication_method,
        returns_session,
        responses,
    })
}

/// Builds the descriptor for one definition.
#[must_use]
pub fn resolve_definition(
    document: &ApiDocument,
    name: &str,
    schema: &Schema,
) -> DefinitionDescriptor {
    let properties = schema
        .properties
        .iter()
        .map(|(property_name, property)| {
            let category = schema_category(document, property);
            PropertyDescriptor {
                name: property_name.clone(),
                arg_name: to_lua_arg_name(property_name, category),
                category,
                description: describe(property),
                schema_ref: schema_ref(document, property),
            }
        })
        .collect();

    let enum_values = schema
        .enum_values
        .iter()
        .map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect();

    DefinitionDescriptor {
        name: Identifier::new(name),
        raw_name: name.to_string(),
        description: describe(schema),
        properties,
        enum_values,
    }
}

/// Resolves every endpoint and definition of `document`.
///
/// Malformed operations and rejected definitions are recorded as skips.
///
/// # Errors
///
/// Only fatal errors propagate; entity errors never abort resolution.
pub fn resolve_document(document: &ApiDocument, rest: &RestConfig) -> Result<ResolvedApi> {
    let mut resolved = ResolvedApi::default();

    for (path, item) in document.paths() {
        for (key, raw) in item {
            let Some(method) = HttpMethod::parse(key) else {
                debug!(path = %path, key = %key, "Ignoring non-operation path item key");
                continue;
            };
            match resolve_endpoint(document, path, method, raw, rest) {
                Ok(endpoint) => resolved.endpoints.push(endpoint),
                Err(e) if e.is_entity_error() => {
                    warn!(error = %e, "Skipping endpoint");
                    resolved.skipped.push(SkippedEntity::new(
                        EntityKind::Endpoint,
                        format!("{method} {path}"),
                        e.to_string(),
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }

    for (name, reason) in document.rejected_definitions() {
        resolved.skipped.push(SkippedEntity::new(
            EntityKind::Definition,
            name.clone(),
            reason.clone(),
        ));
    }

    resolved.definitions = document
        .definitions()
        .iter()
        .map(|(name, schema)| resolve_definition(document, name, schema))
        .collect();

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    const API: &str = r##"{
        "info": { "title": "Nakama API v2", "version": "2.0" },
        "paths": {
            "/v2/account/authenticate/device": {
                "post": {
                    "summary": "Authenticate a user with a device id against the server.",
                    "operationId": "Nakama_AuthenticateDevice",
                    "responses": {
                        "200": { "description": "A successful response.", "schema": { "$ref": "#/definitions/apiSession" } },
                        "default": { "description": "An unexpected error response.", "schema": { "$ref": "#/definitions/rpcStatus" } }
                    },
                    "parameters": [
                        {
                            "name": "account",
                            "description": "The device account details.",
                            "in": "body",
                            "required": true,
                            "schema": { "$ref": "#/definitions/apiAccountDevice" }
                        },
                        { "name": "create", "in": "query", "required": false, "type": "boolean" },
                        { "name": "username", "in": "query", "required": false, "type": "string" }
                    ]
                }
            },
            "/v2/group/{groupId}": {
                "parameters": [],
                "delete": {
                    "operationId": "Nakama_DeleteGroup",
                    "responses": { "200": { "description": "A successful response.", "schema": { "type": "object" } } },
                    "parameters": [
                        { "name": "groupId", "in": "path", "required": true, "type": "string" },
                        { "name": "X-Trace", "in": "header", "type": "string" }
                    ]
                },
                "put": {
                    "summary": "no operation id",
                    "responses": {}
                }
            },
            "/v2/rpc/{id}": {
                "post": {
                    "operationId": "Nakama_RpcFunc",
                    "responses": { "200": { "description": "ok", "schema": { "$ref": "#/definitions/apiRpc" } } },
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "type": "string" },
                        { "name": "payload", "in": "body", "required": true, "schema": { "type": "string" } }
                    ]
                }
            },
            "/v2/satori/authenticate": {
                "post": {
                    "operationId": "Satori_Authenticate",
                    "responses": { "200": { "description": "ok" }, "2XX": { "description": "bad key" } },
                    "parameters": [
                        { "name": "body", "in": "body", "required": true, "schema": { "$ref": "#/definitions/Missing" } }
                    ]
                }
            }
        },
        "definitions": {
            "apiAccountDevice": {
                "type": "object",
                "properties": {
                    "id": { "type": "string", "description": "A device identifier." },
                    "vars": { "type": "object", "additionalProperties": { "type": "string" } }
                },
                "required": ["id"]
            },
            "apiSession": {
                "type": "object",
                "properties": {
                    "created": { "type": "boolean" },
                    "token": { "type": "string" },
                    "refresh_token": { "type": "string" }
                }
            },
            "apiRpc": { "type": "object", "properties": { "payload": { "type": "string" } } },
            "ValidatedPurchaseStore": {
                "type": "string",
                "enum": ["APPLE_APP_STORE", "GOOGLE_PLAY_STORE"],
                "default": "APPLE_APP_STORE"
            },
            "apiPurchase": {
                "type": "object",
                "properties": {
                    "store": { "$ref": "#/definitions/ValidatedPurchaseStore" },
                    "items": { "type": "array", "items": { "$ref": "#/definitions/apiRpc" } },
                    "@type": { "type": "string" }
                }
            },
            "rpcStatus": { "type": "object", "properties": { "code": { "type": "integer", "format": "int32" } } }
        }
    }"##;

    fn resolved() -> ResolvedApi {
        let document = ApiDocument::from_json(API, "api.json").unwrap();
        resolve_document(&document, &RestConfig::default()).unwrap()
    }

    fn endpoint<'a>(resolved: &'a ResolvedApi, id: &str) -> &'a EndpointDescriptor {
        resolved
            .endpoints
            .iter()
            .find(|e| e.operation_id.as_str() == id)
            .unwrap()
    }

    // ========================================================================
    // Endpoints
    // ========================================================================

    #[test]
    fn test_prefix_stripped_and_order_kept() {
        let resolved = resolved();
        let ids: Vec<_> = resolved
            .endpoints
            .iter()
            .map(|e| e.operation_id.as_str())
            .collect();
        assert_eq!(ids, ["authenticate_device", "delete_group", "rpc_func", "authenticate"]);
    }

    #[test]
    fn test_body_object_is_flattened() {
        let resolved = resolved();
        let auth = endpoint(&resolved, "authenticate_device");

        let body: Vec<_> = auth.parameters_in(ParameterLocation::Body).collect();
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].name, "id");
        assert_eq!(body[0].arg_name, "id_string");
        assert!(body[0].required);
        assert_eq!(body[0].description, "A device identifier.");
        assert_eq!(body[1].name, "vars");
        assert_eq!(body[1].category, PrimitiveCategory::Composite);
        assert!(!body[1].required);
        assert_eq!(body[1].description, "The device account details.");
        assert!(body.iter().all(|p| p.flattened_from.as_deref() == Some("account")));
        assert!(auth.has_query_parameters());
        assert!(!auth.has_path_parameters());
    }

    #[test]
    fn test_non_object_body_kept_as_single_parameter() {
        let resolved = resolved();
        let rpc = endpoint(&resolved, "rpc_func");
        let body: Vec<_> = rpc.parameters_in(ParameterLocation::Body).collect();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].name, "payload");
        assert_eq!(body[0].category, PrimitiveCategory::String);
        assert!(body[0].flattened_from.is_none());
    }

    #[test]
    fn test_dangling_body_reference_is_composite() {
        let resolved = resolved();
        let satori = endpoint(&resolved, "authenticate");
        assert_eq!(satori.parameters.len(), 1);
        assert_eq!(satori.parameters[0].category, PrimitiveCategory::Composite);
    }

    #[test]
    fn test_header_parameter_skipped() {
        let resolved = resolved();
        let delete = endpoint(&resolved, "delete_group");
        assert_eq!(delete.parameters.len(), 1);
        assert_eq!(delete.parameters[0].location, ParameterLocation::Path);
        assert_eq!(delete.http_method, HttpMethod::Delete);
    }

    #[test]
    fn test_missing_operation_id_skipped() {
        let resolved = resolved();
        assert_eq!(resolved.skipped.len(), 1);
        assert_eq!(resolved.skipped[0].kind, EntityKind::Endpoint);
        assert_eq!(resolved.skipped[0].name, "PUT /v2/group/{groupId}");
    }

    // ========================================================================
    // Authentication detection
    // ========================================================================

    #[test]
    fn test_auth_by_session_shape() {
        let resolved = resolved();
        assert!(endpoint(&resolved, "authenticate_device").is_authentication_method);
        assert!(!endpoint(&resolved, "rpc_func").is_authentication_method);
    }

    #[test]
    fn test_auth_by_name_without_schema_info() {
        let resolved = resolved();
        let satori = endpoint(&resolved, "authenticate");
        assert!(satori.is_authentication_method);
        assert_eq!(satori.responses.len(), 1);
    }

    #[test]
    fn test_name_token_ignored_when_schema_present() {
        let json = r##"{
            "paths": { "/x": { "get": {
                "operationId": "AuthenticateStatus",
                "responses": { "200": { "description": "", "schema": { "$ref": "#/definitions/apiStatus" } } }
            } } },
            "definitions": { "apiStatus": { "type": "object", "properties": { "ok": { "type": "boolean" } } } }
        }"##;
        let document = ApiDocument::from_json(json, "x").unwrap();
        let resolved = resolve_document(&document, &RestConfig::default()).unwrap();
        assert!(!resolved.endpoints[0].is_authentication_method);
    }

    #[test]
    fn test_inline_success_schema_blocks_name_token() {
        let json = r#"{
            "paths": { "/v1/authenticate/logout": { "post": {
                "operationId": "Satori_AuthenticateLogout",
                "responses": { "200": { "description": "", "schema": { "type": "object", "properties": {} } } }
            } } }
        }"#;
        let document = ApiDocument::from_json(json, "x").unwrap();
        let resolved = resolve_document(&document, &RestConfig::default()).unwrap();
        let logout = &resolved.endpoints[0];
        assert_eq!(logout.operation_id.as_str(), "authenticate_logout");
        assert!(!logout.is_authentication_method);
        assert!(!logout.returns_session);
        assert!(logout.responses[0].has_schema);
        assert!(logout.responses[0].schema_ref.is_none());
    }

    #[test]
    fn test_authenticate_token_is_normalized() {
        let json = r#"{
            "paths": { "/v2/login": { "post": {
                "operationId": "Nakama_LoginEmail",
                "responses": { "200": { "description": "" } }
            } } }
        }"#;
        let document = ApiDocument::from_json(json, "x").unwrap();
        let rest = RestConfig {
            authenticate_token: "Login".to_string(),
            ..RestConfig::default()
        };
        let resolved = resolve_document(&document, &rest).unwrap();
        assert!(resolved.endpoints[0].is_authentication_method);
    }

    #[test]
    fn test_session_response_sets_returns_session() {
        let resolved = resolved();
        assert!(endpoint(&resolved, "authenticate_device").returns_session);
        assert!(!endpoint(&resolved, "authenticate").returns_session);
        assert!(!endpoint(&resolved, "rpc_func").returns_session);
    }

    #[test]
    fn test_path_item_parameters_are_inherited() {
        let json = r#"{
            "paths": { "/v2/user/{userId}/group/{groupId}": {
                "parameters": [
                    { "name": "userId", "in": "path", "required": true, "type": "string" },
                    { "name": "limit", "in": "query", "type": "string" }
                ],
                "get": {
                    "operationId": "Nakama_ListUserGroup",
                    "responses": {},
                    "parameters": [
                        { "name": "groupId", "in": "path", "required": true, "type": "string" },
                        { "name": "limit", "in": "query", "type": "integer" }
                    ]
                }
            } }
        }"#;
        let document = ApiDocument::from_json(json, "x").unwrap();
        let resolved = resolve_document(&document, &RestConfig::default()).unwrap();
        let list = &resolved.endpoints[0];

        let names: Vec<_> = list.ordered_parameters().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["userId", "groupId", "limit"]);
        let limit = list.parameters_in(ParameterLocation::Query).next().unwrap();
        assert_eq!(limit.category, PrimitiveCategory::Number);
    }

    #[test]
    fn test_malformed_path_item_parameters_skip_endpoint() {
        let json = r#"{
            "paths": { "/v2/x": {
                "parameters": [ { "in": "query" } ],
                "get": { "operationId": "GetX", "responses": {} }
            } }
        }"#;
        let document = ApiDocument::from_json(json, "x").unwrap();
        let resolved = resolve_document(&document, &RestConfig::default()).unwrap();
        assert!(resolved.endpoints.is_empty());
        assert_eq!(resolved.skipped[0].name, "GET /v2/x");
    }

    #[test]
    fn test_default_response_preserved() {
        let resolved = resolved();
        let auth = endpoint(&resolved, "authenticate_device");
        let default = auth.response(StatusCode::Default).unwrap();
        assert_eq!(default.schema_ref.as_ref().map(Identifier::as_str), Some("rpc_status"));
    }

    // ========================================================================
    // Definitions
    // ========================================================================

    #[test]
    fn test_definitions_in_order_with_enums() {
        let resolved = resolved();
        let names: Vec<_> = resolved.definitions.iter().map(|d| d.raw_name.as_str()).collect();
        assert_eq!(
            names,
            ["apiAccountDevice", "apiSession", "apiRpc", "ValidatedPurchaseStore", "apiPurchase", "rpcStatus"]
        );
        let store = &resolved.definitions[3];
        assert!(store.has_enum());
        assert_eq!(store.enum_values, ["APPLE_APP_STORE", "GOOGLE_PLAY_STORE"]);
    }

    #[test]
    fn test_enum_reference_maps_to_string() {
        let resolved = resolved();
        let purchase = &resolved.definitions[4];
        assert_eq!(purchase.properties[0].category, PrimitiveCategory::String);
        assert_eq!(purchase.properties[1].category, PrimitiveCategory::Composite);
        assert_eq!(
            purchase.properties[1].schema_ref.as_ref().map(Identifier::as_str),
            Some("api_rpc")
        );
        assert_eq!(purchase.properties[2].arg_name, "type_string");
    }

    #[test]
    fn test_resolve_ref_passthrough() {
        assert_eq!(resolve_ref("apiSession"), "apiSession");
    }
}
