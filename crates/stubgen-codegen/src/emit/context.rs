//! Template contexts.
//!
//! Every value a template prints is computed here, so templates only need
//! plain field access, `#if` and `#each`.

use crate::descriptors::{
    DefinitionDescriptor, EndpointDescriptor, EventDescriptor, MessageDescriptor,
    ParameterDescriptor, ParameterLocation,
};
use serde::Serialize;
use stubgen_core::naming::{lua_comment, to_constant_case};

/// One message field as a sender argument.
#[derive(Debug, Clone, Serialize)]
pub struct FieldContext {
    /// Field name, used as argument and payload key
    pub name: String,
    /// Lua type checked by the sender
    pub lua_type: &'static str,
}

/// Context of the `realtime/message` template.
#[derive(Debug, Clone, Serialize)]
pub struct MessageContext {
    /// Generated function name
    pub function_name: String,
    /// Payload key of the message
    pub message_key: String,
    /// Full argument list
    pub signature: String,
    /// Fields in declaration order
    pub fields: Vec<FieldContext>,
    /// Whether a correlation id is allocated
    pub expects_response: bool,
}

impl From<&MessageDescriptor> for MessageContext {
    fn from(message: &MessageDescriptor) -> Self {
        let fields: Vec<FieldContext> = message
            .fields()
            .iter()
            .map(|field| FieldContext {
                name: field.name.clone(),
                lua_type: field.category().lua_type(),
            })
            .collect();

        let signature = std::iter::once("socket")
            .chain(fields.iter().map(|f| f.name.as_str()))
            .chain(std::iter::once("callback"))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            function_name: message.key().to_string(),
            message_key: message.key().to_string(),
            signature,
            fields,
            expects_response: message.expects_response(),
        }
    }
}

/// Context of the `realtime/event` template.
#[derive(Debug, Clone, Serialize)]
pub struct EventContext {
    /// Generated function name, `on_<event>`
    pub function_name: String,
    /// Handler registry key
    pub event_key: String,
}

impl From<&EventDescriptor> for EventContext {
    fn from(event: &EventDescriptor) -> Self {
        Self {
            function_name: event.hook_name(),
            event_key: event.key().to_string(),
        }
    }
}

/// Context of the `realtime/socket` template.
#[derive(Debug, Clone, Serialize)]
pub struct SocketContext {
    /// Rendered message senders
    pub messages: String,
    /// Subscriber names listed in the events index comment
    pub event_index: Vec<String>,
    /// Rendered event subscribers
    pub events: String,
}

/// One REST argument.
#[derive(Debug, Clone, Serialize)]
pub struct ArgContext {
    /// Wire name
    pub name: String,
    /// Lua argument name
    pub arg_name: String,
    /// Lua type
    pub lua_type: &'static str,
    /// Comment text
    pub description: String,
    /// Lua expression passed to `assert`
    pub assertion: String,
    /// Human readable form of the assertion
    pub expectation: String,
    /// Lua pattern matching the path placeholder
    pub placeholder: String,
}

impl From<&ParameterDescriptor> for ArgContext {
    fn from(parameter: &ParameterDescriptor) -> Self {
        let lua_type = parameter.category.lua_type();
        let arg = &parameter.arg_name;
        let (assertion, expectation) = if parameter.required {
            (
                format!("{arg} ~= nil and type({arg}) == \"{lua_type}\""),
                format!("of type '{lua_type}'"),
            )
        } else {
            (
                format!("{arg} == nil or type({arg}) == \"{lua_type}\""),
                format!("'nil' or of type '{lua_type}'"),
            )
        };

        Self {
            name: parameter.name.clone(),
            arg_name: parameter.arg_name.clone(),
            lua_type,
            description: lua_comment(&parameter.description),
            assertion,
            expectation,
            placeholder: lua_pattern_escape(&format!("{{{}}}", parameter.name)),
        }
    }
}

/// Context of the `rest/endpoint` template.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointContext {
    /// Generated function name
    pub function_name: String,
    /// Comment text
    pub summary: String,
    /// Upper case HTTP method
    pub method: &'static str,
    /// URL path template
    pub path: String,
    /// Full argument list
    pub signature: String,
    /// All arguments, path then query then body
    pub params: Vec<ArgContext>,
    /// Path arguments
    pub path_params: Vec<ArgContext>,
    /// Query arguments
    pub query_params: Vec<ArgContext>,
    /// Body arguments encoded as one table
    pub body_fields: Vec<ArgContext>,
    /// Whether `body_fields` is non-empty
    pub has_body_fields: bool,
    /// Argument encoded as the whole body
    pub body_value: Option<String>,
    /// Whether the call stores session credentials
    pub is_authentication_method: bool,
    /// Whether the result is wrapped in a session object
    pub returns_session: bool,
}

impl From<&EndpointDescriptor> for EndpointContext {
    fn from(endpoint: &EndpointDescriptor) -> Self {
        let params: Vec<ArgContext> = endpoint
            .ordered_parameters()
            .into_iter()
            .map(ArgContext::from)
            .collect();
        let in_location = |location: ParameterLocation| -> Vec<ArgContext> {
            endpoint.parameters_in(location).map(ArgContext::from).collect()
        };

        let body: Vec<&ParameterDescriptor> =
            endpoint.parameters_in(ParameterLocation::Body).collect();
        let (body_fields, body_value) = match body.as_slice() {
            [single] if single.flattened_from.is_none() => {
                (Vec::new(), Some(single.arg_name.clone()))
            }
            _ => (body.iter().copied().map(ArgContext::from).collect(), None),
        };

        let signature = std::iter::once("client")
            .chain(params.iter().map(|p| p.arg_name.as_str()))
            .chain(["callback", "retry_policy", "cancellation_token"])
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            function_name: endpoint.operation_id.to_string(),
            summary: lua_comment(&endpoint.summary),
            method: endpoint.http_method.as_str(),
            path: endpoint.path.clone(),
            signature,
            path_params: in_location(ParameterLocation::Path),
            query_params: in_location(ParameterLocation::Query),
            has_body_fields: !body_fields.is_empty(),
            body_fields,
            body_value,
            params,
            is_authentication_method: endpoint.is_authentication_method,
            returns_session: endpoint.returns_session,
        }
    }
}

/// One constructor property.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyContext {
    /// Table key
    pub name: String,
    /// Lua argument name
    pub arg_name: String,
    /// Lua type
    pub lua_type: &'static str,
    /// Comment text
    pub description: String,
}

/// Context of the `rest/definition` template.
#[derive(Debug, Clone, Serialize)]
pub struct DefinitionContext {
    /// Generated function name, `create_<definition>`
    pub function_name: String,
    /// Comment text
    pub description: String,
    /// Full argument list
    pub signature: String,
    /// Properties in declaration order
    pub properties: Vec<PropertyContext>,
}

impl From<&DefinitionDescriptor> for DefinitionContext {
    fn from(definition: &DefinitionDescriptor) -> Self {
        let properties: Vec<PropertyContext> = definition
            .properties
            .iter()
            .map(|property| PropertyContext {
                name: property.name.clone(),
                arg_name: property.arg_name.clone(),
                lua_type: property.category.lua_type(),
                description: lua_comment(&property.description),
            })
            .collect();
        let signature = properties
            .iter()
            .map(|p| p.arg_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            function_name: format!("create_{}", definition.name),
            description: lua_comment(&definition.description),
            signature,
            properties,
        }
    }
}

/// One enum constant.
#[derive(Debug, Clone, Serialize)]
pub struct ConstantContext {
    /// Constant name, `<NAME>_<VALUE>`
    pub constant: String,
    /// Escaped string value
    pub value: String,
}

/// Context of the `rest/enum` template.
#[derive(Debug, Clone, Serialize)]
pub struct EnumContext {
    /// Normalized definition name
    pub name: String,
    /// Comment text
    pub description: String,
    /// Constants in declaration order
    pub constants: Vec<ConstantContext>,
}

impl From<&DefinitionDescriptor> for EnumContext {
    fn from(definition: &DefinitionDescriptor) -> Self {
        let prefix = to_constant_case(&definition.raw_name);
        let constants = definition
            .enum_values
            .iter()
            .map(|value| {
                let suffix: String = value
                    .chars()
                    .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
                    .collect();
                ConstantContext {
                    constant: format!("{prefix}_{suffix}"),
                    value: lua_string_escape(value),
                }
            })
            .collect();

        Self {
            name: definition.name.to_string(),
            description: lua_comment(&definition.description),
            constants,
        }
    }
}

/// Context of the `rest/client` template.
#[derive(Debug, Clone, Serialize)]
pub struct ClientContext {
    /// API title
    pub title: String,
    /// API version
    pub version: String,
    /// Rendered enum constants
    pub enums: String,
    /// Rendered definition constructors
    pub objects: String,
    /// Rendered endpoint callers
    pub endpoints: String,
}

/// Escapes Lua pattern magic characters.
fn lua_pattern_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if "^$()%.[]*+-?".contains(ch) {
            out.push('%');
        }
        out.push(ch);
    }
    out
}

/// Escapes text for a double quoted Lua string.
fn lua_string_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::{FieldDescriptor, HttpMethod, PropertyDescriptor};
    use stubgen_core::{Identifier, PrimitiveCategory};

    fn parameter(
        name: &str,
        location: ParameterLocation,
        category: PrimitiveCategory,
        required: bool,
        flattened_from: Option<&str>,
    ) -> ParameterDescriptor {
        ParameterDescriptor {
            name: name.to_string(),
            arg_name: stubgen_core::naming::to_lua_arg_name(name, category),
            location,
            category,
            description: String::new(),
            required,
            flattened_from: flattened_from.map(str::to_string),
        }
    }

    fn endpoint(parameters: Vec<ParameterDescriptor>) -> EndpointDescriptor {
        EndpointDescriptor {
            operation_id: Identifier::new("WriteStorageObjects"),
            http_method: HttpMethod::Put,
            path: "/v2/storage/{collection}".to_string(),
            summary: "Write objects.\nSecond line.".to_string(),
            parameters,
            is_authentication_method: false,
            returns_session: false,
            responses: vec![],
        }
    }

    #[test]
    fn test_message_signature_keeps_field_order() {
        let message = MessageDescriptor::new(
            "ChannelJoin",
            vec![
                FieldDescriptor::new("target", "string", false),
                FieldDescriptor::new("type", "int32", false),
            ],
        );
        let context = MessageContext::from(&message);
        assert_eq!(context.signature, "socket, target, type, callback");
        assert_eq!(context.fields[1].lua_type, "number");
    }

    #[test]
    fn test_endpoint_signature_order() {
        let endpoint = endpoint(vec![
            parameter("objects", ParameterLocation::Body, PrimitiveCategory::Composite, true, Some("body")),
            parameter("collection", ParameterLocation::Path, PrimitiveCategory::String, true, None),
            parameter("limit", ParameterLocation::Query, PrimitiveCategory::Number, false, None),
        ]);
        let context = EndpointContext::from(&endpoint);
        assert_eq!(
            context.signature,
            "client, collection_string, limit_number, objects_table, callback, retry_policy, cancellation_token"
        );
        assert_eq!(context.summary, "Write objects.\n-- Second line.");
        assert!(context.has_body_fields);
        assert!(context.body_value.is_none());
        assert_eq!(context.path_params[0].placeholder, "{collection}");
    }

    #[test]
    fn test_single_unflattened_body_is_value() {
        let endpoint = endpoint(vec![parameter(
            "payload",
            ParameterLocation::Body,
            PrimitiveCategory::String,
            true,
            None,
        )]);
        let context = EndpointContext::from(&endpoint);
        assert_eq!(context.body_value.as_deref(), Some("payload_string"));
        assert!(!context.has_body_fields);
    }

    #[test]
    fn test_required_and_optional_assertions() {
        let required = ArgContext::from(&parameter(
            "id", ParameterLocation::Path, PrimitiveCategory::String, true, None,
        ));
        assert_eq!(required.assertion, "id_string ~= nil and type(id_string) == \"string\"");

        let optional = ArgContext::from(&parameter(
            "create", ParameterLocation::Query, PrimitiveCategory::Boolean, false, None,
        ));
        assert_eq!(optional.assertion, "create_boolean == nil or type(create_boolean) == \"boolean\"");
        assert_eq!(optional.expectation, "'nil' or of type 'boolean'");
    }

    #[test]
    fn test_enum_constants() {
        let definition = DefinitionDescriptor {
            name: Identifier::new("ValidatedPurchaseStore"),
            raw_name: "ValidatedPurchaseStore".to_string(),
            description: String::new(),
            properties: vec![],
            enum_values: vec!["APPLE_APP_STORE".to_string(), "weird-value".to_string()],
        };
        let context = EnumContext::from(&definition);
        assert_eq!(context.constants[0].constant, "VALIDATED_PURCHASE_STORE_APPLE_APP_STORE");
        assert_eq!(context.constants[1].constant, "VALIDATED_PURCHASE_STORE_weird_value");
    }

    #[test]
    fn test_definition_signature() {
        let definition = DefinitionDescriptor {
            name: Identifier::new("apiSession"),
            raw_name: "apiSession".to_string(),
            description: String::new(),
            properties: vec![PropertyDescriptor {
                name: "token".to_string(),
                arg_name: "token_string".to_string(),
                category: PrimitiveCategory::String,
                description: String::new(),
                schema_ref: None,
            }],
            enum_values: vec![],
        };
        let context = DefinitionContext::from(&definition);
        assert_eq!(context.function_name, "create_api_session");
        assert_eq!(context.signature, "token_string");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(lua_pattern_escape("{account.id}"), "{account%.id}");
        assert_eq!(lua_string_escape("a\"b"), "a\\\"b");
    }
}
