//! Wire type to primitive category mapping.
//!
//! One static table covers protobuf scalars, protobuf well-known wrapper
//! types and JSON schema primitive types. Everything else is composite.
//!
//! # Examples
//!
//! ```
//! use stubgen_codegen::type_map::map_type;
//! use stubgen_core::PrimitiveCategory;
//!
//! assert_eq!(map_type("int32"), PrimitiveCategory::Number);
//! assert_eq!(map_type("google.protobuf.BoolValue"), PrimitiveCategory::Boolean);
//! assert_eq!(map_type("MatchmakerUser"), PrimitiveCategory::Composite);
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;
use stubgen_core::PrimitiveCategory;

use PrimitiveCategory::{Boolean, Number, String as Text};

static WIRE_TYPES: LazyLock<HashMap<&'static str, PrimitiveCategory>> = LazyLock::new(|| {
    [
        // protobuf scalars
        ("int32", Number),
        ("int64", Number),
        ("uint32", Number),
        ("uint64", Number),
        ("sint32", Number),
        ("sint64", Number),
        ("fixed32", Number),
        ("fixed64", Number),
        ("sfixed32", Number),
        ("sfixed64", Number),
        ("double", Number),
        ("float", Number),
        ("string", Text),
        ("bytes", Text),
        ("bool", Boolean),
        // protobuf wrappers
        ("google.protobuf.Int32Value", Number),
        ("google.protobuf.Int64Value", Number),
        ("google.protobuf.UInt32Value", Number),
        ("google.protobuf.UInt64Value", Number),
        ("google.protobuf.DoubleValue", Number),
        ("google.protobuf.FloatValue", Number),
        ("google.protobuf.StringValue", Text),
        ("google.protobuf.BytesValue", Text),
        ("google.protobuf.BoolValue", Boolean),
        // JSON schema
        ("integer", Number),
        ("number", Number),
        ("boolean", Boolean),
    ]
    .into_iter()
    .collect()
});

/// Maps a wire type name to its primitive category.
///
/// Fully qualified protobuf names with a leading `.` are accepted. Unknown
/// types, nested messages, `map` and structured JSON types map to
/// [`PrimitiveCategory::Composite`].
#[must_use]
pub fn map_type(wire_type: &str) -> PrimitiveCategory {
    let key = wire_type.trim().trim_start_matches('.');
    WIRE_TYPES
        .get(key)
        .copied()
        .unwrap_or(PrimitiveCategory::Composite)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protobuf_scalars() {
        assert_eq!(map_type("int64"), Number);
        assert_eq!(map_type("double"), Number);
        assert_eq!(map_type("string"), Text);
        assert_eq!(map_type("bytes"), Text);
        assert_eq!(map_type("bool"), Boolean);
    }

    #[test]
    fn test_wrappers() {
        assert_eq!(map_type("google.protobuf.Int32Value"), Number);
        assert_eq!(map_type("google.protobuf.StringValue"), Text);
        assert_eq!(map_type(".google.protobuf.BoolValue"), Boolean);
    }

    #[test]
    fn test_json_schema_types() {
        assert_eq!(map_type("integer"), Number);
        assert_eq!(map_type("boolean"), Boolean);
        assert_eq!(map_type("object"), PrimitiveCategory::Composite);
        assert_eq!(map_type("array"), PrimitiveCategory::Composite);
    }

    #[test]
    fn test_unknown_falls_back_to_composite() {
        assert_eq!(map_type("map"), PrimitiveCategory::Composite);
        assert_eq!(map_type("StatusPresenceEvent"), PrimitiveCategory::Composite);
        assert_eq!(map_type("google.protobuf.Timestamp"), PrimitiveCategory::Composite);
        assert_eq!(map_type(""), PrimitiveCategory::Composite);
    }
}
