//! Identifier naming conventions.
//!
//! Every generated identifier goes through [`normalize`], which turns mixed
//! or camel case schema names into lower snake case.
//!
//! # Examples
//!
//! ```
//! use stubgen_core::naming::{normalize, to_constant_case};
//!
//! assert_eq!(normalize("ChannelMessageSend"), "channel_message_send");
//! assert_eq!(to_constant_case("apiStoreProvider"), "API_STORE_PROVIDER");
//! ```

use crate::types::PrimitiveCategory;

const SEPARATOR: char = '_';

/// Converts an identifier to lower snake case.
///
/// A separator is inserted before every uppercase letter that is not the
/// first character, unless the previous output character already is a
/// separator. Runs of separators collapse into one.
///
/// The conversion is pure and idempotent:
/// `normalize(&normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```
/// use stubgen_core::naming::normalize;
///
/// assert_eq!(normalize("ChannelMessageSend"), "channel_message_send");
/// assert_eq!(normalize("Nakama_AuthenticateDevice"), "nakama_authenticate_device");
/// assert_eq!(normalize("apiSession"), "api_session");
/// assert_eq!(normalize("already_snake"), "already_snake");
/// ```
#[must_use]
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    for (index, ch) in name.chars().enumerate() {
        if ch == SEPARATOR {
            if !out.ends_with(SEPARATOR) {
                out.push(SEPARATOR);
            }
            continue;
        }
        if ch.is_uppercase() && index > 0 && !out.ends_with(SEPARATOR) {
            out.push(SEPARATOR);
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Converts an identifier to upper snake case for constant prefixes.
///
/// # Examples
///
/// ```
/// use stubgen_core::naming::to_constant_case;
///
/// assert_eq!(to_constant_case("ValidatedPurchaseStore"), "VALIDATED_PURCHASE_STORE");
/// ```
#[must_use]
pub fn to_constant_case(name: &str) -> String {
    normalize(name).to_uppercase()
}

/// Builds the local variable name used for a REST argument.
///
/// Characters that cannot appear in a Lua identifier (such as `@`) are
/// dropped, the rest is normalized, and the Lua type is appended. The type
/// suffix keeps arguments from shadowing Lua globals such as `type`, which
/// the generated asserts call.
///
/// # Examples
///
/// ```
/// use stubgen_core::PrimitiveCategory;
/// use stubgen_core::naming::to_lua_arg_name;
///
/// assert_eq!(to_lua_arg_name("@type", PrimitiveCategory::String), "type_string");
/// assert_eq!(to_lua_arg_name("userIds", PrimitiveCategory::Composite), "user_ids_table");
/// ```
#[must_use]
pub fn to_lua_arg_name(name: &str, category: PrimitiveCategory) -> String {
    let cleaned: String = name
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == SEPARATOR)
        .collect();
    let mut base = normalize(&cleaned);
    if base.is_empty() {
        base.push_str("arg");
    } else if base.starts_with(|ch: char| ch.is_ascii_digit()) {
        base.insert(0, SEPARATOR);
    }
    format!("{base}{SEPARATOR}{}", category.lua_type())
}

/// Turns a multi-line description into a Lua comment continuation.
///
/// Every line after the first is prefixed with `-- ` so the text stays inside
/// the comment block it is emitted into.
///
/// # Examples
///
/// ```
/// use stubgen_core::naming::lua_comment;
///
/// assert_eq!(lua_comment("first\nsecond"), "first\n-- second");
/// ```
#[must_use]
pub fn lua_comment(text: &str) -> String {
    text.trim_end().replace("\r\n", "\n").replace('\n', "\n-- ")
}
