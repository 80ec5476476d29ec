// crates/hypergate-formats/src/values.rs
// ============================================================================
// Module: Value Helpers
// Description: Conversions from writer callback inputs to JSON values.
// Purpose: Share scalar and list rendering between formats.
// Dependencies: hypergate-core, serde_json
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use hypergate_core::FormField;
use hypergate_core::Identifier;
use hypergate_core::writer::FieldPath;
use serde_json::Number;
use serde_json::Value;

// ============================================================================
// SECTION: Conversions
// ============================================================================

/// Renders an identifier as a JSON number or string.
pub(crate) fn identifier_value(identifier: &Identifier) -> Value {
    match identifier {
        Identifier::Integer(value) => Value::from(*value),
        Identifier::Text(value) => Value::String(value.clone()),
    }
}

/// Renders strings as a JSON array.
pub(crate) fn string_array(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}

/// Renders booleans as a JSON array.
pub(crate) fn boolean_array(values: &[bool]) -> Value {
    Value::Array(values.iter().copied().map(Value::Bool).collect())
}

/// Renders numbers as a JSON array.
pub(crate) fn number_array(values: &[Number]) -> Value {
    Value::Array(values.iter().cloned().map(Value::Number).collect())
}

/// Renders one form field as `{name, kind, required}`.
pub(crate) fn form_field_value(field: &FormField) -> Value {
    serde_json::json!({
        "name": field.name,
        "kind": field.kind.as_str(),
        "required": field.required,
    })
}

/// Returns the location of `path` with one key per segment.
pub(crate) fn segment_location(path: &FieldPath) -> Vec<String> {
    path.segments().iter().map(|segment| segment.name().to_string()).collect()
}

/// Returns `location` extended by `keys`.
pub(crate) fn extend(location: &[String], keys: &[&str]) -> Vec<String> {
    location.iter().cloned().chain(keys.iter().map(|key| (*key).to_string())).collect()
}
