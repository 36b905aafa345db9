//! Naming helpers shared across the crate

use convert_case::{Case, Casing};
use serde_json::Value;

/// Convert a string to camelCase
pub fn to_camel_case(s: &str) -> String {
    s.to_case(Case::Camel)
}

/// Convert a string to kebab-case
pub fn to_kebab_case(s: &str) -> String {
    s.to_case(Case::Kebab)
}

/// Form field name for a (possibly prefixed) property name.
///
/// Every dot separated segment is camel-cased on its own so that prefixed
/// properties keep their `<original>.<referenced>` shape.
pub fn to_field_name(property_name: &str) -> String {
    property_name
        .split('.')
        .map(to_camel_case)
        .collect::<Vec<_>>()
        .join(".")
}

/// Display text of an enum literal.
pub fn literal_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
