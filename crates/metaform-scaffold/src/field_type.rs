//! Form field and table column types, and their inference from schema attributes

use serde::{Deserialize, Serialize};

use crate::schema::{Property, SchemaFormat, SchemaType};

/// Field types understood by the form renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Memo,
    Email,
    Url,
    Number,
    Boolean,
    Date,
    DateTime,
    Time,
    Select,
    Radio,
    Checklist,
    Autocomplete,
    Hidden,
    Html,
    SmallText,
    Files,
    Table,
    Submit,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Memo => "memo",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "date-time",
            FieldType::Time => "time",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checklist => "checklist",
            FieldType::Autocomplete => "autocomplete",
            FieldType::Hidden => "hidden",
            FieldType::Html => "html",
            FieldType::SmallText => "small-text",
            FieldType::Files => "files",
            FieldType::Table => "table",
            FieldType::Submit => "submit",
        }
    }

    /// Hidden fields carry neither a title nor a required flag.
    pub fn is_visible(self) -> bool {
        self != FieldType::Hidden
    }
}

/// Column types of a table field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Number,
    Enum,
    Date,
    Time,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Enum => "enum",
            ColumnType::Date => "date",
            ColumnType::Time => "time",
        }
    }

    /// Column counterpart of a field type; `select` becomes `enum`.
    ///
    /// Field types that cannot be shown in a table column yield `None`.
    pub fn from_field_type(field_type: FieldType) -> Option<Self> {
        match field_type {
            FieldType::Text => Some(ColumnType::Text),
            FieldType::Number => Some(ColumnType::Number),
            FieldType::Select => Some(ColumnType::Enum),
            FieldType::Date => Some(ColumnType::Date),
            FieldType::Time => Some(ColumnType::Time),
            _ => None,
        }
    }
}

/// Infer the field type of a property. First match wins:
///
/// 1. an `enum` makes a `select`
/// 2. `integer`/`number` with an `int32`, `int64` or `double` format make a `number`
/// 3. `string` without format makes `text`, with `date` / `date-time` the matching date type
/// 4. an `array` whose items reference a definition makes a `table`
///
/// Anything else has no field type.
pub fn resolve_field_type(property: &Property) -> Option<FieldType> {
    if property.enum_values.is_some() {
        return Some(FieldType::Select);
    }

    match (property.schema_type, property.format) {
        (
            Some(SchemaType::Integer | SchemaType::Number),
            Some(SchemaFormat::Int32 | SchemaFormat::Int64 | SchemaFormat::Double),
        ) => Some(FieldType::Number),
        (Some(SchemaType::String), None) => Some(FieldType::Text),
        (Some(SchemaType::String), Some(SchemaFormat::Date)) => Some(FieldType::Date),
        (Some(SchemaType::String), Some(SchemaFormat::DateTime)) => Some(FieldType::DateTime),
        (Some(SchemaType::Array), _) if property.items_reference().is_some() => {
            Some(FieldType::Table)
        }
        _ => None,
    }
}
