//! Form fields built from schema properties

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{trace, warn};

use crate::error::ScaffoldError;
use crate::field_type::{FieldType, resolve_field_type};
use crate::form::FormContext;
use crate::rules::FieldRule;
use crate::schema::Property;
use crate::table::{Column, build_columns};
use crate::utils::to_field_name;

/// One option of a `select` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub text: String,
    pub name: Value,
}

/// A generated form field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub title: Option<String>,
    pub required: Option<bool>,
    pub options: Option<Vec<SelectOption>>,
    pub columns: Option<Vec<Column>>,
    pub add_rows: bool,
    pub text: Option<String>,
    /// Rule supplied attributes, laid over the generated ones
    pub extra: Map<String, Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            title: None,
            required: None,
            options: None,
            columns: None,
            add_rows: false,
            text: None,
            extra: Map::new(),
        }
    }

    /// Trailing submit button of every form.
    pub fn submit(text: String) -> Self {
        Self {
            text: Some(text),
            ..Self::new("submit", FieldType::Submit)
        }
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("name".into(), Value::String(self.name.clone()));
        object.insert("type".into(), Value::String(self.field_type.as_str().into()));
        if let Some(title) = &self.title {
            object.insert("title".into(), Value::String(title.clone()));
        }
        if let Some(required) = self.required {
            object.insert("required".into(), Value::Bool(required));
        }
        if let Some(text) = &self.text {
            object.insert("text".into(), Value::String(text.clone()));
        }
        if let Some(options) = &self.options {
            let options = options
                .iter()
                .map(|option| {
                    let mut entry = Map::new();
                    entry.insert("text".into(), Value::String(option.text.clone()));
                    entry.insert("name".into(), option.name.clone());
                    Value::Object(entry)
                })
                .collect();
            object.insert("options".into(), Value::Array(options));
        }
        if let Some(columns) = &self.columns {
            object.insert(
                "columns".into(),
                Value::Array(columns.iter().map(Column::to_json).collect()),
            );
        }
        if self.add_rows {
            object.insert("addRows".into(), Value::Bool(true));
        }
        for (key, value) in &self.extra {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Build the field of one property.
///
/// Returns `Ok(None)` when the property is skipped by its rule or has no
/// field type.
pub(crate) fn build_field(
    ctx: &mut FormContext<'_>,
    property_name: &str,
    property: &Property,
    rule: Option<&FieldRule>,
) -> Result<Option<Field>, ScaffoldError> {
    if rule.is_some_and(|rule| rule.skip) {
        trace!("skipping {}.{property_name}", ctx.definition_name);
        return Ok(None);
    }

    let Some(field_type) = rule
        .and_then(|rule| rule.field_type)
        .or_else(|| resolve_field_type(property))
    else {
        trace!("no field type for {}.{property_name}", ctx.definition_name);
        return Ok(None);
    };

    let mut field = Field::new(to_field_name(property_name), field_type);
    let key = ctx.locales.root().child(&field.name);

    if field_type.is_visible() {
        let text = property
            .description
            .clone()
            .unwrap_or_else(|| property_name.to_string());
        field.title = Some(ctx.locales.register(&key, text));
        field.required = Some(ctx.definition.is_required(property_name));
    }

    match field_type {
        FieldType::Select => {
            let literals = property.enum_values.as_deref().unwrap_or_default();
            let options = ctx
                .locales
                .register_literals(&key, literals)
                .into_iter()
                .map(|(text, name)| SelectOption { text, name })
                .collect();
            field.options = Some(options);
        }
        FieldType::Table => {
            let columns = match property.items_reference() {
                Some(reference) => {
                    build_columns(ctx, &key, property_name, reference, rule)?
                }
                None => {
                    warn!(
                        "table field {}.{property_name} has no item reference",
                        ctx.definition_name
                    );
                    Vec::new()
                }
            };
            field.columns = Some(columns);
            field.add_rows = true;
        }
        _ => {}
    }

    if let Some(rule) = rule {
        field.extra = rule.extra.clone();
    }

    Ok(Some(field))
}
