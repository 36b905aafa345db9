//! Columns of table fields
//!
//! A table field lists the properties of the definition its array items
//! reference. Only properties with a column compatible type become columns;
//! rule supplied extra columns are appended as-is before sorting.

use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::error::ScaffoldError;
use crate::field_type::{ColumnType, resolve_field_type};
use crate::form::FormContext;
use crate::locale::LocaleKey;
use crate::rules::{DEFAULT_COLUMN_ORDER, FieldRule};

/// One value of an `enum` column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnValue {
    pub text: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub title: String,
    pub name: String,
    pub column_type: Option<ColumnType>,
    pub calculate_sum: Option<bool>,
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub step: Option<Number>,
    pub values: Option<Vec<ColumnValue>>,
    /// Rule supplied attributes, laid over the generated ones
    pub extra: Map<String, Value>,
    /// Sort key, never emitted
    pub order: f64,
}

impl Column {
    pub fn new(title: String, name: impl Into<String>) -> Self {
        Self {
            title,
            name: name.into(),
            column_type: None,
            calculate_sum: None,
            min: None,
            max: None,
            step: None,
            values: None,
            extra: Map::new(),
            order: DEFAULT_COLUMN_ORDER,
        }
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("title".into(), Value::String(self.title.clone()));
        object.insert("name".into(), Value::String(self.name.clone()));
        if let Some(column_type) = self.column_type {
            object.insert("type".into(), Value::String(column_type.as_str().into()));
        }
        if let Some(calculate_sum) = self.calculate_sum {
            object.insert("calculate-sum".into(), Value::Bool(calculate_sum));
        }
        for (key, bound) in [("min", &self.min), ("max", &self.max), ("step", &self.step)] {
            if let Some(bound) = bound {
                object.insert(key.into(), Value::Number(bound.clone()));
            }
        }
        if let Some(values) = &self.values {
            let values = values
                .iter()
                .map(|value| {
                    let mut entry = Map::new();
                    entry.insert("text".into(), Value::String(value.text.clone()));
                    entry.insert("value".into(), value.value.clone());
                    Value::Object(entry)
                })
                .collect();
            object.insert("values".into(), Value::Array(values));
        }
        for (key, value) in &self.extra {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Build the ordered columns of the table field stored under `field_key`.
pub(crate) fn build_columns(
    ctx: &mut FormContext<'_>,
    field_key: &LocaleKey,
    property_name: &str,
    reference: &str,
    rule: Option<&FieldRule>,
) -> Result<Vec<Column>, ScaffoldError> {
    let schema = ctx.schema;
    let referenced = schema.resolve_reference(ctx.definition_name, property_name, reference)?;

    if let Some(rule) = rule {
        for name in rule.columns.keys() {
            if !referenced.contains_key(name) {
                warn!(
                    "column rule `{name}` of {}.{property_name} matches no property of {reference}",
                    ctx.definition_name
                );
            }
        }
    }

    let mut columns = Vec::new();

    for (referenced_name, referenced_property) in referenced {
        let Some(inferred) =
            resolve_field_type(referenced_property).and_then(ColumnType::from_field_type)
        else {
            continue;
        };
        let column_rule = rule.and_then(|rule| rule.columns.get(referenced_name));
        if column_rule.is_some_and(|rule| rule.skip) {
            continue;
        }

        let key = field_key.child(referenced_name);
        let text = referenced_property
            .description
            .clone()
            .unwrap_or_else(|| referenced_name.clone());
        let mut column = Column::new(ctx.locales.register(&key, text), referenced_name.as_str());
        column.column_type = Some(
            column_rule
                .and_then(|rule| rule.column_type)
                .unwrap_or(inferred),
        );

        if let Some(column_rule) = column_rule {
            column.calculate_sum = column_rule.calculate_sum;
            column.min = column_rule.min.clone();
            column.max = column_rule.max.clone();
            column.step = column_rule.step.clone();
            column.order = column_rule.order.unwrap_or(DEFAULT_COLUMN_ORDER);
            column.extra = column_rule.extra.clone();
            if let Some(order) = take_order(&mut column.extra) {
                column.order = order;
            }
        }

        if inferred == ColumnType::Enum {
            let literals = referenced_property.enum_values.as_deref().unwrap_or_default();
            let values = ctx
                .locales
                .register_literals(&key, literals)
                .into_iter()
                .map(|(text, value)| ColumnValue { text, value })
                .collect();
            column.values = Some(values);
        }

        columns.push(column);
    }

    if let Some(rule) = rule {
        for (name, attributes) in &rule.extra_columns {
            columns.push(extra_column(ctx, field_key, name, attributes));
        }
    }

    // stable: ties keep declaration order
    columns.sort_by(|a, b| a.order.total_cmp(&b.order));
    Ok(columns)
}

/// A literal column from the `extra-columns` of a field rule.
fn extra_column(
    ctx: &mut FormContext<'_>,
    field_key: &LocaleKey,
    name: &str,
    attributes: &Map<String, Value>,
) -> Column {
    let key = field_key.child(name);
    let title = if attributes.contains_key("title") {
        key.reference()
    } else {
        ctx.locales.register(&key, name)
    };

    let mut column = Column::new(title, name);
    column.extra = attributes.clone();
    column.order = take_order(&mut column.extra).unwrap_or(DEFAULT_COLUMN_ORDER);
    column
}

/// Remove a literal `order` attribute, returning it when it is numeric.
fn take_order(attributes: &mut Map<String, Value>) -> Option<f64> {
    let order = attributes.shift_remove("order")?;
    if !order.is_number() {
        warn!("ignoring non-numeric column order {order}");
    }
    order.as_f64()
}
