//! Rule configuration and its resolution into one rule set per form
//!
//! Rules are kept as free-form documents until a (definition, operation) pair is
//! resolved: the layers that apply to the pair are deep merged first and only the
//! merged document is interpreted as a [`RuleSet`].

use std::fmt;

use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use tracing::warn;

use crate::error::ScaffoldError;
use crate::field_type::{ColumnType, FieldType};
use crate::merge::merge_layers;

/// Key matching every definition, or every operation of a definition.
pub const WILDCARD: &str = "*";

/// Top level key holding the rules of the prepare pass.
pub const PREPARE: &str = "prepare";

/// Default sort position of a table column.
pub const DEFAULT_COLUMN_ORDER: f64 = 100.0;

/// The two forms generated for every definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Update,
    Create,
}

impl Operation {
    /// Generation order.
    pub const ALL: [Operation; 2] = [Operation::Update, Operation::Create];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Update => "update",
            Operation::Create => "create",
        }
    }

    pub fn capitalized(self) -> &'static str {
        match self {
            Operation::Update => "Update",
            Operation::Create => "Create",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The complete rule configuration.
///
/// Every top level key except [`PREPARE`] names a definition (or [`WILDCARD`]).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleConfig {
    pub prepare: IndexMap<String, PrepareRules>,
    definitions: Map<String, Value>,
}

impl<'de> Deserialize<'de> for RuleConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut definitions = Option::<Map<String, Value>>::deserialize(deserializer)?
            .unwrap_or_default();
        let prepare: IndexMap<String, PrepareRules> = definitions
            .shift_remove(PREPARE)
            .map(serde_json::from_value)
            .transpose()
            .map_err(D::Error::custom)?
            .unwrap_or_default();
        Ok(RuleConfig {
            prepare,
            definitions,
        })
    }
}

impl RuleConfig {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Merged wildcard and definition specific rules.
    pub fn definition_rules(&self, definition: &str) -> DefinitionRules {
        DefinitionRules {
            definition: definition.to_string(),
            rules: merge_layers([
                self.definitions.get(WILDCARD),
                self.definitions.get(definition),
            ]),
        }
    }
}

/// Rules of the prepare pass for one definition.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PrepareRules {
    pub fields: IndexMap<String, PrepareFieldRule>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PrepareFieldRule {
    pub flatten: bool,
}

/// Rules of one definition with the `*` definition layer already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionRules {
    definition: String,
    rules: Value,
}

impl DefinitionRules {
    /// Whether the definition produces no forms at all.
    pub fn is_skipped(&self) -> bool {
        self.rules
            .get("skip")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Effective rule set of one operation.
    ///
    /// Layers from lowest to highest precedence: rules placed directly on the
    /// definition, its `*` operation rules, then the rules of `operation`.
    pub fn resolve(&self, operation: Operation) -> Result<RuleSet, ScaffoldError> {
        let own = self.rules.as_object().map(|rules| {
            let own: Map<String, Value> = rules
                .iter()
                .filter(|(key, _)| !is_layer_key(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            Value::Object(own)
        });
        let merged = merge_layers([
            own.as_ref(),
            self.rules.get(WILDCARD),
            self.rules.get(operation.as_str()),
        ]);
        if !merged.is_object() {
            warn!("ignoring {operation} rules of {}: not a mapping", self.definition);
            return Ok(RuleSet::default());
        }
        serde_json::from_value(merged).map_err(|e| ScaffoldError::InvalidRules {
            definition: self.definition.clone(),
            operation,
            message: e.to_string(),
        })
    }
}

fn is_layer_key(key: &str) -> bool {
    key == "skip" || key == WILDCARD || Operation::ALL.iter().any(|op| op.as_str() == key)
}

/// Effective rules of one (definition, operation) pair.
///
/// Field and column entries that do not parse are dropped with a warning; only
/// a `type` override naming an unknown field type rejects the whole set.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    #[serde(deserialize_with = "deserialize_field_rules")]
    pub fields: IndexMap<String, FieldRule>,
}

impl RuleSet {
    pub fn field(&self, property_name: &str) -> Option<&FieldRule> {
        self.fields.get(property_name)
    }
}

/// Overrides for a single property.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct FieldRule {
    pub skip: bool,
    pub flatten: bool,
    #[serde(rename = "prefixFlatProperties")]
    pub prefix_flat_properties: bool,
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    pub extra: Map<String, Value>,
    #[serde(deserialize_with = "deserialize_entries")]
    pub columns: IndexMap<String, ColumnRule>,
    #[serde(rename = "extra-columns")]
    pub extra_columns: IndexMap<String, Map<String, Value>>,
}

/// Overrides for a table column derived from a referenced property.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ColumnRule {
    pub skip: bool,
    #[serde(rename = "type")]
    pub column_type: Option<ColumnType>,
    #[serde(rename = "calculate-sum")]
    pub calculate_sum: Option<bool>,
    pub order: Option<f64>,
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub step: Option<Number>,
    pub extra: Map<String, Value>,
}

fn deserialize_field_rules<'de, D>(deserializer: D) -> Result<IndexMap<String, FieldRule>, D::Error>
where
    D: Deserializer<'de>,
{
    let fields = Value::deserialize(deserializer)?;
    if let Some(fields) = fields.as_object() {
        for (name, rule) in fields {
            if let Some(field_type) = rule.get("type") {
                FieldType::deserialize(field_type)
                    .map_err(|e| D::Error::custom(format!("field `{name}`: {e}")))?;
            }
        }
    }
    Ok(parse_entries(fields))
}

fn deserialize_entries<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Value::deserialize(deserializer).map(parse_entries)
}

/// Parse every entry of a mapping on its own, dropping the ones that fail.
fn parse_entries<T: DeserializeOwned>(entries: Value) -> IndexMap<String, T> {
    let Value::Object(entries) = entries else {
        warn!("ignoring rule entries: not a mapping");
        return IndexMap::new();
    };
    entries
        .into_iter()
        .filter_map(|(name, entry)| match serde_json::from_value(entry) {
            Ok(rule) => Some((name, rule)),
            Err(e) => {
                warn!("ignoring rule `{name}`: {e}");
                None
            }
        })
        .collect()
}
