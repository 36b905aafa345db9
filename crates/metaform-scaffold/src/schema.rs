//! Swagger definitions as consumed by the generator
//!
//! Only the parts of a property that influence form generation are modelled.
//! Unknown keys are ignored so that full Swagger documents can be loaded as-is.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ScaffoldError;

/// Ordered property mapping of a definition.
pub type Properties = IndexMap<String, Property>;

/// Root of a Swagger document: the named definitions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiSchema {
    #[serde(default)]
    pub definitions: IndexMap<String, Definition>,
}

/// A named object type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default)]
    pub properties: Properties,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Definition {
    pub fn is_required(&self, property_name: &str) -> bool {
        self.required.iter().any(|name| name == property_name)
    }
}

/// Attributes of a single property (or of an array's `items`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<SchemaFormat>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Property>>,

    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Property {
    /// `$ref` of the array items, if any
    pub fn items_reference(&self) -> Option<&str> {
        self.items.as_ref().and_then(|items| items.reference.as_deref())
    }

    /// Lay the attributes present in `overlay` over this property.
    ///
    /// Attributes only this property carries are kept; `items` merge the same
    /// way and `enum` lists are replaced as a whole.
    pub fn merge(&mut self, overlay: &Property) {
        if overlay.schema_type.is_some() {
            self.schema_type = overlay.schema_type;
        }
        if overlay.format.is_some() {
            self.format = overlay.format;
        }
        if overlay.enum_values.is_some() {
            self.enum_values = overlay.enum_values.clone();
        }
        match (&mut self.items, &overlay.items) {
            (Some(items), Some(overlay)) => items.merge(overlay),
            (items, Some(overlay)) => *items = Some(overlay.clone()),
            (_, None) => {}
        }
        if overlay.reference.is_some() {
            self.reference = overlay.reference.clone();
        }
        if overlay.description.is_some() {
            self.description = overlay.description.clone();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaFormat {
    Int32,
    Int64,
    Float,
    Double,
    Date,
    DateTime,
    #[serde(other)]
    Other,
}

/// Name of the definition a `$ref` points to (`#/definitions/Address` → `Address`).
pub fn reference_name(reference: &str) -> Option<&str> {
    reference
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
}

impl ApiSchema {
    /// Properties of the definition `reference` points to.
    ///
    /// `definition` and `property` identify the owner of the reference and are
    /// only used to report an unresolved target.
    pub fn resolve_reference(
        &self,
        definition: &str,
        property: &str,
        reference: &str,
    ) -> Result<&Properties, ScaffoldError> {
        reference_name(reference)
            .and_then(|name| self.definitions.get(name))
            .map(|target| &target.properties)
            .ok_or_else(|| ScaffoldError::UnresolvedReference {
                definition: definition.to_string(),
                property: property.to_string(),
                reference: reference.to_string(),
            })
    }
}
