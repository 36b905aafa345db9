//! Inlining of referenced definitions into the owning definition
//!
//! Flattening replaces a `$ref` property with the properties of the referenced
//! definition. It is applied once across the whole schema by the prepare pass
//! and again per form from the field rules of that form. Flattening is single
//! level: properties brought in by a flatten are never flattened themselves.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::ScaffoldError;
use crate::rules::{PrepareRules, RuleSet};
use crate::schema::{ApiSchema, Properties};

/// How referenced properties land in the owning definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlattenMode {
    /// Insert under their own names; a colliding entry takes the referenced
    /// attributes and keeps its own for the rest
    Merge,
    /// Insert as `<property>.<referenced property>`
    Prefix,
}

/// Apply the prepare rules to a copy of `schema`.
///
/// References are resolved against the input schema, so the result does not
/// depend on the order in which definitions are prepared.
pub fn prepare_schema(
    schema: &ApiSchema,
    prepare: &IndexMap<String, PrepareRules>,
) -> Result<ApiSchema, ScaffoldError> {
    let mut prepared = schema.clone();

    for (definition_name, rules) in prepare {
        let Some(definition) = schema.definitions.get(definition_name) else {
            warn!("prepare rules name unknown definition `{definition_name}`");
            continue;
        };

        let mut properties = definition.properties.clone();
        for (property_name, property) in &definition.properties {
            let flatten = rules
                .fields
                .get(property_name)
                .is_some_and(|rule| rule.flatten);
            if let (true, Some(reference)) = (flatten, property.reference.as_deref()) {
                flatten_reference(
                    schema,
                    definition_name,
                    &mut properties,
                    property_name,
                    reference,
                    FlattenMode::Merge,
                )?;
            }
        }

        if let Some(target) = prepared.definitions.get_mut(definition_name) {
            target.properties = properties;
        }
    }

    Ok(prepared)
}

/// Apply the flatten rules of one form to a private copy of `properties`.
pub fn flatten_properties(
    schema: &ApiSchema,
    definition_name: &str,
    properties: &Properties,
    rules: &RuleSet,
) -> Result<Properties, ScaffoldError> {
    let mut flattened = properties.clone();

    for (property_name, property) in properties {
        let Some(rule) = rules.field(property_name).filter(|rule| rule.flatten) else {
            continue;
        };
        let Some(reference) = property.reference.as_deref() else {
            continue;
        };
        let mode = if rule.prefix_flat_properties {
            FlattenMode::Prefix
        } else {
            FlattenMode::Merge
        };
        flatten_reference(
            schema,
            definition_name,
            &mut flattened,
            property_name,
            reference,
            mode,
        )?;
    }

    Ok(flattened)
}

fn flatten_reference(
    schema: &ApiSchema,
    definition_name: &str,
    properties: &mut Properties,
    property_name: &str,
    reference: &str,
    mode: FlattenMode,
) -> Result<(), ScaffoldError> {
    let referenced = schema.resolve_reference(definition_name, property_name, reference)?;
    debug!("flattening {definition_name}.{property_name} ({reference}, {mode:?})");

    for (name, referenced_property) in referenced {
        match mode {
            FlattenMode::Merge => match properties.get_mut(name) {
                Some(existing) => existing.merge(referenced_property),
                None => {
                    properties.insert(name.clone(), referenced_property.clone());
                }
            },
            FlattenMode::Prefix => {
                properties.insert(format!("{property_name}.{name}"), referenced_property.clone());
            }
        }
    }
    properties.shift_remove(property_name);
    Ok(())
}
