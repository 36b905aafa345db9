//! Locale keys and the locale map collected while building a form

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::rules::Operation;
use crate::utils::{literal_text, to_camel_case};

/// Dotted path identifying one display string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocaleKey(String);

impl LocaleKey {
    /// Root key of a form: `forms.<camelCase(definition)><Operation>`.
    pub fn form(definition_name: &str, operation: Operation) -> Self {
        LocaleKey(format!(
            "forms.{}{}",
            to_camel_case(definition_name),
            operation.capitalized()
        ))
    }

    pub fn child(&self, segment: &str) -> Self {
        LocaleKey(format!("{}.{}", self.0, segment))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reference to this key as embedded in form documents.
    pub fn reference(&self) -> String {
        format!("[[{}]]", self.0)
    }
}

impl fmt::Display for LocaleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Flat mapping from locale key to display string, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct LocaleMap(IndexMap<String, String>);

impl LocaleMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Collects the locale entries of one (definition, operation) pair.
#[derive(Debug)]
pub struct LocaleCollector {
    root: LocaleKey,
    entries: LocaleMap,
}

impl LocaleCollector {
    pub fn new(definition_name: &str, operation: Operation) -> Self {
        Self {
            root: LocaleKey::form(definition_name, operation),
            entries: LocaleMap::default(),
        }
    }

    pub fn root(&self) -> &LocaleKey {
        &self.root
    }

    /// Register `text` under `key` and return the reference to it.
    ///
    /// Registering a key twice keeps its first position and the latest text.
    pub fn register(&mut self, key: &LocaleKey, text: impl Into<String>) -> String {
        self.entries.0.insert(key.0.clone(), text.into());
        key.reference()
    }

    /// Register one label per enum literal below `parent`.
    ///
    /// Returns `(reference, literal)` pairs in literal order.
    pub fn register_literals(&mut self, parent: &LocaleKey, literals: &[Value]) -> Vec<(String, Value)> {
        literals
            .iter()
            .map(|literal| {
                let text = literal_text(literal);
                let reference = self.register(&parent.child(&text), text);
                (reference, literal.clone())
            })
            .collect()
    }

    pub fn finish(self) -> LocaleMap {
        self.entries
    }
}
