use thiserror::Error;

use crate::rules::Operation;

/// Errors that abort generation of a form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaffoldError {
    /// A `$ref` points at a definition the schema does not contain
    #[error(
        "property `{property}` of definition `{definition}` references unknown definition `{reference}`"
    )]
    UnresolvedReference {
        definition: String,
        property: String,
        reference: String,
    },

    /// The merged rule set of a definition could not be interpreted
    #[error("invalid rules for definition `{definition}` ({operation}): {message}")]
    InvalidRules {
        definition: String,
        operation: Operation,
        message: String,
    },

    /// A definition was requested by name but the schema does not contain it
    #[error("unknown definition `{0}`")]
    UnknownDefinition(String),
}
