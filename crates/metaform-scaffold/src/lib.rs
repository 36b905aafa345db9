#![doc = include_str!("../README.md")]

mod error;
mod field;
mod field_type;
mod flatten;
mod form;
mod locale;
mod merge;
mod rules;
mod schema;
mod table;
mod utils;

pub use error::ScaffoldError;
pub use field::{Field, SelectOption};
pub use field_type::{ColumnType, FieldType, resolve_field_type};
pub use flatten::{FlattenMode, flatten_properties, prepare_schema};
pub use form::{FormDocument, FormSection, GeneratedForm, Generation, Scaffold};
pub use locale::{LocaleCollector, LocaleKey, LocaleMap};
pub use merge::{deep_merge, merge_layers};
pub use rules::{
    ColumnRule, DEFAULT_COLUMN_ORDER, DefinitionRules, FieldRule, Operation, PREPARE,
    PrepareFieldRule, PrepareRules, RuleConfig, RuleSet, WILDCARD,
};
pub use schema::{ApiSchema, Definition, Properties, Property, SchemaFormat, SchemaType, reference_name};
pub use table::{Column, ColumnValue};
pub use utils::{to_camel_case, to_field_name, to_kebab_case};

/// Result type for metaform-scaffold operations
pub type Result<T> = std::result::Result<T, ScaffoldError>;
