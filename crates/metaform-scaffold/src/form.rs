//! Assembly of form documents, one per definition and operation

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ScaffoldError;
use crate::field::{Field, build_field};
use crate::flatten::{flatten_properties, prepare_schema};
use crate::locale::{LocaleCollector, LocaleMap};
use crate::rules::{DefinitionRules, Operation, RuleConfig};
use crate::schema::{ApiSchema, Definition};
use crate::utils::to_kebab_case;

/// State shared by the field and column builders of one form.
pub(crate) struct FormContext<'a> {
    pub schema: &'a ApiSchema,
    pub definition_name: &'a str,
    pub definition: &'a Definition,
    pub locales: LocaleCollector,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormDocument {
    pub title: String,
    pub sections: Vec<FormSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSection {
    pub fields: Vec<Field>,
}

impl FormDocument {
    /// All fields of all sections.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields().find(|field| field.name == name)
    }
}

/// The two artifacts of one (definition, operation) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedForm {
    pub definition: String,
    pub operation: Operation,
    pub form: FormDocument,
    pub locales: LocaleMap,
}

impl GeneratedForm {
    /// `<kebab-case(definition)>-<operation>`
    pub fn file_stem(&self) -> String {
        format!("{}-{}", to_kebab_case(&self.definition), self.operation)
    }

    pub fn form_file_name(&self) -> String {
        format!("{}.json", self.file_stem())
    }

    pub fn locales_file_name(&self) -> String {
        format!("{}-locales.json", self.file_stem())
    }

    pub fn form_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.form)
    }

    pub fn locales_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.locales)
    }
}

/// Outcome of a batch generation.
///
/// A failing pair is recorded in `failures` and does not stop the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub forms: Vec<GeneratedForm>,
    pub failures: Vec<ScaffoldError>,
}

impl Generation {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn form(&self, definition: &str, operation: Operation) -> Option<&GeneratedForm> {
        self.forms
            .iter()
            .find(|form| form.definition == definition && form.operation == operation)
    }
}

/// Form generator over a prepared schema.
#[derive(Debug, Clone)]
pub struct Scaffold {
    schema: ApiSchema,
    rules: RuleConfig,
}

impl Scaffold {
    /// Run the prepare pass of `rules` over a copy of `schema`.
    pub fn new(schema: &ApiSchema, rules: RuleConfig) -> Result<Self, ScaffoldError> {
        let schema = prepare_schema(schema, &rules.prepare)?;
        Ok(Self { schema, rules })
    }

    /// The schema after the prepare pass.
    pub fn schema(&self) -> &ApiSchema {
        &self.schema
    }

    /// Generate both forms of every definition that is not skipped.
    pub fn generate(&self) -> Generation {
        let mut generation = Generation::default();
        for (name, definition) in &self.schema.definitions {
            self.generate_into(name, definition, &mut generation);
        }
        info!(
            "generated {} forms, {} failed",
            generation.forms.len(),
            generation.failures.len()
        );
        generation
    }

    /// Generate both forms of a single definition.
    pub fn generate_only(&self, definition_name: &str) -> Result<Generation, ScaffoldError> {
        let definition = self.definition(definition_name)?;
        let mut generation = Generation::default();
        self.generate_into(definition_name, definition, &mut generation);
        Ok(generation)
    }

    /// Generate one form. `Ok(None)` when the definition is skipped by its rules.
    pub fn generate_form(
        &self,
        definition_name: &str,
        operation: Operation,
    ) -> Result<Option<GeneratedForm>, ScaffoldError> {
        let definition = self.definition(definition_name)?;
        let rules = self.rules.definition_rules(definition_name);
        if rules.is_skipped() {
            return Ok(None);
        }
        self.build_form(definition_name, definition, &rules, operation)
            .map(Some)
    }

    fn definition(&self, name: &str) -> Result<&Definition, ScaffoldError> {
        self.schema
            .definitions
            .get(name)
            .ok_or_else(|| ScaffoldError::UnknownDefinition(name.to_string()))
    }

    fn generate_into(&self, name: &str, definition: &Definition, generation: &mut Generation) {
        let rules = self.rules.definition_rules(name);
        if rules.is_skipped() {
            debug!("skipping definition {name}");
            return;
        }
        for operation in Operation::ALL {
            match self.build_form(name, definition, &rules, operation) {
                Ok(form) => generation.forms.push(form),
                Err(e) => {
                    warn!("failed to generate {name} ({operation}): {e}");
                    generation.failures.push(e);
                }
            }
        }
    }

    fn build_form(
        &self,
        name: &str,
        definition: &Definition,
        rules: &DefinitionRules,
        operation: Operation,
    ) -> Result<GeneratedForm, ScaffoldError> {
        let rules = rules.resolve(operation)?;
        let properties = flatten_properties(&self.schema, name, &definition.properties, &rules)?;

        let mut ctx = FormContext {
            schema: &self.schema,
            definition_name: name,
            definition,
            locales: LocaleCollector::new(name, operation),
        };
        let root = ctx.locales.root().clone();
        let title = ctx.locales.register(&root, name);

        // a later property with the same field name replaces the earlier field
        let mut fields = IndexMap::new();
        for (property_name, property) in &properties {
            if let Some(field) =
                build_field(&mut ctx, property_name, property, rules.field(property_name))?
            {
                fields.insert(field.name.clone(), field);
            }
        }

        let save = ctx.locales.register(&root.child("save"), "Save");
        let mut fields: Vec<Field> = fields.into_values().collect();
        fields.push(Field::submit(save));

        debug!("built {name} ({operation}) with {} fields", fields.len());

        Ok(GeneratedForm {
            definition: name.to_string(),
            operation,
            form: FormDocument {
                title,
                sections: vec![FormSection { fields }],
            },
            locales: ctx.locales.finish(),
        })
    }
}
