use indexmap::IndexMap;
use metaform_scaffold::{ApiSchema, RuleConfig};
use serde::Deserialize;
use serde_json::Value;

/// A single fixture: one schema, its rules, and what generation must produce.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestCase {
    /// Path of the fixture relative to the cases directory, without extension
    #[serde(skip)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    pub schema: ApiSchema,

    #[serde(default)]
    pub rules: RuleConfig,

    /// Expected artifacts by file name, e.g. `order-create.json`
    #[serde(default)]
    pub expected: IndexMap<String, Value>,

    /// Substring of the error generation must fail with
    #[serde(default)]
    pub error: Option<String>,

    /// Artifacts that must not be generated
    #[serde(default)]
    pub absent: Vec<String>,
}

impl TestCase {
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self, serde_yaml::Error> {
        let mut case: TestCase = serde_yaml::from_str(source)?;
        case.name = name.into();
        Ok(case)
    }

    pub fn expects_error(&self) -> bool {
        self.error.is_some()
    }
}
