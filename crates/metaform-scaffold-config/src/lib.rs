//! Configuration types for metaform-scaffold.
//!
//! The configuration is stored in `Metaform.yaml` files at project roots. Each
//! target pairs one Swagger document with an output directory and the rules
//! applied while generating its forms.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use metaform_scaffold::RuleConfig;
use serde::Deserialize;

/// The standard configuration filename.
pub const CONFIG_FILENAME: &str = "Metaform.yaml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl PartialEq for ConfigError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ConfigError::Io(a), ConfigError::Io(b)) => a.kind() == b.kind(),
            (ConfigError::Yaml(a), ConfigError::Yaml(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// A generation target.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Target {
    /// Swagger document (YAML or JSON), relative to the config file.
    pub schema: PathBuf,
    /// Directory receiving the generated files, relative to the config file.
    pub target_directory: PathBuf,
    #[serde(default)]
    pub rules: RuleConfig,
}

impl Target {
    pub fn schema_path(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.schema)
    }

    pub fn target_directory_path(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.target_directory)
    }
}

/// CLI-specific configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    /// Targets run by `metaform-scaffold generate` without arguments.
    #[serde(default)]
    pub default_targets: Vec<String>,
}

/// The main configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScaffoldConfig {
    /// Generation targets (name -> target definition).
    #[serde(default)]
    pub targets: IndexMap<String, Target>,
    /// CLI-specific configuration.
    #[serde(default)]
    pub cli: Option<CliConfig>,
}

impl ScaffoldConfig {
    /// Find the configuration file by searching upward from the given directory.
    pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
        let mut current = start_dir.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILENAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Get the default targets for the generate command.
    pub fn default_targets(&self) -> &[String] {
        self.cli
            .as_ref()
            .map(|c| c.default_targets.as_slice())
            .unwrap_or(&[])
    }

    /// Get a target by name.
    pub fn get_target(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    /// Get all target names, in declaration order.
    pub fn target_names(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(|s| s.as_str())
    }
}

/// Load a configuration file.
pub fn load_config(path: &Path) -> Result<ScaffoldConfig, ConfigError> {
    let source = std::fs::read_to_string(path)?;
    ScaffoldConfig::from_yaml_str(&source)
}
