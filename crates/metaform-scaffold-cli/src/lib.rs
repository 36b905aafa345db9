//! Input loading and artifact writing for the `metaform-scaffold` binary.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use metaform_scaffold::{ApiSchema, Generation, RuleConfig, Scaffold, ScaffoldError};
use metaform_scaffold_config::Target;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Install the global log subscriber.
///
/// `RUST_LOG` wins over `verbosity` (0 = warn, 1 = info, 2+ = debug).
pub fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Read a Swagger document. JSON is accepted as well since it is valid YAML.
pub fn read_schema(path: &Path) -> Result<ApiSchema> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read schema {}", path.display()))?;
    serde_yaml::from_str(&source)
        .with_context(|| format!("Failed to parse schema {}", path.display()))
}

/// Read a standalone rule file.
pub fn read_rules(path: &Path) -> Result<RuleConfig> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules {}", path.display()))?;
    serde_yaml::from_str(&source)
        .with_context(|| format!("Failed to parse rules {}", path.display()))
}

/// Write both artifacts of every generated form into `directory`, creating it
/// when missing. Returns the written paths.
pub fn write_generation(generation: &Generation, directory: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create directory {}", directory.display()))?;

    let mut written = Vec::with_capacity(generation.forms.len() * 2);
    for form in &generation.forms {
        let artifacts = [
            (form.form_file_name(), form.form_json()?),
            (form.locales_file_name(), form.locales_json()?),
        ];
        for (file_name, contents) in artifacts {
            let path = directory.join(file_name);
            fs::write(&path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("wrote {}", path.display());
            written.push(path);
        }
    }
    Ok(written)
}

/// Outcome of one generation run.
#[derive(Debug)]
pub struct Report {
    pub name: String,
    pub written: Vec<PathBuf>,
    pub failures: Vec<ScaffoldError>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Write `generation` under `directory` and summarise it as `name`.
pub fn write_report(name: &str, generation: Generation, directory: &Path) -> Result<Report> {
    let written = write_generation(&generation, directory)?;
    Ok(Report {
        name: name.to_string(),
        written,
        failures: generation.failures,
    })
}

/// Run one configured target. Paths are resolved against `config_dir`.
pub fn run_target(name: &str, target: &Target, config_dir: &Path) -> Result<Report> {
    let schema_path = target.schema_path(config_dir);
    info!("target {name}: {}", schema_path.display());

    let schema = read_schema(&schema_path)?;
    let scaffold = Scaffold::new(&schema, target.rules.clone())
        .with_context(|| format!("Failed to prepare target {name}"))?;
    write_report(
        name,
        scaffold.generate(),
        &target.target_directory_path(config_dir),
    )
}
