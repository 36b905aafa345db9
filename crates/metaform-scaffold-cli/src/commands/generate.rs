//! Generate command - runs targets from Metaform.yaml.

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use metaform_scaffold_cli::run_target;
use metaform_scaffold_config::{CONFIG_FILENAME, ScaffoldConfig, load_config};
use nu_ansi_term::Color;

use crate::util::print_report;

#[derive(clap::Args)]
pub struct Args {
    /// Target names. If omitted, runs `cli.default-targets`.
    #[arg(num_args = 0..)]
    pub targets: Vec<String>,

    /// Run all targets defined in Metaform.yaml
    #[arg(long)]
    pub all: bool,

    /// Path to the config file (searched upward from the current directory by default)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: Args) -> anyhow::Result<bool> {
    let config_path = match args.config {
        Some(path) => path,
        None => {
            let current_dir =
                std::env::current_dir().context("Failed to get current directory")?;
            ScaffoldConfig::find_config_file(&current_dir)
                .ok_or_else(|| anyhow!("No {CONFIG_FILENAME} found"))?
        }
    };

    let config = load_config(&config_path)
        .with_context(|| format!("Error loading {}", config_path.display()))?;
    let config_dir = config_path.parent().unwrap_or(Path::new("."));

    let target_names: Vec<&str> = if args.all {
        config.target_names().collect()
    } else if args.targets.is_empty() {
        config
            .default_targets()
            .iter()
            .map(|s| s.as_str())
            .collect()
    } else {
        args.targets.iter().map(|s| s.as_str()).collect()
    };

    if target_names.is_empty() {
        eprintln!(
            "{}",
            Color::Yellow.paint(format!(
                "No targets specified. Add default targets to {CONFIG_FILENAME} or use --all"
            ))
        );
        print_available(&config);
        return Ok(true);
    }

    let mut success = true;
    for name in target_names {
        let Some(target) = config.get_target(name) else {
            eprintln!(
                "{}",
                Color::Red.paint(format!("Error: Unknown target '{name}'"))
            );
            print_available(&config);
            return Ok(false);
        };
        let report = run_target(name, target, config_dir)?;
        print_report(&report);
        success &= report.is_success();
    }
    Ok(success)
}

fn print_available(config: &ScaffoldConfig) {
    println!("\nAvailable targets:");
    for name in config.target_names() {
        println!("  - {name}");
    }
}
