//! Form command - one-off generation for a single schema file.

use std::path::PathBuf;

use metaform_scaffold::Scaffold;
use metaform_scaffold_cli::{read_rules, read_schema, write_report};

use crate::util::print_report;

#[derive(clap::Args)]
pub struct Args {
    /// Swagger document (YAML or JSON)
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Rule file (YAML or JSON)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// Output directory, created when missing
    #[arg(short, long)]
    pub out: PathBuf,

    /// Only generate the forms of this definition
    #[arg(long)]
    pub only: Option<String>,
}

pub fn run(args: Args) -> anyhow::Result<bool> {
    let schema = read_schema(&args.schema)?;
    let rules = args
        .rules
        .as_deref()
        .map(read_rules)
        .transpose()?
        .unwrap_or_default();

    let scaffold = Scaffold::new(&schema, rules)?;
    let generation = match &args.only {
        Some(definition) => scaffold.generate_only(definition)?,
        None => scaffold.generate(),
    };

    let report = write_report(&args.schema.display().to_string(), generation, &args.out)?;
    print_report(&report);
    Ok(report.is_success())
}
