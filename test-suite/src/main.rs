//! Custom test runner for the metaform-scaffold fixtures.
//!
//! Runs every case under `cases/` and reports failures with a diff of the
//! mismatching artifact.

use clap::Parser;
use nu_ansi_term::Color;
use test_suite::TestRunner;

#[derive(Parser)]
#[command(name = "test-suite", about = "metaform-scaffold fixture runner")]
struct Args {
    /// Filter tests by name pattern (substring match)
    #[arg(short, long)]
    filter: Option<String>,

    /// Directory containing the cases
    #[arg(long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/cases"))]
    cases: String,
}

fn main() {
    let args = Args::parse();

    let mut runner = TestRunner::new(&args.cases);
    if let Some(filter) = args.filter {
        runner = runner.with_filter(filter);
    }

    let results = match runner.run_all() {
        Ok(results) => results,
        Err(e) => {
            eprintln!("{}", Color::Red.paint(format!("Error: {e:#}")));
            std::process::exit(1);
        }
    };

    for failure in &results.failures {
        println!("{} {}", Color::Red.bold().paint("FAIL"), failure.test_name);
        println!("{}", failure.error);
    }

    let summary = format!(
        "{} passed, {} failed, {} total",
        results.passed, results.failed, results.total
    );
    if results.is_success() {
        println!("{}", Color::Green.paint(summary));
    } else {
        println!("{}", Color::Red.paint(summary));
        std::process::exit(1);
    }
}
