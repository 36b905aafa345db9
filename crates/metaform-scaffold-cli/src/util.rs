use nu_ansi_term::Color;

use metaform_scaffold_cli::Report;

/// Print the summary of one run.
pub fn print_report(report: &Report) {
    let forms = report.written.len() / 2;
    if report.is_success() {
        println!(
            "{} {}: {forms} forms",
            Color::Green.paint("✓"),
            report.name
        );
    } else {
        println!(
            "{} {}: {forms} forms, {} failed",
            Color::Red.paint("✗"),
            report.name,
            report.failures.len()
        );
        for failure in &report.failures {
            eprintln!("  {}", Color::Red.paint(failure.to_string()));
        }
    }
}
