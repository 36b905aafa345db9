use clap::{Parser, Subcommand};
use nu_ansi_term::Color;

mod commands {
    automod::dir!(pub "src/commands");
}
mod util;

#[derive(Parser)]
#[command(
    name = "metaform-scaffold",
    version,
    about = "Generates metaforms from Swagger definitions"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run targets from Metaform.yaml
    Generate(commands::generate::Args),
    /// Generate forms for a single schema without a config file
    Form(commands::form::Args),
}

fn main() {
    let cli = Cli::parse();
    metaform_scaffold_cli::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Form(args) => commands::form::run(args),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", Color::Red.paint(format!("Error: {e:#}")));
            std::process::exit(1);
        }
    }
}
