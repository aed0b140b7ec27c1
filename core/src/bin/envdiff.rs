//! envdiff binary - compare extraction results between two environments.

use clap::Parser;
use envdiff::cli::{run, Cli, OutputFormat};

fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(cli) {
        match (format, serde_json::to_string_pretty(&e)) {
            (OutputFormat::Json, Ok(json)) => eprintln!("{json}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}
