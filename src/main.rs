//! sitematter command-line entry point

mod cli_bin;

use clap::Parser;
use cli_bin::args::{Cli, Commands};
use cli_bin::commands::{datetime_command, tag_command};
use env_logger::Env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Datetime(args) => datetime_command(args),
        Commands::Tag(args) => tag_command(args),
    };

    match result {
        Ok(summary) if summary.has_errors() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
