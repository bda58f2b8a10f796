mod cache;
mod catalog;
mod cli;
mod config;
mod crawler;
mod errors;
mod findings;
mod ledger;
mod parsers;
mod pipeline;
mod planner;
mod profile;
mod report;
mod runner;
mod utils;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let log_level = match cli.verbose {
        0 if cli.quiet => "warn",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    let result = match cli.command {
        cli::Commands::Run(args) => cli::run::handle_run(args).await,
        cli::Commands::CheckTools => cli::run::handle_check_tools().await,
        cli::Commands::Validate(args) => cli::validate::handle_validate(args).await,
    };

    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            // Only InvalidInput and ArchitectureViolation ever abort a scan
            // outright (spec §7); anything else reaching main() is a
            // pre-scan failure (bad config path, unreadable file, ...).
            // Both map to the engine-error exit code (spec §6).
            std::process::exit(5);
        }
    }
}
