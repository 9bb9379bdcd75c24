mod cli;
mod commands;
mod config;
mod error;
mod logging;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("resmut CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let result = match cli.command {
        Commands::Dihedrals(args) => commands::dihedrals::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Classify(args) => commands::classify::run(args),
        Commands::CheckConfig(args) => commands::check_config::run(args),
    };

    if let Err(e) = &result {
        error!("Command failed: {}", e);
    }
    result
}
