// file: src/main.rs
// version: 2.0.0
// guid: 4bc6814d-ed48-40ca-b3bf-e5ed654740ee

//! IPMIrage - Main entry point

use clap::Parser;
use ipmirage::{
    cli::{
        args::{Cli, Commands},
        commands::*,
    },
    logging::logger,
};
use std::process::ExitCode;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_file = (!cli.no_log_file).then_some(cli.log_file.as_path());
    if let Err(e) = logger::init_logger(cli.verbose, cli.quiet, log_file) {
        eprintln!("ERROR: {}", e);
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Commands::Run {
            config,
            mapping,
            dry_run,
        } => run_command(&config, &mapping, dry_run).await,
        Commands::Validate { mapping, json } => validate_command(&mapping, json).await,
        Commands::CheckPrereqs => check_prerequisites_command().await,
        Commands::Lookup { config, mac } => lookup_command(&config, &mac).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
