//! docli - Manage DigitalOcean resources from the command line
//!
//! Read-only commands are served from a disk cache while it is fresh, so
//! repeated listings do not hit the API.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use docli::cli::Cli;
use docli::commands::{self, Context};
use docli::config::{self, Config, ConfigError};
use docli::error::AppError;
use docli::logging;
use docli::output::OutputError;

fn main() -> ExitCode {
    // Environment changes must happen before parsing and before any runtime
    // threads exist
    let dotenv = config::load_dotenv(Path::new(".env"));

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli, dotenv)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, dotenv: Result<usize, ConfigError>) -> Result<(), AppError> {
    let exported = dotenv?;
    if exported > 0 {
        debug!(count = exported, "Loaded variables from .env");
    }

    let config = Config::from_cli(&cli)?;
    let ctx = Context::new(&config)?;
    let output = commands::run(&ctx, cli.command).await?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes()).map_err(OutputError::from)?;
    stdout.flush().map_err(OutputError::from)?;
    Ok(())
}
