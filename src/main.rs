//! Sports Leagues CLI - browse sports leagues and season badges
//!
//! Lists leagues from TheSportsDB, filters them by name and sport, and fetches
//! season badges, caching every response on disk with a per-collection TTL.

use clap::Parser;
use std::io;
use std::process::ExitCode;

use sportsleagues::cli::{Cli, RuntimeConfig};
use sportsleagues::commands::{self, build_cache};
use sportsleagues::data::HttpSportsApi;
use sportsleagues::logging;
use sportsleagues::service::SportsService;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = RuntimeConfig::from_cli(&cli)?;
    tracing::debug!(?config, "starting");

    let cache = build_cache(&config);
    let service = SportsService::new(HttpSportsApi::new(config.api.clone()), cache);

    let mut stdout = io::stdout().lock();
    commands::run(cli.command.unwrap_or_default(), &service, &mut stdout).await?;
    Ok(())
}
