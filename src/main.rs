mod cli;
mod sim;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use interstitch::config;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::load_config_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate { plan, tick_ms } => sim::simulate(&plan, config, tick_ms).await,
        Commands::Inspect { plan, json } => sim::inspect(&plan, json),
    }
}
