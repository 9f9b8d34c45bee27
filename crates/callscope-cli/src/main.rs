mod cli;
mod commands;

use anyhow::Result;
use callscope_config::Config;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    // .env, config file, then environment overrides
    let config = Config::load()?;

    match cli.command {
        cli::Commands::Serve { host, port } => commands::serve::handle(&config, host, port).await,
        cli::Commands::Analyze { text, file } => {
            commands::analyze::handle(&config, text, file).await
        }
        cli::Commands::History { limit } => commands::history::handle(&config, limit).await,
    }
}
