mod cli;
mod commands;
mod script;

use anyhow::Result;
use clap::Parser;
use desk_config::Config;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Initialize tracing (stderr, so --json output stays clean)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        cli::Commands::Roster => commands::roster::handle(&config),
        cli::Commands::Run { script, json } => commands::run::handle(&config, &script, json),
        cli::Commands::ConfigPath => {
            println!("{}", Config::config_path().display());
            Ok(())
        }
    }
}
