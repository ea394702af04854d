use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "desk")]
#[command(about = "Help desk ticket tracking", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "DESK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the configured technicians in assignment order
    Roster,

    /// Replay a session script against a fresh help desk
    Run {
        /// Path to the TOML session script
        script: PathBuf,

        /// Print the final desk state and query results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the default config file location
    ConfigPath,
}
