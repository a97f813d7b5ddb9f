use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "tokenstore-janitor")]
#[command(about = "Token store maintenance: migrations and expired token cleanup")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file (defaults to ./tokenstore.toml if present)
    #[arg(short, long, global = true, env = "TOKENSTORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level filter, used when RUST_LOG is not set
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Delete expired tokens once and exit
    Cleanup,
    /// Delete expired tokens on a schedule until interrupted
    Run,
}
