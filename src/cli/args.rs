//! CLI argument definitions using clap
//!
//! Commands:
//! - notesd serve [--host <host>] [--port <port>] [--migrate]
//! - notesd migrate
//! - notesd check-config

use clap::{Parser, Subcommand};

/// notesd - a small notes service over PostgreSQL, MySQL or SQLite
#[derive(Parser, Debug)]
#[command(name = "notesd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to the database and serve the notes API
    Serve {
        /// Host to bind to (overrides NOTES_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides NOTES_PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Create the notes table before serving
        #[arg(long)]
        migrate: bool,
    },

    /// Create the notes table if it does not exist, then exit
    Migrate,

    /// Print the resolved configuration (password redacted) and exit
    CheckConfig,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
