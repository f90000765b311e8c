//! CLI module for notesd
//!
//! Provides command-line interface for:
//! - serve: connect to the store and serve the HTTP API
//! - migrate: create the notes table
//! - check-config: print resolved configuration

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_config, migrate, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_response;
