//! CLI command implementations
//!
//! Boot sequence for `serve`:
//! 1. Configuration load (`.env`, then the environment, then CLI flags)
//! 2. Store connection (fatal on failure, no retry)
//! 3. Optional migration
//! 4. HTTP server activation

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::http_server::HttpServer;
use crate::observability::{init_logging, LogFormat};
use crate::store::NoteStore;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    load_dotenv(dotenvy::dotenv())?;

    let cli = Cli::parse_args();
    let format = if cli.log_json { LogFormat::Json } else { LogFormat::Text };
    init_logging(format).map_err(|e| CliError::boot_failed(format!("Failed to init logging: {}", e)))?;

    let config = AppConfig::from_env()?;
    run_command(cli.command, config)
}

/// Accept a loaded or missing `.env` file; anything else is a config error
fn load_dotenv(result: Result<PathBuf, dotenvy::Error>) -> CliResult<()> {
    match result {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CliError::config_error(format!("Failed to load .env: {}", e))),
    }
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: AppConfig) -> CliResult<()> {
    match cmd {
        Command::Serve { host, port, migrate } => serve(config, host, port, migrate),
        Command::Migrate => migrate(config),
        Command::CheckConfig => check_config(&config),
    }
}

fn runtime() -> CliResult<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

/// Connect, optionally migrate, and serve until ctrl-c
pub fn serve(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
    migrate: bool,
) -> CliResult<()> {
    if let Some(host) = host {
        config.http.host = host;
    }
    if let Some(port) = port {
        config.http.port = port;
    }

    runtime()?.block_on(async move {
        // the service cannot run without its store
        let store = NoteStore::connect(&config.database).await?;
        if migrate {
            store.migrate().await?;
        }

        let store = Arc::new(store);
        let server = HttpServer::new(Arc::clone(&store), config.http);
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))?;

        store.close().await;
        Ok::<(), CliError>(())
    })
}

/// Create the notes table and exit
pub fn migrate(config: AppConfig) -> CliResult<()> {
    runtime()?.block_on(async move {
        let store = NoteStore::connect(&config.database).await?;
        store.migrate().await?;
        store.close().await;
        write_response(serde_json::json!({
            "migrated": true,
            "dialect": store.dialect().as_str(),
        }))
    })
}

/// Print the resolved configuration
pub fn check_config(config: &AppConfig) -> CliResult<()> {
    write_response(serde_json::to_value(config)?)
}
