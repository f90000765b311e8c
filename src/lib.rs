//! notesd - a minimal notes service
//!
//! An HTTP action dispatcher over a dialect-aware relational note store.

pub mod cli;
pub mod config;
pub mod http_server;
pub mod notes;
pub mod observability;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use notes::Note;
pub use store::{DatabaseConfig, Dialect, NoteStore};
