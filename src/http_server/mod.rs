//! # Notes HTTP Server Module
//!
//! HTTP surface of the notes service.
//!
//! # Endpoints
//!
//! - `/?action=...` (also `/api.php`) - notes dispatcher
//! - `/health` - Health check

pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod errors;
pub mod observability_routes;
pub mod security;
pub mod server;

pub use config::HttpServerConfig;
pub use dispatcher::{notes_routes, Action, NoteDispatcher, Reply};
pub use envelope::Envelope;
pub use errors::{DispatchError, DispatchResult};
pub use server::HttpServer;
