//! Observability for notesd
//!
//! Logging goes through `tracing`. HTTP requests get a span from
//! `tower_http::trace::TraceLayer`; the dispatcher and store emit events
//! inside it.

mod logging;

pub use logging::{init_logging, LogFormat, DEFAULT_FILTER};
