//! # HTTP Server
//!
//! Axum server combining the notes endpoint with the health check, wrapped
//! in request tracing, panic recovery and the security header middleware.

use std::any::Any;
use std::sync::Arc;

use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::store::NoteStore;

use super::config::HttpServerConfig;
use super::dispatcher::{notes_routes, NoteDispatcher};
use super::errors::DispatchError;
use super::observability_routes::health_routes;
use super::security::security_headers;

/// HTTP server for the notes API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over a connected store
    pub fn new(store: Arc<NoteStore>, config: HttpServerConfig) -> Self {
        let dispatcher = Arc::new(NoteDispatcher::new(store, config.escape_html));
        let router = Self::build_router(dispatcher);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(dispatcher: Arc<NoteDispatcher>) -> Router {
        Router::new()
            .merge(health_routes())
            .merge(notes_routes(dispatcher))
            .fallback(not_found)
            // innermost first: panics become envelopes that still get headers
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::from_fn(security_headers))
            .layer(TraceLayer::new_for_http())
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until ctrl-c
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!(addr = %listener.local_addr()?, "notes API listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("server stopped");
        Ok(())
    }
}

async fn not_found() -> DispatchError {
    DispatchError::NotFound
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal server error".to_string()
    };
    DispatchError::Internal(message).into_response()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
