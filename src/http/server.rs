//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Register the route table through the dispatcher
//! - Wire up middleware (tracing, body limit, request ID)
//! - Bind server to listener
//! - Stop on Ctrl+C or on the shared shutdown signal

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::http::dispatcher::Dispatcher;
use crate::http::request::with_request_id;
use crate::routing::RouteTable;

/// HTTP server serving one frozen route table.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server for the given table.
    pub fn new(table: Arc<RouteTable>, max_body_bytes: usize) -> Self {
        Self::from_dispatcher(Dispatcher::new(table), max_body_bytes)
    }

    /// Create a server from a dispatcher that was already customized.
    pub fn from_dispatcher(dispatcher: Dispatcher, max_body_bytes: usize) -> Self {
        Self {
            router: Self::build_router(dispatcher, max_body_bytes),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(dispatcher: Dispatcher, max_body_bytes: usize) -> Router {
        let router = dispatcher
            .into_router()
            .layer(RequestBodyLimitLayer::new(max_body_bytes))
            .layer(TraceLayer::new_for_http());
        with_request_id(router)
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Wait for Ctrl+C or the shutdown broadcast, whichever comes first.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                // Without a signal handler only the broadcast can stop us.
                let _ = shutdown.recv().await;
            }
        }
        _ = shutdown.recv() => {}
    }
    tracing::info!("Shutdown signal received");
}
