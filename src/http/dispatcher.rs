//! Registers the route table with the host router.
//!
//! # Responsibilities
//! - Register every active entry exactly once, before serving
//! - Merge entries that share a path into one method router
//! - Send unmatched (method, path) pairs to the caller's not-found behavior
//! - Contain chain failures: the request gets a 500, nothing else is affected
//!
//! # Design Decisions
//! - Each chain runs in its own task. A dropped connection drops only the
//!   waiting request future; the task finishes and its response is discarded
//! - Disabled entries are never registered; requests for them fall through

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::routing::MethodRouter;
use axum::Router;

use crate::http::request::request_id;
use crate::http::response;
use crate::routing::{Chain, ChainError, Handler, RequestContext, RouteEntry, RouteTable};

const NOT_FOUND_ORIGIN: &str = "not_found";

/// Built-in not-found behavior.
async fn not_found(_ctx: RequestContext) -> Result<Response, ChainError> {
    Ok(response::not_found())
}

/// Turns a frozen [`RouteTable`] into an [`axum::Router`].
pub struct Dispatcher {
    table: Arc<RouteTable>,
    not_found: Chain,
}

impl Dispatcher {
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self {
            table,
            not_found: Chain::compose(Arc::new(not_found), &[]),
        }
    }

    /// Replace the not-found behavior for unmatched requests.
    pub fn not_found(mut self, handler: impl Handler) -> Self {
        self.not_found = Chain::compose(Arc::new(handler), &[]);
        self
    }

    pub fn table(&self) -> &Arc<RouteTable> {
        &self.table
    }

    /// Register the table. Consumes the dispatcher; the result is final.
    pub fn into_router(self) -> Router {
        let mut by_path: BTreeMap<&str, Vec<&RouteEntry>> = BTreeMap::new();
        for entry in self.table.active() {
            by_path.entry(entry.path.as_str()).or_default().push(entry);
        }

        let mut router = Router::new();
        for (path, entries) in by_path {
            let mut methods = MethodRouter::new();
            for entry in entries {
                tracing::debug!(
                    method = %entry.method,
                    path = %entry.path,
                    middleware = ?entry.chain.middleware_names(),
                    origin = %entry.origin,
                    "Registered route"
                );
                let chain = entry.chain.clone();
                let origin: Arc<str> = Arc::from(entry.origin.as_str());
                methods = methods.on(entry.method.filter(), move |request: Request<Body>| {
                    execute(chain.clone(), Arc::clone(&origin), request)
                });
            }
            let fallback = self.not_found.clone();
            methods = methods.fallback(move |request: Request<Body>| {
                execute(fallback.clone(), Arc::from(NOT_FOUND_ORIGIN), request)
            });
            router = router.route(path, methods);
        }

        let fallback = self.not_found.clone();
        let router = router.fallback(move |request: Request<Body>| {
            execute(fallback.clone(), Arc::from(NOT_FOUND_ORIGIN), request)
        });

        tracing::info!(
            routes = self.table.active().count(),
            reserved = self.table.disabled().count(),
            "Route table registered"
        );
        router
    }
}

/// Run one chain on its own task and turn every outcome into a response.
async fn execute(chain: Chain, origin: Arc<str>, request: Request<Body>) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request_id(&request).unwrap_or_default();

    let task = tokio::spawn(async move { chain.run(RequestContext::new(request)).await });

    match task.await {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            tracing::error!(
                %method,
                %path,
                origin = %origin,
                request_id = %request_id,
                error = %err,
                "Route chain failed"
            );
            response::server_error()
        }
        Err(join) if join.is_panic() => {
            tracing::error!(
                %method,
                %path,
                origin = %origin,
                request_id = %request_id,
                "Route chain panicked"
            );
            response::server_error()
        }
        Err(join) => {
            tracing::error!(%method, %path, origin = %origin, error = %join, "Route chain cancelled");
            response::server_error()
        }
    }
}
