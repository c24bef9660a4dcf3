//! Handler modules: the smallest routing unit.
//!
//! A module pairs one default handler with an ordered middleware list and a
//! disabled marker. Modules are plain values; the builder turns them into
//! frozen [`Chain`](crate::routing::Chain)s.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::routing::{ChainError, RequestContext};

/// Outcome of one middleware stage.
#[derive(Debug)]
pub enum Flow {
    /// Run the next stage.
    Proceed,
    /// Stop the chain and answer with this response.
    Terminated(Response),
}

/// Default request handler of a module. Always the last chain stage.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, ctx: RequestContext) -> BoxFuture<'static, Result<Response, ChainError>>;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, ChainError>> + Send + 'static,
{
    fn call(&self, ctx: RequestContext) -> BoxFuture<'static, Result<Response, ChainError>> {
        Box::pin(self(ctx))
    }
}

/// A stage that runs before the handler and may stop the chain.
pub trait Middleware: Send + Sync + 'static {
    /// Name used in logs and route listings.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
            .rsplit("::")
            .next()
            .unwrap_or("middleware")
    }

    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, Result<Flow, ChainError>>;
}

/// One terminal module of the route convention.
#[derive(Clone, Default)]
pub struct HandlerModule {
    pub(crate) handler: Option<Arc<dyn Handler>>,
    pub(crate) middleware: Vec<Arc<dyn Middleware>>,
    pub(crate) disabled: bool,
}

impl HandlerModule {
    pub fn new(handler: impl Handler) -> Self {
        Self {
            handler: Some(Arc::new(handler)),
            middleware: Vec::new(),
            disabled: false,
        }
    }

    /// Append a middleware stage. Stages run in the order they are added.
    pub fn middleware(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Append an already shared middleware stage.
    pub fn shared_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl fmt::Debug for HandlerModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerModule")
            .field("handler", &self.handler.is_some())
            .field(
                "middleware",
                &self.middleware.iter().map(|m| m.name()).collect::<Vec<_>>(),
            )
            .field("disabled", &self.disabled)
            .finish()
    }
}
