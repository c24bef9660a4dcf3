//! Middleware chain composition and execution.

use std::fmt;
use std::sync::Arc;

use axum::response::Response;

use crate::routing::{ChainError, Flow, Handler, Middleware, RequestContext};

/// Ordered `[m1, .., mk, handler]` sequence for one route.
///
/// Immutable once composed and cheap to clone; concurrent executions share
/// nothing but the stage functions themselves.
#[derive(Clone)]
pub struct Chain {
    middleware: Arc<[Arc<dyn Middleware>]>,
    handler: Arc<dyn Handler>,
}

impl Chain {
    pub fn compose(handler: Arc<dyn Handler>, middleware: &[Arc<dyn Middleware>]) -> Self {
        Self {
            middleware: middleware.into(),
            handler,
        }
    }

    /// Number of stages, handler included. Never zero.
    pub fn len(&self) -> usize {
        self.middleware.len() + 1
    }

    pub fn middleware_names(&self) -> Vec<&str> {
        self.middleware.iter().map(|m| m.name()).collect()
    }

    /// Run the chain against a fresh context.
    ///
    /// Stops at the first middleware that returns [`Flow::Terminated`] or
    /// fails; the handler only runs when every middleware proceeded.
    pub async fn run(&self, mut ctx: RequestContext) -> Result<Response, ChainError> {
        for middleware in self.middleware.iter() {
            match middleware.call(&mut ctx).await? {
                Flow::Proceed => {}
                Flow::Terminated(response) => {
                    tracing::debug!(
                        middleware = middleware.name(),
                        path = ctx.path(),
                        status = %response.status(),
                        "Chain terminated by middleware"
                    );
                    return Ok(response);
                }
            }
        }
        self.handler.call(ctx).await
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("middleware", &self.middleware_names())
            .finish_non_exhaustive()
    }
}
