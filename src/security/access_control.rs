//! Access control middleware.
//! Stops unauthenticated or unprivileged requests before the handler runs.

use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::future::BoxFuture;

use crate::backend::{Identity, IdentityBackend};
use crate::routing::{ChainError, Flow, Middleware, RequestContext};

/// Resolve the session cookie to an identity.
///
/// Reuses an identity an earlier stage already attached. Nothing borrowed
/// from the context is held across the backend call.
async fn identify(
    identity: &dyn IdentityBackend,
    cookie_name: &str,
    ctx: &mut RequestContext,
) -> Option<Identity> {
    let known = ctx.extensions().get::<Identity>().cloned();
    if known.is_some() {
        return known;
    }
    let token = ctx.cookie(cookie_name).map(str::to_owned)?;
    identity.resolve(&token).await
}

fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

fn denied(status: StatusCode, message: &'static str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Requires a valid session; otherwise redirects to the login page.
#[derive(Clone)]
pub struct RequireLogin {
    identity: Arc<dyn IdentityBackend>,
    cookie_name: String,
    login_page: String,
}

impl RequireLogin {
    pub fn new(
        identity: Arc<dyn IdentityBackend>,
        cookie_name: impl Into<String>,
        login_page: impl Into<String>,
    ) -> Self {
        Self {
            identity,
            cookie_name: cookie_name.into(),
            login_page: login_page.into(),
        }
    }
}

impl Middleware for RequireLogin {
    fn name(&self) -> &str {
        "require_login"
    }

    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, Result<Flow, ChainError>> {
        Box::pin(async move {
            match identify(self.identity.as_ref(), &self.cookie_name, ctx).await {
                Some(user) => {
                    ctx.extensions_mut().insert(user);
                    Ok(Flow::Proceed)
                }
                None => Ok(Flow::Terminated(redirect(&self.login_page))),
            }
        })
    }
}

/// Requires a session that belongs to an administrator.
#[derive(Clone)]
pub struct RequireAdmin {
    identity: Arc<dyn IdentityBackend>,
    cookie_name: String,
}

impl RequireAdmin {
    pub fn new(identity: Arc<dyn IdentityBackend>, cookie_name: impl Into<String>) -> Self {
        Self {
            identity,
            cookie_name: cookie_name.into(),
        }
    }
}

impl Middleware for RequireAdmin {
    fn name(&self) -> &str {
        "require_admin"
    }

    fn call<'a>(&'a self, ctx: &'a mut RequestContext) -> BoxFuture<'a, Result<Flow, ChainError>> {
        Box::pin(async move {
            match identify(self.identity.as_ref(), &self.cookie_name, ctx).await {
                None => Ok(Flow::Terminated(denied(
                    StatusCode::UNAUTHORIZED,
                    "authentication required",
                ))),
                Some(user) if !user.is_admin => {
                    tracing::warn!(user = %user.username, path = ctx.path(), "Admin route denied");
                    Ok(Flow::Terminated(denied(
                        StatusCode::FORBIDDEN,
                        "administrator required",
                    )))
                }
                Some(user) => {
                    ctx.extensions_mut().insert(user);
                    Ok(Flow::Proceed)
                }
            }
        })
    }
}
