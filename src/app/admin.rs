//! Administration routes. Every one of them sits behind `RequireAdmin`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::app::{json_error, Services};
use crate::backend::{BackendError, BookId};
use crate::routing::{ChainError, RequestContext};

#[derive(Debug, Deserialize)]
pub struct DeleteBook {
    pub id: BookId,
}

pub async fn users(services: Services, _ctx: RequestContext) -> Result<Response, ChainError> {
    Ok(Json(services.identity.list_users().await?).into_response())
}

pub async fn reset_counters(
    services: Services,
    _ctx: RequestContext,
) -> Result<Response, ChainError> {
    let reset = services.identity.reset_counters().await?;
    tracing::info!(reset, "Failed-login counters reset");
    Ok(Json(serde_json::json!({ "reset": reset })).into_response())
}

pub async fn delete_book(
    services: Services,
    mut ctx: RequestContext,
) -> Result<Response, ChainError> {
    let request = match ctx.json::<DeleteBook>(services.max_body_bytes).await? {
        Ok(request) => request,
        Err(e) => return Ok(json_error(StatusCode::BAD_REQUEST, e)),
    };

    match services.library.delete_book(request.id).await {
        Ok(book) => Ok(Json(book).into_response()),
        Err(e @ BackendError::NotFound(_)) => Ok(json_error(StatusCode::NOT_FOUND, e)),
        Err(e) => Err(e.into()),
    }
}

/// Usage counters. Registered but switched off until the page exists.
pub async fn stats(services: Services, _ctx: RequestContext) -> Result<Response, ChainError> {
    let users = services.identity.list_users().await?;
    let failed: u32 = users.iter().map(|u| u.failed_logins).sum();
    Ok(Json(serde_json::json!({ "users": users.len(), "failed_logins": failed })).into_response())
}
