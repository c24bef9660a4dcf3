//! Session routes: login, register, logout.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::app::{json_error, Services};
use crate::backend::BackendError;
use crate::config::schema::SessionConfig;
use crate::routing::{ChainError, RequestContext};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

fn session_cookie(session: &SessionConfig, token: &str) -> String {
    format!("{}={token}; Path=/; HttpOnly; SameSite=Lax", session.cookie_name)
}

fn expired_cookie(session: &SessionConfig) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", session.cookie_name)
}

async fn credentials(
    services: &Services,
    ctx: &mut RequestContext,
) -> Result<Result<Credentials, Response>, ChainError> {
    Ok(ctx
        .json::<Credentials>(services.max_body_bytes)
        .await?
        .map_err(|e| json_error(StatusCode::BAD_REQUEST, e)))
}

pub async fn login(services: Services, mut ctx: RequestContext) -> Result<Response, ChainError> {
    let creds = match credentials(&services, &mut ctx).await? {
        Ok(creds) => creds,
        Err(rejected) => return Ok(rejected),
    };

    match services.identity.login(&creds.username, &creds.password).await {
        Ok(token) => {
            tracing::info!(username = %creds.username, "User logged in");
            Ok((
                [(header::SET_COOKIE, session_cookie(&services.session, &token))],
                Json(serde_json::json!({ "username": creds.username })),
            )
                .into_response())
        }
        Err(BackendError::InvalidCredentials) => {
            tracing::warn!(username = %creds.username, "Login failed");
            Ok(json_error(StatusCode::UNAUTHORIZED, BackendError::InvalidCredentials))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn register(services: Services, mut ctx: RequestContext) -> Result<Response, ChainError> {
    let creds = match credentials(&services, &mut ctx).await? {
        Ok(creds) => creds,
        Err(rejected) => return Ok(rejected),
    };

    match services.identity.register(&creds.username, &creds.password).await {
        Ok(id) => Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id, "username": creds.username.trim() })),
        )
            .into_response()),
        Err(e @ BackendError::UserExists(_)) => Ok(json_error(StatusCode::CONFLICT, e)),
        Err(e @ BackendError::InvalidInput(_)) => Ok(json_error(StatusCode::BAD_REQUEST, e)),
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(services: Services, ctx: RequestContext) -> Result<Response, ChainError> {
    let token = ctx.cookie(&services.session.cookie_name).map(str::to_owned);
    if let Some(token) = token {
        services.identity.logout(&token).await;
    }
    Ok((
        [(header::SET_COOKIE, expired_cookie(&services.session))],
        StatusCode::NO_CONTENT,
    )
        .into_response())
}
