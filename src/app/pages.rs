//! Page routes.

use axum::response::Response;

use crate::app::Services;
use crate::routing::{ChainError, RequestContext};

pub async fn index(services: Services, _ctx: RequestContext) -> Result<Response, ChainError> {
    Ok(services.pages.respond("index.html").await?)
}

pub async fn home(services: Services, _ctx: RequestContext) -> Result<Response, ChainError> {
    Ok(services.pages.respond("home.html").await?)
}

pub async fn admin(services: Services, _ctx: RequestContext) -> Result<Response, ChainError> {
    Ok(services.pages.respond("admin.html").await?)
}
