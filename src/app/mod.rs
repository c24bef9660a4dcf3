//! The bookshelf application served through the route convention.
//!
//! # Data Flow
//! ```text
//! AppConfig
//!     → Services (collaborators + session settings)
//!     → manifest.rs (location → HandlerModule)
//!     → RouteTree (declared, or scanned from routes.dir)
//!     → RouteTable
//! ```
//!
//! Handlers here are thin: decode the request, call one collaborator, encode
//! the answer. Access rules live in the chain, not in the handlers.

pub mod admin;
pub mod auth;
pub mod books;
pub mod manifest;
pub mod pages;

use std::fmt::Display;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::backend::{
    BackendError, DirectoryPages, Identity, IdentityBackend, LibraryStore, MemoryIdentity,
    MemoryLibrary, PageResponder,
};
use crate::config::schema::{AppConfig, SessionConfig};
use crate::routing::{ChainError, RequestContext};

pub use manifest::{build_table, registry, route_tree};

/// Everything a handler may talk to.
#[derive(Clone)]
pub struct Services {
    pub identity: Arc<dyn IdentityBackend>,
    pub library: Arc<dyn LibraryStore>,
    pub pages: Arc<dyn PageResponder>,
    pub session: SessionConfig,
    pub max_body_bytes: usize,
}

impl Services {
    /// In-memory collaborators with the configured administrator seeded.
    pub async fn bootstrap(config: &AppConfig) -> Result<Self, BackendError> {
        let identity = Arc::new(MemoryIdentity::new());
        identity
            .create_admin(
                &config.bootstrap.admin_username,
                &config.bootstrap.admin_password,
            )
            .await?;
        tracing::info!(
            username = %config.bootstrap.admin_username.trim(),
            "Bootstrap administrator created"
        );

        Ok(Self {
            identity,
            library: Arc::new(MemoryLibrary::new()),
            pages: Arc::new(DirectoryPages::new(config.pages.dir.clone())),
            session: config.session.clone(),
            max_body_bytes: config.http.max_body_bytes,
        })
    }
}

pub(crate) fn json_error(status: StatusCode, message: impl Display) -> Response {
    (status, Json(serde_json::json!({ "error": message.to_string() }))).into_response()
}

/// Identity attached by the access middleware of this route.
pub(crate) fn current_identity(ctx: &RequestContext) -> Result<Identity, ChainError> {
    ctx.extensions()
        .get::<Identity>()
        .cloned()
        .ok_or_else(|| ChainError::internal("route reached without an identity"))
}
