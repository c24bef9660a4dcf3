//! Routing error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::backend::BackendError;
use crate::routing::RouteMethod;

/// Fatal route table configuration error, raised at startup.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("unknown top-level route group `{name}`")]
    UnknownGroup { name: String },

    #[error("route groups `{first}` and `{second}` both map to {method}")]
    DuplicateGroup {
        method: RouteMethod,
        first: String,
        second: String,
    },

    #[error("module `{origin}` is not inside a method group")]
    ModuleOutsideGroup { origin: String },

    #[error("module `{origin}` has no default handler")]
    MissingHandler { origin: String },

    #[error("{method} {path} is defined by both `{first}` and `{second}`")]
    DuplicateRoute {
        method: RouteMethod,
        path: String,
        first: String,
        second: String,
    },

    #[error("invalid path segment `{segment}` in `{origin}`")]
    InvalidSegment { segment: String, origin: String },

    #[error("route directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("failed to scan route directory: {0}")]
    Scan(#[from] walkdir::Error),
}

/// Failure while executing a route chain for one request.
///
/// Contained by the dispatcher: the request gets a generic 500 and nothing
/// else is affected.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("backend call failed: {0}")]
    Backend(#[from] BackendError),

    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),

    #[error("{0}")]
    Internal(String),
}

impl ChainError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
