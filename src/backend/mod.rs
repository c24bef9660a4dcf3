//! External collaborators consumed by route handlers.
//!
//! # Data Flow
//! ```text
//! handler / access middleware
//!     → IdentityBackend (sessions, accounts, counters)
//!     → LibraryStore (book records)
//!     → PageResponder (named HTML pages)
//! ```
//!
//! # Design Decisions
//! - Traits are the seam: handlers never see concrete storage
//! - In-memory implementations back the default binary and the tests
//! - Payloads are opaque to the routing layer

pub mod memory;
pub mod pages;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub use memory::{MemoryIdentity, MemoryLibrary};
pub use pages::{DirectoryPages, PageResponder};

pub type UserId = u64;
pub type BookId = u64;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("user `{0}` already exists")]
    UserExists(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Resolved session owner, attached to the request by access middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: UserId,
    pub username: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub username: String,
    pub is_admin: bool,
    pub failed_logins: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Book {
    pub id: BookId,
    pub owner: UserId,
    pub title: String,
    pub file_name: String,
}

/// Accounts and sessions.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    async fn register(&self, username: &str, password: &str) -> Result<UserId, BackendError>;

    /// Verify credentials and issue a session token.
    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError>;

    async fn logout(&self, token: &str);

    /// Owner of a session token, or `None` when unauthenticated.
    async fn resolve(&self, token: &str) -> Option<Identity>;

    async fn list_users(&self) -> Result<Vec<UserSummary>, BackendError>;

    /// Reset every failed-login counter; returns how many were non-zero.
    async fn reset_counters(&self) -> Result<usize, BackendError>;
}

/// Book records.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    async fn books_for(&self, owner: UserId) -> Result<Vec<Book>, BackendError>;

    async fn add_book(
        &self,
        owner: UserId,
        title: &str,
        file_name: &str,
    ) -> Result<Book, BackendError>;

    async fn delete_book(&self, id: BookId) -> Result<Book, BackendError>;
}
