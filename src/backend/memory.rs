//! In-memory collaborators.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::backend::{
    BackendError, Book, BookId, Identity, IdentityBackend, LibraryStore, UserId, UserSummary,
};
use crate::security::password::{hash_password, verify_password};

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    password_hash: String,
    is_admin: bool,
    failed_logins: u32,
}

/// Accounts and sessions held in process memory.
#[derive(Debug, Default)]
pub struct MemoryIdentity {
    accounts: DashMap<String, Account>,
    sessions: DashMap<String, String>,
    next_id: AtomicU64,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an administrator account, typically from bootstrap config.
    pub async fn create_admin(&self, username: &str, password: &str) -> Result<UserId, BackendError> {
        let id = self.register(username, password).await?;
        if let Some(mut account) = self.accounts.get_mut(username.trim()) {
            account.is_admin = true;
        }
        Ok(id)
    }
}

async fn hash_off_thread(password: String) -> Result<String, BackendError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| BackendError::Unavailable(e.to_string()))?
}

async fn verify_off_thread(password: String, hash: String) -> Result<bool, BackendError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| BackendError::Unavailable(e.to_string()))?
}

#[async_trait]
impl IdentityBackend for MemoryIdentity {
    async fn register(&self, username: &str, password: &str) -> Result<UserId, BackendError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(BackendError::InvalidInput(
                "username and password are required".to_string(),
            ));
        }
        if self.accounts.contains_key(username) {
            return Err(BackendError::UserExists(username.to_string()));
        }

        let password_hash = hash_off_thread(password.to_string()).await?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;

        match self.accounts.entry(username.to_string()) {
            Entry::Occupied(_) => Err(BackendError::UserExists(username.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Account {
                    id,
                    password_hash,
                    is_admin: false,
                    failed_logins: 0,
                });
                Ok(id)
            }
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError> {
        let username = username.trim();
        let hash = self
            .accounts
            .get(username)
            .map(|account| account.password_hash.clone())
            .ok_or(BackendError::InvalidCredentials)?;

        if !verify_off_thread(password.to_string(), hash).await? {
            if let Some(mut account) = self.accounts.get_mut(username) {
                account.failed_logins += 1;
            }
            return Err(BackendError::InvalidCredentials);
        }

        let token = uuid::Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), username.to_string());
        Ok(token)
    }

    async fn logout(&self, token: &str) {
        self.sessions.remove(token);
    }

    async fn resolve(&self, token: &str) -> Option<Identity> {
        let username = self.sessions.get(token)?.value().clone();
        let account = self.accounts.get(&username)?;
        Some(Identity {
            user_id: account.id,
            username,
            is_admin: account.is_admin,
        })
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, BackendError> {
        let mut users: Vec<UserSummary> = self
            .accounts
            .iter()
            .map(|entry| UserSummary {
                id: entry.id,
                username: entry.key().clone(),
                is_admin: entry.is_admin,
                failed_logins: entry.failed_logins,
            })
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn reset_counters(&self) -> Result<usize, BackendError> {
        let mut reset = 0;
        for mut account in self.accounts.iter_mut() {
            if account.failed_logins > 0 {
                account.failed_logins = 0;
                reset += 1;
            }
        }
        Ok(reset)
    }
}

/// Book records held in process memory.
#[derive(Debug, Default)]
pub struct MemoryLibrary {
    books: DashMap<BookId, Book>,
    next_id: AtomicU64,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LibraryStore for MemoryLibrary {
    async fn books_for(&self, owner: UserId) -> Result<Vec<Book>, BackendError> {
        let mut books: Vec<Book> = self
            .books
            .iter()
            .filter(|entry| entry.owner == owner)
            .map(|entry| entry.value().clone())
            .collect();
        books.sort_by_key(|b| b.id);
        Ok(books)
    }

    async fn add_book(
        &self,
        owner: UserId,
        title: &str,
        file_name: &str,
    ) -> Result<Book, BackendError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let book = Book {
            id,
            owner,
            title: title.to_string(),
            file_name: file_name.to_string(),
        };
        self.books.insert(id, book.clone());
        Ok(book)
    }

    async fn delete_book(&self, id: BookId) -> Result<Book, BackendError> {
        self.books
            .remove(&id)
            .map(|(_, book)| book)
            .ok_or_else(|| BackendError::NotFound(format!("book {id}")))
    }
}
