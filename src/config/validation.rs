//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (body limit > 0, parseable bind address)
//! - Reject session settings that would produce unusable cookies or redirects
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("http.max_body_bytes must be greater than zero")]
    BodyLimit,

    #[error("session.cookie_name `{0}` is not a valid cookie name")]
    CookieName(String),

    #[error("session.login_page `{0}` must be an absolute path")]
    LoginPage(String),

    #[error("bootstrap.admin_username must not be empty")]
    AdminUsername,

    #[error("bootstrap.admin_password must not be empty")]
    AdminPassword,
}

fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Check a parsed config, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.http.max_body_bytes == 0 {
        errors.push(ValidationError::BodyLimit);
    }
    if !is_cookie_token(&config.session.cookie_name) {
        errors.push(ValidationError::CookieName(config.session.cookie_name.clone()));
    }
    if !config.session.login_page.starts_with('/') {
        errors.push(ValidationError::LoginPage(config.session.login_page.clone()));
    }
    if config.bootstrap.admin_username.trim().is_empty() {
        errors.push(ValidationError::AdminUsername);
    }
    if config.bootstrap.admin_password.is_empty() {
        errors.push(ValidationError::AdminPassword);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
