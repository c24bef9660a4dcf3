//! Security subsystem.
//!
//! # Responsibilities
//! - Access predicates as chain middleware (login, administrator)
//! - Password hashing for the in-memory identity backend
//!
//! # Design Decisions
//! - Access checks stop the chain; handlers never see unauthorized requests
//! - The resolved identity travels to the handler through request extensions

pub mod access_control;
pub mod password;

pub use access_control::{RequireAdmin, RequireLogin};
