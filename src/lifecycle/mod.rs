//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging → Build route table → Bind → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//! ```
//!
//! # Design Decisions
//! - The route table is built and validated before the listener is bound
//! - Shutdown is a broadcast so tests can stop a running server

pub mod shutdown;

pub use shutdown::Shutdown;
