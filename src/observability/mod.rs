//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!
//! Request spans come from tower-http's TraceLayer; the request ID
//! travels in the `x-request-id` header.
//! ```

pub mod logging;
