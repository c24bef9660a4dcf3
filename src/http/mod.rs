//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers, graceful shutdown)
//!     → request.rs (add request ID)
//!     → dispatcher.rs (method + path → route chain, or not-found)
//!     → chain runs on its own task
//!     → response.rs (generic 404 / 500 bodies)
//!     → Send to client
//! ```

pub mod dispatcher;
pub mod request;
pub mod response;
pub mod server;

pub use dispatcher::Dispatcher;
pub use request::{request_id, X_REQUEST_ID};
pub use server::HttpServer;
