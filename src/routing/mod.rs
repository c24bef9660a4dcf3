//! Convention-based routing subsystem.
//!
//! # Data Flow
//! ```text
//! Module declarations (ModuleRegistry)
//!     → tree.rs (declared manifest) or scan.rs (directory walk)
//!     → RouteTree (method groups → directories → terminal modules)
//!     → builder.rs (derive (method, path), validate, compose chains)
//!     → RouteTable (frozen, read-only)
//!     → http::dispatcher registers active entries with the server
//!
//! Per request:
//!     matched entry → chain.rs ([m1 .. mk, handler])
//!     → each middleware returns Flow::Proceed or Flow::Terminated(response)
//! ```
//!
//! # Design Decisions
//! - Route table is built once at startup and never mutated
//! - Any build error is fatal: no partially valid table is ever returned
//! - Disabled modules stay in the table as reserved entries so their path
//!   cannot be claimed by a sibling module
//! - Paths are literal; no captures or wildcards

pub mod builder;
pub mod chain;
pub mod context;
pub mod error;
pub mod method;
pub mod module;
pub mod scan;
pub mod table;
pub mod tree;

pub use builder::RouteTableBuilder;
pub use chain::Chain;
pub use context::RequestContext;
pub use error::{BuildError, ChainError};
pub use method::RouteMethod;
pub use module::{Flow, Handler, HandlerModule, Middleware};
pub use table::{RouteEntry, RouteState, RouteTable};
pub use tree::{ModuleRegistry, RouteTree};
