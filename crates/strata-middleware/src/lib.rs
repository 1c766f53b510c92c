//! # Strata Middleware
//!
//! The standard middleware variants shipped with Strata, all built on the
//! [`strata_core`] composition primitives:
//!
//! | Middleware | Purpose |
//! |---|---|
//! | [`AbortMiddleware`] | Replace replies in configured status ranges |
//! | [`RedirectMiddleware`] | Redirect replies in a configured status set |
//! | [`TransactionMiddleware`] | Commit on success, roll back on failure |
//! | [`RecoveryMiddleware`] | Turn route errors into replies via a dispatcher |
//!
//! [`StatusRanges`] is the shared status-code set these variants are
//! configured with.
//!
//! ## Example
//!
//! ```
//! use strata_middleware::{AbortMiddleware, RecoveryMiddleware, StatusRanges};
//! use strata_core::{ErrorDispatcher, MiddlewareStack};
//! use std::sync::Arc;
//!
//! let stack = MiddlewareStack::new(vec![
//!     Arc::new(RecoveryMiddleware::new(ErrorDispatcher::new(vec![]))),
//!     Arc::new(AbortMiddleware::with_ranges(StatusRanges::server_error())),
//! ]);
//! ```

#![doc(html_root_url = "https://docs.rs/strata-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod abort;
pub mod recover;
pub mod redirect;
pub mod status;
pub mod transaction;

// Re-export main types at crate root
pub use abort::{Aborter, AbortMiddleware};
pub use recover::RecoveryMiddleware;
pub use redirect::RedirectMiddleware;
pub use status::StatusRanges;
pub use transaction::{TransactionMiddleware, TransactionResource};
