//! # Strata Core
//!
//! Core primitives for the Strata middleware-composition layer:
//!
//! - the [`Handler`]/[`Reply`] model routes are expressed in
//! - the [`Middleware`] trait and [`MiddlewareStack`] composition
//! - multi-handler error recovery via [`ErrorDispatcher`]
//! - the minimal host-framework surface ([`ViewRegistry`], [`UrlResolver`])
//!   plus the in-memory [`RouteTable`] reference binding
//!
//! ## Composition model
//!
//! A middleware stack nests outermost-first: the first entry receives
//! control first and sees the downstream result last.
//!
//! ```text
//! request → stack[0] → stack[1] → ... → route
//! reply   ← stack[0] ← stack[1] ← ... ←──┘
//! ```
//!
//! ## Example
//!
//! ```
//! use strata_core::{handler, MiddlewareStack, Reply};
//!
//! let stack = MiddlewareStack::default();
//! let route = handler(|_req| Ok(Reply::text("hello")));
//! let _wrapped = stack.decorate(route);
//! ```

#![doc(html_root_url = "https://docs.rs/strata-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod app;
pub mod dispatch;
pub mod handler;
pub mod middleware;
pub mod stack;

// Re-export main types at crate root
pub use app::{RouteResolutionError, RouteTable, UrlResolver, ViewRegistry};
pub use dispatch::{
    handler_fn, ErrorDispatcher, ErrorHandler, ErrorKind, ErrorPayload, StatusResolver,
    TypedJsonHandler,
};
pub use handler::{handler, Handler, Reply, Request, Response, RouteError, RouteResult};
pub use middleware::{FnMiddleware, Middleware, MiddlewareExt};
pub use stack::MiddlewareStack;
