//! # Strata
//!
//! **Middleware composition and registration for web applications**
//!
//! Strata lets application authors attach cross-cutting behaviors (error
//! handling, status-code interception, redirects, transactional cleanup)
//! to route handlers without modifying the handlers themselves, and
//! control *which* routes receive *which* middleware stack via
//! declarative configuration:
//!
//! - **Deterministic nesting** – an ordered middleware list composes into
//!   one wrapped handler, first entry outermost
//! - **Declarative selection** – ternary inclusion/exclusion sets over
//!   view names and blueprint groups decide where a stack applies
//! - **Layered configuration** – global, per-environment, and per-call
//!   middleware lists merge with explicit precedence rules
//!
//! ## Quick Start
//!
//! ```
//! use strata::prelude::*;
//! use std::sync::Arc;
//!
//! // A route table standing in for the host framework.
//! let mut app = RouteTable::new();
//! app.insert("blog.index", handler(|_req| Ok(Reply::text("posts"))));
//!
//! // One middleware, applied to the "blog" blueprint only.
//! let timing: Arc<dyn Middleware> =
//!     Arc::new(FnMiddleware::new("timing", |route: &Handler, req| route(req)));
//! let config = StackConfig::new()
//!     .set("MIDDLEWARES", ConfigValue::Middlewares(vec![timing]))
//!     .set(
//!         "BLUEPRINTS",
//!         ConfigValue::Selection(SelectionSpec::One("blog".to_string())),
//!     );
//!
//! let registrar = Registrar::from_config(&config, &ResolveOptions::new())?;
//! registrar.init_app(&mut app);
//! # Ok::<(), strata::registry::ConfigError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! configuration ──► Registrar::from_config ──► Registrar
//!                                                  │ init_app
//!                                                  ▼
//! request → stack[0] → stack[1] → ... → route   (per eligible view)
//! reply   ← stack[0] ← stack[1] ← ... ←──┘
//! ```

#![doc(html_root_url = "https://docs.rs/strata/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use strata_core as core;

// Re-export standard middleware variants
pub use strata_middleware as middleware;

// Re-export selection/configuration/registration types
pub use strata_registry as registry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use strata::prelude::*;
/// ```
pub mod prelude {
    pub use strata_core::{
        handler, handler_fn, ErrorDispatcher, ErrorHandler, ErrorKind, FnMiddleware, Handler,
        Middleware, MiddlewareExt, MiddlewareStack, Reply, Request, Response, RouteError,
        RouteResolutionError, RouteResult, RouteTable, StatusResolver, TypedJsonHandler,
        UrlResolver, ViewRegistry,
    };

    // Re-export standard middleware
    pub use strata_middleware::{
        AbortMiddleware, RecoveryMiddleware, RedirectMiddleware, StatusRanges,
        TransactionMiddleware, TransactionResource,
    };

    // Re-export configuration and registration types
    pub use strata_registry::{
        ConfigError, ConfigValue, FieldNames, MultiRegistrar, MultiResolveOptions, Registrar,
        ResolveOptions, SelectionSet, SelectionSpec, StackConfig, UseForBlueprint,
    };
}
