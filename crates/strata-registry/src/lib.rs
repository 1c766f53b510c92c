//! # Strata Registry
//!
//! The selection and registration half of Strata: deciding *which* routes
//! receive *which* middleware stack, and resolving that decision from
//! declarative configuration.
//!
//! - [`SelectionSet`] — ternary inclusion/exclusion sets with a match-all
//!   default
//! - [`StackConfig`] / [`ConfigValue`] / [`FieldNames`] — the typed,
//!   remappable configuration model
//! - [`Registrar`] — binds a middleware stack to a filtered route subset,
//!   resolved explicitly or via [`Registrar::from_config`]
//! - [`MultiRegistrar`] — fans a configuration out into one registrar per
//!   environment and runs them as a single registration pass
//!
//! ## Example
//!
//! ```
//! use strata_core::{handler, FnMiddleware, Handler, Middleware, Reply, RouteTable};
//! use strata_registry::{ConfigValue, Registrar, ResolveOptions, StackConfig};
//! use std::sync::Arc;
//!
//! let timing: Arc<dyn Middleware> =
//!     Arc::new(FnMiddleware::new("timing", |route: &Handler, req| route(req)));
//! let config = StackConfig::new()
//!     .set("MIDDLEWARES", ConfigValue::Middlewares(vec![timing]));
//!
//! let registrar = Registrar::from_config(&config, &ResolveOptions::new())?;
//!
//! let mut app = RouteTable::new();
//! app.insert("index", handler(|_req| Ok(Reply::text("home"))));
//! registrar.init_app(&mut app);
//! # Ok::<(), strata_registry::ConfigError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/strata-registry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod multi;
pub mod registrar;
pub mod selection;

// Re-export main types at crate root
pub use config::{
    ConfigError, ConfigValue, FieldNames, MiddlewareList, SelectionSpec, StackConfig,
    UseForBlueprint,
};
pub use multi::{MultiRegistrar, MultiResolveOptions, RegistrarFactory};
pub use registrar::{Registrar, ResolveOptions, StackFactory, STATIC_VIEW};
pub use selection::SelectionSet;
