//! The host-framework surface.
//!
//! Strata never owns routing. It consumes the host application through two
//! narrow traits: [`ViewRegistry`] (enumerate registered views, swap a
//! handler) and [`UrlResolver`] (turn a route name into a URL). Any
//! framework binding that implements them can be registered against.
//!
//! [`RouteTable`] is the in-memory reference implementation, used by the
//! test suite and as the minimal standalone binding.

use crate::handler::Handler;
use indexmap::IndexMap;
use thiserror::Error;

/// Raised when a route name cannot be resolved to a URL.
///
/// Callers recover by treating the name as a literal URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no route registered under the name \"{name}\"")]
pub struct RouteResolutionError {
    /// The name that failed to resolve.
    pub name: String,
}

impl RouteResolutionError {
    /// Creates the error for `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The registry of view functions owned by the host application.
///
/// View identifiers are dot-separated: everything before the final token
/// names the blueprint path (`"blog.index"` lives in blueprint `"blog"`),
/// an undotted identifier is a root view. The identifier `"static"` is
/// reserved by convention for the host's asset view.
pub trait ViewRegistry {
    /// Returns every registered view with its current handler, in the
    /// registry's reported order.
    fn views(&self) -> Vec<(String, Handler)>;

    /// Replaces the handler registered under `view_id`.
    ///
    /// Unknown identifiers are ignored.
    fn replace_view(&mut self, view_id: &str, handler: Handler);
}

/// Resolves route names to URLs.
pub trait UrlResolver: Send + Sync {
    /// Returns the URL for the route registered under `name`.
    fn url_for(&self, name: &str) -> Result<String, RouteResolutionError>;
}

/// An insertion-ordered, in-memory view registry.
///
/// # Example
///
/// ```
/// use strata_core::{handler, Reply, RouteTable, ViewRegistry};
///
/// let mut table = RouteTable::new();
/// table.insert("blog.index", handler(|_req| Ok(Reply::text("posts"))));
/// assert_eq!(table.views().len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct RouteTable {
    views: IndexMap<String, Handler>,
    urls: IndexMap<String, String>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a view handler.
    pub fn insert(&mut self, view_id: impl Into<String>, handler: Handler) {
        self.views.insert(view_id.into(), handler);
    }

    /// Registers a view handler together with its URL.
    pub fn insert_with_url(
        &mut self,
        view_id: impl Into<String>,
        url: impl Into<String>,
        handler: Handler,
    ) {
        let view_id = view_id.into();
        self.urls.insert(view_id.clone(), url.into());
        self.views.insert(view_id, handler);
    }

    /// Returns the handler currently registered under `view_id`.
    #[must_use]
    pub fn handler(&self, view_id: &str) -> Option<&Handler> {
        self.views.get(view_id)
    }

    /// Returns the number of registered views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Returns `true` if no views are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

impl ViewRegistry for RouteTable {
    fn views(&self) -> Vec<(String, Handler)> {
        self.views
            .iter()
            .map(|(view_id, handler)| (view_id.clone(), handler.clone()))
            .collect()
    }

    fn replace_view(&mut self, view_id: &str, handler: Handler) {
        if let Some(slot) = self.views.get_mut(view_id) {
            *slot = handler;
        }
    }
}

impl UrlResolver for RouteTable {
    fn url_for(&self, name: &str) -> Result<String, RouteResolutionError> {
        self.urls
            .get(name)
            .cloned()
            .ok_or_else(|| RouteResolutionError::new(name))
    }
}
