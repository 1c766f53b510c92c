//! Multi-handler error dispatch.
//!
//! An [`ErrorHandler`] looks at a route error and either claims it by
//! producing a [`Reply`], or passes with `None`. An [`ErrorDispatcher`]
//! tries an ordered list of handlers; by default the first claim wins and
//! dispatch stops there. Disabling [`ErrorDispatcher::return_delegated`]
//! runs every handler regardless and discards their results, which suits
//! logging-only handlers.
//!
//! The dispatcher is itself an [`ErrorHandler`], so dispatchers compose.

use crate::handler::{Reply, RouteError};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::sync::Arc;

/// A single error-recovery strategy.
///
/// Returning `None` means "no opinion": the error is left for the next
/// handler, or ultimately for the caller to re-raise.
pub trait ErrorHandler: Send + Sync + 'static {
    /// Attempts to turn `error` into a substitute reply.
    fn handle(&self, error: &RouteError) -> Option<Reply>;
}

struct FnHandler<F>(F);

impl<F> ErrorHandler for FnHandler<F>
where
    F: Fn(&RouteError) -> Option<Reply> + Send + Sync + 'static,
{
    fn handle(&self, error: &RouteError) -> Option<Reply> {
        (self.0)(error)
    }
}

/// Wraps a closure into a shared [`ErrorHandler`].
pub fn handler_fn<F>(f: F) -> Arc<dyn ErrorHandler>
where
    F: Fn(&RouteError) -> Option<Reply> + Send + Sync + 'static,
{
    Arc::new(FnHandler(f))
}

/// Tries an ordered list of error handlers against one error.
#[derive(Clone)]
pub struct ErrorDispatcher {
    handlers: Vec<Arc<dyn ErrorHandler>>,
    return_delegated: bool,
}

impl ErrorDispatcher {
    /// Creates a dispatcher over the given handlers.
    ///
    /// Short-circuiting is enabled: the first handler producing a reply
    /// wins and later handlers never run.
    #[must_use]
    pub fn new(handlers: Vec<Arc<dyn ErrorHandler>>) -> Self {
        Self {
            handlers,
            return_delegated: true,
        }
    }

    /// Controls whether the first produced reply short-circuits dispatch.
    ///
    /// With `false`, every handler runs and all results are discarded.
    #[must_use]
    pub fn return_delegated(mut self, return_delegated: bool) -> Self {
        self.return_delegated = return_delegated;
        self
    }

    /// Returns the handlers, in dispatch order.
    #[must_use]
    pub fn handlers(&self) -> &[Arc<dyn ErrorHandler>] {
        &self.handlers
    }

    /// Runs the handlers against `error` in order.
    ///
    /// Returns the winning reply under short-circuiting, or `None` when no
    /// handler claimed the error (always `None` with short-circuiting
    /// disabled).
    #[must_use]
    pub fn dispatch(&self, error: &RouteError) -> Option<Reply> {
        for handler in &self.handlers {
            let outcome = handler.handle(error);

            if self.return_delegated && outcome.is_some() {
                return outcome;
            }
        }

        None
    }
}

impl ErrorHandler for ErrorDispatcher {
    fn handle(&self, error: &RouteError) -> Option<Reply> {
        self.dispatch(error)
    }
}

/// A runtime-checkable error kind.
///
/// Built from a concrete error type; matching is a downcast check against
/// the route error. The kind remembers the type's short name for use in
/// structured payloads.
#[derive(Clone)]
pub struct ErrorKind {
    name: &'static str,
    matches: Arc<dyn Fn(&RouteError) -> bool + Send + Sync>,
}

impl ErrorKind {
    /// Creates the kind for the error type `E`.
    #[must_use]
    pub fn of<E>() -> Self
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        Self {
            name: short_type_name::<E>(),
            matches: Arc::new(|error| error.is::<E>()),
        }
    }

    /// Returns the short name of the underlying type.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns `true` if `error` is of this kind.
    #[must_use]
    pub fn matches(&self, error: &RouteError) -> bool {
        (self.matches)(error)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorKind").field("name", &self.name).finish()
    }
}

fn short_type_name<E>() -> &'static str {
    let full = std::any::type_name::<E>();
    full.rsplit("::").next().unwrap_or(full)
}

/// How a handler picks the status code for its substitute reply.
#[derive(Clone)]
pub enum StatusResolver {
    /// Always the same status.
    Fixed(StatusCode),
    /// Derived from the error at dispatch time.
    Derived(Arc<dyn Fn(&RouteError) -> StatusCode + Send + Sync>),
}

impl StatusResolver {
    /// Creates a resolver computing the status from the error.
    pub fn derived<F>(f: F) -> Self
    where
        F: Fn(&RouteError) -> StatusCode + Send + Sync + 'static,
    {
        Self::Derived(Arc::new(f))
    }

    /// Resolves the status for `error`.
    #[must_use]
    pub fn resolve(&self, error: &RouteError) -> StatusCode {
        match self {
            Self::Fixed(status) => *status,
            Self::Derived(f) => f(error),
        }
    }
}

impl From<StatusCode> for StatusResolver {
    fn from(status: StatusCode) -> Self {
        Self::Fixed(status)
    }
}

/// The structured body emitted for a claimed error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable error message.
    pub message: String,
    /// Short name of the matched error kind.
    pub kind: String,
}

/// An error handler gated on the error's runtime type.
///
/// The handler claims an error only when it matches any of the configured
/// kinds (or all of them under [`TypedJsonHandler::require_all`]); only
/// then does the formatting logic run, producing an [`ErrorPayload`] JSON
/// reply with a fixed or derived status code. A non-matching error is a
/// normal skip, never a failure.
///
/// An empty kind list matches nothing.
#[derive(Clone)]
pub struct TypedJsonHandler {
    kinds: Vec<ErrorKind>,
    require_all: bool,
    status: StatusResolver,
}

impl TypedJsonHandler {
    /// Creates a handler for the given kinds and status.
    #[must_use]
    pub fn new(kinds: Vec<ErrorKind>, status: impl Into<StatusResolver>) -> Self {
        Self {
            kinds,
            require_all: false,
            status: status.into(),
        }
    }

    /// Requires the error to match every configured kind instead of any.
    #[must_use]
    pub fn require_all(mut self, require_all: bool) -> Self {
        self.require_all = require_all;
        self
    }

    fn matched_kind(&self, error: &RouteError) -> Option<&ErrorKind> {
        if self.kinds.is_empty() {
            return None;
        }

        if self.require_all {
            self.kinds
                .iter()
                .all(|kind| kind.matches(error))
                .then(|| &self.kinds[0])
        } else {
            self.kinds.iter().find(|kind| kind.matches(error))
        }
    }
}

impl ErrorHandler for TypedJsonHandler {
    fn handle(&self, error: &RouteError) -> Option<Reply> {
        let kind = self.matched_kind(error)?;
        let payload = ErrorPayload {
            message: error.to_string(),
            kind: kind.name().to_string(),
        };

        Some(Reply::json(&payload, self.status.resolve(error)))
    }
}
