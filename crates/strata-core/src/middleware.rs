//! The core middleware trait.
//!
//! A middleware is a unit of cross-cutting behavior wrapped around a route
//! handler. It never owns the route it decorates; the route is passed as a
//! parameter at call time, so one middleware instance can safely serve
//! every route it is registered against.
//!
//! # Example
//!
//! ```
//! use strata_core::{handler, Middleware, Handler, Reply, Request, RouteResult};
//!
//! struct Tagging;
//!
//! impl Middleware for Tagging {
//!     fn name(&self) -> &'static str {
//!         "tagging"
//!     }
//!
//!     fn call_route(&self, route: &Handler, request: Request) -> RouteResult {
//!         // Pre-processing happens here.
//!         let reply = route(request)?;
//!         // Post-processing happens here.
//!         Ok(reply)
//!     }
//! }
//! ```

use crate::handler::{Handler, Request, RouteResult};
use std::fmt;
use std::sync::Arc;

/// A composable wrapper around a route handler.
///
/// Implementations intercept before, after, or on failure of the wrapped
/// route. The default behavior is to invoke the route unchanged.
///
/// # Invariants
///
/// - Middleware MUST invoke the route at most once per call
/// - Middleware MUST NOT retain the route beyond the call
/// - Middleware objects are shared across calls and threads; mutable
///   configuration must not change while requests are in flight
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware, used in registration logs.
    fn name(&self) -> &'static str;

    /// Invokes `route` with the given request, surrounding it with this
    /// middleware's behavior.
    ///
    /// The default implementation is a transparent pass-through.
    fn call_route(&self, route: &Handler, request: Request) -> RouteResult {
        route(request)
    }
}

impl fmt::Debug for dyn Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").field("name", &self.name()).finish()
    }
}

/// Extension methods available on any shared middleware.
pub trait MiddlewareExt {
    /// Returns a new handler that routes every call through this
    /// middleware before reaching `route`.
    fn decorate(&self, route: Handler) -> Handler;
}

impl<M> MiddlewareExt for Arc<M>
where
    M: Middleware + ?Sized,
{
    fn decorate(&self, route: Handler) -> Handler {
        let middleware = Arc::clone(self);
        Arc::new(move |request| middleware.call_route(&route, request))
    }
}

/// A middleware built from a named closure.
///
/// Useful for one-off behaviors that do not warrant a dedicated type.
///
/// # Example
///
/// ```
/// use strata_core::{FnMiddleware, Handler};
///
/// let timing = FnMiddleware::new("timing", |route: &Handler, request| {
///     route(request)
/// });
/// ```
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Middleware for FnMiddleware<F>
where
    F: Fn(&Handler, Request) -> RouteResult + Send + Sync + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn call_route(&self, route: &Handler, request: Request) -> RouteResult {
        (self.func)(route, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{handler, Reply};
    use bytes::Bytes;
    use http_body_util::Full;

    fn make_request() -> Request {
        http::Request::builder()
            .uri("/test")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    struct PassThrough;

    impl Middleware for PassThrough {
        fn name(&self) -> &'static str {
            "pass-through"
        }
    }

    #[test]
    fn test_default_call_route_is_transparent() {
        let route = handler(|_request| Ok(Reply::text("untouched")));
        let reply = PassThrough.call_route(&route, make_request()).unwrap();
        assert_eq!(reply.status_code(), http::StatusCode::OK);
    }

    #[test]
    fn test_decorate_produces_equivalent_handler() {
        let middleware: Arc<dyn Middleware> = Arc::new(PassThrough);
        let route = handler(|_request| Ok(Reply::text("ok")));
        let wrapped = middleware.decorate(route);

        let reply = wrapped(make_request()).unwrap();
        assert_eq!(reply.status_code(), http::StatusCode::OK);
    }

    #[test]
    fn test_fn_middleware_intercepts() {
        let short_circuit = FnMiddleware::new("short-circuit", |_route: &Handler, _request| {
            Ok(Reply::error(http::StatusCode::FORBIDDEN, "blocked"))
        });
        let route = handler(|_request| Ok(Reply::text("never reached")));

        let reply = short_circuit.call_route(&route, make_request()).unwrap();
        assert_eq!(reply.status_code(), http::StatusCode::FORBIDDEN);
        assert_eq!(short_circuit.name(), "short-circuit");
    }
}
