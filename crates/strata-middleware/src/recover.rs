//! Error recovery middleware.
//!
//! [`RecoveryMiddleware`] runs the route inside a protected region. A
//! failure is offered to an [`ErrorDispatcher`]; a claimed error becomes
//! the substitute reply, an unclaimed one is re-raised to the next layer
//! (or the host framework's own fault boundary). An optional fallback
//! handler gets the last word before re-raising.

use strata_core::{ErrorDispatcher, ErrorHandler, Handler, Middleware, Request, RouteResult};
use std::sync::Arc;

/// Turns route errors into replies via an [`ErrorDispatcher`].
#[derive(Clone)]
pub struct RecoveryMiddleware {
    dispatcher: ErrorDispatcher,
    fallback: Option<Arc<dyn ErrorHandler>>,
}

impl RecoveryMiddleware {
    /// Creates a middleware delegating failures to `dispatcher`.
    ///
    /// Unclaimed errors re-raise.
    #[must_use]
    pub fn new(dispatcher: ErrorDispatcher) -> Self {
        Self {
            dispatcher,
            fallback: None,
        }
    }

    /// Sets a fallback handler consulted when no dispatcher handler
    /// claimed the error.
    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn ErrorHandler>) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

impl Middleware for RecoveryMiddleware {
    fn name(&self) -> &'static str {
        "recovery"
    }

    fn call_route(&self, route: &Handler, request: Request) -> RouteResult {
        match route(request) {
            Ok(reply) => Ok(reply),
            Err(error) => {
                if let Some(reply) = self.dispatcher.dispatch(&error) {
                    tracing::debug!(%error, "error claimed by dispatcher");
                    return Ok(reply);
                }

                if let Some(fallback) = &self.fallback {
                    if let Some(reply) = fallback.handle(&error) {
                        tracing::debug!(%error, "error claimed by fallback handler");
                        return Ok(reply);
                    }
                }

                Err(error)
            }
        }
    }
}
