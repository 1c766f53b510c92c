//! Transactional cleanup middleware.
//!
//! [`TransactionMiddleware`] brackets the route with an opaque
//! [`TransactionResource`]: the transaction is committed after a
//! successful route, and rolled back when the route fails. A failing
//! commit also rolls back, and its error propagates as the route error.
//! The chaining layer never swallows a failure here; it stays
//! resource-local.

use strata_core::{Handler, Middleware, Request, RouteError, RouteResult};
use std::sync::Arc;

/// An opaque commit/rollback resource, typically a database session.
///
/// Implementations are shared across requests and must be internally
/// synchronized.
pub trait TransactionResource: Send + Sync + 'static {
    /// Commits the work performed by the wrapped route.
    fn commit(&self) -> Result<(), RouteError>;

    /// Discards the work performed by the wrapped route.
    fn rollback(&self);
}

/// Commits after success, rolls back on failure.
#[derive(Clone)]
pub struct TransactionMiddleware {
    resource: Arc<dyn TransactionResource>,
}

impl TransactionMiddleware {
    /// Creates a middleware guarding `resource`.
    #[must_use]
    pub fn new(resource: Arc<dyn TransactionResource>) -> Self {
        Self { resource }
    }
}

impl Middleware for TransactionMiddleware {
    fn name(&self) -> &'static str {
        "transaction"
    }

    fn call_route(&self, route: &Handler, request: Request) -> RouteResult {
        match route(request) {
            Ok(reply) => {
                if let Err(error) = self.resource.commit() {
                    tracing::debug!(%error, "commit failed, rolling back");
                    self.resource.rollback();
                    return Err(error);
                }
                Ok(reply)
            }
            Err(error) => {
                self.resource.rollback();
                Err(error)
            }
        }
    }
}
