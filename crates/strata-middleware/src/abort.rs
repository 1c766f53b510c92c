//! Status-code aborting middleware.
//!
//! [`AbortMiddleware`] invokes the route, inspects the reply's status
//! code, and replaces the reply when the status falls in its configured
//! ranges. The replacement is produced by an injected aborter callback;
//! the default emits a plain-text error response carrying that status.

use crate::status::StatusRanges;
use http::StatusCode;
use strata_core::{Handler, Middleware, Reply, Request, RouteResult};
use std::sync::Arc;

/// Produces the substitute reply for an aborted status.
pub type Aborter = Arc<dyn Fn(StatusCode) -> Reply + Send + Sync>;

/// Replaces replies whose status falls in the configured ranges.
///
/// # Example
///
/// ```
/// use strata_middleware::{AbortMiddleware, StatusRanges};
///
/// // Abort on server errors only.
/// let abort = AbortMiddleware::with_ranges(StatusRanges::server_error());
/// ```
#[derive(Clone)]
pub struct AbortMiddleware {
    ranges: StatusRanges,
    aborter: Aborter,
}

fn default_aborter(status: StatusCode) -> Reply {
    Reply::error(status, status.canonical_reason().unwrap_or("aborted"))
}

impl AbortMiddleware {
    /// Creates a middleware aborting on `400..=500`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ranges(StatusRanges::span(400..501))
    }

    /// Creates a middleware aborting on the given ranges.
    #[must_use]
    pub fn with_ranges(ranges: StatusRanges) -> Self {
        Self {
            ranges,
            aborter: Arc::new(default_aborter),
        }
    }

    /// Replaces the aborter producing the substitute reply.
    #[must_use]
    pub fn with_aborter<F>(mut self, aborter: F) -> Self
    where
        F: Fn(StatusCode) -> Reply + Send + Sync + 'static,
    {
        self.aborter = Arc::new(aborter);
        self
    }

    /// Returns the configured ranges.
    #[must_use]
    pub fn ranges(&self) -> &StatusRanges {
        &self.ranges
    }
}

impl Default for AbortMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for AbortMiddleware {
    fn name(&self) -> &'static str {
        "abort"
    }

    fn call_route(&self, route: &Handler, request: Request) -> RouteResult {
        let reply = route(request)?;
        let status = reply.status_code();

        if self.ranges.contains_status(status) {
            tracing::debug!(status = %status, "reply aborted");
            return Ok((self.aborter)(status));
        }

        Ok(reply)
    }
}
