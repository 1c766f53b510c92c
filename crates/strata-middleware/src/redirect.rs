//! Status-code redirect middleware.
//!
//! [`RedirectMiddleware`] answers with a `302 Found` redirect whenever the
//! downstream reply's status falls in its configured set (by default the
//! moved-permanently/found pair). The redirect target is a route name
//! resolved through an injected [`UrlResolver`]; a name the resolver does
//! not know is treated as a literal URL.

use crate::status::StatusRanges;
use strata_core::{Handler, Middleware, Reply, Request, RouteResult, UrlResolver};
use std::sync::Arc;

/// Redirects replies whose status falls in the configured set.
///
/// # Example
///
/// ```
/// use strata_middleware::RedirectMiddleware;
/// use strata_core::RouteTable;
/// use std::sync::Arc;
///
/// let resolver = Arc::new(RouteTable::new());
/// // "auth.login" resolves through the table, or is used verbatim.
/// let redirect = RedirectMiddleware::new("auth.login", resolver);
/// ```
#[derive(Clone)]
pub struct RedirectMiddleware {
    statuses: StatusRanges,
    target: String,
    resolver: Arc<dyn UrlResolver>,
}

impl RedirectMiddleware {
    /// Creates a middleware redirecting on `301` and `302`.
    #[must_use]
    pub fn new(target: impl Into<String>, resolver: Arc<dyn UrlResolver>) -> Self {
        Self {
            statuses: StatusRanges::of(&[301, 302]),
            target: target.into(),
            resolver,
        }
    }

    /// Replaces the status set triggering the redirect.
    #[must_use]
    pub fn with_statuses(mut self, statuses: StatusRanges) -> Self {
        self.statuses = statuses;
        self
    }

    /// Returns the configured target, unresolved.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Resolves the redirect location, falling back to the literal target.
    fn location(&self) -> String {
        match self.resolver.url_for(&self.target) {
            Ok(url) => url,
            Err(error) => {
                tracing::debug!(target = %self.target, %error, "treating redirect target as a literal URL");
                self.target.clone()
            }
        }
    }
}

impl Middleware for RedirectMiddleware {
    fn name(&self) -> &'static str {
        "redirect"
    }

    fn call_route(&self, route: &Handler, request: Request) -> RouteResult {
        let reply = route(request)?;

        if self.statuses.contains_status(reply.status_code()) {
            return Ok(Reply::redirect(&self.location()));
        }

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;
    use strata_core::{handler, RouteTable};

    fn make_request() -> Request {
        http::Request::builder()
            .uri("/test")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn moved_route() -> Handler {
        handler(|_req| {
            Ok(Reply::BodyWithStatus(
                Bytes::new(),
                StatusCode::MOVED_PERMANENTLY,
            ))
        })
    }

    #[test]
    fn test_matching_status_redirects_to_resolved_url() {
        let mut table = RouteTable::new();
        table.insert_with_url("auth.login", "/login", handler(|_req| Ok(Reply::text("login"))));

        let redirect = RedirectMiddleware::new("auth.login", Arc::new(table));
        let reply = redirect.call_route(&moved_route(), make_request()).unwrap();

        let response = reply.into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(http::header::LOCATION).unwrap(),
            "/login"
        );
    }

    #[test]
    fn test_unknown_name_falls_back_to_literal_url() {
        let redirect = RedirectMiddleware::new("https://example.com/", Arc::new(RouteTable::new()));
        let reply = redirect.call_route(&moved_route(), make_request()).unwrap();

        let response = reply.into_response();
        assert_eq!(
            response.headers().get(http::header::LOCATION).unwrap(),
            "https://example.com/"
        );
    }

    #[test]
    fn test_non_matching_status_passes_through() {
        let redirect = RedirectMiddleware::new("/elsewhere", Arc::new(RouteTable::new()));
        let route = handler(|_req| Ok(Reply::text("ok")));

        let reply = redirect.call_route(&route, make_request()).unwrap();
        assert_eq!(reply.status_code(), StatusCode::OK);
    }

    #[test]
    fn test_custom_status_set() {
        let redirect = RedirectMiddleware::new("/gone", Arc::new(RouteTable::new()))
            .with_statuses(StatusRanges::single(410));
        let route = handler(|_req| Ok(Reply::BodyWithStatus(Bytes::new(), StatusCode::GONE)));

        let reply = redirect.call_route(&route, make_request()).unwrap();
        assert_eq!(reply.status_code(), StatusCode::FOUND);

        // 301 no longer triggers.
        let reply = redirect.call_route(&moved_route(), make_request()).unwrap();
        assert_eq!(reply.status_code(), StatusCode::MOVED_PERMANENTLY);
    }
}
