//! Route handlers and the reply model.
//!
//! A route handler is a plain callable from a request to a [`RouteResult`].
//! Handlers are shared (`Arc`) so that a single registered route can be
//! wrapped, re-wrapped, and invoked from whatever thread the host framework
//! dispatches to.
//!
//! The [`Reply`] type is the closed union of everything a handler may
//! answer with. Rather than inspecting arbitrary return values at runtime,
//! the possible shapes are tagged variants, and the status-code extraction
//! rule lives in exactly one place: [`Reply::status_code`].

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use std::sync::Arc;

/// The HTTP request type flowing through middleware and handlers.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type produced at the edge of the system.
pub type Response = http::Response<Full<Bytes>>;

/// The error value a route may fail with.
///
/// Routes raise application-defined errors; `anyhow::Error` keeps the
/// position open-ended while still supporting downcast-based matching in
/// error handlers.
pub type RouteError = anyhow::Error;

/// What a route invocation produces.
pub type RouteResult = Result<Reply, RouteError>;

/// A shared route handler.
///
/// Middleware wraps handlers into new handlers of the same shape, so the
/// composed stack is indistinguishable from a bare route to its caller.
pub type Handler = Arc<dyn Fn(Request) -> RouteResult + Send + Sync>;

/// Wraps a closure into a [`Handler`].
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(Request) -> RouteResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// The value a route handler answers with.
///
/// Three shapes are recognized:
///
/// - [`Reply::Response`] — a full response with an inspectable status code
/// - [`Reply::Body`] — a bare payload, implicitly `200 OK`
/// - [`Reply::BodyWithStatus`] — a payload paired with an explicit status
///
/// Anything that is not a full response defaults to `200 OK` unless it
/// carries an explicit status.
#[derive(Debug)]
pub enum Reply {
    /// A complete response.
    Response(Response),
    /// A bare body; the status code is `200 OK`.
    Body(Bytes),
    /// A body paired with an explicit status code.
    BodyWithStatus(Bytes, StatusCode),
}

impl Reply {
    /// Creates a plain-text `200 OK` reply.
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self::Body(Bytes::from(body.into()))
    }

    /// Creates a JSON reply with the given status code.
    #[must_use]
    pub fn json<T: Serialize>(payload: &T, status: StatusCode) -> Self {
        let body = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
        let response = http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))
            .expect("failed to build JSON reply");
        Self::Response(response)
    }

    /// Creates a plain-text error reply with the given status code.
    #[must_use]
    pub fn error(status: StatusCode, message: &str) -> Self {
        let response = http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Full::new(Bytes::from(message.to_string())))
            .expect("failed to build error reply");
        Self::Response(response)
    }

    /// Creates a `302 Found` redirect to the given location.
    #[must_use]
    pub fn redirect(location: &str) -> Self {
        let response = http::Response::builder()
            .status(StatusCode::FOUND)
            .header(http::header::LOCATION, location)
            .body(Full::new(Bytes::new()))
            .expect("failed to build redirect reply");
        Self::Response(response)
    }

    /// Returns the status code carried by this reply.
    ///
    /// Replies without an explicit status are `200 OK`.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Response(response) => response.status(),
            Self::Body(_) => StatusCode::OK,
            Self::BodyWithStatus(_, status) => *status,
        }
    }

    /// Converts this reply into a full response.
    #[must_use]
    pub fn into_response(self) -> Response {
        match self {
            Self::Response(response) => response,
            Self::Body(body) => http::Response::builder()
                .status(StatusCode::OK)
                .body(Full::new(body))
                .expect("failed to build response"),
            Self::BodyWithStatus(body, status) => http::Response::builder()
                .status(status)
                .body(Full::new(body))
                .expect("failed to build response"),
        }
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}

impl From<&str> for Reply {
    fn from(body: &str) -> Self {
        Self::text(body)
    }
}

impl From<String> for Reply {
    fn from(body: String) -> Self {
        Self::text(body)
    }
}
