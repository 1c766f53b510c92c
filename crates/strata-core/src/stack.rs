//! Ordered middleware composition.
//!
//! A [`MiddlewareStack`] folds a sequence of middlewares into a single
//! [`Middleware`]. The first entry in the sequence is the **outermost**
//! layer: it receives control first and sees the downstream result last.
//! The last entry sits directly against the route.
//!
//! ```text
//! stack = [auth, transaction]
//!
//! request → auth → transaction → route
//! reply   ← auth ← transaction ←──┘
//! ```
//!
//! Consumers rely on this ordering when stacking authentication-like outer
//! layers around transactional inner layers; it must never change.

use crate::handler::{Handler, Request, RouteResult};
use crate::middleware::Middleware;
use std::sync::Arc;

/// An ordered sequence of middlewares composed into one.
///
/// The stack owns its sequence; other components replace it only through
/// [`MiddlewareStack::set_middlewares`]. Because the stack is itself a
/// [`Middleware`], stacks nest inside other stacks.
#[derive(Clone, Default, Debug)]
pub struct MiddlewareStack {
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareStack {
    /// Creates a stack from an ordered middleware sequence.
    ///
    /// An empty stack is the identity: decorated routes behave exactly as
    /// if they were never wrapped.
    #[must_use]
    pub fn new(middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self { middlewares }
    }

    /// Returns the composed middlewares, outermost first.
    #[must_use]
    pub fn middlewares(&self) -> &[Arc<dyn Middleware>] {
        &self.middlewares
    }

    /// Replaces the composed sequence.
    pub fn set_middlewares(&mut self, middlewares: Vec<Arc<dyn Middleware>>) {
        self.middlewares = middlewares;
    }

    /// Returns the number of layers in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Returns `true` if the stack has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    /// Returns a new handler routing every call through the whole stack.
    #[must_use]
    pub fn decorate(&self, route: Handler) -> Handler {
        let stack = self.clone();
        Arc::new(move |request| stack.call_route(&route, request))
    }
}

impl Middleware for MiddlewareStack {
    fn name(&self) -> &'static str {
        "stack"
    }

    /// Builds the nesting from the route outward: iterating the sequence
    /// in reverse, each middleware wraps the layer built so far, so the
    /// first middleware ends up outermost.
    fn call_route(&self, route: &Handler, request: Request) -> RouteResult {
        let mut layer = Arc::clone(route);

        for middleware in self.middlewares.iter().rev() {
            let middleware = Arc::clone(middleware);
            let inner = layer;
            layer = Arc::new(move |request| middleware.call_route(&inner, request));
        }

        layer(request)
    }
}
