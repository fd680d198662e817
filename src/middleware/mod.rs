//! Middleware layer.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: structured request logging, metrics, request-id
//! injection, and authentication-header inspection.
//!
//! A middleware is a handler factory: [`Middleware::apply`] takes the next
//! handler in the chain and returns a new one with the identical shape, so
//! middlewares compose with each other and with route handlers freely.
//! [`Router::wrap`](crate::Router::wrap) runs the composition once at
//! startup — nothing is rebuilt per request.
//!
//! Built-in middleware:
//! - [`logging::LoggingMiddleware`] — start/completion entries per request
//!   with method, path, status, latency, at a per-path configurable level.

pub mod logging;

pub use logging::LoggingMiddleware;

use crate::handler::DynHandler;

/// A composable unit that wraps a handler with cross-cutting behavior while
/// preserving its call signature.
///
/// `apply` is called once per route when the pipeline is assembled. The
/// returned handler is shared read-only across all concurrent requests, so
/// implementations keep their configuration in `self` (or clone it into the
/// wrapper) and create any per-request state inside `call`.
pub trait Middleware: Send + Sync + 'static {
    fn apply(&self, next: DynHandler) -> DynHandler;
}
