//! Built-in Kubernetes health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the pod serve traffic? Failure → pulled from load-balancer. |
//!
//! Register them on your router, and pair them with a `Debug` log-filter
//! rule so probe traffic stays out of your Info-level logs:
//!
//! ```rust,no_run
//! use http::Method;
//! use wicket::{Level, LoggingMiddleware, Router, health};
//!
//! # fn main() -> Result<(), wicket::Error> {
//! let app = Router::new()
//!     .wrap(LoggingMiddleware::with_rules([("^/healthz|^/readyz", Level::Debug)])?)
//!     .on(Method::GET, "/healthz", health::liveness)
//!     .on(Method::GET, "/readyz", health::readiness);
//! # Ok(())
//! # }
//! ```
//!
//! Override `readiness` with a custom handler if you need to gate on
//! dependency availability (database connections, downstream services, etc.).

use crate::{Error, Request, Response};

/// Kubernetes liveness probe handler.
///
/// Always returns `200 OK` with body `"ok"`. If the process can respond to
/// HTTP at all, it is alive — this handler intentionally has no dependencies.
pub async fn liveness(_req: Request) -> Result<Response, Error> {
    Ok(Response::text("ok"))
}

/// Kubernetes readiness probe handler (default implementation).
///
/// Returns `200 OK` with body `"ready"`. Replace this with your own handler
/// if your application needs a warm-up period or must verify dependency
/// health before accepting traffic.
pub async fn readiness(_req: Request) -> Result<Response, Error> {
    Ok(Response::text("ready"))
}
