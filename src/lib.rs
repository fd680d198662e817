//! # wicket
//!
//! A minimal HTTP pipeline whose first-class feature is request logging you
//! can actually operate: every request produces a "starting request" and a
//! "request completed" entry, and the severity of both is chosen per request
//! by matching the path against configured regex rules. Health checks drop
//! to `Debug`, admin surfaces rise to `Warn` — configuration, not code.
//!
//! ## The contract
//!
//! A fronting proxy handles TLS, rate limiting, slow clients, and body-size
//! limits. wicket does not. What's left is the part that changes between
//! applications:
//!
//! - **Handlers** — `async fn(Request) -> Result<Response, Error>`, routed by
//!   a radix tree ([`matchit`]), O(path-length) lookup
//! - **Middleware** — wraps handlers with cross-cutting behavior while
//!   keeping their signature; the logging middleware ships in the box
//! - **Graceful shutdown** — SIGTERM / Ctrl-C, drains in-flight requests so
//!   every request gets its completion log entry
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::Method;
//! use wicket::{Error, Level, LoggingMiddleware, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let logging = LoggingMiddleware::with_rules([
//!         ("^/healthz", Level::Debug),
//!         ("^/admin", Level::Warn),
//!     ])?;
//!
//!     let app = Router::new()
//!         .wrap(logging)
//!         .on(Method::GET, "/users/{id}", get_user)
//!         .on(Method::GET, "/healthz", wicket::health::liveness);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await
//! }
//!
//! async fn get_user(req: Request) -> Result<Response, Error> {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Ok(Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes()))
//! }
//! ```
//!
//! ## What the logs look like
//!
//! Wire up any `tracing` subscriber (the demo uses `tracing_subscriber::fmt`)
//! and each request yields two entries at its selected level, carrying
//! `method`, `path`, `host`, `from`, `protocol`, `referer`, `user_agent`,
//! and `request_id` when the fronting proxy supplies one; the completion
//! entry adds `status`, `duration` (seconds), and `bytes`. Empty fields are
//! omitted rather than logged as `""`.

mod error;
mod handler;
mod level;
mod request;
mod response;
mod router;
mod server;

pub mod health;
pub mod middleware;

pub use error::Error;
pub use handler::{DynHandler, Handler, HandlerFuture, IntoHandler};
pub use level::Level;
pub use middleware::logging::{LoggingMiddleware, PatternRule, RuleSet, request_fields};
pub use middleware::Middleware;
pub use request::{Request, RequestBuilder};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
