//! Minimal wicket example — JSON endpoints, health checks, and leveled
//! request logging.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl http://localhost:3000/healthz            # logged at debug: invisible
//!   curl http://localhost:3000/admin/users        # logged at warn
//!   curl -H 'x-request-id: abc-123' http://localhost:3000/users/42
//!   curl http://localhost:3000/oops               # handler error → 500

use http::Method;
use wicket::{Error, Level, LoggingMiddleware, Request, Response, Router, Server, health};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    // Health probes hit every few seconds — drop them below the default
    // subscriber level. Admin traffic is worth noticing — raise it.
    let logging = LoggingMiddleware::with_rules([
        ("^/healthz|^/readyz", Level::Debug),
        ("^/admin", Level::Warn),
    ])?;

    let app = Router::new()
        .wrap(logging)
        .on(Method::GET, "/users/{id}", get_user)
        .on(Method::GET, "/admin/users", admin_users)
        .on(Method::GET, "/oops", oops)
        .on(Method::GET, "/healthz", health::liveness)
        .on(Method::GET, "/readyz", health::readiness);

    Server::bind("0.0.0.0:3000").serve(app).await
}

// GET /users/{id}
async fn get_user(req: Request) -> Result<Response, Error> {
    let id = req.param("id").unwrap_or("unknown");
    Ok(Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes()))
}

// GET /admin/users — both log entries for this route come out at warn.
async fn admin_users(_req: Request) -> Result<Response, Error> {
    Ok(Response::json(br#"{"users":[]}"#.to_vec()))
}

// GET /oops — the error passes through the logging middleware untouched
// (the completion entry is still emitted) and the server answers 500.
async fn oops(_req: Request) -> Result<Response, Error> {
    Err(Error::handler("the demo handler always fails"))
}
