//! Radix-tree request router and middleware stack.
//!
//! You register routes and wrap the whole application in middleware; the
//! composition happens exactly once, when the server takes the router. Per
//! request there is one tree lookup and one walk down the composed handler
//! chain — nothing is rebuilt on the hot path.

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::handler::{DynHandler, IntoHandler};
use crate::middleware::Middleware;

/// The application router.
///
/// Routes are buffered at registration and compiled into one radix tree per
/// HTTP method — O(path-length) lookup, no allocations on the hot path —
/// when [`Server::serve`](crate::Server::serve) takes the router. Each
/// [`Router::on`] / [`Router::wrap`] call returns `self` so the whole
/// pipeline chains naturally.
pub struct Router {
    routes: Vec<(Method, String, DynHandler)>,
    middlewares: Vec<Box<dyn Middleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new(), middlewares: Vec::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use http::Method;
    /// # use wicket::{Error, Request, Response, Router};
    /// # async fn get_user(_: Request) -> Result<Response, Error> { Ok(Response::text("")) }
    /// # async fn create_user(_: Request) -> Result<Response, Error> { Ok(Response::text("")) }
    /// # async fn delete_user(_: Request) -> Result<Response, Error> { Ok(Response::text("")) }
    /// Router::new()
    ///     .on(Method::DELETE, "/users/{id}", delete_user)
    ///     .on(Method::GET,    "/users/{id}", get_user)
    ///     .on(Method::POST,   "/users",      create_user);
    /// ```
    pub fn on(mut self, method: Method, path: &str, handler: impl IntoHandler) -> Self {
        self.routes.push((method, path.to_owned(), handler.into_handler()));
        self
    }

    /// Wrap every route in `middleware`. Returns `self` for chaining.
    ///
    /// Middlewares apply in registration order, first `wrap` outermost: with
    /// `wrap(a).wrap(b)`, a request passes through `a`, then `b`, then the
    /// route handler.
    pub fn wrap(mut self, middleware: impl Middleware) -> Self {
        self.middlewares.push(Box::new(middleware));
        self
    }

    /// Composes every route with the middleware stack and builds the lookup
    /// trees. Called once, by the server.
    ///
    /// # Panics
    ///
    /// Panics if a registered route path is invalid — a configuration error
    /// that must prevent startup.
    pub(crate) fn finalize(self) -> RouteTable {
        let mut trees: HashMap<Method, MatchitRouter<DynHandler>> = HashMap::new();
        for (method, path, handler) in self.routes {
            let composed = self
                .middlewares
                .iter()
                .rev()
                .fold(handler, |next, mw| mw.apply(next));
            trees
                .entry(method)
                .or_default()
                .insert(&path, composed)
                .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        }
        RouteTable { trees }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// The compiled routing table the server dispatches against.
pub(crate) struct RouteTable {
    trees: HashMap<Method, MatchitRouter<DynHandler>>,
}

impl RouteTable {
    pub(crate) fn lookup(
        &self,
        method: &Method,
        path: &str,
    ) -> Option<(DynHandler, HashMap<String, String>)> {
        let tree = self.trees.get(method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::handler::Handler;
    use crate::request::Request;
    use crate::response::Response;

    async fn echo_id(req: Request) -> Result<Response, Error> {
        let id = req.param("id").unwrap_or("unknown").to_owned();
        Ok(Response::text(id))
    }

    #[tokio::test]
    async fn lookup_extracts_path_variables() {
        let table = Router::new()
            .on(Method::GET, "/users/{id}", echo_id)
            .finalize();

        let (handler, params) = table.lookup(&Method::GET, "/users/42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));

        let mut req = Request::builder().uri("/users/42").build();
        req.set_params(params);
        let resp = handler.call(req).await.unwrap();
        assert_eq!(resp.body, b"42");
    }

    #[test]
    fn unknown_method_and_path_miss() {
        let table = Router::new()
            .on(Method::GET, "/users/{id}", echo_id)
            .finalize();

        assert!(table.lookup(&Method::POST, "/users/42").is_none());
        assert!(table.lookup(&Method::GET, "/missing").is_none());
    }
}
