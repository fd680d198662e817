//! Incoming HTTP request type.
//!
//! [`Request`] is the pipeline's typed per-request context: everything a
//! handler or middleware may want to know about one request lives here as a
//! named field — method, target, headers, body, remote peer, path variables,
//! and the optional request id supplied by an upstream proxy. Nothing is
//! smuggled through stringly-keyed side channels.

use std::collections::HashMap;
use std::net::SocketAddr;

use bytes::Bytes;
use http::{HeaderMap, Method, Uri, Version};

/// An incoming HTTP request plus its per-request context.
///
/// Created by the server for each request and moved down the handler chain
/// by value, so every middleware and the final handler have exclusive
/// access without synchronization.
pub struct Request {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    remote_addr: Option<SocketAddr>,
    params: HashMap<String, String>,
    request_id: Option<String>,
}

impl Request {
    pub(crate) fn from_parts(
        parts: http::request::Parts,
        body: Bytes,
        remote_addr: SocketAddr,
    ) -> Self {
        // x-request-id is set by the fronting proxy; absent in direct calls.
        let request_id = parts
            .headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            body,
            remote_addr: Some(remote_addr),
            params: HashMap::new(),
            request_id,
        }
    }

    /// Builder for hand-made requests, mainly for testing handlers and
    /// middleware without a socket.
    pub fn builder() -> RequestBuilder {
        RequestBuilder::new()
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request path, without the query string. This is what route and
    /// log-filter patterns match against.
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// The full request target — path plus query string when present.
    pub fn target(&self) -> String {
        self.uri
            .path_and_query()
            .map(|pq| pq.to_string())
            .unwrap_or_else(|| self.uri.path().to_owned())
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Case-insensitive header lookup. Returns `None` for absent headers and
    /// for values that are not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `Host` header, falling back to the URI authority for HTTP/2
    /// requests that carry it there.
    pub fn host(&self) -> Option<&str> {
        self.header("host")
            .or_else(|| self.uri.authority().map(|a| a.as_str()))
    }

    /// The peer address the connection was accepted from, when known.
    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns a named path variable.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns
    /// `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// The request identifier supplied upstream via `x-request-id`, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

// ── RequestBuilder ────────────────────────────────────────────────────────────

/// Fluent builder for [`Request`] values outside a live connection.
///
/// Defaults to `GET /` over HTTP/1.1 with no headers, no body, no peer
/// address, and no request id — every field the logging middleware treats
/// as optional starts absent, so tests state exactly what they mean.
pub struct RequestBuilder {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    remote_addr: Option<SocketAddr>,
    params: HashMap<String, String>,
    request_id: Option<String>,
}

impl RequestBuilder {
    fn new() -> Self {
        Self {
            method: Method::GET,
            uri: Uri::from_static("/"),
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            remote_addr: None,
            params: HashMap::new(),
            request_id: None,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// # Panics
    ///
    /// Panics if `uri` is not a valid request target.
    pub fn uri(mut self, uri: &str) -> Self {
        self.uri = uri.parse().expect("invalid request uri");
        self
    }

    pub fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// # Panics
    ///
    /// Panics if `name` or `value` is not a valid header.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        let name: http::HeaderName = name.parse().expect("invalid header name");
        let value: http::HeaderValue = value.parse().expect("invalid header value");
        self.headers.append(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn build(self) -> Request {
        Request {
            method: self.method,
            uri: self.uri,
            version: self.version,
            headers: self.headers,
            body: self.body,
            remote_addr: self.remote_addr,
            params: self.params,
            request_id: self.request_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = Request::builder().header("User-Agent", "curl/8.0").build();
        assert_eq!(req.header("user-agent"), Some("curl/8.0"));
        assert_eq!(req.header("USER-AGENT"), Some("curl/8.0"));
        assert_eq!(req.header("referer"), None);
    }

    #[test]
    fn target_includes_query_string() {
        let req = Request::builder().uri("/search?q=rust&page=2").build();
        assert_eq!(req.path(), "/search");
        assert_eq!(req.target(), "/search?q=rust&page=2");
    }

    #[test]
    fn params_round_trip() {
        let req = Request::builder().param("id", "42").build();
        assert_eq!(req.param("id"), Some("42"));
        assert_eq!(req.param("missing"), None);
    }
}
