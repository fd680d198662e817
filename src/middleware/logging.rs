//! Leveled, pattern-filtered request logging.
//!
//! [`LoggingMiddleware`] emits one structured entry when a request starts and
//! another when it completes. The severity of both entries is chosen per
//! request by matching the path against an ordered list of regex rules:
//! health checks can drop to `Debug`, admin surfaces can rise to `Warn`,
//! everything else stays at `Info` — all without touching handler code.
//!
//! Both entries hang off a per-request `tracing` span that carries the
//! request metadata (`method`, `path`, `host`, `from`, `protocol`,
//! `referer`, `user_agent`, `request_id`) plus, at completion, `status`,
//! `duration` (fractional seconds), and `bytes`. Fields with empty values
//! are omitted, not logged as `""`. The inner handler runs inside the span,
//! so anything it logs is correlated with the request for free.
//!
//! ```rust,no_run
//! use http::Method;
//! use wicket::{Level, LoggingMiddleware, Request, Response, Router};
//!
//! # async fn list_users(_req: Request) -> Result<Response, wicket::Error> {
//! #     Ok(Response::text(""))
//! # }
//! # fn main() -> Result<(), wicket::Error> {
//! let logging = LoggingMiddleware::with_rules([
//!     ("^/healthz", Level::Debug),
//!     ("^/admin", Level::Warn),
//! ])?;
//!
//! let app = Router::new()
//!     .wrap(logging)
//!     .on(Method::GET, "/admin/users", list_users);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Instant;

use http::StatusCode;
use regex::Regex;
use tracing::field::Empty;
use tracing::{Instrument, Span};

use crate::error::Error;
use crate::handler::{DynHandler, Handler, HandlerFuture};
use crate::level::Level;
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;

// ── Filter rules ──────────────────────────────────────────────────────────────

/// One compiled path-pattern → severity association.
///
/// The pattern is a regex compiled once here; request handling only ever
/// runs the pre-compiled matcher. Matching is an unanchored search over the
/// request path (no query string) — anchor with `^` when you mean a prefix.
#[derive(Clone, Debug)]
pub struct PatternRule {
    pattern: String,
    re: Regex,
    level: Level,
}

impl PatternRule {
    /// Compiles `pattern` into a rule selecting `level`.
    ///
    /// Fails with [`Error::InvalidPattern`] on a malformed pattern, so bad
    /// configuration surfaces at startup, never mid-request.
    pub fn new(pattern: &str, level: Level) -> Result<Self, Error> {
        let re = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })?;
        Ok(Self { pattern: pattern.to_owned(), re, level })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn level(&self) -> Level {
        self.level
    }
}

/// An ordered list of [`PatternRule`]s.
///
/// Order is preserved exactly as given — it is part of the configuration's
/// meaning (see [`level_for`](RuleSet::level_for)). No deduplication.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<PatternRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// Compiles an ordered sequence of `(pattern, level)` pairs.
    ///
    /// Every pattern is validated; the first invalid one fails the whole
    /// build and no rule set is produced.
    pub fn compile<I, S>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, Level)>,
        S: AsRef<str>,
    {
        let mut rules = Vec::new();
        for (pattern, level) in pairs {
            rules.push(PatternRule::new(pattern.as_ref(), level)?);
        }
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Selects the severity for `path`. Defaults to [`Level::Info`] when no
    /// rule matches.
    ///
    /// Every rule is examined in list order and each match overwrites the
    /// candidate — the **last matching rule wins**, regardless of which
    /// pattern is more specific. This is load-bearing: a later `^/a` rule
    /// overrides an earlier `^/ab` rule for `/abc`. Order your rules from
    /// general to specific.
    pub fn level_for(&self, path: &str) -> Level {
        let mut selected = Level::Info;
        for rule in &self.rules {
            if rule.re.is_match(path) {
                selected = rule.level;
            }
        }
        selected
    }
}

// ── Request metadata fields ───────────────────────────────────────────────────

/// Extracts the loggable metadata of a request as `(name, value)` pairs.
///
/// Covers `method`, `path` (full target, query string included), `host`,
/// `from` (peer address), `protocol`, `referer`, and `user_agent`. A field
/// whose value would be empty is not inserted at all. Pure — reads the
/// request, touches nothing.
pub fn request_fields(req: &Request) -> Vec<(&'static str, String)> {
    let mut fields = Vec::with_capacity(7);
    let mut push = |name: &'static str, value: String| {
        if !value.is_empty() {
            fields.push((name, value));
        }
    };

    push("method", req.method().to_string());
    push("path", req.target());
    push("host", req.host().map(str::to_owned).unwrap_or_default());
    push(
        "from",
        req.remote_addr().map(|a| a.to_string()).unwrap_or_default(),
    );
    push("protocol", format!("{:?}", req.version()));
    push("referer", req.header("referer").map(str::to_owned).unwrap_or_default());
    push(
        "user_agent",
        req.header("user-agent").map(str::to_owned).unwrap_or_default(),
    );

    fields
}

// ── Response record ───────────────────────────────────────────────────────────

/// What the wrapped handler sent: its explicit status, if it set one, and
/// how many body bytes it produced.
///
/// A plain per-request value captured from the handler's outcome by reading
/// it — it cannot alter the response that reaches the client. A handler
/// error yields the empty record (no status, zero bytes).
struct ResponseRecord {
    status: Option<StatusCode>,
    bytes: usize,
}

impl ResponseRecord {
    fn capture(resp: Option<&Response>) -> Self {
        match resp {
            Some(r) => Self { status: r.status, bytes: r.body.len() },
            None => Self { status: None, bytes: 0 },
        }
    }

    /// The explicit status, or the wire default `200 OK` when the handler
    /// never set one.
    fn status_or_default(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    fn bytes(&self) -> usize {
        self.bytes
    }
}

// ── The middleware ────────────────────────────────────────────────────────────

/// Middleware that logs every request twice: a "starting request" entry
/// before the wrapped handler runs and a "request completed" entry after it
/// returns, both at the severity the rule set selects for the path.
///
/// The handler's result — response or error — passes through untouched.
/// Immutable after construction and shared read-only across all concurrent
/// requests.
pub struct LoggingMiddleware {
    rules: RuleSet,
}

impl LoggingMiddleware {
    /// No filter rules: every request logs at [`Level::Info`].
    pub fn new() -> Self {
        Self { rules: RuleSet::default() }
    }

    /// Compiles `(pattern, level)` pairs eagerly; any invalid pattern fails
    /// construction and nothing is installed.
    pub fn with_rules<I, S>(rules: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (S, Level)>,
        S: AsRef<str>,
    {
        Ok(Self { rules: RuleSet::compile(rules)? })
    }

    /// Uses an already-compiled rule set.
    pub fn with_rule_set(rules: RuleSet) -> Self {
        Self { rules }
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for LoggingMiddleware {
    fn apply(&self, next: DynHandler) -> DynHandler {
        Arc::new(LoggingHandler { rules: self.rules.clone(), next })
    }
}

/// The handler `apply` produces: the wrapped `next` plus the shared rules.
struct LoggingHandler {
    rules: RuleSet,
    next: DynHandler,
}

/// Declares the request span with its full field set at a fixed callsite
/// level. Fields start [`Empty`] and are recorded as values become known;
/// a field never recorded is omitted from output.
macro_rules! span_at {
    ($lvl:expr) => {
        tracing::span!(
            $lvl,
            "request",
            method = Empty,
            path = Empty,
            host = Empty,
            from = Empty,
            protocol = Empty,
            referer = Empty,
            user_agent = Empty,
            request_id = Empty,
            status = Empty,
            duration = Empty,
            bytes = Empty,
        )
    };
}

/// The span is the request-scoped logger: created at the selected severity,
/// handed to the inner handler via [`Instrument`]. `tracing` spans fix
/// their level per callsite, so the dispatch is a match over the closed
/// [`Level`] set.
fn request_span(level: Level) -> Span {
    match level {
        Level::Debug => span_at!(tracing::Level::DEBUG),
        Level::Info => span_at!(tracing::Level::INFO),
        Level::Warn => span_at!(tracing::Level::WARN),
        Level::Error | Level::Fatal | Level::Panic => span_at!(tracing::Level::ERROR),
    }
}

impl Handler for LoggingHandler {
    fn call(&self, req: Request) -> HandlerFuture {
        // Level selection matches the bare path; the logged `path` field
        // keeps the query string.
        let level = self.rules.level_for(req.path());
        let next = Arc::clone(&self.next);

        Box::pin(async move {
            let start = Instant::now();

            let span = request_span(level);

            if let Some(id) = req.request_id() {
                span.record("request_id", id);
            }
            for (name, value) in request_fields(&req) {
                span.record(name, value.as_str());
            }

            level.emit(&span, "starting request");

            // Downstream handlers run inside the span, so their own events
            // carry the request context. The result is relayed verbatim.
            let result = next.call(req).instrument(span.clone()).await;

            let record = ResponseRecord::capture(result.as_ref().ok());
            span.record("status", u64::from(record.status_or_default().as_u16()));
            span.record("duration", start.elapsed().as_secs_f64());
            span.record("bytes", record.bytes() as u64);

            level.emit(&span, "request completed");

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::IntoHandler;

    #[test]
    fn invalid_pattern_fails_compilation() {
        let err = PatternRule::new("[", Level::Warn).unwrap_err();
        match err {
            Error::InvalidPattern { pattern, .. } => assert_eq!(pattern, "["),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn one_bad_pattern_fails_the_whole_set() {
        let result = RuleSet::compile([
            ("^/ok", Level::Debug),
            ("(unclosed", Level::Warn),
            ("^/also-ok", Level::Error),
        ]);
        assert!(matches!(
            result,
            Err(Error::InvalidPattern { ref pattern, .. }) if pattern == "(unclosed"
        ));
    }

    #[test]
    fn no_match_defaults_to_info() {
        let rules = RuleSet::compile([("^/admin", Level::Warn)]).unwrap();
        assert_eq!(rules.level_for("/public"), Level::Info);
        assert_eq!(RuleSet::default().level_for("/anything"), Level::Info);
    }

    #[test]
    fn single_match_selects_its_level() {
        let rules = RuleSet::compile([("^/admin", Level::Warn)]).unwrap();
        assert_eq!(rules.level_for("/admin/users"), Level::Warn);
    }

    #[test]
    fn last_matching_rule_wins() {
        // /abc matches both; the later, less specific rule overrides.
        let rules =
            RuleSet::compile([("^/a", Level::Debug), ("^/ab", Level::Error)]).unwrap();
        assert_eq!(rules.level_for("/abc"), Level::Error);

        let reversed =
            RuleSet::compile([("^/ab", Level::Error), ("^/a", Level::Debug)]).unwrap();
        assert_eq!(reversed.level_for("/abc"), Level::Debug);
    }

    #[test]
    fn fields_omit_empty_values() {
        let req = Request::builder()
            .uri("/search?q=1")
            .header("host", "example.test")
            .header("user-agent", "curl/8.0")
            .build();
        let fields = request_fields(&req);

        let get = |name: &str| {
            fields
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("method"), Some("GET"));
        assert_eq!(get("path"), Some("/search?q=1"));
        assert_eq!(get("host"), Some("example.test"));
        assert_eq!(get("user_agent"), Some("curl/8.0"));
        assert_eq!(get("protocol"), Some("HTTP/1.1"));
        // No referer header, no peer address: neither key exists.
        assert_eq!(get("referer"), None);
        assert_eq!(get("from"), None);
    }

    #[test]
    fn record_defaults_unset_status_to_200() {
        let resp = Response::text("hi");
        let record = ResponseRecord::capture(Some(&resp));
        assert_eq!(record.status, None);
        assert_eq!(record.status_or_default(), StatusCode::OK);
        assert_eq!(record.bytes(), 2);
    }

    #[test]
    fn record_of_a_failed_handler_is_empty() {
        let record = ResponseRecord::capture(None);
        assert_eq!(record.status_or_default(), StatusCode::OK);
        assert_eq!(record.bytes(), 0);
    }

    #[tokio::test]
    async fn response_passes_through_unchanged() {
        async fn hello(_req: Request) -> Result<Response, Error> {
            Ok(Response::builder().status(StatusCode::CREATED).text("made"))
        }

        let wrapped = LoggingMiddleware::new().apply(hello.into_handler());
        let resp = wrapped.call(Request::builder().build()).await.unwrap();
        assert_eq!(resp.status, Some(StatusCode::CREATED));
        assert_eq!(resp.body, b"made");
    }

    #[tokio::test]
    async fn error_passes_through_unchanged() {
        async fn failing(_req: Request) -> Result<Response, Error> {
            Err(Error::handler("boom"))
        }

        let wrapped = LoggingMiddleware::new().apply(failing.into_handler());
        let result = wrapped.call(Request::builder().build()).await;
        assert!(matches!(result, Err(Error::Handler(ref msg)) if msg == "boom"));
    }
}
