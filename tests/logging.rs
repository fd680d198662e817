//! End-to-end behavior of the logging middleware: emitted events, selected
//! levels, recorded completion fields, and result passthrough.
//!
//! A tiny `tracing-subscriber` layer captures events and recorded span
//! fields per test; `set_default` keeps each test's subscriber thread-local
//! so tests stay independent.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use http::StatusCode;
use tracing::field::{Field, Visit};
use tracing::span::{Id, Record};
use tracing::{Event, Level as TracingLevel, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use wicket::{
    Error, Handler, IntoHandler, Level, LoggingMiddleware, Middleware, Request, Response,
};

// ── Capture layer ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct Capture {
    events: Arc<Mutex<Vec<(TracingLevel, String)>>>,
    fields: Arc<Mutex<HashMap<String, String>>>,
}

impl Capture {
    fn events(&self) -> Vec<(TracingLevel, String)> {
        self.events.lock().unwrap().clone()
    }

    fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|(_, m)| m).collect()
    }

    fn field(&self, name: &str) -> Option<String> {
        self.fields.lock().unwrap().get(name).cloned()
    }
}

struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor(&mut fields));
        self.events.lock().unwrap().push((
            *event.metadata().level(),
            fields.remove("message").unwrap_or_default(),
        ));
    }

    fn on_record(&self, _span: &Id, values: &Record<'_>, _ctx: Context<'_, S>) {
        let mut fields = self.fields.lock().unwrap();
        values.record(&mut FieldVisitor(&mut fields));
    }
}

fn capture_scope() -> (Capture, tracing::subscriber::DefaultGuard) {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}

// ── Handlers under test ───────────────────────────────────────────────────────

async fn hello(_req: Request) -> Result<Response, Error> {
    Ok(Response::text("hello"))
}

async fn no_content(_req: Request) -> Result<Response, Error> {
    Ok(Response::status(StatusCode::NO_CONTENT))
}

async fn failing(_req: Request) -> Result<Response, Error> {
    Err(Error::handler("boom"))
}

async fn chatty(_req: Request) -> Result<Response, Error> {
    tracing::info!("inside handler");
    Ok(Response::text("ok"))
}

// ── Level selection through the full middleware ───────────────────────────────

#[tokio::test]
async fn matching_path_logs_both_entries_at_rule_level() {
    let (capture, _guard) = capture_scope();
    let mw = LoggingMiddleware::with_rules([("^/admin", Level::Warn)]).unwrap();
    let wrapped = mw.apply(hello.into_handler());

    wrapped
        .call(Request::builder().uri("/admin/users").build())
        .await
        .unwrap();

    let events = capture.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|(level, _)| *level == TracingLevel::WARN));
    assert_eq!(events[0].1, "starting request");
    assert_eq!(events[1].1, "request completed");
}

#[tokio::test]
async fn non_matching_path_logs_at_info() {
    let (capture, _guard) = capture_scope();
    let mw = LoggingMiddleware::with_rules([("^/admin", Level::Warn)]).unwrap();
    let wrapped = mw.apply(hello.into_handler());

    wrapped
        .call(Request::builder().uri("/public").build())
        .await
        .unwrap();

    assert!(capture
        .events()
        .iter()
        .all(|(level, _)| *level == TracingLevel::INFO));
}

#[tokio::test]
async fn later_matching_rule_overrides_earlier_one() {
    let (capture, _guard) = capture_scope();
    // /abc matches both rules; list order decides, not specificity.
    let mw = LoggingMiddleware::with_rules([("^/a", Level::Debug), ("^/ab", Level::Error)])
        .unwrap();
    let wrapped = mw.apply(hello.into_handler());

    wrapped
        .call(Request::builder().uri("/abc").build())
        .await
        .unwrap();

    let events = capture.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|(level, _)| *level == TracingLevel::ERROR));
}

#[tokio::test]
async fn no_filters_means_info_everywhere() {
    let (capture, _guard) = capture_scope();
    let wrapped = LoggingMiddleware::new().apply(hello.into_handler());

    for uri in ["/", "/admin/users", "/healthz"] {
        wrapped
            .call(Request::builder().uri(uri).build())
            .await
            .unwrap();
    }

    let events = capture.events();
    assert_eq!(events.len(), 6);
    assert!(events.iter().all(|(level, _)| *level == TracingLevel::INFO));
}

#[tokio::test]
async fn invalid_rule_prevents_construction() {
    let result = LoggingMiddleware::with_rules([("[", Level::Warn)]);
    assert!(matches!(
        result,
        Err(Error::InvalidPattern { ref pattern, .. }) if pattern == "["
    ));
}

// ── Completion fields ─────────────────────────────────────────────────────────

#[tokio::test]
async fn completion_defaults_status_to_200_and_counts_bytes() {
    let (capture, _guard) = capture_scope();
    let wrapped = LoggingMiddleware::new().apply(hello.into_handler());

    wrapped
        .call(Request::builder().uri("/x?debug=1").build())
        .await
        .unwrap();

    // `hello` never sets a status; 200 is reported, matching the wire.
    assert_eq!(capture.field("status").as_deref(), Some("200"));
    assert_eq!(capture.field("bytes").as_deref(), Some("5"));
    assert_eq!(capture.field("method").as_deref(), Some("GET"));
    assert_eq!(capture.field("path").as_deref(), Some("/x?debug=1"));
    assert_eq!(capture.field("protocol").as_deref(), Some("HTTP/1.1"));
    // No referer was sent: the field is absent, not empty.
    assert_eq!(capture.field("referer"), None);

    let duration: f64 = capture.field("duration").unwrap().parse().unwrap();
    assert!(duration >= 0.0);
}

#[tokio::test]
async fn explicit_status_is_reported_as_set() {
    let (capture, _guard) = capture_scope();
    let wrapped = LoggingMiddleware::new().apply(no_content.into_handler());

    wrapped
        .call(Request::builder().uri("/x").build())
        .await
        .unwrap();

    assert_eq!(capture.field("status").as_deref(), Some("204"));
    assert_eq!(capture.field("bytes").as_deref(), Some("0"));
}

#[tokio::test]
async fn upstream_request_id_is_attached() {
    let (capture, _guard) = capture_scope();
    let wrapped = LoggingMiddleware::new().apply(hello.into_handler());

    wrapped
        .call(
            Request::builder()
                .uri("/x")
                .request_id("abc-123")
                .build(),
        )
        .await
        .unwrap();

    assert_eq!(capture.field("request_id").as_deref(), Some("abc-123"));
}

// ── Passthrough and ordering ──────────────────────────────────────────────────

#[tokio::test]
async fn handler_error_is_relayed_and_completion_still_logged() {
    let (capture, _guard) = capture_scope();
    let wrapped = LoggingMiddleware::new().apply(failing.into_handler());

    let result = wrapped.call(Request::builder().uri("/x").build()).await;

    assert!(matches!(result, Err(Error::Handler(ref msg)) if msg == "boom"));
    let events = capture.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1].1, "request completed");
    // Nothing was written: unset status reports the 200 default, zero bytes.
    assert_eq!(capture.field("status").as_deref(), Some("200"));
    assert_eq!(capture.field("bytes").as_deref(), Some("0"));
}

#[tokio::test]
async fn handler_runs_between_start_and_completion() {
    let (capture, _guard) = capture_scope();
    let wrapped = LoggingMiddleware::new().apply(chatty.into_handler());

    wrapped
        .call(Request::builder().uri("/x").build())
        .await
        .unwrap();

    assert_eq!(
        capture.messages(),
        ["starting request", "inside handler", "request completed"]
    );
}
