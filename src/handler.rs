//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! The router and the middleware stack need to hold handlers of *different*
//! concrete types behind one interface, so the pipeline's unit of work is a
//! **trait object**: [`DynHandler`], an `Arc<dyn Handler>`.
//!
//! The chain from user code to vtable call is:
//!
//! ```text
//! async fn hello(req: Request) -> Result<Response, Error> { … }   ← user writes this
//!        ↓ router.on(Method::GET, "/", hello)
//! hello.into_handler()                             ← IntoHandler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                       ← heap-allocated wrapper
//!        ↓  stored as DynHandler = Arc<dyn Handler>
//! handler.call(req)  at request time               ← one vtable dispatch
//! ```
//!
//! Middleware slots into the same chain: a middleware's `apply` takes a
//! `DynHandler` and returns a new `DynHandler` wrapping it, so composed and
//! bare handlers are indistinguishable to the caller. The only runtime cost
//! per request is **one Arc clone** (atomic inc) + **one virtual call** —
//! negligible compared to network I/O.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Error;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

// ── The pipeline's unit of work ───────────────────────────────────────────────

/// A heap-allocated, type-erased future resolving to the handler outcome.
///
/// `Pin<Box<…>>` is required because the async runtime must be able to poll
/// the future in-place — it cannot move it in memory after the first poll.
/// `Send + 'static` let tokio move the future across threads safely.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send + 'static>>;

/// The unit of request processing.
///
/// Takes ownership of the [`Request`] and resolves to either a [`Response`]
/// or an [`Error`]. Route handlers satisfy this automatically through
/// [`IntoHandler`]; middleware authors implement it directly on their
/// wrapper types (see [`Middleware`](crate::Middleware)).
pub trait Handler: Send + Sync + 'static {
    fn call(&self, req: Request) -> HandlerFuture;
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
///
/// `Arc` gives cheap, thread-safe shared ownership (one atomic reference
/// count increment per request) without copying the handler.
pub type DynHandler = Arc<dyn Handler>;

// ── Sugar for plain async fns ─────────────────────────────────────────────────

/// Implemented for every valid route handler function.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request) -> Result<impl IntoResponse, Error>
/// ```
///
/// The trait is **sealed** (via the private `Sealed` supertrait): only the
/// blanket impl below can satisfy it. This prevents accidental misuse and
/// keeps the API surface stable across versions.
pub trait IntoHandler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_handler(self) -> DynHandler;
}

/// The sealing module. Because `Sealed` is private, external crates cannot
/// name it and therefore cannot implement `IntoHandler` on their own types.
mod private {
    pub trait Sealed {}
}

/// Implement the sealing trait for any function with the right signature.
impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Error>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

/// Implement `IntoHandler` for any function with the right signature.
impl<F, Fut, R> IntoHandler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Error>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_handler(self) -> DynHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Newtype wrapper that holds a concrete handler `F` and implements
/// [`Handler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> Handler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Error>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> HandlerFuture {
        // Call the wrapped function — this returns the concrete `Fut`.
        // Map the success value through `IntoResponse` and box the whole
        // thing so the return type matches the trait signature.
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.map(IntoResponse::into_response) })
    }
}
