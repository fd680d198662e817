//! Unified error type.

/// The error type carried through wicket's pipeline and returned by its
/// fallible operations.
///
/// Configuration failures (`InvalidPattern`) surface while the pipeline is
/// being assembled and must prevent startup. `Handler` is the
/// application-level failure channel: a handler returns it, every middleware
/// relays it untouched, and the server maps it to a `500` at the very end.
/// `Io` covers infrastructure failures: binding a port or accepting a
/// connection.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A log-filter pattern failed to compile. Raised only at construction
    /// time, never during request handling.
    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// An application-level failure surfaced by a handler.
    #[error("{0}")]
    Handler(String),

    /// An infrastructure failure: bind or accept.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for an [`Error::Handler`] with the given message.
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }
}
