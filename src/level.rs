//! Log severity as a typed enum.
//!
//! [`Level`] is the closed set of severities a request may be logged at.
//! Filter rules map path patterns to one of these values; the logging
//! middleware then emits its start/completion entries through the matching
//! `tracing` macro. The set is closed on purpose — dispatch is an explicit
//! `match`, so adding a variant is a compile error until every emission
//! site handles it.

use tracing::{Span, debug, error, info, warn};

/// A log severity, ordered from least to most severe.
///
/// `Debug` through `Error` map one-to-one onto `tracing` levels. The last
/// two carry the contract severities of that name traditionally have:
/// [`Fatal`](Level::Fatal) emits at error level and then exits the process,
/// [`Panic`](Level::Panic) emits and then panics. Selecting them for a path
/// rule means every request on that path terminates the process — that is
/// the caller's call to make, not this crate's to soften.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Level {
    /// The nearest `tracing` level. `Fatal` and `Panic` have no `tracing`
    /// counterpart and report as `ERROR`.
    pub(crate) fn as_tracing(self) -> tracing::Level {
        match self {
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error | Self::Fatal | Self::Panic => tracing::Level::ERROR,
        }
    }

    /// Emits `message` at this severity, inside `span`.
    ///
    /// The span carries the structured fields; the event carries the message.
    /// `tracing` macros fix their level at the callsite, so runtime dispatch
    /// is this match over the closed enum.
    pub(crate) fn emit(self, span: &Span, message: &str) {
        let _entered = span.enter();
        match self {
            Self::Debug => debug!("{message}"),
            Self::Info => info!("{message}"),
            Self::Warn => warn!("{message}"),
            Self::Error => error!("{message}"),
            Self::Fatal => {
                error!("{message}");
                std::process::exit(1);
            }
            Self::Panic => {
                error!("{message}");
                panic!("{message}");
            }
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Panic => "panic",
        })
    }
}
