//! What a guard captured when a call failed.

use std::any::Any;
use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::{MissingHandler, TaggedError};

/// How a [`Caught`] value came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum CaughtKind {
    /// The guarded call panicked, synchronously or while being polled.
    #[error("panic")]
    Panic,

    /// A `std::error::Error` was converted at a boundary.
    #[error("error")]
    Error,

    /// A dispatch found no handler for the error's tag.
    #[error("missing handler")]
    MissingHandler,
}

/// A failure captured at a guard boundary, handed to error handlers.
///
/// `Caught` is the Rust counterpart of "the thrown value": a panic payload or
/// an error converted into a plain value. It is cheap to clone.
///
/// ```text
/// Caught
/// ├── kind: CaughtKind       (panic, error or missing handler)
/// ├── message: String        (panic message or error display)
/// ├── source: Option         (the original error, when there is one)
/// └── backtrace: Option      (when the guard was configured to capture)
/// ```
///
/// Serialized, a `Caught` is its message string.
#[derive(Debug, Clone)]
pub struct Caught {
    kind: CaughtKind,
    message: Cow<'static, str>,
    source: Option<Arc<dyn StdError + Send + Sync + 'static>>,
    backtrace: Option<Arc<Backtrace>>,
}

impl Caught {
    /// Creates a caught value with the given kind and message.
    pub fn new(kind: CaughtKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            backtrace: None,
        }
    }

    /// Builds a caught value from a panic payload.
    ///
    /// String payloads (from `panic!`) become the message. A [`TaggedError`]
    /// raised with `std::panic::panic_any` is kept as the source.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<&'static str>() {
            Ok(message) => return Self::new(CaughtKind::Panic, *message),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<String>() {
            Ok(message) => return Self::new(CaughtKind::Panic, *message),
            Err(payload) => payload,
        };
        match payload.downcast::<TaggedError>() {
            Ok(err) => Self::new(CaughtKind::Panic, err.message().to_owned())
                .with_source_arc(Arc::new(*err)),
            Err(_) => Self::new(CaughtKind::Panic, "Box<dyn Any>"),
        }
    }

    /// Builds a caught value from an error, keeping it as the source.
    ///
    /// ```rust
    /// use wari::{Caught, CaughtKind};
    ///
    /// let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    /// let caught = Caught::from_error(io);
    /// assert_eq!(caught.kind(), CaughtKind::Error);
    /// assert_eq!(caught.message(), "no such file");
    /// assert!(caught.downcast_ref::<std::io::Error>().is_some());
    /// ```
    pub fn from_error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::new(CaughtKind::Error, err.to_string()).with_source_arc(Arc::new(err))
    }

    pub(crate) fn missing_handler(tag: &str) -> Self {
        let err = MissingHandler::new(tag);
        Self::new(CaughtKind::MissingHandler, err.to_string()).with_source_arc(Arc::new(err))
    }

    #[must_use]
    pub(crate) fn with_backtrace(mut self, backtrace: Backtrace) -> Self {
        self.backtrace = Some(Arc::new(backtrace));
        self
    }

    fn with_source_arc(mut self, source: Arc<dyn StdError + Send + Sync + 'static>) -> Self {
        self.source = Some(source);
        self
    }

    /// Returns how this value was caught.
    #[inline]
    pub fn kind(&self) -> CaughtKind {
        self.kind
    }

    /// Returns the panic message or the error's display text.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the backtrace captured at the boundary, if any.
    #[inline]
    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.backtrace.as_deref()
    }

    /// Returns the original error if it is of type `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.source.as_deref()?.downcast_ref::<E>()
    }
}

impl fmt::Display for Caught {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Caught {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl Serialize for Caught {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.message)
    }
}
