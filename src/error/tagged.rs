//! The tagged error value.

use std::any::Any;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use super::{Caught, Unknown};
use crate::details::{self, DetailValue, Details};

/// An error kind's tag and details, carried as an ordinary value.
///
/// `TaggedError` is returned (usually as the `Err` side of a `Result`) rather
/// than raised. It is immutable and cheap to clone: clones are handles to the
/// same error, and identity is what [`ptr_eq`](TaggedError::ptr_eq) compares.
/// Two errors built from the same tag and details are *not* the same error,
/// which is why `TaggedError` does not implement `PartialEq`.
///
/// ## Structure
///
/// ```text
/// TaggedError
/// ├── tag: str                 (kind of failure, used for dispatch)
/// ├── details: DetailValue     (payload, shape chosen by the kind)
/// ├── message: String          ("<tag>: <json(details)>", computed once)
/// ├── payload: Option          (typed details, when built with `make`)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use wari::{DetailMap, TaggedError};
///
/// let err = TaggedError::new("JsonError", DetailMap::new().with("text", "foo"));
/// assert_eq!(err.tag(), "JsonError");
/// assert_eq!(err.to_string(), r#"JsonError: {"text":"foo"}"#);
/// assert!(err.is("JsonError"));
/// ```
#[derive(Clone)]
pub struct TaggedError {
    inner: Arc<Inner>,
}

#[derive(Clone)]
struct Inner {
    tag: Cow<'static, str>,
    details: DetailValue,
    message: String,
    payload: Option<Arc<dyn Any + Send + Sync>>,
    source: Option<Arc<dyn StdError + Send + Sync + 'static>>,
}

impl TaggedError {
    /// Creates an error from any tag and any details.
    ///
    /// This is the unchecked constructor: nothing ties `tag` to the shape of
    /// `details`. Prefer [`make`] with a [`Details`] type when the kind is
    /// known at compile time.
    pub fn new(tag: impl Into<Cow<'static, str>>, details: impl Into<DetailValue>) -> Self {
        Self::build(tag.into(), details.into(), None)
    }

    /// Creates an error from a typed payload, keeping the payload for
    /// [`payload`](TaggedError::payload).
    pub fn from_details<D: Details>(details: D) -> Self {
        let value = details.to_details();
        let payload: Arc<dyn Any + Send + Sync> = Arc::new(details);
        Self::build(Cow::Borrowed(D::TAG), value, Some(payload))
    }

    /// Wraps a caught failure into an `Unknown` error.
    pub fn unknown(caught: Caught) -> Self {
        Self::from_details(Unknown {
            error: caught.clone(),
            tag: None,
        })
        .with_source(caught)
    }

    /// Builds the `Unknown` error returned when no handler covers `original`.
    ///
    /// The missed tag stays visible in the details and `original` becomes the
    /// source.
    pub(crate) fn missing_handler(original: TaggedError) -> Self {
        Self::from_details(Unknown {
            error: Caught::missing_handler(original.tag()),
            tag: Some(original.tag().to_owned()),
        })
        .with_source(original)
    }

    fn build(
        tag: Cow<'static, str>,
        details: DetailValue,
        payload: Option<Arc<dyn Any + Send + Sync>>,
    ) -> Self {
        let message = details::message(&tag, &details);
        Self {
            inner: Arc::new(Inner {
                tag,
                details,
                message,
                payload,
                source: None,
            }),
        }
    }

    /// Sets the source error, returning a new error.
    ///
    /// The result is a distinct error: it is not [`ptr_eq`](Self::ptr_eq) to
    /// other handles of `self`.
    #[must_use]
    pub fn with_source<E>(self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        let mut inner = Arc::unwrap_or_clone(self.inner);
        inner.source = Some(Arc::new(source));
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Returns the tag.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.inner.tag
    }

    /// Returns the details payload.
    #[inline]
    pub fn details(&self) -> &DetailValue {
        &self.inner.details
    }

    /// Returns the message, `"<tag>: <json(details)>"`.
    #[inline]
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Returns the typed payload if this error was built from a `D`.
    ///
    /// ```rust
    /// use wari::{Caught, CaughtKind, TaggedError, Unknown};
    ///
    /// let err = TaggedError::unknown(Caught::new(CaughtKind::Panic, "boom"));
    /// let unknown = err.payload::<Unknown>().unwrap();
    /// assert_eq!(unknown.error.message(), "boom");
    /// ```
    pub fn payload<D: Any>(&self) -> Option<&D> {
        self.inner.payload.as_deref()?.downcast_ref::<D>()
    }

    /// Returns `true` if this error carries `tag`.
    #[inline]
    pub fn is(&self, tag: &str) -> bool {
        self.tag() == tag
    }

    /// Returns `true` if this error carries the tag of kind `D`.
    #[inline]
    pub fn is_kind<D: Details>(&self) -> bool {
        self.is(D::TAG)
    }

    /// Returns the error a dispatch could not handle, if this `Unknown` error
    /// was produced by such a miss.
    pub fn unhandled(&self) -> Option<&TaggedError> {
        if !self.is_kind::<Unknown>() {
            return None;
        }
        self.inner.source.as_deref()?.downcast_ref::<TaggedError>()
    }

    /// Returns `true` if both handles refer to the same error.
    #[inline]
    pub fn ptr_eq(this: &TaggedError, other: &TaggedError) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }
}

/// Creates a tagged error from a typed payload.
///
/// The tag is `D::TAG`; the message is computed immediately.
///
/// ```rust
/// use serde::Serialize;
/// use wari::Details;
///
/// #[derive(Serialize)]
/// struct JsonError {
///     text: String,
/// }
///
/// impl Details for JsonError {
///     const TAG: &'static str = "JsonError";
/// }
///
/// let err = wari::make(JsonError { text: "foo".into() });
/// assert!(wari::is(&err, "JsonError"));
/// assert_eq!(err.message(), r#"JsonError: {"text":"foo"}"#);
/// assert_eq!(err.payload::<JsonError>().map(|d| d.text.as_str()), Some("foo"));
/// ```
pub fn make<D: Details>(details: D) -> TaggedError {
    TaggedError::from_details(details)
}

impl fmt::Debug for TaggedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaggedError")
            .field("tag", &self.inner.tag)
            .field("details", &self.inner.details)
            .field("source", &self.inner.source)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for TaggedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.message)
    }
}

impl StdError for TaggedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}
