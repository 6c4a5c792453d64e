//! Runtime checks for tagged errors.
//!
//! [`any`] and [`is`] accept any `'static` value, mirroring a type guard: they
//! answer whether the value *is* a [`TaggedError`] (of a given tag). For the
//! common case of a `Result`, [`TaggedResultExt`] reads better.

use std::any::Any;

use crate::TaggedError;
use crate::dispatch::{Handlers, dispatch, dispatch_into};

/// Returns the value as a tagged error, if it is one.
///
/// ```rust
/// use wari::TaggedError;
///
/// let err = TaggedError::new("JsonError", "bad input");
/// assert_eq!(wari::as_tagged(&err).map(TaggedError::tag), Some("JsonError"));
/// assert!(wari::as_tagged(&"JsonError").is_none());
/// ```
#[inline]
pub fn as_tagged(value: &dyn Any) -> Option<&TaggedError> {
    value.downcast_ref::<TaggedError>()
}

/// Returns `true` if `value` is a tagged error, whatever its tag.
///
/// ```rust
/// use wari::TaggedError;
///
/// assert!(wari::any(&TaggedError::new("JsonError", "")));
/// assert!(!wari::any(&"foo"));
/// assert!(!wari::any(&std::io::Error::other("some error")));
/// ```
#[inline]
pub fn any(value: &dyn Any) -> bool {
    as_tagged(value).is_some()
}

/// Returns `true` if `value` is a tagged error carrying `tag`.
///
/// ```rust
/// use wari::TaggedError;
///
/// let err = TaggedError::new("JsonError", "");
/// assert!(wari::is(&err, "JsonError"));
/// assert!(!wari::is(&err, "HttpError"));
/// ```
#[inline]
pub fn is(value: &dyn Any, tag: &str) -> bool {
    as_tagged(value).is_some_and(|err| err.is(tag))
}

/// Tagged-error helpers for `Result<T, TaggedError>`.
///
/// ```rust
/// use wari::{Handlers, TaggedError, TaggedResultExt};
///
/// fn parse(text: &str) -> Result<i64, TaggedError> {
///     text.parse().map_err(|_| TaggedError::new("JsonError", text.to_owned()))
/// }
///
/// assert!(parse("x").is_tag("JsonError"));
/// assert!(!parse("1").is_tagged());
///
/// let n = parse("x").dispatch(Handlers::new().with_handler("JsonError", |_| -1));
/// assert_eq!(n.ok(), Some(-1));
/// ```
pub trait TaggedResultExt<T> {
    /// Returns `true` if this is an `Err`.
    fn is_tagged(&self) -> bool;

    /// Returns `true` if this is an `Err` carrying `tag`.
    fn is_tag(&self, tag: &str) -> bool;

    /// Returns the error, if any.
    fn tagged(&self) -> Option<&TaggedError>;

    /// Routes the error to a handler; see [`dispatch`](crate::dispatch()).
    fn dispatch(self, handlers: Handlers<'_, T>) -> Result<T, TaggedError>;

    /// Routes the error to a handler producing `R`; see
    /// [`dispatch_into`](crate::dispatch_into()).
    fn dispatch_into<R>(self, handlers: Handlers<'_, R>) -> Result<R, TaggedError>
    where
        T: Into<R>;
}

impl<T> TaggedResultExt<T> for Result<T, TaggedError> {
    #[inline]
    fn is_tagged(&self) -> bool {
        self.is_err()
    }

    #[inline]
    fn is_tag(&self, tag: &str) -> bool {
        self.as_ref().is_err_and(|err| err.is(tag))
    }

    #[inline]
    fn tagged(&self) -> Option<&TaggedError> {
        self.as_ref().err()
    }

    fn dispatch(self, handlers: Handlers<'_, T>) -> Result<T, TaggedError> {
        dispatch(self, handlers)
    }

    fn dispatch_into<R>(self, handlers: Handlers<'_, R>) -> Result<R, TaggedError>
    where
        T: Into<R>,
    {
        dispatch_into(self, handlers)
    }
}
