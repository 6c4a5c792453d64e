//! Routing tagged errors to handlers.
//!
//! [`dispatch`] takes a `Result<T, TaggedError>`:
//!
//! | Input                  | Handler found        | Output                    |
//! |------------------------|----------------------|---------------------------|
//! | `Ok(v)`                | (none consulted)     | `Ok(v)`                   |
//! | `Err(e)`, tag `t`      | for `t`              | `Ok(handler(e))`          |
//! | `Err(e)`, tag `t`      | default only         | `Ok(default(e))`          |
//! | `Err(e)`, tag `t`      | none                 | `Err(Unknown { tag: t })` |
//!
//! The last row is a returned value: dispatch never panics. Callers that do
//! not register a default must treat `Err` as "something went unhandled".
//!
//! Handlers produce the same type as the `Ok` side. When they need a wider
//! type, such as `Option<T>` for handlers with nothing to return, use
//! [`dispatch_into`], which converts passed-through values with `Into`.

mod handlers;

pub use handlers::Handlers;

use crate::{TaggedError, tracing_support};

/// Routes a tagged error to its handler, passing ordinary values through.
///
/// Exactly one handler runs per call. When neither a handler for the tag nor a
/// default exists, the result is an `Unknown` error whose details name the
/// missed tag and whose [`unhandled`](TaggedError::unhandled) is the original
/// error.
///
/// ## Example
///
/// ```rust
/// use wari::{Handlers, TaggedError};
///
/// fn fetch(ok: bool) -> Result<u16, TaggedError> {
///     if ok { Ok(204) } else { Err(TaggedError::new("JsonError", "bad body")) }
/// }
///
/// let handlers = || {
///     Handlers::new()
///         .with_handler("JsonError", |_| 200)
///         .with_handler("HttpError", |_| 100)
/// };
/// assert_eq!(wari::dispatch(fetch(true), handlers()).ok(), Some(204));
/// assert_eq!(wari::dispatch(fetch(false), handlers()).ok(), Some(200));
/// assert_eq!(wari::dispatch(fetch(true), Handlers::new()).ok(), Some(204));
/// ```
pub fn dispatch<T>(
    value: Result<T, TaggedError>,
    handlers: Handlers<'_, T>,
) -> Result<T, TaggedError> {
    dispatch_into(value, handlers)
}

/// Like [`dispatch`], but handlers produce `R` and ordinary values are
/// converted with `Into`.
///
/// Handlers that return nothing use `Option`:
///
/// ```rust
/// use wari::{Handlers, TaggedError};
///
/// let value: Result<i32, TaggedError> = Err(TaggedError::new("HttpError", 503));
/// let out = wari::dispatch_into::<_, Option<i32>>(
///     value,
///     Handlers::new().with_default(|err| {
///         eprintln!("{err}");
///         None
///     }),
/// );
/// assert_eq!(out.ok(), Some(None));
///
/// let out = wari::dispatch_into::<_, Option<i32>>(Ok(5), Handlers::new());
/// assert_eq!(out.ok(), Some(Some(5)));
/// ```
pub fn dispatch_into<T, R>(
    value: Result<T, TaggedError>,
    handlers: Handlers<'_, R>,
) -> Result<R, TaggedError>
where
    T: Into<R>,
{
    let error = match value {
        Ok(value) => return Ok(value.into()),
        Err(error) => error,
    };

    match handlers.take(error.tag()) {
        Some(handler) => Ok(handler(error)),
        None => {
            tracing_support::unhandled(&error);
            Err(TaggedError::missing_handler(error))
        },
    }
}
