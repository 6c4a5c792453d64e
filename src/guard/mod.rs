//! Guarded invocation: turning panics into values.
//!
//! A guard runs a call inside a failure boundary. Whatever the call returns
//! comes back as `Ok`; a panic, whether raised while the call runs or while
//! its future is polled, comes back as `Err`. Nothing escapes the boundary.
//!
//! | Call                     | On panic                          |
//! |--------------------------|-----------------------------------|
//! | [`try_catch`]            | `Err(Unknown { error })`          |
//! | [`try_catch_with`]       | `Err(handle(caught))`             |
//! | [`try_catch_async`]      | resolves to `Err(Unknown)`        |
//! | [`try_catch_async_with`] | resolves to `Err(handle(caught))` |
//! | [`safe`]                 | `Err(handle(caught, args))`       |
//! | [`safe_async`]           | resolves to `Err(handle(..))`     |
//!
//! Functions that report failure through `Result` have `_result` and
//! `_fallible` forms ([`try_catch_result`], [`try_catch_async_result`],
//! [`safe_fallible`], [`safe_async_fallible`] and the `_with` variants). For
//! those an `Err(e)` is handled exactly like a panic, with `e` kept as the
//! [`Caught`] source.
//!
//! Whether a call is synchronous is known to the compiler, so each flavor has
//! its own entry point; both share [`Guard`] underneath.
//!
//! The process panic hook still runs before a guard sees the panic, so the
//! default hook prints the panic message to stderr as usual.
//!
//! A plain `Result` can also be converted on its own with
//! [`IntoUnknown::or_unknown`].

use std::any::Any;
use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;

use crate::config::GuardConfig;
use crate::{Caught, TaggedError, tracing_support};

/// The future returned by functions built with [`safe_async`].
pub type GuardFuture<T, U> = Pin<Box<dyn Future<Output = Result<T, U>> + Send + 'static>>;

/// A configured failure boundary.
///
/// The free functions of this module use `Guard::default()`.
///
/// ## Example
///
/// ```rust
/// use wari::{Guard, GuardConfig};
///
/// let guard = Guard::new(GuardConfig::quiet());
/// let res = guard.try_catch(|| "fine");
/// assert_eq!(res.ok(), Some("fine"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Guard {
    config: GuardConfig,
}

impl Guard {
    /// Creates a guard with the given configuration.
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Runs `f`; a panic becomes an `Unknown` error.
    pub fn try_catch<T>(&self, f: impl FnOnce() -> T) -> Result<T, TaggedError> {
        self.try_catch_with(f, TaggedError::unknown)
    }

    /// Runs `f`; a panic becomes `handle(caught)`.
    pub fn try_catch_with<T, U>(
        &self,
        f: impl FnOnce() -> T,
        handle: impl FnOnce(Caught) -> U,
    ) -> Result<T, U> {
        // The closure's state is dropped on panic and never observed again.
        panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| handle(self.capture(payload)))
    }

    /// Runs `f` and awaits its future; a panic in either becomes an `Unknown`
    /// error.
    pub async fn try_catch_async<F, Fut>(&self, f: F) -> Result<Fut::Output, TaggedError>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        self.try_catch_async_with(f, TaggedError::unknown).await
    }

    /// Runs `f` and awaits its future; a panic in either becomes
    /// `handle(caught)`.
    pub async fn try_catch_async_with<F, Fut, U>(
        &self,
        f: F,
        handle: impl FnOnce(Caught) -> U,
    ) -> Result<Fut::Output, U>
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let future = match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(future) => future,
            Err(payload) => return Err(handle(self.capture(payload))),
        };

        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(output) => Ok(output),
            Err(payload) => Err(handle(self.capture(payload))),
        }
    }

    /// Wraps `f` so that every call is guarded; see [`safe`].
    pub fn safe<A, T, U, F, H>(
        &self,
        f: F,
        handle: H,
    ) -> impl Fn(A) -> Result<T, U> + use<A, T, U, F, H>
    where
        A: Clone,
        F: Fn(A) -> T,
        H: Fn(Caught, A) -> U,
    {
        let guard = self.clone();
        move |args: A| {
            let kept = args.clone();
            guard.try_catch_with(|| f(args), |caught| handle(caught, kept))
        }
    }

    /// Wraps an async `f` so that every call is guarded; see [`safe_async`].
    pub fn safe_async<A, Fut, U, F, H>(
        &self,
        f: F,
        handle: H,
    ) -> impl Fn(A) -> GuardFuture<Fut::Output, U> + use<A, Fut, U, F, H>
    where
        A: Clone + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: Send + 'static,
        H: Fn(Caught, A) -> U + Send + Sync + 'static,
        U: Send + 'static,
    {
        let guard = self.clone();
        let f = Arc::new(f);
        let handle = Arc::new(handle);
        move |args: A| -> GuardFuture<Fut::Output, U> {
            let guard = guard.clone();
            let f = Arc::clone(&f);
            let handle = Arc::clone(&handle);
            Box::pin(async move {
                let kept = args.clone();
                guard
                    .try_catch_async_with(move || f(args), move |caught| handle(caught, kept))
                    .await
            })
        }
    }

    /// Runs a fallible `f`; an `Err` or a panic becomes an `Unknown` error.
    pub fn try_catch_result<T, E>(
        &self,
        f: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, TaggedError>
    where
        E: StdError + Send + Sync + 'static,
    {
        self.try_catch_result_with(f, TaggedError::unknown)
    }

    /// Runs a fallible `f`; an `Err` or a panic becomes `handle(caught)`.
    pub fn try_catch_result_with<T, E, U>(
        &self,
        f: impl FnOnce() -> Result<T, E>,
        handle: impl FnOnce(Caught) -> U,
    ) -> Result<T, U>
    where
        E: StdError + Send + Sync + 'static,
    {
        let caught = match self.try_catch_with(f, |caught| caught) {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => self.record(Caught::from_error(err)),
            Err(caught) => caught,
        };
        Err(handle(caught))
    }

    /// Runs a fallible async `f`; an `Err` output or a panic becomes an
    /// `Unknown` error.
    pub async fn try_catch_async_result<F, Fut, T, E>(&self, f: F) -> Result<T, TaggedError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: StdError + Send + Sync + 'static,
    {
        self.try_catch_async_result_with(f, TaggedError::unknown).await
    }

    /// Runs a fallible async `f`; an `Err` output or a panic becomes
    /// `handle(caught)`.
    pub async fn try_catch_async_result_with<F, Fut, T, E, U>(
        &self,
        f: F,
        handle: impl FnOnce(Caught) -> U,
    ) -> Result<T, U>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: StdError + Send + Sync + 'static,
    {
        let caught = match self.try_catch_async_with(f, |caught| caught).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => self.record(Caught::from_error(err)),
            Err(caught) => caught,
        };
        Err(handle(caught))
    }

    /// Wraps a fallible `f`; see [`safe_fallible`].
    pub fn safe_fallible<A, T, E, U, F, H>(
        &self,
        f: F,
        handle: H,
    ) -> impl Fn(A) -> Result<T, U> + use<A, T, E, U, F, H>
    where
        A: Clone,
        F: Fn(A) -> Result<T, E>,
        E: StdError + Send + Sync + 'static,
        H: Fn(Caught, A) -> U,
    {
        let guard = self.clone();
        move |args: A| {
            let kept = args.clone();
            guard.try_catch_result_with(|| f(args), |caught| handle(caught, kept))
        }
    }

    /// Wraps a fallible async `f`; see [`safe_async_fallible`].
    pub fn safe_async_fallible<A, Fut, T, E, U, F, H>(
        &self,
        f: F,
        handle: H,
    ) -> impl Fn(A) -> GuardFuture<T, U> + use<A, Fut, T, E, U, F, H>
    where
        A: Clone + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: StdError + Send + Sync + 'static,
        H: Fn(Caught, A) -> U + Send + Sync + 'static,
        U: Send + 'static,
    {
        let guard = self.clone();
        let f = Arc::new(f);
        let handle = Arc::new(handle);
        move |args: A| -> GuardFuture<T, U> {
            let guard = guard.clone();
            let f = Arc::clone(&f);
            let handle = Arc::clone(&handle);
            Box::pin(async move {
                let kept = args.clone();
                guard
                    .try_catch_async_result_with(move || f(args), move |caught| handle(caught, kept))
                    .await
            })
        }
    }

    fn capture(&self, payload: Box<dyn Any + Send>) -> Caught {
        self.record(Caught::from_panic(payload))
    }

    fn record(&self, mut caught: Caught) -> Caught {
        if self.config.capture_backtrace {
            caught = caught.with_backtrace(Backtrace::force_capture());
        }
        if self.config.log_caught {
            tracing_support::caught(&caught);
        }
        caught
    }
}

/// Runs `f`; a panic becomes an `Unknown` error instead of unwinding further.
///
/// ```rust
/// let ok = wari::try_catch(|| 1 + 1);
/// assert_eq!(ok.ok(), Some(2));
///
/// let err = wari::try_catch(|| -> i32 { panic!("x") }).unwrap_err();
/// assert!(err.is("Unknown"));
/// assert_eq!(err.message(), r#"Unknown: {"error":"x"}"#);
/// ```
pub fn try_catch<T>(f: impl FnOnce() -> T) -> Result<T, TaggedError> {
    Guard::default().try_catch(f)
}

/// Runs `f`; a panic becomes `handle(caught)`.
///
/// ```rust
/// let res = wari::try_catch_with(|| -> &'static str { panic!("x") }, |caught| caught.message().len());
/// assert_eq!(res, Err(1));
/// ```
pub fn try_catch_with<T, U>(
    f: impl FnOnce() -> T,
    handle: impl FnOnce(Caught) -> U,
) -> Result<T, U> {
    Guard::default().try_catch_with(f, handle)
}

/// Runs `f` and awaits its future; a panic in either becomes an `Unknown`
/// error. The returned future never panics on their behalf.
pub async fn try_catch_async<F, Fut>(f: F) -> Result<Fut::Output, TaggedError>
where
    F: FnOnce() -> Fut,
    Fut: Future,
{
    Guard::default().try_catch_async(f).await
}

/// Runs `f` and awaits its future; a panic in either becomes
/// `handle(caught)`.
pub async fn try_catch_async_with<F, Fut, U>(
    f: F,
    handle: impl FnOnce(Caught) -> U,
) -> Result<Fut::Output, U>
where
    F: FnOnce() -> Fut,
    Fut: Future,
{
    Guard::default().try_catch_async_with(f, handle).await
}

/// Wraps `f` into a function that never panics.
///
/// The returned function takes the same argument as `f` (use a tuple for
/// several, in the same order). When a call panics, `handle` receives what
/// was caught and a copy of the arguments of that call.
///
/// ```rust
/// use wari::TaggedError;
///
/// let divide = wari::safe(
///     |(a, b): (i32, i32)| a / b,
///     |caught, (a, b)| TaggedError::new("DivideError", format!("{a}/{b}: {caught}")),
/// );
///
/// assert_eq!(divide((6, 3)).ok(), Some(2));
/// let err = divide((1, 0)).unwrap_err();
/// assert!(err.message().starts_with("DivideError: \"1/0: "));
/// ```
pub fn safe<A, T, U, F, H>(f: F, handle: H) -> impl Fn(A) -> Result<T, U>
where
    A: Clone,
    F: Fn(A) -> T,
    H: Fn(Caught, A) -> U,
{
    Guard::default().safe(f, handle)
}

/// Wraps an async `f` into a function whose futures never panic.
///
/// Like [`safe`], `handle` receives the caught value and the call's arguments.
pub fn safe_async<A, Fut, U, F, H>(f: F, handle: H) -> impl Fn(A) -> GuardFuture<Fut::Output, U>
where
    A: Clone + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
    H: Fn(Caught, A) -> U + Send + Sync + 'static,
    U: Send + 'static,
{
    Guard::default().safe_async(f, handle)
}

/// Runs a fallible `f`; an `Err` or a panic becomes an `Unknown` error.
///
/// ```rust
/// use wari::{CaughtKind, Unknown};
///
/// let err = wari::try_catch_result(|| "forty".parse::<i32>()).unwrap_err();
/// let unknown = err.payload::<Unknown>().unwrap();
/// assert_eq!(unknown.error.kind(), CaughtKind::Error);
/// assert_eq!(wari::try_catch_result(|| "40".parse::<i32>()).ok(), Some(40));
/// ```
pub fn try_catch_result<T, E>(f: impl FnOnce() -> Result<T, E>) -> Result<T, TaggedError>
where
    E: StdError + Send + Sync + 'static,
{
    Guard::default().try_catch_result(f)
}

/// Runs a fallible `f`; an `Err` or a panic becomes `handle(caught)`.
pub fn try_catch_result_with<T, E, U>(
    f: impl FnOnce() -> Result<T, E>,
    handle: impl FnOnce(Caught) -> U,
) -> Result<T, U>
where
    E: StdError + Send + Sync + 'static,
{
    Guard::default().try_catch_result_with(f, handle)
}

/// Runs a fallible async `f`; an `Err` output or a panic becomes an `Unknown`
/// error.
pub async fn try_catch_async_result<F, Fut, T, E>(f: F) -> Result<T, TaggedError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: StdError + Send + Sync + 'static,
{
    Guard::default().try_catch_async_result(f).await
}

/// Runs a fallible async `f`; an `Err` output or a panic becomes
/// `handle(caught)`.
pub async fn try_catch_async_result_with<F, Fut, T, E, U>(
    f: F,
    handle: impl FnOnce(Caught) -> U,
) -> Result<T, U>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: StdError + Send + Sync + 'static,
{
    Guard::default().try_catch_async_result_with(f, handle).await
}

/// Wraps a fallible `f` into a function that never panics.
///
/// Like [`safe`], but an `Err(e)` returned by `f` is a failure too: `handle`
/// receives `e` as a [`Caught`] of kind [`Error`](crate::CaughtKind::Error)
/// together with the call's arguments.
///
/// ```rust
/// use wari::TaggedError;
///
/// let parse = wari::safe_fallible(
///     |text: String| text.parse::<u8>(),
///     |caught, text| TaggedError::new("ParseError", format!("{text}: {caught}")),
/// );
///
/// assert_eq!(parse("7".to_owned()).ok(), Some(7));
/// let err = parse("x".to_owned()).unwrap_err();
/// assert_eq!(err.message(), r#"ParseError: "x: invalid digit found in string""#);
/// ```
pub fn safe_fallible<A, T, E, U, F, H>(f: F, handle: H) -> impl Fn(A) -> Result<T, U>
where
    A: Clone,
    F: Fn(A) -> Result<T, E>,
    E: StdError + Send + Sync + 'static,
    H: Fn(Caught, A) -> U,
{
    Guard::default().safe_fallible(f, handle)
}

/// Wraps a fallible async `f` into a function whose futures never panic.
///
/// An `Err(e)` output reaches `handle` with the call's arguments, as a panic
/// does.
pub fn safe_async_fallible<A, Fut, T, E, U, F, H>(
    f: F,
    handle: H,
) -> impl Fn(A) -> GuardFuture<T, U>
where
    A: Clone + Send + 'static,
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: StdError + Send + Sync + 'static,
    H: Fn(Caught, A) -> U + Send + Sync + 'static,
    U: Send + 'static,
{
    Guard::default().safe_async_fallible(f, handle)
}

/// Converts a `Result`'s error into an `Unknown` tagged error.
///
/// This is the boundary for failures reported through `Result` rather than by
/// panicking.
///
/// ```rust
/// use wari::{IntoUnknown, Unknown};
///
/// let res: Result<i32, _> = "forty".parse::<i32>().or_unknown();
/// let err = res.unwrap_err();
/// assert!(err.is_kind::<Unknown>());
/// assert!(err.payload::<Unknown>().unwrap().error.downcast_ref::<std::num::ParseIntError>().is_some());
/// ```
pub trait IntoUnknown<T> {
    /// Maps `Err(e)` to `Err(Unknown { error: e })`.
    fn or_unknown(self) -> Result<T, TaggedError>;
}

impl<T, E> IntoUnknown<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn or_unknown(self) -> Result<T, TaggedError> {
        self.map_err(|err| TaggedError::unknown(Caught::from_error(err)))
    }
}
