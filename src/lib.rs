//! # wari
//!
//! Tagged errors as values: construct them, pass them along as ordinary
//! return values, inspect them, and dispatch them to handlers.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Serialize;
//! use wari::prelude::*;
//!
//! #[derive(Serialize, Details)]
//! struct JsonError {
//!     text: String,
//! }
//!
//! #[derive(Serialize, Details)]
//! #[details(tag = "HttpError")]
//! struct HttpFailure {
//!     url: String,
//!     status: u16,
//! }
//!
//! fn parse(text: &str) -> Result<i64, TaggedError> {
//!     text.trim()
//!         .parse()
//!         .map_err(|_| wari::make(JsonError { text: text.to_owned() }))
//! }
//!
//! let status = wari::dispatch(
//!     parse("{oops"),
//!     Handlers::new()
//!         .with_kind::<JsonError>(|_| 400)
//!         .with_kind::<HttpFailure>(|_| 502),
//! );
//! assert_eq!(status.ok(), Some(400));
//! ```
//!
//! ## Key Concepts
//!
//! - **Errors are values**: a [`TaggedError`] travels as the `Err` side of a
//!   `Result`; nothing is thrown.
//! - **Kinds are types**: each kind implements [`Details`], which fixes its
//!   tag. Runtime tags ([`TaggedError::new`]) are accepted too.
//! - **Dispatch never panics**: an error without a handler comes back as an
//!   `Unknown` error that names the missed tag.
//! - **Guards are the boundary**: [`try_catch`] and [`safe`] (and their async
//!   forms) are where panics become values.
//!
//! ## Features
//!
//! - `derive` (default): `#[derive(Details)]`
//! - `tracing` (default): report caught panics and unhandled tags through
//!   `tracing`

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod config;
pub mod details;
pub mod dispatch;
pub mod error;
pub mod guard;
pub mod predicates;

// Tracing support
mod tracing_support;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use config::GuardConfig;
pub use details::{DetailMap, DetailValue, Details, SharedValue};
pub use dispatch::{Handlers, dispatch, dispatch_into};
pub use error::{Caught, CaughtKind, MissingHandler, TaggedError, Unknown, make};
pub use guard::{
    Guard, GuardFuture, IntoUnknown, safe, safe_async, safe_async_fallible, safe_fallible,
    try_catch, try_catch_async, try_catch_async_result, try_catch_async_result_with,
    try_catch_async_with, try_catch_result, try_catch_result_with, try_catch_with,
};
pub use predicates::{TaggedResultExt, any, as_tagged, is};

#[cfg(feature = "derive")]
#[cfg_attr(docsrs, doc(cfg(feature = "derive")))]
pub use wari_derive::Details;
