//! Prelude module for convenient imports.
//!
//! ```rust
//! use wari::prelude::*;
//! ```
//!
//! This provides access to:
//! - The error value and the `Details` trait (and derive, when enabled)
//! - Dispatch handlers
//! - Guards and the `Result` extension traits

pub use crate::{
    config::GuardConfig,
    details::{DetailMap, DetailValue, Details, SharedValue},
    dispatch::Handlers,
    error::{Caught, CaughtKind, TaggedError, Unknown},
    guard::{Guard, IntoUnknown},
    predicates::TaggedResultExt,
};

#[cfg(feature = "derive")]
pub use wari_derive::Details;
