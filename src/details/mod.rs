//! Error kinds and their details payloads.
//!
//! Each error kind is a Rust type implementing [`Details`]. The type fixes the
//! kind's tag and, through `serde`, how its payload looks at runtime:
//!
//! ```rust,ignore
//! use serde::Serialize;
//! use wari::Details;
//!
//! #[derive(Serialize, Details)]
//! struct JsonError {
//!     text: String,
//! }
//!
//! #[derive(Serialize, Details)]
//! #[details(tag = "HttpError")]
//! struct HttpFailure {
//!     method: String,
//!     url: String,
//!     status: u16,
//! }
//! ```
//!
//! Any crate can add kinds this way; nothing is registered at runtime. Untyped
//! errors can still be built from a plain string tag and a [`DetailValue`]
//! with [`TaggedError::new`](crate::TaggedError::new).

mod render;
mod value;

use serde::Serialize;

pub use render::CIRCULAR;
pub use value::{DetailMap, DetailValue, SharedValue};

pub(crate) use render::message;

/// An error kind: a payload type bound to a tag.
///
/// Usually derived with `#[derive(Details)]` (feature `derive`). Implementing
/// it by hand only requires the tag:
///
/// ```rust
/// use serde::Serialize;
/// use wari::Details;
///
/// #[derive(Serialize)]
/// struct Timeout {
///     after_ms: u64,
/// }
///
/// impl Details for Timeout {
///     const TAG: &'static str = "Timeout";
/// }
///
/// let err = wari::make(Timeout { after_ms: 250 });
/// assert_eq!(err.message(), r#"Timeout: {"after_ms":250}"#);
/// ```
pub trait Details: Serialize + Send + Sync + 'static {
    /// The tag identifying this kind of failure.
    const TAG: &'static str;

    /// Converts the payload into its runtime representation.
    ///
    /// The default goes through `serde_json`. A payload `serde` cannot
    /// represent becomes the string `"[Unserializable: <reason>]"`.
    fn to_details(&self) -> DetailValue {
        match serde_json::to_value(self) {
            Ok(value) => value.into(),
            Err(err) => DetailValue::String(format!("[Unserializable: {err}]")),
        }
    }
}
