//! Tagged errors and the values guards capture.
//!
//! - [`TaggedError`]: a tag plus details, returned instead of raised
//! - [`Caught`]: what a guard captured (panic payload or converted error)
//! - [`Unknown`]: the catch-all kind for failures with no richer tag
//!
//! ## Key Invariant
//!
//! Nothing in this crate panics to report a failure. Guards turn panics into
//! values and a dispatch without a matching handler *returns* an `Unknown`
//! error.
//!
//! ```rust
//! use wari::{Handlers, TaggedError};
//!
//! let value: Result<i32, TaggedError> = Err(TaggedError::new("HttpError", 500));
//! let out = wari::dispatch(value, Handlers::new().with_handler("JsonError", |_| 0));
//! assert!(out.is_err_and(|err| err.is("Unknown")));
//! ```

mod caught;
mod tagged;
mod unknown;

pub use caught::{Caught, CaughtKind};
pub use tagged::{TaggedError, make};
pub use unknown::{MissingHandler, Unknown};
