//! Tracing integration for observability.
//!
//! With the `tracing` feature enabled, the crate reports the two places where
//! a failure changes shape:
//!
//! - a guard catching a panic (`debug`, target `wari::guard`)
//! - a dispatch with no handler for a tag (`warn`, target `wari::dispatch`)
//!
//! Without the feature these hooks compile to nothing.
//!
//! ## Example
//!
//! ```rust,ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("wari=debug")
//!     .init();
//!
//! let res = wari::try_catch(|| panic!("boom"));
//! // DEBUG wari::guard: caught failure kind=panic message="boom"
//! ```

use crate::{Caught, TaggedError};

#[cfg(feature = "tracing")]
pub(crate) fn caught(caught: &Caught) {
    tracing::debug!(
        target: "wari::guard",
        kind = %caught.kind(),
        message = caught.message(),
        "caught failure"
    );
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub(crate) fn caught(_caught: &Caught) {}

#[cfg(feature = "tracing")]
pub(crate) fn unhandled(error: &TaggedError) {
    tracing::warn!(
        target: "wari::dispatch",
        tag = error.tag(),
        message = error.message(),
        "no handler for tag"
    );
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
pub(crate) fn unhandled(_error: &TaggedError) {}
