//! The built-in `Unknown` error kind.

use serde::Serialize;

use super::Caught;
use crate::details::Details;

/// Details of the catch-all `Unknown` error kind.
///
/// Produced when a guard catches a panic, when [`or_unknown`] converts a plain
/// error, and when a dispatch has no handler for an error's tag. In the last
/// case `tag` names the tag that went unhandled, so the original kind is not
/// lost behind `Unknown`.
///
/// [`or_unknown`]: crate::IntoUnknown::or_unknown
#[derive(Debug, Clone, Serialize)]
pub struct Unknown {
    /// What was caught.
    pub error: Caught,

    /// The tag a dispatch had no handler for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Details for Unknown {
    const TAG: &'static str = "Unknown";
}

/// A dispatch met a tag it had no handler for.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("wari: missing error type '{tag}' in match call")]
pub struct MissingHandler {
    tag: String,
}

impl MissingHandler {
    pub(crate) fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    /// Returns the tag no handler was registered for.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }
}
