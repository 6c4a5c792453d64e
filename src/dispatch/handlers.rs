//! Handler tables for [`dispatch`](super::dispatch).

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use crate::{Details, TaggedError};

type Handler<'h, R> = Box<dyn FnOnce(TaggedError) -> R + 'h>;

/// Handlers keyed by tag, with an optional default.
///
/// Every handler produces the same output type `R`. A handler that has
/// nothing to return is written with `R = Option<T>` returning `None`, which
/// keeps "handled, no value" distinct from a value that passed through.
///
/// Registering a tag twice keeps the last handler.
///
/// ## Example
///
/// ```rust
/// use wari::Handlers;
///
/// let handlers = Handlers::new()
///     .with_handler("JsonError", |_| 200)
///     .with_handler("HttpError", |_| 100)
///     .with_default(|_| 0);
///
/// assert!(handlers.handles("JsonError"));
/// assert!(handlers.handles("FileError"));
/// ```
pub struct Handlers<'h, R> {
    by_tag: HashMap<Cow<'static, str>, Handler<'h, R>>,
    fallback: Option<Handler<'h, R>>,
}

impl<'h, R> Handlers<'h, R> {
    /// Creates an empty table. Dispatching an error against it always misses.
    pub fn new() -> Self {
        Self {
            by_tag: HashMap::new(),
            fallback: None,
        }
    }

    /// Registers `handler` for errors tagged `tag`.
    #[must_use]
    pub fn with_handler(
        mut self,
        tag: impl Into<Cow<'static, str>>,
        handler: impl FnOnce(TaggedError) -> R + 'h,
    ) -> Self {
        self.by_tag.insert(tag.into(), Box::new(handler));
        self
    }

    /// Registers `handler` for errors of kind `D`.
    #[must_use]
    pub fn with_kind<D: Details>(self, handler: impl FnOnce(TaggedError) -> R + 'h) -> Self {
        self.with_handler(D::TAG, handler)
    }

    /// Sets the handler used when no tag-specific handler matches.
    #[must_use]
    pub fn with_default(mut self, handler: impl FnOnce(TaggedError) -> R + 'h) -> Self {
        self.fallback = Some(Box::new(handler));
        self
    }

    /// Returns `true` if an error tagged `tag` would reach a handler.
    pub fn handles(&self, tag: &str) -> bool {
        self.fallback.is_some() || self.by_tag.contains_key(tag)
    }

    /// Returns `true` if a default handler is set.
    pub fn has_default(&self) -> bool {
        self.fallback.is_some()
    }

    /// Returns the number of tag-specific handlers.
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// Returns `true` if there are no handlers at all.
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty() && self.fallback.is_none()
    }

    /// Takes the handler for `tag`, falling back to the default.
    pub(super) fn take(mut self, tag: &str) -> Option<Handler<'h, R>> {
        self.by_tag.remove(tag).or(self.fallback)
    }
}

impl<R> Default for Handlers<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for Handlers<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.by_tag.keys().collect();
        tags.sort();
        f.debug_struct("Handlers")
            .field("tags", &tags)
            .field("default", &self.fallback.is_some())
            .finish()
    }
}
