//! The reader registry: pluggable handling for `#tag value` forms.
//!
//! A registered reader function transforms the value following a tag into
//! whatever the host wants that tag to mean (a timestamp, a UUID, a
//! domain-specific wrapper type). Unrecognized tags fall back to the
//! policy configured on [`crate::ReaderOptions`].

use edn_core::{Arena, Error, ErrorKind, Ident, Span, Value, ValueRef};
use std::collections::HashMap;

/// A registered tag handler. Takes the value the tag form wrapped and
/// returns the value the tag should resolve to (often, but not always, a
/// `Tagged` node referencing the original), or a plain error message — the
/// registry is the one place that turns a failure into a structured
/// [`Error`], always as [`ErrorKind::InvalidSyntax`] spanning the tagged
/// literal, regardless of what went wrong inside the reader function.
pub type ReaderFn = for<'a> fn(Ident<'a>, ValueRef<'a>, &'a Arena) -> Result<ValueRef<'a>, String>;

/// What to do with a `#tag value` form whose tag has no registered reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Keep the form as a `Tagged` node carrying the tag and inner value.
    #[default]
    Passthrough,
    /// Drop the tag and return the inner value unchanged.
    Unwrap,
    /// Report `ErrorKind::UnknownTag`.
    Error,
}

/// Maps tag names to their reader functions.
#[derive(Default)]
pub struct Registry {
    readers: HashMap<String, ReaderFn>,
}

impl Registry {
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn register(&mut self, tag: impl Into<String>, reader: ReaderFn) {
        self.readers.insert(tag.into(), reader);
    }

    /// Removes a previously registered reader, returning it if one was set.
    pub fn unregister(&mut self, tag: &str) -> Option<ReaderFn> {
        self.readers.remove(tag)
    }

    fn lookup(&self, tag: &Ident) -> Option<ReaderFn> {
        let key = qualified_name(tag);
        self.readers.get(&key).copied()
    }

    /// Resolve a `#tag value` form: run the registered reader if one
    /// exists, otherwise apply `policy`.
    pub fn resolve<'a>(
        &self,
        tag: Ident<'a>,
        inner: ValueRef<'a>,
        arena: &'a Arena,
        policy: FallbackPolicy,
        span: Span,
    ) -> Result<ValueRef<'a>, Error> {
        if let Some(reader) = self.lookup(&tag) {
            return reader(tag, inner, arena)
                .map_err(|message| Error::with_owned(ErrorKind::InvalidSyntax, message, span));
        }
        match policy {
            FallbackPolicy::Passthrough => {
                Ok(arena.alloc(Value::with_span(
                    edn_core::ValueKind::Tagged { tag, inner },
                    span,
                )))
            }
            FallbackPolicy::Unwrap => Ok(inner),
            FallbackPolicy::Error => Err(Error::with_owned(
                ErrorKind::UnknownTag,
                format!("no reader registered for tag '{}'", qualified_name(&tag)),
                span,
            )),
        }
    }
}

fn qualified_name(id: &Ident) -> String {
    match id.namespace {
        Some(ns) => format!("{ns}/{}", id.name),
        None => id.name.to_string(),
    }
}
