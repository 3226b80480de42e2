//! Value data model, per-parse arena, and structural operations shared by
//! the reader crate built on top of this one.
//!
//! This crate has no parsing logic in it at all: it defines what a parsed
//! form *is* (`Value`), where it lives (`Arena`/`Document`), how two forms
//! compare (`value_equal`/`value_hash`), how duplicate set elements and map
//! keys are caught, and the closed `Error`/`ErrorKind` vocabulary every
//! fallible operation in this workspace reports through.

mod accessors;
mod arena;
mod bigint;
mod dedup;
mod equality;
mod error;
mod external;
mod hash;
mod strings;
mod value;

pub use arena::{Arena, Document};
pub use dedup::{first_duplicate, has_duplicate};
pub use equality::value_equal;
pub use error::{Error, ErrorKind, ReadResult, Span};
pub use external::{
    external_create, external_get, external_register_type, ExternalEqualFn, ExternalHashFn,
    ExternalTypeRegistry,
};
pub use hash::value_hash;
pub use value::{
    BigDecSpan, BigIntSpan, BigRatioSpan, ExternalValue, Ident, LazyString, Value, ValueKind,
    ValueRef,
};

// Escape validation/expansion is a reader-time concern but the algorithm
// lives here so it can back both `LazyString::get` and the scanner that
// decides when a string needs it (see `reader::strings`).
pub mod strings_support {
    pub use crate::strings::{dedent_text_block, expand_escapes, validate_escapes, EscapeError};
}
