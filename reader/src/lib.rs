//! A textual data notation reader: turns UTF-8 bytes into an
//! [`edn_core::Document`] holding a tree of [`edn_core::Value`]s.
//!
//! The public surface is small on purpose: [`read`] and [`read_with_options`]
//! parse one form from the start of the input, [`ReaderOptions`] configures
//! the dialect and tag-reader registry, and the rest of this crate
//! (scanners, number classification, string decoding, collection building,
//! reader-macro dispatch) exists to make the recursive-descent driver in
//! [`parser`] possible. No CLI, no language server, no FFI layer — those
//! would be thin consumers of this API, not part of it.

mod chars;
mod collections;
mod dispatch;
mod identifiers;
mod numbers;
mod parser;
mod registry;
mod simd;
mod strings;

pub use edn_core::{
    external_create, external_get, external_register_type, first_duplicate, has_duplicate,
    value_equal, value_hash, Arena, BigDecSpan, BigIntSpan, BigRatioSpan, Document, Error,
    ErrorKind, ExternalEqualFn, ExternalHashFn, ExternalTypeRegistry, ExternalValue, Ident,
    LazyString, ReadResult, Span, Value, ValueKind, ValueRef,
};
pub use registry::{FallbackPolicy, ReaderFn, Registry};

/// Builds the sentinel value `read_with_options` returns for an input that
/// contains no form at all (empty, or only whitespace/comments/discards),
/// instead of failing with `unexpected-eof`. A function pointer rather than
/// a stored `Value` because `ReaderOptions` outlives any one parse's arena:
/// the sentinel has to be (re)allocated into whichever arena is parsing,
/// the same reason `ReaderFn` in [`registry`] takes an `&'a Arena` rather
/// than closing over one.
pub type EofValueFn = for<'a> fn(&'a Arena) -> ValueRef<'a>;

/// Grammar extensions a host can enable or disable, independent of one
/// another. Defaults follow this notation's "strict core plus optional
/// extensions" reading: ratios, metadata, and namespaced-map sugar are part
/// of the core value model and default on; the remaining extensions are
/// pulled in from looser dialects and default off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderFeatures {
    pub ratios: bool,
    pub metadata: bool,
    pub namespaced_map_sugar: bool,
    pub hex_integers: bool,
    pub octal_integers: bool,
    pub underscore_digit_grouping: bool,
    pub text_blocks: bool,
    pub extended_char_names: bool,
}

impl Default for ReaderFeatures {
    fn default() -> Self {
        ReaderFeatures {
            ratios: true,
            metadata: true,
            namespaced_map_sugar: true,
            hex_integers: false,
            octal_integers: false,
            underscore_digit_grouping: false,
            text_blocks: false,
            extended_char_names: false,
        }
    }
}

/// Builder-pattern configuration for a parse, in the same shape this
/// codebase's compiler configuration takes: an empty/default-valued struct
/// extended one setting at a time via `with_*` methods that consume and
/// return `self`.
#[derive(Clone)]
pub struct ReaderOptions {
    registry: std::sync::Arc<Registry>,
    fallback_policy: FallbackPolicy,
    features: ReaderFeatures,
    eof_value: Option<EofValueFn>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            registry: std::sync::Arc::new(Registry::new()),
            fallback_policy: FallbackPolicy::default(),
            features: ReaderFeatures::default(),
            eof_value: None,
        }
    }
}

impl ReaderOptions {
    pub fn new() -> Self {
        ReaderOptions::default()
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = std::sync::Arc::new(registry);
        self
    }

    pub fn with_fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback_policy = policy;
        self
    }

    pub fn with_features(mut self, features: ReaderFeatures) -> Self {
        self.features = features;
        self
    }

    /// Set the sentinel an empty (or fully whitespace/comment/discard) input
    /// should produce instead of an `unexpected-eof` error.
    pub fn with_eof_value(mut self, eof_value: EofValueFn) -> Self {
        self.eof_value = Some(eof_value);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback_policy
    }

    pub fn features(&self) -> &ReaderFeatures {
        &self.features
    }

    pub fn eof_value(&self) -> Option<EofValueFn> {
        self.eof_value
    }
}

/// Parse one form from `input` using default options. Trailing bytes after
/// the form (including trailing whitespace or comments) are ignored; use
/// the returned document's arena together with the byte offset this
/// function does not currently expose if sequential reads from the same
/// buffer are needed (see DESIGN.md, Open Question 1).
pub fn read(input: &str) -> ReadResult<Document> {
    read_with_options(input, &ReaderOptions::default())
}

pub fn read_with_options(input: &str, options: &ReaderOptions) -> ReadResult<Document> {
    parser::parse_document(input, options)
}

/// Translate a byte offset into a 1-based `(line, column)` pair. Not stored
/// on `Error` itself — spans are byte offsets throughout this crate, and
/// line/column are a presentation concern for whatever is displaying the
/// error, derived on demand.
pub fn source_position(input: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for b in input.as_bytes().iter().take(offset) {
        if *b == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}
