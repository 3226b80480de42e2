//! The recursive-descent driver: the one function per syntactic form that
//! [`crate::read`]/[`crate::read_with_options`] bottom out in. Every other
//! module in this crate (scanners, number classification, string decoding,
//! collection building, dispatch classification) exists to be called from
//! here.

use edn_core::{value_equal, Arena, Document, Error, ErrorKind, Ident, LazyString, Value, ValueKind, ValueRef};

use crate::dispatch::{self, DispatchKind};
use crate::identifiers::{self, ReservedWord};
use crate::simd;
use crate::{collections, numbers, strings, ReaderOptions};

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    arena: &'a Arena,
    options: &'a ReaderOptions,
}

/// Parse one form from `input`, returning a self-owned [`Document`].
///
/// # Safety of the arena/root split
/// `arena` is heap-allocated via `Box` before parsing starts so its address
/// is stable regardless of what happens to the `Box` value itself
/// afterwards. `arena_ptr` reborrows that stable heap address with a
/// lifetime the borrow checker cannot tie back to the local `arena`
/// binding, which is what lets `arena` be moved into the `Document` on the
/// next line even though `root` still borrows from it. `Document` is the
/// only place this crate reaches for this trick; everywhere else a
/// reference's lifetime is an ordinary named parameter.
pub fn parse_document(input: &str, options: &ReaderOptions) -> Result<Document, Error> {
    let arena = Box::new(Arena::new());
    let arena_ptr: *const Arena = &*arena;
    let root: &Value<'_> = {
        let arena_ref: &Arena = unsafe { &*arena_ptr };
        let mut parser = Parser {
            bytes: input.as_bytes(),
            pos: 0,
            arena: arena_ref,
            options,
        };
        match parser.parse_value() {
            Ok(value) => value,
            // An input with no form at all (empty, or fully consumed by
            // whitespace/comments/`#_` discards) bottoms out in the same
            // "expected a form, found end of input" error as a genuinely
            // truncated one; `eof_value` only overrides that specific case.
            Err(err) if err.kind == ErrorKind::UnexpectedEof => match options.eof_value() {
                Some(make_sentinel) => make_sentinel(arena_ref),
                None => return Err(err),
            },
            Err(err) => return Err(err),
        }
    };
    Ok(unsafe { Document::from_parts(arena, root) })
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn skip_trivia(&mut self) {
        self.pos = simd::skip_whitespace_and_comments(self.bytes, self.pos);
    }

    fn eof_error(&self, message: &'static str) -> Error {
        Error::with_static(ErrorKind::UnexpectedEof, message, (self.pos, self.pos))
    }

    /// An unmatched closing delimiter found while scanning a collection that
    /// opened at `start`: span runs from the opener through the offending
    /// byte, per the opener+closer error-span convention.
    fn unmatched_delimiter(&self, start: usize) -> Error {
        Error::with_static(
            ErrorKind::UnmatchedDelimiter,
            "closing delimiter does not match the collection it closed",
            (start, self.pos + 1),
        )
    }

    /// Entry point: skip leading trivia, parse exactly one form (which may
    /// itself be preceded by any number of `^metadata` prefixes).
    fn parse_value(&mut self) -> Result<ValueRef<'a>, Error> {
        self.skip_trivia();
        if self.peek() == Some(b'^') && self.options.features().metadata {
            return self.parse_with_metadata();
        }
        self.parse_form(None)
    }

    fn parse_with_metadata(&mut self) -> Result<ValueRef<'a>, Error> {
        // Each `^form` contributes a pair set; later prefixes are textually
        // closer to the value they decorate and win on key collision, so a
        // later set's pairs override an earlier set's rather than erroring
        // as a duplicate key.
        let mut pairs: Vec<(ValueRef<'a>, ValueRef<'a>)> = Vec::new();
        loop {
            self.pos += 1; // consume '^'
            self.skip_trivia();
            let meta_form = self.parse_form(None)?;
            for (key, value) in self.normalize_meta(meta_form)? {
                pairs.retain(|(existing, _)| !value_equal(existing, key));
                pairs.push((key, value));
            }
            self.skip_trivia();
            if self.peek() != Some(b'^') {
                break;
            }
        }
        let meta_kind = ValueKind::Map(self.arena.alloc_slice_from_iter(pairs));
        let meta_value: ValueRef<'a> = self.arena.alloc(Value::new(meta_kind));
        self.skip_trivia();
        self.parse_form(Some(meta_value))
    }

    /// `^:x` is sugar for `^{:x true}`; `^Sym` is sugar for `^{:tag Sym}`;
    /// `^{...}` is used as written.
    fn normalize_meta(&mut self, form: ValueRef<'a>) -> Result<Vec<(ValueRef<'a>, ValueRef<'a>)>, Error> {
        match &form.kind {
            ValueKind::Keyword(_) => {
                let truthy = self.arena.alloc(Value::new(ValueKind::Bool(true)));
                Ok(vec![(form, truthy)])
            }
            ValueKind::Symbol(_) | ValueKind::String(_) => {
                let tag_key = self.arena.alloc(Value::new(ValueKind::Keyword(Ident {
                    namespace: None,
                    name: "tag",
                })));
                Ok(vec![(tag_key, form)])
            }
            ValueKind::Vector(_) => {
                let param_tags_key = self.arena.alloc(Value::new(ValueKind::Keyword(Ident {
                    namespace: None,
                    name: "param-tags",
                })));
                Ok(vec![(param_tags_key, form)])
            }
            ValueKind::Map(pairs) => Ok(pairs.to_vec()),
            _ => Err(Error::with_static(
                ErrorKind::InvalidSyntax,
                "metadata must be a keyword, string, symbol, vector, or map",
                form.span.unwrap_or((self.pos, self.pos)),
            )),
        }
    }

    fn parse_form(&mut self, meta: Option<ValueRef<'a>>) -> Result<ValueRef<'a>, Error> {
        self.skip_trivia();
        let start = self.pos;
        match self.peek() {
            None => Err(self.eof_error("expected a form, found end of input")),
            Some(b'(') => self.parse_sequence(b'(', b')', start, meta, SeqKind::List),
            Some(b'[') => self.parse_sequence(b'[', b']', start, meta, SeqKind::Vector),
            Some(b'{') => self.parse_map(start, meta),
            Some(b')') | Some(b']') | Some(b'}') => Err(Error::with_static(
                ErrorKind::UnmatchedDelimiter,
                "closing delimiter with no matching open",
                (start, start + 1),
            )),
            Some(b'"') => self.parse_string_form(start, meta),
            Some(b':') => self.parse_keyword(start, meta),
            Some(b'\\') => self.parse_char(start, meta),
            Some(b'#') => self.parse_dispatch(start, meta),
            Some(b) if b.is_ascii_digit() => self.parse_number(start, meta),
            Some(b'+' | b'-') if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => {
                self.parse_number(start, meta)
            }
            Some(b) if simd::is_identifier_start(b) => self.parse_symbol(start, meta),
            Some(other) => Err(Error::with_static(
                ErrorKind::InvalidSyntax,
                syntax_message(other),
                (start, start + 1),
            )),
        }
    }

    fn finish(
        &mut self,
        kind: ValueKind<'a>,
        start: usize,
        meta: Option<ValueRef<'a>>,
    ) -> Result<ValueRef<'a>, Error> {
        if meta.is_some() && !accepts_metadata(&kind) {
            return Err(Error::with_static(
                ErrorKind::InvalidSyntax,
                "metadata can only attach to a list, vector, map, set, tagged value, or symbol",
                (start, self.pos),
            ));
        }
        let mut value = Value::with_span(kind, (start, self.pos));
        if let Some(m) = meta {
            value = value.with_meta(m);
        }
        Ok(self.arena.alloc(value))
    }

    fn parse_sequence(
        &mut self,
        open: u8,
        close: u8,
        start: usize,
        meta: Option<ValueRef<'a>>,
        seq_kind: SeqKind,
    ) -> Result<ValueRef<'a>, Error> {
        debug_assert_eq!(self.peek(), Some(open));
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None => {
                    return Err(Error::with_static(
                        ErrorKind::UnterminatedCollection,
                        "collection was never closed",
                        (start, self.pos),
                    ))
                }
                Some(b) if b == close => {
                    self.pos += 1;
                    break;
                }
                Some(b) if is_closing_delimiter(b) => {
                    return Err(self.unmatched_delimiter(start));
                }
                _ => items.push(self.parse_value_inner()?),
            }
        }
        let kind = match seq_kind {
            SeqKind::List => collections::build_list(items, self.arena),
            SeqKind::Vector => collections::build_vector(items, self.arena),
            SeqKind::Set => collections::build_set(items, self.arena, (start, self.pos))?,
        };
        self.finish(kind, start, meta)
    }

    fn parse_map(&mut self, start: usize, meta: Option<ValueRef<'a>>) -> Result<ValueRef<'a>, Error> {
        let pairs = self.parse_map_entries(start)?;
        let kind = collections::build_map(pairs, self.arena, (start, self.pos))?;
        self.finish(kind, start, meta)
    }

    fn parse_map_entries(&mut self, start: usize) -> Result<Vec<(ValueRef<'a>, ValueRef<'a>)>, Error> {
        debug_assert_eq!(self.peek(), Some(b'{'));
        self.pos += 1;
        let mut pairs = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None => {
                    return Err(Error::with_static(
                        ErrorKind::UnterminatedCollection,
                        "map was never closed",
                        (start, self.pos),
                    ))
                }
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(b')') | Some(b']') => {
                    return Err(self.unmatched_delimiter(start));
                }
                _ => {
                    let key = self.parse_value_inner()?;
                    self.skip_trivia();
                    if matches!(self.peek(), None | Some(b'}')) {
                        return Err(Error::with_static(
                            ErrorKind::InvalidSyntax,
                            "map literal must have an even number of forms",
                            (start, self.pos),
                        ));
                    }
                    let value = self.parse_value_inner()?;
                    pairs.push((key, value));
                }
            }
        }
        Ok(pairs)
    }

    /// Like [`Self::parse_value`] but used for elements nested inside a
    /// collection already being scanned — same metadata handling, no extra
    /// top-level bookkeeping.
    fn parse_value_inner(&mut self) -> Result<ValueRef<'a>, Error> {
        self.skip_trivia();
        if self.peek() == Some(b'^') && self.options.features().metadata {
            return self.parse_with_metadata();
        }
        self.parse_form(None)
    }

    fn parse_string_form(&mut self, start: usize, meta: Option<ValueRef<'a>>) -> Result<ValueRef<'a>, Error> {
        if self.peek_at(1) == Some(b'"') && self.peek_at(2) == Some(b'"') {
            if !self.options.features().text_blocks {
                return Err(Error::with_static(
                    ErrorKind::InvalidSyntax,
                    "text blocks are not enabled",
                    (start, start + 3),
                ));
            }
            let (content, end) = strings::scan_text_block(self.bytes, start + 3, self.arena)?;
            self.pos = end;
            let lazy = LazyString::new(content, false);
            return self.finish(ValueKind::String(lazy), start, meta);
        }
        let (lazy, end) = strings::scan_string(self.bytes, start + 1, self.arena)?;
        self.pos = end;
        self.finish(ValueKind::String(lazy), start, meta)
    }

    fn parse_keyword(&mut self, start: usize, meta: Option<ValueRef<'a>>) -> Result<ValueRef<'a>, Error> {
        let name_start = start + 1;
        let end = identifiers::scan_identifier(self.bytes, name_start);
        if end == name_start {
            return Err(Error::with_static(
                ErrorKind::InvalidSyntax,
                "keyword has no name",
                (start, end),
            ));
        }
        let text = self.intern_token(name_start, end)?;
        self.pos = end;
        // `::x`, `:/`, `:/x`, `:x/` are all rejected: a keyword's name part
        // may never itself start with `:` or be the lone separator `/`.
        if text.starts_with(':') || text == "/" {
            return Err(Error::with_static(
                ErrorKind::InvalidSyntax,
                "malformed keyword",
                (start, end),
            ));
        }
        let ident = identifiers::split_ident(text).ok_or_else(|| {
            Error::with_static(ErrorKind::InvalidSyntax, "malformed keyword", (start, end))
        })?;
        self.finish(ValueKind::Keyword(ident), start, meta)
    }

    fn parse_char(&mut self, start: usize, meta: Option<ValueRef<'a>>) -> Result<ValueRef<'a>, Error> {
        let (ch, end) = crate::chars::parse_char_literal(
            self.bytes,
            start + 1,
            self.options.features(),
            start,
        )?;
        self.pos = end;
        self.finish(ValueKind::Character(ch), start, meta)
    }

    fn parse_number(&mut self, start: usize, meta: Option<ValueRef<'a>>) -> Result<ValueRef<'a>, Error> {
        let end = simd::scan_number_body(self.bytes, start);
        let token = self.intern_token(start, end)?;
        self.pos = end;
        let kind = numbers::parse_number(token, self.arena, self.options.features(), (start, end))?;
        self.finish(kind, start, meta)
    }

    fn parse_symbol(&mut self, start: usize, meta: Option<ValueRef<'a>>) -> Result<ValueRef<'a>, Error> {
        let end = identifiers::scan_identifier(self.bytes, start);
        let text = self.intern_token(start, end)?;
        self.pos = end;
        let kind = match identifiers::reserved_word(text) {
            Some(ReservedWord::Nil) => ValueKind::Nil,
            Some(ReservedWord::True) => ValueKind::Bool(true),
            Some(ReservedWord::False) => ValueKind::Bool(false),
            None => {
                let ident = identifiers::split_ident(text).ok_or_else(|| {
                    Error::with_static(ErrorKind::InvalidSyntax, "malformed symbol", (start, end))
                })?;
                ValueKind::Symbol(ident)
            }
        };
        self.finish(kind, start, meta)
    }

    fn parse_dispatch(&mut self, start: usize, meta: Option<ValueRef<'a>>) -> Result<ValueRef<'a>, Error> {
        let after_hash = start + 1;
        match dispatch::classify(self.bytes, after_hash) {
            None => Err(self.eof_error("expected a dispatch form after '#'")),
            Some(DispatchKind::Set) => {
                self.pos = after_hash;
                self.parse_sequence(b'{', b'}', start, meta, SeqKind::Set)
            }
            Some(DispatchKind::Discard) => {
                self.pos = after_hash + 1; // consume '#_'
                self.skip_trivia();
                // Nothing left to discard: end-of-input, or the closing
                // delimiter of the collection `#_` sits inside. Either way
                // this is `invalid-discard` at the triggering `#_`, not
                // whatever error an attempted inner parse would raise.
                match self.peek() {
                    None => {
                        return Err(Error::with_static(
                            ErrorKind::InvalidDiscard,
                            "'#_' discards nothing: no form follows it",
                            (start, after_hash + 1),
                        ))
                    }
                    Some(b) if is_closing_delimiter(b) => {
                        return Err(Error::with_static(
                            ErrorKind::InvalidDiscard,
                            "'#_' discards nothing: the enclosing collection ends here",
                            (start, after_hash + 1),
                        ))
                    }
                    _ => {}
                }
                self.parse_value_inner()?; // parse and drop
                self.skip_trivia();
                self.parse_form(meta)
            }
            Some(DispatchKind::Symbolic) => self.parse_symbolic_float(start, meta),
            Some(DispatchKind::NamespacedMap) => self.parse_namespaced_map(start, meta),
            Some(DispatchKind::Tag) => self.parse_tag(start, meta),
        }
    }

    fn parse_symbolic_float(&mut self, start: usize, meta: Option<ValueRef<'a>>) -> Result<ValueRef<'a>, Error> {
        let name_start = start + 2;
        let mut end = name_start;
        if self.bytes.get(end) == Some(&b'-') {
            end += 1;
        }
        end = simd::scan_identifier_body(self.bytes, end);
        let text = self.intern_token(name_start, end)?;
        let value = dispatch::symbolic_float(text).ok_or_else(|| {
            Error::with_static(ErrorKind::InvalidSyntax, "unrecognized symbolic value", (start, end))
        })?;
        self.pos = end;
        self.finish(ValueKind::Float(value), start, meta)
    }

    fn parse_namespaced_map(&mut self, start: usize, meta: Option<ValueRef<'a>>) -> Result<ValueRef<'a>, Error> {
        if !self.options.features().namespaced_map_sugar {
            return Err(Error::with_static(
                ErrorKind::InvalidSyntax,
                "namespaced-map sugar is not enabled",
                (start, start + 2),
            ));
        }
        let ns_start = start + 2;
        let ns_end = identifiers::scan_identifier(self.bytes, ns_start);
        if ns_end == ns_start {
            return Err(Error::with_static(
                ErrorKind::InvalidSyntax,
                "namespaced-map sugar needs a namespace",
                (start, ns_start),
            ));
        }
        let namespace = self.intern_token(ns_start, ns_end)?;
        if namespace.contains('/') {
            return Err(Error::with_static(
                ErrorKind::InvalidSyntax,
                "namespaced-map sugar's namespace may not itself be namespaced",
                (start, ns_end),
            ));
        }
        self.pos = ns_end;
        self.skip_trivia();
        if self.peek() != Some(b'{') {
            return Err(Error::with_static(
                ErrorKind::InvalidSyntax,
                "namespaced-map sugar must be followed by a map",
                (start, self.pos),
            ));
        }
        let map_start = self.pos;
        let raw_pairs = self.parse_map_entries(map_start)?;
        let qualified: Vec<(ValueRef<'a>, ValueRef<'a>)> = raw_pairs
            .into_iter()
            .map(|(k, v)| (self.qualify_key(k, namespace), v))
            .collect();
        let kind = collections::build_map(qualified, self.arena, (start, self.pos))?;
        self.finish(kind, start, meta)
    }

    fn qualify_key(&mut self, key: ValueRef<'a>, namespace: &'a str) -> ValueRef<'a> {
        let span = key.span.unwrap_or((self.pos, self.pos));
        match &key.kind {
            ValueKind::Keyword(id) if id.namespace.is_none() => {
                let qualified = Value::with_span(
                    ValueKind::Keyword(Ident {
                        namespace: Some(namespace),
                        name: id.name,
                    }),
                    span,
                );
                self.arena.alloc(qualified)
            }
            ValueKind::Symbol(id) if id.namespace.is_none() => {
                let qualified = Value::with_span(
                    ValueKind::Symbol(Ident {
                        namespace: Some(namespace),
                        name: id.name,
                    }),
                    span,
                );
                self.arena.alloc(qualified)
            }
            _ => key,
        }
    }

    fn parse_tag(&mut self, start: usize, meta: Option<ValueRef<'a>>) -> Result<ValueRef<'a>, Error> {
        let tag_start = start + 1;
        let tag_end = identifiers::scan_identifier(self.bytes, tag_start);
        let tag_text = self.intern_token(tag_start, tag_end)?;
        self.pos = tag_end;
        let tag = identifiers::split_ident(tag_text).ok_or_else(|| {
            Error::with_static(ErrorKind::InvalidSyntax, "malformed tag", (start, tag_end))
        })?;
        self.skip_trivia();
        let inner = self.parse_value_inner()?;
        let result = self.options.registry().resolve(
            tag,
            inner,
            self.arena,
            self.options.fallback_policy(),
            (start, self.pos),
        )?;
        match meta {
            Some(m) => reattach_meta(result, m, self.arena),
            None => Ok(result),
        }
    }

    fn intern_token(&self, start: usize, end: usize) -> Result<&'a str, Error> {
        std::str::from_utf8(&self.bytes[start..end])
            .map(|s| self.arena.alloc_str(s))
            .map_err(|_| Error::with_static(ErrorKind::InvalidUtf8, "token is not valid UTF-8", (start, end)))
    }
}

enum SeqKind {
    List,
    Vector,
    Set,
}

fn is_closing_delimiter(byte: u8) -> bool {
    matches!(byte, b')' | b']' | b'}')
}

/// Metadata may only decorate a list, vector, map, set, tagged value, or
/// symbol — never a scalar (number, string, keyword, character, nil, bool).
fn accepts_metadata(kind: &ValueKind<'_>) -> bool {
    matches!(
        kind,
        ValueKind::List(_)
            | ValueKind::Vector(_)
            | ValueKind::Set(_)
            | ValueKind::Map(_)
            | ValueKind::Tagged { .. }
            | ValueKind::Symbol(_)
    )
}

fn syntax_message(byte: u8) -> &'static str {
    match byte {
        b'^' => "unexpected '^' with no following form",
        _ => "unrecognized start of a form",
    }
}

/// Rebuild a finished value with `meta` attached, for cases (tag dispatch)
/// where the value already exists by the time metadata is known to apply to
/// it. Every field is either `Copy` or, for `LazyString`, reconstructible
/// from its `Copy` raw span — no decode work or allocation beyond the new
/// node itself. Subject to the same kind restriction as `finish`: a tag's
/// reader (or an `Unwrap` fallback) can hand back a scalar, and metadata may
/// not attach to one.
fn reattach_meta<'a>(value: ValueRef<'a>, meta: ValueRef<'a>, arena: &'a Arena) -> Result<ValueRef<'a>, Error> {
    if !accepts_metadata(&value.kind) {
        return Err(Error::with_static(
            ErrorKind::InvalidSyntax,
            "metadata can only attach to a list, vector, map, set, tagged value, or symbol",
            value.span.unwrap_or((0, 0)),
        ));
    }
    let kind = match &value.kind {
        ValueKind::Nil => ValueKind::Nil,
        ValueKind::Bool(b) => ValueKind::Bool(*b),
        ValueKind::Int(i) => ValueKind::Int(*i),
        ValueKind::BigInt(b) => ValueKind::BigInt(*b),
        ValueKind::Float(f) => ValueKind::Float(*f),
        ValueKind::BigDec(d) => ValueKind::BigDec(*d),
        ValueKind::Ratio {
            numerator,
            denominator,
        } => ValueKind::Ratio {
            numerator: *numerator,
            denominator: *denominator,
        },
        ValueKind::BigRatio(r) => ValueKind::BigRatio(*r),
        ValueKind::Character(c) => ValueKind::Character(*c),
        ValueKind::String(s) => ValueKind::String(LazyString::new(s.raw(), s.has_escapes)),
        ValueKind::Symbol(id) => ValueKind::Symbol(*id),
        ValueKind::Keyword(id) => ValueKind::Keyword(*id),
        ValueKind::List(items) => ValueKind::List(*items),
        ValueKind::Vector(items) => ValueKind::Vector(*items),
        ValueKind::Set(items) => ValueKind::Set(*items),
        ValueKind::Map(pairs) => ValueKind::Map(*pairs),
        ValueKind::Tagged { tag, inner } => ValueKind::Tagged {
            tag: *tag,
            inner: *inner,
        },
        ValueKind::External(e) => ValueKind::External(*e),
    };
    Ok(arena.alloc(Value {
        kind,
        span: value.span,
        meta: Some(meta),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FallbackPolicy;

    fn parse(input: &str) -> Document {
        parse_document(input, &ReaderOptions::default()).expect("parse should succeed")
    }

    #[test]
    fn parses_nil_true_false() {
        assert!(matches!(parse("nil").root().kind, ValueKind::Nil));
        assert!(matches!(parse("true").root().kind, ValueKind::Bool(true)));
        assert!(matches!(parse("false").root().kind, ValueKind::Bool(false)));
    }

    #[test]
    fn parses_vector_of_ints() {
        let doc = parse("[1 2 3]");
        match &doc.root().kind {
            ValueKind::Vector(items) => assert_eq!(items.len(), 3),
            other => panic!("expected Vector, got {other:?}"),
        }
    }

    #[test]
    fn parses_nested_map() {
        let doc = parse("{:a 1 :b {:c 2}}");
        match &doc.root().kind {
            ValueKind::Map(pairs) => assert_eq!(pairs.len(), 2),
            other => panic!("expected Map, got {other:?}"),
        }
    }

    #[test]
    fn rejects_odd_length_map() {
        let err = parse_document("{:a 1 :b}", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidSyntax);
    }

    #[test]
    fn rejects_duplicate_set_element() {
        let err = parse_document("#{1 1}", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateElement);
    }

    #[test]
    fn rejects_unterminated_list() {
        let err = parse_document("(1 2 3", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedCollection);
    }

    #[test]
    fn wrong_closing_delimiter_spans_the_whole_collection() {
        let err = parse_document("[1 2 }", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnmatchedDelimiter);
        assert_eq!(err.span, (0, 6));
    }

    #[test]
    fn duplicate_element_error_spans_the_whole_set() {
        let err = parse_document("#{1 2 1}", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateElement);
        assert_eq!(err.span, (0, 8));
    }

    #[test]
    fn discard_skips_the_next_form() {
        let doc = parse("[1 #_2 3]");
        match &doc.root().kind {
            ValueKind::Vector(items) => assert_eq!(items.len(), 2),
            other => panic!("expected Vector, got {other:?}"),
        }
    }

    #[test]
    fn keyword_metadata_becomes_boolean_true_entry() {
        let doc = parse("^:private sym");
        let meta = doc.root().meta.expect("metadata expected");
        match &meta.kind {
            ValueKind::Map(pairs) => {
                assert_eq!(pairs.len(), 1);
                assert!(matches!(pairs[0].1.kind, ValueKind::Bool(true)));
            }
            other => panic!("expected Map, got {other:?}"),
        }
    }

    #[test]
    fn namespaced_map_sugar_qualifies_bare_keywords() {
        let doc = parse("#:user{:name \"a\" :other/ns :kept}");
        match &doc.root().kind {
            ValueKind::Map(pairs) => {
                let (k0, _) = pairs[0];
                match &k0.kind {
                    ValueKind::Keyword(id) => assert_eq!(id.namespace, Some("user")),
                    other => panic!("expected Keyword, got {other:?}"),
                }
            }
            other => panic!("expected Map, got {other:?}"),
        }
    }

    #[test]
    fn string_metadata_becomes_a_tag_entry() {
        let doc = parse(r#"^"meters" sym"#);
        let meta = doc.root().meta.expect("metadata expected");
        match &meta.kind {
            ValueKind::Map(pairs) => {
                assert_eq!(pairs.len(), 1);
                match &pairs[0].0.kind {
                    ValueKind::Keyword(id) => assert_eq!(id.name, "tag"),
                    other => panic!("expected Keyword, got {other:?}"),
                }
                assert!(matches!(pairs[0].1.kind, ValueKind::String(_)));
            }
            other => panic!("expected Map, got {other:?}"),
        }
    }

    #[test]
    fn vector_metadata_becomes_a_param_tags_entry() {
        let doc = parse("^[int int] sym");
        let meta = doc.root().meta.expect("metadata expected");
        match &meta.kind {
            ValueKind::Map(pairs) => {
                assert_eq!(pairs.len(), 1);
                match &pairs[0].0.kind {
                    ValueKind::Keyword(id) => assert_eq!(id.name, "param-tags"),
                    other => panic!("expected Keyword, got {other:?}"),
                }
                assert!(matches!(pairs[0].1.kind, ValueKind::Vector(_)));
            }
            other => panic!("expected Map, got {other:?}"),
        }
    }

    #[test]
    fn namespaced_map_sugar_qualifies_bare_symbol_keys_too() {
        let doc = parse("#:user{name \"a\"}");
        match &doc.root().kind {
            ValueKind::Map(pairs) => match &pairs[0].0.kind {
                ValueKind::Symbol(id) => assert_eq!(id.namespace, Some("user")),
                other => panic!("expected Symbol, got {other:?}"),
            },
            other => panic!("expected Map, got {other:?}"),
        }
    }

    #[test]
    fn namespaced_map_sugar_rejects_a_namespaced_namespace() {
        let err = parse_document("#:a/b{:x 1}", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidSyntax);
    }

    #[test]
    fn solo_slash_parses_as_a_symbol() {
        let doc = parse("/");
        match &doc.root().kind {
            ValueKind::Symbol(id) => {
                assert_eq!(id.namespace, None);
                assert_eq!(id.name, "/");
            }
            other => panic!("expected Symbol, got {other:?}"),
        }
    }

    #[test]
    fn malformed_symbol_slash_shapes_are_rejected() {
        for input in ["/x", "x/", "a/b/c"] {
            let err = parse_document(input, &ReaderOptions::default()).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidSyntax, "input {input:?}");
        }
    }

    #[test]
    fn malformed_keyword_slash_shapes_are_rejected() {
        for input in ["::x", ":/", ":/x", ":x/"] {
            let err = parse_document(input, &ReaderOptions::default()).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidSyntax, "input {input:?}");
        }
    }

    #[test]
    fn bare_discard_with_nothing_after_it_is_invalid_discard() {
        let err = parse_document("#_", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDiscard);

        let err = parse_document("#_ ; comment only\n", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDiscard);
    }

    #[test]
    fn discard_at_the_end_of_a_collection_is_invalid_discard() {
        let err = parse_document("[1 #_]", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDiscard);
    }

    #[test]
    fn composable_discard_drops_both_forms() {
        let doc = parse("[1 #_ #_ 2 3 4]");
        match &doc.root().kind {
            ValueKind::Vector(items) => assert_eq!(items.len(), 2),
            other => panic!("expected Vector, got {other:?}"),
        }
    }

    #[test]
    fn chained_metadata_merges_with_the_later_prefix_winning() {
        let doc = parse("^{:x 1 :y 2} ^{:x 3} sym");
        let meta = doc.root().meta.expect("metadata expected");
        match &meta.kind {
            ValueKind::Map(pairs) => {
                assert_eq!(pairs.len(), 2);
                let x = pairs
                    .iter()
                    .find(|(k, _)| matches!(&k.kind, ValueKind::Keyword(id) if id.name == "x"))
                    .expect("x entry");
                assert!(matches!(x.1.kind, ValueKind::Int(3)));
            }
            other => panic!("expected Map, got {other:?}"),
        }
    }

    #[test]
    fn metadata_on_a_scalar_is_invalid_syntax() {
        let err = parse_document("^:x 1", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidSyntax);

        let err = parse_document("^:x \"s\"", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidSyntax);

        let err = parse_document("^:x :k", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidSyntax);
    }

    #[test]
    fn metadata_on_a_vector_still_works() {
        let doc = parse("^:x [1 2]");
        assert!(doc.root().meta.is_some());
    }

    #[test]
    fn unknown_tag_defaults_to_passthrough() {
        let doc = parse("#my/tag 1");
        assert!(matches!(doc.root().kind, ValueKind::Tagged { .. }));
    }

    #[test]
    fn unknown_tag_error_policy_reports_error() {
        let options = ReaderOptions::default().with_fallback_policy(FallbackPolicy::Error);
        let err = parse_document("#my/tag 1", &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownTag);
    }

    #[test]
    fn metadata_on_an_unwrapped_tag_scalar_is_invalid_syntax() {
        // Unwrap drops the tag and hands back the inner value verbatim; when
        // that value is a scalar, attaching the preceding metadata to it is
        // just as illegal as attaching straight to a bare number.
        let options = ReaderOptions::default().with_fallback_policy(FallbackPolicy::Unwrap);
        let err = parse_document("^:x #my/tag 1", &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidSyntax);
    }

    #[test]
    fn metadata_on_an_unwrapped_tag_collection_still_works() {
        let options = ReaderOptions::default().with_fallback_policy(FallbackPolicy::Unwrap);
        let doc = parse_document("^:x #my/tag [1 2]", &options).unwrap();
        assert!(doc.root().meta.is_some());
    }

    #[test]
    fn symbolic_nan_parses_to_a_nan_float() {
        let doc = parse("##NaN");
        match &doc.root().kind {
            ValueKind::Float(f) => assert!(f.is_nan()),
            other => panic!("expected Float, got {other:?}"),
        }
    }

    fn eof_sentinel<'a>(arena: &'a Arena) -> ValueRef<'a> {
        arena.alloc(Value::new(ValueKind::Keyword(Ident {
            namespace: None,
            name: "eof",
        })))
    }

    #[test]
    fn empty_input_errors_without_an_eof_value() {
        let err = parse_document("", &ReaderOptions::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEof);
    }

    #[test]
    fn empty_input_returns_the_configured_eof_value() {
        let options = ReaderOptions::default().with_eof_value(eof_sentinel);
        let doc = parse_document("", &options).expect("parse should succeed");
        match &doc.root().kind {
            ValueKind::Keyword(id) => assert_eq!(id.name, "eof"),
            other => panic!("expected Keyword, got {other:?}"),
        }
    }

    #[test]
    fn whitespace_and_comment_only_input_returns_the_eof_value() {
        let options = ReaderOptions::default().with_eof_value(eof_sentinel);
        let doc = parse_document("  \n; just a comment\n", &options).expect("parse should succeed");
        assert!(matches!(doc.root().kind, ValueKind::Keyword(_)));
    }

    #[test]
    fn discard_only_input_returns_the_eof_value() {
        let options = ReaderOptions::default().with_eof_value(eof_sentinel);
        let doc = parse_document("#_ 1", &options).expect("parse should succeed");
        assert!(matches!(doc.root().kind, ValueKind::Keyword(_)));
    }

    #[test]
    fn eof_value_does_not_mask_a_genuine_parse_error() {
        let options = ReaderOptions::default().with_eof_value(eof_sentinel);
        let err = parse_document("(1 2", &options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnterminatedCollection);
    }
}
