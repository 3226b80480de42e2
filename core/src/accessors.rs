//! Type predicates and field accessors over [`crate::Value`].
//!
//! Every accessor returns `Option`, following this workspace's existing
//! `ValueRef`-returning collection builders rather than the failure-flag or
//! out-parameter shapes of a C-style API: a variant mismatch is simply
//! `None`, not a distinct error path. Grouped into this one module because
//! none of them teach anything past the first handful — they are the glue a
//! host embedding this crate needs, not core parsing logic.

use crate::arena::Arena;
use crate::error::Span;
use crate::equality::value_equal;
use crate::value::{
    BigDecSpan, BigIntSpan, BigRatioSpan, ExternalValue, Ident, Value, ValueKind, ValueRef,
};

impl<'a> Value<'a> {
    // -- type predicates -------------------------------------------------

    pub fn is_bool(&self) -> bool {
        matches!(self.kind, ValueKind::Bool(_))
    }

    /// True for every numeric-family kind: `Int`, `BigInt`, `Float`,
    /// `BigDec`, `Ratio`, `BigRatio`.
    pub fn is_number(&self) -> bool {
        matches!(
            self.kind,
            ValueKind::Int(_)
                | ValueKind::BigInt(_)
                | ValueKind::Float(_)
                | ValueKind::BigDec(_)
                | ValueKind::Ratio { .. }
                | ValueKind::BigRatio(_)
        )
    }

    /// True for the exact-integer kinds: `Int`, `BigInt`. Floats, decimals,
    /// and ratios are numbers but not integers, even `Ratio(4, 2)` — that
    /// ratio reduces to `Int(2)` at parse time (see §3.2 invariant 4), so by
    /// the time a caller can observe it, it already is one.
    pub fn is_integer(&self) -> bool {
        matches!(self.kind, ValueKind::Int(_) | ValueKind::BigInt(_))
    }

    pub fn is_collection(&self) -> bool {
        matches!(
            self.kind,
            ValueKind::List(_) | ValueKind::Vector(_) | ValueKind::Set(_) | ValueKind::Map(_)
        )
    }

    // -- scalar accessors --------------------------------------------------

    pub fn as_bool(&self) -> Option<bool> {
        match self.kind {
            ValueKind::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int64(&self) -> Option<i64> {
        match self.kind {
            ValueKind::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self.kind {
            ValueKind::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_character(&self) -> Option<char> {
        match self.kind {
            ValueKind::Character(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_bigint(&self) -> Option<BigIntSpan<'a>> {
        match self.kind {
            ValueKind::BigInt(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_bigdec(&self) -> Option<BigDecSpan<'a>> {
        match self.kind {
            ValueKind::BigDec(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_ratio(&self) -> Option<(i64, i64)> {
        match self.kind {
            ValueKind::Ratio {
                numerator,
                denominator,
            } => Some((numerator, denominator)),
            _ => None,
        }
    }

    pub fn as_bigratio(&self) -> Option<BigRatioSpan<'a>> {
        match self.kind {
            ValueKind::BigRatio(r) => Some(r),
            _ => None,
        }
    }

    /// The string's raw (still-escaped) span and whether it needs decoding.
    /// Use [`Value::string_get`] to materialize actual content.
    pub fn as_raw_string(&self) -> Option<(&'a str, bool)> {
        match &self.kind {
            ValueKind::String(s) => Some((s.raw(), s.has_escapes)),
            _ => None,
        }
    }

    /// The string's content and byte length, decoding and caching into
    /// `arena` on first access if the literal contained escapes (see
    /// [`crate::LazyString::get`]).
    pub fn string_get(&self, arena: &'a Arena) -> Option<(&'a str, usize)> {
        match &self.kind {
            ValueKind::String(s) => {
                let content = s.get(arena);
                Some((content, content.len()))
            }
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<Ident<'a>> {
        match self.kind {
            ValueKind::Symbol(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<Ident<'a>> {
        match self.kind {
            ValueKind::Keyword(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_tagged(&self) -> Option<(Ident<'a>, ValueRef<'a>)> {
        match self.kind {
            ValueKind::Tagged { tag, inner } => Some((tag, inner)),
            _ => None,
        }
    }

    pub fn as_external(&self) -> Option<ExternalValue> {
        match self.kind {
            ValueKind::External(e) => Some(e),
            _ => None,
        }
    }

    // -- collection accessors ---------------------------------------------

    pub fn as_list(&self) -> Option<&'a [ValueRef<'a>]> {
        match self.kind {
            ValueKind::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&'a [ValueRef<'a>]> {
        match self.kind {
            ValueKind::Vector(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&'a [ValueRef<'a>]> {
        match self.kind {
            ValueKind::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&'a [(ValueRef<'a>, ValueRef<'a>)]> {
        match self.kind {
            ValueKind::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Element count for any of the four collection kinds; `None` for
    /// anything else (not zero — an empty list and a non-collection are
    /// different failures for a caller to distinguish).
    pub fn count(&self) -> Option<usize> {
        match &self.kind {
            ValueKind::List(items) | ValueKind::Vector(items) | ValueKind::Set(items) => {
                Some(items.len())
            }
            ValueKind::Map(pairs) => Some(pairs.len()),
            _ => None,
        }
    }

    /// Indexed access into a list, vector, or set, in iteration order.
    pub fn index_get(&self, index: usize) -> Option<ValueRef<'a>> {
        match &self.kind {
            ValueKind::List(items) | ValueKind::Vector(items) | ValueKind::Set(items) => {
                items.get(index).copied()
            }
            _ => None,
        }
    }

    /// Structural membership test for a set.
    pub fn set_contains(&self, element: &Value<'_>) -> bool {
        match &self.kind {
            ValueKind::Set(items) => items.iter().any(|item| value_equal(item, element)),
            _ => false,
        }
    }

    /// Looks a key up in a map by structural equality, returning its value.
    pub fn map_get(&self, key: &Value<'_>) -> Option<ValueRef<'a>> {
        match &self.kind {
            ValueKind::Map(pairs) => pairs
                .iter()
                .find(|(k, _)| value_equal(k, key))
                .map(|(_, v)| *v),
            _ => None,
        }
    }

    pub fn map_contains_key(&self, key: &Value<'_>) -> bool {
        self.map_get(key).is_some()
    }

    /// The byte-offset span this form occupied in its source input, if the
    /// tree carries positions (every node built by [`crate::Arena`]-backed
    /// parsing does; hand-built test fixtures may not).
    pub fn source_position(&self) -> Option<Span> {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::LazyString;

    fn v(kind: ValueKind) -> Value {
        Value::new(kind)
    }

    #[test]
    fn is_number_covers_the_whole_numeric_family() {
        assert!(v(ValueKind::Int(1)).is_number());
        assert!(v(ValueKind::Float(1.0)).is_number());
        assert!(v(ValueKind::Ratio {
            numerator: 1,
            denominator: 2
        })
        .is_number());
        assert!(!v(ValueKind::Bool(true)).is_number());
    }

    #[test]
    fn is_integer_excludes_floats_and_ratios() {
        assert!(v(ValueKind::Int(1)).is_integer());
        assert!(!v(ValueKind::Float(1.0)).is_integer());
        assert!(!v(ValueKind::Ratio {
            numerator: 1,
            denominator: 2
        })
        .is_integer());
    }

    #[test]
    fn as_int64_returns_none_for_other_kinds() {
        assert_eq!(v(ValueKind::Bool(true)).as_int64(), None);
        assert_eq!(v(ValueKind::Int(7)).as_int64(), Some(7));
    }

    #[test]
    fn string_get_decodes_and_reports_length() {
        let arena = Arena::new();
        let value = v(ValueKind::String(LazyString::new(r"a\nb", true)));
        let (content, len) = value.string_get(&arena).unwrap();
        assert_eq!(content, "a\nb");
        assert_eq!(len, 3);
    }

    #[test]
    fn count_and_index_get_over_a_vector() {
        let one = v(ValueKind::Int(1));
        let two = v(ValueKind::Int(2));
        let items = [&one, &two];
        let vector = v(ValueKind::Vector(&items));
        assert_eq!(vector.count(), Some(2));
        assert_eq!(vector.index_get(1).unwrap().as_int64(), Some(2));
        assert!(vector.index_get(2).is_none());
    }

    #[test]
    fn map_get_uses_structural_equality() {
        let key = v(ValueKind::Int(1));
        let value = v(ValueKind::Bool(true));
        let entries = [(&key, &value)];
        let map = v(ValueKind::Map(&entries));
        let lookup_key = v(ValueKind::Int(1));
        assert_eq!(map.map_get(&lookup_key).unwrap().as_bool(), Some(true));
        assert!(map.map_contains_key(&lookup_key));
    }

    #[test]
    fn set_contains_uses_structural_equality() {
        let one = v(ValueKind::Int(1));
        let items = [&one];
        let set = v(ValueKind::Set(&items));
        let probe = v(ValueKind::Int(1));
        assert!(set.set_contains(&probe));
        let miss = v(ValueKind::Int(2));
        assert!(!set.set_contains(&miss));
    }

    #[test]
    fn count_is_none_for_non_collections() {
        assert_eq!(v(ValueKind::Int(1)).count(), None);
    }
}
