//! Structural equality over `Value` trees.
//!
//! Equality is recursive and by meaning, not by representation: `Int(255)`
//! equals a `BigInt` spelling the same magnitude in any radix, `NaN` is
//! unequal to itself, and a `String`'s content is compared after escape
//! expansion even when the two spans used different escaping to say the
//! same thing. Lists and vectors are order-sensitive; sets and maps compare
//! as unordered collections.

use crate::bigint::CanonicalInt;
use crate::strings;
use crate::value::{Ident, LazyString, Value, ValueKind};

/// Structural equality, per this crate's contract (see module docs).
pub fn value_equal(a: &Value, b: &Value) -> bool {
    kind_equal(&a.kind, &b.kind)
}

fn kind_equal(a: &ValueKind, b: &ValueKind) -> bool {
    match (a, b) {
        (ValueKind::Nil, ValueKind::Nil) => true,
        (ValueKind::Bool(x), ValueKind::Bool(y)) => x == y,
        (ValueKind::Character(x), ValueKind::Character(y)) => x == y,
        (ValueKind::Float(x), ValueKind::Float(y)) => {
            // NaN is unequal to itself, matching IEEE 754 semantics rather
            // than a "nice" total order.
            !x.is_nan() && !y.is_nan() && x == y
        }
        (ValueKind::String(x), ValueKind::String(y)) => lazy_string_equal(x, y),
        (ValueKind::Symbol(x), ValueKind::Symbol(y)) => ident_equal(x, y),
        (ValueKind::Keyword(x), ValueKind::Keyword(y)) => ident_equal(x, y),
        (ValueKind::List(x), ValueKind::List(y)) => ordered_equal(x, y),
        (ValueKind::Vector(x), ValueKind::Vector(y)) => ordered_equal(x, y),
        (ValueKind::Set(x), ValueKind::Set(y)) => unordered_equal(x, y),
        (ValueKind::Map(x), ValueKind::Map(y)) => unordered_map_equal(x, y),
        (ValueKind::Tagged { tag: t1, inner: i1 }, ValueKind::Tagged { tag: t2, inner: i2 }) => {
            ident_equal(t1, t2) && value_equal(i1, i2)
        }
        (ValueKind::External(x), ValueKind::External(y)) => crate::external::process_equal(*x, *y),
        _ => integer_family_equal(a, b),
    }
}

/// `Int`/`BigInt`/`Ratio`/`BigRatio` cross-compare by mathematical value.
/// Any pairing outside that family (e.g. `Int` vs `Bool`) is unequal.
fn integer_family_equal(a: &ValueKind, b: &ValueKind) -> bool {
    match (to_canonical_int(a), to_canonical_int(b)) {
        (Some(x), Some(y)) => x == y,
        _ => match (to_canonical_ratio(a), to_canonical_ratio(b)) {
            (Some((xn, xd)), Some((yn, yd))) => xn == yn && xd == yd,
            _ => false,
        },
    }
}

fn to_canonical_int(kind: &ValueKind) -> Option<CanonicalInt> {
    match kind {
        ValueKind::Int(i) => Some(CanonicalInt::from_i64(*i)),
        ValueKind::BigInt(b) => Some(CanonicalInt::from_radix_digits(
            b.digits, b.radix, b.negative,
        )),
        _ => None,
    }
}

fn to_canonical_ratio(kind: &ValueKind) -> Option<(CanonicalInt, CanonicalInt)> {
    match kind {
        ValueKind::Ratio {
            numerator,
            denominator,
        } => Some((
            CanonicalInt::from_i64(*numerator),
            CanonicalInt::from_i64(*denominator),
        )),
        ValueKind::BigRatio(r) => Some((
            CanonicalInt::from_radix_digits(r.numerator, 10, r.negative),
            CanonicalInt::from_radix_digits(r.denominator, 10, false),
        )),
        _ => None,
    }
}

fn ident_equal(a: &Ident, b: &Ident) -> bool {
    a.namespace == b.namespace && a.name == b.name
}

fn lazy_string_equal(a: &LazyString, b: &LazyString) -> bool {
    if !a.has_escapes && !b.has_escapes {
        return a.raw == b.raw;
    }
    decoded_content(a) == decoded_content(b)
}

/// Decode into a scratch `String` purely for comparison, without touching
/// the `LazyString`'s own arena-backed cache (equality has no arena to
/// allocate into and no need to materialize a cached copy).
fn decoded_content<'a>(s: &LazyString<'a>) -> std::borrow::Cow<'a, str> {
    if s.has_escapes {
        std::borrow::Cow::Owned(strings::expand_escapes(s.raw))
    } else {
        std::borrow::Cow::Borrowed(s.raw)
    }
}

fn ordered_equal(a: &[&Value], b: &[&Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| value_equal(x, y))
}

/// Unordered comparison for sets: every element of `a` appears exactly once
/// in `b`. Both sides are already duplicate-free by construction (the
/// adaptive duplicate detector rejects duplicate elements at parse time), so
/// matching lengths plus a one-directional containment check is sufficient.
fn unordered_equal(a: &[&Value], b: &[&Value]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut matched = vec![false; b.len()];
    a.iter().all(|x| {
        b.iter().enumerate().any(|(i, y)| {
            if matched[i] {
                return false;
            }
            if value_equal(x, y) {
                matched[i] = true;
                true
            } else {
                false
            }
        })
    })
}

fn unordered_map_equal(a: &[(&Value, &Value)], b: &[(&Value, &Value)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut matched = vec![false; b.len()];
    a.iter().all(|(ak, av)| {
        b.iter().enumerate().any(|(i, (bk, bv))| {
            if matched[i] {
                return false;
            }
            if value_equal(ak, bk) && value_equal(av, bv) {
                matched[i] = true;
                true
            } else {
                false
            }
        })
    })
}
