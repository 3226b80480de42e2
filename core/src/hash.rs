//! Structural hashing, consistent with [`crate::equality::value_equal`]:
//! values that compare equal hash equal, which is why integer-family kinds
//! hash their canonical decimal digits rather than their own bit pattern,
//! and `NaN` hashes to a fixed sentinel rather than to `f64::to_bits`.

use crate::bigint::CanonicalInt;
use crate::strings;
use crate::value::{Ident, LazyString, Value, ValueKind};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub fn value_hash(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_kind(&value.kind, &mut hasher);
    hasher.finish()
}

// Discriminant tags. Integer-family kinds all share one tag so that
// `Int(255)` and `BigInt("FF", 16)` collide into the same bucket.
const TAG_NIL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_INT_FAMILY: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_BIGDEC: u8 = 4;
const TAG_RATIO_FAMILY: u8 = 5;
const TAG_CHAR: u8 = 6;
const TAG_STRING: u8 = 7;
const TAG_SYMBOL: u8 = 8;
const TAG_KEYWORD: u8 = 9;
const TAG_LIST: u8 = 10;
const TAG_VECTOR: u8 = 11;
const TAG_SET: u8 = 12;
const TAG_MAP: u8 = 13;
const TAG_TAGGED: u8 = 14;
const TAG_EXTERNAL: u8 = 15;

fn hash_canonical_int<H: Hasher>(value: &CanonicalInt, h: &mut H) {
    TAG_INT_FAMILY.hash(h);
    value.negative.hash(h);
    value.digits.hash(h);
}

fn hash_kind<H: Hasher>(kind: &ValueKind, h: &mut H) {
    match kind {
        ValueKind::Nil => TAG_NIL.hash(h),
        ValueKind::Bool(b) => {
            TAG_BOOL.hash(h);
            b.hash(h);
        }
        ValueKind::Int(i) => hash_canonical_int(&CanonicalInt::from_i64(*i), h),
        ValueKind::BigInt(b) => hash_canonical_int(
            &CanonicalInt::from_radix_digits(b.digits, b.radix, b.negative),
            h,
        ),
        ValueKind::Float(f) => {
            TAG_FLOAT.hash(h);
            if f.is_nan() {
                u64::MAX.hash(h);
            } else {
                f.to_bits().hash(h);
            }
        }
        ValueKind::BigDec(d) => {
            TAG_BIGDEC.hash(h);
            d.negative.hash(h);
            d.decimal.hash(h);
        }
        ValueKind::Ratio {
            numerator,
            denominator,
        } => {
            TAG_RATIO_FAMILY.hash(h);
            hash_canonical_int(&CanonicalInt::from_i64(*numerator), h);
            hash_canonical_int(&CanonicalInt::from_i64(*denominator), h);
        }
        ValueKind::BigRatio(r) => {
            TAG_RATIO_FAMILY.hash(h);
            hash_canonical_int(
                &CanonicalInt::from_radix_digits(r.numerator, 10, r.negative),
                h,
            );
            hash_canonical_int(&CanonicalInt::from_radix_digits(r.denominator, 10, false), h);
        }
        ValueKind::Character(c) => {
            TAG_CHAR.hash(h);
            c.hash(h);
        }
        ValueKind::String(s) => {
            TAG_STRING.hash(h);
            hash_lazy_string(s, h);
        }
        ValueKind::Symbol(id) => {
            TAG_SYMBOL.hash(h);
            hash_ident(id, h);
        }
        ValueKind::Keyword(id) => {
            TAG_KEYWORD.hash(h);
            hash_ident(id, h);
        }
        ValueKind::List(items) => {
            TAG_LIST.hash(h);
            items.len().hash(h);
            for item in items.iter() {
                hash_kind(&item.kind, h);
            }
        }
        ValueKind::Vector(items) => {
            TAG_VECTOR.hash(h);
            items.len().hash(h);
            for item in items.iter() {
                hash_kind(&item.kind, h);
            }
        }
        ValueKind::Set(items) => {
            // Order-independent: combine with a commutative operator
            // (wrapping sum) instead of feeding each element's hash into the
            // running hasher in sequence.
            TAG_SET.hash(h);
            items.len().hash(h);
            let combined = items
                .iter()
                .map(|item| value_hash(item))
                .fold(0u64, |acc, x| acc.wrapping_add(x));
            combined.hash(h);
        }
        ValueKind::Map(pairs) => {
            TAG_MAP.hash(h);
            pairs.len().hash(h);
            let combined = pairs
                .iter()
                .map(|(k, v)| value_hash(k).wrapping_mul(31).wrapping_add(value_hash(v)))
                .fold(0u64, |acc, x| acc.wrapping_add(x));
            combined.hash(h);
        }
        ValueKind::Tagged { tag, inner } => {
            TAG_TAGGED.hash(h);
            hash_ident(tag, h);
            hash_kind(&inner.kind, h);
        }
        ValueKind::External(ext) => {
            TAG_EXTERNAL.hash(h);
            crate::external::process_hash(*ext).hash(h);
        }
    }
}

fn hash_ident<H: Hasher>(id: &Ident, h: &mut H) {
    id.namespace.hash(h);
    id.name.hash(h);
}

fn hash_lazy_string<H: Hasher>(s: &LazyString, h: &mut H) {
    if s.has_escapes {
        strings::expand_escapes(s.raw).hash(h);
    } else {
        s.raw.hash(h);
    }
}
