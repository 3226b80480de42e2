//! Number classification and parsing: the INT64 / BIGINT / DOUBLE / BIGDEC /
//! RATIO ladder.
//!
//! The scanner (see [`crate::simd`]) has already isolated a candidate
//! numeric token as a contiguous byte span with no whitespace or delimiters
//! inside it; everything here operates on that already-isolated `&str`.
//! Integers take the fast path through `i64::from_str_radix` and only fall
//! back to a zero-copy `BigInt` digit span on overflow. Floats always go
//! through the standard library's correctly-rounded `f64` parser. Ratios
//! reduce to lowest terms with the binary GCD algorithm when both sides fit
//! `i64`; wider ratios are stored unreduced (see DESIGN.md).

use edn_core::{Arena, BigDecSpan, BigIntSpan, BigRatioSpan, Error, ErrorKind, Span, ValueKind};

use crate::ReaderFeatures;

pub fn parse_number<'a>(
    token: &str,
    arena: &'a Arena,
    features: &ReaderFeatures,
    span: Span,
) -> Result<ValueKind<'a>, Error> {
    let (negative, unsigned) = split_sign(token);

    if features.ratios {
        if let Some(slash) = find_ratio_slash(unsigned) {
            return parse_ratio(unsigned, slash, negative, arena, span);
        }
    }

    if let Some(marker) = find_radix_marker(unsigned) {
        return parse_radix_integer(unsigned, marker, negative, arena, span);
    }

    if let Some(digits) = unsigned.strip_suffix('N').or_else(|| unsigned.strip_suffix('n')) {
        return parse_forced_bigint(digits, negative, arena, features, span);
    }

    if let Some(digits) = unsigned.strip_suffix('M').or_else(|| unsigned.strip_suffix('m')) {
        let decimal = strip_underscores(digits, features, span)?;
        validate_decimal_shape(&decimal, span)?;
        return Ok(ValueKind::BigDec(BigDecSpan {
            decimal: arena.alloc_str(&decimal),
            negative,
        }));
    }

    if is_float_shape(unsigned) {
        let cleaned = strip_underscores(unsigned, features, span)?;
        let text = if negative {
            format!("-{cleaned}")
        } else {
            cleaned
        };
        let value: f64 = text
            .parse()
            .map_err(|_| invalid_number(span, "malformed floating-point literal"))?;
        return Ok(ValueKind::Float(value));
    }

    parse_integer(unsigned, negative, arena, features, span)
}

fn split_sign(token: &str) -> (bool, &str) {
    match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    }
}

fn find_ratio_slash(s: &str) -> Option<usize> {
    s.as_bytes().iter().position(|&b| b == b'/')
}

/// The index of an explicit-radix marker (`r`/`R`) in `NrDIGITS` (e.g.
/// `2r1010`, `36rZ`), or `None` if `s` has no digit-prefix-then-`r` shape.
/// Checked ahead of the `N`/`M` suffix and float-shape tests since a radix
/// digit can itself be `n`, `e`, or any other letter valid in that base.
fn find_radix_marker(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i > 0 && i < bytes.len() && matches!(bytes[i], b'r' | b'R') {
        Some(i)
    } else {
        None
    }
}

/// `-?[0-9]+r[0-9a-zA-Z]+`: an integer spelled in an explicit radix 2-36.
fn parse_radix_integer<'a>(
    unsigned: &str,
    marker: usize,
    negative: bool,
    arena: &'a Arena,
    span: Span,
) -> Result<ValueKind<'a>, Error> {
    let radix: u32 = unsigned[..marker]
        .parse()
        .map_err(|_| invalid_number(span, "malformed radix prefix"))?;
    if !(2..=36).contains(&radix) {
        return Err(invalid_number(span, "radix must be between 2 and 36"));
    }
    let digits = &unsigned[marker + 1..];
    if digits.is_empty() || !digits.chars().all(|c| c.to_digit(radix).is_some()) {
        return Err(invalid_number(span, "digit out of range for the literal's radix"));
    }
    match i64::from_str_radix(digits, radix) {
        Ok(magnitude) => {
            let value = if negative { magnitude.checked_neg() } else { Some(magnitude) };
            match value {
                Some(v) => Ok(ValueKind::Int(v)),
                None => Ok(ValueKind::BigInt(BigIntSpan {
                    digits: arena.alloc_str(digits),
                    radix: radix as u8,
                    negative,
                })),
            }
        }
        Err(_) => Ok(ValueKind::BigInt(BigIntSpan {
            digits: arena.alloc_str(digits),
            radix: radix as u8,
            negative,
        })),
    }
}

fn is_float_shape(s: &str) -> bool {
    s.contains('.') || s.contains('e') || s.contains('E')
}

fn strip_underscores(s: &str, features: &ReaderFeatures, span: Span) -> Result<String, Error> {
    if features.underscore_digit_grouping && s.contains('_') {
        validate_underscore_placement(s, span)?;
        Ok(s.chars().filter(|&c| c != '_').collect())
    } else {
        Ok(s.to_string())
    }
}

/// Every underscore (or run of underscores — `1__000` is fine) must sit
/// between two digits. This rejects placement next to `.`, an exponent
/// marker, a sign, a radix marker, or a suffix letter, and at the start or
/// end of the token, since all of those are non-digit neighbours.
fn validate_underscore_placement(s: &str, span: Span) -> Result<(), Error> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'_' {
            let run_start = i;
            while i < bytes.len() && bytes[i] == b'_' {
                i += 1;
            }
            let before_ok = run_start > 0 && bytes[run_start - 1].is_ascii_digit();
            let after_ok = i < bytes.len() && bytes[i].is_ascii_digit();
            if !before_ok || !after_ok {
                return Err(invalid_number(
                    span,
                    "underscore must sit between two digits of the same run",
                ));
            }
        } else {
            i += 1;
        }
    }
    Ok(())
}

fn validate_decimal_shape(s: &str, span: Span) -> Result<(), Error> {
    let body = s.trim_start_matches(['+']);
    let ok = !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '+' || c == '-');
    if ok {
        Ok(())
    } else {
        Err(invalid_number(span, "malformed arbitrary-precision decimal"))
    }
}

fn invalid_number(span: Span, message: &'static str) -> Error {
    Error::with_static(ErrorKind::InvalidNumber, message, span)
}

/// Integer path: decimal, or hex/octal when the matching feature is on.
/// Tries `i64` first and only falls back to a zero-copy `BigInt` digit span
/// on overflow.
fn parse_integer<'a>(
    unsigned: &str,
    negative: bool,
    arena: &'a Arena,
    features: &ReaderFeatures,
    span: Span,
) -> Result<ValueKind<'a>, Error> {
    let (radix, digits) = classify_radix(unsigned, features, span)?;
    let cleaned = strip_underscores(digits, features, span)?;

    if cleaned.is_empty() {
        return Err(invalid_number(span, "integer literal has no digits"));
    }
    if !cleaned.chars().all(|c| c.to_digit(radix as u32).is_some()) {
        return Err(invalid_number(span, "digit out of range for the literal's radix"));
    }

    match i64::from_str_radix(&cleaned, radix as u32) {
        Ok(magnitude) => {
            let value = if negative { magnitude.checked_neg() } else { Some(magnitude) };
            match value {
                Some(v) => Ok(ValueKind::Int(v)),
                None => Ok(ValueKind::BigInt(BigIntSpan {
                    digits: arena.alloc_str(&cleaned),
                    radix,
                    negative,
                })),
            }
        }
        Err(_) => Ok(ValueKind::BigInt(BigIntSpan {
            digits: arena.alloc_str(&cleaned),
            radix,
            negative,
        })),
    }
}

/// Returns the literal's radix and the digit body with any base prefix
/// removed. `0x`/`0X` needs [`ReaderFeatures::hex_integers`]; a leading `0`
/// followed by more digits needs [`ReaderFeatures::octal_integers`] — both
/// off by default, so by default every integer is decimal.
fn classify_radix<'a>(
    unsigned: &'a str,
    features: &ReaderFeatures,
    span: Span,
) -> Result<(u8, &'a str), Error> {
    if features.hex_integers && (unsigned.starts_with("0x") || unsigned.starts_with("0X")) {
        return Ok((16, &unsigned[2..]));
    }
    if features.octal_integers
        && unsigned.len() > 1
        && unsigned.as_bytes()[0] == b'0'
        && unsigned.as_bytes()[1].is_ascii_digit()
    {
        return Ok((8, &unsigned[1..]));
    }
    if !unsigned.bytes().all(|b| b.is_ascii_digit() || b == b'_') {
        return Err(invalid_number(span, "not a recognized integer literal"));
    }
    if !features.octal_integers && unsigned.len() > 1 && unsigned.as_bytes()[0] == b'0' {
        return Err(invalid_number(
            span,
            "leading zero on a multi-digit decimal integer requires the octal feature or an explicit radix",
        ));
    }
    Ok((10, unsigned))
}

fn parse_forced_bigint<'a>(
    digits: &str,
    negative: bool,
    arena: &'a Arena,
    features: &ReaderFeatures,
    span: Span,
) -> Result<ValueKind<'a>, Error> {
    let (radix, body) = classify_radix(digits, features, span)?;
    let cleaned = strip_underscores(body, features, span)?;
    if cleaned.is_empty() || !cleaned.chars().all(|c| c.to_digit(radix as u32).is_some()) {
        return Err(invalid_number(span, "malformed bigint literal"));
    }
    Ok(ValueKind::BigInt(BigIntSpan {
        digits: arena.alloc_str(&cleaned),
        radix,
        negative,
    }))
}

fn parse_ratio<'a>(
    unsigned: &str,
    slash: usize,
    negative: bool,
    arena: &'a Arena,
    span: Span,
) -> Result<ValueKind<'a>, Error> {
    let numerator_digits = &unsigned[..slash];
    let denominator_digits = &unsigned[slash + 1..];
    if numerator_digits.is_empty()
        || denominator_digits.is_empty()
        || !numerator_digits.bytes().all(|b| b.is_ascii_digit())
        || !denominator_digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid_number(span, "malformed ratio literal"));
    }

    match (numerator_digits.parse::<i64>(), denominator_digits.parse::<i64>()) {
        (Ok(n), Ok(d)) => {
            if d == 0 {
                return Err(invalid_number(span, "ratio denominator is zero"));
            }
            let (mut n, mut d) = (n, d);
            if negative {
                n = -n;
            }
            if d < 0 {
                n = -n;
                d = -d;
            }
            let g = binary_gcd(n.unsigned_abs(), d.unsigned_abs()).max(1);
            let n = n / g as i64;
            let d = d / g as i64;
            if d == 1 {
                Ok(ValueKind::Int(n))
            } else {
                Ok(ValueKind::Ratio {
                    numerator: n,
                    denominator: d,
                })
            }
        }
        _ => Ok(ValueKind::BigRatio(BigRatioSpan {
            numerator: arena.alloc_str(numerator_digits),
            denominator: arena.alloc_str(denominator_digits),
            negative,
        })),
    }
}

/// Stein's binary GCD algorithm: no division, only shifts and subtraction.
fn binary_gcd(mut a: u64, mut b: u64) -> u64 {
    if a == 0 {
        return b;
    }
    if b == 0 {
        return a;
    }
    let shift = (a | b).trailing_zeros();
    a >>= a.trailing_zeros();
    loop {
        b >>= b.trailing_zeros();
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        b -= a;
        if b == 0 {
            break;
        }
    }
    a << shift
}
