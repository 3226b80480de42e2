//! Character literal parsing: `\a`, named characters (`\newline`,
//! `\space`, ...), and `\uXXXX` code points. The octal/formfeed/backspace
//! names are feature-gated extensions beyond the always-on base set.

use edn_core::{Error, ErrorKind, Span};

use crate::simd::is_terminator;
use crate::ReaderFeatures;

/// `input[start]` is the character immediately after the leading `\`.
/// Returns the parsed character and the offset just past the literal.
pub fn parse_char_literal(
    input: &[u8],
    start: usize,
    features: &ReaderFeatures,
    span_start: usize,
) -> Result<(char, usize), Error> {
    if start >= input.len() {
        return Err(Error::with_static(
            ErrorKind::UnexpectedEof,
            "expected a character after '\\'",
            (span_start, span_start + 1),
        ));
    }

    if matches!(input[start], b' ' | b'\t' | b'\n' | b'\r' | 0x0C | 0x08) {
        return Err(invalid_char((span_start, start + 1)));
    }

    // A single non-alphanumeric byte, or a single letter immediately
    // followed by a terminator, is a literal character (`\(`, `\a`).
    let rest_start = start + 1;
    let is_single = !input[start].is_ascii_alphanumeric()
        || rest_start >= input.len()
        || is_terminator(input[rest_start]);

    if is_single {
        let ch = decode_one_utf8_char(input, start, span_start)?;
        return Ok((ch.0, ch.1));
    }

    let name_end = scan_char_name(input, start);
    let name = std::str::from_utf8(&input[start..name_end])
        .map_err(|_| invalid_char((span_start, name_end)))?;

    named_char(name, features)
        .map(|c| (c, name_end))
        .ok_or_else(|| invalid_char((span_start, name_end)))
}

fn scan_char_name(input: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < input.len() && !is_terminator(input[i]) {
        i += 1;
    }
    i
}

fn decode_one_utf8_char(input: &[u8], start: usize, span_start: usize) -> Result<(char, usize), Error> {
    let remaining = &input[start..];
    let s = std::str::from_utf8(remaining).unwrap_or("");
    match s.chars().next() {
        Some(c) => Ok((c, start + c.len_utf8())),
        None => Err(invalid_char((span_start, start + 1))),
    }
}

fn invalid_char(span: Span) -> Error {
    Error::with_static(ErrorKind::InvalidCharacter, "unrecognized character literal", span)
}

fn named_char(name: &str, features: &ReaderFeatures) -> Option<char> {
    match name {
        "newline" => Some('\n'),
        "space" => Some(' '),
        "tab" => Some('\t'),
        "return" => Some('\r'),
        _ => {
            if let Some(hex) = name.strip_prefix('u') {
                // Exactly 4 hex digits; `char::from_u32` already rejects
                // lone surrogates and values past 0x10FFFF.
                if hex.len() != 4 {
                    return None;
                }
                let code = u32::from_str_radix(hex, 16).ok()?;
                return char::from_u32(code);
            }
            if features.extended_char_names {
                match name {
                    "formfeed" => return Some('\u{000C}'),
                    "backspace" => return Some('\u{0008}'),
                    _ => {}
                }
                if features.octal_integers {
                    if let Some(octal) = name.strip_prefix('o') {
                        if octal.is_empty() || octal.len() > 3 {
                            return None;
                        }
                        let code = u32::from_str_radix(octal, 8).ok()?;
                        if code > 0o377 {
                            return None;
                        }
                        return char::from_u32(code);
                    }
                }
            }
            None
        }
    }
}
