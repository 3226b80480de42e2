//! String-literal scanning: locates the closing quote, validates escapes
//! eagerly, and builds the [`edn_core::LazyString`] that defers the actual
//! byte expansion. Also hosts the optional text-block (`"""..."""`) form.

use edn_core::strings_support::validate_escapes;
use edn_core::{Arena, Error, ErrorKind, LazyString};

use crate::simd::find_unescaped_quote;

/// `input` must start just past the opening `"`. Returns the decoded
/// `LazyString` plus the offset of the byte just past the closing `"`.
pub fn scan_string<'a>(
    input: &[u8],
    start: usize,
    arena: &'a Arena,
) -> Result<(LazyString<'a>, usize), Error> {
    let body = &input[start..];
    let (rel_end, has_escapes) = find_unescaped_quote(body).ok_or_else(|| {
        Error::with_static(ErrorKind::UnexpectedEof, "unterminated string literal", (start, input.len()))
    })?;

    let raw_bytes = &body[..rel_end];
    let raw = std::str::from_utf8(raw_bytes)
        .map_err(|_| Error::with_static(ErrorKind::InvalidUtf8, "string literal is not valid UTF-8", (start, start + rel_end)))?;

    if has_escapes {
        validate_escapes(raw).map_err(|e| {
            Error::with_owned(
                ErrorKind::InvalidString,
                format!("invalid escape sequence: {e}"),
                (start + e.offset, start + e.offset + 2),
            )
        })?;
    }

    let interned = arena.alloc_str(raw);
    Ok((LazyString::new(interned, has_escapes), start + rel_end + 1))
}

/// `input` must start just past the opening `"""`. Scans to the closing
/// `"""`, splits into lines, and dedents per the text-block rules. Returns
/// the finished content already decoded (text blocks are small and rarely
/// reused verbatim, so there is no laziness win in deferring this one).
pub fn scan_text_block<'a>(
    input: &[u8],
    start: usize,
    arena: &'a Arena,
) -> Result<(&'a str, usize), Error> {
    let body = &input[start..];
    let closing = find_text_block_close(body).ok_or_else(|| {
        Error::with_static(
            ErrorKind::UnexpectedEof,
            "unterminated text block",
            (start, input.len()),
        )
    })?;

    let raw = std::str::from_utf8(&body[..closing]).map_err(|_| {
        Error::with_static(
            ErrorKind::InvalidUtf8,
            "text block is not valid UTF-8",
            (start, start + closing),
        )
    })?;

    let lines: Vec<&str> = raw.split('\n').collect();
    let dedented = edn_core::strings_support::dedent_text_block(&lines);
    Ok((arena.alloc_str(&dedented), start + closing + 3))
}

fn find_text_block_close(body: &[u8]) -> Option<usize> {
    let mut i = 0;
    while i + 2 < body.len() {
        if &body[i..i + 3] == b"\"\"\"" && (i == 0 || body[i - 1] != b'\\') {
            return Some(i);
        }
        i += 1;
    }
    if body.len() >= 3 && &body[body.len() - 3..] == b"\"\"\"" {
        return Some(body.len() - 3);
    }
    None
}
