//! Byte-level scanners shared by every tokenizer in this crate.
//!
//! Named `simd` because each function here is the scalar fallback of a
//! routine that is profitably vectorizable — contiguous whitespace runs,
//! digit runs, identifier bodies, and unescaped-quote search are all
//! branch-light byte scans over a slice with no allocation. This crate ships
//! the portable scalar version; a platform with SIMD intrinsics available
//! would specialize these same signatures, not change their contract.

/// Skip whitespace, commas (which this grammar treats as whitespace), and
/// `;`-prefixed line comments. Returns the offset of the next
/// non-whitespace, non-comment byte, or `input.len()` at end of input.
pub fn skip_whitespace_and_comments(input: &[u8], mut pos: usize) -> usize {
    loop {
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos < input.len() && input[pos] == b';' {
            while pos < input.len() && input[pos] != b'\n' {
                pos += 1;
            }
            continue;
        }
        break;
    }
    pos
}

fn is_whitespace(b: u8) -> bool {
    matches!(
        b,
        0x09 | 0x0A | 0x0B | 0x0C | 0x0D | 0x20 | 0x2C | 0x1C | 0x1D | 0x1E | 0x1F
    )
}

/// Find the offset, relative to the byte just past the opening quote, of the
/// first unescaped `"`. Also reports whether any backslash escape was seen
/// along the way, so the caller can skip decoding entirely for plain
/// strings. Returns `None` if the string is unterminated.
pub fn find_unescaped_quote(input: &[u8]) -> Option<(usize, bool)> {
    let mut i = 0;
    let mut has_escapes = false;
    while i < input.len() {
        match input[i] {
            b'"' => return Some((i, has_escapes)),
            b'\\' => {
                has_escapes = true;
                i += 2; // the escaped character is never itself a terminator
            }
            _ => i += 1,
        }
    }
    None
}

/// Scan a run of bytes that could extend a numeric literal: digits, a single
/// leading sign, `.`, `e`/`E`, `x`/`X` (hex prefix), `_` (digit grouping),
/// `/` (ratio), and the `N`/`M` suffix letters. The caller is responsible
/// for rejecting shapes that do not form a valid literal; this only finds
/// the token's extent.
pub fn scan_number_body(input: &[u8], mut pos: usize) -> usize {
    if pos < input.len() && matches!(input[pos], b'+' | b'-') {
        pos += 1;
    }
    while pos < input.len() && is_number_body_byte(input[pos]) {
        pos += 1;
    }
    pos
}

fn is_number_body_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'/' | b'+' | b'-')
}

/// Scan an identifier body (symbol or keyword name after its leading
/// character): alphanumerics plus the small set of punctuation this
/// notation allows inside names.
pub fn scan_identifier_body(input: &[u8], mut pos: usize) -> usize {
    while pos < input.len() && is_identifier_byte(input[pos]) {
        pos += 1;
    }
    pos
}

pub fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic()
        || matches!(
            b,
            b'*' | b'+' | b'!' | b'-' | b'_' | b'?' | b'$' | b'%' | b'&' | b'=' | b'<' | b'>' | b'.' | b'/'
        )
        || b >= 0x80
}

fn is_identifier_byte(b: u8) -> bool {
    is_identifier_start(b) || b.is_ascii_digit() || matches!(b, b':' | b'#' | b'/' | b'\'')
}

/// True for bytes that terminate a token without being part of it:
/// whitespace, commas, comment starts, and every structural delimiter.
pub fn is_terminator(b: u8) -> bool {
    is_whitespace(b) || matches!(b, b';' | b'(' | b')' | b'[' | b']' | b'{' | b'}' | b'"')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_spaces_tabs_newlines_and_commas() {
        let input = b" \t\n,,x";
        assert_eq!(skip_whitespace_and_comments(input, 0), 5);
    }

    #[test]
    fn skips_line_comment_up_to_newline() {
        let input = b"; comment\nrest";
        assert_eq!(skip_whitespace_and_comments(input, 0), 10);
    }

    #[test]
    fn skips_interleaved_whitespace_and_comments() {
        let input = b"  ; a\n  ; b\nx";
        assert_eq!(skip_whitespace_and_comments(input, 0), 12);
    }

    #[test]
    fn skips_vertical_tab_form_feed_and_ascii_separators() {
        let input = [0x0B, 0x0C, 0x1C, 0x1D, 0x1E, 0x1F, b'x'];
        assert_eq!(skip_whitespace_and_comments(&input, 0), 6);
    }

    #[test]
    fn find_unescaped_quote_stops_at_first_plain_quote() {
        let input = b"abc\"rest";
        assert_eq!(find_unescaped_quote(input), Some((3, false)));
    }

    #[test]
    fn find_unescaped_quote_skips_escaped_quote() {
        let input = br#"a\"b"rest"#;
        let (end, has_escapes) = find_unescaped_quote(input).unwrap();
        assert_eq!(&input[..end], br#"a\"b"#);
        assert!(has_escapes);
    }

    #[test]
    fn find_unescaped_quote_reports_none_when_unterminated() {
        let input = b"no closing quote";
        assert_eq!(find_unescaped_quote(input), None);
    }

    #[test]
    fn scan_number_body_covers_float_shape() {
        let input = b"-3.14e10 rest";
        let end = scan_number_body(input, 0);
        assert_eq!(&input[..end], b"-3.14e10");
    }

    #[test]
    fn scan_identifier_body_stops_at_terminator() {
        let input = b"foo-bar? (rest)";
        let end = scan_identifier_body(input, 0);
        assert_eq!(&input[..end], b"foo-bar?");
    }

    #[test]
    fn scan_identifier_body_allows_an_embedded_apostrophe() {
        let input = b"person's-age rest";
        let end = scan_identifier_body(input, 0);
        assert_eq!(&input[..end], b"person's-age");
    }
}
