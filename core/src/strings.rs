//! Escape-sequence validation and expansion for the `String` value kind.
//!
//! Split deliberately into two passes: [`validate_escapes`] walks the raw
//! span once during scanning and rejects malformed escapes immediately (so a
//! bad string aborts the parse like every other error, per this workspace's
//! all-or-nothing error model), while [`expand_escapes`] is the actual byte
//! expansion, called lazily the first time a string's content is read. Once
//! `validate_escapes` has accepted a span, `expand_escapes` cannot fail.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeError {
    /// Byte offset of the bad escape, relative to the start of the raw span.
    pub offset: usize,
    pub reason: &'static str,
}

impl fmt::Display for EscapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.reason, self.offset)
    }
}

fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

/// Validate every escape sequence in `raw` (the bytes between the quotes,
/// unescaped quote already located by the scanner). Does not allocate.
pub fn validate_escapes(raw: &str) -> Result<(), EscapeError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            i += 1;
            continue;
        }
        let esc_start = i;
        i += 1;
        let Some(&marker) = bytes.get(i) else {
            return Err(EscapeError {
                offset: esc_start,
                reason: "dangling escape at end of string",
            });
        };
        match marker {
            b'"' | b'\\' | b'/' | b'n' | b'r' | b't' | b'b' | b'f' => {
                i += 1;
            }
            b'u' => {
                let code = parse_u_escape(bytes, i, esc_start)?;
                i += 5;
                if (0xD800..=0xDBFF).contains(&code) {
                    // High surrogate: must be immediately followed by a
                    // matching low surrogate, or the pair cannot encode a
                    // scalar value at all.
                    if bytes.get(i) != Some(&b'\\') || bytes.get(i + 1) != Some(&b'u') {
                        return Err(EscapeError {
                            offset: esc_start,
                            reason: "unpaired \\u high surrogate",
                        });
                    }
                    let low = parse_u_escape(bytes, i + 1, esc_start)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(EscapeError {
                            offset: esc_start,
                            reason: "\\u high surrogate not followed by a low surrogate",
                        });
                    }
                    i += 6;
                } else if (0xDC00..=0xDFFF).contains(&code) {
                    return Err(EscapeError {
                        offset: esc_start,
                        reason: "unpaired \\u low surrogate",
                    });
                }
            }
            other => {
                return Err(EscapeError {
                    offset: esc_start,
                    reason: escape_reason(other),
                });
            }
        }
    }
    Ok(())
}

/// Parse the four hex digits starting at `bytes[at]` (just past the `u`
/// marker of a `\uXXXX` escape beginning at `esc_start`).
fn parse_u_escape(bytes: &[u8], at: usize, esc_start: usize) -> Result<u32, EscapeError> {
    let digits = bytes.get(at + 1..at + 5).ok_or(EscapeError {
        offset: esc_start,
        reason: "\\u escape needs four hex digits",
    })?;
    if digits.len() != 4 || !digits.iter().all(|&d| is_hex_digit(d)) {
        return Err(EscapeError {
            offset: esc_start,
            reason: "\\u escape needs four hex digits",
        });
    }
    let hex = std::str::from_utf8(digits).expect("ascii hex digits are valid utf-8");
    Ok(u32::from_str_radix(hex, 16).expect("validated hex digits"))
}

fn escape_reason(_marker: u8) -> &'static str {
    "unknown escape sequence"
}

/// Expand every escape sequence in `raw` into its literal bytes.
///
/// # Panics
/// Panics if `raw` contains an escape sequence `validate_escapes` would
/// reject. Callers must validate before constructing the `LazyString` this
/// feeds; by the time this runs, validity is an established invariant, not
/// something to recheck.
pub fn expand_escapes(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'\\' {
                i += 1;
            }
            out.push_str(&raw[start..i]);
            continue;
        }
        let marker = bytes[i + 1];
        match marker {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000C}'),
            b'u' => {
                let hex = &raw[i + 2..i + 6];
                let code = u32::from_str_radix(hex, 16).expect("validated hex digits");
                if (0xD800..=0xDBFF).contains(&code) {
                    // `validate_escapes` already confirmed a paired low
                    // surrogate follows immediately.
                    let low_hex = &raw[i + 8..i + 12];
                    let low = u32::from_str_radix(low_hex, 16).expect("validated hex digits");
                    let combined = 0x10000 + (code - 0xD800) * 0x400 + (low - 0xDC00);
                    out.push(char::from_u32(combined).expect("surrogate pair decodes to a valid scalar value"));
                    i += 12;
                    continue;
                }
                out.push(char::from_u32(code).expect("validate_escapes rejects lone surrogates"));
                i += 6;
                continue;
            }
            _ => unreachable!("validate_escapes should have rejected this sequence"),
        }
        i += 2;
    }
    out
}

/// Strip the common leading indentation from a text block's lines and
/// collapse its own restricted escape set (`\"""` only). Feature-gated,
/// grouped here with the other pure string transforms that back the `String`
/// value kind.
///
/// `lines` is the block's interior split on `\n`, so its last element is
/// always whatever sits on the closing `"""`'s own line — typically just
/// that delimiter's leading whitespace. That line's column must count
/// toward the common indent even though it is blank; only interior blank
/// lines (which carry no indentation signal of their own) are skipped.
pub fn dedent_text_block(lines: &[&str]) -> String {
    let last = lines.len().saturating_sub(1);
    let common_indent = lines
        .iter()
        .enumerate()
        .filter(|&(idx, l)| idx == last || !l.trim().is_empty())
        .map(|(_, l)| l.len() - l.trim_start_matches(' ').len())
        .min()
        .unwrap_or(0);

    let mut out = String::new();
    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        let trimmed = if line.len() >= common_indent {
            &line[common_indent..]
        } else {
            line.trim_start_matches(' ')
        };
        out.push_str(&trimmed.replace("\\\"\"\"", "\"\"\""));
    }
    out
}
