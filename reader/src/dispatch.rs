//! Pure decision logic for `#`-prefixed reader-macro forms. The actual
//! recursive parsing each form needs (set elements, the tagged form's
//! value, metadata's following form) lives in [`crate::parser`], which is
//! the only place that can call back into the recursive-descent driver;
//! this module only classifies what comes after `#` and decodes the
//! self-contained leaf forms (`##Inf`, `##-Inf`, `##NaN`).

/// What a `#` was followed by, before any of it has been parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    /// `#{` — set literal.
    Set,
    /// `#_` — discard the next form.
    Discard,
    /// `##` — symbolic value (`Inf`, `-Inf`, `NaN`).
    Symbolic,
    /// `#:` or `#::` — namespaced-map sugar.
    NamespacedMap,
    /// `#tag` — a tagged literal; the tag identifier follows immediately.
    Tag,
}

pub fn classify(input: &[u8], pos: usize) -> Option<DispatchKind> {
    match input.get(pos) {
        Some(b'{') => Some(DispatchKind::Set),
        Some(b'_') => Some(DispatchKind::Discard),
        Some(b'#') => Some(DispatchKind::Symbolic),
        Some(b':') => Some(DispatchKind::NamespacedMap),
        Some(b) if crate::simd::is_identifier_start(*b) => Some(DispatchKind::Tag),
        _ => None,
    }
}

/// Decode a `##name` symbolic float. `name` is the text after the second
/// `#`.
pub fn symbolic_float(name: &str) -> Option<f64> {
    match name {
        "Inf" => Some(f64::INFINITY),
        "-Inf" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_set_open_brace() {
        assert_eq!(classify(b"{1 2}", 0), Some(DispatchKind::Set));
    }

    #[test]
    fn classifies_discard() {
        assert_eq!(classify(b"_ignored", 0), Some(DispatchKind::Discard));
    }

    #[test]
    fn classifies_symbolic() {
        assert_eq!(classify(b"#Inf", 0), Some(DispatchKind::Symbolic));
    }

    #[test]
    fn classifies_namespaced_map_sugar() {
        assert_eq!(classify(b":ns{:a 1}", 0), Some(DispatchKind::NamespacedMap));
    }

    #[test]
    fn classifies_tag() {
        assert_eq!(classify(b"my/tag value", 0), Some(DispatchKind::Tag));
    }

    #[test]
    fn symbolic_float_decodes_known_names() {
        assert_eq!(symbolic_float("Inf"), Some(f64::INFINITY));
        assert_eq!(symbolic_float("-Inf"), Some(f64::NEG_INFINITY));
        assert!(symbolic_float("NaN").unwrap().is_nan());
        assert_eq!(symbolic_float("Bogus"), None);
    }
}
