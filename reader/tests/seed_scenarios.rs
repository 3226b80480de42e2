//! The ten literal-input seed scenarios: parse one fixed input, check one
//! fixed outcome. Each test name matches the scenario it pins.

use edn_core::{Ident, ValueKind};
use edn_reader::{read, read_with_options, ErrorKind, FallbackPolicy, ReaderOptions};

#[test]
fn map_with_string_and_vector_values() {
    let doc = read(r#"{:name "Alice" :age 30 :languages [:clojure :rust]}"#).unwrap();
    let pairs = doc.root().as_map().expect("expected a map");
    assert_eq!(pairs.len(), 3);

    let name_key = edn_core::Value::new(ValueKind::Keyword(Ident {
        namespace: None,
        name: "name",
    }));
    let name_value = doc.root().map_get(&name_key).expect("missing :name");
    let (content, len) = name_value.string_get(doc.arena()).unwrap();
    assert_eq!(content, "Alice");
    assert_eq!(len, 5);
}

#[test]
fn set_with_a_repeated_element_fails() {
    // `"#{1 2 1}"` is 8 bytes; the error span covers the whole collection,
    // (open-delimiter offset, close-delimiter offset + 1) — see DESIGN.md.
    let err = read("#{1 2 1}").unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateElement);
    assert_eq!(err.span, (0, 8));
}

#[test]
fn unterminated_list_names_the_open_collection() {
    let err = read("(1 2 3").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnterminatedCollection);
    assert_eq!(err.span, (0, 6));
}

#[test]
fn mismatched_closing_delimiter() {
    let err = read("[1 2 }").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnmatchedDelimiter);
    assert_eq!(err.span, (0, 6));
}

#[test]
fn integer_literal_past_i64_range_becomes_a_bigint() {
    let doc = read("9223372036854775808").unwrap();
    let big = doc.root().as_bigint().expect("expected a BigInt");
    assert_eq!(big.digits, "9223372036854775808");
    assert!(!big.negative);
    assert_eq!(big.radix, 10);
}

#[test]
fn ratio_literal_with_feature_on_and_off() {
    let doc = read("22/7").unwrap();
    assert_eq!(doc.root().as_ratio(), Some((22, 7)));

    let options = ReaderOptions::new().with_features(edn_reader::ReaderFeatures {
        ratios: false,
        ..edn_reader::ReaderFeatures::default()
    });
    let err = read_with_options("22/7", &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidNumber);
}

#[test]
fn string_with_an_escape_decodes_to_its_expanded_content() {
    let doc = read(r#""hello\\nworld""#).unwrap();
    let (raw, has_escapes) = doc.root().as_raw_string().expect("expected a string");
    assert!(has_escapes);
    let (content, len) = doc.root().string_get(doc.arena()).unwrap();
    assert_eq!(content, "hello\\nworld");
    assert_eq!(len, 12);
    assert_eq!(raw, r"hello\\nworld");
}

#[test]
fn unregistered_tag_with_passthrough_policy_wraps_as_tagged() {
    let doc = read(r#"#inst "2024-01-01""#).unwrap();
    let (tag, inner) = doc.root().as_tagged().expect("expected a Tagged value");
    assert_eq!(tag.namespace, None);
    assert_eq!(tag.name, "inst");
    let (content, _) = inner.string_get(doc.arena()).unwrap();
    assert_eq!(content, "2024-01-01");
}

#[test]
fn metadata_prefix_attaches_to_the_following_symbol() {
    let doc = read("^:private x").unwrap();
    let root = doc.root();
    assert!(matches!(root.kind, ValueKind::Symbol(_)));
    let meta = root.meta.expect("expected metadata");
    let private_key = edn_core::Value::new(ValueKind::Keyword(Ident {
        namespace: None,
        name: "private",
    }));
    let value = meta.map_get(&private_key).expect("missing :private entry");
    assert_eq!(value.as_bool(), Some(true));
}

#[test]
fn discard_inside_a_vector_drops_only_the_discarded_form() {
    let doc = read("[1 #_2 3]").unwrap();
    let items = doc.root().as_vector().expect("expected a vector");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_int64(), Some(1));
    assert_eq!(items[1].as_int64(), Some(3));
}

#[test]
fn unregistered_tag_error_policy_reports_unknown_tag() {
    let options = ReaderOptions::new().with_fallback_policy(FallbackPolicy::Error);
    let err = read_with_options(r#"#inst "2024-01-01""#, &options).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownTag);
}
