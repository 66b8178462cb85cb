//! Property-based tests for the href codec.

use linkstyle_codec::{encode, parse, ParsedHref, StyleRecord};
use proptest::prelude::*;

fn record_of(href: &str) -> Option<StyleRecord> {
    match parse(href)? {
        ParsedHref::Record(record) => Some(record),
        ParsedHref::Legacy(_) => None,
    }
}

// ============================================================================
// Strategies
// ============================================================================

/// Field lists whose joined body is non-empty, so the bracket pattern matches.
fn field_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[0-9a-fA-F]{0,8}", 1..16)
        .prop_filter("body must not be empty", |fields| {
            fields.len() > 1 || !fields[0].is_empty()
        })
}

/// Hex fields clustered around the `i32` and `u32` limits.
fn boundary_hex() -> impl Strategy<Value = String> {
    prop_oneof![
        (0x7fff_fff0u32..=0x8000_0010).prop_map(|n| format!("{:x}", n)),
        (0xffff_fff0u32..=u32::MAX).prop_map(|n| format!("{:x}", n)),
        Just("ffffffff".to_string()),
        "[0-9a-zA-Z]{0,9}",
    ]
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Joining fields and wrapping them in `#` decodes back to the same fields.
    #[test]
    fn fields_survive_encoding(fields in field_list()) {
        let href = encode(&fields);
        let record = record_of(&href).expect("encoded href parses");
        prop_assert_eq!(record.fields(), fields.as_slice());
    }

    /// Surrounding URL text does not change the decoded fields.
    #[test]
    fn prefix_is_ignored(fields in field_list(), prefix in "https://[a-z]{1,10}\\.com/[a-z]{0,6}") {
        let href = format!("{}{}", prefix, encode(&fields));
        let record = record_of(&href).expect("prefixed href parses");
        prop_assert_eq!(record.fields(), fields.as_slice());
    }

    /// Parsing is deterministic.
    #[test]
    fn parse_is_deterministic(href in ".{0,40}") {
        prop_assert_eq!(parse(&href), parse(&href));
    }

    /// The legacy marker wins whenever it is present.
    #[test]
    fn legacy_marker_takes_precedence(color in "[0-9a-fA-F]{6}", fields in field_list()) {
        let href = format!("//color=#{}{}", color, encode(&fields));
        match parse(&href) {
            Some(ParsedHref::Legacy(legacy)) => prop_assert_eq!(legacy.hex(), color.as_str()),
            other => prop_assert!(false, "expected legacy, got {:?}", other),
        }
    }

    /// Decoding typed attributes never panics, whatever the field contents.
    #[test]
    fn typed_decoding_is_total(fields in prop::collection::vec(boundary_hex(), 0..20)) {
        let record = StyleRecord::from_fields(fields);
        let _ = record.text_attributes();
        let _ = record.block_attributes();
    }

    /// Spacing is either absent or exactly `n - 5`.
    #[test]
    fn spacing_is_n_minus_five(value in boundary_hex()) {
        let record = StyleRecord::from_fields(["0", "", "", "", "", "", "", "", value.as_str()]);
        let expected = u32::from_str_radix(&value, 16)
            .ok()
            .and_then(|n| i32::try_from(n).ok())
            .map(|n| n - 5);
        prop_assert_eq!(record.text_attributes().letter_spacing, expected);
    }
}
