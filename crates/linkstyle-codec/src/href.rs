//! Recognizing styled hrefs.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::StyleRecord;

static LEGACY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"//color=#([0-9a-fA-F]{6})").expect("legacy pattern compiles"));

static RECORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#([0-9a-fA-F.]+)#").expect("record pattern compiles"));

/// A foreground color from the legacy `//color=#RRGGBB` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyColor {
    hex: String,
}

impl LegacyColor {
    /// The six hex digits, without the leading `#`.
    pub fn hex(&self) -> &str {
        &self.hex
    }
}

/// The decoded form of a styled href.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedHref {
    /// Legacy single-color link.
    Legacy(LegacyColor),
    /// Positional attribute record.
    Record(StyleRecord),
}

impl ParsedHref {
    /// Returns the record, if this is not a legacy link.
    pub fn record(&self) -> Option<&StyleRecord> {
        match self {
            ParsedHref::Record(record) => Some(record),
            ParsedHref::Legacy(_) => None,
        }
    }
}

/// Parses the literal value of an anchor's `href`.
///
/// The legacy marker is tried first, so an href that matches both shapes
/// decodes as [`ParsedHref::Legacy`]. Returns `None` when neither shape is
/// present: the link is not a styled link and must be left untouched.
///
/// Record bodies are split on `.` keeping empty segments, so
/// `#0...22ffAA.#` yields `["0", "", "", "22ffAA", ""]`.
pub fn parse(href: &str) -> Option<ParsedHref> {
    if let Some(caps) = LEGACY_PATTERN.captures(href) {
        return Some(ParsedHref::Legacy(LegacyColor {
            hex: caps[1].to_string(),
        }));
    }

    let caps = RECORD_PATTERN.captures(href)?;
    let fields = caps[1].split('.').map(str::to_string).collect();
    Some(ParsedHref::Record(StyleRecord::new(fields)))
}

/// Builds the href fragment for a list of fields.
///
/// This is the inverse of [`parse`] for record links: the fields are joined
/// with `.` and wrapped in `#`.
pub fn encode<S: AsRef<str>>(fields: &[S]) -> String {
    let body: Vec<&str> = fields.iter().map(AsRef::as_ref).collect();
    format!("#{}#", body.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordKind;

    fn record_fields(href: &str) -> Vec<String> {
        match parse(href) {
            Some(ParsedHref::Record(record)) => record.fields().to_vec(),
            other => panic!("expected record for {href}, got {other:?}"),
        }
    }

    #[test]
    fn parses_record_between_hashes() {
        assert_eq!(
            record_fields("http://example.com/#0.8.aaffff#"),
            vec!["0", "8", "aaffff"]
        );
    }

    #[test]
    fn keeps_empty_segments() {
        assert_eq!(
            record_fields("#0...22ffAA.#"),
            vec!["0", "", "", "22ffAA", ""]
        );
    }

    #[test]
    fn single_field_record() {
        let parsed = parse("#3#").unwrap();
        let record = parsed.record().unwrap();
        assert_eq!(record.kind(), RecordKind::Block);
        assert_eq!(record.fields().len(), 1);
    }

    #[test]
    fn plain_anchor_is_not_styled() {
        assert_eq!(parse("https://example.com/page#section"), None);
        assert_eq!(parse("#heading"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn non_hex_body_is_rejected() {
        assert_eq!(parse("#0.zz#"), None);
    }

    #[test]
    fn legacy_color() {
        match parse("//color=#12abEF") {
            Some(ParsedHref::Legacy(color)) => assert_eq!(color.hex(), "12abEF"),
            other => panic!("expected legacy color, got {other:?}"),
        }
    }

    #[test]
    fn legacy_takes_precedence_over_record() {
        let parsed = parse("//color=#aabbcc#0.1#").unwrap();
        assert!(matches!(parsed, ParsedHref::Legacy(_)));
        assert!(parsed.record().is_none());
    }

    #[test]
    fn legacy_needs_six_digits() {
        // Falls through to the record pattern, which does not match either.
        assert_eq!(parse("//color=#abc"), None);
    }

    #[test]
    fn encode_joins_fields() {
        assert_eq!(encode(&["0", "", "ff0000"]), "#0..ff0000#");
        assert_eq!(encode::<&str>(&[]), "##");
    }

    #[test]
    fn encode_then_parse() {
        let href = encode(&["2", "8", "", "", "", "", "", "", "", "", "", "", "", "abc1"]);
        let fields = record_fields(&href);
        assert_eq!(fields.len(), 14);
        assert_eq!(fields[13], "abc1");
    }
}
