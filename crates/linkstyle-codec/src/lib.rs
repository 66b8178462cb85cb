//! Compact style attributes carried inside hyperlink targets.
//!
//! A styled link hides its appearance in the `href` itself. Two shapes are
//! recognized:
//!
//! - The record form: `#<field0>.<field1>....<fieldN>#`, where every field is a
//!   (possibly empty) run of hex digits. Field 0 selects the record kind, the
//!   remaining fields are positional attributes.
//! - The legacy form: `//color=#RRGGBB`, a bare foreground color.
//!
//! Parsing only checks the overall shape. Interpreting a field (and falling
//! back to its default when it is malformed) happens later, one field at a
//! time, through [`TextAttributes`] and [`BlockAttributes`].
//!
//! # Example
//!
//! ```rust
//! use linkstyle_codec::{parse, ParsedHref, RecordKind};
//!
//! let parsed = parse("https://example.com/#0.8.ff0000#").unwrap();
//! let ParsedHref::Record(record) = parsed else { panic!("expected a record") };
//!
//! assert_eq!(record.kind(), RecordKind::Text);
//! assert_eq!(record.fields(), ["0", "8", "ff0000"]);
//!
//! let text = record.text_attributes();
//! assert_eq!(text.font_size.map(|s| s.css()), Some("16px"));
//! ```
//!
//! # Field layout
//!
//! | index | text records | block records |
//! |-------|--------------|---------------|
//! | 0 | record kind | record kind |
//! | 1 | font size | corner radius step |
//! | 2 | color | border color / cell background |
//! | 3 | background | border width |
//! | 4 | decoration | background / cell border color |
//! | 5 | decoration color | text-align |
//! | 6 | font style | vertical-align |
//! | 7 | font weight | |
//! | 8 | letter spacing | |
//! | 9 | word spacing | |
//! | 10 | white-space | |
//! | 11 | direction | |
//! | 12 | vertical-align | |
//! | 13 | tag id | tag id |

mod fields;
mod href;
mod record;

pub use fields::{
    BlockAttributes, CellVerticalAlign, Decoration, Direction, FontSize, FontStyle, FontWeight,
    HexColor, TextAlign, TextAttributes, VerticalAlign, WhiteSpace,
};
pub use href::{encode, parse, LegacyColor, ParsedHref};
pub use record::{index, RecordKind, StyleRecord};
