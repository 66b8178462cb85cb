//! Typed interpretation of record fields.
//!
//! Every field is decoded on its own. A present but malformed value falls back
//! to the field's default instead of failing the record; an empty or missing
//! field stays `None` so no CSS property is emitted for it.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{index, StyleRecord};

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9a-fA-F]{6,7}").expect("hex color pattern compiles"));

fn hex_number(field: &str) -> Option<u32> {
    u32::from_str_radix(field, 16).ok()
}

/// Looks up `field` (a hex index) in `table`, falling back to `default`.
fn pick<T: Copy>(table: &[T], field: &str, default: T) -> T {
    hex_number(field)
        .and_then(|i| table.get(i as usize).copied())
        .unwrap_or(default)
}

/// A color taken from a field: six hex digits, optionally a seventh for alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexColor(String);

impl HexColor {
    /// Extracts the first run of 6 or 7 hex digits from `field`.
    pub fn extract(field: &str) -> Option<Self> {
        HEX_COLOR.find(field).map(|m| HexColor(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the seventh (alpha) digit is present.
    pub fn has_alpha(&self) -> bool {
        self.0.len() == 7
    }
}

/// Index into the fixed font size table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSize(u8);

impl FontSize {
    const TABLE: [&'static str; 16] = [
        "8px", "9px", "10px", "11px", "12px", "13px", "14px", "15px", "16px", "18px", "20px",
        "24px", "28px", "32px", "40px", "48px",
    ];

    /// `16px`, used for out-of-range indices.
    pub const DEFAULT: FontSize = FontSize(8);

    fn decode(field: &str) -> Self {
        match hex_number(field) {
            Some(n) if (n as usize) < Self::TABLE.len() => FontSize(n as u8),
            _ => Self::DEFAULT,
        }
    }

    pub fn css(self) -> &'static str {
        Self::TABLE[self.0 as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    None,
    Underline,
    Overline,
    LineThrough,
    UnderlineOverline,
}

impl Decoration {
    pub fn css(self) -> &'static str {
        match self {
            Decoration::None => "none",
            Decoration::Underline => "underline",
            Decoration::Overline => "overline",
            Decoration::LineThrough => "line-through",
            Decoration::UnderlineOverline => "underline overline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    pub fn css(self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
            FontStyle::Oblique => "oblique",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
    Lighter,
    Bolder,
}

impl FontWeight {
    pub fn css(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
            FontWeight::Lighter => "lighter",
            FontWeight::Bolder => "bolder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteSpace {
    Normal,
    Nowrap,
    Pre,
}

impl WhiteSpace {
    pub fn css(self) -> &'static str {
        match self {
            WhiteSpace::Normal => "normal",
            WhiteSpace::Nowrap => "nowrap",
            WhiteSpace::Pre => "pre",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Direction {
    pub fn css(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

/// Inline vertical alignment for text records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalAlign {
    Baseline,
    Sub,
    Super,
    Middle,
    Top,
    Bottom,
}

impl VerticalAlign {
    pub fn css(self) -> &'static str {
        match self {
            VerticalAlign::Baseline => "baseline",
            VerticalAlign::Sub => "sub",
            VerticalAlign::Super => "super",
            VerticalAlign::Middle => "middle",
            VerticalAlign::Top => "top",
            VerticalAlign::Bottom => "bottom",
        }
    }
}

/// Horizontal alignment inside a styled block or table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    fn decode(field: &str) -> Self {
        pick(
            &[TextAlign::Left, TextAlign::Center, TextAlign::Right],
            field,
            TextAlign::Left,
        )
    }

    pub fn css(self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// Vertical alignment inside a styled block or table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellVerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl CellVerticalAlign {
    fn decode(field: &str) -> Self {
        pick(
            &[
                CellVerticalAlign::Top,
                CellVerticalAlign::Middle,
                CellVerticalAlign::Bottom,
            ],
            field,
            CellVerticalAlign::Top,
        )
    }

    pub fn css(self) -> &'static str {
        match self {
            CellVerticalAlign::Top => "top",
            CellVerticalAlign::Middle => "middle",
            CellVerticalAlign::Bottom => "bottom",
        }
    }
}

/// Inline styling carried by text, annotation and unknown records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextAttributes {
    pub font_size: Option<FontSize>,
    pub color: Option<HexColor>,
    pub background: Option<HexColor>,
    pub decoration: Option<Decoration>,
    pub decoration_color: Option<HexColor>,
    pub font_style: Option<FontStyle>,
    pub font_weight: Option<FontWeight>,
    /// Letter spacing in px, `n - 5`. Values past `i32::MAX` are dropped.
    pub letter_spacing: Option<i32>,
    /// Word spacing in px, `n - 5`.
    pub word_spacing: Option<i32>,
    pub white_space: Option<WhiteSpace>,
    pub direction: Option<Direction>,
    pub vertical_align: Option<VerticalAlign>,
    pub tag_id: Option<String>,
}

impl TextAttributes {
    pub(crate) fn decode(record: &StyleRecord) -> Self {
        let spacing = |idx| {
            record
                .field(idx)
                .and_then(hex_number)
                .and_then(|n| i32::try_from(n).ok())
                .map(|n| n - 5)
        };

        Self {
            font_size: record.field(index::FONT_SIZE).map(FontSize::decode),
            color: record.field(index::COLOR).and_then(HexColor::extract),
            background: record.field(index::BACKGROUND).and_then(HexColor::extract),
            decoration: record.field(index::DECORATION).map(|f| {
                pick(
                    &[
                        Decoration::None,
                        Decoration::Underline,
                        Decoration::Overline,
                        Decoration::LineThrough,
                        Decoration::UnderlineOverline,
                    ],
                    f,
                    Decoration::None,
                )
            }),
            decoration_color: record
                .field(index::DECORATION_COLOR)
                .and_then(HexColor::extract),
            font_style: record.field(index::FONT_STYLE).map(|f| {
                pick(
                    &[FontStyle::Normal, FontStyle::Italic, FontStyle::Oblique],
                    f,
                    FontStyle::Normal,
                )
            }),
            font_weight: record.field(index::FONT_WEIGHT).map(|f| {
                pick(
                    &[
                        FontWeight::Normal,
                        FontWeight::Bold,
                        FontWeight::Lighter,
                        FontWeight::Bolder,
                    ],
                    f,
                    FontWeight::Normal,
                )
            }),
            letter_spacing: spacing(index::LETTER_SPACING),
            word_spacing: spacing(index::WORD_SPACING),
            white_space: record.field(index::WHITE_SPACE).map(|f| {
                pick(
                    &[WhiteSpace::Normal, WhiteSpace::Nowrap, WhiteSpace::Pre],
                    f,
                    WhiteSpace::Normal,
                )
            }),
            direction: record.field(index::DIRECTION).map(|f| {
                if hex_number(f) == Some(1) {
                    Direction::Rtl
                } else {
                    Direction::Ltr
                }
            }),
            vertical_align: record.field(index::VERTICAL_ALIGN).map(|f| {
                pick(
                    &[
                        VerticalAlign::Baseline,
                        VerticalAlign::Sub,
                        VerticalAlign::Super,
                        VerticalAlign::Middle,
                        VerticalAlign::Top,
                        VerticalAlign::Bottom,
                    ],
                    f,
                    VerticalAlign::Baseline,
                )
            }),
            tag_id: record.tag_id().map(str::to_string),
        }
    }
}

/// Styling carried by block records.
///
/// Slot meanings depend on where the link sits: in callouts and quotes
/// `color` is the border color and `secondary_color` the background; in table
/// cells `color` is the cell background and `secondary_color` the border.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockAttributes {
    /// Corner radius step (field 1).
    pub radius: Option<u32>,
    /// Field 2.
    pub color: Option<HexColor>,
    /// Border width in px (field 3).
    pub border_width: Option<u32>,
    /// Field 4.
    pub secondary_color: Option<HexColor>,
    pub text_align: Option<TextAlign>,
    pub vertical_align: Option<CellVerticalAlign>,
    pub tag_id: Option<String>,
}

impl BlockAttributes {
    pub(crate) fn decode(record: &StyleRecord) -> Self {
        Self {
            radius: record.field(index::BLOCK_RADIUS).and_then(hex_number),
            color: record
                .field(index::BLOCK_BORDER_COLOR)
                .and_then(HexColor::extract),
            border_width: record.field(index::BLOCK_BORDER_WIDTH).and_then(hex_number),
            secondary_color: record
                .field(index::BLOCK_BACKGROUND)
                .and_then(HexColor::extract),
            text_align: record.field(index::BLOCK_TEXT_ALIGN).map(TextAlign::decode),
            vertical_align: record
                .field(index::BLOCK_VERTICAL_ALIGN)
                .map(CellVerticalAlign::decode),
            tag_id: record.tag_id().map(str::to_string),
        }
    }

    /// Whether either alignment field is present.
    pub fn has_alignment(&self) -> bool {
        self.text_align.is_some() || self.vertical_align.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(fields: &[&str]) -> TextAttributes {
        StyleRecord::from_fields(fields.iter().copied()).text_attributes()
    }

    fn block(fields: &[&str]) -> BlockAttributes {
        StyleRecord::from_fields(fields.iter().copied()).block_attributes()
    }

    #[test]
    fn decodes_full_text_record() {
        let attrs = text(&[
            "0", "8", "aaffff", "440000", "1", "ffaaff", "1", "1", "6", "9", "0", "1", "3",
        ]);
        assert_eq!(attrs.font_size.unwrap().css(), "16px");
        assert_eq!(attrs.color.as_ref().unwrap().as_str(), "aaffff");
        assert_eq!(attrs.background.as_ref().unwrap().as_str(), "440000");
        assert_eq!(attrs.decoration, Some(Decoration::Underline));
        assert_eq!(attrs.decoration_color.as_ref().unwrap().as_str(), "ffaaff");
        assert_eq!(attrs.font_style, Some(FontStyle::Italic));
        assert_eq!(attrs.font_weight, Some(FontWeight::Bold));
        assert_eq!(attrs.letter_spacing, Some(1));
        assert_eq!(attrs.word_spacing, Some(4));
        assert_eq!(attrs.white_space, Some(WhiteSpace::Normal));
        assert_eq!(attrs.direction, Some(Direction::Rtl));
        assert_eq!(attrs.vertical_align, Some(VerticalAlign::Middle));
        assert_eq!(attrs.tag_id, None);
    }

    #[test]
    fn font_size_table_bounds() {
        assert_eq!(text(&["0", "0"]).font_size.unwrap().css(), "8px");
        assert_eq!(text(&["0", "f"]).font_size.unwrap().css(), "48px");
        assert_eq!(text(&["0", "ff"]).font_size.unwrap().css(), "16px");
    }

    #[test]
    fn out_of_range_indices_fall_back() {
        let attrs = text(&["0", "", "", "", "63", "", "63", "63", "", "", "63", "2", "63"]);
        assert_eq!(attrs.decoration, Some(Decoration::None));
        assert_eq!(attrs.font_style, Some(FontStyle::Normal));
        assert_eq!(attrs.font_weight, Some(FontWeight::Normal));
        assert_eq!(attrs.white_space, Some(WhiteSpace::Normal));
        assert_eq!(attrs.direction, Some(Direction::Ltr));
        assert_eq!(attrs.vertical_align, Some(VerticalAlign::Baseline));
    }

    #[test]
    fn malformed_fields_do_not_abort_the_record() {
        let attrs = text(&["0", "zz", "red", "12", "1", "", "", "", "x", "7"]);
        assert_eq!(attrs.font_size, Some(FontSize::DEFAULT));
        assert_eq!(attrs.color, None);
        assert_eq!(attrs.background, None);
        assert_eq!(attrs.decoration, Some(Decoration::Underline));
        assert_eq!(attrs.letter_spacing, None);
        assert_eq!(attrs.word_spacing, Some(2));
    }

    #[test]
    fn spacing_past_i32_is_dropped() {
        let attrs = text(&["0", "", "", "", "", "", "", "", "80000000", "ffffffff"]);
        assert_eq!(attrs.letter_spacing, None);
        assert_eq!(attrs.word_spacing, None);

        let attrs = text(&["0", "", "", "", "", "", "", "", "7fffffff", "0"]);
        assert_eq!(attrs.letter_spacing, Some(i32::MAX - 5));
        assert_eq!(attrs.word_spacing, Some(-5));
    }

    #[test]
    fn absent_fields_stay_none() {
        assert_eq!(text(&["0"]), TextAttributes::default());
    }

    #[test]
    fn hex_color_keeps_alpha_digit() {
        let color = HexColor::extract("00FF008").unwrap();
        assert_eq!(color.as_str(), "00FF008");
        assert!(color.has_alpha());

        let color = HexColor::extract("00FF00FF").unwrap();
        assert_eq!(color.as_str(), "00FF00F");

        assert!(!HexColor::extract("abcdef").unwrap().has_alpha());
        assert_eq!(HexColor::extract("abcde"), None);
    }

    #[test]
    fn negative_spacing() {
        assert_eq!(text(&["0", "", "", "", "", "", "", "", "0"]).letter_spacing, Some(-5));
    }

    #[test]
    fn decodes_block_record() {
        let attrs = block(&["3", "a", "FF0000F", "1", "00FF00F", "1", "2"]);
        assert_eq!(attrs.radius, Some(10));
        assert_eq!(attrs.color.as_ref().unwrap().as_str(), "FF0000F");
        assert_eq!(attrs.border_width, Some(1));
        assert_eq!(attrs.secondary_color.as_ref().unwrap().as_str(), "00FF00F");
        assert_eq!(attrs.text_align, Some(TextAlign::Center));
        assert_eq!(attrs.vertical_align, Some(CellVerticalAlign::Bottom));
        assert!(attrs.has_alignment());
    }

    #[test]
    fn block_alignment_defaults() {
        let attrs = block(&["3", "", "", "", "", "9", "9"]);
        assert_eq!(attrs.text_align, Some(TextAlign::Left));
        assert_eq!(attrs.vertical_align, Some(CellVerticalAlign::Top));
        assert!(!block(&["3"]).has_alignment());
    }
}
