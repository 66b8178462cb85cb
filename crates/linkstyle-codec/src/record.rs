//! Positional attribute records.

use crate::fields::{BlockAttributes, TextAttributes};

/// Field positions inside a record.
pub mod index {
    pub const KIND: usize = 0;
    pub const FONT_SIZE: usize = 1;
    pub const COLOR: usize = 2;
    pub const BACKGROUND: usize = 3;
    pub const DECORATION: usize = 4;
    pub const DECORATION_COLOR: usize = 5;
    pub const FONT_STYLE: usize = 6;
    pub const FONT_WEIGHT: usize = 7;
    pub const LETTER_SPACING: usize = 8;
    pub const WORD_SPACING: usize = 9;
    pub const WHITE_SPACE: usize = 10;
    pub const DIRECTION: usize = 11;
    pub const VERTICAL_ALIGN: usize = 12;
    pub const TAG_ID: usize = 13;

    // Block records reuse the same slots with other meanings.
    pub const BLOCK_RADIUS: usize = 1;
    pub const BLOCK_BORDER_COLOR: usize = 2;
    pub const BLOCK_BORDER_WIDTH: usize = 3;
    pub const BLOCK_BACKGROUND: usize = 4;
    pub const BLOCK_TEXT_ALIGN: usize = 5;
    pub const BLOCK_VERTICAL_ALIGN: usize = 6;
}

/// What a record describes, selected by field 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// `0`: inline text styling.
    Text,
    /// `1`: a link that shows an annotation tooltip.
    AnnotationReference,
    /// `2`: the block holding an annotation's content.
    AnnotationContent,
    /// `3`: styling for the surrounding block (callout, quote, table cell, divider).
    Block,
    /// Any other discriminator. Receives text styling only.
    Other(String),
}

impl RecordKind {
    fn from_field(field: &str) -> Self {
        match field {
            "0" => RecordKind::Text,
            "1" => RecordKind::AnnotationReference,
            "2" => RecordKind::AnnotationContent,
            "3" => RecordKind::Block,
            other => RecordKind::Other(other.to_string()),
        }
    }
}

/// The decoded attribute list of one styled href.
///
/// Fields are kept verbatim. The list has no required length; missing
/// trailing fields and empty fields both read as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRecord {
    kind: RecordKind,
    fields: Vec<String>,
}

impl StyleRecord {
    pub(crate) fn new(fields: Vec<String>) -> Self {
        let kind = RecordKind::from_field(fields.first().map(String::as_str).unwrap_or(""));
        Self { kind, fields }
    }

    /// Builds a record from an explicit field list.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(fields.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> RecordKind {
        self.kind.clone()
    }

    pub fn is_kind(&self, kind: &RecordKind) -> bool {
        &self.kind == kind
    }

    /// All fields in order, including the kind discriminator.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The field at `idx`, or `None` when it is missing or empty.
    pub fn field(&self, idx: usize) -> Option<&str> {
        self.fields
            .get(idx)
            .map(String::as_str)
            .filter(|f| !f.is_empty())
    }

    /// Identifier correlating annotation content with its reference link.
    pub fn tag_id(&self) -> Option<&str> {
        self.field(index::TAG_ID)
    }

    /// Interprets the fields as inline text styling.
    pub fn text_attributes(&self) -> TextAttributes {
        TextAttributes::decode(self)
    }

    /// Interprets the fields as block styling.
    pub fn block_attributes(&self) -> BlockAttributes {
        BlockAttributes::decode(self)
    }
}
