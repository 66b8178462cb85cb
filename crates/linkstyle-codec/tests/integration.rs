use linkstyle_codec::{
    index, parse, BlockAttributes, Decoration, FontWeight, ParsedHref, RecordKind, TextAlign,
};

fn record(href: &str) -> linkstyle_codec::StyleRecord {
    match parse(href) {
        Some(ParsedHref::Record(record)) => record,
        other => panic!("expected a record for {href}, got {other:?}"),
    }
}

#[test]
fn notion_style_link() {
    let record = record("http://example.com/#0.0.aaffff.440000.1.ffaaff.0.1.6.9.0.0.0#");
    assert_eq!(record.kind(), RecordKind::Text);
    assert_eq!(record.fields().len(), 13);

    let text = record.text_attributes();
    assert_eq!(text.font_size.unwrap().css(), "8px");
    assert_eq!(text.decoration, Some(Decoration::Underline));
    assert_eq!(text.font_weight, Some(FontWeight::Bold));
}

#[test]
fn annotation_pair_shares_tag_id() {
    let content = record("#2.............c0ffee#");
    let reference = record("#1.............c0ffee#");
    assert_eq!(content.kind(), RecordKind::AnnotationContent);
    assert_eq!(reference.kind(), RecordKind::AnnotationReference);
    assert_eq!(content.field(index::TAG_ID), Some("c0ffee"));
    assert_eq!(content.tag_id(), reference.tag_id());
}

#[test]
fn block_link_in_table_cell() {
    let attrs: BlockAttributes = record("#3..00FF00F.3.FF0000F.2.1#").block_attributes();
    assert_eq!(attrs.radius, None);
    assert_eq!(attrs.border_width, Some(3));
    assert_eq!(attrs.text_align, Some(TextAlign::Right));
    assert_eq!(attrs.vertical_align.unwrap().css(), "middle");
}
