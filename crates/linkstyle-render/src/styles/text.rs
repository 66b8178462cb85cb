//! Inline text styling of a styled link.

use linkstyle_codec::{LegacyColor, ParsedHref, RecordKind, StyleRecord, TextAttributes};
use log::debug;

use super::{StyleContext, StyledLink, ICON_ATTR, STYLED_ATTR};
use crate::color::{evaluate_background, ContrastMethod, Polarity};
use crate::dom::NodeId;
use crate::ops::StyleOperation;

/// Editor classes that give links their hover and focus behaviour.
const AFFORDANCE_CLASSES: [&str; 2] = ["notion-focusable-token", "notion-enable-hover"];

/// Styles `link` according to `parsed`.
pub fn apply(cx: &StyleContext<'_>, link: &StyledLink, parsed: &ParsedHref) -> Vec<StyleOperation> {
    let span = cx.doc.find_descendant(link.node, |e| e.is("span"));
    let mut ops = neutralize(link.node, span);

    match parsed {
        ParsedHref::Legacy(color) => legacy(cx, link, color, &mut ops),
        ParsedHref::Record(record) => styled(cx, link, record, span, &mut ops),
    }

    debug!("styled link {} ({} operations)", link.number(), ops.len());
    ops
}

/// Turns the anchor into plain-looking text.
fn neutralize(link: NodeId, span: Option<NodeId>) -> Vec<StyleOperation> {
    let mut ops = vec![
        StyleOperation::set_attribute(link, STYLED_ATTR, "true"),
        StyleOperation::set_style(link, "text-decoration", "none"),
        StyleOperation::set_style(link, "cursor", "text"),
        StyleOperation::set_style(link, "pointer-events", "none"),
        StyleOperation::remove_attribute(link, "tabindex"),
    ];
    ops.extend(
        AFFORDANCE_CLASSES
            .iter()
            .map(|class| StyleOperation::remove_class(link, class)),
    );
    ops.push(StyleOperation::set_style(link, "position", "relative"));

    if let Some(span) = span {
        ops.push(StyleOperation::set_style(span, "border-bottom", "none"));
        ops.push(StyleOperation::set_style(span, "opacity", "1"));
    }
    ops
}

fn legacy(cx: &StyleContext<'_>, link: &StyledLink, color: &LegacyColor, ops: &mut Vec<StyleOperation>) {
    ops.push(StyleOperation::set_attribute(link.node, ICON_ATTR, "true"));
    if let Some(css) = cx.engine().process(color.hex(), cx.page_polarity()) {
        ops.push(StyleOperation::set_style(link.node, "color", css));
    }
}

fn styled(
    cx: &StyleContext<'_>,
    link: &StyledLink,
    record: &StyleRecord,
    span: Option<NodeId>,
    ops: &mut Vec<StyleOperation>,
) {
    let node = link.node;

    match record.kind() {
        RecordKind::AnnotationContent => {
            ops.push(StyleOperation::set_attribute(node, ICON_ATTR, "true"));
        }
        RecordKind::Text => {
            if let Some(span) = span {
                ops.push(StyleOperation::set_style(span, "text-decoration", "none"));
            }
        }
        _ => {}
    }

    // Block records reuse these slots for block styling.
    if record.is_kind(&RecordKind::Block) {
        return;
    }

    let attrs = record.text_attributes();
    let polarity = foreground_polarity(cx, &attrs);
    let engine = cx.engine();

    if let Some(size) = attrs.font_size {
        ops.push(StyleOperation::set_style(node, "font-size", size.css()));
    }
    if let Some(css) = attrs
        .color
        .as_ref()
        .and_then(|c| engine.process(c.as_str(), polarity))
    {
        ops.push(StyleOperation::set_style(node, "color", css));
    }
    if let Some(css) = attrs
        .background
        .as_ref()
        .and_then(|c| engine.process_with(c.as_str(), cx.page_polarity(), ContrastMethod::None))
    {
        ops.push(StyleOperation::set_style(node, "background-color", css));
    }
    if let Some(decoration) = attrs.decoration {
        ops.push(StyleOperation::set_style(node, "text-decoration", decoration.css()));
    }
    if let Some(css) = attrs
        .decoration_color
        .as_ref()
        .and_then(|c| engine.process(c.as_str(), polarity))
    {
        ops.push(StyleOperation::set_style(node, "text-decoration-color", css));
    }
    if let Some(style) = attrs.font_style {
        ops.push(StyleOperation::set_style(node, "font-style", style.css()));
    }
    if let Some(weight) = attrs.font_weight {
        ops.push(StyleOperation::set_style(node, "font-weight", weight.css()));
    }
    if let Some(px) = attrs.letter_spacing {
        ops.push(StyleOperation::set_style(node, "letter-spacing", format!("{}px", px)));
    }
    if let Some(px) = attrs.word_spacing {
        ops.push(StyleOperation::set_style(node, "word-spacing", format!("{}px", px)));
    }
    if let Some(ws) = attrs.white_space {
        ops.push(StyleOperation::set_style(node, "white-space", ws.css()));
    }
    if let Some(direction) = attrs.direction {
        ops.push(StyleOperation::set_style(node, "direction", direction.css()));
    }
    if let Some(align) = attrs.vertical_align {
        ops.push(StyleOperation::set_style(node, "vertical-align", align.css()));
    }
}

/// Text sits on its own background when it has one, else on the page.
fn foreground_polarity(cx: &StyleContext<'_>, attrs: &TextAttributes) -> Polarity {
    match &attrs.background {
        Some(bg) => evaluate_background(bg.as_str(), cx.mode.is_dark()),
        None => cx.page_polarity(),
    }
}
