//! Callout, quote and table cell styling from block records.

use linkstyle_codec::BlockAttributes;
use log::{debug, warn};

use super::{alignment, StyleContext, StyledLink, LINK_ID_ATTR};
use crate::color::ContrastMethod;
use crate::dom::{Document, Element, NodeId};
use crate::ops::StyleOperation;

pub const CALLOUT_CLASS: &str = "notion-callout-block";
pub const QUOTE_CLASS: &str = "notion-quote-block";
pub const TABLE_CLASS: &str = "notion-table-block";

const FALLBACK_BORDER: &str = "#D4D4D4";

const CALLOUT_BORDER_WIDTH: u32 = 1;
const QUOTE_BORDER_WIDTH: u32 = 3;
const TABLE_BORDER_WIDTH: u32 = 1;

/// The kind of block a block record styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Callout,
    Quote,
    Table,
}

impl BlockKind {
    fn of(element: &Element) -> Option<Self> {
        if element.has_class(CALLOUT_CLASS) {
            Some(BlockKind::Callout)
        } else if element.has_class(QUOTE_CLASS) {
            Some(BlockKind::Quote)
        } else if element.has_class(TABLE_CLASS) {
            Some(BlockKind::Table)
        } else {
            None
        }
    }
}

/// Finds the innermost styleable block around `link`.
pub fn enclosing_block(doc: &Document, link: NodeId) -> Option<(BlockKind, NodeId)> {
    let block = doc.closest(link, |e| BlockKind::of(e).is_some())?;
    let kind = doc.element(block).and_then(BlockKind::of)?;
    Some((kind, block))
}

/// The element a block record on `link` restyles: the callout body, the
/// quote body or the table cell.
pub fn find_target(doc: &Document, link: NodeId) -> Option<(BlockKind, NodeId)> {
    let (kind, block) = enclosing_block(doc, link)?;
    let target = match kind {
        BlockKind::Callout => callout_body(doc, block),
        BlockKind::Quote => quote_body(doc, block),
        BlockKind::Table => doc.closest(link, |e| e.is("td")),
    }?;
    Some((kind, target))
}

/// Styles the block around `link`. Returns no operations when the link is not
/// inside a callout, quote or table, or the expected inner element is absent.
pub fn apply(cx: &StyleContext<'_>, link: &StyledLink, attrs: &BlockAttributes) -> Vec<StyleOperation> {
    let Some((kind, target)) = find_target(cx.doc, link.node) else {
        match enclosing_block(cx.doc, link.node) {
            Some((kind, _)) => warn!("link {}: no styleable element inside {:?} block", link.number(), kind),
            None => warn!("link {}: block record outside a callout, quote or table", link.number()),
        }
        return Vec::new();
    };

    debug!("link {}: styling {:?} block", link.number(), kind);
    match kind {
        BlockKind::Callout => callout(cx, link, target, attrs),
        BlockKind::Quote => quote(cx, link, target, attrs),
        BlockKind::Table => table(cx, link, target, attrs),
    }
}

/// `div[role="note"] > div`
fn callout_body(doc: &Document, block: NodeId) -> Option<NodeId> {
    let note = doc.find_descendant(block, |e| e.is("div") && e.attr("role") == Some("note"))?;
    doc.child_elements(note)
        .find(|c| doc.element(*c).is_some_and(|e| e.is("div")))
}

/// `blockquote > div`
fn quote_body(doc: &Document, block: NodeId) -> Option<NodeId> {
    let quote = doc.find_descendant(block, |e| e.is("blockquote"))?;
    doc.child_elements(quote)
        .find(|c| doc.element(*c).is_some_and(|e| e.is("div")))
}

fn callout(cx: &StyleContext<'_>, link: &StyledLink, target: NodeId, attrs: &BlockAttributes) -> Vec<StyleOperation> {
    let mut ops = Vec::new();

    if let Some(step) = attrs.radius {
        let radius = step.saturating_mul(2).saturating_add(10);
        let padding = step.saturating_add(2);
        ops.push(StyleOperation::set_style(target, "border-radius", format!("{}px", radius)));
        ops.push(StyleOperation::set_style(target, "padding-inline", "10px"));
        ops.push(StyleOperation::set_style(target, "padding-top", format!("{}px", padding)));
        ops.push(StyleOperation::set_style(target, "padding-bottom", format!("{}px", padding)));
    }

    let width = attrs.border_width.unwrap_or(CALLOUT_BORDER_WIDTH);
    let color = border_color(cx, target, attrs);
    ops.push(StyleOperation::set_style(target, "border", format!("{}px solid {}", width, color)));

    if let Some(bg) = background(cx, attrs) {
        ops.push(StyleOperation::set_style(target, "background-color", bg));
    }

    with_alignment(ops, target, link, attrs)
}

fn quote(cx: &StyleContext<'_>, link: &StyledLink, target: NodeId, attrs: &BlockAttributes) -> Vec<StyleOperation> {
    let width = attrs.border_width.unwrap_or(QUOTE_BORDER_WIDTH);
    let color = border_color(cx, target, attrs);
    let padding = width.saturating_add(1);

    let mut ops = vec![
        StyleOperation::set_style(target, "padding-top", format!("{}px", padding)),
        StyleOperation::set_style(target, "padding-bottom", format!("{}px", padding)),
        StyleOperation::set_style(target, "border-inline-start", format!("{}px solid {}", width, color)),
    ];

    if let Some(bg) = background(cx, attrs) {
        ops.push(StyleOperation::set_style(target, "background-color", bg));
    }

    with_alignment(ops, target, link, attrs)
}

/// In table cells field 2 is the cell background and field 4 the border.
fn table(cx: &StyleContext<'_>, link: &StyledLink, cell: NodeId, attrs: &BlockAttributes) -> Vec<StyleOperation> {
    let engine = cx.engine();
    let width = attrs.border_width.unwrap_or(TABLE_BORDER_WIDTH);
    let border_color = attrs
        .secondary_color
        .as_ref()
        .and_then(|c| engine.process(c.as_str(), cx.page_polarity()))
        .unwrap_or_else(|| FALLBACK_BORDER.to_string());
    let background = attrs
        .color
        .as_ref()
        .and_then(|c| engine.process_with(c.as_str(), cx.page_polarity(), ContrastMethod::None));
    let border = format!("{}px solid {}", width, border_color);

    let mut ops = vec![link.tag_op()];
    if let Some(bg) = &background {
        ops.push(StyleOperation::set_style(cell, "background-color", bg.clone()));
    }
    ops.push(StyleOperation::set_style(cell, "border", border.clone()));

    let css = format!(
        "td:has(a[{attr}=\"{id}\"]) {{\n  \
         border: {border} !important;\n  \
         background-color: {background} !important;\n  \
         text-align: {text_align} !important;\n  \
         vertical-align: {vertical_align} !important;\n}}",
        attr = LINK_ID_ATTR,
        id = link.id,
        border = border,
        background = background.as_deref().unwrap_or("transparent"),
        text_align = attrs.text_align.unwrap_or_default().css(),
        vertical_align = attrs.vertical_align.unwrap_or_default().css(),
    );
    ops.push(StyleOperation::inject_rule(css));
    ops
}

/// Field 2, corrected for the page, else the element's own inline border
/// color, else a neutral gray.
fn border_color(cx: &StyleContext<'_>, target: NodeId, attrs: &BlockAttributes) -> String {
    if let Some(css) = attrs
        .color
        .as_ref()
        .and_then(|c| cx.engine().process(c.as_str(), cx.page_polarity()))
    {
        return css;
    }
    cx.doc
        .style(target)
        .and_then(|s| s.get("border-color"))
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_BORDER.to_string())
}

/// Field 4, passed through.
fn background(cx: &StyleContext<'_>, attrs: &BlockAttributes) -> Option<String> {
    attrs.secondary_color.as_ref().and_then(|c| {
        cx.engine()
            .process_with(c.as_str(), cx.page_polarity(), ContrastMethod::None)
    })
}

fn with_alignment(
    mut ops: Vec<StyleOperation>,
    target: NodeId,
    link: &StyledLink,
    attrs: &BlockAttributes,
) -> Vec<StyleOperation> {
    if attrs.has_alignment() {
        ops.push(link.tag_op());
        ops.extend(alignment::apply(target, attrs, link));
    }
    ops
}
