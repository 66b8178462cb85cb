//! Divider styling.
//!
//! A block record placed alone in a text block directly above a divider
//! restyles that divider: the text block is hidden and the separator line
//! takes the record's width (field 1) and color (field 2).

use linkstyle_codec::BlockAttributes;
use log::{debug, warn};

use super::{StyleContext, StyledLink};
use crate::color::ContrastMethod;
use crate::dom::{Document, NodeId};
use crate::ops::StyleOperation;

pub const TEXT_BLOCK_CLASS: &str = "notion-text-block";
pub const DIVIDER_BLOCK_CLASS: &str = "notion-divider-block";
/// Attribute tying a restyled separator to its link.
pub const DIVIDER_ID_ATTR: &str = "data-divider-id";

const FALLBACK_COLOR: &str = "currentcolor";

/// The elements a divider link touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DividerTarget {
    pub text_block: NodeId,
    pub separator: NodeId,
}

/// Resolves the text block holding `link` and the separator of the divider
/// right after it.
pub fn find_target(doc: &Document, link: NodeId) -> Option<DividerTarget> {
    let text_block = doc.closest(link, |e| e.has_class(TEXT_BLOCK_CLASS))?;
    let next = doc.next_element_sibling(text_block)?;
    if !doc.has_class(next, DIVIDER_BLOCK_CLASS) {
        return None;
    }
    let separator = doc.find_descendant(next, |e| {
        e.is("div") && e.attr("role") == Some("separator")
    })?;
    Some(DividerTarget {
        text_block,
        separator,
    })
}

/// Hides the link's text block and restyles the following separator.
pub fn apply(cx: &StyleContext<'_>, link: &StyledLink, attrs: &BlockAttributes) -> Vec<StyleOperation> {
    let Some(target) = find_target(cx.doc, link.node) else {
        warn!("link {}: no divider follows its text block", link.number());
        return Vec::new();
    };

    let width = attrs.radius.map(|w| w.max(1)).unwrap_or(1);
    let color = attrs
        .color
        .as_ref()
        .and_then(|c| {
            cx.engine()
                .process_with(c.as_str(), cx.page_polarity(), ContrastMethod::Full)
        })
        .or_else(|| {
            cx.doc
                .style(target.separator)
                .and_then(|s| s.get("border-bottom-color"))
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_COLOR.to_string());

    debug!(
        "link {}: divider {}px solid {}",
        link.number(),
        width,
        color
    );

    vec![
        StyleOperation::set_style(target.text_block, "display", "none"),
        link.tag_op(),
        StyleOperation::set_attribute(target.separator, DIVIDER_ID_ATTR, link.id.clone()),
        StyleOperation::remove_style(target.separator, "border-bottom"),
        StyleOperation::set_important(
            target.separator,
            "border-bottom",
            format!("{}px solid {}", width, color),
        ),
    ]
}
