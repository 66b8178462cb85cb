//! Annotations: hidden content blocks and the tooltips that show them.
//!
//! A content record (`2`) hides the block it sits in and files the block's
//! markup under its tag id. A reference record (`1`) with the same tag id gets
//! a tooltip carrying that markup. The scanner handles content records in its
//! first pass and references in its second, so a reference always sees every
//! content block of the same batch.

use std::collections::HashMap;

use linkstyle_codec::StyleRecord;
use log::{debug, warn};

use super::tooltip::Tooltip;
use super::{StyleContext, StyledLink};
use crate::ops::StyleOperation;
use crate::theme::ColorMode;

/// Tag id to stored block markup.
pub type HiddenBlocks = HashMap<String, String>;

pub const BLOCK_ID_ATTR: &str = "data-block-id";
const TEXT_BLOCK_CLASS: &str = "notion-text-block";

const MOBILE_MAX_WIDTH: f64 = 400.0;
const DESKTOP_MAX_WIDTH: f64 = 1920.0;

/// Hides the block holding a content link and stores its markup.
///
/// The first content link for a tag id wins; later ones are left alone.
pub fn hide(
    cx: &StyleContext<'_>,
    link: &StyledLink,
    record: &StyleRecord,
    hidden: &mut HiddenBlocks,
) -> Vec<StyleOperation> {
    let Some(tag_id) = record.tag_id() else {
        warn!("link {}: annotation content without a tag id", link.number());
        return Vec::new();
    };

    if hidden.contains_key(tag_id) {
        debug!(
            "link {}: block for tag {} is already hidden",
            link.number(),
            tag_id
        );
        return Vec::new();
    }

    let Some(block) = cx
        .doc
        .closest(link.node, |e| e.attr(BLOCK_ID_ATTR).is_some())
    else {
        warn!("link {}: no block with {} found", link.number(), BLOCK_ID_ATTR);
        return Vec::new();
    };

    hidden.insert(tag_id.to_string(), cx.doc.outer_html(block));
    debug!(
        "link {}: hid block {} under tag {}",
        link.number(),
        cx.doc.attr(block, BLOCK_ID_ATTR).unwrap_or_default(),
        tag_id
    );
    vec![StyleOperation::set_style(block, "display", "none")]
}

/// Creates the tooltip for a reference link.
pub fn reference(
    cx: &StyleContext<'_>,
    link: &StyledLink,
    record: &StyleRecord,
    hidden: &HiddenBlocks,
) -> Vec<StyleOperation> {
    let content = record
        .tag_id()
        .and_then(|tag_id| hidden.get(tag_id).map(|markup| (tag_id, markup)));
    let Some((tag_id, content)) = content else {
        warn!(
            "link {}: no hidden block for tag {}",
            link.number(),
            record.tag_id().unwrap_or("<none>")
        );
        return Vec::new();
    };

    let parent_width = cx
        .doc
        .closest(link.node, |e| e.has_class(TEXT_BLOCK_CLASS))
        .and_then(|block| cx.doc.rect(block))
        .map(|rect| rect.width);
    let (style, close_style) = tooltip_styles(cx, parent_width);

    debug!("link {}: tooltip for tag {}", link.number(), tag_id);
    vec![
        link.tag_op(),
        StyleOperation::CreateTooltip {
            anchor: link.node,
            tooltip: Tooltip {
                link_id: link.id.clone(),
                content: content.clone(),
                style,
                close_style,
            },
        },
        StyleOperation::set_style(link.node, "pointer-events", "auto"),
    ]
}

type Declarations = Vec<(String, String)>;

/// Tooltip and close button declarations for the page's mode and the
/// viewport's device class.
pub fn tooltip_styles(cx: &StyleContext<'_>, parent_width: Option<f64>) -> (Declarations, Declarations) {
    let mobile = cx.doc.viewport().width < cx.config.mobile_breakpoint;
    let dark = cx.mode == ColorMode::Dark;

    let block_width = parent_width.unwrap_or(cx.config.default_block_width);
    let cap = if mobile { MOBILE_MAX_WIDTH } else { DESKTOP_MAX_WIDTH };
    let max_width = block_width.min(cap);

    debug!("tooltip device type: {}", if mobile { "mobile" } else { "desktop" });

    let pick = |when_dark: &str, when_light: &str| (if dark { when_dark } else { when_light }).to_string();
    let device = |on_mobile: &str, on_desktop: &str| (if mobile { on_mobile } else { on_desktop }).to_string();

    let style = vec![
        decl("position", "absolute"),
        decl("display", "none"),
        decl(
            "background-color",
            pick("rgba(33, 33, 33, 0.95)", "rgba(245, 245, 245, 0.95)"),
        ),
        decl("border", pick("1px solid #4A4A4A", "1px solid #D3D3D3")),
        decl("padding", device("8px", "12px")),
        decl("z-index", "10000"),
        decl("max-width", format!("{}px", max_width)),
        decl("min-width", device("80px", "100px")),
        decl("border-radius", "6px"),
        decl(
            "box-shadow",
            pick("0 4px 12px rgba(0, 0, 0, 0.4)", "0 4px 12px rgba(0, 0, 0, 0.2)"),
        ),
        decl("color", pick("#FFFFFF", "#000000")),
        decl("font-family", "ui-sans-serif, system-ui, sans-serif"),
        decl("font-size", device("12px", "14px")),
        decl("line-height", "1.5"),
        decl("transition", "opacity 0.2s ease-in-out"),
        decl("opacity", "0"),
        decl("white-space", "normal"),
        decl("height", "auto"),
        decl("max-height", device("200px", "500px")),
        decl("overflow-y", "auto"),
    ];

    let close_style = vec![
        decl("position", "absolute"),
        decl("top", "2px"),
        decl("right", "2px"),
        decl("font-size", "12px"),
        decl("font-weight", "bold"),
        decl("color", pick("#A4A4A4", "#222222")),
        decl("cursor", "pointer"),
        decl("padding", "2px 4px"),
        decl("line-height", "1"),
    ];

    (style, close_style)
}

fn decl(property: &str, value: impl Into<String>) -> (String, String) {
    (property.to_string(), value.into())
}
