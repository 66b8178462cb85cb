//! Annotation tooltips: construction data, placement and event handling.
//!
//! A tooltip is created hidden by [`StyleOperation::CreateTooltip`]. The host
//! forwards pointer and page events as [`TooltipEvent`]s to a
//! [`TooltipController`], which answers with the style operations that show,
//! move or hide it.
//!
//! Showing takes two rounds. On [`TooltipEvent::MouseEnter`] the tooltip is
//! displayed off-screen and transparent so the host can measure it; on the
//! next [`TooltipEvent::AnimationFrame`] the measured size is used to place it
//! and fade it in.

use log::{debug, warn};
use serde::Serialize;

use super::LINK_ID_ATTR;
use crate::dom::{Document, NodeId, Rect, Viewport};
use crate::ops::StyleOperation;

/// Vertical gap between the link and its tooltip, in px.
pub const GAP: f64 = 8.0;

/// Everything needed to build one tooltip element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    /// Generated id of the link the tooltip belongs to.
    pub link_id: String,
    /// Markup of the hidden annotation block.
    pub content: String,
    pub style: Vec<(String, String)>,
    pub close_style: Vec<(String, String)>,
}

impl Tooltip {
    pub const CLASS: &'static str = "annotation-tooltip";
    /// Attribute on the tooltip naming its link's id.
    pub const LINK_ATTR: &'static str = "data-tooltip-for";
    pub const CLOSE_CLASS: &'static str = "annotation-tooltip-close";
    pub const CLOSE_GLYPH: &'static str = "×";
}

/// Events the host forwards from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipEvent {
    /// Pointer entered an annotation link.
    MouseEnter(NodeId),
    /// The frame after [`TooltipEvent::MouseEnter`], once the tooltip has been
    /// measured.
    AnimationFrame(NodeId),
    /// Pointer left an annotation link.
    MouseLeave(NodeId),
    /// Click on an annotation link. The host must prevent navigation.
    Click(NodeId),
    /// Click on a tooltip's close button. Carries the tooltip node.
    Close(NodeId),
    /// The page became hidden.
    VisibilityHidden,
    /// The window was resized.
    Resize,
}

impl TooltipEvent {
    /// Whether the host should cancel the event's default action.
    pub fn prevents_default(&self) -> bool {
        matches!(self, TooltipEvent::Click(_))
    }
}

/// Computes the tooltip's document position as `(top, left)`.
///
/// The tooltip goes below the link, left-aligned with it. It is right-aligned
/// with the link when it would overflow the viewport's right edge, and placed
/// above the link when the space below is too small.
pub fn place(anchor: Rect, size: (f64, f64), viewport: Viewport) -> (f64, f64) {
    let (width, height) = size;

    let mut top = anchor.bottom() + viewport.scroll_y + GAP;
    let mut left = anchor.left + viewport.scroll_x;

    if viewport.width - (anchor.left + width) < 0.0 {
        left = anchor.right() + viewport.scroll_x - width;
    }

    let space_below = viewport.height - anchor.bottom();
    if height > space_below - GAP {
        top = anchor.top + viewport.scroll_y - height - GAP;
    }

    (top, left)
}

fn px(value: f64) -> String {
    format!("{}px", value)
}

/// Routes [`TooltipEvent`]s to the affected tooltips.
#[derive(Debug, Default, Clone, Copy)]
pub struct TooltipController;

impl TooltipController {
    pub fn new() -> Self {
        Self
    }

    /// All tooltip elements in the document.
    pub fn tooltips(doc: &Document) -> Vec<NodeId> {
        doc.descendants(doc.root())
            .filter(|id| doc.has_class(*id, Tooltip::CLASS))
            .collect()
    }

    /// The tooltip created for `link`.
    pub fn tooltip_for(doc: &Document, link: NodeId) -> Option<NodeId> {
        let link_id = doc.attr(link, LINK_ID_ATTR)?;
        doc.descendants(doc.body()).find(|id| {
            doc.has_class(*id, Tooltip::CLASS) && doc.attr(*id, Tooltip::LINK_ATTR) == Some(link_id)
        })
    }

    pub fn handle(&self, doc: &Document, event: TooltipEvent) -> Vec<StyleOperation> {
        match event {
            TooltipEvent::MouseEnter(link) => {
                let Some(tooltip) = Self::tooltip_for(doc, link) else {
                    return Vec::new();
                };
                debug!("mouseenter on annotation link, measuring tooltip");
                vec![
                    StyleOperation::set_style(tooltip, "display", "block"),
                    StyleOperation::set_style(tooltip, "opacity", "0"),
                    StyleOperation::set_style(tooltip, "left", "-9999px"),
                    StyleOperation::set_style(tooltip, "top", "0px"),
                ]
            }
            TooltipEvent::AnimationFrame(link) => {
                let Some(tooltip) = Self::tooltip_for(doc, link) else {
                    return Vec::new();
                };
                let Some(anchor) = doc.rect(link) else {
                    warn!("annotation link has no layout, tooltip stays hidden");
                    return Vec::new();
                };
                let size = doc
                    .rect(tooltip)
                    .map(|r| (r.width, r.height))
                    .unwrap_or((0.0, 0.0));
                let (top, left) = place(anchor, size, doc.viewport());
                debug!("tooltip positioned at left={}, top={}", left, top);
                vec![
                    StyleOperation::set_style(tooltip, "top", px(top)),
                    StyleOperation::set_style(tooltip, "left", px(left)),
                    StyleOperation::set_style(tooltip, "opacity", "1"),
                ]
            }
            TooltipEvent::MouseLeave(link) => Self::tooltip_for(doc, link)
                .map(hide)
                .unwrap_or_default(),
            TooltipEvent::Click(_) => {
                debug!("click prevented for annotation link");
                Vec::new()
            }
            TooltipEvent::Close(tooltip) => {
                if doc.has_class(tooltip, Tooltip::CLASS) {
                    hide(tooltip)
                } else {
                    // The close button itself.
                    doc.closest(tooltip, |e| e.has_class(Tooltip::CLASS))
                        .map(hide)
                        .unwrap_or_default()
                }
            }
            TooltipEvent::VisibilityHidden | TooltipEvent::Resize => {
                let all = Self::tooltips(doc);
                debug!("hiding {} tooltips on {:?}", all.len(), event);
                all.into_iter().flat_map(hide).collect()
            }
        }
    }
}

fn hide(tooltip: NodeId) -> Vec<StyleOperation> {
    vec![
        StyleOperation::set_style(tooltip, "display", "none"),
        StyleOperation::set_style(tooltip, "opacity", "0"),
    ]
}
