//! Style appliers.
//!
//! Each applier reads the [`Document`] and returns the [`StyleOperation`]s
//! that realize one decoded record. They share a [`StyleContext`] (document,
//! page color mode, configuration) and receive the link as a [`StyledLink`].
//!
//! | applier | records | target |
//! |---|---|---|
//! | [`text`] | every record | the anchor and its first `span` |
//! | [`block`] | block (`3`) | callout body, quote body or table cell |
//! | [`alignment`] | block with field 5 or 6 | callout or quote body |
//! | [`divider`] | block in a text block followed by a divider | the separator line |
//! | [`annotation`] | content (`2`) and reference (`1`) | the content block, a new tooltip |
//! | [`tooltip`] | host events | an existing tooltip |
//! | [`list`] | none, runs over list blocks | the bullet column |

pub mod alignment;
pub mod annotation;
pub mod block;
pub mod divider;
pub mod list;
pub mod text;
pub mod tooltip;

pub use tooltip::{Tooltip, TooltipController, TooltipEvent};

use crate::color::{ContrastEngine, Polarity};
use crate::config::Config;
use crate::dom::{Document, NodeId};
use crate::ops::StyleOperation;
use crate::theme::ColorMode;

/// Attribute marking a link as styled.
pub const STYLED_ATTR: &str = "data-styled";
/// Attribute marking a link that shows the annotation icon.
pub const ICON_ATTR: &str = "data-icon";
/// Attribute carrying the generated per-link identifier.
pub const LINK_ID_ATTR: &str = "data-link-id";

/// Rules injected once, before any link is styled.
pub const BASE_STYLESHEET: &str = r#"a[data-styled="true"][data-icon="true"]::before {
  content: '★';
  display: inline-block;
  margin-right: 5px;
  vertical-align: middle;
  color: inherit;
  font-size: inherit;
}
a[data-styled="true"] {
  pointer-events: none !important;
  cursor: text !important;
}"#;

/// The operation that installs [`BASE_STYLESHEET`].
pub fn base_stylesheet() -> StyleOperation {
    StyleOperation::inject_rule(BASE_STYLESHEET)
}

/// Shared inputs of every applier.
#[derive(Debug, Clone, Copy)]
pub struct StyleContext<'a> {
    pub doc: &'a Document,
    pub mode: ColorMode,
    pub config: &'a Config,
}

impl<'a> StyleContext<'a> {
    pub fn new(doc: &'a Document, mode: ColorMode, config: &'a Config) -> Self {
        Self { doc, mode, config }
    }

    pub fn engine(&self) -> ContrastEngine {
        self.config.contrast_engine()
    }

    /// Polarity of the page surface.
    pub fn page_polarity(&self) -> Polarity {
        self.mode.into()
    }
}

/// A link being styled in the current scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLink {
    pub node: NodeId,
    /// Position among the scan's candidate links.
    pub index: usize,
    /// Value for [`LINK_ID_ATTR`] when an applier needs a selector hook.
    pub id: String,
}

impl StyledLink {
    /// The operation tagging the anchor with its generated id.
    pub fn tag_op(&self) -> StyleOperation {
        StyleOperation::set_attribute(self.node, LINK_ID_ATTR, self.id.clone())
    }

    /// Human-facing link number used in log lines.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}
