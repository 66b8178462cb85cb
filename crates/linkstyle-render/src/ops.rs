//! Style operations: the output of a scan.
//!
//! Appliers never touch the [`Document`] directly. They describe each change
//! as a [`StyleOperation`], which the caller replays with
//! [`Document::apply_all`] or serializes for a host bridge with
//! [`operations_to_json`].

use log::warn;
use serde::Serialize;

use crate::dom::{Document, NodeId};
use crate::styles::Tooltip;

/// One mutation of the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StyleOperation {
    SetStyle {
        node: NodeId,
        property: String,
        value: String,
        important: bool,
    },
    RemoveStyle {
        node: NodeId,
        property: String,
    },
    SetAttribute {
        node: NodeId,
        name: String,
        value: String,
    },
    RemoveAttribute {
        node: NodeId,
        name: String,
    },
    RemoveClass {
        node: NodeId,
        class: String,
    },
    /// Appends a `<style>` element with `css` to `<head>`.
    InjectRule { css: String },
    /// Builds an annotation tooltip and appends it to `<body>`.
    CreateTooltip { anchor: NodeId, tooltip: Tooltip },
}

impl StyleOperation {
    pub fn set_style(node: NodeId, property: &str, value: impl Into<String>) -> Self {
        StyleOperation::SetStyle {
            node,
            property: property.to_string(),
            value: value.into(),
            important: false,
        }
    }

    pub fn set_important(node: NodeId, property: &str, value: impl Into<String>) -> Self {
        StyleOperation::SetStyle {
            node,
            property: property.to_string(),
            value: value.into(),
            important: true,
        }
    }

    pub fn remove_style(node: NodeId, property: &str) -> Self {
        StyleOperation::RemoveStyle {
            node,
            property: property.to_string(),
        }
    }

    pub fn set_attribute(node: NodeId, name: &str, value: impl Into<String>) -> Self {
        StyleOperation::SetAttribute {
            node,
            name: name.to_string(),
            value: value.into(),
        }
    }

    pub fn remove_attribute(node: NodeId, name: &str) -> Self {
        StyleOperation::RemoveAttribute {
            node,
            name: name.to_string(),
        }
    }

    pub fn remove_class(node: NodeId, class: &str) -> Self {
        StyleOperation::RemoveClass {
            node,
            class: class.to_string(),
        }
    }

    pub fn inject_rule(css: impl Into<String>) -> Self {
        StyleOperation::InjectRule { css: css.into() }
    }

    /// The element this operation targets, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            StyleOperation::SetStyle { node, .. }
            | StyleOperation::RemoveStyle { node, .. }
            | StyleOperation::SetAttribute { node, .. }
            | StyleOperation::RemoveAttribute { node, .. }
            | StyleOperation::RemoveClass { node, .. } => Some(*node),
            StyleOperation::CreateTooltip { anchor, .. } => Some(*anchor),
            StyleOperation::InjectRule { .. } => None,
        }
    }
}

/// Serializes a batch for the host bridge.
pub fn operations_to_json(ops: &[StyleOperation]) -> serde_json::Result<String> {
    serde_json::to_string(ops)
}

impl Document {
    /// Realizes one operation. Operations aimed at missing or non-element
    /// nodes are ignored.
    pub fn apply(&mut self, op: &StyleOperation) {
        match op {
            StyleOperation::SetStyle {
                node,
                property,
                value,
                important,
            } => {
                if let Some(e) = self.element_mut(*node) {
                    e.style_mut().set(property, value, *important);
                }
            }
            StyleOperation::RemoveStyle { node, property } => {
                if let Some(e) = self.element_mut(*node) {
                    e.style_mut().remove(property);
                }
            }
            StyleOperation::SetAttribute { node, name, value } => self.set_attr(*node, name, value),
            StyleOperation::RemoveAttribute { node, name } => {
                if let Some(e) = self.element_mut(*node) {
                    e.remove_attr(name);
                }
            }
            StyleOperation::RemoveClass { node, class } => {
                if let Some(e) = self.element_mut(*node) {
                    e.remove_class(class);
                }
            }
            StyleOperation::InjectRule { css } => {
                let style = self.create_element("style");
                let text = self.create_text(css);
                self.append_child(style, text);
                let head = self.head();
                self.append_child(head, style);
            }
            StyleOperation::CreateTooltip { tooltip, .. } => {
                self.build_tooltip(tooltip);
            }
        }
    }

    /// Realizes a batch in order.
    pub fn apply_all(&mut self, ops: &[StyleOperation]) {
        for op in ops {
            self.apply(op);
        }
    }

    /// Builds a tooltip, replacing any earlier one for the same link. The
    /// stored block may carry the `display: none` that hid it; the copy
    /// drops it.
    fn build_tooltip(&mut self, tooltip: &Tooltip) -> NodeId {
        let stale: Vec<NodeId> = self
            .descendants(self.body())
            .filter(|id| {
                self.has_class(*id, Tooltip::CLASS)
                    && self.attr(*id, Tooltip::LINK_ATTR) == Some(tooltip.link_id.as_str())
            })
            .collect();
        for id in stale {
            self.detach(id);
        }

        let container = self.create_element("div");
        self.set_attr(container, "class", Tooltip::CLASS);
        self.set_attr(container, Tooltip::LINK_ATTR, &tooltip.link_id);

        match self.append_markup(container, &tooltip.content) {
            Ok(nodes) => {
                for node in nodes {
                    if let Some(e) = self.element_mut(node) {
                        e.style_mut().remove("display");
                    }
                }
            }
            Err(err) => {
                warn!(
                    "annotation content for {} is not valid markup ({}), inserting as text",
                    tooltip.link_id, err
                );
                let text = self.create_text(&tooltip.content);
                self.append_child(container, text);
            }
        }

        let close = self.create_element("span");
        self.set_attr(close, "class", Tooltip::CLOSE_CLASS);
        let cross = self.create_text(Tooltip::CLOSE_GLYPH);
        self.append_child(close, cross);
        self.append_child(container, close);

        for (property, value) in &tooltip.style {
            if let Some(e) = self.element_mut(container) {
                e.style_mut().set(property, value, false);
            }
        }
        for (property, value) in &tooltip.close_style {
            if let Some(e) = self.element_mut(close) {
                e.style_mut().set(property, value, false);
            }
        }

        let body = self.body();
        self.append_child(body, container);
        container
    }
}
