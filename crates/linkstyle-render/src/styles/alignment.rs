//! Text alignment inside callout and quote blocks.

use linkstyle_codec::BlockAttributes;
use log::debug;

use super::{StyledLink, LINK_ID_ATTR};
use crate::dom::NodeId;
use crate::ops::StyleOperation;

/// Aligns `target` and injects a rule scoped to the link's generated id.
///
/// Inline properties are set only for the fields the record carries; the
/// injected rule always states both, falling back to `left` and `top`. The
/// caller is responsible for tagging the link with its id.
pub fn apply(target: NodeId, attrs: &BlockAttributes, link: &StyledLink) -> Vec<StyleOperation> {
    let mut ops = Vec::new();

    if let Some(align) = attrs.text_align {
        ops.push(StyleOperation::set_style(target, "text-align", align.css()));
    }
    if let Some(align) = attrs.vertical_align {
        ops.push(StyleOperation::set_style(target, "vertical-align", align.css()));
    }

    let text_align = attrs.text_align.unwrap_or_default().css();
    let vertical_align = attrs.vertical_align.unwrap_or_default().css();
    ops.push(StyleOperation::inject_rule(rule(&link.id, text_align, vertical_align)));

    debug!(
        "aligned block for link {}: text-align={}, vertical-align={}",
        link.number(),
        text_align,
        vertical_align
    );
    ops
}

fn rule(link_id: &str, text_align: &str, vertical_align: &str) -> String {
    format!(
        ".notion-quote-block div:has(a[{attr}=\"{id}\"]),\n\
         .notion-callout-block div:has(a[{attr}=\"{id}\"]) {{\n  \
         text-align: {text_align} !important;\n  \
         vertical-align: {vertical_align} !important;\n}}",
        attr = LINK_ID_ATTR,
        id = link_id,
        text_align = text_align,
        vertical_align = vertical_align,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use linkstyle_codec::StyleRecord;

    fn target() -> (NodeId, StyledLink) {
        let doc = Document::parse("<div><div></div><a href=\"#3#\">x</a></div>").unwrap();
        let div = doc.find_descendant(doc.body(), |e| e.is("div")).unwrap();
        let a = doc.find_descendant(doc.body(), |e| e.is("a")).unwrap();
        (
            div,
            StyledLink {
                node: a,
                index: 0,
                id: "link-0-7".into(),
            },
        )
    }

    fn css(ops: &[StyleOperation]) -> &str {
        ops.iter()
            .find_map(|op| match op {
                StyleOperation::InjectRule { css } => Some(css.as_str()),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn both_fields() {
        let (div, link) = target();
        let attrs = StyleRecord::from_fields(["3", "", "", "", "", "1", "2"]).block_attributes();
        let ops = apply(div, &attrs, &link);

        assert!(ops.contains(&StyleOperation::set_style(div, "text-align", "center")));
        assert!(ops.contains(&StyleOperation::set_style(div, "vertical-align", "bottom")));
        let css = css(&ops);
        assert!(css.contains(".notion-quote-block div:has(a[data-link-id=\"link-0-7\"])"));
        assert!(css.contains(".notion-callout-block div:has(a[data-link-id=\"link-0-7\"])"));
        assert!(css.contains("text-align: center !important"));
        assert!(css.contains("vertical-align: bottom !important"));
    }

    #[test]
    fn missing_field_uses_default_in_rule_only() {
        let (div, link) = target();
        let attrs = StyleRecord::from_fields(["3", "", "", "", "", "2"]).block_attributes();
        let ops = apply(div, &attrs, &link);

        assert!(!ops
            .iter()
            .any(|op| matches!(op, StyleOperation::SetStyle { property, .. } if property == "vertical-align")));
        let css = css(&ops);
        assert!(css.contains("text-align: right !important"));
        assert!(css.contains("vertical-align: top !important"));
    }

    #[test]
    fn invalid_value_falls_back() {
        let (div, link) = target();
        let attrs = StyleRecord::from_fields(["3", "", "", "", "", "9"]).block_attributes();
        let ops = apply(div, &attrs, &link);
        assert!(ops.contains(&StyleOperation::set_style(div, "text-align", "left")));
    }
}
