//! Vertical alignment of list bullets against tall first lines.

use log::debug;

use crate::dom::{Document, NodeId};
use crate::ops::StyleOperation;

const BULLETED: &str = "notion-bulleted_list-block";
const NUMBERED: &str = "notion-numbered_list-block";
const BULLET_BOX: &str = "notion-list-item-box-left";
const BULLET_GLYPH: &str = "pseudoBefore";
const TEXT: &str = "notranslate";

/// Pads each top-level list item's bullet column so the bullet sits at the
/// vertical middle of the item's text.
///
/// Items without a measured bullet, glyph or text box are skipped.
pub fn align_bullets(doc: &Document, root: NodeId) -> Vec<StyleOperation> {
    let mut ops = Vec::new();

    for (i, block) in top_level_items(doc, root).into_iter().enumerate() {
        let Some(bullet) = doc.find_descendant(block, |e| e.has_class(BULLET_BOX)) else {
            debug!("list item {}: no bullet column", i + 1);
            continue;
        };
        let glyph = doc.find_descendant(bullet, |e| e.has_class(BULLET_GLYPH));
        let text = text_box(doc, block);

        let (Some(glyph), Some(text)) = (glyph, text) else {
            debug!("list item {}: skipped, bullet or text not found", i + 1);
            continue;
        };
        let (Some(glyph_rect), Some(text_rect)) = (doc.rect(glyph), doc.rect(text)) else {
            debug!("list item {}: skipped, not measured", i + 1);
            continue;
        };

        let padding = (text_rect.height - glyph_rect.height) / 2.0;
        debug!(
            "list item {}: text {}px, bullet {}px, padding-top {}px",
            i + 1,
            text_rect.height,
            glyph_rect.height,
            padding
        );
        ops.push(StyleOperation::set_style(bullet, "padding-top", format!("{}px", padding)));
    }
    ops
}

/// List blocks under `root` that are not nested in a list block of the same
/// kind.
fn top_level_items(doc: &Document, root: NodeId) -> Vec<NodeId> {
    doc.descendants(root)
        .filter(|id| {
            [BULLETED, NUMBERED].iter().any(|kind| {
                doc.has_class(*id, kind) && !has_ancestor_with_class(doc, *id, kind)
            })
        })
        .collect()
}

fn has_ancestor_with_class(doc: &Document, id: NodeId, class: &str) -> bool {
    doc.parent(id)
        .and_then(|parent| doc.closest(parent, |e| e.has_class(class)))
        .is_some()
}

/// The first `.notranslate` below a `div` that is its parent's second
/// element child.
fn text_box(doc: &Document, block: NodeId) -> Option<NodeId> {
    doc.descendants(block).find(|id| {
        doc.has_class(*id, TEXT)
            && ancestors_within(doc, *id, block).any(|a| is_second_div(doc, a))
    })
}

fn ancestors_within(doc: &Document, id: NodeId, stop: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(doc.parent(id), move |a| {
        if *a == stop {
            None
        } else {
            doc.parent(*a)
        }
    })
    .take_while(move |a| *a != stop)
}

fn is_second_div(doc: &Document, id: NodeId) -> bool {
    doc.tag(id) == Some("div")
        && doc
            .parent(id)
            .is_some_and(|parent| doc.child_elements(parent).nth(1) == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Rect;

    const ITEM: &str = r#"<div class="notion-bulleted_list-block" id="item">
        <div class="notion-list-item-box-left" id="bullet"><div class="pseudoBefore" id="glyph"></div></div>
        <div><div class="notranslate" id="text">Tall line</div></div>
    </div>"#;

    fn by_id(doc: &Document, id: &str) -> NodeId {
        doc.find_descendant(doc.root(), |e| e.attr("id") == Some(id)).unwrap()
    }

    fn measured(markup: &str) -> Document {
        let mut doc = Document::parse(markup).unwrap();
        let glyph = by_id(&doc, "glyph");
        let text = by_id(&doc, "text");
        doc.set_rect(glyph, Rect::new(0.0, 0.0, 6.0, 6.0));
        doc.set_rect(text, Rect::new(0.0, 0.0, 200.0, 40.0));
        doc
    }

    #[test]
    fn pads_bullet_column() {
        let mut doc = measured(ITEM);
        let ops = align_bullets(&doc, doc.root());
        doc.apply_all(&ops);
        let bullet = by_id(&doc, "bullet");
        assert_eq!(doc.style(bullet).unwrap().get("padding-top"), Some("17px"));
    }

    #[test]
    fn unmeasured_items_are_skipped() {
        let doc = Document::parse(ITEM).unwrap();
        assert!(align_bullets(&doc, doc.root()).is_empty());
    }

    #[test]
    fn text_must_sit_in_second_child() {
        let markup = r#"<div class="notion-numbered_list-block">
            <div class="notion-list-item-box-left"><div class="pseudoBefore" id="glyph"></div><div class="notranslate" id="text"></div></div>
        </div>"#;
        let doc = measured(markup);
        assert!(align_bullets(&doc, doc.root()).is_empty());
    }

    #[test]
    fn nested_items_of_same_kind_are_skipped() {
        let markup = format!(
            r#"<div class="notion-bulleted_list-block" id="outer"><div class="notion-list-item-box-left"></div><div>{}</div></div>"#,
            ITEM
        );
        let doc = Document::parse(&markup).unwrap();
        let items = top_level_items(&doc, doc.root());
        assert_eq!(items, vec![by_id(&doc, "outer")]);
    }

    #[test]
    fn other_kind_nesting_counts_as_top_level() {
        let markup = format!(
            r#"<div class="notion-numbered_list-block" id="outer">{}</div>"#,
            ITEM
        );
        let doc = Document::parse(&markup).unwrap();
        let items = top_level_items(&doc, doc.root());
        assert_eq!(items, vec![by_id(&doc, "outer"), by_id(&doc, "item")]);
    }
}
