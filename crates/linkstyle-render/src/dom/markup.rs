//! Reading and writing markup.
//!
//! Markup is read with `quick-xml`, so it must be well-formed (XHTML-style
//! void elements such as `<br/>`). `html`, `head` and `body` tags map onto the
//! document's own skeleton; anything else is created under the insertion
//! point. Whitespace-only text between tags is dropped.

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::document::{Document, NodeData, NodeId};
use crate::error::MarkupError;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

impl Document {
    /// Builds a document from markup.
    ///
    /// A bare fragment is placed inside `<body>`; a full `<html>` document
    /// fills the skeleton, merging attributes onto the existing elements.
    pub fn parse(markup: &str) -> Result<Self, MarkupError> {
        let mut doc = Document::new();
        let body = doc.body();
        parse_into(&mut doc, body, markup, true)?;
        Ok(doc)
    }

    /// Parses a fragment and appends its top-level nodes to `parent`.
    pub fn append_markup(&mut self, parent: NodeId, markup: &str) -> Result<Vec<NodeId>, MarkupError> {
        parse_into(self, parent, markup, false)
    }

    /// Serializes an element and its subtree.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serializes the children of an element.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_node(*child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let element = match self.data(id) {
            NodeData::Text(text) => {
                out.push_str(&escape(text.as_str()));
                return;
            }
            NodeData::Element(e) => e,
        };

        out.push('<');
        out.push_str(element.tag());
        if !element.classes().is_empty() {
            write_attr(out, "class", &element.classes().join(" "));
        }
        for (name, value) in element.attrs() {
            write_attr(out, name, value);
        }
        if !element.style().is_empty() {
            write_attr(out, "style", &element.style().to_string());
        }

        let children = self.children(id);
        if children.is_empty() && VOID_ELEMENTS.contains(&element.tag()) {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in children {
            self.write_node(*child, out);
        }
        out.push_str("</");
        out.push_str(element.tag());
        out.push('>');
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn parse_into(
    doc: &mut Document,
    parent: NodeId,
    markup: &str,
    map_skeleton: bool,
) -> Result<Vec<NodeId>, MarkupError> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<(NodeId, String)> = Vec::new();
    let mut top_level = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| MarkupError::Syntax {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        let insertion = stack.last().map(|(id, _)| *id).unwrap_or(parent);

        match event {
            Event::Start(start) => {
                let (id, name) = open_element(doc, insertion, &start, map_skeleton, &reader)?;
                if stack.is_empty() && id != doc.root() && id != doc.body() && id != doc.head() {
                    top_level.push(id);
                }
                stack.push((id, name));
            }
            Event::Empty(start) => {
                let (id, _) = open_element(doc, insertion, &start, map_skeleton, &reader)?;
                if stack.is_empty() {
                    top_level.push(id);
                }
            }
            Event::End(end) => {
                let name = decode_name(end.name().as_ref());
                match stack.pop() {
                    Some((_, open)) if open == name => {}
                    Some((_, open)) => {
                        return Err(MarkupError::Unbalanced {
                            expected: open,
                            found: name,
                        })
                    }
                    None => {
                        return Err(MarkupError::Unbalanced {
                            expected: String::new(),
                            found: name,
                        })
                    }
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| MarkupError::Syntax {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                })?;
                if !text.trim().is_empty() {
                    let id = doc.create_text(&text);
                    doc.append_child(insertion, id);
                    if stack.is_empty() {
                        top_level.push(id);
                    }
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                let id = doc.create_text(&text);
                doc.append_child(insertion, id);
            }
            Event::Eof => break,
            // Comments, declarations, doctypes and processing instructions.
            _ => {}
        }
    }

    if let Some((_, open)) = stack.pop() {
        return Err(MarkupError::Unclosed(open));
    }
    Ok(top_level)
}

fn open_element(
    doc: &mut Document,
    insertion: NodeId,
    start: &BytesStart<'_>,
    map_skeleton: bool,
    reader: &Reader<&[u8]>,
) -> Result<(NodeId, String), MarkupError> {
    let name = decode_name(start.name().as_ref());

    let id = match name.as_str() {
        "html" if map_skeleton => doc.root(),
        "head" if map_skeleton => doc.head(),
        "body" if map_skeleton => doc.body(),
        _ => {
            let id = doc.create_element(&name);
            doc.append_child(insertion, id);
            id
        }
    };

    for attr in start.attributes() {
        let attr = attr.map_err(|e| MarkupError::Syntax {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        let key = decode_name(attr.key.as_ref());
        let value = attr.unescape_value().map_err(|e| MarkupError::Syntax {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        doc.set_attr(id, &key, &value);
    }

    Ok((id, name))
}

fn decode_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_goes_into_body() {
        let doc = Document::parse("<div class=\"a b\"><span>hi</span></div>").unwrap();
        let div = doc.children(doc.body())[0];
        assert!(doc.has_class(div, "b"));
        assert_eq!(doc.text_content(div), "hi");
    }

    #[test]
    fn full_document_fills_skeleton() {
        let doc = Document::parse(
            "<html><head><style>a {}</style></head><body class=\"dark\"><p>x</p></body></html>",
        )
        .unwrap();
        assert!(doc.has_class(doc.body(), "dark"));
        assert_eq!(doc.children(doc.head()).len(), 1);
        assert_eq!(doc.children(doc.body()).len(), 1);
    }

    #[test]
    fn style_attribute_is_parsed() {
        let doc = Document::parse("<div style=\"color: red; opacity: 0.5\"></div>").unwrap();
        let div = doc.children(doc.body())[0];
        assert_eq!(doc.style(div).unwrap().get("opacity"), Some("0.5"));
    }

    #[test]
    fn outer_html_round_trip() {
        let markup = "<div class=\"notion-text-block\" data-block-id=\"b1\" style=\"color: red;\"><a href=\"#0.8#\">x &amp; y</a><br/></div>";
        let doc = Document::parse(markup).unwrap();
        let div = doc.children(doc.body())[0];
        assert_eq!(doc.outer_html(div), markup);
    }

    #[test]
    fn inner_html() {
        let doc = Document::parse("<div><b>a</b>c</div>").unwrap();
        let div = doc.children(doc.body())[0];
        assert_eq!(doc.inner_html(div), "<b>a</b>c");
    }

    #[test]
    fn append_markup_returns_top_level_nodes() {
        let mut doc = Document::new();
        let body = doc.body();
        let added = doc.append_markup(body, "<p>1</p><p>2</p>").unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(doc.children(body), added.as_slice());
    }

    #[test]
    fn mismatched_tags_fail() {
        assert!(Document::parse("<div><span></div>").is_err());
    }

    #[test]
    fn unclosed_tag_fails() {
        assert!(Document::parse("<div><p>text</p>").is_err());
    }
}
