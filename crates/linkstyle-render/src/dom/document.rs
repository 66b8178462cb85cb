use serde::{Deserialize, Serialize};

use super::inline_style::InlineStyle;

/// Handle to a node in a [`Document`]. Only meaningful for the document that
/// issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A measured layout box, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Window metrics mirrored from the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

/// An element node. `class` and `style` are held in parsed form and are not
/// part of [`Element::attrs`].
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    classes: Vec<String>,
    style: InlineStyle,
    rect: Option<Rect>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            classes: Vec::new(),
            style: InlineStyle::new(),
            rect: None,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    /// Sets an attribute. `class` and `style` are routed to their parsed forms.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            "style" => self.style = InlineStyle::parse(value),
            _ => match self.attrs.iter_mut().find(|(k, _)| *k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => self.attrs.push((name, value.to_string())),
            },
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        before != self.attrs.len()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        before != self.classes.len()
    }

    pub fn style(&self) -> &InlineStyle {
        &self.style
    }

    pub fn style_mut(&mut self) -> &mut InlineStyle {
        &mut self.style
    }

    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// An arena-backed document tree.
///
/// Every document has an `<html>` root with `<head>` and `<body>` children.
/// Nodes are never freed; detached nodes simply have no parent.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    viewport: Viewport,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty `<html><head></head><body></body></html>` document.
    pub fn new() -> Self {
        let mut doc = Document {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            viewport: Viewport::default(),
        };
        let root = doc.create_element("html");
        let head = doc.create_element("head");
        let body = doc.create_element("body");
        doc.append_child(root, head);
        doc.append_child(root, body);
        doc.root = root;
        doc.head = head;
        doc.body = body;
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // ─── Construction ───────────────────────────────────────────────────────

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(Element::new(tag)))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    /// Moves `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old) = self.nodes[child.0].parent {
            self.nodes[old.0].children.retain(|c| *c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Removes `id` from its parent. The node and its subtree stay valid.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(old) = self.nodes[id.0].parent.take() {
            self.nodes[old.0].children.retain(|c| *c != id);
        }
    }

    // ─── Node access ────────────────────────────────────────────────────────

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes.get(id.0)?.data {
            NodeData::Element(e) => Some(e),
            NodeData::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.0)?.data {
            NodeData::Element(e) => Some(e),
            NodeData::Text(_) => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::tag)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(e) = self.element_mut(id) {
            e.set_attr(name, value);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_class(class))
    }

    pub fn style(&self, id: NodeId) -> Option<&InlineStyle> {
        self.element(id).map(Element::style)
    }

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.element(id)?.rect()
    }

    /// Records the host's measured box for an element.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(e) = self.element_mut(id) {
            e.rect = Some(rect);
        }
    }

    pub fn text_content(&self, id: NodeId) -> String {
        match self.data(id) {
            NodeData::Text(t) => t.clone(),
            NodeData::Element(_) => self
                .descendants(id)
                .filter_map(|n| match self.data(n) {
                    NodeData::Text(t) => Some(t.as_str()),
                    NodeData::Element(_) => None,
                })
                .collect(),
        }
    }

    // ─── Traversal ──────────────────────────────────────────────────────────

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|s| *s == id)?;
        siblings[pos + 1..]
            .iter()
            .copied()
            .find(|s| self.is_element(*s))
    }

    /// All nodes below `id` in document order, not including `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// The first descendant element matching `pred`, in document order.
    pub fn find_descendant<P>(&self, id: NodeId, pred: P) -> Option<NodeId>
    where
        P: Fn(&Element) -> bool,
    {
        self.descendants(id)
            .find(|n| self.element(*n).is_some_and(&pred))
    }

    /// The nearest element, starting at `id` itself and walking up, that
    /// matches `pred`.
    pub fn closest<P>(&self, id: NodeId, pred: P) -> Option<NodeId>
    where
        P: Fn(&Element) -> bool,
    {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.element(node).is_some_and(&pred) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Whether `id` is `ancestor` or lies below it.
    pub fn is_inclusive_descendant(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }
}

/// Pre-order iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let next = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(next).iter().rev().copied());
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let block = doc.create_element("div");
        doc.set_attr(block, "class", "notion-text-block notion-selectable");
        let link = doc.create_element("a");
        doc.set_attr(link, "href", "#0.8#");
        let span = doc.create_element("span");
        let text = doc.create_text("hello");
        doc.append_child(doc.body(), block);
        doc.append_child(block, link);
        doc.append_child(link, span);
        doc.append_child(span, text);
        (doc, block, link, span)
    }

    #[test]
    fn skeleton() {
        let doc = Document::new();
        assert_eq!(doc.tag(doc.root()), Some("html"));
        assert_eq!(doc.children(doc.root()), &[doc.head(), doc.body()]);
    }

    #[test]
    fn class_attribute_is_parsed() {
        let (doc, block, _, _) = sample();
        assert!(doc.has_class(block, "notion-text-block"));
        assert!(doc.has_class(block, "notion-selectable"));
        assert_eq!(doc.attr(block, "class"), None);
    }

    #[test]
    fn closest_includes_self() {
        let (doc, block, link, span) = sample();
        assert_eq!(doc.closest(span, |e| e.is("a")), Some(link));
        assert_eq!(doc.closest(link, |e| e.is("a")), Some(link));
        assert_eq!(
            doc.closest(span, |e| e.has_class("notion-text-block")),
            Some(block)
        );
        assert_eq!(doc.closest(span, |e| e.is("table")), None);
    }

    #[test]
    fn descendants_in_document_order() {
        let (doc, block, link, span) = sample();
        let found: Vec<NodeId> = doc
            .descendants(block)
            .filter(|n| doc.is_element(*n))
            .collect();
        assert_eq!(found, vec![link, span]);
        assert_eq!(doc.text_content(block), "hello");
    }

    #[test]
    fn next_element_sibling_skips_text() {
        let mut doc = Document::new();
        let a = doc.create_element("div");
        let t = doc.create_text(" ");
        let b = doc.create_element("div");
        for n in [a, t, b] {
            doc.append_child(doc.body(), n);
        }
        assert_eq!(doc.next_element_sibling(a), Some(b));
        assert_eq!(doc.next_element_sibling(b), None);
    }

    #[test]
    fn append_moves_node() {
        let (mut doc, block, link, _) = sample();
        let other = doc.create_element("div");
        doc.append_child(doc.body(), other);
        doc.append_child(other, link);
        assert!(doc.children(block).is_empty());
        assert_eq!(doc.parent(link), Some(other));
    }

    #[test]
    fn rect_edges() {
        let r = Rect::new(100.0, 50.0, 100.0, 20.0);
        assert_eq!(r.right(), 200.0);
        assert_eq!(r.bottom(), 70.0);
    }
}
