//! In-memory model of the host page.
//!
//! There is no browser here, so the page is mirrored into an arena-backed
//! [`Document`]: elements with tag, attributes, class list, a parsed inline
//! style and, when the host measured it, a layout [`Rect`]. Styling code
//! reads the document and emits [`StyleOperation`](crate::StyleOperation)s;
//! only [`Document::apply`] mutates it.
//!
//! ```rust
//! use linkstyle_render::dom::Document;
//!
//! let doc = Document::parse(
//!     r#"<div class="notion-text-block" data-block-id="b1"><a href="https://x.io/#0.8#">hi</a></div>"#,
//! ).unwrap();
//! let link = doc.find_descendant(doc.body(), |e| e.is("a")).unwrap();
//! let block = doc.closest(link, |e| e.attr("data-block-id").is_some()).unwrap();
//! assert_eq!(doc.attr(block, "data-block-id"), Some("b1"));
//! ```

mod document;
mod inline_style;
mod markup;

pub use document::{Descendants, Document, Element, NodeData, NodeId, Rect, Viewport};
pub use inline_style::{Declaration, InlineStyle};
