//! Realizes href-encoded styling on an editor's document tree.
//!
//! Links whose `href` carries a [`linkstyle_codec`] record are turned into
//! styled text, block decorations, dividers and annotation tooltips. Colors
//! are corrected for the page's light or dark mode before they are written.
//!
//! The page is mirrored as a [`dom::Document`]. A [`Scanner`] reads it and
//! returns [`StyleOperation`]s; the caller applies them to the mirror with
//! [`Document::apply_all`](dom::Document::apply_all) and forwards them to the
//! real page, for instance as JSON via [`operations_to_json`].
//!
//! # Example
//!
//! ```rust
//! use linkstyle_render::dom::Document;
//! use linkstyle_render::{Config, Scanner};
//!
//! let mut doc = Document::parse(
//!     r##"<div class="notion-text-block"><a href="#0.8.aa0000#"><span>hi</span></a></div>"##,
//! )
//! .unwrap();
//! let root = doc.root();
//!
//! let mut scanner = Scanner::new(Config::default());
//! assert!(scanner.scan(&mut doc, root) > 0);
//!
//! let link = doc.find_descendant(doc.body(), |e| e.is("a")).unwrap();
//! assert_eq!(doc.attr(link, "data-styled"), Some("true"));
//! assert_eq!(doc.style(link).unwrap().get("font-size"), Some("16px"));
//!
//! // Nothing left to do until the page changes.
//! assert!(scanner.rescan(&doc, root).is_empty());
//! ```
//!
//! # Modules
//!
//! - [`color`]: hex decoding, WCAG contrast and the correction methods.
//! - [`dom`]: the arena document, markup I/O and inline styles.
//! - [`styles`]: one applier per kind of styling, plus tooltip events.
//! - [`theme`]: light/dark detection.
//!
//! Logging goes through the [`log`] facade; no logger is installed here.

pub mod color;
mod config;
pub mod dom;
mod error;
mod ops;
mod scanner;
mod schedule;
pub mod styles;
pub mod theme;

pub use config::Config;
pub use error::{ConfigError, MarkupError, UnknownContrastMethod};
pub use ops::{operations_to_json, StyleOperation};
pub use scanner::{ScanContext, Scanner, SUPPORTED_BLOCKS};
pub use schedule::{Debouncer, Session};
pub use theme::{detect_color_mode, ColorMode};

pub use linkstyle_codec;
