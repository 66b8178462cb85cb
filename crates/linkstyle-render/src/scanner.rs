//! Finding styled links and dispatching them to the appliers.
//!
//! A scan runs in two passes over the candidate links of a subtree. The first
//! pass handles everything except annotation references, so every content
//! block of the batch is hidden and stored before the second pass builds the
//! reference tooltips. Links stay processed across scans until the page's
//! color mode changes, which resets the scanner and re-styles everything.

use std::collections::HashSet;

use linkstyle_codec::{ParsedHref, RecordKind};
use log::{debug, info};

use crate::config::Config;
use crate::dom::{Document, NodeId};
use crate::ops::StyleOperation;
use crate::styles::annotation::{self, HiddenBlocks};
use crate::styles::{block, divider, text, StyleContext, StyledLink, LINK_ID_ATTR};
use crate::theme::{detect_color_mode, ColorMode};

/// Editor blocks whose links may carry styling.
pub const SUPPORTED_BLOCKS: [&str; 10] = [
    "notion-text-block",
    "notion-table-block",
    "notion-quote-block",
    "notion-toggle-block",
    "notion-bulleted_list-block",
    "notion-numbered_list-block",
    "notion-callout-block",
    "notion-header-block",
    "notion-sub_header-block",
    "notion-sub_sub_header-block",
];

/// State carried from one scan to the next.
#[derive(Debug, Default)]
pub struct ScanContext {
    hidden_blocks: HiddenBlocks,
    processed_links: HashSet<NodeId>,
    processed_blocks: HashSet<NodeId>,
    mode: ColorMode,
}

impl ScanContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets stored annotation content, processed links and processed
    /// blocks.
    pub fn reset_state(&mut self) {
        self.hidden_blocks.clear();
        self.processed_links.clear();
        self.processed_blocks.clear();
    }

    pub fn hidden_blocks(&self) -> &HiddenBlocks {
        &self.hidden_blocks
    }

    pub fn is_processed(&self, link: NodeId) -> bool {
        self.processed_links.contains(&link)
    }

    pub fn processed_count(&self) -> usize {
        self.processed_links.len()
    }

    /// Whether a block record already styled `block` (a callout or quote
    /// body, a table cell or a divider separator).
    pub fn is_block_processed(&self, block: NodeId) -> bool {
        self.processed_blocks.contains(&block)
    }

    pub fn processed_block_count(&self) -> usize {
        self.processed_blocks.len()
    }

    /// Color mode seen by the last scan.
    pub fn mode(&self) -> ColorMode {
        self.mode
    }
}

/// Turns styled links into [`StyleOperation`]s.
#[derive(Debug, Default)]
pub struct Scanner {
    context: ScanContext,
    config: Config,
    sequence: u64,
}

impl Scanner {
    pub fn new(config: Config) -> Self {
        Self {
            context: ScanContext::new(),
            config,
            sequence: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn context(&self) -> &ScanContext {
        &self.context
    }

    /// Anchors under `root` whose `href` contains `#` and that sit inside a
    /// supported editor block.
    pub fn candidates(doc: &Document, root: NodeId) -> Vec<NodeId> {
        doc.descendants(root)
            .filter(|id| {
                doc.tag(*id) == Some("a")
                    && doc.attr(*id, "href").is_some_and(|href| href.contains('#'))
                    && doc
                        .parent(*id)
                        .and_then(|p| {
                            doc.closest(p, |e| SUPPORTED_BLOCKS.iter().any(|c| e.has_class(c)))
                        })
                        .is_some()
            })
            .collect()
    }

    /// Computes the operations for every unprocessed link under `root`.
    pub fn rescan(&mut self, doc: &Document, root: NodeId) -> Vec<StyleOperation> {
        self.rescan_batch(doc, &[root])
    }

    /// Computes the operations for every unprocessed link under any of
    /// `roots` as one batch: all content blocks of the batch are stored
    /// before any reference is wired, whatever region each sits in.
    pub fn rescan_batch(&mut self, doc: &Document, roots: &[NodeId]) -> Vec<StyleOperation> {
        let mode = detect_color_mode(doc);
        if mode != self.context.mode {
            info!("theme changed: was {}, now {}", self.context.mode, mode);
            self.context.reset_state();
            self.context.mode = mode;
        }
        debug!("detected theme: {}", mode);

        let mut seen = HashSet::new();
        let links: Vec<NodeId> = roots
            .iter()
            .flat_map(|root| Self::candidates(doc, *root))
            .filter(|node| seen.insert(*node))
            .collect();
        let mut ops = Vec::new();

        // Content blocks, block and text records, legacy colors.
        for (index, &node) in links.iter().enumerate() {
            let Some(parsed) = self.parse_unprocessed(doc, node) else {
                continue;
            };
            if is_reference(&parsed) {
                continue;
            }
            self.context.processed_links.insert(node);
            let link = self.styled_link(doc, node, index);
            let cx = StyleContext::new(doc, mode, &self.config);

            ops.extend(text::apply(&cx, &link, &parsed));

            let ParsedHref::Record(record) = &parsed else {
                continue;
            };
            match record.kind() {
                RecordKind::Block => {
                    let attrs = record.block_attributes();
                    let divider = divider::find_target(doc, node);
                    let target = match divider {
                        Some(t) => Some(t.separator),
                        None => block::find_target(doc, node).map(|(_, target)| target),
                    };
                    if let Some(target) = target {
                        if !self.context.processed_blocks.insert(target) {
                            debug!("link {}: its block is already styled", link.number());
                            continue;
                        }
                    }
                    if divider.is_some() {
                        ops.extend(divider::apply(&cx, &link, &attrs));
                    } else {
                        ops.extend(block::apply(&cx, &link, &attrs));
                    }
                }
                RecordKind::AnnotationContent => {
                    ops.extend(annotation::hide(&cx, &link, record, &mut self.context.hidden_blocks));
                }
                _ => {}
            }
        }

        // Annotation references.
        for (index, &node) in links.iter().enumerate() {
            let Some(parsed) = self.parse_unprocessed(doc, node) else {
                continue;
            };
            self.context.processed_links.insert(node);
            let link = self.styled_link(doc, node, index);
            let cx = StyleContext::new(doc, mode, &self.config);

            ops.extend(text::apply(&cx, &link, &parsed));
            if let ParsedHref::Record(record) = &parsed {
                if record.is_kind(&RecordKind::AnnotationReference) {
                    ops.extend(annotation::reference(&cx, &link, record, &self.context.hidden_blocks));
                }
            }
        }

        debug!(
            "scan of {} candidate links in {} regions produced {} operations",
            links.len(),
            roots.len(),
            ops.len()
        );
        ops
    }

    /// [`rescan`](Scanner::rescan) and apply the result. Returns the number of
    /// operations applied.
    pub fn scan(&mut self, doc: &mut Document, root: NodeId) -> usize {
        let ops = self.rescan(doc, root);
        doc.apply_all(&ops);
        ops.len()
    }

    fn parse_unprocessed(&self, doc: &Document, node: NodeId) -> Option<ParsedHref> {
        if self.context.is_processed(node) {
            return None;
        }
        linkstyle_codec::parse(doc.attr(node, "href")?)
    }

    /// Keeps the id an earlier scan gave the link, so rules and tooltips
    /// keyed by it are replaced rather than duplicated.
    fn styled_link(&mut self, doc: &Document, node: NodeId, index: usize) -> StyledLink {
        let id = match doc.attr(node, LINK_ID_ATTR) {
            Some(id) => id.to_string(),
            None => {
                self.sequence += 1;
                format!("link-{}-{}", index, self.sequence)
            }
        };
        StyledLink { node, index, id }
    }
}

fn is_reference(parsed: &ParsedHref) -> bool {
    parsed
        .record()
        .is_some_and(|r| r.is_kind(&RecordKind::AnnotationReference))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(markup: &str) -> Document {
        Document::parse(markup).unwrap()
    }

    #[test]
    fn candidates_need_hash_and_block() {
        let d = doc(r##"<div>
            <div class="notion-text-block"><a href="#0#">a</a><a href="https://example.com">b</a></div>
            <div class="notion-page-block"><a href="#0#">c</a></div>
            <div class="notion-header-block"><div><a href="x#y">d</a></div></div>
        </div>"##);
        let found: Vec<String> = Scanner::candidates(&d, d.root())
            .into_iter()
            .map(|id| d.text_content(id))
            .collect();
        assert_eq!(found, vec!["a", "d"]);
    }

    #[test]
    fn unparsable_links_stay_unprocessed() {
        let d = doc(r##"<div class="notion-text-block"><a href="#zz#">x</a></div>"##);
        let mut scanner = Scanner::default();
        assert!(scanner.rescan(&d, d.root()).is_empty());
        assert_eq!(scanner.context().processed_count(), 0);
    }

    #[test]
    fn link_ids_are_unique_per_scan() {
        let d = doc(r##"<div class="notion-text-block"><a href="#0#">x</a><a href="#0#">y</a></div>"##);
        let mut scanner = Scanner::default();
        let ops = scanner.rescan(&d, d.root());
        assert!(!ops.is_empty());
        assert_eq!(scanner.context().processed_count(), 2);
        assert_eq!(scanner.styled_link(&d, d.root(), 5).id, "link-5-3");

        let mut tagged = d.clone();
        let a = tagged.find_descendant(tagged.body(), |e| e.is("a")).unwrap();
        tagged.set_attr(a, LINK_ID_ATTR, "link-0-1");
        assert_eq!(scanner.styled_link(&tagged, a, 0).id, "link-0-1");
    }

    #[test]
    fn theme_change_resets_state() {
        let mut d = doc(r##"<div class="notion-text-block"><a href="#0.8.aa0000#">x</a></div>"##);
        let mut scanner = Scanner::default();
        assert!(!scanner.rescan(&d, d.root()).is_empty());
        assert!(scanner.rescan(&d, d.root()).is_empty());

        let body = d.body();
        d.set_attr(body, "class", "dark");
        assert!(!scanner.rescan(&d, d.root()).is_empty());
        assert_eq!(scanner.context().mode(), ColorMode::Dark);
    }

    #[test]
    fn reset_state_clears_every_collection() {
        let d = doc(r##"<div>
            <div class="notion-callout-block"><div role="note"><div><a href="#3.2#">c</a></div></div></div>
            <div class="notion-text-block" data-block-id="b1"><a href="#2.............a1#">n</a></div>
        </div>"##);
        let mut scanner = Scanner::default();
        scanner.rescan(&d, d.root());
        assert_eq!(scanner.context().processed_count(), 2);
        assert_eq!(scanner.context().processed_block_count(), 1);
        assert_eq!(scanner.context().hidden_blocks().len(), 1);

        scanner.context.reset_state();
        assert_eq!(scanner.context().processed_count(), 0);
        assert_eq!(scanner.context().processed_block_count(), 0);
        assert!(scanner.context().hidden_blocks().is_empty());
    }

    #[test]
    fn second_record_in_same_block_is_skipped() {
        let d = doc(r##"<div class="notion-callout-block"><div role="note"><div id="body">
            <a href="#3.2#">first</a><a href="#3.5#">second</a>
        </div></div></div>"##);
        let mut scanner = Scanner::default();
        let ops = scanner.rescan(&d, d.root());

        let radii: Vec<&str> = ops
            .iter()
            .filter_map(|op| match op {
                StyleOperation::SetStyle { property, value, .. } if property == "border-radius" => {
                    Some(value.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec!["14px"]);
        assert_eq!(scanner.context().processed_count(), 2);
        assert_eq!(scanner.context().processed_block_count(), 1);
    }

    #[test]
    fn batch_wires_reference_from_another_region() {
        let d = doc(r##"<div>
            <div class="notion-text-block" id="ref"><a href="#1.............a1#">r</a></div>
            <div class="notion-text-block" id="content" data-block-id="c1"><a href="#2.............a1#">c</a></div>
        </div>"##);
        let region = |id: &str| d.find_descendant(d.body(), |e| e.attr("id") == Some(id)).unwrap();
        let mut scanner = Scanner::default();
        let ops = scanner.rescan_batch(&d, &[region("ref"), region("content")]);
        let created = ops
            .iter()
            .filter(|op| matches!(op, StyleOperation::CreateTooltip { .. }))
            .count();
        assert_eq!(created, 1);
    }

    #[test]
    fn overflowing_block_fields_do_not_stop_the_scan() {
        let mut d = doc(r##"<div>
            <div class="notion-callout-block"><div role="note"><div><a href="#3.ffffffff#">c</a></div></div></div>
            <div class="notion-quote-block"><blockquote><div><a href="#3...ffffffff#">q</a></div></blockquote></div>
            <div class="notion-text-block"><a href="#0........80000000.ffffffff#">t</a></div>
        </div>"##);
        let root = d.root();
        let mut scanner = Scanner::default();
        assert!(scanner.scan(&mut d, root) > 0);
        assert_eq!(scanner.context().processed_count(), 3);
        assert_eq!(scanner.context().processed_block_count(), 2);
    }
}
