//! Batching page changes and driving the scanner.
//!
//! The host reports every mutation of the page to a [`Session`]. Mutations are
//! collected by a [`Debouncer`] and only re-scanned once the page has been
//! quiet for the configured window, so a burst of edits costs one scan.

use std::time::{Duration, Instant};

use log::debug;

use crate::config::Config;
use crate::dom::{Document, NodeId};
use crate::ops::StyleOperation;
use crate::scanner::Scanner;
use crate::styles::{base_stylesheet, list, TooltipController, TooltipEvent};

const TEXT_BLOCK_CLASS: &str = "notion-text-block";

/// Collects items until no new one has arrived for `window`.
///
/// Every [`notify`](Debouncer::notify) pushes the deadline back to
/// `now + window`. [`poll`](Debouncer::poll) hands out the accumulated items
/// once that deadline has passed. Duplicate items are kept once.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    deadline: Option<Instant>,
    pending: Vec<T>,
}

impl<T: PartialEq> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            pending: Vec::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn notify(&mut self, item: T, now: Instant) {
        if !self.pending.contains(&item) {
            self.pending.push(item);
        }
        self.deadline = Some(now + self.window);
    }

    /// When the pending batch becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Takes the batch if the window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<Vec<T>> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(std::mem::take(&mut self.pending))
            }
            _ => None,
        }
    }
}

/// A page and the machinery that keeps it styled.
#[derive(Debug)]
pub struct Session {
    doc: Document,
    scanner: Scanner,
    debouncer: Debouncer<NodeId>,
    tooltips: TooltipController,
}

impl Session {
    pub fn new(doc: Document, config: Config) -> Self {
        let debouncer = Debouncer::new(config.debounce());
        Self {
            doc,
            scanner: Scanner::new(config),
            debouncer,
            tooltips: TooltipController::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for the host to mirror page changes. Report them with
    /// [`mutated`](Session::mutated).
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn scanner(&self) -> &Scanner {
        &self.scanner
    }

    /// Installs the base stylesheet and styles the whole page.
    pub fn start(&mut self) -> Vec<StyleOperation> {
        let mut ops = vec![base_stylesheet()];
        self.doc.apply_all(&ops);
        let root = self.doc.root();
        ops.extend(self.rescan_regions(&[root]));
        ops
    }

    /// Records a mutation of `target`.
    pub fn mutated(&mut self, target: NodeId, now: Instant) {
        self.debouncer.notify(target, now);
    }

    /// Re-scans the mutated regions if the page has been quiet long enough.
    pub fn tick(&mut self, now: Instant) -> Vec<StyleOperation> {
        let Some(targets) = self.debouncer.poll(now) else {
            return Vec::new();
        };

        let mut roots: Vec<NodeId> = Vec::new();
        for target in targets {
            let root = self
                .doc
                .closest(target, |e| e.has_class(TEXT_BLOCK_CLASS))
                .unwrap_or_else(|| self.doc.root());
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        debug!("debounced batch: {} regions to re-scan", roots.len());
        self.rescan_regions(&roots)
    }

    /// Forwards a host event to the tooltips.
    pub fn handle(&mut self, event: TooltipEvent) -> Vec<StyleOperation> {
        let ops = self.tooltips.handle(&self.doc, event);
        self.doc.apply_all(&ops);
        ops
    }

    /// Scans `roots` as one batch, then realigns the bullets in each.
    fn rescan_regions(&mut self, roots: &[NodeId]) -> Vec<StyleOperation> {
        let mut ops = self.scanner.rescan_batch(&self.doc, roots);
        self.doc.apply_all(&ops);
        for root in roots {
            let aligned = list::align_bullets(&self.doc, *root);
            self.doc.apply_all(&aligned);
            ops.extend(aligned);
        }
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn fires_after_quiet_window() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(100));
        debouncer.notify(1, start);

        assert_eq!(debouncer.poll(start + ms(50)), None);
        assert_eq!(debouncer.poll(start + ms(100)), Some(vec![1]));
        assert_eq!(debouncer.poll(start + ms(200)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn later_notify_pushes_deadline() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(100));
        debouncer.notify(1, start);
        debouncer.notify(2, start + ms(80));

        assert_eq!(debouncer.poll(start + ms(120)), None);
        assert_eq!(debouncer.deadline(), Some(start + ms(180)));
        assert_eq!(debouncer.poll(start + ms(180)), Some(vec![1, 2]));
    }

    #[test]
    fn duplicates_are_collapsed() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(ms(10));
        debouncer.notify("a", start);
        debouncer.notify("a", start);
        debouncer.notify("b", start);
        assert_eq!(debouncer.poll(start + ms(10)), Some(vec!["a", "b"]));
    }

    #[test]
    fn start_injects_base_stylesheet() {
        let doc = Document::parse(r##"<div class="notion-text-block"><a href="#0.8.aa0000#">x</a></div>"##).unwrap();
        let mut session = Session::new(doc, Config::default());
        let ops = session.start();

        assert!(matches!(&ops[0], StyleOperation::InjectRule { css } if css.contains("data-icon")));
        let doc = session.document();
        let a = doc.find_descendant(doc.body(), |e| e.is("a")).unwrap();
        assert_eq!(doc.attr(a, "data-styled"), Some("true"));
    }

    #[test]
    fn tick_rescans_mutated_block() {
        let doc = Document::parse(r##"<div class="notion-text-block" id="b"></div>"##).unwrap();
        let mut session = Session::new(
            doc,
            Config {
                debounce_ms: 50,
                ..Config::default()
            },
        );
        session.start();

        let block = {
            let doc = session.document_mut();
            let block = doc.find_descendant(doc.body(), |e| e.attr("id") == Some("b")).unwrap();
            doc.append_markup(block, r##"<a href="#0.8.aa0000#">new</a>"##).unwrap();
            block
        };
        let now = Instant::now();
        session.mutated(block, now);

        assert!(session.tick(now + ms(10)).is_empty());
        let ops = session.tick(now + ms(50));
        assert!(!ops.is_empty());
        assert!(ops.iter().all(|op| !matches!(op, StyleOperation::InjectRule { .. })));
    }

    #[test]
    fn reference_region_mutated_first_still_gets_tooltip() {
        let doc = Document::parse(
            r##"<div><div class="notion-text-block" id="ref"></div><div class="notion-text-block" id="content" data-block-id="c1"></div></div>"##,
        )
        .unwrap();
        let mut session = Session::new(
            doc,
            Config {
                debounce_ms: 20,
                ..Config::default()
            },
        );
        session.start();

        let now = Instant::now();
        for (id, href) in [("ref", "#1.............a1#"), ("content", "#2.............a1#")] {
            let doc = session.document_mut();
            let block = doc.find_descendant(doc.body(), |e| e.attr("id") == Some(id)).unwrap();
            doc.append_markup(block, &format!(r##"<a href="{}">{}</a>"##, href, id))
                .unwrap();
            session.mutated(block, now);
        }

        let ops = session.tick(now + ms(20));
        let created = ops
            .iter()
            .filter(|op| matches!(op, StyleOperation::CreateTooltip { .. }))
            .count();
        assert_eq!(created, 1);
        assert_eq!(TooltipController::tooltips(session.document()).len(), 1);
    }
}
