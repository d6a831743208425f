use std::time::Instant;
use tracing::{debug, trace};

use crate::classifier::Classifier;
use crate::config::ScrubConfig;
use crate::dom::{Document, ElementData, NodeId, Overflow};

/// What one remediation pass actually did. Every operation is idempotent,
/// so a report with nothing in it means the document was already clean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Candidate elements examined by the sweep.
    pub candidates: usize,
    /// Elements detached from the tree.
    pub removed: usize,
    /// Root scroll elements whose overflow was forced back to auto.
    pub roots_unlocked: usize,
    /// Scroll-lock classes stripped from the root scroll elements.
    pub classes_stripped: usize,
    pub duration_ms: u64,
}

impl CleanReport {
    /// True when the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.removed == 0 && self.roots_unlocked == 0 && self.classes_stripped == 0
    }
}

/// The remediation engine: sweeps a subtree for blocking overlays and
/// restores scrolling on the document's root elements.
#[derive(Debug, Clone)]
pub struct Scrubber {
    classifier: Classifier,
    /// Lowercased class/id substrings that make an element a candidate.
    candidate_markers: Vec<String>,
}

impl Default for Scrubber {
    fn default() -> Self {
        Scrubber::new(&ScrubConfig::default())
    }
}

impl Scrubber {
    pub fn new(config: &ScrubConfig) -> Self {
        Scrubber {
            classifier: Classifier::new(config),
            candidate_markers: config
                .candidate_markers
                .iter()
                .map(|m| m.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Sweep `scope` (the element itself plus its subtree) for candidate
    /// elements, classify each, and detach the ones that are blocking
    /// overlays. Candidates detached along with an earlier removal in the
    /// same sweep are skipped, not errors.
    pub fn sweep_and_remove(&self, doc: &mut Document, scope: NodeId) -> CleanReport {
        let start = Instant::now();
        let mut report = CleanReport::default();

        // Snapshot in document order before mutating.
        let candidates: Vec<NodeId> = doc
            .descendants(scope)
            .filter(|&id| doc.get(id).is_some_and(|data| self.is_candidate(data)))
            .collect();
        report.candidates = candidates.len();

        for id in candidates {
            if !doc.is_attached(id) {
                trace!("candidate went away mid-sweep, skipping");
                continue;
            }
            if self.classifier.is_blocking_overlay(doc, id) {
                if let Some(data) = doc.get(id) {
                    debug!(
                        tag = %data.tag,
                        id = %data.id,
                        classes = ?data.classes,
                        "removing blocking overlay"
                    );
                }
                doc.remove(id);
                report.removed += 1;
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        report
    }

    /// Restore scrolling on the two root scroll elements (`html`, `body`):
    /// force hidden overflow back to auto with important precedence, and
    /// strip any class matching a scroll-lock pattern. The two measures are
    /// independent; either alone can be what locks the page.
    pub fn unlock_scroll(&self, doc: &mut Document) -> CleanReport {
        let start = Instant::now();
        let mut report = CleanReport::default();

        for id in [doc.root(), doc.body()] {
            let Some(data) = doc.get(id) else {
                continue;
            };

            let hidden = data.resolved_overflow() == Overflow::Hidden
                || data.resolved_overflow_x() == Overflow::Hidden
                || data.resolved_overflow_y() == Overflow::Hidden;
            if hidden {
                debug!(tag = %data.tag, "unlocking overflow on root scroll element");
                doc.set_overflow_important(id, Overflow::Auto);
                report.roots_unlocked += 1;
            }

            let locked_classes: Vec<String> = doc
                .get(id)
                .map(|data| {
                    data.classes
                        .iter()
                        .filter(|c| self.classifier.patterns().scroll_lock.is_match(c))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            for class in locked_classes {
                debug!(%class, "stripping scroll-lock class");
                doc.remove_class(id, &class);
                report.classes_stripped += 1;
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        report
    }

    /// One full pass: sweep the scope, then unlock scrolling. Removal runs
    /// first; unlocking still runs regardless, to cover overlays that only
    /// toggle a class instead of injecting an element.
    pub fn clean_page(&self, doc: &mut Document, scope: NodeId) -> CleanReport {
        let sweep = self.sweep_and_remove(doc, scope);
        let unlock = self.unlock_scroll(doc);
        CleanReport {
            candidates: sweep.candidates,
            removed: sweep.removed,
            roots_unlocked: unlock.roots_unlocked,
            classes_stripped: unlock.classes_stripped,
            duration_ms: sweep.duration_ms + unlock.duration_ms,
        }
    }

    fn is_candidate(&self, data: &ElementData) -> bool {
        if data.is_dialog_like() {
            return true;
        }
        let attrs = data.attr_string().to_ascii_lowercase();
        self.candidate_markers.iter().any(|m| attrs.contains(m.as_str()))
    }
}
