use tracing::trace;

use crate::config::{CoverageThresholds, ScrubConfig};
use crate::dom::{Document, ElementData, NodeId, Position, Rect, Viewport};
use crate::patterns::PatternLibrary;

/// Document skeleton and non-visual tags, never classified as overlays no
/// matter what their attributes or style claim.
const SKELETON_TAGS: [&str; 6] = ["html", "body", "head", "script", "style", "link"];

/// Decides whether a single element is a blocking overlay.
///
/// An identity match (attributes, dialog markers, or text) is never enough
/// on its own - plenty of benign elements carry "modal" in a class name.
/// The verdict requires corroboration from positioning, viewport coverage,
/// or stacking priority.
#[derive(Debug, Clone)]
pub struct Classifier {
    patterns: PatternLibrary,
    coverage: CoverageThresholds,
    min_z_index: i32,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier {
            patterns: PatternLibrary::default(),
            coverage: CoverageThresholds::default(),
            min_z_index: ScrubConfig::default().min_z_index,
        }
    }
}

impl Classifier {
    pub fn new(config: &ScrubConfig) -> Self {
        Classifier {
            patterns: PatternLibrary::from_config(config),
            coverage: config.coverage.clone(),
            min_z_index: config.min_z_index,
        }
    }

    pub fn patterns(&self) -> &PatternLibrary {
        &self.patterns
    }

    /// The classification verdict for one live element. Detached or missing
    /// nodes are never overlays; neither are skeleton tags.
    pub fn is_blocking_overlay(&self, doc: &Document, id: NodeId) -> bool {
        let Some(data) = doc.get(id) else {
            return false;
        };
        if SKELETON_TAGS.contains(&data.tag.as_str()) {
            return false;
        }
        if !doc.is_attached(id) {
            return false;
        }

        if !self.identity_signal(doc, id, data) {
            return false;
        }

        let positioning = data.resolved_position().is_pinned();
        let coverage = self.coverage_signal(data.rect, doc.viewport());
        // Fixed position alone counts as prominent even without a
        // parseable z-index.
        let prominence = data.z_index().is_some_and(|z| z >= self.min_z_index)
            || data.resolved_position() == Position::Fixed;

        let verdict = positioning || coverage || prominence;
        if verdict {
            trace!(
                tag = %data.tag,
                id = %data.id,
                positioning,
                coverage,
                prominence,
                "element classified as blocking overlay"
            );
        }
        verdict
    }

    fn identity_signal(&self, doc: &Document, id: NodeId, data: &ElementData) -> bool {
        if self.patterns.attribute.is_match(&data.attr_string()) {
            return true;
        }
        if data.is_dialog_like() {
            return true;
        }
        let text = format!("{} {}", data.aria_label, doc.visible_text(id));
        self.patterns.text.is_match(&text)
    }

    fn coverage_signal(&self, rect: Rect, viewport: Viewport) -> bool {
        rect.width >= viewport.width * self.coverage.min_width_frac
            || rect.height >= viewport.height * self.coverage.min_height_frac
            || (rect.width >= viewport.width * self.coverage.banner_width_frac
                && rect.height >= self.coverage.banner_min_height_px)
    }
}
