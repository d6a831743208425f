use tracing::{debug, trace};

use crate::config::ScrubConfig;
use crate::dom::{
    Attr, Document, MutationFeed, MutationRecord, NodeId, ObserverOptions, ReadyState,
};
use crate::engine::Scrubber;

/// Attribute changes that re-trigger a scoped clean. Anything else (data
/// attributes, href, ...) cannot turn an element into an overlay.
const WATCHED_ATTRIBUTES: [Attr; 4] = [Attr::Class, Attr::Style, Attr::AriaLabel, Attr::Role];

/// Watcher lifecycle. The transition is one-way; there is no way back to
/// idle short of dropping the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Observing,
}

/// Drives the remediation engine off the document's change notifications.
///
/// The host environment's microtask scheduling is modeled by the harness
/// calling [`Watcher::pump`] after each round of document changes settles.
/// One pump processes the batch queued so far; records generated *by* the
/// engine's own removals and restyles arrive in the next batch, and the
/// engine's idempotence keeps that feedback loop finite.
#[derive(Debug)]
pub struct Watcher {
    scrubber: Scrubber,
    state: WatcherState,
    feed: Option<MutationFeed>,
    load_handled: bool,
}

impl Watcher {
    pub fn new(scrubber: Scrubber) -> Self {
        Watcher {
            scrubber,
            state: WatcherState::Idle,
            feed: None,
            load_handled: false,
        }
    }

    pub fn with_defaults() -> Self {
        Watcher::new(Scrubber::new(&ScrubConfig::default()))
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    /// Startup contract: self-initializes against the document's current
    /// parse state. If structural parsing is already complete the watcher
    /// starts immediately; otherwise it stays idle and the first `pump`
    /// after the parse-complete signal starts it.
    pub fn observe(&mut self, doc: &mut Document) {
        if self.state == WatcherState::Observing {
            return;
        }
        if doc.ready_state() >= ReadyState::Interactive {
            self.start(doc);
        }
    }

    /// Process the mutation batch that accumulated since the last pump.
    pub fn pump(&mut self, doc: &mut Document) {
        if self.state == WatcherState::Idle {
            if doc.ready_state() >= ReadyState::Interactive {
                self.start(doc);
            } else {
                return;
            }
        }

        // The load event catches overlays injected by on-load scripts and
        // mutations the attribute filter does not cover (e.g. layout).
        if doc.load_fired() && !self.load_handled {
            self.load_handled = true;
            debug!("load event observed, full-document clean");
            self.scrubber.clean_page(doc, doc.root());
        }

        let Some(feed) = &self.feed else {
            return;
        };
        let batch = feed.drain();
        if batch.is_empty() {
            return;
        }
        trace!(records = batch.len(), "processing mutation batch");
        for record in batch {
            match record {
                MutationRecord::ChildList { added, .. } => {
                    for node in added {
                        self.clean_scoped(doc, node);
                    }
                }
                MutationRecord::Attribute { target, attr } => {
                    trace!(attribute = attr.name(), "attribute record");
                    self.clean_scoped(doc, target);
                }
            }
        }
    }

    /// Dispose the mutation subscription. The watcher is designed to run
    /// for the document's whole lifetime, so this exists only for hosts
    /// that need deterministic teardown.
    pub fn stop(&mut self, doc: &mut Document) {
        self.feed = None;
        doc.unsubscribe();
    }

    fn start(&mut self, doc: &mut Document) {
        self.state = WatcherState::Observing;
        // A load event that fired before observation began was already
        // covered by the initial clean below.
        self.load_handled = doc.load_fired();
        debug!("watcher entering observing state, initial clean");
        // Clean before subscribing so our own startup mutations do not
        // come back as the first batch.
        self.scrubber.clean_page(doc, doc.root());
        self.feed = Some(doc.subscribe(ObserverOptions {
            child_list: true,
            attribute_filter: WATCHED_ATTRIBUTES.to_vec(),
        }));
    }

    fn clean_scoped(&self, doc: &mut Document, scope: NodeId) {
        if !doc.is_attached(scope) {
            trace!("mutation target already detached, skipping");
            return;
        }
        self.scrubber.clean_page(doc, scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Element, Position, Viewport};

    fn interactive_doc() -> Document {
        let mut doc = Document::new(Viewport::new(1000.0, 800.0));
        doc.finish_parsing();
        doc
    }

    fn overlay() -> Element {
        Element::new("div")
            .class("subscribe-overlay")
            .position(Position::Fixed)
            .z_index(999)
            .size(1000.0, 800.0)
            .text("Subscribe now")
    }

    #[test]
    fn test_observe_starts_immediately_on_parsed_document() {
        let mut doc = interactive_doc();
        let body = doc.body();
        let wall = doc.append(body, overlay()).unwrap();

        let mut watcher = Watcher::with_defaults();
        watcher.observe(&mut doc);

        assert_eq!(watcher.state(), WatcherState::Observing);
        assert!(!doc.is_attached(wall), "initial clean runs on start");
    }

    #[test]
    fn test_observe_defers_while_loading() {
        let mut doc = Document::new(Viewport::new(1000.0, 800.0));
        let body = doc.body();
        let wall = doc.append(body, overlay()).unwrap();

        let mut watcher = Watcher::with_defaults();
        watcher.observe(&mut doc);
        assert_eq!(watcher.state(), WatcherState::Idle);
        assert!(doc.is_attached(wall), "nothing runs before parse completes");

        doc.finish_parsing();
        watcher.pump(&mut doc);
        assert_eq!(watcher.state(), WatcherState::Observing);
        assert!(!doc.is_attached(wall));
    }

    #[test]
    fn test_observe_twice_is_a_noop() {
        let mut doc = interactive_doc();
        let mut watcher = Watcher::with_defaults();
        watcher.observe(&mut doc);
        watcher.observe(&mut doc);
        assert_eq!(watcher.state(), WatcherState::Observing);
    }

    #[test]
    fn test_attribute_change_triggers_scoped_clean() {
        let mut doc = interactive_doc();
        let body = doc.body();
        // Benign at first: no identity signal.
        let div = doc
            .append(
                body,
                Element::new("div").position(Position::Fixed).size(1000.0, 800.0),
            )
            .unwrap();

        let mut watcher = Watcher::with_defaults();
        watcher.observe(&mut doc);
        assert!(doc.is_attached(div));

        doc.add_class(div, "paywall");
        watcher.pump(&mut doc);
        assert!(!doc.is_attached(div));
    }

    #[test]
    fn test_load_event_catches_unobservable_mutations() {
        let mut doc = interactive_doc();
        let body = doc.body();
        let mut watcher = Watcher::with_defaults();
        watcher.observe(&mut doc);

        // Identity only; survives the injection sweep.
        let creeper = doc
            .append(body, Element::new("div").class("paywall-curtain"))
            .unwrap();
        watcher.pump(&mut doc);
        assert!(doc.is_attached(creeper));

        // Growing to cover the viewport emits no attribute record...
        doc.set_rect(creeper, crate::dom::Rect::new(1000.0, 800.0));
        watcher.pump(&mut doc);
        assert!(doc.is_attached(creeper));

        // ...but the load sweep catches it.
        doc.finish_load();
        watcher.pump(&mut doc);
        assert!(!doc.is_attached(creeper));
    }

    #[test]
    fn test_load_fired_before_observe_is_not_rehandled() {
        let mut doc = interactive_doc();
        doc.finish_load();
        let mut watcher = Watcher::with_defaults();
        watcher.observe(&mut doc);
        assert!(watcher.load_handled);
    }

    #[test]
    fn test_stop_disposes_the_subscription() {
        let mut doc = interactive_doc();
        let body = doc.body();
        let mut watcher = Watcher::with_defaults();
        watcher.observe(&mut doc);
        watcher.stop(&mut doc);

        let wall = doc.append(body, overlay()).unwrap();
        watcher.pump(&mut doc);
        assert!(doc.is_attached(wall), "stopped watcher must not act");
    }
}
