//! The host-document model: a mutable element tree with computed style,
//! geometry, lifecycle signals, and a mutation subscription.
//!
//! The filter never touches a global singleton; every operation takes a
//! [`Document`] (and usually a [`NodeId`] scope) explicitly, so the engine
//! can be exercised against constructed trees.

pub mod element;
pub mod html;
pub mod mutation;
pub mod style;

pub use element::{Element, ElementData};
pub use mutation::{Attr, MutationFeed, MutationRecord, ObserverOptions};
pub use style::{ComputedStyle, Overflow, Position, Rect, Viewport};

pub use ego_tree::NodeId;

use crossbeam::channel::{Sender, unbounded};
use ego_tree::{NodeMut, Tree};

/// Document parse/load lifecycle, ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

/// A live document: an `html` root with a `body` child, grown by appending
/// element subtrees. Mutating operations emit [`MutationRecord`]s to the
/// active subscription, but only for attached targets - changes inside
/// detached subtrees are unobservable, matching real mutation observers.
#[derive(Debug)]
pub struct Document {
    tree: Tree<ElementData>,
    body: NodeId,
    viewport: Viewport,
    ready_state: ReadyState,
    load_fired: bool,
    subscription: Option<(Sender<MutationRecord>, ObserverOptions)>,
}

impl Document {
    /// A new document in `Loading` state with empty `html` and `body`.
    pub fn new(viewport: Viewport) -> Self {
        let mut tree = Tree::new(ElementData::new("html"));
        let body = tree.root_mut().append(ElementData::new("body")).id();
        Document {
            tree,
            body,
            viewport,
            ready_state: ReadyState::Loading,
            load_fired: false,
            subscription: None,
        }
    }

    /// The `html` element: root of the tree and first of the two root
    /// scroll elements.
    pub fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    /// The `body` element: second root scroll element.
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn load_fired(&self) -> bool {
        self.load_fired
    }

    /// Structural parsing finished (DOMContentLoaded analog).
    pub fn finish_parsing(&mut self) {
        if self.ready_state == ReadyState::Loading {
            self.ready_state = ReadyState::Interactive;
        }
    }

    /// The page's load-completion signal. Fires at most once.
    pub fn finish_load(&mut self) {
        self.ready_state = ReadyState::Complete;
        self.load_fired = true;
    }

    pub fn get(&self, id: NodeId) -> Option<&ElementData> {
        self.tree.get(id).map(|n| n.value())
    }

    /// True if the node exists and is reachable from the `html` root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let Some(node) = self.tree.get(id) else {
            return false;
        };
        let root = self.tree.root().id();
        if node.id() == root {
            return true;
        }
        node.ancestors().last().map(|a| a.id()) == Some(root)
    }

    /// The scope element and all its descendants, in document order.
    pub fn descendants(&self, scope: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.tree
            .get(scope)
            .into_iter()
            .flat_map(|n| n.descendants())
            .map(|n| n.id())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .get(id)
            .map(|n| n.children().map(|c| c.id()).collect())
            .unwrap_or_default()
    }

    /// Own text plus descendant text, space-joined (innerText analog).
    pub fn visible_text(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        if let Some(node) = self.tree.get(id) {
            for n in node.descendants() {
                let text = n.value().text.as_str();
                if !text.is_empty() {
                    parts.push(text);
                }
            }
        }
        parts.join(" ")
    }

    /// Insert an element subtree under `parent`. Emits a single child-list
    /// record naming the subtree root, as mutation observers do. Returns
    /// `None` when `parent` does not exist.
    pub fn append(&mut self, parent: NodeId, element: Element) -> Option<NodeId> {
        let id = {
            let mut parent_node = self.tree.get_mut(parent)?;
            insert_subtree(&mut parent_node, element)
        };
        self.emit(MutationRecord::ChildList {
            target: parent,
            added: vec![id],
            removed: vec![],
        });
        Some(id)
    }

    /// Detach a subtree. Removing the root, a missing node, or an
    /// already-detached node is a no-op, never a fault.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root() {
            return;
        }
        let Some(parent) = self.tree.get(id).and_then(|n| n.parent().map(|p| p.id())) else {
            return;
        };
        if let Some(mut node) = self.tree.get_mut(id) {
            node.detach();
        }
        self.emit(MutationRecord::ChildList {
            target: parent,
            added: vec![],
            removed: vec![id],
        });
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let changed = self
            .with_data(id, |data| {
                if data.classes.iter().any(|c| c == class) {
                    false
                } else {
                    data.classes.push(class.to_string());
                    true
                }
            })
            .unwrap_or(false);
        if changed {
            self.emit_attribute(id, Attr::Class);
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let changed = self
            .with_data(id, |data| {
                let before = data.classes.len();
                data.classes.retain(|c| c != class);
                data.classes.len() != before
            })
            .unwrap_or(false);
        if changed {
            self.emit_attribute(id, Attr::Class);
        }
    }

    pub fn set_classes(&mut self, id: NodeId, classes: &[&str]) {
        if self
            .with_data(id, |data| {
                data.classes = classes.iter().map(|c| c.to_string()).collect();
            })
            .is_some()
        {
            self.emit_attribute(id, Attr::Class);
        }
    }

    pub fn set_aria_label(&mut self, id: NodeId, label: &str) {
        if self
            .with_data(id, |data| data.aria_label = label.to_string())
            .is_some()
        {
            self.emit_attribute(id, Attr::AriaLabel);
        }
    }

    pub fn set_role(&mut self, id: NodeId, role: &str) {
        if self
            .with_data(id, |data| data.role = role.to_string())
            .is_some()
        {
            self.emit_attribute(id, Attr::Role);
        }
    }

    pub fn set_position(&mut self, id: NodeId, position: Position) {
        if self
            .with_data(id, |data| data.style.position = position)
            .is_some()
        {
            self.emit_attribute(id, Attr::Style);
        }
    }

    pub fn set_z_index(&mut self, id: NodeId, z_index: &str) {
        if self
            .with_data(id, |data| data.style.z_index = z_index.to_string())
            .is_some()
        {
            self.emit_attribute(id, Attr::Style);
        }
    }

    /// Stylesheet-level overflow (the shorthand). Does not touch the
    /// important-precedence override.
    pub fn set_overflow(&mut self, id: NodeId, overflow: Overflow) {
        if self
            .with_data(id, |data| data.style.overflow = overflow)
            .is_some()
        {
            self.emit_attribute(id, Attr::Style);
        }
    }

    /// Force overflow on all three properties (shorthand and both axes)
    /// with important precedence, so stylesheet rules cannot win it back.
    pub fn set_overflow_important(&mut self, id: NodeId, overflow: Overflow) {
        if self
            .with_data(id, |data| data.overflow_override = Some(overflow))
            .is_some()
        {
            self.emit_attribute(id, Attr::Style);
        }
    }

    /// Layout geometry. Layout changes carry no attribute mutation, so no
    /// record is emitted - exactly why the watcher also sweeps on load.
    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        self.with_data(id, |data| data.rect = rect);
    }

    /// Subscribe to mutations. Replaces any existing subscription.
    pub fn subscribe(&mut self, options: ObserverOptions) -> MutationFeed {
        let (sender, receiver) = unbounded();
        self.subscription = Some((sender, options));
        MutationFeed { receiver }
    }

    /// Dispose the active subscription; no further records are delivered.
    pub fn unsubscribe(&mut self) {
        self.subscription = None;
    }

    pub(crate) fn with_data<R>(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut ElementData) -> R,
    ) -> Option<R> {
        let mut node = self.tree.get_mut(id)?;
        Some(f(node.value()))
    }

    fn emit_attribute(&mut self, target: NodeId, attr: Attr) {
        self.emit(MutationRecord::Attribute { target, attr });
    }

    fn emit(&self, record: MutationRecord) {
        let target = match &record {
            MutationRecord::ChildList { target, .. } => *target,
            MutationRecord::Attribute { target, .. } => *target,
        };
        if !self.is_attached(target) {
            return;
        }
        if let Some((sender, options)) = &self.subscription {
            if options.wants(&record) {
                // A dropped feed just means nobody is listening anymore.
                let _ = sender.send(record);
            }
        }
    }
}

fn insert_subtree(parent: &mut NodeMut<'_, ElementData>, element: Element) -> NodeId {
    let (data, children) = element.into_parts();
    let mut node = parent.append(data);
    let id = node.id();
    for child in children {
        insert_subtree(&mut node, child);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document::new(Viewport::default())
    }

    #[test]
    fn test_new_document_shape() {
        let doc = doc();
        assert_eq!(doc.get(doc.root()).unwrap().tag, "html");
        assert_eq!(doc.get(doc.body()).unwrap().tag, "body");
        assert_eq!(doc.ready_state(), ReadyState::Loading);
        assert!(doc.is_attached(doc.body()));
    }

    #[test]
    fn test_append_reports_subtree_root_only() {
        let mut doc = doc();
        let feed = doc.subscribe(ObserverOptions::default());
        let body = doc.body();

        let wrapper = doc
            .append(
                body,
                Element::new("div")
                    .class("wrapper")
                    .child(Element::new("p").text("inner")),
            )
            .unwrap();

        let batch = feed.drain();
        assert_eq!(batch.len(), 1);
        match &batch[0] {
            MutationRecord::ChildList { target, added, .. } => {
                assert_eq!(*target, body);
                assert_eq!(added, &vec![wrapper]);
            }
            other => panic!("unexpected record {other:?}"),
        }
        // The child went in even though it was not reported individually.
        assert_eq!(doc.children(wrapper).len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent_and_detaches_subtree() {
        let mut doc = doc();
        let body = doc.body();
        let outer = doc
            .append(body, Element::new("div").child(Element::new("span")))
            .unwrap();
        let inner = doc.children(outer)[0];

        doc.remove(outer);
        assert!(!doc.is_attached(outer));
        assert!(!doc.is_attached(inner));

        // Second removal and root removal are no-ops.
        doc.remove(outer);
        doc.remove(doc.root());
        assert!(doc.is_attached(doc.root()));
    }

    #[test]
    fn test_detached_mutations_are_unobserved() {
        let mut doc = doc();
        let body = doc.body();
        let node = doc.append(body, Element::new("div")).unwrap();
        let feed = doc.subscribe(ObserverOptions::default());

        doc.remove(node);
        assert_eq!(feed.drain().len(), 1); // the removal itself, target = body

        doc.add_class(node, "late");
        assert!(feed.is_empty());
    }

    #[test]
    fn test_attribute_filter() {
        let mut doc = doc();
        let body = doc.body();
        let node = doc.append(body, Element::new("div")).unwrap();
        let feed = doc.subscribe(ObserverOptions {
            child_list: true,
            attribute_filter: vec![Attr::Class],
        });

        doc.set_role(node, "dialog"); // filtered out
        doc.add_class(node, "modal"); // delivered
        doc.set_rect(node, Rect::new(10.0, 10.0)); // geometry, never a record

        let batch = feed.drain();
        assert_eq!(batch.len(), 1);
        assert!(matches!(
            batch[0],
            MutationRecord::Attribute { attr: Attr::Class, .. }
        ));
    }

    #[test]
    fn test_unchanged_class_edits_emit_nothing() {
        let mut doc = doc();
        let body = doc.body();
        let node = doc.append(body, Element::new("div").class("a")).unwrap();
        let feed = doc.subscribe(ObserverOptions::default());

        doc.add_class(node, "a"); // already present
        doc.remove_class(node, "missing");
        assert!(feed.is_empty());
    }

    #[test]
    fn test_visible_text_concatenates_descendants() {
        let mut doc = doc();
        let body = doc.body();
        let node = doc
            .append(
                body,
                Element::new("div")
                    .text("Subscribe")
                    .child(Element::new("p").text("to continue")),
            )
            .unwrap();
        assert_eq!(doc.visible_text(node), "Subscribe to continue");
    }

    #[test]
    fn test_lifecycle() {
        let mut doc = doc();
        doc.finish_parsing();
        assert_eq!(doc.ready_state(), ReadyState::Interactive);
        assert!(!doc.load_fired());
        doc.finish_load();
        assert_eq!(doc.ready_state(), ReadyState::Complete);
        assert!(doc.load_fired());
        // finish_parsing after load must not regress the state
        doc.finish_parsing();
        assert_eq!(doc.ready_state(), ReadyState::Complete);
    }
}
