//! Change notification: immutable mutation records delivered over a channel
//! to the watcher's single-threaded processing loop.

use crossbeam::channel::Receiver;
use ego_tree::NodeId;

/// Observable attributes. Geometry changes have no attribute and are not
/// observable; the load-event sweep exists to catch those.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    Class,
    Style,
    AriaLabel,
    Role,
}

impl Attr {
    pub fn name(self) -> &'static str {
        match self {
            Attr::Class => "class",
            Attr::Style => "style",
            Attr::AriaLabel => "aria-label",
            Attr::Role => "role",
        }
    }
}

/// One observed change to the document.
#[derive(Debug, Clone)]
pub enum MutationRecord {
    /// Children added to or removed from `target`. `added` names subtree
    /// roots only, not every descendant.
    ChildList {
        target: NodeId,
        added: Vec<NodeId>,
        removed: Vec<NodeId>,
    },
    Attribute {
        target: NodeId,
        attr: Attr,
    },
}

/// What a subscription wants to see. Child-list changes are reported for the
/// whole subtree; attribute changes only for attributes in the filter.
#[derive(Debug, Clone)]
pub struct ObserverOptions {
    pub child_list: bool,
    pub attribute_filter: Vec<Attr>,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        ObserverOptions {
            child_list: true,
            attribute_filter: vec![Attr::Class, Attr::Style, Attr::AriaLabel, Attr::Role],
        }
    }
}

impl ObserverOptions {
    pub(crate) fn wants(&self, record: &MutationRecord) -> bool {
        match record {
            MutationRecord::ChildList { .. } => self.child_list,
            MutationRecord::Attribute { attr, .. } => self.attribute_filter.contains(attr),
        }
    }
}

/// Receiving end of a mutation subscription. Records queue up as the
/// document mutates; `drain` returns the batch accumulated since the last
/// call without blocking.
#[derive(Debug)]
pub struct MutationFeed {
    pub(crate) receiver: Receiver<MutationRecord>,
}

impl MutationFeed {
    pub fn drain(&self) -> Vec<MutationRecord> {
        self.receiver.try_iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
