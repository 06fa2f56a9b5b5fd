//! Structural DOM snapshots: tag names and element children only.

use crate::contract::DomContract;
use probe_dom::{Document, NodeId};
use serde::{Deserialize, Serialize};

/// `{ tag, children }` with the tag name in upper case, as `Element.tagName` reports it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub tag: String,
    pub children: Vec<SnapshotNode>,
}

impl SnapshotNode {
    /// Number of nodes in this tree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

/// Snapshot the subtree rooted at `node`. Non-element nodes yield an empty tag.
pub fn capture(document: &Document, node: NodeId) -> SnapshotNode {
    SnapshotNode {
        tag: document
            .tag_name(node)
            .map(str::to_ascii_uppercase)
            .unwrap_or_default(),
        children: document
            .element_children(node)
            .into_iter()
            .map(|child| capture(document, child))
            .collect(),
    }
}

/// Snapshot the list container, or `None` when the page has none.
pub fn capture_list(document: &Document, contract: &DomContract) -> Option<SnapshotNode> {
    let list = document.query_selector(document.root(), &contract.list)?;
    Some(capture(document, list))
}
