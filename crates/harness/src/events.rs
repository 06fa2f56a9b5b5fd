//! Input events the harness reacts to.

use probe_dom::NodeId;

/// A pointer crossing a node's boundary (`mouseenter` / `mouseleave`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Enter(NodeId),
    Leave(NodeId),
}

impl PointerEvent {
    pub const fn target(self) -> NodeId {
        match self {
            Self::Enter(node) | Self::Leave(node) => node,
        }
    }
}
