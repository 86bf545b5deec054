use std::fmt;

use crate::tree::NodeKey;

/// Errors reported by the layout tree, the frame driver, and storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The handle no longer refers to a live node.
    StaleNode(NodeKey),
    /// Attaching the node would make it its own ancestor.
    WouldCycle { node: NodeKey, parent: NodeKey },
    /// `end_frame` found ids that were pushed but never popped.
    UnbalancedIdStack { depth: usize },
    /// `end_frame` was called without a matching `begin_frame`.
    FrameNotStarted,
    /// A stored value was read back as a different type.
    StorageTypeMismatch { key: String, expected: &'static str, found: &'static str },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleNode(key) => write!(f, "Node {key:?} is not in the tree"),
            Self::WouldCycle { node, parent } => write!(f, "Attaching {node:?} to {parent:?} would create a cycle"),
            Self::UnbalancedIdStack { depth } => write!(f, "Identity stack unbalanced at end of frame: {depth} id(s) never popped"),
            Self::FrameNotStarted => write!(f, "end_frame() called without begin_frame()"),
            Self::StorageTypeMismatch { key, expected, found } => {
                write!(f, "Storage key {key:?} holds a {found}, but was read as {expected}")
            }
        }
    }
}

impl std::error::Error for LayoutError {}
