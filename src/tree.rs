//! The arena that owns every layout node.

use bumpalo::Bump;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::{hasher::Fingerprint, layout, prelude::*};

slotmap::new_key_type! {
    /// A weak, generational handle to a node in a [`LayoutTree`].
    ///
    /// Handles to removed nodes are detected rather than reused, so they are safe to keep around
    /// as "relative to" references.
    pub struct NodeKey;
}

/// A tree of [`LayoutNode`]s stored in an arena.
///
/// Parent, child, and reference links are [`NodeKey`]s, so nodes can point at any other node
/// without ownership cycles.
#[derive(Default)]
pub struct LayoutTree {
    pub(crate) nodes: SlotMap<NodeKey, LayoutNode>,

    /// Scratch space for child lists during a layout pass
    temp: Bump,
}

impl std::fmt::Debug for LayoutTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutTree").field("nodes", &self.nodes).finish_non_exhaustive()
    }
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub fn get(&self, key: NodeKey) -> Option<&LayoutNode> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut LayoutNode> {
        self.nodes.get_mut(key)
    }

    /// Adds a node with no parent.
    pub fn insert_root(&mut self, id: NodeId) -> NodeKey {
        self.nodes.insert(LayoutNode::new(id, None, 0))
    }

    /// Adds a node as the last child of `parent`. The new node inherits the parent's z-index.
    pub fn insert(&mut self, parent: NodeKey, id: NodeId) -> Result<NodeKey, LayoutError> {
        let z_index = self.nodes.get(parent).ok_or(LayoutError::StaleNode(parent))?.z_index;
        let key = self.nodes.insert(LayoutNode::new(id, Some(parent), z_index));
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.push(key);
        }
        Ok(key)
    }

    /// Moves `key` to the end of `new_parent`'s children.
    pub fn reparent(&mut self, key: NodeKey, new_parent: NodeKey) -> Result<(), LayoutError> {
        if !self.nodes.contains_key(key) {
            return Err(LayoutError::StaleNode(key));
        }
        if !self.nodes.contains_key(new_parent) {
            return Err(LayoutError::StaleNode(new_parent));
        }
        if self.is_ancestor_or_self(key, new_parent) {
            return Err(LayoutError::WouldCycle { node: key, parent: new_parent });
        }

        self.detach(key);
        self.attach(new_parent, key);
        Ok(())
    }

    /// Removes a node and its whole subtree. Returns the removed node.
    pub fn remove(&mut self, key: NodeKey) -> Option<LayoutNode> {
        self.detach(key);

        let mut stack = vec![key];
        let mut removed = None;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children.iter().copied());
                if current == key {
                    removed = Some(node);
                }
            }
        }
        removed
    }

    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key)?.parent
    }

    /// The children of a node in insertion order. Empty for unknown keys.
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map_or(&[], |node| node.children.as_slice())
    }

    /// Every node of the subtree in pre-order, starting with `root`.
    pub fn descendants(&self, root: NodeKey) -> Vec<NodeKey> {
        let mut output = Vec::new();
        if !self.nodes.contains_key(root) {
            return output;
        }

        let mut stack = vec![root];
        while let Some(key) = stack.pop() {
            output.push(key);
            stack.extend(self.children(key).iter().rev().copied());
        }
        output
    }

    /// Resolves cached geometry and then runs the layout pass on the subtree at `root`.
    pub fn layout(&mut self, root: NodeKey) {
        self.update_cache(root);
        self.process_layout(root);
    }

    /// Resolves every declared size, margin, padding, and position in the subtree, top down.
    pub fn update_cache(&mut self, root: NodeKey) {
        layout::update_cache(&mut self.nodes, root, &self.temp);
        self.temp.reset();
    }

    /// Scales, places, centers, and fits the subtree at `root`. Requires [`LayoutTree::update_cache`] first.
    pub fn process_layout(&mut self, root: NodeKey) {
        layout::process_layout(&mut self.nodes, root, &self.temp);
        self.temp.reset();
    }

    /// Folds every node fingerprint in the subtree, in pre-order.
    pub fn subtree_hash64(&self, root: NodeKey) -> u64 {
        let mut hash = Fingerprint::default();
        for key in self.descendants(root) {
            if let Some(node) = self.nodes.get(key) {
                hash.add(node.hash64());
            }
        }
        hash.finish()
    }

    /// The top-left of the node's border box in window space.
    ///
    /// Defined recursively as the parent's global content position plus the local position plus the
    /// top-left margin, minus the parent's scroll unless the node is ignored.
    pub fn global_position(&self, key: NodeKey) -> Option<Vector2> {
        let mut position = Vector2::ZERO;
        let mut current = key;
        loop {
            let node = self.nodes.get(current)?;
            match node.parent.and_then(|p| self.nodes.get(p).map(|parent| (p, parent))) {
                Some((parent_key, parent)) => {
                    position += node.data.position + node.data.margins.top_left() + parent.data.paddings.top_left();
                    if !node.ignore {
                        position -= parent.scroll();
                    }
                    current = parent_key;
                }
                None => {
                    position += node.data.position;
                    return Some(position);
                }
            }
        }
    }

    /// The node's geometry in window space, or `None` for unknown keys.
    ///
    /// Only meaningful after a layout pass has run this frame.
    pub fn layout_data(&self, key: NodeKey) -> Option<LayoutData> {
        let node = self.nodes.get(key)?;
        Some(LayoutData {
            global_position: self.global_position(key)?,
            scroll: node.scroll(),
            data: node.data,
        })
    }

    /// The rectangle the node has to be clipped to, from the clip settings of its ancestors.
    ///
    /// Returns `None` when no ancestor clips.
    pub fn clip_rect(&self, key: NodeKey) -> Option<Rect> {
        let mut clip: Option<Rect> = None;
        let mut current = self.parent(key);
        while let Some(ancestor) = current {
            let node = self.nodes.get(ancestor)?;
            let rect = match node.clip {
                ClipType::None => None,
                ClipType::Inner => self.layout_data(ancestor).map(|d| d.inner_rect()),
                ClipType::Outer => self.layout_data(ancestor).map(|d| d.outer_rect()),
            };
            if let Some(rect) = rect {
                clip = Some(match clip {
                    Some(c) => c.intersect(&rect),
                    None => rect,
                });
            }
            current = node.parent;
        }
        clip
    }

    /// The subtree in paint order: tree order, stably sorted by z-index.
    pub fn paint_order(&self, root: NodeKey) -> Vec<NodeKey> {
        let mut order = self.descendants(root);
        order.sort_by_key(|key| self.nodes.get(*key).map_or(0, |n| n.z_index));
        order
    }

    /// Removes every node not declared in `frame`. Returns how many were removed.
    pub(crate) fn sweep(&mut self, frame: u64) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|_, node| node.frame == frame);

        // Survivors may still list swept children or point at a swept parent.
        let fixes: Vec<(NodeKey, bool, SmallVec<[NodeKey; 8]>)> = self
            .nodes
            .iter()
            .filter_map(|(key, node)| {
                let stale_parent = node.parent.is_some_and(|p| !self.nodes.contains_key(p));
                let children: SmallVec<[NodeKey; 8]> = node.children.iter().copied().filter(|c| self.nodes.contains_key(*c)).collect();
                (stale_parent || children.len() != node.children.len()).then_some((key, stale_parent, children))
            })
            .collect();

        for (key, stale_parent, children) in fixes {
            let node = &mut self.nodes[key];
            if stale_parent {
                node.parent = None;
            }
            node.children = children;
        }

        before - self.nodes.len()
    }

    pub(crate) fn attach(&mut self, parent: NodeKey, child: NodeKey) {
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.push(child);
        }
    }

    fn detach(&mut self, key: NodeKey) {
        let Some(parent) = self.nodes.get_mut(key).and_then(|node| node.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.retain(|c| *c != key);
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeKey, mut key: NodeKey) -> bool {
        loop {
            if key == ancestor {
                return true;
            }
            match self.parent(key) {
                Some(parent) => key = parent,
                None => return false,
            }
        }
    }
}
