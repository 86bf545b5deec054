//! The immediate-mode session that drives a [`LayoutTree`] frame by frame.
//!
//! Every frame the whole UI is declared again:
//!
//! ```
//! use rosin_layout::prelude::*;
//!
//! let mut gui = Gui::new();
//! gui.begin_frame((800.0, 600.0));
//! gui.node("toolbar").width(Size::FULL).height(40.0).layout(LayoutType::Row).enter(|gui| {
//!     gui.node("open").width(80.0).height(Size::FULL);
//!     gui.node("save").width(80.0).height(Size::FULL);
//! });
//! let stats = gui.end_frame().unwrap();
//! assert_eq!(stats.nodes, 4);
//! ```
//!
//! Nodes are matched to last frame's nodes by identity, so cached geometry and per-node storage
//! carry over. Nodes that aren't declared again are dropped at the end of the frame.

use std::{collections::HashMap, panic::Location};

use smallvec::{SmallVec, smallvec};

use crate::{hasher::IdentityBuildHasher, prelude::*};

/// Session settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuiOptions {
    /// Skip the layout pass when the declared tree has the same fingerprint as last frame.
    pub reuse_layout: bool,
    /// Drop the storage of nodes that were not declared this frame.
    pub sweep_storage: bool,
}

impl Default for GuiOptions {
    fn default() -> Self {
        Self {
            reuse_layout: true,
            sweep_storage: false,
        }
    }
}

/// What [`Gui::end_frame`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    /// Live nodes, including the root.
    pub nodes: usize,
    /// Nodes that had no match in the previous frame.
    pub created: usize,
    /// Nodes from the previous frame that were not declared again.
    pub dropped: usize,
    /// `true` if the layout pass was skipped and last frame's geometry kept.
    pub reused: bool,
    pub fingerprint: u64,
}

/// One node's final geometry, ready to be painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub id: NodeId,
    pub key: NodeKey,
    pub z_index: i32,
    pub rect: Rect,
    pub inner_rect: Rect,
    /// The rect to clip to, if any ancestor clips.
    pub clip: Option<Rect>,
}

#[derive(Debug)]
pub struct Gui {
    tree: LayoutTree,
    root: NodeKey,
    root_id: NodeId,
    lookup: HashMap<NodeId, NodeKey, IdentityBuildHasher>,

    // The top entry of `id_stack` is the scope new identities are derived in.
    id_stack: SmallVec<[u64; 16]>,
    node_stack: SmallVec<[NodeKey; 16]>,
    // `pop_id` won't pop below this depth.
    id_floor: usize,

    storage: Storage,
    options: GuiOptions,
    frame: u64,
    in_frame: bool,
    created: usize,
    last_fingerprint: Option<u64>,
}

impl Default for Gui {
    fn default() -> Self {
        Self::new()
    }
}

impl Gui {
    pub fn new() -> Self {
        Self::with_root_key("root")
    }

    /// Creates a session whose root node is named `key`.
    ///
    /// The root's identity is the scope of every node declared in the session, so two sessions with
    /// different root keys never share identities.
    pub fn with_root_key(key: impl IdKey) -> Self {
        let root_id = NodeId::derive(0, key.key_hash());
        let mut tree = LayoutTree::new();
        let root = tree.insert_root(root_id);

        let mut lookup = HashMap::default();
        lookup.insert(root_id, root);

        Self {
            tree,
            root,
            root_id,
            lookup,
            id_stack: smallvec![root_id.get()],
            node_stack: smallvec![root],
            id_floor: 1,
            storage: Storage::new(),
            options: GuiOptions::default(),
            frame: 0,
            in_frame: false,
            created: 0,
            last_fingerprint: None,
        }
    }

    pub fn with_options(mut self, options: GuiOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> GuiOptions {
        self.options
    }

    pub fn tree(&self) -> &LayoutTree {
        &self.tree
    }

    pub fn root(&self) -> NodeKey {
        self.root
    }

    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// The number of the current frame, or of the last one if no frame is in progress.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    /// Looks up a live node by identity.
    pub fn find(&self, id: NodeId) -> Option<NodeKey> {
        self.lookup.get(&id).copied().filter(|key| self.tree.contains(*key))
    }

    /// The node children are currently being declared in.
    pub fn current_node(&self) -> NodeKey {
        self.node_stack.last().copied().unwrap_or(self.root)
    }

    /// The scope that identities declared right now are derived in.
    pub fn current_scope(&self) -> u64 {
        self.id_stack.last().copied().unwrap_or(self.root_id.get())
    }

    /// Starts declaring a new frame. The root node takes the size of `viewport`.
    #[track_caller]
    pub fn begin_frame(&mut self, viewport: impl Into<Vector2>) {
        if self.in_frame {
            let location = Location::caller();
            log::error!("begin_frame() called while frame {} is still open, discarding it: {location}", self.frame);
        }

        self.frame += 1;
        self.in_frame = true;
        self.created = 0;

        for (_, node) in self.tree.nodes.iter_mut() {
            node.children.clear();
        }

        let viewport = viewport.into();
        if let Some(root) = self.tree.get_mut(self.root) {
            root.reset_declarations(0);
            root.frame = self.frame;
            root.set_width(Size::Pixels(viewport.x)).set_height(Size::Pixels(viewport.y));
        }

        self.id_stack.truncate(1);
        self.node_stack.truncate(1);
        self.id_floor = 1;
    }

    /// Declares a node named `key` inside the current node.
    ///
    /// If a node with the same identity existed last frame, it's reused: its declarations are reset
    /// to defaults, but its last geometry and its storage are kept.
    #[track_caller]
    pub fn node(&mut self, key: impl IdKey) -> NodeBuilder<'_> {
        if !self.in_frame {
            let location = Location::caller();
            log::error!("node() must be called between begin_frame() and end_frame(): {location}");
        }

        let parent = self.current_node();
        let id = NodeId::derive(self.current_scope(), key.key_hash());
        let z_index = self.tree.get(parent).map_or(0, |p| p.z_index);

        let key = match self.find(id) {
            Some(existing) if self.tree.get(existing).is_some_and(|n| n.frame != self.frame) => {
                if let Some(node) = self.tree.get_mut(existing) {
                    node.reset_declarations(z_index);
                    node.frame = self.frame;
                }
                self.tree.attach(parent, existing);
                existing
            }
            Some(_) => {
                let location = Location::caller();
                // The copies share storage.
                log::warn!("Node {id} declared more than once in frame {}, use push_id() to tell them apart: {location}", self.frame);
                self.create_node(parent, id, z_index)
            }
            None => {
                let key = self.create_node(parent, id, z_index);
                self.lookup.insert(id, key);
                key
            }
        };

        NodeBuilder { gui: self, key }
    }

    fn create_node(&mut self, parent: NodeKey, id: NodeId, z_index: i32) -> NodeKey {
        let mut node = LayoutNode::new(id, None, z_index);
        node.frame = self.frame;
        let key = self.tree.nodes.insert(node);

        let parent = if self.tree.contains(parent) { parent } else { self.root };
        self.tree.attach(parent, key);
        self.created += 1;
        key
    }

    /// Mixes `id` into the identity scope until the matching [`Gui::pop_id`].
    pub fn push_id(&mut self, id: impl Into<u64>) {
        let scope = crate::nodeid::__mix(self.current_scope(), id.into());
        self.id_stack.push(scope);
    }

    #[track_caller]
    pub fn pop_id(&mut self) {
        if self.id_stack.len() <= self.id_floor {
            let location = Location::caller();
            log::error!("pop_id() has no matching push_id() in this scope: {location}");
            return;
        }
        self.id_stack.pop();
    }

    #[track_caller]
    fn enter_node<R>(&mut self, key: NodeKey, f: impl FnOnce(&mut Gui) -> R) -> R {
        let id = self.tree.get(key).map_or(self.root_id, |n| n.id());
        let id_depth = self.id_stack.len();
        let node_depth = self.node_stack.len();
        let floor = self.id_floor;

        self.id_stack.push(id.get());
        self.node_stack.push(key);
        self.id_floor = id_depth + 1;

        let result = f(self);

        if self.id_stack.len() != id_depth + 1 {
            let location = Location::caller();
            log::error!("push_id() and pop_id() are unbalanced inside node {id}: {location}");
        }

        self.id_stack.truncate(id_depth);
        self.node_stack.truncate(node_depth);
        self.id_floor = floor;
        result
    }

    /// Finishes the frame: drops undeclared nodes and runs layout if anything changed.
    ///
    /// Layout still runs when the identity stack is unbalanced; the error is reported afterwards.
    pub fn end_frame(&mut self) -> Result<FrameStats, LayoutError> {
        if !self.in_frame {
            return Err(LayoutError::FrameNotStarted);
        }
        self.in_frame = false;

        let dropped = self.tree.sweep(self.frame);
        let tree = &self.tree;
        self.lookup.retain(|_, key| tree.contains(*key));

        if self.options.sweep_storage {
            let lookup = &self.lookup;
            let purged = self.storage.retain_nodes(|id| lookup.contains_key(&id));
            if purged > 0 {
                log::debug!("Frame {}: dropped storage of {purged} node(s)", self.frame);
            }
        }

        // Only declarations are fingerprinted, never layout results.
        let fingerprint = self.tree.subtree_hash64(self.root);
        let reused = self.options.reuse_layout && self.created == 0 && self.last_fingerprint == Some(fingerprint);
        if !reused {
            self.tree.layout(self.root);
        }
        self.last_fingerprint = Some(fingerprint);

        let stats = FrameStats {
            frame: self.frame,
            nodes: self.tree.len(),
            created: self.created,
            dropped,
            reused,
            fingerprint,
        };
        log::trace!("{stats:?}");

        let depth = self.id_stack.len().saturating_sub(1);
        self.id_stack.truncate(1);
        self.node_stack.truncate(1);
        self.id_floor = 1;

        if depth != 0 {
            return Err(LayoutError::UnbalancedIdStack { depth });
        }
        Ok(stats)
    }

    /// The node's geometry in window space.
    pub fn layout_data(&self, key: NodeKey) -> Option<LayoutData> {
        self.tree.layout_data(key)
    }

    /// The geometry a node had at the end of the last frame it was laid out in.
    ///
    /// Can be read while the node is being declared, for example to size a popup to its content.
    pub fn previous_layout(&self, key: NodeKey) -> Option<PostLayoutData> {
        self.tree.get(key).map(|n| *n.post_layout())
    }

    /// Every node in paint order with the rects a renderer needs.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        self.tree
            .paint_order(self.root)
            .into_iter()
            .filter_map(|key| {
                let node = self.tree.get(key)?;
                let data = self.tree.layout_data(key)?;
                Some(DrawItem {
                    id: node.id(),
                    key,
                    z_index: node.z_index(),
                    rect: data.rect(),
                    inner_rect: data.inner_rect(),
                    clip: self.tree.clip_rect(key),
                })
            })
            .collect()
    }

    // ---------- Storage ----------

    /// Reads a value stored for `node`. Returns `default` for unknown nodes.
    pub fn get_storage<T: Storable>(&self, node: NodeKey, key: &str, default: T) -> T {
        match self.tree.get(node) {
            Some(node) => self.storage.get(node.id(), key, default),
            None => default,
        }
    }

    pub fn set_storage<T: Storable>(&mut self, node: NodeKey, key: &str, value: T) -> Result<(), LayoutError> {
        let id = self.tree.get(node).ok_or(LayoutError::StaleNode(node))?.id();
        self.storage.set(id, key, value);
        Ok(())
    }

    /// Reads a value stored for the node children are currently being declared in.
    pub fn get_node_storage<T: Storable>(&self, key: &str, default: T) -> T {
        self.get_storage(self.current_node(), key, default)
    }

    pub fn set_node_storage<T: Storable>(&mut self, key: &str, value: T) {
        let id = self.tree.get(self.current_node()).map_or(self.root_id, |n| n.id());
        self.storage.set(id, key, value);
    }

    /// Reads a value stored for the whole session.
    pub fn get_global_storage<T: Storable>(&self, key: &str, default: T) -> T {
        self.storage.get(self.root_id, key, default)
    }

    pub fn set_global_storage<T: Storable>(&mut self, key: &str, value: T) {
        self.storage.set(self.root_id, key, value);
    }
}

/// Declares the layout rules of one node.
///
/// Returned by [`Gui::node`]. The node already exists when the builder is created, so dropping the
/// builder declares a leaf. Use [`NodeBuilder::enter`] to declare children.
pub struct NodeBuilder<'a> {
    gui: &'a mut Gui,
    key: NodeKey,
}

macro_rules! forward_setters {
    ($($(#[$meta:meta])* $name:ident => $setter:ident($arg:ident: $ty:ty);)*) => {
        $(
            $(#[$meta])*
            pub fn $name(mut self, $arg: $ty) -> Self {
                if let Some(node) = self.node_mut() {
                    node.$setter($arg);
                }
                self
            }
        )*
    };
}

impl<'a> NodeBuilder<'a> {
    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn id(&self) -> Option<NodeId> {
        self.gui.tree.get(self.key).map(|n| n.id())
    }

    /// The geometry this node had last frame. Default for new nodes.
    pub fn previous_layout(&self) -> PostLayoutData {
        self.gui.previous_layout(self.key).unwrap_or_default()
    }

    fn node_mut(&mut self) -> Option<&mut LayoutNode> {
        self.gui.tree.get_mut(self.key)
    }

    forward_setters! {
        width => set_width(width: impl Into<Size>);
        height => set_height(height: impl Into<Size>);
        max_width => set_max_width(max_width: impl Into<Size>);
        max_height => set_max_height(max_height: impl Into<Size>);
        x => set_x(x: impl Into<Offset>);
        y => set_y(y: impl Into<Offset>);
        margin_left => set_margin_left(value: impl Into<Offset>);
        margin_right => set_margin_right(value: impl Into<Offset>);
        margin_top => set_margin_top(value: impl Into<Offset>);
        margin_bottom => set_margin_bottom(value: impl Into<Offset>);
        /// Sets all four margins.
        margin => set_margin(value: impl Into<Offset>);
        padding_left => set_padding_left(value: impl Into<Offset>);
        padding_right => set_padding_right(value: impl Into<Offset>);
        padding_top => set_padding_top(value: impl Into<Offset>);
        padding_bottom => set_padding_bottom(value: impl Into<Offset>);
        /// Sets all four paddings.
        padding => set_padding(value: impl Into<Offset>);
        layout => set_layout(layout: LayoutType);
        ignore => set_ignore(ignore: bool);
        fit_content_x => set_fit_content_x(fit: bool);
        fit_content_y => set_fit_content_y(fit: bool);
        center_content => set_center_content(center: bool);
        can_scale_children => set_can_scale_children(scale: bool);
        clip => set_clip(clip: ClipType);
        z_index => set_z_index(z_index: i32);
        size_relative_to => set_size_relative_to(node: Option<NodeKey>);
        position_relative_to => set_position_relative_to(node: Option<NodeKey>);
    }

    /// Sets both fit-content flags.
    pub fn fit_content(self, fit: bool) -> Self {
        self.fit_content_x(fit).fit_content_y(fit)
    }

    pub fn scroll(mut self, horizontal: f64, vertical: f64) -> Self {
        if let Some(node) = self.node_mut() {
            node.set_scroll(horizontal, vertical);
        }
        self
    }

    /// Ends the declaration and returns the node's handle.
    pub fn finish(self) -> NodeKey {
        self.key
    }

    /// Declares this node's children. Returns what `f` returns.
    #[track_caller]
    pub fn enter<R>(self, f: impl FnOnce(&mut Gui) -> R) -> R {
        self.gui.enter_node(self.key, f)
    }
}
