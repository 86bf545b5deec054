//! Layout nodes and the geometry cached on them.

use slotmap::Key;
use smallvec::SmallVec;

use crate::{hasher::Fingerprint, prelude::*};

/// How a node places its children.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayoutType {
    /// Children keep their declared positions.
    #[default]
    None,
    /// Children are placed left to right.
    Row,
    /// Children are placed top to bottom.
    Column,
    /// Children are placed left to right, wrapping onto a new row when the content width is full.
    Grid,
}

/// Which of a node's rects its children are clipped to.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClipType {
    #[default]
    None,
    /// Clip to the content box.
    Inner,
    /// Clip to the margin box.
    Outer,
}

/// Geometry resolved during layout, in the node's local space.
///
/// `position` is the top-left of the margin box relative to the parent's content origin.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PostLayoutData {
    pub scale: Vector2,
    pub max_scale: Vector2,
    pub margins: Spacing,
    pub paddings: Spacing,
    pub position: Vector2,
    /// Union of the children's margin boxes, relative to this node's content origin.
    pub content_rect: Rect,
}

impl PostLayoutData {
    #[inline]
    pub fn content_width(&self) -> f64 {
        self.scale.x - self.paddings.horizontal()
    }

    #[inline]
    pub fn content_height(&self) -> f64 {
        self.scale.y - self.paddings.vertical()
    }

    /// Size including margins.
    #[inline]
    pub fn outer_size(&self) -> Vector2 {
        self.scale + self.margins.size()
    }

    /// The margin box relative to the parent's content origin.
    #[inline]
    pub fn local_outer_rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.outer_size())
    }

    /// The border box relative to the parent's content origin.
    #[inline]
    pub fn local_rect(&self) -> Rect {
        Rect::from_origin_size(self.position + self.margins.top_left(), self.scale)
    }
}

/// A node's final geometry in window space.
///
/// Returned by [`LayoutTree::layout_data`]. The global position already has the scroll offsets of
/// every ancestor applied.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LayoutData {
    pub(crate) global_position: Vector2,
    pub(crate) scroll: Vector2,
    pub(crate) data: PostLayoutData,
}

impl LayoutData {
    /// The top-left corner of the border box.
    pub fn global_position(&self) -> Vector2 {
        self.global_position
    }

    pub fn global_content_position(&self) -> Vector2 {
        self.global_position + self.data.paddings.top_left()
    }

    /// The border box.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.global_position, self.data.scale)
    }

    /// The content box, where children are placed.
    pub fn inner_rect(&self) -> Rect {
        self.rect().shrink(self.data.paddings)
    }

    /// The margin box.
    pub fn outer_rect(&self) -> Rect {
        self.rect().expand(self.data.margins)
    }

    /// The union of the children's margin boxes, with this node's scroll applied.
    pub fn content_rect(&self) -> Rect {
        self.data.content_rect.translate(self.global_content_position() - self.scroll)
    }

    pub fn scale(&self) -> Vector2 {
        self.data.scale
    }

    pub fn max_scale(&self) -> Vector2 {
        self.data.max_scale
    }

    pub fn margins(&self) -> Spacing {
        self.data.margins
    }

    pub fn paddings(&self) -> Spacing {
        self.data.paddings
    }

    /// The local position relative to the parent's content origin.
    pub fn position(&self) -> Vector2 {
        self.data.position
    }

    pub fn post_layout(&self) -> &PostLayoutData {
        &self.data
    }
}

/// One element of the layout tree.
///
/// Holds the declared layout rules and the geometry they resolved to. Nodes live in a
/// [`LayoutTree`] and refer to their parent, children, and reference nodes by [`NodeKey`].
#[derive(Debug, Clone)]
pub struct LayoutNode {
    id: NodeId,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: SmallVec<[NodeKey; 8]>,
    pub(crate) data: PostLayoutData,

    /// The last frame this node was declared in.
    pub(crate) frame: u64,

    pub(crate) x: Offset,
    pub(crate) y: Offset,
    pub(crate) width: Size,
    pub(crate) height: Size,
    pub(crate) max_width: Size,
    pub(crate) max_height: Size,
    pub(crate) margin_left: Offset,
    pub(crate) margin_right: Offset,
    pub(crate) margin_top: Offset,
    pub(crate) margin_bottom: Offset,
    pub(crate) padding_left: Offset,
    pub(crate) padding_right: Offset,
    pub(crate) padding_top: Offset,
    pub(crate) padding_bottom: Offset,

    pub(crate) ignore: bool,
    pub(crate) fit_content_x: bool,
    pub(crate) fit_content_y: bool,
    pub(crate) center_content: bool,
    pub(crate) can_scale_children: bool,

    pub(crate) layout: LayoutType,
    pub(crate) clip: ClipType,
    pub(crate) z_index: i32,
    pub(crate) h_scroll: f64,
    pub(crate) v_scroll: f64,

    pub(crate) position_relative_to: Option<NodeKey>,
    pub(crate) size_relative_to: Option<NodeKey>,
}

impl LayoutNode {
    pub(crate) fn new(id: NodeId, parent: Option<NodeKey>, z_index: i32) -> Self {
        Self {
            id,
            parent,
            children: SmallVec::new(),
            data: PostLayoutData::default(),
            frame: 0,
            x: Offset::default(),
            y: Offset::default(),
            width: Size::default(),
            height: Size::default(),
            max_width: Size::Max,
            max_height: Size::Max,
            margin_left: Offset::default(),
            margin_right: Offset::default(),
            margin_top: Offset::default(),
            margin_bottom: Offset::default(),
            padding_left: Offset::default(),
            padding_right: Offset::default(),
            padding_top: Offset::default(),
            padding_bottom: Offset::default(),
            ignore: false,
            fit_content_x: false,
            fit_content_y: false,
            center_content: false,
            can_scale_children: false,
            layout: LayoutType::None,
            clip: ClipType::None,
            z_index,
            h_scroll: 0.0,
            v_scroll: 0.0,
            position_relative_to: None,
            size_relative_to: None,
        }
    }

    /// Resets every declared property for a new frame. Cached geometry is kept.
    pub(crate) fn reset_declarations(&mut self, z_index: i32) {
        let data = self.data;
        let frame = self.frame;
        *self = Self::new(self.id, self.parent, z_index);
        self.data = data;
        self.frame = frame;
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// The cached local geometry from the last layout pass.
    pub fn post_layout(&self) -> &PostLayoutData {
        &self.data
    }

    pub fn layout_type(&self) -> LayoutType {
        self.layout
    }

    pub fn clip_type(&self) -> ClipType {
        self.clip
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn is_ignored(&self) -> bool {
        self.ignore
    }

    pub fn scroll(&self) -> Vector2 {
        Vector2::new(self.h_scroll, self.v_scroll)
    }

    pub fn width(&self) -> Size {
        self.width
    }

    pub fn height(&self) -> Size {
        self.height
    }

    // ---------- Setters ----------

    pub fn set_width(&mut self, width: impl Into<Size>) -> &mut Self {
        self.width = width.into();
        self
    }

    pub fn set_height(&mut self, height: impl Into<Size>) -> &mut Self {
        self.height = height.into();
        self
    }

    pub fn set_max_width(&mut self, max_width: impl Into<Size>) -> &mut Self {
        self.max_width = max_width.into();
        self
    }

    pub fn set_max_height(&mut self, max_height: impl Into<Size>) -> &mut Self {
        self.max_height = max_height.into();
        self
    }

    pub fn set_x(&mut self, x: impl Into<Offset>) -> &mut Self {
        self.x = x.into();
        self
    }

    pub fn set_y(&mut self, y: impl Into<Offset>) -> &mut Self {
        self.y = y.into();
        self
    }

    pub fn set_margin_left(&mut self, value: impl Into<Offset>) -> &mut Self {
        self.margin_left = value.into();
        self
    }

    pub fn set_margin_right(&mut self, value: impl Into<Offset>) -> &mut Self {
        self.margin_right = value.into();
        self
    }

    pub fn set_margin_top(&mut self, value: impl Into<Offset>) -> &mut Self {
        self.margin_top = value.into();
        self
    }

    pub fn set_margin_bottom(&mut self, value: impl Into<Offset>) -> &mut Self {
        self.margin_bottom = value.into();
        self
    }

    /// Sets all four margins.
    pub fn set_margin(&mut self, value: impl Into<Offset>) -> &mut Self {
        let value = value.into();
        self.margin_left = value;
        self.margin_right = value;
        self.margin_top = value;
        self.margin_bottom = value;
        self
    }

    pub fn set_padding_left(&mut self, value: impl Into<Offset>) -> &mut Self {
        self.padding_left = value.into();
        self
    }

    pub fn set_padding_right(&mut self, value: impl Into<Offset>) -> &mut Self {
        self.padding_right = value.into();
        self
    }

    pub fn set_padding_top(&mut self, value: impl Into<Offset>) -> &mut Self {
        self.padding_top = value.into();
        self
    }

    pub fn set_padding_bottom(&mut self, value: impl Into<Offset>) -> &mut Self {
        self.padding_bottom = value.into();
        self
    }

    /// Sets all four paddings.
    pub fn set_padding(&mut self, value: impl Into<Offset>) -> &mut Self {
        let value = value.into();
        self.padding_left = value;
        self.padding_right = value;
        self.padding_top = value;
        self.padding_bottom = value;
        self
    }

    pub fn set_layout(&mut self, layout: LayoutType) -> &mut Self {
        self.layout = layout;
        self
    }

    /// Excludes the node from its parent's placement, content rect, and centering.
    /// The node is still laid out itself, which is useful for floating overlays.
    pub fn set_ignore(&mut self, ignore: bool) -> &mut Self {
        self.ignore = ignore;
        self
    }

    pub fn set_fit_content_x(&mut self, fit: bool) -> &mut Self {
        self.fit_content_x = fit;
        self
    }

    pub fn set_fit_content_y(&mut self, fit: bool) -> &mut Self {
        self.fit_content_y = fit;
        self
    }

    pub fn set_center_content(&mut self, center: bool) -> &mut Self {
        self.center_content = center;
        self
    }

    /// Lets a row or column distribute its content extent across its children.
    pub fn set_can_scale_children(&mut self, scale: bool) -> &mut Self {
        self.can_scale_children = scale;
        self
    }

    pub fn set_clip(&mut self, clip: ClipType) -> &mut Self {
        self.clip = clip;
        self
    }

    pub fn set_z_index(&mut self, z_index: i32) -> &mut Self {
        self.z_index = z_index;
        self
    }

    /// Scroll offsets are subtracted from the global position of this node's children.
    pub fn set_scroll(&mut self, horizontal: f64, vertical: f64) -> &mut Self {
        self.h_scroll = horizontal;
        self.v_scroll = vertical;
        self
    }

    /// The node whose content extent percentages of width and height refer to. Defaults to the parent.
    pub fn set_size_relative_to(&mut self, node: Option<NodeKey>) -> &mut Self {
        self.size_relative_to = node;
        self
    }

    /// The node whose content extent percentages of x and y refer to. Defaults to the parent.
    pub fn set_position_relative_to(&mut self, node: Option<NodeKey>) -> &mut Self {
        self.position_relative_to = node;
        self
    }

    /// A fingerprint of everything that affects this node's layout.
    ///
    /// Equal fingerprints across frames mean the cached layout can be reused.
    pub fn hash64(&self) -> u64 {
        let mut hash = Fingerprint::default();
        hash.add(self.id.get());
        hash.add(self.x.hash64());
        hash.add(self.y.hash64());
        hash.add(self.width.hash64());
        hash.add(self.height.hash64());
        hash.add(self.max_width.hash64());
        hash.add(self.max_height.hash64());
        hash.add(self.margin_left.hash64());
        hash.add(self.margin_right.hash64());
        hash.add(self.margin_top.hash64());
        hash.add(self.margin_bottom.hash64());
        hash.add(self.padding_left.hash64());
        hash.add(self.padding_right.hash64());
        hash.add(self.padding_top.hash64());
        hash.add(self.padding_bottom.hash64());
        hash.add_bool(self.ignore);
        hash.add_bool(self.fit_content_x);
        hash.add_bool(self.fit_content_y);
        hash.add_bool(self.center_content);
        hash.add_bool(self.can_scale_children);
        hash.add(self.layout as u64);
        hash.add(self.clip as u64);
        hash.add(self.z_index as u64);
        hash.add_f64(self.v_scroll);
        hash.add_f64(self.h_scroll);
        hash.add(self.size_relative_to.map_or(0, |k| k.data().as_ffi()));
        hash.add(self.position_relative_to.map_or(0, |k| k.data().as_ffi()));
        hash.add(self.children.len() as u64);
        hash.finish()
    }
}
