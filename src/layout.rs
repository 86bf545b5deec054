//! # Layout Guide
//!
//! Layout runs in two passes over the tree.
//!
//! `update_cache` walks from the top down and resolves every declared value to pixels:
//!
//! 1. Scale: `width` and `height` are resolved against the content extent of the size reference
//!    (the parent unless `size_relative_to` is set), then clamped to `max-width` and `max-height`.
//! 2. Margins and paddings: resolved against the scale of the size reference.
//! 3. Position: `x` and `y` are resolved against the content extent of the position reference
//!    (the parent unless `position_relative_to` is set).
//!
//! `process_layout` then visits children before finishing their parent:
//!
//! - Scale distribution: a row or column with `can_scale_children` hands out its content extent
//!   left to right. Each child gets an even share of what's left, clamped to its max size, so a
//!   clamped child frees space for the ones after it.
//! - Placement, depending on the layout type:
//!   - `None`: children keep their declared positions.
//!   - `Row` and `Column`: children are stacked by their margin box.
//!   - `Grid`: children are stacked in rows, wrapping when the next child would overflow the
//!     content width. Each row is as tall as its tallest margin box.
//! - Centering: `Row` centers children vertically, `Column` horizontally, `None` on both axes.
//!   `Grid` moves all children together so the centroid of their centers lands on the content center.
//! - Content rect: the union of the children's margin boxes.
//! - Fit content: a node with `fit_content_x` or `fit_content_y` takes the size of its content rect.
//!   This is only known after the children are done, so sizes propagate back up the tree.
//!
//! Ignored nodes are left out of their parent's distribution, placement, centering, and content
//! rect, but are still laid out themselves.
//!
//! Results only ever go into the cached geometry. Declarations are never rewritten, so running the
//! layout again on the same declarations produces the same rectangles.
//!
//! Scroll offsets are not part of the cached geometry. They are applied when the global position
//! of a node is derived, so scrolling does not require a new layout pass.

use bumpalo::{Bump, collections::Vec as BumpVec};
use slotmap::SlotMap;

use crate::prelude::*;

type Nodes = SlotMap<NodeKey, LayoutNode>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    fn pick<T>(self, x: T, y: T) -> T {
        match self {
            Axis::X => x,
            Axis::Y => y,
        }
    }

    #[inline]
    fn content_extent(self, data: &PostLayoutData) -> f64 {
        self.pick(data.content_width(), data.content_height())
    }

    #[inline]
    fn set_scale(self, data: &mut PostLayoutData, value: f64) {
        match self {
            Axis::X => data.scale.x = value,
            Axis::Y => data.scale.y = value,
        }
    }
}

/// The cached data of the node that sizes, margins, and paddings are relative to.
#[inline]
fn size_reference(nodes: &Nodes, node: &LayoutNode) -> Option<PostLayoutData> {
    node.size_relative_to.or(node.parent).and_then(|key| nodes.get(key)).map(|n| n.data)
}

/// The cached data of the node that positions are relative to.
#[inline]
fn position_reference(nodes: &Nodes, node: &LayoutNode) -> Option<PostLayoutData> {
    node.position_relative_to.or(node.parent).and_then(|key| nodes.get(key)).map(|n| n.data)
}

/// Copies a node's child list into the scratch arena so the tree can be mutated while iterating.
fn collect_children<'a>(nodes: &Nodes, key: NodeKey, temp: &'a Bump, include_ignored: bool) -> BumpVec<'a, NodeKey> {
    let mut children = BumpVec::new_in(temp);
    if let Some(node) = nodes.get(key) {
        for &child in &node.children {
            if include_ignored || nodes.get(child).is_some_and(|c| !c.ignore) {
                children.push(child);
            }
        }
    }
    children
}

pub(crate) fn update_cache(nodes: &mut Nodes, key: NodeKey, temp: &Bump) {
    let Some(node) = nodes.get_mut(key) else {
        return;
    };
    node.data = PostLayoutData::default();

    // Scale first
    update_scale_cache(nodes, key);

    // Then margins and paddings, since they can be a percentage of the reference's scale
    let Some(node) = nodes.get(key) else {
        return;
    };
    let reference = size_reference(nodes, node).map_or(Vector2::ZERO, |d| d.scale);
    let margins = Spacing::new(
        node.margin_left.to_pixels(reference.x),
        node.margin_right.to_pixels(reference.x),
        node.margin_top.to_pixels(reference.y),
        node.margin_bottom.to_pixels(reference.y),
    );
    let paddings = Spacing::new(
        node.padding_left.to_pixels(reference.x),
        node.padding_right.to_pixels(reference.x),
        node.padding_top.to_pixels(reference.y),
        node.padding_bottom.to_pixels(reference.y),
    );
    if let Some(node) = nodes.get_mut(key) {
        node.data.margins = margins;
        node.data.paddings = paddings;
    }

    // Then position, which depends on the reference's scale and paddings
    update_position_cache(nodes, key);

    for child in collect_children(nodes, key, temp, true) {
        update_cache(nodes, child, temp);
    }
}

pub(crate) fn update_scale_cache(nodes: &mut Nodes, key: NodeKey) {
    let Some(node) = nodes.get(key) else {
        return;
    };

    let (ref_w, ref_h) = size_reference(nodes, node).map_or((0.0, 0.0), |d| (d.content_width(), d.content_height()));
    let max_scale = Vector2::new(node.max_width.to_pixels(ref_w), node.max_height.to_pixels(ref_h));
    let scale = Vector2::new(
        node.width.to_pixels(ref_w).min(max_scale.x),
        node.height.to_pixels(ref_h).min(max_scale.y),
    );

    if let Some(node) = nodes.get_mut(key) {
        node.data.scale = scale;
        node.data.max_scale = max_scale;
    }
}

pub(crate) fn update_position_cache(nodes: &mut Nodes, key: NodeKey) {
    let Some(node) = nodes.get(key) else {
        return;
    };

    let (ref_w, ref_h) = position_reference(nodes, node).map_or((0.0, 0.0), |d| (d.content_width(), d.content_height()));
    let position = Vector2::new(node.x.to_pixels(ref_w), node.y.to_pixels(ref_h));

    if let Some(node) = nodes.get_mut(key) {
        node.data.position = position;
    }
}

pub(crate) fn process_layout(nodes: &mut Nodes, key: NodeKey, temp: &Bump) {
    if !nodes.contains_key(key) {
        return;
    }

    scale_children(nodes, key, temp, true);
    for child in collect_children(nodes, key, temp, true) {
        process_layout(nodes, child, temp);
    }
    // Distributed sizes win over the children's own fit content
    scale_children(nodes, key, temp, false);
    update_position_cache(nodes, key);

    apply_layout(nodes, key, temp);
    center_content(nodes, key, temp);
    update_content_rect(nodes, key, temp);
    if apply_fit_content(nodes, key) && nodes.get(key).is_some_and(|n| n.center_content) {
        // Centering ran against the unfitted content box
        center_content(nodes, key, temp);
        update_content_rect(nodes, key, temp);
    }
}

/// Re-resolves everything below `key` against its current cached geometry.
fn refresh_descendants(nodes: &mut Nodes, key: NodeKey, temp: &Bump) {
    for child in collect_children(nodes, key, temp, true) {
        update_cache(nodes, child, temp);
    }
}

/// Hands the content extent out along the main axis. With `refresh`, the subtree of every resized
/// child is resolved again so percentages follow the new size.
fn scale_children(nodes: &mut Nodes, key: NodeKey, temp: &Bump, refresh: bool) {
    let Some(node) = nodes.get(key) else {
        return;
    };
    if !node.can_scale_children {
        return;
    }

    let axis = match node.layout {
        LayoutType::Row => Axis::X,
        LayoutType::Column => Axis::Y,
        LayoutType::None | LayoutType::Grid => return,
    };

    let mut remaining = axis.content_extent(&node.data);
    let children = collect_children(nodes, key, temp, false);
    let mut remaining_count = children.len();

    for child in children {
        let Some(node) = nodes.get_mut(child) else {
            continue;
        };

        let max = axis.pick(node.data.max_scale.x, node.data.max_scale.y);
        let share = (remaining / remaining_count as f64).min(max);
        let margin = axis.pick(node.data.margins.horizontal(), node.data.margins.vertical());
        axis.set_scale(&mut node.data, (share - margin).max(0.0).min(max));

        remaining -= share;
        remaining_count -= 1;
        if refresh {
            refresh_descendants(nodes, child, temp);
        }
    }
}

fn apply_layout(nodes: &mut Nodes, key: NodeKey, temp: &Bump) {
    let Some(node) = nodes.get(key) else {
        return;
    };

    let layout = node.layout;
    let content_width = node.data.content_width();
    if layout == LayoutType::None {
        return;
    }

    let mut x = 0.0;
    let mut y = 0.0;
    let mut row_height: f64 = 0.0;

    for child in collect_children(nodes, key, temp, false) {
        let Some(node) = nodes.get_mut(child) else {
            continue;
        };
        let outer = node.data.outer_size();

        match layout {
            LayoutType::Column => {
                node.data.position = Vector2::new(0.0, y);
                y += outer.y;
            }
            LayoutType::Row => {
                node.data.position = Vector2::new(x, 0.0);
                x += outer.x;
            }
            LayoutType::Grid => {
                if x + outer.x > content_width {
                    y += row_height;
                    x = 0.0;
                    row_height = 0.0;
                }

                node.data.position = Vector2::new(x, y);
                x += outer.x;
                row_height = row_height.max(outer.y);
            }
            LayoutType::None => {}
        }
    }
}

fn center_content(nodes: &mut Nodes, key: NodeKey, temp: &Bump) {
    let Some(node) = nodes.get(key) else {
        return;
    };
    if !node.center_content {
        return;
    }

    let layout = node.layout;
    let content = Vector2::new(node.data.content_width(), node.data.content_height());
    let children = collect_children(nodes, key, temp, false);
    if children.is_empty() {
        return;
    }

    let mut grid_offset = Vector2::ZERO;
    if layout == LayoutType::Grid {
        let mut centroid = Vector2::ZERO;
        for &child in children.iter() {
            if let Some(node) = nodes.get(child) {
                centroid += node.data.local_rect().center();
            }
        }
        centroid = centroid / children.len() as f64;
        grid_offset = content / 2.0 - centroid;
    }

    for child in children {
        let Some(node) = nodes.get_mut(child) else {
            continue;
        };
        let free = content - node.data.outer_size();

        let position = &mut node.data.position;
        match layout {
            LayoutType::Column => position.x = free.x / 2.0,
            LayoutType::Row => position.y = free.y / 2.0,
            LayoutType::Grid => *position += grid_offset,
            LayoutType::None => *position = free / 2.0,
        }
    }
}

fn update_content_rect(nodes: &mut Nodes, key: NodeKey, temp: &Bump) {
    let mut bounds: Option<Rect> = None;
    for child in collect_children(nodes, key, temp, false) {
        if let Some(node) = nodes.get(child) {
            let rect = node.data.local_outer_rect();
            bounds = Some(match bounds {
                Some(b) => b.union(&rect),
                None => rect,
            });
        }
    }

    if let Some(node) = nodes.get_mut(key) {
        node.data.content_rect = bounds.unwrap_or_default();
    }
}

/// Returns whether the node was resized.
fn apply_fit_content(nodes: &mut Nodes, key: NodeKey) -> bool {
    let Some(node) = nodes.get_mut(key) else {
        return false;
    };

    let before = node.data.scale;
    let content = node.data.content_rect;
    let data = &mut node.data;
    if node.fit_content_x {
        data.scale.x = content.width.min(data.max_scale.x);
    }
    if node.fit_content_y {
        data.scale.y = content.height.min(data.max_scale.y);
    }
    data.scale != before
}
