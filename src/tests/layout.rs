use crate::prelude::*;

fn tree_with_root(width: f64, height: f64) -> (LayoutTree, NodeKey) {
    let mut tree = LayoutTree::new();
    let root = tree.insert_root(NodeId::from_raw(1));
    tree.get_mut(root).unwrap().set_width(width).set_height(height);
    (tree, root)
}

fn add(tree: &mut LayoutTree, parent: NodeKey, width: impl Into<Size>, height: impl Into<Size>) -> NodeKey {
    let raw = tree.len() as u64 + 1;
    let key = tree.insert(parent, NodeId::from_raw(raw)).unwrap();
    tree.get_mut(key).unwrap().set_width(width).set_height(height);
    key
}

fn rect(tree: &LayoutTree, key: NodeKey) -> Rect {
    tree.layout_data(key).unwrap().rect()
}

fn scale(tree: &LayoutTree, key: NodeKey) -> Vector2 {
    tree.layout_data(key).unwrap().scale()
}

mod resolution {
    use super::*;

    #[test]
    fn width_is_clamped_to_max() {
        let (mut tree, root) = tree_with_root(300.0, 100.0);
        let fixed = add(&mut tree, root, 500.0, 10.0);
        tree.get_mut(fixed).unwrap().set_max_width(100.0);
        let relative = add(&mut tree, root, 500.0, 10.0);
        tree.get_mut(relative).unwrap().set_max_width(Size::percentage(0.5));

        tree.layout(root);

        assert_eq!(scale(&tree, fixed).x, 100.0);
        assert_eq!(scale(&tree, relative).x, 150.0);
        assert_eq!(tree.layout_data(relative).unwrap().max_scale().x, 150.0);
    }

    #[test]
    fn percentages_use_parent_content_box() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        tree.get_mut(root).unwrap().set_padding(10.0);
        let child = add(&mut tree, root, Size::percentage(0.5), Size::FULL);

        tree.layout(root);

        let data = tree.layout_data(child).unwrap();
        assert_eq!(data.scale(), Vector2::new(90.0, 80.0));
        assert_eq!(data.global_position(), Vector2::new(10.0, 10.0));
    }

    #[test]
    fn size_relative_to_another_node() {
        let (mut tree, root) = tree_with_root(400.0, 400.0);
        let small = add(&mut tree, root, 40.0, 40.0);
        let child = add(&mut tree, small, Size::percentage(0.5), Size::percentage(0.5));
        tree.get_mut(child).unwrap().set_size_relative_to(Some(root));

        tree.layout(root);

        assert_eq!(scale(&tree, child), Vector2::new(200.0, 200.0));
    }

    #[test]
    fn position_relative_to_another_node() {
        let (mut tree, root) = tree_with_root(400.0, 200.0);
        let small = add(&mut tree, root, 40.0, 40.0);
        let child = add(&mut tree, small, 10.0, 10.0);
        tree.get_mut(child).unwrap().set_x(Offset::percentage(0.5)).set_position_relative_to(Some(root));

        tree.layout(root);

        assert_eq!(rect(&tree, child).x, 200.0);
    }

    #[test]
    fn stale_reference_resolves_against_zero() {
        let (mut tree, root) = tree_with_root(400.0, 400.0);
        let gone = add(&mut tree, root, 40.0, 40.0);
        let child = add(&mut tree, root, Size::percentage_offset(0.5, 8.0), 10.0);
        tree.get_mut(child).unwrap().set_size_relative_to(Some(gone));
        tree.remove(gone);

        tree.layout(root);

        assert_eq!(scale(&tree, child).x, 8.0);
    }

    #[test]
    fn margins_use_reference_scale() {
        let (mut tree, root) = tree_with_root(200.0, 100.0);
        let child = add(&mut tree, root, 10.0, 10.0);
        tree.get_mut(child).unwrap().set_margin_left(Offset::percentage(0.1)).set_margin_top(Offset::percentage(0.1));

        tree.layout(root);

        let data = tree.layout_data(child).unwrap();
        assert_eq!(data.margins().left, 20.0);
        assert_eq!(data.margins().top, 10.0);
        assert_eq!(data.outer_rect(), data.rect().expand(data.margins()));
        assert_eq!(data.inner_rect(), data.rect().shrink(data.paddings()));
    }
}

mod placement {
    use super::*;

    #[test]
    fn row_stacks_widths() {
        let (mut tree, root) = tree_with_root(300.0, 100.0);
        tree.get_mut(root).unwrap().set_layout(LayoutType::Row);
        let children: Vec<_> = [10.0, 20.0, 30.0].into_iter().map(|w| add(&mut tree, root, w, 10.0)).collect();

        tree.layout(root);

        let xs: Vec<f64> = children.iter().map(|c| rect(&tree, *c).x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 30.0]);
        assert!(children.iter().all(|c| rect(&tree, *c).y == 0.0));
    }

    #[test]
    fn column_stacks_margin_boxes() {
        let (mut tree, root) = tree_with_root(100.0, 300.0);
        tree.get_mut(root).unwrap().set_layout(LayoutType::Column);
        let a = add(&mut tree, root, 50.0, 10.0);
        let b = add(&mut tree, root, 50.0, 20.0);
        tree.get_mut(a).unwrap().set_margin(5.0);
        tree.get_mut(b).unwrap().set_margin(5.0);

        tree.layout(root);

        assert_eq!(rect(&tree, a), Rect::new(5.0, 5.0, 50.0, 10.0));
        assert_eq!(rect(&tree, b), Rect::new(5.0, 25.0, 50.0, 20.0));
        assert_eq!(tree.get(root).unwrap().post_layout().content_rect, Rect::new(0.0, 0.0, 60.0, 50.0));
    }

    #[test]
    fn grid_wraps_rows() {
        let (mut tree, root) = tree_with_root(100.0, 100.0);
        tree.get_mut(root).unwrap().set_layout(LayoutType::Grid);
        let children: Vec<_> = [10.0, 20.0, 15.0, 10.0, 10.0].into_iter().map(|h| add(&mut tree, root, 30.0, h)).collect();

        tree.layout(root);

        let origins: Vec<Vector2> = children.iter().map(|c| rect(&tree, *c).origin()).collect();
        assert_eq!(
            origins,
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(30.0, 0.0),
                Vector2::new(60.0, 0.0),
                Vector2::new(0.0, 20.0),
                Vector2::new(30.0, 20.0),
            ]
        );
    }

    #[test]
    fn none_keeps_declared_positions() {
        let (mut tree, root) = tree_with_root(100.0, 100.0);
        let child = add(&mut tree, root, 10.0, 10.0);
        tree.get_mut(child).unwrap().set_x(25.0).set_y(Offset::percentage(0.5));

        tree.layout(root);

        assert_eq!(rect(&tree, child).origin(), Vector2::new(25.0, 50.0));
    }

    #[test]
    fn ignored_children_are_skipped() {
        let (mut tree, root) = tree_with_root(300.0, 100.0);
        tree.get_mut(root).unwrap().set_layout(LayoutType::Row);
        let a = add(&mut tree, root, 10.0, 10.0);
        let overlay = add(&mut tree, root, 50.0, 50.0);
        tree.get_mut(overlay).unwrap().set_ignore(true).set_x(100.0);
        let c = add(&mut tree, root, 10.0, 10.0);

        tree.layout(root);

        assert_eq!(rect(&tree, c).x, 10.0);
        assert_eq!(tree.get(root).unwrap().post_layout().content_rect, Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(rect(&tree, overlay), Rect::new(100.0, 0.0, 50.0, 50.0));
        assert_eq!(rect(&tree, a).x, 0.0);
    }

    #[test]
    fn empty_content_rect() {
        let (mut tree, root) = tree_with_root(100.0, 100.0);
        tree.layout(root);
        assert_eq!(tree.get(root).unwrap().post_layout().content_rect, Rect::default());
    }
}

mod scaling {
    use super::*;

    #[test]
    fn row_distributes_width() {
        let (mut tree, root) = tree_with_root(300.0, 50.0);
        tree.get_mut(root).unwrap().set_layout(LayoutType::Row).set_can_scale_children(true);
        let a = add(&mut tree, root, 0.0, Size::FULL);
        tree.get_mut(a).unwrap().set_max_width(50.0);
        let b = add(&mut tree, root, 0.0, Size::FULL);
        let c = add(&mut tree, root, 0.0, Size::FULL);

        tree.layout(root);

        assert_eq!(scale(&tree, a).x, 50.0);
        assert_eq!(scale(&tree, b).x, 125.0);
        assert_eq!(scale(&tree, c).x, 125.0);
        assert_eq!(rect(&tree, c).x, 175.0);
    }

    #[test]
    fn column_distribution_subtracts_margins() {
        let (mut tree, root) = tree_with_root(50.0, 200.0);
        tree.get_mut(root).unwrap().set_layout(LayoutType::Column).set_can_scale_children(true);
        let a = add(&mut tree, root, Size::FULL, 0.0);
        tree.get_mut(a).unwrap().set_margin_top(10.0).set_margin_bottom(10.0);
        let b = add(&mut tree, root, Size::FULL, 0.0);

        tree.layout(root);

        assert_eq!(scale(&tree, a).y, 80.0);
        assert_eq!(scale(&tree, b).y, 100.0);
        assert_eq!(rect(&tree, b).y, 100.0);
    }

    #[test]
    fn ignored_children_get_no_share() {
        let (mut tree, root) = tree_with_root(100.0, 50.0);
        tree.get_mut(root).unwrap().set_layout(LayoutType::Row).set_can_scale_children(true);
        let a = add(&mut tree, root, 0.0, 10.0);
        let overlay = add(&mut tree, root, 7.0, 10.0);
        tree.get_mut(overlay).unwrap().set_ignore(true);

        tree.layout(root);

        assert_eq!(scale(&tree, a).x, 100.0);
        assert_eq!(scale(&tree, overlay).x, 7.0);
    }

    #[test]
    fn descendants_follow_the_share() {
        let (mut tree, root) = tree_with_root(300.0, 50.0);
        tree.get_mut(root).unwrap().set_layout(LayoutType::Row).set_can_scale_children(true);
        let a = add(&mut tree, root, 0.0, Size::FULL);
        let b = add(&mut tree, root, 0.0, Size::FULL);
        let fill = add(&mut tree, a, Size::FULL, Size::percentage(0.5));
        tree.get_mut(fill).unwrap().set_x(Offset::percentage(0.1));

        tree.layout(root);

        assert_eq!(scale(&tree, fill), Vector2::new(150.0, 25.0));
        assert_eq!(rect(&tree, fill).x, 15.0);
        assert_eq!(scale(&tree, b).x, 150.0);
    }

    #[test]
    fn declarations_are_untouched() {
        let (mut tree, root) = tree_with_root(300.0, 50.0);
        tree.get_mut(root).unwrap().set_layout(LayoutType::Row).set_can_scale_children(true);
        let a = add(&mut tree, root, 0.0, Size::FULL);

        tree.layout(root);

        let node = tree.get(a).unwrap();
        assert_eq!(node.width(), Size::Pixels(0.0));
        assert_eq!(scale(&tree, a).x, 300.0);
    }

    #[test]
    fn grid_does_not_distribute() {
        let (mut tree, root) = tree_with_root(100.0, 50.0);
        tree.get_mut(root).unwrap().set_layout(LayoutType::Grid).set_can_scale_children(true);
        let a = add(&mut tree, root, 10.0, 10.0);

        tree.layout(root);

        assert_eq!(scale(&tree, a).x, 10.0);
    }
}

mod fit_content {
    use super::*;

    #[test]
    fn column_fits_children_height() {
        let (mut tree, root) = tree_with_root(200.0, 200.0);
        let column = add(&mut tree, root, 100.0, 0.0);
        tree.get_mut(column).unwrap().set_layout(LayoutType::Column).set_fit_content_y(true);
        add(&mut tree, column, 100.0, 20.0);
        add(&mut tree, column, 100.0, 30.0);

        tree.layout(root);

        assert_eq!(scale(&tree, column), Vector2::new(100.0, 50.0));
    }

    #[test]
    fn fitted_size_propagates_up() {
        let (mut tree, root) = tree_with_root(500.0, 500.0);
        let outer = add(&mut tree, root, 0.0, 0.0);
        tree.get_mut(outer).unwrap().set_layout(LayoutType::Row).set_fit_content_x(true).set_fit_content_y(true);
        let inner = add(&mut tree, outer, 0.0, 0.0);
        tree.get_mut(inner).unwrap().set_layout(LayoutType::Row).set_fit_content_x(true).set_fit_content_y(true);
        add(&mut tree, inner, 30.0, 10.0);
        add(&mut tree, inner, 40.0, 20.0);
        let sibling = add(&mut tree, outer, 5.0, 5.0);

        tree.layout(root);

        assert_eq!(scale(&tree, inner), Vector2::new(70.0, 20.0));
        assert_eq!(rect(&tree, sibling).x, 70.0);
        assert_eq!(scale(&tree, outer), Vector2::new(75.0, 20.0));
    }

    #[test]
    fn centered_after_fitting() {
        let (mut tree, root) = tree_with_root(500.0, 500.0);
        let column = add(&mut tree, root, 0.0, 20.0);
        tree.get_mut(column).unwrap().set_layout(LayoutType::Column).set_fit_content_x(true).set_center_content(true);
        let child = add(&mut tree, column, 40.0, 10.0);

        tree.layout(root);
        assert_eq!(scale(&tree, column).x, 40.0);
        assert_eq!(rect(&tree, child), Rect::new(0.0, 0.0, 40.0, 10.0));
        assert_eq!(tree.get(column).unwrap().post_layout().content_rect, Rect::new(0.0, 0.0, 40.0, 10.0));

        tree.layout(root);
        assert_eq!(rect(&tree, child), Rect::new(0.0, 0.0, 40.0, 10.0));
    }

    #[test]
    fn fit_is_still_clamped() {
        let (mut tree, root) = tree_with_root(500.0, 500.0);
        let column = add(&mut tree, root, 100.0, 0.0);
        tree.get_mut(column).unwrap().set_layout(LayoutType::Column).set_fit_content_y(true).set_max_height(25.0);
        add(&mut tree, column, 100.0, 20.0);
        add(&mut tree, column, 100.0, 30.0);

        tree.layout(root);

        assert_eq!(scale(&tree, column).y, 25.0);
    }
}

mod centering {
    use super::*;

    fn centered(layout: LayoutType, width: f64, height: f64) -> (LayoutTree, NodeKey) {
        let (mut tree, root) = tree_with_root(width, height);
        tree.get_mut(root).unwrap().set_layout(layout).set_center_content(true);
        (tree, root)
    }

    #[test]
    fn column_centers_horizontally() {
        let (mut tree, root) = centered(LayoutType::Column, 200.0, 100.0);
        let child = add(&mut tree, root, 50.0, 20.0);
        tree.layout(root);
        assert_eq!(rect(&tree, child).origin(), Vector2::new(75.0, 0.0));
    }

    #[test]
    fn row_centers_vertically() {
        let (mut tree, root) = centered(LayoutType::Row, 200.0, 100.0);
        let child = add(&mut tree, root, 50.0, 20.0);
        tree.layout(root);
        assert_eq!(rect(&tree, child).origin(), Vector2::new(0.0, 40.0));
    }

    #[test]
    fn none_centers_both_axes() {
        let (mut tree, root) = centered(LayoutType::None, 200.0, 100.0);
        let child = add(&mut tree, root, 50.0, 20.0);
        tree.layout(root);
        assert_eq!(rect(&tree, child).origin(), Vector2::new(75.0, 40.0));
    }

    #[test]
    fn grid_centers_the_centroid() {
        let (mut tree, root) = centered(LayoutType::Grid, 100.0, 100.0);
        let a = add(&mut tree, root, 20.0, 20.0);
        let b = add(&mut tree, root, 20.0, 20.0);
        tree.layout(root);
        assert_eq!(rect(&tree, a).origin(), Vector2::new(30.0, 40.0));
        assert_eq!(rect(&tree, b).origin(), Vector2::new(50.0, 40.0));
    }

    #[test]
    fn no_children_is_a_no_op() {
        let (mut tree, root) = centered(LayoutType::Grid, 100.0, 100.0);
        tree.layout(root);
        assert_eq!(tree.get(root).unwrap().post_layout().content_rect, Rect::default());
    }
}

mod global {
    use super::*;

    #[test]
    fn scroll_moves_children_without_relayout() {
        let (mut tree, root) = tree_with_root(200.0, 200.0);
        let panel = add(&mut tree, root, 100.0, 100.0);
        let item = add(&mut tree, panel, 50.0, 50.0);
        tree.get_mut(item).unwrap().set_y(40.0);
        let pinned = add(&mut tree, panel, 10.0, 10.0);
        tree.get_mut(pinned).unwrap().set_ignore(true);

        tree.layout(root);
        assert_eq!(rect(&tree, item).y, 40.0);

        tree.get_mut(panel).unwrap().set_scroll(0.0, 30.0);
        assert_eq!(rect(&tree, item).y, 10.0);
        assert_eq!(rect(&tree, pinned).y, 0.0);
        assert_eq!(rect(&tree, panel).y, 0.0);
    }

    #[test]
    fn nested_positions_accumulate() {
        let (mut tree, root) = tree_with_root(200.0, 200.0);
        let outer = add(&mut tree, root, 100.0, 100.0);
        tree.get_mut(outer).unwrap().set_x(10.0).set_y(10.0).set_padding(5.0).set_margin_left(3.0);
        let inner = add(&mut tree, outer, 10.0, 10.0);
        tree.get_mut(inner).unwrap().set_x(1.0).set_y(2.0);

        tree.layout(root);

        let outer_data = tree.layout_data(outer).unwrap();
        assert_eq!(outer_data.global_position(), Vector2::new(13.0, 10.0));
        assert_eq!(outer_data.global_content_position(), Vector2::new(18.0, 15.0));
        assert_eq!(rect(&tree, inner).origin(), Vector2::new(19.0, 17.0));
    }

    #[test]
    fn clip_rect_intersects_ancestors() {
        let (mut tree, root) = tree_with_root(200.0, 200.0);
        let panel = add(&mut tree, root, 100.0, 100.0);
        tree.get_mut(panel).unwrap().set_padding(5.0).set_clip(ClipType::Inner);
        let inner = add(&mut tree, panel, 50.0, 200.0);
        tree.get_mut(inner).unwrap().set_clip(ClipType::Outer);
        let leaf = add(&mut tree, inner, 10.0, 10.0);

        tree.layout(root);

        assert_eq!(tree.clip_rect(panel), None);
        assert_eq!(tree.clip_rect(inner), Some(Rect::new(5.0, 5.0, 90.0, 90.0)));
        assert_eq!(tree.clip_rect(leaf), Some(Rect::new(5.0, 5.0, 50.0, 90.0)));
    }

    #[test]
    fn content_rect_is_global() {
        let (mut tree, root) = tree_with_root(200.0, 200.0);
        let panel = add(&mut tree, root, 100.0, 100.0);
        tree.get_mut(panel).unwrap().set_x(10.0).set_padding(5.0).set_layout(LayoutType::Column);
        add(&mut tree, panel, 20.0, 300.0);

        tree.layout(root);
        assert_eq!(tree.layout_data(panel).unwrap().content_rect(), Rect::new(15.0, 5.0, 20.0, 300.0));

        tree.get_mut(panel).unwrap().set_scroll(0.0, 100.0);
        assert_eq!(tree.layout_data(panel).unwrap().content_rect(), Rect::new(15.0, -95.0, 20.0, 300.0));
    }
}

mod invariants {
    use super::*;

    fn mixed_tree() -> (LayoutTree, NodeKey) {
        let (mut tree, root) = tree_with_root(640.0, 480.0);
        tree.get_mut(root).unwrap().set_layout(LayoutType::Column).set_padding(4.0);

        let toolbar = add(&mut tree, root, Size::FULL, 40.0);
        tree.get_mut(toolbar).unwrap().set_layout(LayoutType::Row).set_can_scale_children(true);
        for max in [Size::px(60.0), Size::Max, Size::percentage(0.2)] {
            let button = add(&mut tree, toolbar, 0.0, Size::FULL);
            tree.get_mut(button).unwrap().set_max_width(max).set_margin(2.0).set_padding(Offset::percentage(0.05));
            let label = add(&mut tree, button, Size::FULL, Size::percentage(0.5));
            tree.get_mut(label).unwrap().set_y(Offset::percentage(0.25));
        }

        let badge = add(&mut tree, root, 0.0, 20.0);
        tree.get_mut(badge).unwrap().set_layout(LayoutType::Column).set_fit_content_x(true).set_center_content(true);
        add(&mut tree, badge, 40.0, 10.0);
        add(&mut tree, badge, Size::percentage(0.5), 5.0);

        let grid = add(&mut tree, root, Size::FULL, 200.0);
        tree.get_mut(grid).unwrap().set_layout(LayoutType::Grid).set_center_content(true);
        for i in 0..7 {
            add(&mut tree, grid, 50.0 + i as f64 * 10.0, 30.0);
        }

        let list = add(&mut tree, root, Size::percentage(0.5), 0.0);
        tree.get_mut(list).unwrap().set_layout(LayoutType::Column).set_fit_content_y(true).set_max_height(90.0);
        for _ in 0..4 {
            let row = add(&mut tree, list, Size::FULL, 25.0);
            tree.get_mut(row).unwrap().set_margin_bottom(3.0);
        }

        (tree, root)
    }

    #[test]
    fn scale_never_exceeds_max() {
        let (mut tree, root) = mixed_tree();
        tree.layout(root);

        for key in tree.descendants(root) {
            let data = tree.layout_data(key).unwrap();
            assert!(data.scale().x <= data.max_scale().x);
            assert!(data.scale().y <= data.max_scale().y);
        }
    }

    #[test]
    fn layout_is_idempotent() {
        let (mut tree, root) = mixed_tree();
        tree.layout(root);
        let first: Vec<_> = tree.descendants(root).into_iter().map(|k| tree.layout_data(k).unwrap()).collect();

        tree.layout(root);
        let second: Vec<_> = tree.descendants(root).into_iter().map(|k| tree.layout_data(k).unwrap()).collect();

        assert_eq!(first, second);
    }
}

mod tree {
    use super::*;

    #[test]
    fn children_keep_insertion_order() {
        let (mut tree, root) = tree_with_root(10.0, 10.0);
        let a = add(&mut tree, root, 1.0, 1.0);
        let b = add(&mut tree, root, 1.0, 1.0);
        let a1 = add(&mut tree, a, 1.0, 1.0);

        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.descendants(root), vec![root, a, a1, b]);
        assert_eq!(tree.parent(a1), Some(a));
    }

    #[test]
    fn remove_drops_the_subtree() {
        let (mut tree, root) = tree_with_root(10.0, 10.0);
        let a = add(&mut tree, root, 1.0, 1.0);
        let a1 = add(&mut tree, a, 1.0, 1.0);

        assert!(tree.remove(a).is_some());
        assert!(!tree.contains(a));
        assert!(!tree.contains(a1));
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.layout_data(a1), None);
        assert_eq!(tree.insert(a, NodeId::from_raw(9)), Err(LayoutError::StaleNode(a)));
    }

    #[test]
    fn reparent_rejects_cycles() {
        let (mut tree, root) = tree_with_root(10.0, 10.0);
        let a = add(&mut tree, root, 1.0, 1.0);
        let b = add(&mut tree, root, 1.0, 1.0);
        let a1 = add(&mut tree, a, 1.0, 1.0);

        assert_eq!(tree.reparent(a, a1), Err(LayoutError::WouldCycle { node: a, parent: a1 }));
        assert_eq!(tree.reparent(a1, b), Ok(()));
        assert_eq!(tree.children(a), &[] as &[NodeKey]);
        assert_eq!(tree.children(b), &[a1]);
    }

    #[test]
    fn children_inherit_z_index() {
        let (mut tree, root) = tree_with_root(10.0, 10.0);
        let a = add(&mut tree, root, 1.0, 1.0);
        let b = add(&mut tree, root, 1.0, 1.0);
        tree.get_mut(b).unwrap().set_z_index(1);
        let b1 = add(&mut tree, b, 1.0, 1.0);
        let c = add(&mut tree, root, 1.0, 1.0);

        assert_eq!(tree.get(b1).unwrap().z_index(), 1);
        assert_eq!(tree.paint_order(root), vec![root, a, c, b, b1]);
    }

    #[test]
    fn fingerprint_tracks_declarations() {
        let (mut tree, root) = tree_with_root(10.0, 10.0);
        let a = add(&mut tree, root, 1.0, 1.0);
        let before = tree.subtree_hash64(root);
        assert_eq!(before, tree.subtree_hash64(root));

        tree.get_mut(a).unwrap().set_width(2.0);
        assert_ne!(before, tree.subtree_hash64(root));

        tree.get_mut(a).unwrap().set_width(1.0);
        assert_eq!(before, tree.subtree_hash64(root));
    }
}
