#![no_main]

use arbitrary::Arbitrary;
use rosin_layout::prelude::*;

#[derive(Arbitrary, Debug)]
enum FuzzSize {
    Pixels(i16),
    Percentage(u8, i8),
    Max,
}

impl From<&FuzzSize> for Size {
    fn from(size: &FuzzSize) -> Self {
        match *size {
            FuzzSize::Pixels(px) => Size::px(px as f64),
            FuzzSize::Percentage(p, offset) => Size::percentage_offset(p as f64 / 100.0, offset as f64),
            FuzzSize::Max => Size::Max,
        }
    }
}

#[derive(Arbitrary, Debug)]
struct FuzzNode {
    width: FuzzSize,
    height: FuzzSize,
    max_width: FuzzSize,
    max_height: FuzzSize,
    margin: i8,
    padding: i8,
    layout: u8,
    flags: u8,
    scroll: i8,
    children: Vec<FuzzNode>,
}

fn declare(gui: &mut Gui, index: usize, node: &FuzzNode, depth: usize) {
    let layout = match node.layout % 4 {
        0 => LayoutType::None,
        1 => LayoutType::Row,
        2 => LayoutType::Column,
        _ => LayoutType::Grid,
    };

    let builder = gui
        .node(index)
        .width(&node.width)
        .height(&node.height)
        .max_width(&node.max_width)
        .max_height(&node.max_height)
        .margin(node.margin as f64)
        .padding(node.padding as f64)
        .layout(layout)
        .ignore(node.flags & 1 != 0)
        .fit_content_x(node.flags & 2 != 0)
        .fit_content_y(node.flags & 4 != 0)
        .center_content(node.flags & 8 != 0)
        .can_scale_children(node.flags & 16 != 0)
        .scroll(0.0, node.scroll as f64);

    // Deep inputs only slow the fuzzer down without reaching new code.
    if depth >= 12 {
        return;
    }

    builder.enter(|gui| {
        for (i, child) in node.children.iter().enumerate() {
            declare(gui, i, child, depth + 1);
        }
    });
}

libfuzzer_sys::fuzz_target!(|input: (u16, u16, Vec<FuzzNode>)| {
    let (width, height, nodes) = input;
    let mut gui = Gui::new();

    for _ in 0..2 {
        gui.begin_frame((width as f64, height as f64));
        for (i, node) in nodes.iter().enumerate() {
            declare(&mut gui, i, node, 0);
        }
        let _ = gui.end_frame();

        let tree = gui.tree();
        for key in tree.descendants(gui.root()) {
            let Some(data) = tree.layout_data(key) else { continue };
            // Written as "not greater" so unresolvable (NaN) extents don't count as violations.
            assert!(!(data.scale().x > data.max_scale().x));
            assert!(!(data.scale().y > data.max_scale().y));
        }
    }
});
