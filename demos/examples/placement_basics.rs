// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two labels fight over one spot; a third sits alone.
//!
//! Run:
//! - `cargo run -p waymark_demos --example placement_basics`

use kurbo::{Affine, Point, Vec2};
use waymark_labels::{
    FrameOptions, Kind, Label, LabelSet, Labels, Mesh, NoCache, Options, StyleId, Tile, TileId,
    View,
};

fn named_label(hash: u64, x: f64, priority: f64) -> Label {
    Label::new(
        hash,
        Kind::Text,
        Point::new(x, 100.0),
        Vec2::new(120.0, 24.0),
        Options {
            priority,
            ..Options::default()
        },
    )
}

fn main() {
    let mut tile = Tile::new(0, TileId::new(5, 16, 16), false, Affine::IDENTITY);
    tile.meshes.push(Mesh::Labels(LabelSet::new(
        StyleId(0),
        vec![
            named_label(1, 100.0, 2.0),
            named_label(2, 140.0, 1.0), // overlaps the first, higher priority
            named_label(3, 500.0, 2.0),
        ],
    )));
    let mut tiles = vec![tile];

    let view = View {
        width: 800.0,
        height: 600.0,
        zoom: 5.0,
        world_to_screen: Affine::IDENTITY,
    };

    let mut labels = Labels::new();
    let mut animating = true;
    let mut frame = 0u32;
    while animating && frame < 120 {
        animating =
            labels.update_label_set(&view, 0.016, &mut tiles, &NoCache, &FrameOptions::default());
        frame += 1;
    }
    println!("settled after {frame} frames");

    let set = tiles[0].meshes[0].as_label_source().unwrap();
    for label in &set.labels {
        println!(
            "  label {}: {:?} alpha {:.2}",
            label.hash(),
            label.state(),
            label.render_state().alpha
        );
    }

    // The priority-1 label owns the contested spot.
    assert!(set.labels[1].visible_state());
    assert!(!set.labels[0].visible_state());
    assert!(set.labels[2].visible_state());
}
