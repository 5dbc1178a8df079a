// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition continuity across a zoom boundary.
//!
//! A label settles in on the zoom-4 tile; zooming past 5 swaps in the
//! child tile that carries the same feature. The established proxy label
//! lets the replacement appear without re-running its fade.
//!
//! Run:
//! - `cargo run -p waymark_demos --example zoom_continuity`

use kurbo::{Affine, Point, Vec2};
use waymark_labels::{
    FrameOptions, Kind, Label, LabelSet, Labels, Mesh, NoCache, Options, State, StyleId, Tile,
    TileCache, TileId, Transition, View,
};

struct MapCache(Vec<Tile>);

impl TileCache for MapCache {
    fn get(&self, source_id: u32, id: TileId) -> Option<&Tile> {
        self.0
            .iter()
            .find(|t| t.source_id == source_id && t.id == id)
    }
}

fn city_label(hash: u64, anchor: Point, show_duration: f64) -> Label {
    Label::new(
        hash,
        Kind::Text,
        anchor,
        Vec2::new(140.0, 28.0),
        Options {
            repeat_group: 42,
            show: Transition {
                duration: show_duration,
                ..Transition::default()
            },
            ..Options::default()
        },
    )
}

fn labeled_tile(id: TileId, label: Label) -> Tile {
    let mut tile = Tile::new(1, id, false, Affine::IDENTITY);
    tile.meshes
        .push(Mesh::Labels(LabelSet::new(StyleId(0), vec![label])));
    tile
}

fn view(zoom: f64) -> View {
    View {
        width: 800.0,
        height: 600.0,
        zoom,
        world_to_screen: Affine::IDENTITY,
    }
}

fn main() {
    let mut labels = Labels::new();

    // The zoom-4 tile settles in; 0.2 s fade needs a few frames.
    let mut old_tiles = vec![labeled_tile(
        TileId::new(4, 8, 8),
        city_label(1, Point::new(300.0, 200.0), 0.2),
    )];
    for _ in 0..30 {
        labels.update_label_set(
            &view(4.9),
            0.016,
            &mut old_tiles,
            &NoCache,
            &FrameOptions::default(),
        );
    }
    let old_state = old_tiles[0].meshes[0].as_label_source().unwrap().labels[0].state();
    println!("zoom 4.9: proxy label {old_state:?}");
    assert_eq!(old_state, State::Visible);

    // Zoom crosses 5: the child tile arrives, the old tile is cached.
    let cache = MapCache(old_tiles);
    let mut tiles = vec![labeled_tile(
        TileId::new(5, 16, 16),
        city_label(2, Point::new(305.0, 204.0), 1.0),
    )];
    labels.update_label_set(&view(5.1), 0.016, &mut tiles, &cache, &FrameOptions::default());

    let placed = &tiles[0].meshes[0].as_label_source().unwrap().labels[0];
    println!(
        "zoom 5.1: replacement {:?} alpha {:.2} after one frame",
        placed.state(),
        placed.render_state().alpha
    );
    assert_eq!(placed.state(), State::Visible);
    assert_eq!(placed.render_state().alpha, 1.0);
}
