// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point queries against interactive labels.
//!
//! Run:
//! - `cargo run -p waymark_demos --example hit_testing`

use kurbo::{Affine, Point, Vec2};
use waymark_labels::{
    FrameOptions, Kind, Label, LabelSet, Labels, Mesh, Options, Properties, StyleId, Tile, TileId,
    View,
};

fn poi(hash: u64, name: &str, anchor: Point) -> Label {
    Label::new(
        hash,
        Kind::Icon,
        anchor,
        Vec2::new(32.0, 32.0),
        Options {
            interactive: true,
            properties: Properties::new(vec![("name".into(), name.into())]),
            ..Options::default()
        },
    )
}

fn main() {
    let mut tile = Tile::new(0, TileId::new(5, 16, 16), false, Affine::IDENTITY);
    tile.meshes.push(Mesh::Labels(LabelSet::new(
        StyleId(0),
        vec![
            poi(1, "Fountain", Point::new(200.0, 200.0)),
            poi(2, "Kiosk", Point::new(230.0, 215.0)),
            poi(3, "Harbor", Point::new(600.0, 400.0)),
        ],
    )));
    let mut tiles = vec![tile];

    let view = View {
        width: 800.0,
        height: 600.0,
        zoom: 5.0,
        world_to_screen: Affine::IDENTITY,
    };

    let labels = Labels::new();
    let tap = Point::new(210.0, 205.0);
    let items = labels.features_at_point(&view, &mut tiles, tap, false, &FrameOptions::default());

    println!("tap at {tap:?}:");
    for item in &items {
        println!(
            "  {} at {:?} ({:.1} px away)",
            item.properties.get("name").unwrap_or("?"),
            item.position,
            item.distance
        );
    }

    assert_eq!(items.len(), 2, "the harbor is out of reach");
    assert_eq!(items[0].properties.get("name"), Some("Fountain"));
}
