// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The collision primitives on their own: bucket a batch of boxes,
//! then confirm candidate pairs with the oriented test.
//!
//! Run:
//! - `cargo run -p waymark_demos --example broadphase_basics`

use kurbo::{Point, Vec2};
use waymark_collide::{Obb, PairGrid};

fn main() {
    let boxes = [
        Obb::new(Point::new(120.0, 100.0), 0.0, Vec2::new(100.0, 24.0)),
        Obb::new(Point::new(160.0, 108.0), 0.5, Vec2::new(100.0, 24.0)),
        Obb::new(Point::new(150.0, 140.0), 1.2, Vec2::new(100.0, 16.0)),
        Obb::new(Point::new(700.0, 500.0), 0.0, Vec2::new(100.0, 24.0)),
    ];
    let aabbs: Vec<_> = boxes.iter().map(Obb::aabb).collect();

    let mut grid = PairGrid::new();
    grid.resize((4, 3), (1024.0, 768.0));

    println!("candidate pairs (envelope overlap):");
    for &(i, j) in grid.intersect(&aabbs) {
        let confirmed = boxes[i].intersects(&boxes[j]);
        println!("  ({i}, {j}) oriented overlap: {confirmed}");
    }
}
