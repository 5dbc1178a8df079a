// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Oriented bounding box and the separating-axis narrow-phase test.

use kurbo::{Point, Vec2};

use crate::types::Aabb;

/// Oriented bounding box in screen space.
///
/// Built from a center, a rotation (radians, counter-clockwise), and full
/// width/height dimensions. The corner quad and the two edge axes are
/// precomputed so the intersection test is pure arithmetic.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Obb {
    center: Point,
    quad: [Point; 4],
    axes: [Vec2; 2],
}

impl Obb {
    /// Create an oriented box from center, rotation, and full dimensions.
    pub fn new(center: Point, rotation: f64, dimensions: Vec2) -> Self {
        let x_axis = Vec2::from_angle(rotation);
        let y_axis = Vec2::new(-x_axis.y, x_axis.x);
        let hx = x_axis * (0.5 * dimensions.x);
        let hy = y_axis * (0.5 * dimensions.y);
        let quad = [
            center - hx - hy,
            center + hx - hy,
            center + hx + hy,
            center - hx + hy,
        ];
        Self {
            center,
            quad,
            axes: [x_axis, y_axis],
        }
    }

    /// The box center.
    pub fn center(&self) -> Point {
        self.center
    }

    /// The four corners, counter-clockwise from the min corner.
    pub fn quad(&self) -> &[Point; 4] {
        &self.quad
    }

    /// Conservative axis-aligned envelope of the quad.
    pub fn aabb(&self) -> Aabb {
        let mut min_x = self.quad[0].x;
        let mut min_y = self.quad[0].y;
        let mut max_x = min_x;
        let mut max_y = min_y;
        for p in &self.quad[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Aabb::new(min_x, min_y, max_x, max_y)
    }

    /// Exact overlap test via the separating axis theorem.
    ///
    /// Total over well-formed input: degenerate (zero-area) boxes simply
    /// project to a point interval and resolve like any other.
    pub fn intersects(&self, other: &Self) -> bool {
        for axis in self.axes.iter().chain(other.axes.iter()) {
            let (a_min, a_max) = project(&self.quad, *axis);
            let (b_min, b_max) = project(&other.quad, *axis);
            if a_max < b_min || b_max < a_min {
                return false;
            }
        }
        true
    }
}

fn project(quad: &[Point; 4], axis: Vec2) -> (f64, f64) {
    let mut min = quad[0].to_vec2().dot(axis);
    let mut max = min;
    for p in &quad[1..] {
        let d = p.to_vec2().dot(axis);
        min = min.min(d);
        max = max.max(d);
    }
    (min, max)
}
