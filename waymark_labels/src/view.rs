// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame view snapshot: viewport size, zoom, and world-to-screen mapping.

use kurbo::{Affine, Vec2};

use crate::tile::Tile;

/// Immutable view state for one frame.
///
/// The map camera lives outside this crate; callers snapshot it here once
/// per frame. `world_to_screen` maps world coordinates to screen pixels
/// with the origin at the top-left corner of the viewport.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct View {
    /// Viewport width in screen units.
    pub width: f64,
    /// Viewport height in screen units.
    pub height: f64,
    /// Continuous zoom level.
    pub zoom: f64,
    /// Combined view-projection transform from world space to screen space.
    pub world_to_screen: Affine,
}

impl View {
    /// Viewport size as a vector.
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Integer zoom level (floor of the continuous zoom).
    pub fn zoom_level(&self) -> i32 {
        floor_to_i32(self.zoom)
    }

    /// Fractional part of the zoom, in `[0, 1)`.
    pub fn zoom_fract(&self) -> f64 {
        self.zoom - f64::from(self.zoom_level())
    }

    /// Transform from a tile's local space to screen space.
    pub fn label_transform(&self, tile: &Tile) -> Affine {
        self.world_to_screen * tile.transform
    }
}

#[inline]
pub(crate) fn floor_to_i32(v: f64) -> i32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "zoom levels are small; the truncating cast is corrected below"
    )]
    let i = v as i32;
    if f64::from(i) > v { i - 1 } else { i }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn view(zoom: f64) -> View {
        View {
            width: 800.0,
            height: 600.0,
            zoom,
            world_to_screen: Affine::IDENTITY,
        }
    }

    #[test]
    fn zoom_level_and_fraction() {
        let v = view(4.9);
        assert_eq!(v.zoom_level(), 4);
        assert!((v.zoom_fract() - 0.9).abs() < 1e-12);
        assert_eq!(view(5.0).zoom_level(), 5);
        assert_eq!(view(5.0).zoom_fract(), 0.0);
    }

    #[test]
    fn label_transform_composes_tile_model() {
        use crate::tile::TileId;
        let v = View {
            world_to_screen: Affine::scale(2.0),
            ..view(3.0)
        };
        let tile = Tile::new(
            1,
            TileId::new(3, 0, 0),
            false,
            Affine::translate((10.0, 0.0)),
        );
        let m = v.label_transform(&tile);
        assert_eq!(m * Point::new(0.0, 0.0), Point::new(20.0, 0.0));
    }
}
