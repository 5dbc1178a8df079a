// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tile-side interface types: tile keys, label-bearing meshes, and the
//! cache lookup used to find proxy tiles.
//!
//! Tile loading and geometry building happen elsewhere, on worker threads.
//! Once a tile is published to the visible set it is handed to this crate
//! as an immutable snapshot for the duration of a frame; only the label
//! state inside its meshes is advanced here.

use alloc::vec::Vec;

use kurbo::Affine;

use crate::label::Label;

/// Tile address in the quadtree pyramid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileId {
    /// Zoom level.
    pub z: i32,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl TileId {
    /// Create a tile id.
    pub const fn new(z: i32, x: i32, y: i32) -> Self {
        Self { z, x, y }
    }

    /// The tile one level coarser that covers this one, if any.
    pub fn parent(&self) -> Option<Self> {
        if self.z == 0 {
            return None;
        }
        Some(Self {
            z: self.z - 1,
            x: self.x >> 1,
            y: self.y >> 1,
        })
    }

    /// One of the four tiles a level finer, `quadrant` in `0..4`.
    pub fn child(&self, quadrant: u8) -> Self {
        debug_assert!(quadrant < 4, "quadrant out of range");
        Self {
            z: self.z + 1,
            x: (self.x << 1) | i32::from(quadrant & 1),
            y: (self.y << 1) | i32::from(quadrant >> 1),
        }
    }
}

/// Identifier of the style that produced a label set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleId(pub u32);

/// Ordered labels built for one style of one tile.
#[derive(Debug)]
pub struct LabelSet {
    /// The style this set belongs to.
    pub style: StyleId,
    /// Labels in build order. Owned by the set for the tile's lifetime.
    pub labels: Vec<Label>,
}

impl LabelSet {
    /// Create a label set for a style.
    pub fn new(style: StyleId, labels: Vec<Label>) -> Self {
        Self { style, labels }
    }
}

/// A style mesh, resolved once at build time into a tagged capability.
///
/// Replaces runtime type checks scattered across call sites: a mesh either
/// carries labels or it does not, and consumers ask exactly once via
/// [`as_label_source`](Self::as_label_source).
#[derive(Debug)]
pub enum Mesh {
    /// A mesh carrying labels for placement.
    Labels(LabelSet),
    /// Any other mesh (polygons, lines); opaque to this crate.
    Opaque,
}

impl Mesh {
    /// The label set, if this mesh carries one.
    pub fn as_label_source(&self) -> Option<&LabelSet> {
        match self {
            Self::Labels(set) => Some(set),
            Self::Opaque => None,
        }
    }

    /// Mutable access to the label set, if this mesh carries one.
    pub fn as_label_source_mut(&mut self) -> Option<&mut LabelSet> {
        match self {
            Self::Labels(set) => Some(set),
            Self::Opaque => None,
        }
    }
}

/// A visible tile snapshot for one frame.
#[derive(Debug)]
pub struct Tile {
    /// Data source this tile came from.
    pub source_id: u32,
    /// Tile address.
    pub id: TileId,
    /// Whether this tile is a lower-detail stand-in awaiting replacement.
    pub proxy: bool,
    /// Model transform from tile-local space to world space.
    pub transform: Affine,
    /// Per-style meshes, label-bearing or opaque.
    pub meshes: Vec<Mesh>,
}

impl Tile {
    /// Create a tile with no meshes; push meshes as styles are built.
    pub fn new(source_id: u32, id: TileId, proxy: bool, transform: Affine) -> Self {
        Self {
            source_id,
            id,
            proxy,
            transform,
            meshes: Vec::new(),
        }
    }
}

/// Lookup of retained tiles by `(source, id)`, used to find the proxy
/// counterpart of a freshly visible tile.
pub trait TileCache {
    /// The cached tile, if present.
    fn get(&self, source_id: u32, id: TileId) -> Option<&Tile>;
}

/// Cache lookup that never finds anything.
///
/// Continuity marking silently skips tiles whose proxy cannot be found;
/// with `NoCache` only proxies still in the visible set are considered.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoCache;

impl TileCache for NoCache {
    fn get(&self, _source_id: u32, _id: TileId) -> Option<&Tile> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_halves_coordinates() {
        let id = TileId::new(5, 13, 21);
        assert_eq!(id.parent(), Some(TileId::new(4, 6, 10)));
        assert_eq!(TileId::new(0, 0, 0).parent(), None);
    }

    #[test]
    fn children_tile_the_parent() {
        let id = TileId::new(4, 6, 10);
        let kids: Vec<_> = (0..4).map(|q| id.child(q)).collect();
        assert_eq!(kids, [
            TileId::new(5, 12, 20),
            TileId::new(5, 13, 20),
            TileId::new(5, 12, 21),
            TileId::new(5, 13, 21),
        ]);
        for kid in kids {
            assert_eq!(kid.parent(), Some(id), "child/parent must round-trip");
        }
    }

    #[test]
    fn mesh_capability_resolution() {
        let mesh = Mesh::Labels(LabelSet::new(StyleId(0), Vec::new()));
        assert!(mesh.as_label_source().is_some());
        assert!(Mesh::Opaque.as_label_source().is_none());
    }
}
