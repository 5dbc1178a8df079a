// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-scoped label handles.
//!
//! The placement pipeline never stores references to labels across
//! phases; it records [`LabelRef`] handles during the gather phase and
//! resolves them through a [`FrameScope`] borrowing the frame's tile
//! slice. Handles are plain indices, so they stay valid for the whole
//! frame and cost nothing to copy into the broad-phase buffers.

use crate::label::Label;
use crate::tile::Tile;

/// Index path to one label within a frame's tile slice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LabelRef {
    /// Tile index in the frame's slice.
    pub tile: usize,
    /// Mesh index within the tile.
    pub mesh: usize,
    /// Label index within the mesh's label set.
    pub label: usize,
}

/// Mutable view over the tiles being placed this frame.
#[derive(Debug)]
pub struct FrameScope<'a> {
    tiles: &'a mut [Tile],
}

impl<'a> FrameScope<'a> {
    /// Borrow the frame's tile slice for handle resolution.
    pub fn new(tiles: &'a mut [Tile]) -> Self {
        Self { tiles }
    }

    /// The tiles in this frame.
    pub fn tiles(&self) -> &[Tile] {
        self.tiles
    }

    /// Number of tiles in this frame.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Resolve a handle recorded this frame.
    ///
    /// Panics on a handle that was not produced from this scope's tiles;
    /// handles never outlive the frame that recorded them.
    pub fn label(&self, r: LabelRef) -> &Label {
        let set = self.tiles[r.tile].meshes[r.mesh]
            .as_label_source()
            .expect("label handle points at a non-label mesh");
        &set.labels[r.label]
    }

    /// Mutable counterpart of [`label`](Self::label).
    pub fn label_mut(&mut self, r: LabelRef) -> &mut Label {
        let set = self.tiles[r.tile].meshes[r.mesh]
            .as_label_source_mut()
            .expect("label handle points at a non-label mesh");
        &mut set.labels[r.label]
    }

    /// Resolve the composite parent of `r`, if it has one and the link
    /// is still valid within the same tile.
    pub fn parent_of(&self, r: LabelRef) -> Option<LabelRef> {
        let link = self.label(r).parent()?;
        let set = self.tiles[r.tile].meshes.get(link.mesh)?.as_label_source()?;
        if link.label >= set.labels.len() {
            return None;
        }
        Some(LabelRef {
            tile: r.tile,
            mesh: link.mesh,
            label: link.label,
        })
    }
}
