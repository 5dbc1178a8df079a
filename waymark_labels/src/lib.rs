// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark Labels: screen-space label placement for tiled maps.
//!
//! Map labels live in tile-local coordinates but collide in screen
//! space. Every frame, [`Labels`] projects each [`Label`] of the visible
//! [`Tile`] set to the screen, resolves overlaps with a deterministic
//! arbitration chain, spaces out repeated road-style names, and advances
//! per-label fade animations. Zoom-boundary tile swaps reuse the outgoing
//! tiles as *proxies* so established labels do not flicker while their
//! replacements fade in.
//!
//! The collision machinery lives in [`waymark_collide`]; this crate adds
//! the label entity, its visibility state machine, and the frame
//! pipeline.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Affine, Point, Vec2};
//! use waymark_labels::{
//!     FrameOptions, Kind, Label, LabelSet, Labels, Mesh, NoCache, Options, StyleId, Tile,
//!     TileId, View,
//! };
//!
//! let label = Label::new(
//!     1,
//!     Kind::Text,
//!     Point::new(100.0, 100.0),
//!     Vec2::new(120.0, 24.0),
//!     Options::default(),
//! );
//! let mut tile = Tile::new(0, TileId::new(5, 16, 16), false, Affine::IDENTITY);
//! tile.meshes
//!     .push(Mesh::Labels(LabelSet::new(StyleId(0), vec![label])));
//! let mut tiles = vec![tile];
//!
//! let view = View {
//!     width: 800.0,
//!     height: 600.0,
//!     zoom: 5.0,
//!     world_to_screen: Affine::IDENTITY,
//! };
//! let mut labels = Labels::new();
//! let animating =
//!     labels.update_label_set(&view, 0.016, &mut tiles, &NoCache, &FrameOptions::default());
//!
//! // Nothing contested the spot, so the label is fading in.
//! let placed = &tiles[0].meshes[0].as_label_source().unwrap().labels[0];
//! assert!(placed.visible_state());
//! assert!(animating);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod fade;
pub mod frame;
pub mod label;
pub mod labels;
pub mod tile;
pub mod view;

pub use fade::{Direction, Easing, Fade, Transition};
pub use frame::{FrameScope, LabelRef};
pub use label::{
    Kind, Label, LabelFlags, Options, ParentLink, Properties, RenderState, ScreenTransform, State,
};
pub use labels::{DebugLabel, FrameOptions, Labels, TouchItem};
pub use tile::{LabelSet, Mesh, NoCache, StyleId, Tile, TileCache, TileId};
pub use view::View;
