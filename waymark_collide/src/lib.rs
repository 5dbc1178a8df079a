// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Waymark Collide: screen-space collision primitives for label placement.
//!
//! - [`Aabb`]: axis-aligned bounding box with overlap/union helpers.
//! - [`Obb`]: oriented bounding box with a separating-axis overlap test.
//! - [`PairGrid`]: uniform broad-phase grid that buckets a batch of AABBs
//!   and reports every overlapping index pair exactly once.
//!
//! The grid guarantees no false negatives: its pair set is a superset of
//! the pairs whose oriented boxes truly intersect. Callers filter the rest
//! with [`Obb::intersects`]. Pair output is sorted and deduplicated, so a
//! consumer that walks it in order gets reproducible results.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use waymark_collide::{Obb, PairGrid};
//!
//! let boxes = [
//!     Obb::new(Point::new(100.0, 100.0), 0.0, Vec2::new(80.0, 20.0)),
//!     Obb::new(Point::new(130.0, 105.0), 0.4, Vec2::new(80.0, 20.0)),
//!     Obb::new(Point::new(400.0, 400.0), 0.0, Vec2::new(80.0, 20.0)),
//! ];
//! let aabbs: Vec<_> = boxes.iter().map(|b| b.aabb()).collect();
//!
//! let mut grid = PairGrid::new();
//! grid.resize((4, 4), (1024.0, 1024.0));
//!
//! let hits: Vec<_> = grid
//!     .intersect(&aabbs)
//!     .iter()
//!     .filter(|&&(a, b)| boxes[a].intersects(&boxes[b]))
//!     .copied()
//!     .collect();
//! assert_eq!(hits, vec![(0, 1)]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod grid;
pub mod obb;
pub mod types;

pub use grid::PairGrid;
pub use obb::Obb;
pub use types::Aabb;
