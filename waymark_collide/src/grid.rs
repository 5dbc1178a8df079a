// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform pair grid broad phase.
//!
//! A viewport-sized cell grid rebuilt from a batch of AABBs each frame.
//! Reports the deduplicated set of unordered index pairs whose AABBs
//! overlap: a superset of the truly intersecting oriented boxes, with no
//! false negatives. False positives are filtered by the narrow phase.

use alloc::vec::Vec;

use crate::types::Aabb;

/// Broad-phase pair grid over the viewport.
///
/// Working buffers are cleared and reused across frames rather than
/// reallocated; one instance is meant to live as long as its owner.
pub struct PairGrid {
    split_x: usize,
    split_y: usize,
    res_w: f64,
    res_h: f64,
    cells: Vec<Vec<usize>>,
    pairs: Vec<(usize, usize)>,
}

impl PairGrid {
    /// Create an empty grid. Call [`resize`](Self::resize) before use.
    pub fn new() -> Self {
        Self {
            split_x: 1,
            split_y: 1,
            res_w: 0.0,
            res_h: 0.0,
            cells: Vec::new(),
            pairs: Vec::new(),
        }
    }

    /// Set the cell split counts and the screen resolution covered.
    ///
    /// Split counts are clamped to at least one cell per dimension.
    pub fn resize(&mut self, split: (usize, usize), resolution: (f64, f64)) {
        self.split_x = split.0.max(1);
        self.split_y = split.1.max(1);
        self.res_w = resolution.0;
        self.res_h = resolution.1;
        self.cells
            .resize_with(self.split_x * self.split_y, Vec::new);
    }

    /// Number of cells along x and y.
    pub fn split(&self) -> (usize, usize) {
        (self.split_x, self.split_y)
    }

    /// Bucket the AABBs and report overlapping index pairs.
    ///
    /// Pairs are unordered `(low, high)` with `low < high`, each reported at
    /// most once, and returned in sorted order so downstream arbitration is
    /// reproducible. Boxes outside the viewport clamp to the border cells
    /// and still participate.
    pub fn intersect(&mut self, aabbs: &[Aabb]) -> &[(usize, usize)] {
        for cell in &mut self.cells {
            cell.clear();
        }
        self.pairs.clear();

        let cell_w = self.res_w / self.split_x as f64;
        let cell_h = self.res_h / self.split_y as f64;
        if cell_w <= 0.0 || cell_h <= 0.0 {
            return &self.pairs;
        }

        for (slot, aabb) in aabbs.iter().enumerate() {
            let (x0, y0) = self.key_for(aabb.min_x, aabb.min_y, cell_w, cell_h);
            let (x1, y1) = self.key_for(aabb.max_x, aabb.max_y, cell_w, cell_h);
            for y in y0..=y1 {
                for x in x0..=x1 {
                    let cell = &mut self.cells[y * self.split_x + x];
                    for &other in cell.iter() {
                        if aabbs[other].intersects(aabb) {
                            self.pairs.push((other, slot));
                        }
                    }
                    cell.push(slot);
                }
            }
        }

        // A box spanning several cells meets its neighbors once per shared
        // cell; collapse the duplicates.
        self.pairs.sort_unstable();
        self.pairs.dedup();
        &self.pairs
    }

    fn key_for(&self, x: f64, y: f64, cell_w: f64, cell_h: f64) -> (usize, usize) {
        let cx = clamp_index(x / cell_w, self.split_x);
        let cy = clamp_index(y / cell_h, self.split_y);
        (cx, cy)
    }
}

impl Default for PairGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PairGrid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let occupied = self.cells.iter().filter(|c| !c.is_empty()).count();
        f.debug_struct("PairGrid")
            .field("split_x", &self.split_x)
            .field("split_y", &self.split_y)
            .field("res_w", &self.res_w)
            .field("res_h", &self.res_h)
            .field("occupied_cells", &occupied)
            .field("pairs", &self.pairs.len())
            .finish_non_exhaustive()
    }
}

/// Truncating cast doubles as floor here because the value is clamped
/// non-negative first.
fn clamp_index(v: f64, n: usize) -> usize {
    if v <= 0.0 {
        return 0;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value is clamped non-negative and bounded by the cell count"
    )]
    let i = v as usize;
    i.min(n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn grid_256(w: f64, h: f64) -> PairGrid {
        let mut g = PairGrid::new();
        #[allow(
            clippy::cast_possible_truncation,
            reason = "test viewports are small positive integers"
        )]
        g.resize(((w / 256.0) as usize, (h / 256.0) as usize), (w, h));
        g
    }

    #[test]
    fn reports_each_pair_once() {
        let mut g = grid_256(1024.0, 1024.0);
        // One large box spanning many cells against a small one: the pair
        // must still appear exactly once.
        let aabbs = vec![
            Aabb::from_xywh(0.0, 0.0, 900.0, 900.0),
            Aabb::from_xywh(100.0, 100.0, 50.0, 50.0),
        ];
        let pairs = g.intersect(&aabbs);
        assert_eq!(pairs, &[(0, 1)]);
    }

    #[test]
    fn no_self_pairs_and_sorted_output() {
        let mut g = grid_256(512.0, 512.0);
        let aabbs = vec![
            Aabb::from_xywh(0.0, 0.0, 100.0, 100.0),
            Aabb::from_xywh(50.0, 50.0, 100.0, 100.0),
            Aabb::from_xywh(120.0, 120.0, 100.0, 100.0),
        ];
        let pairs = g.intersect(&aabbs).to_vec();
        assert!(pairs.iter().all(|&(a, b)| a < b), "pairs must be ordered");
        let mut sorted = pairs.clone();
        sorted.sort_unstable();
        assert_eq!(pairs, sorted, "output must be sorted");
        assert_eq!(pairs, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn pairs_found_across_cell_boundaries() {
        let mut g = grid_256(512.0, 512.0);
        // Two boxes straddling the 256px cell seam.
        let aabbs = vec![
            Aabb::from_xywh(200.0, 0.0, 100.0, 40.0),
            Aabb::from_xywh(250.0, 10.0, 100.0, 40.0),
        ];
        assert_eq!(g.intersect(&aabbs), &[(0, 1)]);
    }

    #[test]
    fn offscreen_boxes_clamp_to_border() {
        let mut g = grid_256(512.0, 512.0);
        let aabbs = vec![
            Aabb::from_xywh(-100.0, -100.0, 60.0, 60.0),
            Aabb::from_xywh(-80.0, -80.0, 60.0, 60.0),
        ];
        assert_eq!(g.intersect(&aabbs), &[(0, 1)]);
    }

    #[test]
    fn buffers_are_reusable() {
        let mut g = grid_256(512.0, 512.0);
        let aabbs = vec![
            Aabb::from_xywh(0.0, 0.0, 100.0, 100.0),
            Aabb::from_xywh(50.0, 50.0, 100.0, 100.0),
        ];
        let first = g.intersect(&aabbs).to_vec();
        let second = g.intersect(&aabbs).to_vec();
        assert_eq!(first, second);
        assert!(g.intersect(&[]).is_empty());
    }

    #[test]
    fn disjoint_boxes_in_same_cell_do_not_pair() {
        let mut g = grid_256(512.0, 512.0);
        let aabbs = vec![
            Aabb::from_xywh(0.0, 0.0, 20.0, 20.0),
            Aabb::from_xywh(100.0, 100.0, 20.0, 20.0),
        ];
        assert!(g.intersect(&aabbs).is_empty());
    }
}
