// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-frame placement pipeline.
//!
//! [`Labels`] owns the reusable frame buffers and drives one frame of
//! placement over a slice of tiles:
//!
//! 1. gather: project every label, collect collision candidates
//! 2. transition continuity: on integer zoom changes, mark labels whose
//!    proxy counterpart is already showing so they appear without a fade
//! 3. broad phase: uniform-grid pair generation over candidate AABBs
//! 4. narrow phase: OBB tests plus the deterministic arbitration chain
//! 5. repeat-group spacing
//! 6. commit: parent suppression, state machine step, render transform
//!
//! All ordering inside the pipeline is deterministic for a given tile
//! slice, so two runs over identical input produce identical placement.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use waymark_collide::{Aabb, Obb, PairGrid};

use crate::frame::{FrameScope, LabelRef};
use crate::label::{Kind, Label, Properties, State};
use crate::tile::{StyleId, Tile, TileCache, TileId};
use crate::view::{floor_to_i32, View};

/// Broad-phase cell size in screen units.
const CELL_SIZE: f64 = 256.0;

/// Per-frame pipeline options.
#[derive(Copy, Clone, Debug)]
pub struct FrameOptions {
    /// Record a [`DebugLabel`] snapshot for every collision candidate.
    pub debug: bool,
    /// Half-extent of the square picking box used by
    /// [`Labels::features_at_point`].
    pub pick_radius: f64,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            debug: false,
            pick_radius: 50.0,
        }
    }
}

/// One interactive label hit by a point query, nearest first.
#[derive(Clone, Debug)]
pub struct TouchItem {
    /// Feature properties of the hit label.
    pub properties: Properties,
    /// Screen-space center of the hit label.
    pub position: Point,
    /// Screen distance from the query point to the label position.
    pub distance: f64,
}

/// Snapshot of one candidate after placement, for overlay rendering.
#[derive(Clone, Debug)]
pub struct DebugLabel {
    /// State at the end of the frame.
    pub state: State,
    /// Collision quad corners.
    pub quad: [Point; 4],
    /// Screen position.
    pub position: Point,
    /// Style offset from the anchor.
    pub offset: Vec2,
    /// Collision box center.
    pub center: Point,
    /// Repeat group id, `0` when ungrouped.
    pub repeat_group: u64,
    /// Repeat spacing threshold.
    pub repeat_distance: f64,
    /// Whether the label is suppressed through a composite parent.
    pub has_parent: bool,
}

impl DebugLabel {
    fn snapshot(label: &Label) -> Self {
        Self {
            state: label.state(),
            quad: *label.obb().quad(),
            position: label.transform().position,
            offset: label.options().offset,
            center: label.center(),
            repeat_group: label.options().repeat_group,
            repeat_distance: label.options().repeat_distance,
            has_parent: label.parent().is_some(),
        }
    }
}

/// Screen-space label placement over the visible tile set.
///
/// Holds no references into tiles between frames; all per-frame state is
/// handle-based and the internal buffers are reused across frames.
#[derive(Debug, Default)]
pub struct Labels {
    grid: PairGrid,
    candidates: Vec<LabelRef>,
    aabbs: Vec<Aabb>,
    debug: Vec<DebugLabel>,
    last_zoom: f64,
}

impl Labels {
    /// New pipeline with empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one full placement frame over `tiles`.
    ///
    /// `cache` resolves proxy tiles for transition continuity; pass
    /// [`NoCache`](crate::tile::NoCache) when no cached tiles exist.
    /// Returns whether any fade animation is still running, i.e. whether
    /// the caller should schedule another frame.
    pub fn update_label_set(
        &mut self,
        view: &View,
        dt: f64,
        tiles: &mut [Tile],
        cache: &dyn TileCache,
        options: &FrameOptions,
    ) -> bool {
        self.candidates.clear();
        self.aabbs.clear();
        self.debug.clear();

        let mut scope = FrameScope::new(tiles);
        let mut need_update = self.gather(&mut scope, view, dt);

        // Continuity runs once per integer zoom change; the reference
        // zoom only advances when the pass actually runs, so crossing a
        // boundary in several small steps still triggers it.
        if floor_to_i32(self.last_zoom) != view.zoom_level() {
            self.skip_transitions(&mut scope, view, cache);
            self.last_zoom = view.zoom;
        }

        for &r in &self.candidates {
            self.aabbs.push(scope.label(r).aabb());
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "viewport extents are small positive numbers"
        )]
        let split = (
            ((view.width / CELL_SIZE) as usize).max(1),
            ((view.height / CELL_SIZE) as usize).max(1),
        );
        self.grid.resize(split, (view.width, view.height));
        let pairs = self.grid.intersect(&self.aabbs);

        for &(i, j) in pairs {
            let a = self.candidates[i];
            let b = self.candidates[j];
            let first_loses = {
                let la = scope.label(a);
                let lb = scope.label(b);
                if la.is_occluded() || lb.is_occluded() {
                    // An earlier conflict already removed one of the two.
                    None
                } else if !la.obb().intersects(lb.obb()) {
                    None
                } else {
                    Some(Self::first_loses(la, lb))
                }
            };
            match first_loses {
                Some(true) => scope.label_mut(a).occlude(),
                Some(false) => scope.label_mut(b).occlude(),
                None => {}
            }
        }

        let mut repeat_set: Vec<LabelRef> = Vec::new();
        for &r in &self.candidates {
            let l = scope.label(r);
            if l.is_occluded() || l.kind() != Kind::Text {
                continue;
            }
            if l.options().repeat_group == 0 || l.options().repeat_distance <= 0.0 {
                continue;
            }
            repeat_set.push(r);
        }
        // Tile-local anchor distance gives a frame-stable ordering that
        // camera motion cannot perturb.
        repeat_set.sort_unstable_by(|&a, &b| {
            let da = scope.label(a).transform().model_position.to_vec2().hypot2();
            let db = scope.label(b).transform().model_position.to_vec2().hypot2();
            da.total_cmp(&db)
        });
        Self::check_repeat_groups(&mut scope, &repeat_set);

        for &r in &self.candidates {
            if let Some(p) = scope.parent_of(r) {
                let (occluded, visible) = {
                    let parent = scope.label(p);
                    (parent.is_occluded(), parent.visible_state())
                };
                if occluded || !visible {
                    scope.label_mut(r).occlude();
                }
            }
            let label = scope.label_mut(r);
            need_update |= label.eval_state(dt);
            label.push_transform();
            if options.debug {
                self.debug.push(DebugLabel::snapshot(scope.label(r)));
            }
        }

        need_update
    }

    /// Advance fades and transforms without running occlusion.
    ///
    /// For frames where only the camera moved continuously: labels keep
    /// last frame's placement verdict and only animate. Returns whether
    /// any animation is still running.
    pub fn update_transitions(&self, view: &View, dt: f64, tiles: &mut [Tile]) -> bool {
        let zoom_fract = view.zoom_fract();
        let mut scope = FrameScope::new(tiles);
        let mut need_update = false;
        for ti in 0..scope.tile_count() {
            let model_to_screen = view.label_transform(&scope.tiles()[ti]);
            for mi in 0..scope.tiles()[ti].meshes.len() {
                let Some(count) = scope.tiles()[ti].meshes[mi]
                    .as_label_source()
                    .map(|s| s.labels.len())
                else {
                    continue;
                };
                for li in 0..count {
                    let r = LabelRef { tile: ti, mesh: mi, label: li };
                    let label = scope.label_mut(r);
                    if !label.update(model_to_screen, zoom_fract) {
                        continue;
                    }
                    if !label.can_occlude() || label.visible_state() {
                        need_update |= label.eval_state(dt);
                        label.push_transform();
                    }
                }
            }
        }
        need_update
    }

    /// Interactive labels under a screen point, sorted nearest first.
    ///
    /// With `visible_only` set, only labels currently occupying screen
    /// space answer; otherwise every interactive label is re-projected
    /// and tested, which also covers labels placed out but not shown.
    pub fn features_at_point(
        &self,
        view: &View,
        tiles: &mut [Tile],
        point: Point,
        visible_only: bool,
        options: &FrameOptions,
    ) -> Vec<TouchItem> {
        let thumb = Obb::new(
            point,
            0.0,
            Vec2::new(options.pick_radius, options.pick_radius),
        );
        let zoom_fract = view.zoom_fract();
        let mut items = Vec::new();
        for tile in tiles.iter_mut() {
            let model_to_screen = view.label_transform(tile);
            for mesh in &mut tile.meshes {
                let Some(set) = mesh.as_label_source_mut() else {
                    continue;
                };
                for label in &mut set.labels {
                    if !label.options().interactive {
                        continue;
                    }
                    if visible_only {
                        if !label.visible_state() {
                            continue;
                        }
                    } else if !label.update_screen_transform(model_to_screen, zoom_fract) {
                        continue;
                    }
                    if label.obb().intersects(&thumb) {
                        items.push(TouchItem {
                            properties: label.options().properties.clone(),
                            position: label.center(),
                            distance: label.transform().position.distance(point),
                        });
                    }
                }
            }
        }
        items.sort_unstable_by(|a, b| a.distance.total_cmp(&b.distance));
        items
    }

    /// Candidate snapshots from the last frame run with
    /// [`FrameOptions::debug`] set.
    pub fn debug_labels(&self) -> &[DebugLabel] {
        &self.debug
    }

    /// Project every label and split them into collision candidates and
    /// always-shown labels, which are committed immediately.
    fn gather(&mut self, scope: &mut FrameScope<'_>, view: &View, dt: f64) -> bool {
        let zoom_fract = view.zoom_fract();
        let mut need_update = false;
        for ti in 0..scope.tile_count() {
            let proxy = scope.tiles()[ti].proxy;
            let model_to_screen = view.label_transform(&scope.tiles()[ti]);
            for mi in 0..scope.tiles()[ti].meshes.len() {
                let Some(count) = scope.tiles()[ti].meshes[mi]
                    .as_label_source()
                    .map(|s| s.labels.len())
                else {
                    continue;
                };
                for li in 0..count {
                    let r = LabelRef { tile: ti, mesh: mi, label: li };
                    let label = scope.label_mut(r);
                    if !label.update(model_to_screen, zoom_fract) {
                        continue;
                    }
                    if label.can_occlude() {
                        label.set_proxy(proxy);
                        self.candidates.push(r);
                    } else {
                        need_update |= label.eval_state(dt);
                        label.push_transform();
                    }
                }
            }
        }
        need_update
    }

    /// Mark labels waiting to fade in whose proxy counterpart is already
    /// showing nearby, so tile swaps at zoom boundaries do not flicker.
    fn skip_transitions(&self, scope: &mut FrameScope<'_>, view: &View, cache: &dyn TileCache) {
        let zoom_in = self.last_zoom < view.zoom;
        for ti in 0..scope.tile_count() {
            let id = scope.tiles()[ti].id;
            let source = scope.tiles()[ti].source_id;
            if zoom_in {
                if let Some(parent) = id.parent() {
                    Self::skip_transitions_from(scope, ti, source, parent, cache);
                }
            } else {
                for quadrant in 0..4 {
                    Self::skip_transitions_from(scope, ti, source, id.child(quadrant), cache);
                }
            }
        }
    }

    fn skip_transitions_from(
        scope: &mut FrameScope<'_>,
        ti: usize,
        source: u32,
        proxy_id: TileId,
        cache: &dyn TileCache,
    ) {
        // Snapshot the showing labels of the proxy tile; it may live in
        // the cache or still be part of the visible set.
        let showing: Vec<(StyleId, u64, Point)> = {
            let proxy = cache.get(source, proxy_id).or_else(|| {
                scope
                    .tiles()
                    .iter()
                    .find(|t| t.source_id == source && t.id == proxy_id)
            });
            let Some(proxy) = proxy else {
                return;
            };
            let mut out = Vec::new();
            for mesh in &proxy.meshes {
                let Some(set) = mesh.as_label_source() else {
                    continue;
                };
                for label in &set.labels {
                    if !label.visible_state() || !label.can_occlude() {
                        continue;
                    }
                    out.push((
                        set.style,
                        label.options().repeat_group,
                        label.transform().position,
                    ));
                }
            }
            out
        };
        if showing.is_empty() {
            return;
        }

        for mi in 0..scope.tiles()[ti].meshes.len() {
            let Some(style) = scope.tiles()[ti].meshes[mi]
                .as_label_source()
                .map(|s| s.style)
            else {
                continue;
            };
            let count = scope.tiles()[ti].meshes[mi]
                .as_label_source()
                .map_or(0, |s| s.labels.len());
            for li in 0..count {
                let r = LabelRef { tile: ti, mesh: mi, label: li };
                let (state, can_occlude, group, position, dims) = {
                    let l = scope.label(r);
                    (
                        l.state(),
                        l.can_occlude(),
                        l.options().repeat_group,
                        l.transform().position,
                        l.dimensions(),
                    )
                };
                if !can_occlude || state != State::WaitOcclusion {
                    continue;
                }
                let radius = dims.x.max(dims.y);
                let near = showing.iter().any(|&(s, g, p)| {
                    s == style && g == group && p.distance_squared(position) < radius * radius
                });
                if near {
                    scope.label_mut(r).skip_transition();
                }
            }
        }
    }

    /// The arbitration chain. `true` means the first label loses.
    fn first_loses(a: &Label, b: &Label) -> bool {
        // Proxy data yields to fresh data.
        if a.is_proxy() != b.is_proxy() {
            return a.is_proxy();
        }
        // Lower numeric priority wins.
        if a.options().priority != b.options().priority {
            return a.options().priority > b.options().priority;
        }
        // Prefer whichever label won last frame.
        if a.occluded_last_frame() != b.occluded_last_frame() {
            return a.occluded_last_frame();
        }
        // Prefer the label already occupying the spot.
        if a.visible_state() != b.visible_state() {
            return !a.visible_state();
        }
        // Stable content hash keeps ties reproducible in any pair order.
        a.hash() < b.hash()
    }

    /// Enforce minimum spacing within repeat groups over the already
    /// ordered, unoccluded candidates.
    ///
    /// Greedy over the ordering: the first member of a group claims its
    /// spot; later members inside the threshold are occluded, except that
    /// a showing label replaces a non-showing claimant. Labels at exactly
    /// the same center are duplicates of one feature across neighboring
    /// tiles and are left alone. Running the pass again over its own
    /// survivors changes nothing.
    fn check_repeat_groups(scope: &mut FrameScope<'_>, ordered: &[LabelRef]) {
        let mut groups: BTreeMap<u64, Vec<LabelRef>> = BTreeMap::new();
        for &r in ordered {
            let (group_id, threshold, center) = {
                let l = scope.label(r);
                (l.options().repeat_group, l.options().repeat_distance, l.center())
            };
            let members = groups.entry(group_id).or_default();
            if members.iter().any(|&m| scope.label(m).center() == center) {
                continue;
            }
            let threshold_sq = threshold * threshold;
            let mut claimed = false;
            for slot in 0..members.len() {
                let member = members[slot];
                if scope.label(member).center().distance_squared(center) < threshold_sq {
                    let incoming_shows = scope.label(r).visible_state();
                    let member_shows = scope.label(member).visible_state();
                    if incoming_shows && !member_shows {
                        scope.label_mut(member).occlude();
                        members[slot] = r;
                    } else {
                        scope.label_mut(r).occlude();
                    }
                    claimed = true;
                    break;
                }
            }
            if !claimed {
                members.push(r);
            }
        }
    }
}
