// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The label entity: style options, screen transform, bounding volumes,
//! and the per-frame visibility state machine.
//!
//! A label is created when a tile's style mesh is built and lives as long
//! as its owning mesh. Placement state (occlusion flags, fade timers,
//! committed transform) persists across frames on the label itself; the
//! orchestrator only ever works through short-lived handles.
//!
//! ## State machine
//!
//! `Sleep → WaitOcclusion → FadingIn → Visible ⇄ FadingOut → Sleep`, with
//! `Dead` for labels whose screen projection is degenerate this frame.
//! A label that cannot collide skips `WaitOcclusion` and fades in
//! directly. Labels in `FadingOut` still report [`visible_state`]
//! (and keep their collision footprint) so their screen space is not
//! reused before they are gone.
//!
//! [`visible_state`]: Label::visible_state

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use bitflags::bitflags;
use kurbo::{Affine, Point, Vec2};
use waymark_collide::{Aabb, Obb};

use crate::fade::{Direction, Fade, Transition};

/// Opaque feature properties carried through to hit-test results.
///
/// Cheap to clone; tiles sharing a feature may share one allocation.
#[derive(Clone, Debug, Default)]
pub struct Properties(Arc<[(String, String)]>);

impl Properties {
    /// Build from key/value pairs.
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self(entries.into())
    }

    /// Value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate all key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True if no properties are attached.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

bitflags! {
    /// Per-frame and cross-frame placement flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct LabelFlags: u8 {
        /// Lost a collision or repeat-group conflict this frame.
        const OCCLUDED = 1 << 0;
        /// Was occluded when the previous frame resolved.
        const OCCLUDED_LAST_FRAME = 1 << 1;
        /// Belongs to a proxy tile this frame.
        const PROXY = 1 << 2;
        /// Continuity marking: appear instantly instead of fading in.
        const SKIP_TRANSITION = 1 << 3;
    }
}

/// Visibility state. See the [module docs](self) for the transitions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    /// Not shown; not yet a candidate or recently occluded.
    Sleep,
    /// Candidate this frame, awaiting the occlusion verdict.
    WaitOcclusion,
    /// Fade-in animation running.
    FadingIn,
    /// Fully shown.
    Visible,
    /// Fade-out animation running; still occupies screen space.
    FadingOut,
    /// Screen projection failed; dropped from the candidate set.
    Dead,
}

/// What the label renders as.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Text glyphs; participates in repeat-group spacing.
    Text,
    /// Sprite/icon quad.
    Icon,
}

/// Link from a composite label to its parent within the same tile.
///
/// The owning side is the composite group; the child only holds this weak
/// handle, resolved by lookup each frame. A child is suppressed whenever
/// its parent is occluded or not visible.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParentLink {
    /// Mesh index within the owning tile.
    pub mesh: usize,
    /// Label index within that mesh's label set.
    pub label: usize,
}

/// Style-supplied options, immutable for the label's lifetime.
#[derive(Clone, Debug)]
pub struct Options {
    /// Collision priority; a lower value wins.
    pub priority: f64,
    /// Whether the label participates in collision at all. Always-shown
    /// labels skip the occlusion pipeline entirely.
    pub collide: bool,
    /// Whether the label answers hit-test queries.
    pub interactive: bool,
    /// Screen offset from the projected anchor, rotated with the label.
    pub offset: Vec2,
    /// Repeat group id; `0` means no grouping.
    pub repeat_group: u64,
    /// Minimum on-screen distance to other members of the repeat group.
    pub repeat_distance: f64,
    /// Collision dimensions grow by `2 * zoom_fract * extrude_scale`,
    /// matching icons that scale toward the next zoom level.
    pub extrude_scale: Vec2,
    /// Fade-in settings.
    pub show: Transition,
    /// Fade-out settings.
    pub hide: Transition,
    /// Feature properties exposed by hit tests.
    pub properties: Properties,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            priority: 0.0,
            collide: true,
            interactive: false,
            offset: Vec2::ZERO,
            repeat_group: 0,
            repeat_distance: 0.0,
            extrude_scale: Vec2::ZERO,
            show: Transition::default(),
            hide: Transition::default(),
            properties: Properties::default(),
        }
    }
}

/// Working screen transform, updated every frame before placement runs.
#[derive(Copy, Clone, Debug)]
pub struct ScreenTransform {
    /// Projected anchor plus rotated offset, in screen units.
    pub position: Point,
    /// Rotation in radians (counter-clockwise).
    pub rotation: f64,
    /// Current animation alpha in `[0, 1]`.
    pub alpha: f64,
    /// Tile-local anchor; used for frame-stable repeat-group ordering.
    pub model_position: Point,
}

impl Default for ScreenTransform {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            rotation: 0.0,
            alpha: 0.0,
            model_position: Point::ZERO,
        }
    }
}

/// Transform committed for drawing and hit testing.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RenderState {
    /// Committed screen position.
    pub position: Point,
    /// Committed rotation in radians.
    pub rotation: f64,
    /// Committed alpha.
    pub alpha: f64,
}

/// One text or icon instance derived from tile vector data.
#[derive(Clone, Debug)]
pub struct Label {
    hash: u64,
    kind: Kind,
    anchor: Point,
    dimensions: Vec2,
    options: Options,
    parent: Option<ParentLink>,
    state: State,
    flags: LabelFlags,
    fade: Option<Fade>,
    transform: ScreenTransform,
    render: RenderState,
    obb: Obb,
    aabb: Aabb,
}

impl Label {
    /// Create a label at a tile-local anchor with screen-space dimensions.
    ///
    /// `hash` is a stable content hash used as the deterministic collision
    /// tie-breaker; builders derive it from the feature identity.
    pub fn new(hash: u64, kind: Kind, anchor: Point, dimensions: Vec2, options: Options) -> Self {
        let obb = Obb::new(Point::ZERO, 0.0, Vec2::ZERO);
        Self {
            hash,
            kind,
            anchor,
            dimensions,
            options,
            parent: None,
            state: State::Sleep,
            flags: LabelFlags::empty(),
            fade: None,
            transform: ScreenTransform::default(),
            render: RenderState::default(),
            aabb: obb.aabb(),
            obb,
        }
    }

    /// Stable content hash.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Text or icon.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Style options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Current state machine state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Full collision dimensions (before extrusion).
    pub fn dimensions(&self) -> Vec2 {
        self.dimensions
    }

    /// Working transform for this frame.
    pub fn transform(&self) -> &ScreenTransform {
        &self.transform
    }

    /// Transform last committed by [`push_transform`](Self::push_transform).
    pub fn render_state(&self) -> &RenderState {
        &self.render
    }

    /// Current oriented bounding box.
    pub fn obb(&self) -> &Obb {
        &self.obb
    }

    /// Axis-aligned envelope of the current OBB.
    pub fn aabb(&self) -> Aabb {
        self.aabb
    }

    /// Center of the current bounding box.
    pub fn center(&self) -> Point {
        self.obb.center()
    }

    /// Parent handle for composite icon+text labels.
    pub fn parent(&self) -> Option<ParentLink> {
        self.parent
    }

    /// Attach the label to a composite parent in the same tile.
    pub fn set_parent(&mut self, parent: Option<ParentLink>) {
        self.parent = parent;
    }

    /// Fixed rotation applied to the collision box and offset.
    pub fn set_rotation(&mut self, rotation: f64) {
        self.transform.rotation = rotation;
    }

    /// Whether the label participates in the occlusion pipeline.
    pub fn can_occlude(&self) -> bool {
        self.options.collide
    }

    /// Whether the label currently occupies screen space: `Visible`,
    /// either fading state, or marked to appear instantly.
    pub fn visible_state(&self) -> bool {
        matches!(
            self.state,
            State::Visible | State::FadingIn | State::FadingOut
        ) || self.flags.contains(LabelFlags::SKIP_TRANSITION)
    }

    /// Mark the label as the loser of a conflict this frame.
    pub fn occlude(&mut self) {
        self.flags.insert(LabelFlags::OCCLUDED);
    }

    /// Whether the label lost a conflict this frame.
    pub fn is_occluded(&self) -> bool {
        self.flags.contains(LabelFlags::OCCLUDED)
    }

    /// Whether the label was occluded when the previous frame resolved.
    pub fn occluded_last_frame(&self) -> bool {
        self.flags.contains(LabelFlags::OCCLUDED_LAST_FRAME)
    }

    /// Tag the label with its owning tile's proxy status for this frame.
    pub fn set_proxy(&mut self, proxy: bool) {
        self.flags.set(LabelFlags::PROXY, proxy);
    }

    /// Whether the label belongs to a proxy tile this frame.
    pub fn is_proxy(&self) -> bool {
        self.flags.contains(LabelFlags::PROXY)
    }

    /// Continuity marking: skip the fade-in and appear fully visible.
    pub fn skip_transition(&mut self) {
        self.flags.insert(LabelFlags::SKIP_TRANSITION);
    }

    /// Recompute the screen transform and bounding volumes without
    /// touching the state machine. Returns `false` when the projection is
    /// degenerate (non-finite screen coordinates).
    pub fn update_screen_transform(&mut self, model_to_screen: Affine, zoom_fract: f64) -> bool {
        let projected = model_to_screen * self.anchor;
        if !projected.x.is_finite() || !projected.y.is_finite() {
            return false;
        }
        let rotation = self.transform.rotation;
        self.transform.position = projected + rotate(self.options.offset, rotation);
        self.transform.model_position = self.anchor;
        let dims = self.dimensions + self.options.extrude_scale * (2.0 * zoom_fract);
        self.obb = Obb::new(self.transform.position, rotation, dims);
        self.aabb = self.obb.aabb();
        true
    }

    /// Per-frame update: project to screen and promote the label into the
    /// candidate pipeline. Returns `false` for a dead label, which is
    /// dropped from this frame's candidate set.
    pub fn update(&mut self, model_to_screen: Affine, zoom_fract: f64) -> bool {
        if !self.update_screen_transform(model_to_screen, zoom_fract) {
            self.state = State::Dead;
            return false;
        }
        if self.state == State::Dead {
            self.state = State::Sleep;
        }
        if self.state == State::Sleep && self.can_occlude() {
            self.state = State::WaitOcclusion;
        }
        true
    }

    /// Advance the state machine by the frame delta after occlusion has
    /// been resolved. Returns whether an animation is still running.
    ///
    /// Idempotent within a frame in the sense that the occlusion verdict
    /// is consumed exactly once: the `occluded` flag rolls into
    /// `occluded_last_frame` and is cleared.
    pub fn eval_state(&mut self, dt: f64) -> bool {
        let occluded = self.flags.contains(LabelFlags::OCCLUDED);
        let mut animating = false;
        match self.state {
            State::Visible => {
                if occluded {
                    self.fade = Some(Fade::new(Direction::Out, self.options.hide));
                    self.state = State::FadingOut;
                    animating = true;
                }
            }
            State::FadingIn => {
                if occluded {
                    self.enter_sleep();
                } else if let Some(fade) = self.fade.as_mut() {
                    self.transform.alpha = fade.update(dt);
                    animating = true;
                    if fade.finished() {
                        self.state = State::Visible;
                        self.transform.alpha = 1.0;
                        self.fade = None;
                    }
                } else {
                    self.state = State::Visible;
                    self.transform.alpha = 1.0;
                }
            }
            State::FadingOut => {
                // Runs to completion even if the conflict disappears; the
                // label re-enters through Sleep afterwards.
                if let Some(fade) = self.fade.as_mut() {
                    self.transform.alpha = fade.update(dt);
                    animating = true;
                    if fade.finished() {
                        self.enter_sleep();
                    }
                } else {
                    self.enter_sleep();
                }
            }
            State::WaitOcclusion => {
                if occluded {
                    self.enter_sleep();
                } else {
                    animating = self.begin_fade_in();
                }
            }
            State::Sleep => {
                if !occluded && !self.can_occlude() {
                    animating = self.begin_fade_in();
                }
            }
            State::Dead => {}
        }
        self.flags.set(LabelFlags::OCCLUDED_LAST_FRAME, occluded);
        self.flags.remove(LabelFlags::OCCLUDED);
        animating
    }

    /// Commit the working transform for drawing and hit testing.
    pub fn push_transform(&mut self) {
        self.render = RenderState {
            position: self.transform.position,
            rotation: self.transform.rotation,
            alpha: self.transform.alpha,
        };
    }

    fn enter_sleep(&mut self) {
        self.state = State::Sleep;
        self.transform.alpha = 0.0;
        self.fade = None;
    }

    fn begin_fade_in(&mut self) -> bool {
        if self.flags.contains(LabelFlags::SKIP_TRANSITION) || self.options.show.duration <= 0.0 {
            self.flags.remove(LabelFlags::SKIP_TRANSITION);
            self.state = State::Visible;
            self.transform.alpha = 1.0;
            false
        } else {
            self.fade = Some(Fade::new(Direction::In, self.options.show));
            self.state = State::FadingIn;
            self.transform.alpha = 0.0;
            true
        }
    }
}

fn rotate(v: Vec2, rotation: f64) -> Vec2 {
    if rotation == 0.0 {
        return v;
    }
    let r = Vec2::from_angle(rotation);
    Vec2::new(v.x * r.x - v.y * r.y, v.x * r.y + v.y * r.x)
}
