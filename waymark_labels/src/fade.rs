// Copyright 2025 the Waymark Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fade animation helper driving label alpha during show/hide transitions.

/// Easing applied to the fade parameter.
///
/// All variants are polynomial so the crate stays free of transcendental
/// float calls; `Smooth` (smoothstep) stands in for a sine ease.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant-rate fade.
    #[default]
    Linear,
    /// Quadratic ease-in (`t * t`).
    Pow,
    /// Smoothstep (`t * t * (3 - 2t)`), eases both ends.
    Smooth,
}

/// Style-supplied transition settings for one fade direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transition {
    /// Easing curve.
    pub easing: Easing,
    /// Animation time in seconds. Zero means the transition is instant.
    pub duration: f64,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            easing: Easing::Linear,
            duration: 0.2,
        }
    }
}

/// Direction of a running fade.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Alpha rises from 0 to 1.
    In,
    /// Alpha falls from 1 to 0.
    Out,
}

/// A running fade: accumulates frame deltas and yields the current alpha.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fade {
    direction: Direction,
    easing: Easing,
    duration: f64,
    elapsed: f64,
}

impl Fade {
    /// Start a fade in the given direction with the style's transition.
    pub fn new(direction: Direction, transition: Transition) -> Self {
        Self {
            direction,
            easing: transition.easing,
            duration: transition.duration,
            elapsed: 0.0,
        }
    }

    /// Advance by the frame delta and return the current alpha in `[0, 1]`.
    pub fn update(&mut self, dt: f64) -> f64 {
        self.elapsed += dt;
        let t = if self.duration > 0.0 {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let eased = match self.easing {
            Easing::Linear => t,
            Easing::Pow => t * t,
            Easing::Smooth => t * t * (3.0 - 2.0 * t),
        };
        match self.direction {
            Direction::In => eased,
            Direction::Out => 1.0 - eased,
        }
    }

    /// Whether the fade has run its full duration.
    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_fade_in_progresses() {
        let mut f = Fade::new(
            Direction::In,
            Transition {
                easing: Easing::Linear,
                duration: 1.0,
            },
        );
        assert_eq!(f.update(0.25), 0.25);
        assert_eq!(f.update(0.25), 0.5);
        assert!(!f.finished());
        assert_eq!(f.update(0.5), 1.0);
        assert!(f.finished());
    }

    #[test]
    fn fade_out_inverts_alpha() {
        let mut f = Fade::new(
            Direction::Out,
            Transition {
                easing: Easing::Linear,
                duration: 1.0,
            },
        );
        assert_eq!(f.update(0.25), 0.75);
        assert_eq!(f.update(1.0), 0.0);
    }

    #[test]
    fn zero_duration_is_instant() {
        let mut f = Fade::new(Direction::In, Transition {
            easing: Easing::Pow,
            duration: 0.0,
        });
        assert_eq!(f.update(0.0), 1.0);
        assert!(f.finished());
    }

    #[test]
    fn smooth_eases_both_ends() {
        let mut f = Fade::new(
            Direction::In,
            Transition {
                easing: Easing::Smooth,
                duration: 1.0,
            },
        );
        let quarter = f.update(0.25);
        assert!(quarter < 0.25, "smoothstep starts slow");
        let mut g = Fade::new(
            Direction::In,
            Transition {
                easing: Easing::Smooth,
                duration: 1.0,
            },
        );
        assert_eq!(g.update(0.5), 0.5, "smoothstep midpoint is exact");
    }
}
