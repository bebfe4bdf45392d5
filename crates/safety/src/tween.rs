//! Time-based angle interpolation for the compass needle and safe arc.
//!
//! A transition is a start angle, a target angle and an elapsed time over a
//! fixed window. Setting a new target restarts the window from wherever the
//! current transition has got to; targets are never queued.

use std::time::Duration;

use bevy::prelude::*;

use crate::config::COMPASS_TRANSITION;
use crate::geo::normalize_degrees;

/// Interpolates an angle in degrees along the shorter way round the circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleTween {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
}

impl AngleTween {
    /// A tween already resting at `degrees`.
    pub fn settled(degrees: f64) -> Self {
        let degrees = normalize_degrees(degrees);
        Self {
            from: degrees,
            to: degrees,
            elapsed: COMPASS_TRANSITION,
            duration: COMPASS_TRANSITION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self.elapsed = self.elapsed.min(duration);
        self
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    /// Fraction of the window elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current interpolated angle in `[0, 360)`.
    pub fn value(&self) -> f64 {
        let eased = ease_in_out_cubic(self.progress());
        normalize_degrees(self.from + shortest_delta(self.from, self.to) * eased)
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    /// Aim at a new angle. Returns false if `degrees` is already the target.
    pub fn retarget(&mut self, degrees: f64) -> bool {
        let degrees = normalize_degrees(degrees);
        if shortest_delta(self.to, degrees).abs() < 1e-9 {
            return false;
        }
        self.from = self.value();
        self.to = degrees;
        self.elapsed = Duration::ZERO;
        true
    }
}

/// Signed difference `to - from` wrapped into `[-180, 180)`.
fn shortest_delta(from: f64, to: f64) -> f64 {
    (to - from + 540.0).rem_euclid(360.0) - 180.0
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Animated heading and safe bearing feeding the compass glyph.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CompassAnimation {
    pub heading: AngleTween,
    pub bearing: AngleTween,
}

impl Default for CompassAnimation {
    fn default() -> Self {
        Self {
            heading: AngleTween::settled(0.0),
            bearing: AngleTween::settled(0.0),
        }
    }
}

impl CompassAnimation {
    pub fn advance(&mut self, dt: Duration) {
        self.heading.advance(dt);
        self.bearing.advance(dt);
    }

    pub fn is_settled(&self) -> bool {
        self.heading.is_finished() && self.bearing.is_finished()
    }
}
