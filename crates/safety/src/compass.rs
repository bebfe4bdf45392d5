//! Compass glyph geometry.
//!
//! The glyph is a circle split into two half-circle arcs: the safe arc,
//! centered on the way out of the zone relative to the device heading, and
//! its complement. A short needle near the top of the circle marks the
//! direction the device is facing. Pointing the device so that the needle
//! sits inside the safe arc means heading within 90 degrees of the
//! safe bearing.
//!
//! All points are in pixel space of a square viewport (y grows downward),
//! angles in radians measured from +x towards +y.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bevy::math::Vec2;

use crate::config::{COMPASS_RADIUS_RATIO, NEEDLE_INSET_PX, NEEDLE_LENGTH_RATIO};
use crate::geo::{normalize_degrees, normalize_heading};

/// The needle always points straight up from the center.
pub const NEEDLE_ANGLE: f32 = -FRAC_PI_2;

/// Square viewport side for a window: the smaller of the two dimensions.
pub fn viewport_size(width: f32, height: f32) -> f32 {
    width.min(height).max(0.0)
}

/// Geometry of one compass frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompassGeometry {
    pub center: Vec2,
    pub radius: f32,
    /// Angle of the safe direction relative to the device facing, radians.
    pub relative_safe_angle: f32,
    /// Where the safe arc starts (and the unsafe arc ends).
    pub arc_start: Vec2,
    /// Where the safe arc ends (and the unsafe arc starts), half a turn away.
    pub arc_end: Vec2,
    pub needle_start: Vec2,
    pub needle_end: Vec2,
}

/// Compute the glyph for a safe bearing and the current device heading.
///
/// Both angles are normalized to `[0, 360)`; an unknown heading counts as 0.
/// A non-finite or negative viewport collapses the glyph onto the origin.
pub fn compute_glyph(
    safe_bearing_degrees: f64,
    current_heading_degrees: Option<f64>,
    viewport_size: f32,
) -> CompassGeometry {
    let bearing = normalize_degrees(safe_bearing_degrees);
    let heading = normalize_heading(current_heading_degrees);
    let relative_safe_angle = ((bearing - heading) as f32).to_radians();

    let size = viewport_size.max(0.0);
    let c = size / 2.0;
    let center = Vec2::splat(c);
    let radius = c * COMPASS_RADIUS_RATIO;

    let arc_start = point_on_circle(center, radius, relative_safe_angle);
    let arc_end = point_on_circle(center, radius, relative_safe_angle + PI);

    let needle_start = Vec2::new(c, c - radius + NEEDLE_INSET_PX.min(radius));
    let needle_end = needle_start + Vec2::new(0.0, radius * NEEDLE_LENGTH_RATIO);

    CompassGeometry {
        center,
        radius,
        relative_safe_angle,
        arc_start,
        arc_end,
        needle_start,
        needle_end,
    }
}

fn point_on_circle(center: Vec2, radius: f32, angle: f32) -> Vec2 {
    center + radius * Vec2::new(angle.cos(), angle.sin())
}

/// Wrap an angle into `(-PI, PI]`.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

impl CompassGeometry {
    /// Midpoint of the safe arc. The arcs sweep toward decreasing angle, so
    /// the safe arc bulges a quarter turn before its start point.
    pub fn safe_arc_midpoint(&self) -> Vec2 {
        point_on_circle(self.center, self.radius, self.relative_safe_angle - FRAC_PI_2)
    }

    /// Point on the circle the needle is aimed at.
    pub fn needle_direction_point(&self) -> Vec2 {
        point_on_circle(self.center, self.radius, NEEDLE_ANGLE)
    }

    /// True when the needle lies within the safe half-circle.
    pub fn is_heading_safe(&self) -> bool {
        wrap_angle(self.relative_safe_angle).abs() <= FRAC_PI_2
    }

    /// Vector path of the safe (green) half-circle.
    pub fn safe_arc_path(&self) -> String {
        arc_path(self.arc_start, self.arc_end, self.radius)
    }

    /// Vector path of the complementary half-circle, filled with the alert color.
    pub fn unsafe_arc_path(&self) -> String {
        arc_path(self.arc_end, self.arc_start, self.radius)
    }

    pub fn needle_path(&self) -> String {
        format!(
            "M {} {} v {}",
            self.needle_start.x,
            self.needle_start.y,
            self.needle_end.y - self.needle_start.y
        )
    }
}

fn arc_path(from: Vec2, to: Vec2, radius: f32) -> String {
    format!(
        "M {} {} A {} {} 0 1 0 {} {}",
        from.x, from.y, radius, radius, to.x, to.y
    )
}
