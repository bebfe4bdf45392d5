use std::time::Duration;

/// Mean Earth radius in meters for the spherical (haversine) model.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Compass circle radius as a fraction of half the viewport.
pub const COMPASS_RADIUS_RATIO: f32 = 0.8;
/// Needle starts this many pixels inside the top of the compass circle.
pub const NEEDLE_INSET_PX: f32 = 2.0;
/// Needle length as a fraction of the compass radius.
pub const NEEDLE_LENGTH_RATIO: f32 = 0.1;
/// Stroke widths used by the vector renderer.
pub const ARC_STROKE_WIDTH: f32 = 2.0;
pub const NEEDLE_STROKE_WIDTH: f32 = 5.0;

/// Duration of a needle/arc transition towards a new target angle.
pub const COMPASS_TRANSITION: Duration = Duration::from_millis(1200);

/// Default location watch: high accuracy, fixes at most 1 s old, 1 m minimum movement.
pub const WATCH_HIGH_ACCURACY: bool = true;
pub const WATCH_MAX_CACHE_AGE: Duration = Duration::from_millis(1000);
pub const WATCH_MIN_DISTANCE_FILTER_METERS: f64 = 1.0;

/// Viewport side used when the host does not report a window size.
pub const DEFAULT_VIEWPORT_SIZE: f32 = 360.0;
