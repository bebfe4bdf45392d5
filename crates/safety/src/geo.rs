//! Spherical-earth geodesy: great-circle distance, forward azimuth and the
//! inverse (destination) problem.
//!
//! All angles at this boundary are decimal degrees; bearings follow the
//! compass convention (0 = north, clockwise).

use serde::{Deserialize, Serialize};

use crate::config::EARTH_RADIUS_METERS;

/// A position fix as delivered by the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    /// Direction of travel in degrees, when the provider can determine it.
    #[serde(default)]
    pub heading: Option<f64>,
}

impl GeoCoordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            heading: None,
        }
    }

    pub const fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    /// True once the provider has produced a usable latitude/longitude pair.
    pub fn has_fix(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

impl std::fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Normalize an angle in degrees into `[0, 360)`. Non-finite input maps to 0.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped + 0.0
    }
}

/// Normalize an optional heading; an unknown heading counts as north.
pub fn normalize_heading(heading: Option<f64>) -> f64 {
    heading.map_or(0.0, normalize_degrees)
}

/// Haversine great-circle distance in meters.
pub fn distance_meters(a: &GeoCoordinate, b: &GeoCoordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing (forward azimuth) from `from` to `to`, in `[0, 360)`.
///
/// Coincident points yield 0.
pub fn initial_bearing_degrees(from: &GeoCoordinate, to: &GeoCoordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    normalize_degrees(y.atan2(x).to_degrees())
}

/// Point reached by travelling `distance_meters` from `from` along the initial
/// bearing `bearing_degrees`. The heading of `from` is not carried over.
pub fn destination(from: &GeoCoordinate, bearing_degrees: f64, distance_meters: f64) -> GeoCoordinate {
    let lat1 = from.latitude.to_radians();
    let lon1 = from.longitude.to_radians();
    let theta = bearing_degrees.to_radians();
    let delta = distance_meters / EARTH_RADIUS_METERS;

    let sin_lat2 = lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * sin_lat2);

    let longitude = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    GeoCoordinate::new(lat2.to_degrees(), longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZONE: GeoCoordinate = GeoCoordinate::new(50.86, -1.28);

    #[test]
    fn test_normalize_degrees_wraps_into_range() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(725.0), 5.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(-720.0), 0.0);
        let tiny = normalize_degrees(-1e-20);
        assert!((0.0..360.0).contains(&tiny), "got {tiny}");
    }

    #[test]
    fn test_normalize_degrees_non_finite_is_zero() {
        assert_eq!(normalize_degrees(f64::NAN), 0.0);
        assert_eq!(normalize_degrees(f64::INFINITY), 0.0);
        assert_eq!(normalize_degrees(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_normalize_heading_unknown_is_north() {
        assert_eq!(normalize_heading(None), 0.0);
        assert_eq!(normalize_heading(Some(-45.0)), 315.0);
    }

    #[test]
    fn test_distance_one_degree_latitude() {
        let a = GeoCoordinate::new(0.0, 0.0);
        let b = GeoCoordinate::new(1.0, 0.0);
        let d = distance_meters(&a, &b);
        // 2 * pi * R / 360
        assert!((d - 111_194.9).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_distance_is_symmetric_and_zero_on_self() {
        let b = GeoCoordinate::new(50.861, -1.2785);
        assert_eq!(distance_meters(&ZONE, &ZONE), 0.0);
        let ab = distance_meters(&ZONE, &b);
        let ba = distance_meters(&b, &ZONE);
        assert!((ab - ba).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = GeoCoordinate::new(0.0, 0.0);
        let north = initial_bearing_degrees(&origin, &GeoCoordinate::new(1.0, 0.0));
        let east = initial_bearing_degrees(&origin, &GeoCoordinate::new(0.0, 1.0));
        let south = initial_bearing_degrees(&origin, &GeoCoordinate::new(-1.0, 0.0));
        let west = initial_bearing_degrees(&origin, &GeoCoordinate::new(0.0, -1.0));
        assert!(north.abs() < 1e-9, "north: {north}");
        assert!((east - 90.0).abs() < 1e-9, "east: {east}");
        assert!((south - 180.0).abs() < 1e-9, "south: {south}");
        assert!((west - 270.0).abs() < 1e-9, "west: {west}");
    }

    #[test]
    fn test_destination_matches_distance_and_bearing() {
        for bearing in [0.0, 45.0, 135.0, 200.0, 315.0] {
            let p = destination(&ZONE, bearing, 350.0);
            let d = distance_meters(&ZONE, &p);
            assert!((d - 350.0).abs() < 1e-3, "bearing {bearing}: distance {d}");
            let b = initial_bearing_degrees(&ZONE, &p);
            assert!((b - bearing).abs() < 1e-3, "bearing {bearing}: got {b}");
        }
    }

    #[test]
    fn test_destination_wraps_antimeridian() {
        let p = destination(&GeoCoordinate::new(0.0, 179.999), 90.0, 1_000.0);
        assert!(p.longitude < -179.0, "got {}", p.longitude);
    }

    #[test]
    fn test_has_fix() {
        assert!(ZONE.has_fix());
        assert!(!GeoCoordinate::new(f64::NAN, 0.0).has_fix());
    }
}
