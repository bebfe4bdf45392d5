//! Hazard evaluation: classify the current position against every incident
//! zone and pick the one that matters.
//!
//! Zones whose warning radius contains the position form the warning set; the
//! subset whose safe radius also contains it forms the alert set. The nearest
//! member of the most severe non-empty set wins. Evaluation is a pure function
//! and runs on every location update.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geo::{distance_meters, initial_bearing_degrees, normalize_degrees, GeoCoordinate};
use crate::zones::{IncidentZone, IncidentZones, ZoneId};

/// Tri-state classification driving messaging and compass visibility.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum DangerLevel {
    #[default]
    Safe,
    Warning,
    Alert,
}

impl DangerLevel {
    /// Numeric severity: 0 = safe, 1 = warning, 2 = alert.
    pub fn level(self) -> u8 {
        match self {
            DangerLevel::Safe => 0,
            DangerLevel::Warning => 1,
            DangerLevel::Alert => 2,
        }
    }

    pub fn is_safe(self) -> bool {
        self == DangerLevel::Safe
    }
}

/// Result of evaluating one position. Superseded by the next evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardAssessment {
    pub danger_level: DangerLevel,
    pub nearest_zone: Option<ZoneId>,
    /// Forward azimuth from the position to the nearest zone's center, `[0, 360)`.
    pub recommended_bearing_degrees: f64,
    /// `warning_distance - distance_to_center`; not clamped at zero.
    pub distance_from_border_meters: f64,
    pub distance_to_center_meters: f64,
}

impl HazardAssessment {
    /// Bearing pointing directly away from the nearest zone's center. The
    /// compass centers its safe arc on this direction.
    pub fn escape_bearing_degrees(&self) -> f64 {
        normalize_degrees(self.recommended_bearing_degrees + 180.0)
    }
}

/// Evaluate `position` against `zones`.
///
/// `None` (or a fix without finite coordinates) is the startup state and
/// always yields a safe assessment with zero bearing and distance.
pub fn evaluate(position: Option<&GeoCoordinate>, zones: &IncidentZones) -> HazardAssessment {
    let Some(position) = position.filter(|p| p.has_fix()) else {
        return HazardAssessment::default();
    };

    let mut nearest_warning: Option<(ZoneId, &IncidentZone, f64)> = None;
    let mut nearest_alert: Option<(ZoneId, &IncidentZone, f64)> = None;

    for (id, zone) in zones.iter() {
        let distance = distance_meters(position, &zone.center);
        if distance >= zone.warning_distance_meters {
            continue;
        }
        // Strict comparison keeps the earlier zone on ties.
        if nearest_warning.is_none_or(|(_, _, d)| distance < d) {
            nearest_warning = Some((id, zone, distance));
        }
        if distance < zone.safe_distance_meters && nearest_alert.is_none_or(|(_, _, d)| distance < d)
        {
            nearest_alert = Some((id, zone, distance));
        }
    }

    let (danger_level, (id, zone, distance)) = match (nearest_alert, nearest_warning) {
        (Some(hit), _) => (DangerLevel::Alert, hit),
        (None, Some(hit)) => (DangerLevel::Warning, hit),
        (None, None) => return HazardAssessment::default(),
    };

    HazardAssessment {
        danger_level,
        nearest_zone: Some(id),
        recommended_bearing_degrees: initial_bearing_degrees(position, &zone.center),
        distance_from_border_meters: zone.warning_distance_meters - distance,
        distance_to_center_meters: distance,
    }
}

/// Evaluator resource holding the validated zone configuration.
#[derive(Resource, Debug, Clone)]
pub struct HazardEvaluator {
    zones: IncidentZones,
}

impl HazardEvaluator {
    pub fn new(zones: IncidentZones) -> Self {
        Self { zones }
    }

    pub fn zones(&self) -> &IncidentZones {
        &self.zones
    }

    pub fn zone(&self, id: ZoneId) -> Option<&IncidentZone> {
        self.zones.get(id)
    }

    pub fn evaluate(&self, position: Option<&GeoCoordinate>) -> HazardAssessment {
        evaluate(position, &self.zones)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::destination;

    fn fire_zone() -> IncidentZone {
        IncidentZone::new("fire", 50.86, -1.28, 300.0, 400.0)
    }

    fn single(zone: IncidentZone) -> IncidentZones {
        IncidentZones::new(vec![zone]).unwrap()
    }

    #[test]
    fn test_danger_level_ordering() {
        assert!(DangerLevel::Safe < DangerLevel::Warning);
        assert!(DangerLevel::Warning < DangerLevel::Alert);
        assert_eq!(DangerLevel::Alert.level(), 2);
        assert_eq!(DangerLevel::default(), DangerLevel::Safe);
    }

    #[test]
    fn test_no_fix_is_safe_zero_state() {
        let zones = single(fire_zone());
        let a = evaluate(None, &zones);
        assert_eq!(a.danger_level, DangerLevel::Safe);
        assert_eq!(a.nearest_zone, None);
        assert_eq!(a.recommended_bearing_degrees, 0.0);
        assert_eq!(a.distance_from_border_meters, 0.0);

        let unset = GeoCoordinate::new(f64::NAN, -1.28);
        assert_eq!(evaluate(Some(&unset), &zones), HazardAssessment::default());
    }

    #[test]
    fn test_warning_scenario_350m() {
        let zone = fire_zone();
        let position = destination(&zone.center, 180.0, 350.0);
        let a = evaluate(Some(&position), &single(zone));
        assert_eq!(a.danger_level, DangerLevel::Warning);
        assert_eq!(a.nearest_zone, Some(ZoneId(0)));
        assert!(
            (a.distance_from_border_meters - 50.0).abs() < 0.5,
            "got {}",
            a.distance_from_border_meters
        );
    }

    #[test]
    fn test_alert_scenario_200m() {
        let zone = fire_zone();
        let position = destination(&zone.center, 90.0, 200.0);
        let a = evaluate(Some(&position), &single(zone));
        assert_eq!(a.danger_level, DangerLevel::Alert);
        assert!((a.distance_from_border_meters - 200.0).abs() < 0.5);
    }

    #[test]
    fn test_outside_warning_radius_is_safe() {
        let zone = fire_zone();
        let position = destination(&zone.center, 45.0, 401.0);
        let a = evaluate(Some(&position), &single(zone));
        assert_eq!(a.danger_level, DangerLevel::Safe);
        assert_eq!(a.nearest_zone, None);
    }

    #[test]
    fn test_bearing_points_from_position_to_center() {
        let zone = fire_zone();
        // Position due south of the center: the center lies to the north.
        let position = destination(&zone.center, 180.0, 250.0);
        let a = evaluate(Some(&position), &single(zone));
        let north_error = a.recommended_bearing_degrees.min(360.0 - a.recommended_bearing_degrees);
        assert!(north_error < 0.01, "got {}", a.recommended_bearing_degrees);
        assert!((a.escape_bearing_degrees() - 180.0).abs() < 0.01);
    }

    #[test]
    fn test_alert_preferred_over_nearer_warning() {
        // Zone A: position sits 150 m from its center, inside its warning ring only.
        // Zone B: position sits 180 m from its center, inside its safe ring.
        let origin = GeoCoordinate::new(10.0, 10.0);
        let a_center = destination(&origin, 0.0, 150.0);
        let b_center = destination(&origin, 180.0, 180.0);
        let zones = IncidentZones::new(vec![
            IncidentZone::new("A", a_center.latitude, a_center.longitude, 100.0, 200.0),
            IncidentZone::new("B", b_center.latitude, b_center.longitude, 190.0, 400.0),
        ])
        .unwrap();
        let a = evaluate(Some(&origin), &zones);
        assert_eq!(a.danger_level, DangerLevel::Alert);
        assert_eq!(a.nearest_zone, Some(ZoneId(1)));
    }

    #[test]
    fn test_nearest_warning_zone_selected() {
        let origin = GeoCoordinate::new(-33.0, 151.0);
        let far = destination(&origin, 90.0, 900.0);
        let near = destination(&origin, 270.0, 700.0);
        let zones = IncidentZones::new(vec![
            IncidentZone::new("far", far.latitude, far.longitude, 500.0, 1000.0),
            IncidentZone::new("near", near.latitude, near.longitude, 500.0, 1000.0),
        ])
        .unwrap();
        let a = evaluate(Some(&origin), &zones);
        assert_eq!(a.danger_level, DangerLevel::Warning);
        assert_eq!(a.nearest_zone, Some(ZoneId(1)));
        assert!((a.distance_to_center_meters - 700.0).abs() < 0.01);
    }

    #[test]
    fn test_equidistant_zones_keep_configuration_order() {
        let origin = GeoCoordinate::new(0.0, 0.0);
        let east = destination(&origin, 90.0, 100.0);
        let west = destination(&origin, 270.0, 100.0);
        let zones = IncidentZones::new(vec![
            IncidentZone::new("east", east.latitude, east.longitude, 50.0, 150.0),
            IncidentZone::new("west", west.latitude, west.longitude, 50.0, 150.0),
        ])
        .unwrap();
        let a = evaluate(Some(&origin), &zones);
        assert_eq!(a.nearest_zone, Some(ZoneId(0)));
    }

    #[test]
    fn test_evaluator_resource_delegates() {
        let evaluator = HazardEvaluator::new(IncidentZones::builtin().unwrap());
        let at_fire = GeoCoordinate::new(50.86, -1.28);
        let a = evaluator.evaluate(Some(&at_fire));
        assert_eq!(a.danger_level, DangerLevel::Alert);
        let zone = evaluator.zone(a.nearest_zone.unwrap()).unwrap();
        assert_eq!(zone.title, "Major fire brigade operation");
        assert!((a.distance_from_border_meters - 400.0).abs() < 1e-9);
    }
}
