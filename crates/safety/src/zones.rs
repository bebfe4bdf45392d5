//! Incident zone configuration.
//!
//! Zones are defined once at startup, validated as a whole, and never mutated
//! afterwards. Assessments refer to a zone by [`ZoneId`] rather than holding a
//! copy of it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::GeoCoordinate;

/// A fixed area of elevated risk: a center and two concentric radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentZone {
    pub title: String,
    pub center: GeoCoordinate,
    /// Inner radius. Crossing inward raises the highest alert.
    pub safe_distance_meters: f64,
    /// Outer radius. Crossing inward raises a warning.
    pub warning_distance_meters: f64,
}

impl IncidentZone {
    pub fn new(
        title: impl Into<String>,
        latitude: f64,
        longitude: f64,
        safe_distance_meters: f64,
        warning_distance_meters: f64,
    ) -> Self {
        Self {
            title: title.into(),
            center: GeoCoordinate::new(latitude, longitude),
            safe_distance_meters,
            warning_distance_meters,
        }
    }

    fn validate(&self) -> Result<(), ZoneConfigError> {
        let c = &self.center;
        if !c.has_fix()
            || !(-90.0..=90.0).contains(&c.latitude)
            || !(-180.0..=180.0).contains(&c.longitude)
        {
            return Err(ZoneConfigError::InvalidCenter {
                title: self.title.clone(),
                latitude: c.latitude,
                longitude: c.longitude,
            });
        }
        for radius in [self.safe_distance_meters, self.warning_distance_meters] {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(ZoneConfigError::InvalidRadius {
                    title: self.title.clone(),
                    radius,
                });
            }
        }
        if self.safe_distance_meters >= self.warning_distance_meters {
            return Err(ZoneConfigError::InvertedRadii {
                title: self.title.clone(),
                safe_distance_meters: self.safe_distance_meters,
                warning_distance_meters: self.warning_distance_meters,
            });
        }
        Ok(())
    }
}

/// Index of a zone within its [`IncidentZones`] list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ZoneId(pub usize);

/// A validated, read-only list of incident zones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentZones {
    zones: Vec<IncidentZone>,
}

impl IncidentZones {
    /// Validate every zone, failing on the first bad record.
    pub fn new(zones: Vec<IncidentZone>) -> Result<Self, ZoneConfigError> {
        for zone in &zones {
            zone.validate()?;
        }
        Ok(Self { zones })
    }

    /// The incidents shipped with the application.
    pub fn builtin() -> Result<Self, ZoneConfigError> {
        Self::new(vec![
            IncidentZone::new("Major fire brigade operation", 50.86, -1.28, 300.0, 400.0),
            IncidentZone::new("Aerial bomb defusal", 37.346, -122.043, 1950.0, 2250.0),
        ])
    }

    pub fn get(&self, id: ZoneId) -> Option<&IncidentZone> {
        self.zones.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneId, &IncidentZone)> {
        self.zones.iter().enumerate().map(|(i, z)| (ZoneId(i), z))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// A zone record that cannot be used for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneConfigError {
    /// Center is not a finite latitude/longitude within range.
    InvalidCenter {
        title: String,
        latitude: f64,
        longitude: f64,
    },
    /// A radius is zero, negative, or not finite.
    InvalidRadius { title: String, radius: f64 },
    /// The inner (safe) radius is not strictly smaller than the warning radius.
    InvertedRadii {
        title: String,
        safe_distance_meters: f64,
        warning_distance_meters: f64,
    },
}

impl fmt::Display for ZoneConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneConfigError::InvalidCenter {
                title,
                latitude,
                longitude,
            } => write!(
                f,
                "zone '{title}': invalid center ({latitude}, {longitude})"
            ),
            ZoneConfigError::InvalidRadius { title, radius } => {
                write!(f, "zone '{title}': radius must be positive, got {radius}")
            }
            ZoneConfigError::InvertedRadii {
                title,
                safe_distance_meters,
                warning_distance_meters,
            } => write!(
                f,
                "zone '{title}': safe distance {safe_distance_meters} m must be less than warning distance {warning_distance_meters} m"
            ),
        }
    }
}

impl std::error::Error for ZoneConfigError {}
