//! Screen state as an explicit transition function.
//!
//! The host event loop feeds [`ScreenEvent`]s through
//! [`ScreenState::transition`]; nothing else mutates the state. Every
//! position change re-runs the hazard evaluation, so the stored assessment
//! always matches the stored position.

use bevy::prelude::*;

use crate::geo::GeoCoordinate;
use crate::hazard::{HazardAssessment, HazardEvaluator};
use crate::location::{LocationError, LocationUpdate};

/// Lifecycle of the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScreenPhase {
    #[default]
    Unmounted,
    Mounted,
    TornDown,
}

/// Input to the screen state machine.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum ScreenEvent {
    Mounted,
    /// Answer to the one-shot current position request.
    InitialFix(GeoCoordinate),
    /// Fix from the watch subscription.
    PositionChanged(GeoCoordinate),
    LocationFailed(LocationError),
    Unmounted,
}

impl From<LocationUpdate> for ScreenEvent {
    fn from(update: LocationUpdate) -> Self {
        match update {
            LocationUpdate::Current(fix) => ScreenEvent::InitialFix(fix),
            LocationUpdate::Watch(fix) => ScreenEvent::PositionChanged(fix),
            LocationUpdate::Failed(err) => ScreenEvent::LocationFailed(err),
        }
    }
}

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenState {
    pub phase: ScreenPhase,
    pub initial_position: Option<GeoCoordinate>,
    pub current_position: Option<GeoCoordinate>,
    pub assessment: HazardAssessment,
    pub last_error: Option<LocationError>,
}

impl ScreenState {
    /// Heading reported with the current fix, if any.
    pub fn current_heading(&self) -> Option<f64> {
        self.current_position.and_then(|p| p.heading)
    }

    /// Apply one event, returning the next state.
    ///
    /// Events other than `Mounted` are ignored until the screen is mounted,
    /// and everything is ignored once it has been torn down.
    pub fn transition(&self, event: &ScreenEvent, evaluator: &HazardEvaluator) -> ScreenState {
        let mut next = *self;
        match (self.phase, event) {
            (ScreenPhase::Unmounted, ScreenEvent::Mounted) => {
                next.phase = ScreenPhase::Mounted;
            }
            (ScreenPhase::Mounted, ScreenEvent::InitialFix(fix)) => {
                next.initial_position = Some(*fix);
                // A watch fix is always newer than the one-shot answer.
                if self.current_position.is_none() {
                    next = next.with_position(*fix, evaluator);
                }
            }
            (ScreenPhase::Mounted, ScreenEvent::PositionChanged(fix)) => {
                next = next.with_position(*fix, evaluator);
            }
            (ScreenPhase::Mounted, ScreenEvent::LocationFailed(err)) => {
                next.last_error = Some(*err);
            }
            (ScreenPhase::Mounted, ScreenEvent::Unmounted) => {
                next.phase = ScreenPhase::TornDown;
            }
            _ => {}
        }
        next
    }

    fn with_position(mut self, fix: GeoCoordinate, evaluator: &HazardEvaluator) -> ScreenState {
        if !fix.has_fix() {
            return self;
        }
        self.current_position = Some(fix);
        self.assessment = evaluator.evaluate(Some(&fix));
        self.last_error = None;
        self
    }
}
