use bevy::prelude::*;

pub mod compass;
pub mod config;
pub mod geo;
pub mod hazard;
pub mod location;
pub mod presentation;
pub mod screen;
pub mod systems;
pub mod tween;
pub mod zones;

#[cfg(test)]
mod integration_tests;
#[cfg(test)]
pub mod test_harness;

use compass::CompassGeometry;
use hazard::{DangerLevel, HazardEvaluator};
use location::WatchOptions;
use screen::{ScreenEvent, ScreenState};
use tween::CompassAnimation;
use zones::{IncidentZones, ZoneId};

// ---------------------------------------------------------------------------
// Shared resources and events
// ---------------------------------------------------------------------------

/// Side of the square compass viewport in pixels.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct CompassViewport(pub f32);

/// Options used when subscribing to location updates.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct LocationWatchOptions(pub WatchOptions);

/// Glyph for the current frame. `None` while the danger level is safe.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CompassGlyph(pub Option<CompassGeometry>);

/// Fired whenever the danger level or the nearest zone changes.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DangerLevelChanged {
    pub previous: DangerLevel,
    pub current: DangerLevel,
    pub zone: Option<ZoneId>,
}

/// Frame order of the safety screen systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SafetySet {
    Location,
    Transition,
    Animation,
    Glyph,
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

/// Wires hazard evaluation, the screen state machine and the compass glyph
/// into an app. The host inserts a [`location::LocationSource`] before the
/// first update; without one the screen stays in the safe state.
#[derive(Clone)]
pub struct SafetyScreenPlugin {
    pub zones: IncidentZones,
    pub viewport_size: f32,
    pub watch_options: WatchOptions,
}

impl SafetyScreenPlugin {
    pub fn new(zones: IncidentZones) -> Self {
        Self {
            zones,
            viewport_size: config::DEFAULT_VIEWPORT_SIZE,
            watch_options: WatchOptions::default(),
        }
    }

    pub fn with_viewport_size(mut self, size: f32) -> Self {
        self.viewport_size = size;
        self
    }

    pub fn with_watch_options(mut self, options: WatchOptions) -> Self {
        self.watch_options = options;
        self
    }
}

impl Plugin for SafetyScreenPlugin {
    fn build(&self, app: &mut App) {
        info!(
            "Safety screen: {} incident zone(s), {}px compass",
            self.zones.len(),
            self.viewport_size
        );

        app.insert_resource(HazardEvaluator::new(self.zones.clone()))
            .insert_resource(CompassViewport(self.viewport_size))
            .insert_resource(LocationWatchOptions(self.watch_options))
            .init_resource::<ScreenState>()
            .init_resource::<CompassAnimation>()
            .init_resource::<CompassGlyph>()
            .add_event::<ScreenEvent>()
            .add_event::<DangerLevelChanged>()
            .configure_sets(
                Update,
                (
                    SafetySet::Location,
                    SafetySet::Transition,
                    SafetySet::Animation,
                    SafetySet::Glyph,
                )
                    .chain(),
            )
            .add_systems(Startup, systems::mount_location_source)
            .add_systems(
                Update,
                (
                    systems::pump_location_source.in_set(SafetySet::Location),
                    (
                        systems::apply_screen_events,
                        systems::release_location_on_teardown,
                    )
                        .chain()
                        .in_set(SafetySet::Transition),
                    (
                        systems::retarget_compass_animation,
                        systems::advance_compass_animation,
                    )
                        .chain()
                        .in_set(SafetySet::Animation),
                    systems::update_compass_glyph.in_set(SafetySet::Glyph),
                ),
            )
            .add_systems(Last, systems::teardown_on_exit);
    }
}
