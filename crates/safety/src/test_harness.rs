//! # TestScreen: headless harness for the safety screen
//!
//! Wraps a `bevy::app::App` with `MinimalPlugins`, [`SafetyScreenPlugin`] and
//! a [`ScriptedProvider`], stepping time manually so compass transitions are
//! deterministic.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::geo::GeoCoordinate;
use crate::hazard::{DangerLevel, HazardAssessment};
use crate::location::{LocationSource, LocationUpdate, ScriptedFeed, ScriptedProvider};
use crate::screen::{ScreenEvent, ScreenState};
use crate::tween::CompassAnimation;
use crate::zones::IncidentZones;
use crate::{CompassGlyph, DangerLevelChanged, SafetyScreenPlugin};

/// Time advanced per `tick()`.
pub const FRAME: Duration = Duration::from_millis(100);

/// Collects every `DangerLevelChanged` event for later inspection.
#[derive(Resource, Default)]
pub struct DangerLevelLog(pub Vec<DangerLevelChanged>);

fn record_level_changes(mut reader: EventReader<DangerLevelChanged>, mut log: ResMut<DangerLevelLog>) {
    log.0.extend(reader.read().copied());
}

pub struct TestScreen {
    app: App,
    feed: ScriptedFeed,
}

impl TestScreen {
    /// Screen over the built-in incidents with an empty track. Startup has run,
    /// so the screen is mounted and the watch is live.
    pub fn new() -> Self {
        Self::with_zones(IncidentZones::builtin().expect("builtin zones validate"))
    }

    pub fn with_zones(zones: IncidentZones) -> Self {
        Self::build(SafetyScreenPlugin::new(zones).with_viewport_size(300.0), [])
    }

    /// Screen whose provider starts with `track` queued.
    pub fn with_track(zones: IncidentZones, track: impl IntoIterator<Item = LocationUpdate>) -> Self {
        Self::build(SafetyScreenPlugin::new(zones).with_viewport_size(300.0), track)
    }

    pub fn build(
        plugin: SafetyScreenPlugin,
        track: impl IntoIterator<Item = LocationUpdate>,
    ) -> Self {
        let provider = ScriptedProvider::new(track);
        let feed = provider.feed();

        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
        app.insert_resource(LocationSource::new(provider));
        app.add_plugins(plugin);
        app.init_resource::<DangerLevelLog>();
        app.add_systems(Last, record_level_changes);

        // Run one update so Startup mounts the screen.
        app.update();

        Self { app, feed }
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
        }
    }

    /// Queue a watch fix and run the frame that delivers it.
    pub fn move_to(&mut self, fix: GeoCoordinate) -> &mut Self {
        self.feed.push_fix(fix);
        self.tick(1);
        self
    }

    pub fn feed(&self) -> &ScriptedFeed {
        &self.feed
    }

    pub fn send(&mut self, event: ScreenEvent) {
        self.app.world_mut().send_event(event);
    }

    /// Run enough frames for any in-flight compass transition to finish.
    pub fn settle(&mut self) {
        for _ in 0..40 {
            if self.resource::<CompassAnimation>().is_settled() {
                break;
            }
            self.tick(1);
        }
    }

    pub fn exit(&mut self) {
        self.app.world_mut().send_event(AppExit::Success);
        self.tick(1);
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn state(&self) -> &ScreenState {
        self.resource::<ScreenState>()
    }

    pub fn assessment(&self) -> HazardAssessment {
        self.state().assessment
    }

    pub fn danger_level(&self) -> DangerLevel {
        self.assessment().danger_level
    }

    pub fn glyph(&self) -> &CompassGlyph {
        self.resource::<CompassGlyph>()
    }

    pub fn level_changes(&self) -> &[DangerLevelChanged] {
        &self.resource::<DangerLevelLog>().0
    }

    pub fn has_location_source(&self) -> bool {
        self.app.world().contains_resource::<LocationSource>()
    }
}

impl Default for TestScreen {
    fn default() -> Self {
        Self::new()
    }
}
