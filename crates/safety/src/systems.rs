//! ECS systems driving the safety screen, in frame order:
//! location pump -> state transitions -> compass animation -> glyph.

use bevy::prelude::*;

use crate::compass::compute_glyph;
use crate::geo::normalize_heading;
use crate::hazard::HazardEvaluator;
use crate::location::{LocationSource, LocationUpdate};
use crate::screen::{ScreenEvent, ScreenPhase, ScreenState};
use crate::tween::CompassAnimation;
use crate::{CompassGlyph, CompassViewport, DangerLevelChanged, LocationWatchOptions};

/// Startup: mount the screen and subscribe to location updates.
pub fn mount_location_source(
    source: Option<ResMut<LocationSource>>,
    options: Res<LocationWatchOptions>,
    mut events: EventWriter<ScreenEvent>,
) {
    events.send(ScreenEvent::Mounted);
    match source {
        Some(mut source) => source.mount(options.0),
        None => warn!("No location source installed; the screen will stay in the safe state"),
    }
}

/// Forward provider output into the screen event stream.
pub fn pump_location_source(
    source: Option<ResMut<LocationSource>>,
    mut events: EventWriter<ScreenEvent>,
) {
    let Some(mut source) = source else {
        return;
    };
    for update in source.poll() {
        if let LocationUpdate::Failed(err) = update {
            warn!("Location provider error: {}", err);
        }
        events.send(ScreenEvent::from(update));
    }
}

/// Run every pending event through the state machine.
pub fn apply_screen_events(
    mut reader: EventReader<ScreenEvent>,
    evaluator: Res<HazardEvaluator>,
    mut state: ResMut<ScreenState>,
    mut changes: EventWriter<DangerLevelChanged>,
) {
    for event in reader.read() {
        let next = state.transition(event, &evaluator);
        if next == *state {
            continue;
        }

        let before = state.assessment;
        let after = next.assessment;
        if let Some(pos) = next.current_position {
            if next.current_position != state.current_position {
                debug!(
                    "Fix {} -> {:?}, {:.1} m from border",
                    pos, after.danger_level, after.distance_from_border_meters
                );
            }
        }
        if before.danger_level != after.danger_level || before.nearest_zone != after.nearest_zone {
            let title = after
                .nearest_zone
                .and_then(|id| evaluator.zone(id))
                .map_or("none", |z| z.title.as_str());
            info!(
                "Danger level {:?} -> {:?} (zone: {})",
                before.danger_level, after.danger_level, title
            );
            changes.send(DangerLevelChanged {
                previous: before.danger_level,
                current: after.danger_level,
                zone: after.nearest_zone,
            });
        }
        *state = next;
    }
}

/// Drop the location source once the screen is torn down; its `Drop`
/// clears the watch.
pub fn release_location_on_teardown(
    state: Res<ScreenState>,
    source: Option<Res<LocationSource>>,
    mut commands: Commands,
) {
    if state.phase == ScreenPhase::TornDown && source.is_some() {
        commands.remove_resource::<LocationSource>();
    }
}

/// Point the compass transitions at the latest heading and at the way out of
/// the nearest zone. Without a zone the safe bearing keeps its last target.
pub fn retarget_compass_animation(state: Res<ScreenState>, mut animation: ResMut<CompassAnimation>) {
    if !state.is_changed() {
        return;
    }
    animation
        .heading
        .retarget(normalize_heading(state.current_heading()));
    if state.assessment.nearest_zone.is_some() {
        animation
            .bearing
            .retarget(state.assessment.escape_bearing_degrees());
    }
}

pub fn advance_compass_animation(time: Res<Time>, mut animation: ResMut<CompassAnimation>) {
    if animation.is_settled() {
        return;
    }
    animation.advance(time.delta());
}

/// Recompute the glyph from the animated angles; hidden while safe.
pub fn update_compass_glyph(
    state: Res<ScreenState>,
    animation: Res<CompassAnimation>,
    viewport: Res<CompassViewport>,
    mut glyph: ResMut<CompassGlyph>,
) {
    let next = state.assessment.danger_level.shows_compass().then(|| {
        compute_glyph(
            animation.bearing.value(),
            Some(animation.heading.value()),
            viewport.0,
        )
    });
    if glyph.0 != next {
        glyph.0 = next;
    }
}

/// On app exit, unmount the screen and release the watch immediately.
pub fn teardown_on_exit(
    mut exits: EventReader<AppExit>,
    mut events: EventWriter<ScreenEvent>,
    mut commands: Commands,
) {
    if exits.is_empty() {
        return;
    }
    exits.clear();
    events.send(ScreenEvent::Unmounted);
    commands.remove_resource::<LocationSource>();
}
