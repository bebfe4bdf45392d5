use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use safety::geo::{destination, GeoCoordinate};
use safety::hazard::HazardEvaluator;
use safety::location::{LocationSource, ScriptedProvider};
use safety::presentation::{compass_svg, present};
use safety::screen::ScreenState;
use safety::tween::CompassAnimation;
use safety::zones::IncidentZones;
use safety::{CompassGlyph, CompassViewport, DangerLevelChanged, SafetyScreenPlugin, SafetySet};

/// Frame interval of the headless loop.
const FRAME: Duration = Duration::from_millis(100);

fn main() {
    let zones = match IncidentZones::builtin() {
        Ok(zones) => zones,
        Err(e) => panic!("invalid incident configuration: {e}"),
    };

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(FRAME)),
        LogPlugin::default(),
    ))
    .add_plugins(SafetyScreenPlugin::new(zones))
    .add_systems(
        Update,
        (report_level_changes, exit_when_track_done)
            .chain()
            .after(SafetySet::Glyph),
    );

    // Track replay: SMARTCITY_TRACK=path/to/track.json replays recorded fixes,
    // otherwise a short walk through the fire incident is played.
    let provider = match std::env::var("SMARTCITY_TRACK") {
        Ok(path) => load_track(&path).unwrap_or_else(|e| {
            error!("Failed to load track '{}': {}; using the demo walk", path, e);
            demo_walk()
        }),
        Err(_) => demo_walk(),
    };
    app.insert_resource(LocationSource::new(provider));

    app.run();
}

fn load_track(path: &str) -> Result<ScriptedProvider, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    let provider = ScriptedProvider::from_json(&json)?;
    info!("Replaying track from {}", path);
    Ok(provider)
}

/// Approach the fire incident from the south, cross into the alert area,
/// then turn around and walk back out.
fn demo_walk() -> ScriptedProvider {
    let center = GeoCoordinate::new(50.86, -1.28);
    let inbound = (0..15).map(|i| destination(&center, 180.0, 700.0 - 40.0 * i as f64).with_heading(0.0));
    let outbound = (0..15).map(|i| destination(&center, 180.0, 140.0 + 40.0 * i as f64).with_heading(180.0));
    ScriptedProvider::from_fixes(inbound.chain(outbound))
}

fn report_level_changes(
    mut changes: EventReader<DangerLevelChanged>,
    state: Res<ScreenState>,
    evaluator: Res<HazardEvaluator>,
    glyph: Res<CompassGlyph>,
    viewport: Res<CompassViewport>,
) {
    for change in changes.read() {
        let p = present(&state.assessment, evaluator.zones());
        info!("{}: {}", p.headline, p.message);
        if let Some(distance) = p.distance_text {
            info!("Distance from safe area: {}", distance);
        }
        if let Some(g) = glyph.0 {
            debug!("Compass: {}", compass_svg(&g, change.current, viewport.0));
        }
    }
}

/// Stop once every scripted fix has been delivered and the compass is at rest.
fn exit_when_track_done(
    source: Option<Res<LocationSource>>,
    animation: Res<CompassAnimation>,
    mut exit: EventWriter<AppExit>,
) {
    let exhausted = source.is_none_or(|s| s.is_exhausted());
    if exhausted && animation.is_settled() {
        info!("Track finished");
        exit.send(AppExit::Success);
    }
}
