//! Location provider seam.
//!
//! The platform location service is an external collaborator. The screen
//! only needs two things from it: a one-shot current position request and a
//! continuing watch subscription. [`LocationSource`] owns the provider and the
//! active watch; dropping it (resource removal, app teardown, unwinding)
//! always clears the watch.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{WATCH_HIGH_ACCURACY, WATCH_MAX_CACHE_AGE, WATCH_MIN_DISTANCE_FILTER_METERS};
use crate::geo::{distance_meters, GeoCoordinate};

/// Why the provider could not deliver a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::PermissionDenied => write!(f, "location permission denied"),
            LocationError::PositionUnavailable => write!(f, "position unavailable"),
            LocationError::Timeout => write!(f, "location request timed out"),
        }
    }
}

impl std::error::Error for LocationError {}

/// One message from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LocationUpdate {
    /// Answer to the one-shot current position request.
    Current(GeoCoordinate),
    /// Fix delivered by the watch subscription.
    Watch(GeoCoordinate),
    Failed(LocationError),
}

/// Subscription options passed to the provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// Oldest cached fix the provider may hand back.
    pub max_cache_age: Duration,
    /// Minimum movement before a new fix is delivered.
    pub min_distance_filter_meters: f64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: WATCH_HIGH_ACCURACY,
            max_cache_age: WATCH_MAX_CACHE_AGE,
            min_distance_filter_meters: WATCH_MIN_DISTANCE_FILTER_METERS,
        }
    }
}

/// Handle identifying an active watch subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub u32);

/// Platform location service.
pub trait LocationProvider: Send + Sync + 'static {
    /// Ask for a single current fix; the answer arrives through `poll_updates`.
    fn request_current_position(&mut self);

    fn watch_position(&mut self, options: WatchOptions) -> WatchId;

    fn clear_watch(&mut self, id: WatchId);

    /// Drain whatever the provider has produced since the last poll.
    fn poll_updates(&mut self) -> Vec<LocationUpdate>;

    /// True when no further updates will ever arrive.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Owns the provider and the active watch for the lifetime of the screen.
#[derive(Resource)]
pub struct LocationSource {
    provider: Box<dyn LocationProvider>,
    watch: Option<WatchId>,
}

impl LocationSource {
    pub fn new(provider: impl LocationProvider) -> Self {
        Self {
            provider: Box::new(provider),
            watch: None,
        }
    }

    /// Request the current position and subscribe. Mounting twice keeps the
    /// first subscription.
    pub fn mount(&mut self, options: WatchOptions) {
        if self.watch.is_some() {
            return;
        }
        self.provider.request_current_position();
        let id = self.provider.watch_position(options);
        debug!("location watch {:?} started: {:?}", id, options);
        self.watch = Some(id);
    }

    pub fn unmount(&mut self) {
        if let Some(id) = self.watch.take() {
            self.provider.clear_watch(id);
            debug!("location watch {:?} cleared", id);
        }
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    pub fn poll(&mut self) -> Vec<LocationUpdate> {
        if self.watch.is_none() {
            return Vec::new();
        }
        self.provider.poll_updates()
    }

    pub fn is_exhausted(&self) -> bool {
        self.provider.is_exhausted()
    }
}

impl Drop for LocationSource {
    fn drop(&mut self) {
        self.unmount();
    }
}

// ---------------------------------------------------------------------------
// Scripted provider
// ---------------------------------------------------------------------------

/// Shared handle for pushing updates into a [`ScriptedProvider`] after it has
/// been handed to a [`LocationSource`].
#[derive(Clone, Default)]
pub struct ScriptedFeed {
    queue: Arc<Mutex<VecDeque<LocationUpdate>>>,
    watching: Arc<AtomicBool>,
}

impl ScriptedFeed {
    pub fn push(&self, update: LocationUpdate) {
        self.lock().push_back(update);
    }

    pub fn push_fix(&self, fix: GeoCoordinate) {
        self.push(LocationUpdate::Watch(fix));
    }

    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Whether the provider currently has a live watch subscription.
    pub fn is_watching(&self) -> bool {
        self.watching.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<LocationUpdate>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Replays a fixed track of updates, one watch fix per poll.
///
/// The first fix of the track doubles as the answer to the current position
/// request. Watch fixes closer than the minimum distance filter to the last
/// delivered fix are dropped, like a platform provider would.
pub struct ScriptedProvider {
    feed: ScriptedFeed,
    options: Option<WatchOptions>,
    active: Option<WatchId>,
    next_id: u32,
    current_requested: bool,
    last_delivered: Option<GeoCoordinate>,
}

impl ScriptedProvider {
    pub fn new(track: impl IntoIterator<Item = LocationUpdate>) -> Self {
        let feed = ScriptedFeed::default();
        feed.lock().extend(track);
        Self {
            feed,
            options: None,
            active: None,
            next_id: 1,
            current_requested: false,
            last_delivered: None,
        }
    }

    /// A track of watch fixes.
    pub fn from_fixes(fixes: impl IntoIterator<Item = GeoCoordinate>) -> Self {
        Self::new(fixes.into_iter().map(LocationUpdate::Watch))
    }

    /// Parse a JSON array of `{ "latitude", "longitude", "heading"? }` fixes.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let fixes: Vec<GeoCoordinate> = serde_json::from_str(json)?;
        Ok(Self::from_fixes(fixes))
    }

    pub fn feed(&self) -> ScriptedFeed {
        self.feed.clone()
    }

    fn first_fix(&self) -> Option<GeoCoordinate> {
        self.feed.lock().iter().find_map(|u| match u {
            LocationUpdate::Watch(fix) | LocationUpdate::Current(fix) => Some(*fix),
            LocationUpdate::Failed(_) => None,
        })
    }

    fn passes_filter(&self, fix: &GeoCoordinate) -> bool {
        let min = self.options.map_or(0.0, |o| o.min_distance_filter_meters);
        match self.last_delivered {
            Some(last) => distance_meters(&last, fix) >= min,
            None => true,
        }
    }
}

impl LocationProvider for ScriptedProvider {
    fn request_current_position(&mut self) {
        self.current_requested = true;
    }

    fn watch_position(&mut self, options: WatchOptions) -> WatchId {
        let id = WatchId(self.next_id);
        self.next_id += 1;
        self.options = Some(options);
        self.active = Some(id);
        self.feed.watching.store(true, Ordering::SeqCst);
        id
    }

    fn clear_watch(&mut self, id: WatchId) {
        if self.active == Some(id) {
            self.active = None;
            self.feed.watching.store(false, Ordering::SeqCst);
        }
    }

    fn poll_updates(&mut self) -> Vec<LocationUpdate> {
        let mut out = Vec::new();

        if std::mem::take(&mut self.current_requested) {
            match self.first_fix() {
                Some(fix) => out.push(LocationUpdate::Current(fix)),
                None => out.push(LocationUpdate::Failed(LocationError::PositionUnavailable)),
            }
        }

        if self.active.is_none() {
            return out;
        }

        loop {
            let Some(next) = self.feed.lock().pop_front() else {
                break;
            };
            match next {
                LocationUpdate::Watch(fix) if !self.passes_filter(&fix) => continue,
                LocationUpdate::Watch(fix) | LocationUpdate::Current(fix) => {
                    self.last_delivered = Some(fix);
                    out.push(next);
                }
                LocationUpdate::Failed(_) => out.push(next),
            }
            break;
        }
        out
    }

    fn is_exhausted(&self) -> bool {
        !self.current_requested && self.feed.pending() == 0
    }
}
