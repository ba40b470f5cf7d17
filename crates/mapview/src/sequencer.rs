//! Progressive map initialization for the map section.
//!
//! `Unmounted -> Loading -> {PrimaryProvider | FallbackProvider | Unavailable}`.
//! The sequencer owns its [`ViewState`]; every change goes through
//! `transition`, and the `initialized` flag keeps the mount sequence from
//! running twice. Delays are scheduled on an injected [`Scheduler`] and come
//! back through [`MapSequencer::run_task`].

use foundation::time::Time;
use rand::SeedableRng;
use rand::rngs::StdRng;
use runtime::event_bus::EventBus;
use runtime::scheduler::Scheduler;
use tracing::{debug, error, info, warn};

use crate::analysis::{AnalysisKind, MockStats};
use crate::controls::{ControlPanel, MapButton};
use crate::error::MountError;
use crate::profile::SiteProfile;
use crate::provider::{
    FallbackMapHandle, MapContainer, MapLibraries, Marker, PrimaryMapHandle, PrimaryMapOptions,
    StatusSink, ViewMode,
};
use crate::state::{MapBackend, ViewState};
use crate::trigger::VisibilityTrigger;

pub const LOADING_MESSAGE: &str = "Loading map...";
pub const PRIMARY_READY_MESSAGE: &str = "Google Maps loaded";
pub const FALLBACK_READY_MESSAGE: &str = "OpenStreetMap (Leaflet) loaded";

/// Event kind used for status entries in [`MapSequencer::trace`].
pub const STATUS_EVENT: &str = "status";

const DEFAULT_SEED: u64 = 0x6d61_706d_6974_7261;

/// Deferred steps handed to the scheduler.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SequencerTask {
    MountPrimary,
    FinishAnalysis(AnalysisKind),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Mounted(MapBackend),
    AnalysisComplete(MockStats),
    /// The task no longer applies (e.g. the backend already settled).
    Ignored,
}

enum ActiveMap {
    None,
    Primary(Box<dyn PrimaryMapHandle>),
    // Owned so the tile map lives as long as the section.
    Fallback { _handle: Box<dyn FallbackMapHandle> },
}

pub struct MapSequencer {
    profile: SiteProfile,
    trigger: VisibilityTrigger,
    state: ViewState,
    libraries: MapLibraries,
    container: Box<dyn MapContainer>,
    status: Box<dyn StatusSink>,
    map: ActiveMap,
    controls: ControlPanel,
    last_error: Option<MountError>,
    unreported: Option<String>,
    rng: StdRng,
    trace: EventBus,
}

impl MapSequencer {
    pub fn new(
        profile: SiteProfile,
        libraries: MapLibraries,
        container: Box<dyn MapContainer>,
        status: Box<dyn StatusSink>,
    ) -> Self {
        Self {
            trigger: VisibilityTrigger::new(profile.visibility_threshold),
            profile,
            state: ViewState::default(),
            libraries,
            container,
            status,
            map: ActiveMap::None,
            controls: ControlPanel::new(),
            last_error: None,
            unreported: None,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
            trace: EventBus::new(),
        }
    }

    /// Reseeds the mock-analysis generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn backend(&self) -> MapBackend {
        self.state.backend
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.profile
    }

    pub fn controls(&self) -> &ControlPanel {
        &self.controls
    }

    pub fn last_error(&self) -> Option<&MountError> {
        self.last_error.as_ref()
    }

    /// Console line for a mount failure not yet handed to the host.
    ///
    /// Returns each failure once; hosts call it after every visibility
    /// observation and task.
    pub fn take_failure_report(&mut self) -> Option<String> {
        self.unreported.take()
    }

    /// Timestamped status history.
    pub fn trace(&self) -> &EventBus {
        &self.trace
    }

    /// Whether the host should keep reporting visibility changes.
    pub fn wants_visibility(&self) -> bool {
        self.trigger.is_subscribed() && !self.state.initialized
    }

    /// Feeds a viewport observation of the map section.
    ///
    /// Returns `true` if this observation started the mount sequence.
    pub fn on_visibility<S>(&mut self, visible_ratio: f64, sched: &mut S) -> bool
    where
        S: Scheduler<SequencerTask> + ?Sized,
    {
        if !self.trigger.observe(visible_ratio) {
            return false;
        }
        self.start(sched)
    }

    /// Starts the mount sequence. No-op after the first call.
    pub fn start<S>(&mut self, sched: &mut S) -> bool
    where
        S: Scheduler<SequencerTask> + ?Sized,
    {
        if self.state.initialized {
            return false;
        }
        self.state.initialized = true;
        let now = sched.now();
        if !self.transition(MapBackend::Loading, LOADING_MESSAGE, now) {
            return false;
        }

        if self.libraries.primary.is_some() {
            let delay = self.profile.primary_load_delay();
            debug!(delay_ms = delay.as_millis() as u64, "primary map library present, mount scheduled");
            sched.schedule_after(delay, SequencerTask::MountPrimary);
        } else {
            info!("primary map library not loaded, trying tile map fallback");
            self.mount_fallback(now);
        }
        true
    }

    /// Runs a task previously scheduled by this sequencer.
    pub fn run_task(&mut self, task: SequencerTask, now: Time) -> TaskOutcome {
        match task {
            SequencerTask::MountPrimary => {
                if self.state.backend != MapBackend::Loading {
                    return TaskOutcome::Ignored;
                }
                self.mount_primary(now);
                TaskOutcome::Mounted(self.state.backend)
            }
            SequencerTask::FinishAnalysis(kind) => {
                let stats = MockStats::generate(&mut self.rng);
                self.set_status(&kind.completed_message(), now);
                TaskOutcome::AnalysisComplete(stats)
            }
        }
    }

    /// Handles a control-bar press. Only a mounted primary map reacts.
    pub fn press(&mut self, button: MapButton) -> bool {
        let home = self.profile.home_view();
        match &mut self.map {
            ActiveMap::Primary(map) => self.controls.apply(button, &mut **map, home),
            _ => {
                debug!(button = button.element_id(), backend = self.state.backend.label(), "control ignored");
                false
            }
        }
    }

    /// Starts a mock analysis run; completes after the profile's delay.
    pub fn analyze<S>(&mut self, kind: AnalysisKind, sched: &mut S) -> bool
    where
        S: Scheduler<SequencerTask> + ?Sized,
    {
        if !self.profile.analysis_controls {
            return false;
        }
        let now = sched.now();
        self.set_status(&kind.started_message(), now);
        sched.schedule_after(
            self.profile.analysis_delay(),
            SequencerTask::FinishAnalysis(kind),
        );
        true
    }

    fn mount_primary(&mut self, now: Time) {
        let center = self.profile.default_center;
        let options = PrimaryMapOptions {
            center,
            zoom: self.profile.primary_zoom,
            view_mode: ViewMode::Hybrid,
            tilt: self.profile.primary_tilt,
            heading: 0.0,
            dark_style: true,
        };

        let Some(provider) = self.libraries.primary.as_mut() else {
            self.mount_fallback(now);
            return;
        };

        self.container.clear();
        match provider.create_map(self.container.as_mut(), &options) {
            Ok(mut map) => {
                map.add_marker(&Marker::analysis_point(center));
                self.container.hide_overlay();
                self.map = ActiveMap::Primary(map);
                self.transition(MapBackend::PrimaryProvider, PRIMARY_READY_MESSAGE, now);
                self.init_earth_engine();
            }
            Err(err) => {
                error!(%err, "primary map initialization error");
                if self.profile.fallback_on_primary_failure && self.profile.fallback.is_some() {
                    warn!("falling back to tile map after primary failure");
                    self.mount_fallback(now);
                } else {
                    self.fail(MountError::PrimaryProviderConstructionFailed(err), now);
                }
            }
        }
    }

    fn mount_fallback(&mut self, now: Time) {
        let Some(settings) = self.profile.fallback.clone() else {
            self.fail(MountError::PrimaryLibraryMissing, now);
            return;
        };

        self.container.replace_with_host(&settings.host_id);
        let Some(provider) = self.libraries.fallback.as_mut() else {
            warn!("fallback map library not loaded");
            self.fail(MountError::FallbackLibraryMissing, now);
            return;
        };

        let center = self.profile.default_center;
        match provider.create_map(&settings.host_id, center, settings.zoom) {
            Ok(mut map) => {
                map.add_tile_layer(&settings.tile_url, &settings.attribution);
                map.add_marker(&Marker::analysis_point(center));
                self.container.hide_overlay();
                self.map = ActiveMap::Fallback { _handle: map };
                self.transition(MapBackend::FallbackProvider, FALLBACK_READY_MESSAGE, now);
            }
            Err(err) => {
                error!(%err, "fallback map initialization error");
                self.fail(MountError::FallbackConstructionFailed(err), now);
            }
        }
    }

    fn init_earth_engine(&mut self) {
        let Some(engine) = self.libraries.earth_engine.as_mut() else {
            debug!("earth engine API not loaded");
            return;
        };
        match engine.initialize() {
            Ok(()) => {
                self.state.earth_engine_requested = true;
                info!("earth engine initialization requested");
            }
            // Often just "authentication required"; the map stays usable.
            Err(err) => warn!(%err, "earth engine initialization notice"),
        }
    }

    fn fail(&mut self, err: MountError, now: Time) {
        self.transition(MapBackend::Unavailable, err.status_message(), now);
        self.unreported = Some(err.console_message());
        self.last_error = Some(err);
    }

    fn transition(&mut self, next: MapBackend, message: &str, now: Time) -> bool {
        let from = self.state.backend;
        if !from.can_transition_to(next) {
            warn!(from = from.label(), to = next.label(), "rejected map backend transition");
            return false;
        }
        debug!(from = from.label(), to = next.label(), "map backend transition");
        self.state.backend = next;
        self.set_status(message, now);
        true
    }

    fn set_status(&mut self, message: &str, now: Time) {
        self.state.status_message = message.to_string();
        self.status.set_status(message);
        self.trace.emit(now, STATUS_EVENT, message);
    }
}

impl std::fmt::Debug for MapSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSequencer")
            .field("profile", &self.profile.name)
            .field("state", &self.state)
            .field("libraries", &self.libraries)
            .field("container", &self.container.id())
            .field("active_button", &self.controls.active())
            .field("last_error", &self.last_error)
            .finish()
    }
}
