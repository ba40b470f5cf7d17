//! Headless runs of the map section sequencer.
//!
//! A [`Scenario`] scripts which libraries are on the page and what the
//! visitor does; [`simulate`] replays it on virtual time and reports the
//! status timeline.

use std::time::Duration;

use clap::ValueEnum;
use mapview::headless::{
    CallLog, HeadlessEarthEngine, HeadlessFallback, HeadlessPrimary, RecordingContainer,
    RecordingStatus,
};
use mapview::{
    AnalysisKind, MapBackend, MapButton, MapLibraries, MapSequencer, MockStats, STATUS_EVENT,
    SequencerTask, SiteProfile, TaskOutcome, ViewState,
};
use runtime::{ManualScheduler, Scheduler};
use serde::Serialize;

/// Gap between two scripted visibility observations.
pub const VISIBILITY_TICK: Duration = Duration::from_millis(100);

/// Whether a headless library is on the page and how it behaves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Absent,
    Ok,
    Fail,
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub profile: SiteProfile,
    pub primary: Availability,
    pub fallback: Availability,
    pub earth_engine: Availability,
    pub visibility: Vec<f64>,
    pub presses: Vec<MapButton>,
    pub analyze: Option<AnalysisKind>,
    pub seed: u64,
}

impl Scenario {
    pub fn new(profile: SiteProfile) -> Self {
        Self {
            profile,
            primary: Availability::Absent,
            fallback: Availability::Ok,
            earth_engine: Availability::Absent,
            visibility: vec![1.0],
            presses: Vec::new(),
            analyze: None,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub at_ms: u64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressResult {
    pub button: MapButton,
    pub applied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimReport {
    pub profile: String,
    pub state: ViewState,
    pub error: Option<String>,
    pub active_button: Option<MapButton>,
    pub timeline: Vec<TimelineEntry>,
    pub presses: Vec<PressResult>,
    pub stats: Option<MockStats>,
    pub capability_calls: usize,
}

fn libraries(scenario: &Scenario, log: &CallLog) -> MapLibraries {
    let mut libs = MapLibraries::none();
    libs = match scenario.primary {
        Availability::Absent => libs,
        Availability::Ok => libs.with_primary(HeadlessPrimary::new(log.clone())),
        Availability::Fail => libs.with_primary(HeadlessPrimary::failing(
            log.clone(),
            "InvalidKeyMapError",
        )),
    };
    libs = match scenario.fallback {
        Availability::Absent => libs,
        Availability::Ok => libs.with_fallback(HeadlessFallback::new(log.clone())),
        Availability::Fail => libs.with_fallback(HeadlessFallback::failing(
            log.clone(),
            "map container is already initialized",
        )),
    };
    match scenario.earth_engine {
        Availability::Absent => libs,
        Availability::Ok => libs.with_earth_engine(HeadlessEarthEngine::new(log.clone())),
        Availability::Fail => libs.with_earth_engine(HeadlessEarthEngine::failing(
            log.clone(),
            "authentication required",
        )),
    }
}

pub fn simulate(scenario: &Scenario) -> SimReport {
    let log = CallLog::new();
    let mut seq = MapSequencer::new(
        scenario.profile.clone(),
        libraries(scenario, &log),
        Box::new(RecordingContainer::new("google-earth-map", log.clone())),
        Box::new(RecordingStatus::new(log.clone())),
    )
    .with_seed(scenario.seed);
    let mut sched: ManualScheduler<SequencerTask> = ManualScheduler::new();
    let mut stats = None;

    let mut run = |seq: &mut MapSequencer, s: &mut ManualScheduler<SequencerTask>, task| {
        if let TaskOutcome::AnalysisComplete(result) = seq.run_task(task, s.now()) {
            stats = Some(result);
        }
    };

    for &ratio in &scenario.visibility {
        if seq.on_visibility(ratio, &mut sched) {
            tracing::info!(ratio, at = sched.now().as_millis(), "map section visible");
        }
        sched.advance(VISIBILITY_TICK, |s, task| run(&mut seq, s, task));
    }
    sched.run_until_idle(|s, task| run(&mut seq, s, task));

    let presses = scenario
        .presses
        .iter()
        .map(|&button| PressResult {
            button,
            applied: seq.press(button),
        })
        .collect();

    if let Some(kind) = scenario.analyze
        && !seq.analyze(kind, &mut sched)
    {
        tracing::warn!(profile = %scenario.profile.name, "analysis controls disabled");
    }
    sched.run_until_idle(|s, task| run(&mut seq, s, task));

    let timeline = seq
        .trace()
        .of_kind(STATUS_EVENT)
        .map(|e| TimelineEntry {
            at_ms: e.at.as_millis(),
            message: e.message.clone(),
        })
        .collect();

    SimReport {
        profile: scenario.profile.name.clone(),
        state: seq.state().clone(),
        error: seq.last_error().map(|e| e.to_string()),
        active_button: seq.controls().active(),
        timeline,
        presses,
        stats,
        capability_calls: log.len(),
    }
}

impl SimReport {
    pub fn backend(&self) -> MapBackend {
        self.state.backend
    }

    pub fn messages(&self) -> Vec<&str> {
        self.timeline.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("profile: {}\n", self.profile));
        for entry in &self.timeline {
            out.push_str(&format!("{:>6}ms  {}\n", entry.at_ms, entry.message));
        }
        out.push_str(&format!("backend: {}\n", self.state.backend.label()));
        if let Some(err) = &self.error {
            out.push_str(&format!("error: {err}\n"));
        }
        for p in &self.presses {
            let verdict = if p.applied { "applied" } else { "ignored" };
            out.push_str(&format!("press {}: {verdict}\n", p.button.element_id()));
        }
        if let Some(b) = self.active_button {
            out.push_str(&format!("active: {}\n", b.element_id()));
        }
        if let Some(s) = &self.stats {
            out.push_str(&format!(
                "stats: cloud {} / ndvi {} / scenes {}\n",
                s.cloud_coverage_label(),
                s.mean_ndvi_label(),
                s.scene_count
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Availability, Scenario, simulate};
    use mapview::{AnalysisKind, MapBackend, MapButton, SiteProfile};
    use pretty_assertions::assert_eq;

    #[test]
    fn fallback_scenario_matches_status_sequence() {
        let report = simulate(&Scenario::new(SiteProfile::mapmitra()));
        assert_eq!(report.backend(), MapBackend::FallbackProvider);
        assert_eq!(
            report.messages(),
            vec!["Loading map...", "OpenStreetMap (Leaflet) loaded"]
        );
    }

    #[test]
    fn failing_primary_scenario_is_unavailable() {
        let scenario = Scenario {
            primary: Availability::Fail,
            ..Scenario::new(SiteProfile::mapmitra())
        };
        let report = simulate(&scenario);
        assert_eq!(report.backend(), MapBackend::Unavailable);
        assert_eq!(
            report.state.status_message,
            "Google Maps API Key Required. Check console for details."
        );
        assert!(report.error.is_some());
    }

    #[test]
    fn primary_mount_lands_after_load_delay() {
        let scenario = Scenario {
            primary: Availability::Ok,
            visibility: vec![0.0, 0.3, 0.8, 0.1, 0.9],
            presses: vec![MapButton::Satellite, MapButton::TwoD, MapButton::ZoomIn],
            ..Scenario::new(SiteProfile::mapmitra())
        };
        let report = simulate(&scenario);
        assert_eq!(report.backend(), MapBackend::PrimaryProvider);
        // Visible on the third tick (t = 200ms), mounted 500ms later.
        assert_eq!(report.timeline[0].at_ms, 200);
        assert_eq!(report.timeline[1].at_ms, 700);
        assert_eq!(report.active_button, Some(MapButton::TwoD));
        assert!(report.presses.iter().all(|p| p.applied));
    }

    #[test]
    fn never_visible_reports_nothing() {
        let scenario = Scenario {
            visibility: vec![0.0, 0.2],
            ..Scenario::new(SiteProfile::mapmitra())
        };
        let report = simulate(&scenario);
        assert_eq!(report.backend(), MapBackend::Unmounted);
        assert!(report.timeline.is_empty());
        assert_eq!(report.capability_calls, 0);
    }

    #[test]
    fn analysis_produces_stats() {
        let scenario = Scenario {
            analyze: Some(AnalysisKind::Ndwi),
            seed: 9,
            ..Scenario::new(SiteProfile::mapmitra())
        };
        let report = simulate(&scenario);
        assert!(report.stats.is_some());
        assert_eq!(report.messages().last(), Some(&"NDWI analysis complete"));
        assert!(report.render_text().contains("stats: cloud"));
    }

    #[test]
    fn bundled_profiles_match_builtins() {
        let mapmitra = SiteProfile::from_json(include_str!("../profiles/mapmitra.json")).unwrap();
        let legacy = SiteProfile::from_json(include_str!("../profiles/legacy.json")).unwrap();
        assert_eq!(mapmitra, SiteProfile::mapmitra());
        assert_eq!(legacy, SiteProfile::legacy());
    }

    #[test]
    fn legacy_profile_ignores_analysis_and_reset() {
        let scenario = Scenario {
            primary: Availability::Ok,
            presses: vec![MapButton::Reset],
            analyze: Some(AnalysisKind::Ndvi),
            ..Scenario::new(SiteProfile::legacy())
        };
        let report = simulate(&scenario);
        assert_eq!(report.backend(), MapBackend::PrimaryProvider);
        assert!(!report.presses[0].applied);
        assert!(report.stats.is_none());
    }
}
