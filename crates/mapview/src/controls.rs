use std::str::FromStr;

use foundation::geo::LatLng;
use serde::Serialize;

use crate::provider::{PrimaryMapHandle, ViewMode};

/// Buttons of the map control bar.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapButton {
    TwoD,
    ThreeD,
    Satellite,
    ZoomIn,
    ZoomOut,
    Reset,
}

impl MapButton {
    pub const ALL: [MapButton; 6] = [
        MapButton::TwoD,
        MapButton::ThreeD,
        MapButton::Satellite,
        MapButton::ZoomIn,
        MapButton::ZoomOut,
        MapButton::Reset,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            MapButton::TwoD => "2d-btn",
            MapButton::ThreeD => "3d-btn",
            MapButton::Satellite => "satellite-btn",
            MapButton::ZoomIn => "zoom-in-btn",
            MapButton::ZoomOut => "zoom-out-btn",
            MapButton::Reset => "reset-btn",
        }
    }

    /// View-mode buttons share the "active" highlight.
    pub fn is_mode(self) -> bool {
        matches!(self, MapButton::TwoD | MapButton::ThreeD | MapButton::Satellite)
    }
}

impl FromStr for MapButton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let key = key.strip_suffix("-btn").unwrap_or(&key);
        match key {
            "2d" => Ok(MapButton::TwoD),
            "3d" => Ok(MapButton::ThreeD),
            "satellite" => Ok(MapButton::Satellite),
            "zoom-in" | "zoomin" | "in" => Ok(MapButton::ZoomIn),
            "zoom-out" | "zoomout" | "out" => Ok(MapButton::ZoomOut),
            "reset" => Ok(MapButton::Reset),
            other => Err(format!("unknown map button: {other}")),
        }
    }
}

/// Where "reset" sends the primary map.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HomeView {
    pub center: LatLng,
    pub zoom: f64,
}

/// Control-bar state: which mode button carries the highlight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlPanel {
    active: Option<MapButton>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<MapButton> {
        self.active
    }

    pub fn is_active(&self, button: MapButton) -> bool {
        self.active == Some(button)
    }

    /// Button to highlight after `button` was applied.
    ///
    /// `None` means the highlight stays as it is: zoom and reset never move it.
    pub fn highlight_after(&self, button: MapButton) -> Option<MapButton> {
        if button.is_mode() { self.active } else { None }
    }

    /// Applies `button` to a live primary map.
    ///
    /// `home` is `None` when the site has no reset button; reset is then
    /// ignored. Returns whether the press changed anything.
    pub fn apply(
        &mut self,
        button: MapButton,
        map: &mut dyn PrimaryMapHandle,
        home: Option<HomeView>,
    ) -> bool {
        match button {
            MapButton::TwoD => {
                map.set_view_mode(ViewMode::Roadmap);
                map.set_tilt(0.0);
            }
            MapButton::ThreeD => {
                map.set_view_mode(ViewMode::Hybrid);
                map.set_tilt(45.0);
                map.set_heading(45.0);
            }
            MapButton::Satellite => {
                map.set_view_mode(ViewMode::Satellite);
                map.set_tilt(0.0);
            }
            MapButton::ZoomIn => {
                let z = map.zoom();
                map.set_zoom(z + 1.0);
            }
            MapButton::ZoomOut => {
                let z = map.zoom();
                map.set_zoom(z - 1.0);
            }
            MapButton::Reset => {
                let Some(home) = home else {
                    return false;
                };
                map.set_center(home.center);
                map.set_zoom(home.zoom);
                map.set_tilt(0.0);
            }
        }
        if button.is_mode() {
            self.active = Some(button);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{ControlPanel, HomeView, MapButton};
    use crate::headless::{CallLog, PrimaryCall, RecordingPrimaryMap};
    use crate::provider::ViewMode;
    use foundation::geo::DEFAULT_LOCATION;
    use pretty_assertions::assert_eq;

    fn map() -> (RecordingPrimaryMap, CallLog) {
        let log = CallLog::default();
        (RecordingPrimaryMap::new(14.0, log.clone()), log)
    }

    #[test]
    fn parses_dom_ids() {
        for b in MapButton::ALL {
            assert_eq!(b.element_id().parse::<MapButton>().unwrap(), b);
        }
        assert_eq!("3D".parse::<MapButton>().unwrap(), MapButton::ThreeD);
        assert!("tilt-btn".parse::<MapButton>().is_err());
    }

    #[test]
    fn three_d_sets_hybrid_tilt_and_heading() {
        let (mut m, log) = map();
        let mut panel = ControlPanel::new();
        assert!(panel.apply(MapButton::ThreeD, &mut m, None));
        assert_eq!(
            log.primary_calls(),
            vec![
                PrimaryCall::ViewMode(ViewMode::Hybrid),
                PrimaryCall::Tilt(45.0),
                PrimaryCall::Heading(45.0),
            ]
        );
    }

    #[test]
    fn highlight_moves_to_last_mode_button() {
        let (mut m, _log) = map();
        let mut panel = ControlPanel::new();
        panel.apply(MapButton::TwoD, &mut m, None);
        panel.apply(MapButton::Satellite, &mut m, None);
        assert_eq!(panel.active(), Some(MapButton::Satellite));
        assert!(!panel.is_active(MapButton::TwoD));

        panel.apply(MapButton::ZoomIn, &mut m, None);
        assert_eq!(panel.active(), Some(MapButton::Satellite));
    }

    #[test]
    fn zoom_and_reset_leave_highlight_alone() {
        let (mut m, _log) = map();
        let mut panel = ControlPanel::new();
        let home = Some(HomeView {
            center: DEFAULT_LOCATION,
            zoom: 14.0,
        });

        assert!(panel.apply(MapButton::ZoomIn, &mut m, home));
        assert_eq!(panel.highlight_after(MapButton::ZoomIn), None);

        panel.apply(MapButton::Satellite, &mut m, home);
        assert_eq!(
            panel.highlight_after(MapButton::Satellite),
            Some(MapButton::Satellite)
        );
        for b in [MapButton::ZoomOut, MapButton::Reset] {
            assert!(panel.apply(b, &mut m, home));
            assert_eq!(panel.highlight_after(b), None);
            assert!(panel.is_active(MapButton::Satellite));
        }
    }

    #[test]
    fn zoom_steps_from_current_level() {
        let (mut m, log) = map();
        let mut panel = ControlPanel::new();
        panel.apply(MapButton::ZoomIn, &mut m, None);
        panel.apply(MapButton::ZoomIn, &mut m, None);
        panel.apply(MapButton::ZoomOut, &mut m, None);
        assert_eq!(
            log.primary_calls(),
            vec![
                PrimaryCall::Zoom(15.0),
                PrimaryCall::Zoom(16.0),
                PrimaryCall::Zoom(15.0),
            ]
        );
    }

    #[test]
    fn reset_needs_a_home_view() {
        let (mut m, log) = map();
        let mut panel = ControlPanel::new();
        assert!(!panel.apply(MapButton::Reset, &mut m, None));
        assert!(log.primary_calls().is_empty());

        let home = HomeView {
            center: DEFAULT_LOCATION,
            zoom: 14.0,
        };
        assert!(panel.apply(MapButton::Reset, &mut m, Some(home)));
        assert_eq!(
            log.primary_calls(),
            vec![
                PrimaryCall::Center(DEFAULT_LOCATION),
                PrimaryCall::Zoom(14.0),
                PrimaryCall::Tilt(0.0),
            ]
        );
    }
}
