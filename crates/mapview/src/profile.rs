use std::time::Duration;

use foundation::geo::{DEFAULT_LOCATION, LatLng};
use serde::{Deserialize, Serialize};

use crate::controls::HomeView;
use crate::error::ProfileError;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Free tile map used when the primary SDK is not on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackSettings {
    /// Id of the element created inside the container for the tile map.
    pub host_id: String,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            host_id: "leaflet-map".to_string(),
            zoom: 13,
            tile_url: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
        }
    }
}

/// Per-site configuration of the map section.
///
/// Both sites run the same sequencer; they differ only in these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    pub name: String,
    pub default_center: LatLng,
    pub primary_zoom: f64,
    pub primary_tilt: f64,
    pub visibility_threshold: f64,
    pub primary_load_delay_ms: u64,
    pub analysis_delay_ms: u64,
    /// `None`: the site ships no tile library.
    pub fallback: Option<FallbackSettings>,
    pub reset_control: bool,
    pub analysis_controls: bool,
    /// Mount the fallback when the primary SDK is present but fails to build.
    pub fallback_on_primary_failure: bool,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::mapmitra()
    }
}

impl SiteProfile {
    /// Current site: OSM fallback, reset button and mock analysis panel.
    pub fn mapmitra() -> Self {
        Self {
            name: "mapmitra".to_string(),
            default_center: DEFAULT_LOCATION,
            primary_zoom: 14.0,
            primary_tilt: 45.0,
            visibility_threshold: 0.5,
            primary_load_delay_ms: 500,
            analysis_delay_ms: 1_500,
            fallback: Some(FallbackSettings::default()),
            reset_control: true,
            analysis_controls: true,
            fallback_on_primary_failure: false,
        }
    }

    /// Older site: primary SDK only, no reset, no analysis.
    pub fn legacy() -> Self {
        Self {
            name: "legacy".to_string(),
            fallback: None,
            reset_control: false,
            analysis_controls: false,
            ..Self::mapmitra()
        }
    }

    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "mapmitra" => Some(Self::mapmitra()),
            "legacy" => Some(Self::legacy()),
            _ => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profile: SiteProfile = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn to_json_pretty(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0) {
            return Err(ProfileError::Invalid(format!(
                "visibility_threshold must be in (0, 1], got {}",
                self.visibility_threshold
            )));
        }
        if !self.default_center.is_valid() {
            return Err(ProfileError::Invalid(format!(
                "default_center out of range: {}",
                self.default_center
            )));
        }
        if !(0.0..=22.0).contains(&self.primary_zoom) {
            return Err(ProfileError::Invalid(format!(
                "primary_zoom must be in 0..=22, got {}",
                self.primary_zoom
            )));
        }
        if let Some(fallback) = &self.fallback {
            if fallback.zoom > 22 {
                return Err(ProfileError::Invalid(format!(
                    "fallback zoom must be in 0..=22, got {}",
                    fallback.zoom
                )));
            }
            if fallback.host_id.trim().is_empty() {
                return Err(ProfileError::Invalid("fallback host_id is empty".into()));
            }
        }
        Ok(())
    }

    pub fn primary_load_delay(&self) -> Duration {
        Duration::from_millis(self.primary_load_delay_ms)
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    pub fn home_view(&self) -> Option<HomeView> {
        self.reset_control.then_some(HomeView {
            center: self.default_center,
            zoom: self.primary_zoom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{OSM_TILE_URL, SiteProfile};
    use crate::error::ProfileError;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtins_validate() {
        assert!(SiteProfile::mapmitra().validate().is_ok());
        assert!(SiteProfile::legacy().validate().is_ok());
        assert!(SiteProfile::builtin("nope").is_none());
    }

    #[test]
    fn legacy_has_no_fallback_reset_or_analysis() {
        let p = SiteProfile::legacy();
        assert!(p.fallback.is_none());
        assert!(p.home_view().is_none());
        assert!(!p.analysis_controls);
        assert_eq!(p.primary_load_delay_ms, 500);
    }

    #[test]
    fn json_round_trip() {
        let p = SiteProfile::mapmitra();
        let json = p.to_json_pretty().unwrap();
        assert_eq!(SiteProfile::from_json(&json).unwrap(), p);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let p = SiteProfile::from_json(
            r#"{"name": "bengaluru", "default_center": {"lat": 12.9716, "lng": 77.5946}}"#,
        )
        .unwrap();
        assert_eq!(p.name, "bengaluru");
        assert_eq!(p.visibility_threshold, 0.5);
        let fallback = p.fallback.unwrap();
        assert_eq!(fallback.zoom, 13);
        assert_eq!(fallback.tile_url, OSM_TILE_URL);
    }

    #[test]
    fn explicit_null_fallback_disables_it() {
        let p = SiteProfile::from_json(r#"{"fallback": null}"#).unwrap();
        assert!(p.fallback.is_none());
    }

    #[test]
    fn rejects_bad_threshold() {
        let err = SiteProfile::from_json(r#"{"visibility_threshold": 0}"#).unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_center_and_syntax() {
        let err = SiteProfile::from_json(r#"{"default_center": {"lat": 95, "lng": 0}}"#)
            .unwrap_err();
        assert!(matches!(err, ProfileError::Invalid(_)));
        let err = SiteProfile::from_json("{").unwrap_err();
        assert!(matches!(err, ProfileError::Json(_)));
    }
}
