//! Capabilities the sequencer consumes but does not implement.
//!
//! The browser host backs these with Google Maps, Leaflet and DOM elements;
//! [`crate::headless`] backs them with recorders. Presence of a library is
//! expressed by injecting (or not injecting) a provider in [`MapLibraries`].

use foundation::geo::LatLng;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Map type of the primary provider.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    Roadmap,
    Hybrid,
    Satellite,
}

impl ViewMode {
    /// Identifier used by the primary SDK (`google.maps.MapTypeId`).
    pub fn map_type_id(self) -> &'static str {
        match self {
            ViewMode::Roadmap => "roadmap",
            ViewMode::Hybrid => "hybrid",
            ViewMode::Satellite => "satellite",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub title: String,
}

impl Marker {
    pub fn analysis_point(position: LatLng) -> Self {
        Self {
            position,
            title: "GIS Analysis Point".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryMapOptions {
    pub center: LatLng,
    pub zoom: f64,
    pub view_mode: ViewMode,
    pub tilt: f64,
    pub heading: f64,
    pub dark_style: bool,
}

/// Live primary map.
pub trait PrimaryMapHandle {
    fn set_view_mode(&mut self, mode: ViewMode);
    fn set_zoom(&mut self, zoom: f64);
    fn zoom(&self) -> f64;
    fn set_tilt(&mut self, degrees: f64);
    fn set_heading(&mut self, degrees: f64);
    fn set_center(&mut self, center: LatLng);
    fn add_marker(&mut self, marker: &Marker);
}

/// The preferred, credentialed mapping SDK.
pub trait PrimaryProvider {
    fn create_map(
        &mut self,
        container: &mut dyn MapContainer,
        options: &PrimaryMapOptions,
    ) -> Result<Box<dyn PrimaryMapHandle>, ProviderError>;
}

/// Live tile map.
pub trait FallbackMapHandle {
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);
    fn add_marker(&mut self, marker: &Marker);
}

/// Free tile-based library that needs no credentials.
pub trait FallbackProvider {
    fn create_map(
        &mut self,
        container_id: &str,
        center: LatLng,
        zoom: u8,
    ) -> Result<Box<dyn FallbackMapHandle>, ProviderError>;
}

/// Optional imagery-analysis SDK initialized next to the primary map.
pub trait EarthEngine {
    /// Starts initialization. `Ok` only means the SDK accepted the request;
    /// authentication may still fail later without affecting the map.
    fn initialize(&mut self) -> Result<(), ProviderError>;
}

/// Page region the sequencer may rewrite wholesale.
pub trait MapContainer {
    fn id(&self) -> &str;
    fn clear(&mut self);
    /// Replaces the contents with a single empty child element.
    fn replace_with_host(&mut self, child_id: &str);
    /// Hides the "loading" overlay drawn on top of the container.
    fn hide_overlay(&mut self);
}

/// Text output for human-readable progress and errors.
pub trait StatusSink {
    fn set_status(&mut self, message: &str);
}

/// Libraries detected on the page. `None` means the library is not loaded.
#[derive(Default)]
pub struct MapLibraries {
    pub primary: Option<Box<dyn PrimaryProvider>>,
    pub fallback: Option<Box<dyn FallbackProvider>>,
    pub earth_engine: Option<Box<dyn EarthEngine>>,
}

impl MapLibraries {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_primary(mut self, provider: impl PrimaryProvider + 'static) -> Self {
        self.primary = Some(Box::new(provider));
        self
    }

    pub fn with_fallback(mut self, provider: impl FallbackProvider + 'static) -> Self {
        self.fallback = Some(Box::new(provider));
        self
    }

    pub fn with_earth_engine(mut self, engine: impl EarthEngine + 'static) -> Self {
        self.earth_engine = Some(Box::new(engine));
        self
    }
}

impl std::fmt::Debug for MapLibraries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapLibraries")
            .field("primary", &self.primary.is_some())
            .field("fallback", &self.fallback.is_some())
            .field("earth_engine", &self.earth_engine.is_some())
            .finish()
    }
}
