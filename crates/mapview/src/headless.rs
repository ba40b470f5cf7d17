//! Recording implementations of every capability in [`crate::provider`].
//!
//! Used by the simulator CLI and by tests: each capability appends to a
//! shared [`CallLog`] so the exact order of side effects can be checked.

use std::cell::RefCell;
use std::rc::Rc;

use foundation::geo::LatLng;
use serde::Serialize;

use crate::error::ProviderError;
use crate::provider::{
    EarthEngine, FallbackMapHandle, FallbackProvider, MapContainer, Marker, PrimaryMapHandle,
    PrimaryMapOptions, PrimaryProvider, StatusSink, ViewMode,
};

#[derive(Debug, Clone, PartialEq)]
pub enum PrimaryCall {
    ViewMode(ViewMode),
    Zoom(f64),
    Tilt(f64),
    Heading(f64),
    Center(LatLng),
    Marker(Marker),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ContainerCleared,
    ContainerReplaced(String),
    OverlayHidden,
    PrimaryCreated {
        container_id: String,
        options: PrimaryMapOptions,
    },
    PrimaryFailed(String),
    Primary(PrimaryCall),
    FallbackCreated {
        container_id: String,
        center: LatLng,
        zoom: u8,
    },
    FallbackFailed(String),
    TileLayer {
        url_template: String,
        attribution: String,
    },
    FallbackMarker(Marker),
    EarthEngineInitialized,
    EarthEngineFailed(String),
    Status(String),
}

/// Shared, ordered record of capability calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, call: &Call) -> bool {
        self.0.borrow().iter().any(|c| c == call)
    }

    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(pred)
    }

    pub fn primary_calls(&self) -> Vec<PrimaryCall> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Primary(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.0
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Status(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Scripted result of a headless `create_map`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Succeed,
    Fail(String),
}

#[derive(Debug)]
pub struct RecordingPrimaryMap {
    zoom: f64,
    log: CallLog,
}

impl RecordingPrimaryMap {
    pub fn new(zoom: f64, log: CallLog) -> Self {
        Self { zoom, log }
    }
}

impl PrimaryMapHandle for RecordingPrimaryMap {
    fn set_view_mode(&mut self, mode: ViewMode) {
        self.log.push(Call::Primary(PrimaryCall::ViewMode(mode)));
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
        self.log.push(Call::Primary(PrimaryCall::Zoom(zoom)));
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_tilt(&mut self, degrees: f64) {
        self.log.push(Call::Primary(PrimaryCall::Tilt(degrees)));
    }

    fn set_heading(&mut self, degrees: f64) {
        self.log.push(Call::Primary(PrimaryCall::Heading(degrees)));
    }

    fn set_center(&mut self, center: LatLng) {
        self.log.push(Call::Primary(PrimaryCall::Center(center)));
    }

    fn add_marker(&mut self, marker: &Marker) {
        self.log.push(Call::Primary(PrimaryCall::Marker(marker.clone())));
    }
}

#[derive(Debug)]
pub struct HeadlessPrimary {
    outcome: Outcome,
    log: CallLog,
}

impl HeadlessPrimary {
    pub fn new(log: CallLog) -> Self {
        Self {
            outcome: Outcome::Succeed,
            log,
        }
    }

    pub fn failing(log: CallLog, message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail(message.into()),
            log,
        }
    }
}

impl PrimaryProvider for HeadlessPrimary {
    fn create_map(
        &mut self,
        container: &mut dyn MapContainer,
        options: &PrimaryMapOptions,
    ) -> Result<Box<dyn PrimaryMapHandle>, ProviderError> {
        match &self.outcome {
            Outcome::Succeed => {
                self.log.push(Call::PrimaryCreated {
                    container_id: container.id().to_string(),
                    options: options.clone(),
                });
                Ok(Box::new(RecordingPrimaryMap::new(
                    options.zoom,
                    self.log.clone(),
                )))
            }
            Outcome::Fail(msg) => {
                self.log.push(Call::PrimaryFailed(msg.clone()));
                Err(ProviderError::new(msg.clone()))
            }
        }
    }
}

#[derive(Debug)]
pub struct RecordingFallbackMap {
    log: CallLog,
}

impl FallbackMapHandle for RecordingFallbackMap {
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str) {
        self.log.push(Call::TileLayer {
            url_template: url_template.to_string(),
            attribution: attribution.to_string(),
        });
    }

    fn add_marker(&mut self, marker: &Marker) {
        self.log.push(Call::FallbackMarker(marker.clone()));
    }
}

#[derive(Debug)]
pub struct HeadlessFallback {
    outcome: Outcome,
    log: CallLog,
}

impl HeadlessFallback {
    pub fn new(log: CallLog) -> Self {
        Self {
            outcome: Outcome::Succeed,
            log,
        }
    }

    pub fn failing(log: CallLog, message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail(message.into()),
            log,
        }
    }
}

impl FallbackProvider for HeadlessFallback {
    fn create_map(
        &mut self,
        container_id: &str,
        center: LatLng,
        zoom: u8,
    ) -> Result<Box<dyn FallbackMapHandle>, ProviderError> {
        match &self.outcome {
            Outcome::Succeed => {
                self.log.push(Call::FallbackCreated {
                    container_id: container_id.to_string(),
                    center,
                    zoom,
                });
                Ok(Box::new(RecordingFallbackMap {
                    log: self.log.clone(),
                }))
            }
            Outcome::Fail(msg) => {
                self.log.push(Call::FallbackFailed(msg.clone()));
                Err(ProviderError::new(msg.clone()))
            }
        }
    }
}

#[derive(Debug)]
pub struct HeadlessEarthEngine {
    outcome: Outcome,
    log: CallLog,
}

impl HeadlessEarthEngine {
    pub fn new(log: CallLog) -> Self {
        Self {
            outcome: Outcome::Succeed,
            log,
        }
    }

    pub fn failing(log: CallLog, message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Fail(message.into()),
            log,
        }
    }
}

impl EarthEngine for HeadlessEarthEngine {
    fn initialize(&mut self) -> Result<(), ProviderError> {
        match &self.outcome {
            Outcome::Succeed => {
                self.log.push(Call::EarthEngineInitialized);
                Ok(())
            }
            Outcome::Fail(msg) => {
                self.log.push(Call::EarthEngineFailed(msg.clone()));
                Err(ProviderError::new(msg.clone()))
            }
        }
    }
}

#[derive(Debug)]
pub struct RecordingContainer {
    id: String,
    log: CallLog,
}

impl RecordingContainer {
    pub fn new(id: impl Into<String>, log: CallLog) -> Self {
        Self {
            id: id.into(),
            log,
        }
    }
}

impl MapContainer for RecordingContainer {
    fn id(&self) -> &str {
        &self.id
    }

    fn clear(&mut self) {
        self.log.push(Call::ContainerCleared);
    }

    fn replace_with_host(&mut self, child_id: &str) {
        self.log.push(Call::ContainerReplaced(child_id.to_string()));
    }

    fn hide_overlay(&mut self) {
        self.log.push(Call::OverlayHidden);
    }
}

#[derive(Debug)]
pub struct RecordingStatus {
    log: CallLog,
}

impl RecordingStatus {
    pub fn new(log: CallLog) -> Self {
        Self { log }
    }
}

impl StatusSink for RecordingStatus {
    fn set_status(&mut self, message: &str) {
        self.log.push(Call::Status(message.to_string()));
    }
}
