use serde::Serialize;

/// Which rendering backend the map section is showing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MapBackend {
    #[default]
    Unmounted,
    Loading,
    PrimaryProvider,
    FallbackProvider,
    Unavailable,
}

impl MapBackend {
    /// No transitions leave a terminal backend for the rest of the session.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            MapBackend::PrimaryProvider | MapBackend::FallbackProvider | MapBackend::Unavailable
        )
    }

    /// `Unmounted -> Loading -> terminal`, nothing else.
    pub fn can_transition_to(self, next: MapBackend) -> bool {
        match (self, next) {
            (MapBackend::Unmounted, MapBackend::Loading) => true,
            (MapBackend::Loading, n) => n.is_terminal(),
            _ => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MapBackend::Unmounted => "unmounted",
            MapBackend::Loading => "loading",
            MapBackend::PrimaryProvider => "primary",
            MapBackend::FallbackProvider => "fallback",
            MapBackend::Unavailable => "unavailable",
        }
    }
}

/// Snapshot of the map section as seen by status and control collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ViewState {
    pub backend: MapBackend,
    pub status_message: String,
    /// Set once the mount sequence has started; never cleared.
    pub initialized: bool,
    /// Earth Engine accepted its initialization request after the primary mount.
    pub earth_engine_requested: bool,
}
