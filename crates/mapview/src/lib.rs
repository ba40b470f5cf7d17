//! Map section of the MapMitra sites: decides which map backend to mount
//! once the section scrolls into view, and routes the control bar to it.

pub mod analysis;
pub mod controls;
pub mod error;
pub mod headless;
pub mod profile;
pub mod provider;
pub mod sequencer;
pub mod state;
pub mod trigger;

pub use analysis::{ANALYSIS_INFO, AnalysisKind, MockStats};
pub use controls::{ControlPanel, HomeView, MapButton};
pub use error::{MountError, ProfileError, ProviderError};
pub use profile::{FallbackSettings, SiteProfile};
pub use provider::*;
pub use sequencer::*;
pub use state::{MapBackend, ViewState};
pub use trigger::VisibilityTrigger;
