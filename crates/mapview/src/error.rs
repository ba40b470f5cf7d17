use thiserror::Error;

/// Failure reported by a mapping capability (SDK exception, missing key, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why a mount sequence ended in [`crate::MapBackend::Unavailable`].
///
/// None of these are retried; they are surfaced once through the status sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MountError {
    #[error("primary map construction failed: {0}")]
    PrimaryProviderConstructionFailed(ProviderError),
    #[error("primary map library not loaded and no fallback configured")]
    PrimaryLibraryMissing,
    #[error("fallback map library not loaded")]
    FallbackLibraryMissing,
    #[error("fallback map construction failed: {0}")]
    FallbackConstructionFailed(ProviderError),
}

impl MountError {
    /// Text shown to visitors in the map status element.
    pub fn status_message(&self) -> &'static str {
        match self {
            MountError::PrimaryProviderConstructionFailed(_) => {
                "Google Maps API Key Required. Check console for details."
            }
            MountError::PrimaryLibraryMissing => {
                "API Not Loaded - Please add your Google Maps API Key"
            }
            MountError::FallbackLibraryMissing => "Map libraries not loaded",
            MountError::FallbackConstructionFailed(_) => "Failed to load fallback map",
        }
    }

    /// Developer-facing line for the browser console.
    pub fn console_message(&self) -> String {
        match self {
            MountError::PrimaryProviderConstructionFailed(err) => {
                format!("Google Maps initialization error: {err}")
            }
            MountError::PrimaryLibraryMissing => "Google Maps API not loaded".to_string(),
            MountError::FallbackLibraryMissing => "Leaflet library not loaded".to_string(),
            MountError::FallbackConstructionFailed(err) => format!("Leaflet init error: {err}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("invalid profile json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid profile: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::{MountError, ProviderError};

    #[test]
    fn construction_failure_hints_at_credentials() {
        let err = MountError::PrimaryProviderConstructionFailed(ProviderError::new("InvalidKey"));
        assert!(err.status_message().contains("API Key Required"));
        assert_eq!(
            err.to_string(),
            "primary map construction failed: InvalidKey"
        );
    }

    #[test]
    fn provider_cause_is_printed_once() {
        use std::error::Error;

        let err = MountError::FallbackConstructionFailed(ProviderError::new("no container"));
        assert!(err.source().is_none());
        assert_eq!(err.to_string().matches("no container").count(), 1);

        let chain = anyhow::Error::new(err);
        assert_eq!(format!("{chain:#}").matches("no container").count(), 1);
    }

    #[test]
    fn console_message_carries_the_cause() {
        let err = MountError::PrimaryProviderConstructionFailed(ProviderError::new("InvalidKey"));
        assert_eq!(err.console_message(), "Google Maps initialization error: InvalidKey");
        assert_eq!(
            MountError::FallbackLibraryMissing.console_message(),
            "Leaflet library not loaded"
        );
    }

    #[test]
    fn missing_fallback_message() {
        assert_eq!(
            MountError::FallbackLibraryMissing.status_message(),
            "Map libraries not loaded"
        );
    }
}
