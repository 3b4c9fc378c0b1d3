//! Error types shared across the dashboard.

/// Failure to obtain a usable response from the weather endpoint.
///
/// A non-success HTTP status is *not* an error: it is reported as
/// [`SourceResponse::Status`](crate::source::SourceResponse) so the
/// orchestrator can fall back to mock data.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("weather request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather response body is not valid JSON: {0}")]
    Body(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("device geolocation is not supported")]
    Unsupported,

    #[error("location permission denied")]
    PermissionDenied,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

impl GeolocationError {
    /// Message shown to the user in a blocking alert.
    pub fn alert(&self) -> &'static str {
        match self {
            GeolocationError::Unsupported => "Geolocation is not supported.",
            GeolocationError::PermissionDenied | GeolocationError::Unavailable(_) => {
                "Unable to get location."
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    #[error("failed to save location: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl DashboardError {
    /// User-facing alert text for this error.
    pub fn alert(&self) -> String {
        match self {
            DashboardError::Geolocation(err) => err.alert().to_string(),
            DashboardError::Storage(err) => format!("Could not save location: {err:#}"),
        }
    }
}
