use std::collections::BTreeMap;

use serde::Serialize;

use crate::services::permissions::CameraErrorKind;

/// Field name -> message, as produced by the form validator.
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Camera access failed: {kind:?} ({detail})")]
    Access { kind: CameraErrorKind, detail: String },

    #[error("Camera not supported on this platform")]
    Unsupported,

    #[error("Camera not active")]
    NotActive,

    #[error("Frame produced an empty image")]
    EmptyFrame,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl CaptureError {
    /// Message shown next to the camera preview.
    pub fn user_message(&self) -> String {
        match self {
            Self::Access { kind, .. } => kind.user_message().to_string(),
            Self::Unsupported => {
                "Camera not supported on this browser. Please use a modern browser.".to_string()
            }
            Self::NotActive | Self::EmptyFrame | Self::Image(_) => {
                "Failed to capture photo. Please try again.".to_string()
            }
        }
    }
}

impl Serialize for CaptureError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.user_message())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("Map widget unavailable: {0}")]
    MapUnavailable(String),

    #[error("Map not initialized")]
    MapNotReady,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Geolocation not supported")]
    Unsupported,

    #[error("Geolocation permission denied")]
    PermissionDenied,

    #[error("Position unavailable")]
    PositionUnavailable,

    #[error("Geolocation timed out")]
    Timeout,
}

impl GeolocationError {
    /// Advisory line shown under the map. Manual picking still works.
    pub fn advisory(&self) -> &'static str {
        match self {
            Self::Unsupported => {
                "Geolocation not supported. Please click on the map to select a location."
            }
            _ => "Unable to get your location. Please click on the map to select a location.",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Rejected(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Please fix the highlighted fields")]
    Validation(FieldErrors),

    #[error("Failed to share story: {0}")]
    Api(#[from] ApiError),
}

impl Serialize for SubmitError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
