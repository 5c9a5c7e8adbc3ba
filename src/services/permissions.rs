use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    Authorized,
    Denied,
    Restricted,
    NotDetermined,
}

/// Classified cause of a failed camera stream request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraErrorKind {
    PermissionDenied,
    DeviceNotFound,
    DeviceUnsupported,
    DeviceBusy,
    ConstraintsUnsatisfiable,
    SecurityBlocked,
    Other,
}

impl CameraErrorKind {
    /// Map a platform error name (`NotAllowedError`, ...) onto a class.
    pub fn from_platform_name(name: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" => Self::PermissionDenied,
            "NotFoundError" | "DevicesNotFoundError" => Self::DeviceNotFound,
            "NotSupportedError" => Self::DeviceUnsupported,
            "NotReadableError" | "TrackStartError" => Self::DeviceBusy,
            "OverconstrainedError" | "ConstraintNotSatisfiedError" => {
                Self::ConstraintsUnsatisfiable
            }
            "SecurityError" => Self::SecurityBlocked,
            _ => Self::Other,
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Unable to access camera. Please allow camera access and try again."
            }
            Self::DeviceNotFound => "Unable to access camera. No camera found on this device.",
            Self::DeviceUnsupported => {
                "Unable to access camera. Camera not supported on this device."
            }
            Self::DeviceBusy => {
                "Unable to access camera. Camera is being used by another application."
            }
            Self::ConstraintsUnsatisfiable => {
                "Unable to access camera. Camera settings not supported."
            }
            Self::SecurityBlocked => {
                "Unable to access camera. Camera access blocked by security policy."
            }
            Self::Other => {
                "Unable to access camera. Please check your camera settings and try again."
            }
        }
    }

    /// Permission status implied by a failure of this class.
    pub fn permission_status(&self) -> PermissionStatus {
        match self {
            Self::PermissionDenied => PermissionStatus::Denied,
            Self::SecurityBlocked => PermissionStatus::Restricted,
            _ => PermissionStatus::NotDetermined,
        }
    }
}
