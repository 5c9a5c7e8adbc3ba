use crate::capture::config::StreamConstraints;
use crate::services::permissions::CameraErrorKind;

/// Failure reported by the platform when a stream request is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceError {
    /// Platform error name, e.g. `NotAllowedError`.
    pub name: String,
    pub message: String,
}

impl DeviceError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> CameraErrorKind {
        CameraErrorKind::from_platform_name(&self.name)
    }
}

impl std::fmt::Display for DeviceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for DeviceError {}

/// One decoded preview frame, tightly packed RGB8.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl VideoFrame {
    pub fn new(width: u32, height: u32, rgb: Vec<u8>) -> Self {
        Self { width, height, rgb }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A live camera stream. Holding one keeps the hardware busy.
pub trait DeviceStream {
    /// The frame currently shown in the preview, if the stream has produced one.
    fn current_frame(&self) -> Option<VideoFrame>;

    /// Stop every track. Must be idempotent.
    fn stop_tracks(&mut self);

    fn is_live(&self) -> bool;
}

#[async_trait::async_trait(?Send)]
pub trait CameraDevice {
    /// Whether the platform exposes camera access at all.
    fn is_supported(&self) -> bool {
        true
    }

    async fn open_stream(
        &mut self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn DeviceStream>, DeviceError>;
}
