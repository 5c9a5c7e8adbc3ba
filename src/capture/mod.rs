pub mod config;
pub mod device;
pub mod preview;
pub mod session;
pub mod snapshot;

pub use device::{CameraDevice, DeviceError, DeviceStream, VideoFrame};
pub use session::{CaptureSession, CaptureState};
pub use snapshot::CapturedPhoto;
