//! Camera capture session: Idle -> Streaming -> Captured.
//!
//! The session owns the device stream while streaming and the encoded photo
//! once captured. Both live inside the phase enum, so holding a stream and a photo
//! at the same time is unrepresentable.

use serde::{Deserialize, Serialize};

use crate::capture::config::{CaptureConfig, StreamConstraints};
use crate::capture::device::{CameraDevice, DeviceError, DeviceStream};
use crate::capture::preview::{DisplayHandle, PreviewUrls};
use crate::capture::snapshot::{encode_frame, CapturedPhoto};
use crate::error::CaptureError;
use crate::services::permissions::PermissionStatus;
use crate::state::draft::SharedDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CaptureState {
    Idle,
    Streaming,
    Captured,
}

enum Phase {
    Idle,
    Streaming(Box<dyn DeviceStream>),
    Captured {
        photo: CapturedPhoto,
        preview: DisplayHandle,
    },
}

/// Which camera controls the UI should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptureControls {
    pub start: bool,
    pub capture: bool,
    pub retake: bool,
    pub preview: bool,
    pub photo: bool,
}

impl CaptureControls {
    fn for_state(state: CaptureState) -> Self {
        match state {
            CaptureState::Idle => Self {
                start: true,
                capture: false,
                retake: false,
                preview: false,
                photo: false,
            },
            CaptureState::Streaming => Self {
                start: false,
                capture: true,
                retake: false,
                preview: true,
                photo: false,
            },
            CaptureState::Captured => Self {
                start: false,
                capture: false,
                retake: true,
                preview: false,
                photo: true,
            },
        }
    }
}

/// Observable state of a session, for rendering and assertions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureSnapshot {
    pub state: CaptureState,
    pub holds_stream: bool,
    pub holds_photo: bool,
    pub photo_url: Option<String>,
    pub controls: CaptureControls,
    pub error: Option<String>,
}

/// Issued by [`CaptureSession::begin_start`]; redeemed by
/// [`CaptureSession::complete_start`] once the platform answers.
#[derive(Debug)]
pub struct StartTicket {
    epoch: u64,
    pub constraints: StreamConstraints,
}

pub struct CaptureSession {
    phase: Phase,
    draft: SharedDraft,
    config: CaptureConfig,
    previews: PreviewUrls,
    error: Option<CaptureError>,
    permission: PermissionStatus,
    epoch: u64,
    start_pending: bool,
}

impl CaptureSession {
    pub fn new(draft: SharedDraft, config: CaptureConfig) -> Self {
        Self::with_previews(draft, config, PreviewUrls::new())
    }

    pub fn with_previews(draft: SharedDraft, config: CaptureConfig, previews: PreviewUrls) -> Self {
        Self {
            phase: Phase::Idle,
            draft,
            config,
            previews,
            error: None,
            permission: PermissionStatus::NotDetermined,
            epoch: 0,
            start_pending: false,
        }
    }

    pub fn state(&self) -> CaptureState {
        match self.phase {
            Phase::Idle => CaptureState::Idle,
            Phase::Streaming(_) => CaptureState::Streaming,
            Phase::Captured { .. } => CaptureState::Captured,
        }
    }

    pub fn controls(&self) -> CaptureControls {
        CaptureControls::for_state(self.state())
    }

    pub fn error(&self) -> Option<&CaptureError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(CaptureError::user_message)
    }

    pub fn permission(&self) -> PermissionStatus {
        self.permission
    }

    pub fn photo(&self) -> Option<&CapturedPhoto> {
        match &self.phase {
            Phase::Captured { photo, .. } => Some(photo),
            _ => None,
        }
    }

    pub fn photo_url(&self) -> Option<&str> {
        match &self.phase {
            Phase::Captured { preview, .. } => Some(preview.url()),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> CaptureSnapshot {
        CaptureSnapshot {
            state: self.state(),
            holds_stream: matches!(self.phase, Phase::Streaming(_)),
            holds_photo: matches!(self.phase, Phase::Captured { .. }),
            photo_url: self.photo_url().map(str::to_string),
            controls: self.controls(),
            error: self.error_message(),
        }
    }

    /// Request a stream and attach it to the preview.
    ///
    /// Failures are classified and kept as the visible error; the session
    /// stays Idle and `start` may be called again.
    pub async fn start<C>(&mut self, camera: &mut C)
    where
        C: CameraDevice + ?Sized,
    {
        if !camera.is_supported() {
            self.report(CaptureError::Unsupported);
            return;
        }
        let Some(ticket) = self.begin_start() else {
            return;
        };
        let result = camera.open_stream(&ticket.constraints).await;
        self.complete_start(ticket, result);
    }

    /// First half of [`start`](Self::start). Returns `None` unless Idle.
    ///
    /// A request still in flight is superseded: its ticket goes stale and a
    /// grant it later receives is stopped by `complete_start`.
    pub fn begin_start(&mut self) -> Option<StartTicket> {
        if !matches!(self.phase, Phase::Idle) {
            log::debug!("Ignoring start in state {:?}", self.state());
            return None;
        }
        if self.start_pending {
            log::debug!("Superseding pending camera request");
            self.epoch = self.epoch.wrapping_add(1);
        }
        self.error = None;
        self.start_pending = true;
        Some(StartTicket {
            epoch: self.epoch,
            constraints: self.config.constraints.clone(),
        })
    }

    /// Second half of [`start`](Self::start). A grant that arrives after a
    /// forced cleanup is stopped on the spot.
    pub fn complete_start(
        &mut self,
        ticket: StartTicket,
        result: Result<Box<dyn DeviceStream>, DeviceError>,
    ) {
        if ticket.epoch != self.epoch || !matches!(self.phase, Phase::Idle) {
            if let Ok(mut stream) = result {
                log::warn!("Camera granted after cleanup, releasing it");
                stream.stop_tracks();
            }
            return;
        }
        self.start_pending = false;

        match result {
            Ok(stream) => {
                self.permission = PermissionStatus::Authorized;
                self.phase = Phase::Streaming(stream);
                log::info!("Camera started successfully");
            }
            Err(err) => {
                let kind = err.kind();
                self.permission = kind.permission_status();
                log::error!("Error starting camera: {}", err);
                self.report(CaptureError::Access {
                    kind,
                    detail: err.to_string(),
                });
            }
        }
    }

    /// Snapshot the current preview frame and release the camera.
    ///
    /// An empty frame leaves the session Streaming so the user can retry.
    pub fn capture(&mut self) {
        let frame = match &self.phase {
            Phase::Streaming(stream) => Some(stream.current_frame()),
            _ => None,
        };
        let Some(frame) = frame else {
            log::error!("Error capturing photo: camera not active");
            self.report(CaptureError::NotActive);
            return;
        };

        let encoded = frame
            .ok_or(CaptureError::EmptyFrame)
            .and_then(|frame| encode_frame(frame, &self.config.format));
        let photo = match encoded {
            Ok(photo) => photo,
            Err(err) => {
                log::error!("Error capturing photo: {}", err);
                self.report(err);
                return;
            }
        };

        self.release();
        self.draft.set_photo(photo.clone());
        let preview = self.previews.create();
        self.phase = Phase::Captured { photo, preview };
        self.error = None;
        log::info!("Photo captured successfully");
    }

    /// Discard the captured photo and go back to Idle. No-op unless Captured.
    pub fn retake(&mut self) {
        if !matches!(self.phase, Phase::Captured { .. }) {
            log::debug!("Ignoring retake in state {:?}", self.state());
            return;
        }
        self.release();
        self.error = None;
        log::info!("Photo cleared, ready to retake");
    }

    /// Force the session back to Idle from any state. Idempotent.
    pub fn cleanup(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.start_pending = false;
        self.release();
        self.error = None;
        log::debug!("Capture session cleaned up");
    }

    fn release(&mut self) {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::Streaming(mut stream) => {
                stream.stop_tracks();
                log::debug!("Camera tracks stopped");
            }
            Phase::Captured { .. } => {
                // dropping the handle revokes its URL
                self.draft.clear_photo();
            }
        }
    }

    fn report(&mut self, err: CaptureError) {
        self.error = Some(err);
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::capture::device::VideoFrame;
    use crate::services::permissions::CameraErrorKind;

    struct FakeStream {
        frame: Option<VideoFrame>,
        stopped: Rc<Cell<bool>>,
    }

    impl DeviceStream for FakeStream {
        fn current_frame(&self) -> Option<VideoFrame> {
            self.frame.clone()
        }

        fn stop_tracks(&mut self) {
            self.stopped.set(true);
        }

        fn is_live(&self) -> bool {
            !self.stopped.get()
        }
    }

    fn stream(width: u32, height: u32) -> (Box<dyn DeviceStream>, Rc<Cell<bool>>) {
        let stopped = Rc::new(Cell::new(false));
        let frame = VideoFrame::new(width, height, vec![90; (width * height * 3) as usize]);
        let stream = FakeStream {
            frame: Some(frame),
            stopped: stopped.clone(),
        };
        (Box::new(stream), stopped)
    }

    fn session() -> (CaptureSession, SharedDraft) {
        let draft = SharedDraft::new();
        (CaptureSession::new(draft.clone(), CaptureConfig::default()), draft)
    }

    #[test]
    fn capture_without_stream_reports_not_active() {
        let (mut session, _) = session();
        session.capture();
        assert_eq!(session.state(), CaptureState::Idle);
        assert!(matches!(session.error(), Some(CaptureError::NotActive)));
    }

    #[test]
    fn late_grant_after_cleanup_is_released() {
        let (mut session, _) = session();
        let ticket = session.begin_start().unwrap();
        session.cleanup();

        let (granted, stopped) = stream(4, 4);
        session.complete_start(ticket, Ok(granted));

        assert!(stopped.get());
        assert_eq!(session.state(), CaptureState::Idle);
    }

    #[test]
    fn second_begin_supersedes_pending_request() {
        let (mut session, _) = session();
        let first = session.begin_start().unwrap();
        let second = session.begin_start().unwrap();

        let (late, late_stopped) = stream(4, 4);
        session.complete_start(first, Ok(late));
        assert!(late_stopped.get());
        assert_eq!(session.state(), CaptureState::Idle);

        let (granted, stopped) = stream(4, 4);
        session.complete_start(second, Ok(granted));
        assert!(!stopped.get());
        assert_eq!(session.state(), CaptureState::Streaming);
    }

    #[test]
    fn busy_device_is_classified() {
        let (mut session, _) = session();
        let ticket = session.begin_start().unwrap();
        session.complete_start(ticket, Err(DeviceError::new("NotReadableError", "in use")));

        assert_eq!(session.state(), CaptureState::Idle);
        match session.error() {
            Some(CaptureError::Access { kind, .. }) => assert_eq!(*kind, CameraErrorKind::DeviceBusy),
            other => panic!("unexpected error {:?}", other),
        }
        assert!(session.begin_start().is_some());
    }

    #[test]
    fn empty_frame_keeps_streaming() {
        let (mut session, _) = session();
        let ticket = session.begin_start().unwrap();
        let (granted, stopped) = stream(0, 0);
        session.complete_start(ticket, Ok(granted));

        session.capture();
        assert_eq!(session.state(), CaptureState::Streaming);
        assert!(matches!(session.error(), Some(CaptureError::EmptyFrame)));
        assert!(!stopped.get());
    }

    #[test]
    fn capture_writes_draft_and_releases_stream() {
        let (mut session, draft) = session();
        let ticket = session.begin_start().unwrap();
        let (granted, stopped) = stream(16, 9);
        session.complete_start(ticket, Ok(granted));

        session.capture();
        assert_eq!(session.state(), CaptureState::Captured);
        assert!(stopped.get());
        assert_eq!(draft.photo().as_ref(), session.photo());
        assert!(session.controls().retake);
    }

    #[test]
    fn drop_releases_stream() {
        let (mut session, _) = session();
        let ticket = session.begin_start().unwrap();
        let (granted, stopped) = stream(4, 4);
        session.complete_start(ticket, Ok(granted));
        drop(session);
        assert!(stopped.get());
    }
}
