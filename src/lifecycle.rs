//! Forced cleanup on page lifecycle changes.
//!
//! These run synchronously, so they always win over a stream grant or a
//! position fix that is still in flight.

use crate::capture::CaptureSession;
use crate::location::{LocationPicker, MapBackend};

/// The page was hidden: release the camera.
pub fn on_page_hidden(capture: &mut CaptureSession) {
    log::debug!("Page hidden, releasing camera");
    capture.cleanup();
}

/// Leaving the add-story view or unloading the page.
pub fn on_view_exit<B: MapBackend>(capture: &mut CaptureSession, picker: &mut LocationPicker<B>) {
    log::debug!("Leaving story view, releasing camera and map");
    capture.cleanup();
    picker.cleanup();
}
