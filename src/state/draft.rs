use std::cell::RefCell;
use std::rc::Rc;

use crate::capture::snapshot::CapturedPhoto;
use crate::location::LatLng;

/// The in-progress story, before submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftRecord {
    pub name: String,
    pub description: String,
    pub photo: Option<CapturedPhoto>,
    pub location: Option<LatLng>,
}

impl DraftRecord {
    pub fn is_complete(&self) -> bool {
        self.photo.is_some() && self.location.is_some()
    }
}

/// Shared handle to the draft.
///
/// The capture session writes `photo`, the location picker writes
/// `location`, the submission flow reads a snapshot. Everything runs on one
/// thread, so a `RefCell` is enough; borrows never cross an await.
#[derive(Debug, Clone, Default)]
pub struct SharedDraft {
    inner: Rc<RefCell<DraftRecord>>,
}

impl SharedDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DraftRecord {
        self.inner.borrow().clone()
    }

    pub fn set_text(&self, name: impl Into<String>, description: impl Into<String>) {
        let mut draft = self.inner.borrow_mut();
        draft.name = name.into();
        draft.description = description.into();
    }

    pub fn clear_text(&self) {
        let mut draft = self.inner.borrow_mut();
        draft.name.clear();
        draft.description.clear();
    }

    pub fn photo(&self) -> Option<CapturedPhoto> {
        self.inner.borrow().photo.clone()
    }

    pub fn location(&self) -> Option<LatLng> {
        self.inner.borrow().location
    }

    pub(crate) fn set_photo(&self, photo: CapturedPhoto) {
        self.inner.borrow_mut().photo = Some(photo);
    }

    pub(crate) fn clear_photo(&self) {
        self.inner.borrow_mut().photo = None;
    }

    pub(crate) fn set_location(&self, location: LatLng) {
        self.inner.borrow_mut().location = Some(location);
    }

    pub(crate) fn clear_location(&self) {
        self.inner.borrow_mut().location = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_one_record() {
        let draft = SharedDraft::new();
        let writer = draft.clone();
        writer.set_location(LatLng::new(-6.2, 106.8));
        writer.set_text("Monas", "A walk around the monument");

        let snapshot = draft.snapshot();
        assert_eq!(snapshot.location, Some(LatLng::new(-6.2, 106.8)));
        assert_eq!(snapshot.name, "Monas");
        assert!(!snapshot.is_complete());
    }

    #[test]
    fn clearing_location_leaves_text() {
        let draft = SharedDraft::new();
        draft.set_text("a", "b");
        draft.set_location(LatLng::new(1.0, 2.0));
        draft.clear_location();
        assert_eq!(draft.location(), None);
        assert_eq!(draft.snapshot().name, "a");
    }
}
