#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use story_capture::capture::config::StreamConstraints;
use story_capture::capture::{CameraDevice, DeviceError, DeviceStream, VideoFrame};
use story_capture::error::{ApiError, GeolocationError, LocationError};
use story_capture::location::{
    Bounds, Geolocator, LatLng, MapBackend, MapWidget, MarkerId, MarkerKind, MarkerSpec, Position,
    PositionOptions,
};
use story_capture::services::stories::{NewStory, StoryClient, StoryRecord};

pub struct FakeStream {
    frame: Option<VideoFrame>,
    tracks: Vec<Rc<Cell<bool>>>,
}

impl DeviceStream for FakeStream {
    fn current_frame(&self) -> Option<VideoFrame> {
        self.frame.clone()
    }

    fn stop_tracks(&mut self) {
        for track in &self.tracks {
            track.set(false);
        }
    }

    fn is_live(&self) -> bool {
        self.tracks.iter().any(|t| t.get())
    }
}

/// Camera that grants a stream with one live video track, or fails with a
/// platform error name.
pub struct FakeCamera {
    pub frame_size: (u32, u32),
    pub deny_with: Option<&'static str>,
    pub supported: bool,
    pub requests: Vec<StreamConstraints>,
    pub tracks: Vec<Rc<Cell<bool>>>,
}

impl FakeCamera {
    pub fn granting(width: u32, height: u32) -> Self {
        Self {
            frame_size: (width, height),
            deny_with: None,
            supported: true,
            requests: Vec::new(),
            tracks: Vec::new(),
        }
    }

    pub fn denying(name: &'static str) -> Self {
        Self {
            deny_with: Some(name),
            ..Self::granting(0, 0)
        }
    }

    pub fn live_tracks(&self) -> usize {
        self.tracks.iter().filter(|t| t.get()).count()
    }
}

#[async_trait::async_trait(?Send)]
impl CameraDevice for FakeCamera {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn open_stream(
        &mut self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn DeviceStream>, DeviceError> {
        self.requests.push(constraints.clone());
        if let Some(name) = self.deny_with {
            return Err(DeviceError::new(name, "simulated failure"));
        }
        let (w, h) = self.frame_size;
        let track = Rc::new(Cell::new(true));
        self.tracks.push(track.clone());
        Ok(Box::new(FakeStream {
            frame: Some(VideoFrame::new(w, h, vec![120; (w * h * 3) as usize])),
            tracks: vec![track],
        }))
    }
}

/// Camera whose grant never arrives.
pub struct PendingCamera;

#[async_trait::async_trait(?Send)]
impl CameraDevice for PendingCamera {
    async fn open_stream(
        &mut self,
        _constraints: &StreamConstraints,
    ) -> Result<Box<dyn DeviceStream>, DeviceError> {
        std::future::pending().await
    }
}

#[derive(Debug, Default)]
pub struct MapLog {
    pub created: usize,
    pub removed: usize,
    pub markers: Vec<(MarkerId, MarkerSpec)>,
    pub popups_opened: Vec<MarkerId>,
    pub view: Option<(LatLng, u8)>,
    next: u64,
}

impl MapLog {
    pub fn markers_of(&self, kind: MarkerKind) -> Vec<LatLng> {
        self.markers
            .iter()
            .filter(|(_, m)| m.kind == kind)
            .map(|(_, m)| m.position)
            .collect()
    }
}

pub struct FakeWidget {
    log: Rc<RefCell<MapLog>>,
}

impl MapWidget for FakeWidget {
    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.log.borrow_mut().view = Some((center, zoom));
    }

    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId {
        let mut log = self.log.borrow_mut();
        log.next += 1;
        let id = MarkerId(log.next);
        log.markers.push((id, marker));
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.log.borrow_mut().markers.retain(|(m, _)| *m != id);
    }

    fn open_popup(&mut self, id: MarkerId) {
        self.log.borrow_mut().popups_opened.push(id);
    }

    fn fit_bounds(&mut self, _bounds: Bounds, _padding: u32, _max_zoom: u8) {}

    fn invalidate_size(&mut self) {}

    fn remove(&mut self) {
        let mut log = self.log.borrow_mut();
        log.removed += 1;
        log.markers.clear();
    }
}

#[derive(Clone, Default)]
pub struct FakeMaps {
    pub log: Rc<RefCell<MapLog>>,
}

impl MapBackend for FakeMaps {
    type Widget = FakeWidget;

    fn create(&mut self, _container: &str, center: LatLng, zoom: u8) -> Result<FakeWidget, LocationError> {
        let mut log = self.log.borrow_mut();
        log.created += 1;
        log.view = Some((center, zoom));
        Ok(FakeWidget { log: self.log.clone() })
    }
}

pub struct FakeGeolocator {
    pub result: Result<LatLng, GeolocationError>,
}

#[async_trait::async_trait(?Send)]
impl Geolocator for FakeGeolocator {
    async fn current_position(&self, _options: &PositionOptions) -> Result<Position, GeolocationError> {
        self.result.clone().map(|coords| Position {
            coords,
            accuracy_m: Some(25.0),
        })
    }
}

/// Records every upload; optionally rejects them.
#[derive(Default)]
pub struct FakeClient {
    pub uploads: RefCell<Vec<NewStory>>,
    pub reject_with: Option<String>,
}

#[async_trait::async_trait(?Send)]
impl StoryClient for FakeClient {
    async fn list_stories(&self) -> Result<Vec<StoryRecord>, ApiError> {
        Ok(Vec::new())
    }

    async fn create_story(&self, story: NewStory) -> Result<(), ApiError> {
        self.uploads.borrow_mut().push(story);
        match &self.reject_with {
            Some(message) => Err(ApiError::Rejected(message.clone())),
            None => Ok(()),
        }
    }

    async fn get_story(&self, id: &str) -> Result<StoryRecord, ApiError> {
        Err(ApiError::Rejected(format!("no story {id}")))
    }
}
