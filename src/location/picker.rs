//! Location picker: a map the user clicks to choose where a story happened.
//!
//! Centering on the device position and selecting the submission location
//! are separate. Only [`LocationPicker::select_location`] writes the draft.

use crate::config::{GeolocationConfig, MapConfig};
use crate::error::LocationError;
use crate::location::geolocation::{request_fix, FixRequest, FixResolution, Geolocator, PositionOptions};
use crate::location::map::{LatLng, MapBackend, MapEvent, MapWidget, MarkerId, MarkerKind, MarkerSpec};
use crate::state::draft::SharedDraft;

pub const LOCATION_MAP_CONTAINER: &str = "location-map";

const CURRENT_LOCATION_POPUP: &str = "Your current location (click anywhere to select story location)";
const SELECTED_LOCATION_POPUP: &str = "Selected story location";

pub struct LocationPicker<B: MapBackend> {
    backend: B,
    widget: Option<B::Widget>,
    draft: SharedDraft,
    map: MapConfig,
    geolocation: GeolocationConfig,
    user_marker: Option<MarkerId>,
    selected_marker: Option<MarkerId>,
    selected: Option<LatLng>,
    info: Option<String>,
    error: Option<LocationError>,
    epoch: u64,
}

impl<B: MapBackend> LocationPicker<B> {
    pub fn new(backend: B, draft: SharedDraft, map: MapConfig, geolocation: GeolocationConfig) -> Self {
        Self {
            backend,
            widget: None,
            draft,
            map,
            geolocation,
            user_marker: None,
            selected_marker: None,
            selected: None,
            info: None,
            error: None,
            epoch: 0,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.widget.is_some()
    }

    pub fn widget(&self) -> Option<&B::Widget> {
        self.widget.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn selected_location(&self) -> Option<LatLng> {
        self.selected
    }

    pub fn selected_marker(&self) -> Option<MarkerId> {
        self.selected_marker
    }

    pub fn user_marker(&self) -> Option<MarkerId> {
        self.user_marker
    }

    /// Informational line under the map.
    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub fn error(&self) -> Option<&LocationError> {
        self.error.as_ref()
    }

    /// Create the map at the default center and hand back a position request
    /// for the host to resolve. Returns `None` if the widget could not be
    /// created; the failure is kept as [`error`](Self::error).
    pub fn initialize(&mut self) -> Option<FixRequest> {
        if self.widget.is_some() {
            self.teardown();
        }
        self.epoch = self.epoch.wrapping_add(1);
        self.error = None;
        self.info = None;

        match self
            .backend
            .create(LOCATION_MAP_CONTAINER, self.map.default_center, self.map.picker_zoom)
        {
            Ok(widget) => {
                self.widget = Some(widget);
                log::info!("Location map initialized");
                Some(FixRequest {
                    epoch: self.epoch,
                    options: PositionOptions::from(&self.geolocation),
                })
            }
            Err(err) => {
                log::error!("Error initializing location map: {}", err);
                self.error = Some(err);
                None
            }
        }
    }

    /// [`initialize`](Self::initialize), then wait for the device position.
    pub async fn initialize_with<G>(&mut self, geolocator: &G)
    where
        G: Geolocator + ?Sized,
    {
        if let Some(request) = self.initialize() {
            let resolution = request_fix(geolocator, request).await;
            self.apply_fix(resolution);
        }
    }

    /// Apply a resolved position request. Resolutions from an earlier
    /// generation, or arriving after cleanup, are ignored.
    pub fn apply_fix(&mut self, resolution: FixResolution) {
        if resolution.epoch != self.epoch {
            log::debug!("Dropping stale position fix");
            return;
        }
        let Some(widget) = self.widget.as_mut() else {
            log::debug!("Position fix arrived without a map");
            return;
        };

        match resolution.outcome {
            Ok(position) => {
                widget.set_view(position.coords, self.map.user_position_zoom);
                if let Some(previous) = self.user_marker.take() {
                    widget.remove_marker(previous);
                }
                self.user_marker = Some(widget.add_marker(MarkerSpec {
                    position: position.coords,
                    kind: MarkerKind::CurrentLocation,
                    popup: Some(CURRENT_LOCATION_POPUP.to_string()),
                }));
            }
            Err(err) => {
                log::warn!("Geolocation error: {}", err);
                self.info = Some(err.advisory().to_string());
            }
        }
    }

    pub fn handle_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::Click(point) => self.select_location(point),
            MapEvent::Resize => {
                if let Some(widget) = self.widget.as_mut() {
                    widget.invalidate_size();
                }
            }
        }
    }

    /// Replace the selection marker with one at `point` and record `point`
    /// as the story location.
    pub fn select_location(&mut self, point: LatLng) {
        let Some(widget) = self.widget.as_mut() else {
            log::error!("Error selecting location: map not initialized");
            self.error = Some(LocationError::MapNotReady);
            return;
        };

        if let Some(previous) = self.selected_marker.take() {
            widget.remove_marker(previous);
        }
        let marker = widget.add_marker(MarkerSpec {
            position: point,
            kind: MarkerKind::SelectedLocation,
            popup: Some(SELECTED_LOCATION_POPUP.to_string()),
        });
        widget.open_popup(marker);

        self.selected_marker = Some(marker);
        self.selected = Some(point);
        self.draft.set_location(point);
        self.info = Some(format!("Selected: {}", point));
        self.error = None;
        log::info!("Location selected: {}", point);
    }

    /// Destroy the map and forget every marker. Idempotent.
    pub fn cleanup(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.teardown();
        self.info = None;
        self.error = None;
    }

    fn teardown(&mut self) {
        if let Some(mut widget) = self.widget.take() {
            widget.remove();
            log::debug!("Location map removed");
        }
        self.user_marker = None;
        self.selected_marker = None;
        if self.selected.take().is_some() {
            self.draft.clear_location();
        }
    }
}

impl<B: MapBackend> Drop for LocationPicker<B> {
    fn drop(&mut self) {
        self.cleanup();
    }
}
