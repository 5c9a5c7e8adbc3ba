pub mod geolocation;
pub mod map;
pub mod picker;

pub use geolocation::{request_fix, FixRequest, FixResolution, Geolocator, Position, PositionOptions};
pub use map::{Bounds, LatLng, MapBackend, MapEvent, MapWidget, MarkerId, MarkerKind, MarkerSpec};
pub use picker::LocationPicker;
