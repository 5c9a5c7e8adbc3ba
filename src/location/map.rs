use serde::{Deserialize, Serialize};

use crate::error::LocationError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

/// South-west / north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// Smallest box containing every point, or `None` for no points.
    pub fn enclosing(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    south_west: p,
                    north_east: p,
                },
                Some(b) => Bounds {
                    south_west: LatLng::new(b.south_west.lat.min(p.lat), b.south_west.lng.min(p.lng)),
                    north_east: LatLng::new(b.north_east.lat.max(p.lat), b.north_east.lng.max(p.lng)),
                },
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerKind {
    CurrentLocation,
    SelectedLocation,
    Story,
}

impl MarkerKind {
    pub fn glyph(&self) -> &'static str {
        match self {
            MarkerKind::CurrentLocation => "📍",
            MarkerKind::SelectedLocation => "📌",
            MarkerKind::Story => "📖",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub position: LatLng,
    pub kind: MarkerKind,
    pub popup: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

/// Input delivered to a picker by the host's map widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Click(LatLng),
    Resize,
}

/// A live interactive map.
pub trait MapWidget {
    fn set_view(&mut self, center: LatLng, zoom: u8);
    fn add_marker(&mut self, marker: MarkerSpec) -> MarkerId;
    fn remove_marker(&mut self, id: MarkerId);
    fn open_popup(&mut self, id: MarkerId);
    fn fit_bounds(&mut self, bounds: Bounds, padding: u32, max_zoom: u8);
    fn invalidate_size(&mut self);
    /// Tear the widget down. It is not used afterwards.
    fn remove(&mut self);
}

/// Creates map widgets inside named containers.
pub trait MapBackend {
    type Widget: MapWidget;

    fn create(&mut self, container: &str, center: LatLng, zoom: u8) -> Result<Self::Widget, LocationError>;
}
