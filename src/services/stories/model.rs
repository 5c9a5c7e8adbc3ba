use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capture::snapshot::CapturedPhoto;
use crate::error::ApiError;
use crate::location::LatLng;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

impl StoryRecord {
    pub fn location(&self) -> Option<LatLng> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(LatLng::new(lat, lon)),
            _ => None,
        }
    }
}

/// A complete, sanitized story ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStory {
    pub name: String,
    pub description: String,
    pub photo: CapturedPhoto,
    pub location: LatLng,
}

/// Every API response carries `error` and `message` next to its payload.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Envelope<T> {
    pub fn into_body(self, fallback: &str) -> Result<T, ApiError> {
        if self.error {
            let message = if self.message.is_empty() {
                fallback.to_string()
            } else {
                self.message
            };
            return Err(ApiError::Rejected(message));
        }
        Ok(self.body)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StoryList {
    #[serde(rename = "listStory", default)]
    pub list_story: Vec<StoryRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StoryDetail {
    pub story: Option<StoryRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Ack {}
