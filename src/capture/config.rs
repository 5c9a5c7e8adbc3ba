use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    User,
    Environment, // rear camera
}

/// Best-effort hints passed to the camera when requesting a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing: FacingMode,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1280,
            ideal_height: 720,
            facing: FacingMode::Environment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg { quality: f32 },
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg { .. } => "image/jpeg",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg { .. } => "jpg",
        }
    }

    /// JPEG quality on the encoder's 1-100 scale.
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            ImageFormat::Jpeg { quality } => (quality.clamp(0.01, 1.0) * 100.0).round() as u8,
            ImageFormat::Png => 100,
        }
    }
}

impl Default for ImageFormat {
    fn default() -> Self {
        ImageFormat::Jpeg { quality: 0.8 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub constraints: StreamConstraints,
    pub format: ImageFormat,
}
