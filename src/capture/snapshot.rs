use std::io::Cursor;
use std::sync::Arc;

use image::codecs::jpeg::JpegEncoder;
use sha2::{Digest, Sha256};

use crate::capture::config::ImageFormat;
use crate::capture::device::VideoFrame;
use crate::error::CaptureError;

/// An encoded still image taken from the camera preview.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPhoto {
    bytes: Arc<[u8]>,
    width: u32,
    height: u32,
    mime_type: &'static str,
    extension: &'static str,
    digest: String,
}

impl CapturedPhoto {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// Hex SHA-256 of the encoded payload.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Upload file name derived from the content digest.
    pub fn file_name(&self) -> String {
        format!("photo-{}.{}", &self.digest[..12], self.extension)
    }
}

/// Draw `frame` into a raster at its native size and encode it.
///
/// An empty frame or an encoder that yields no bytes is reported as
/// [`CaptureError::EmptyFrame`] so the caller can retry.
pub fn encode_frame(frame: VideoFrame, format: &ImageFormat) -> Result<CapturedPhoto, CaptureError> {
    if frame.is_empty() {
        return Err(CaptureError::EmptyFrame);
    }
    let (width, height) = (frame.width, frame.height);
    let raster =
        image::RgbImage::from_raw(width, height, frame.rgb).ok_or(CaptureError::EmptyFrame)?;

    let mut buf = Vec::new();
    match format {
        ImageFormat::Jpeg { .. } => {
            let mut encoder = JpegEncoder::new_with_quality(&mut buf, format.jpeg_quality());
            encoder.encode_image(&raster)?;
        }
        ImageFormat::Png => {
            image::DynamicImage::ImageRgb8(raster)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
        }
    }
    if buf.is_empty() {
        return Err(CaptureError::EmptyFrame);
    }

    let digest = format!("{:x}", Sha256::digest(&buf));
    log::debug!("Encoded {}x{} frame into {} bytes", width, height, buf.len());

    Ok(CapturedPhoto {
        bytes: buf.into(),
        width,
        height,
        mime_type: format.mime_type(),
        extension: format.extension(),
        digest,
    })
}
