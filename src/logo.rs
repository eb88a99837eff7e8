//! Decoded logo images.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::warn;

use crate::error::Result;

/// A logo ready to be composited, kept at its natural size and aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    image: RgbaImage,
}

impl Logo {
    /// Wraps an already decoded image.
    pub fn new(image: DynamicImage) -> Self {
        Self { image: image.to_rgba8() }
    }

    /// Decodes PNG, JPEG, GIF or any other format `image` recognizes.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Image`](crate::error::ExportError::Image) if the
    /// bytes are not a supported image.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(image::load_from_memory(bytes)?))
    }

    /// Like [`Logo::decode`], but an undecodable logo is logged and dropped
    /// so the export can go ahead without it.
    pub fn decode_lenient(bytes: &[u8]) -> Option<Self> {
        match Self::decode(bytes) {
            Ok(logo) if logo.width() > 0 && logo.height() > 0 => Some(logo),
            Ok(_) => {
                warn!("logo has no pixels, exporting without it");
                None
            }
            Err(err) => {
                warn!(error = %err, "logo could not be decoded, exporting without it");
                None
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// PNG `data:` URI, used to embed the logo in SVG output.
    pub fn to_data_uri(&self) -> Result<String> {
        let mut png = Vec::new();
        self.image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
    }
}
