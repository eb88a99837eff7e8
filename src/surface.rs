//! Drawing surfaces shared by the raster and vector export paths.
//!
//! The compositor only talks to [`Surface`], so logo placement is computed
//! once and replayed onto either backend.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::error::Result;
use crate::logo::Logo;
use crate::style::Rgb;
use crate::vector::{Rect, VectorDocument, VectorNode};

/// A square canvas the compositor can paint on.
pub trait Surface {
    /// Side length in pixels.
    fn side(&self) -> u32;

    /// Paints an opaque rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// Draws `logo` stretched to exactly `target`. Callers pass an
    /// aspect-preserving rectangle.
    fn draw_logo(&mut self, logo: &Logo, target: Rect) -> Result<()>;
}

/// Pixel surface backed by an [`RgbaImage`].
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    /// Fresh surface filled with `background`.
    pub fn new(side: u32, background: Rgb) -> Self {
        Self { image: RgbaImage::from_pixel(side, side, background.to_rgba()) }
    }

    /// Draws `base` over the whole surface, resampling it if its size differs.
    pub fn draw_base(&mut self, base: &RgbaImage) {
        let side = self.side();
        if base.dimensions() == (side, side) {
            imageops::overlay(&mut self.image, base, 0, 0);
        } else {
            let scaled = imageops::resize(base, side, side, FilterType::Nearest);
            imageops::overlay(&mut self.image, &scaled, 0, 0);
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Integer pixel span covering `[start, start + len)`, clipped to `0..side`.
fn pixel_span(start: f64, len: f64, side: u32) -> (u32, u32) {
    let from = start.round().clamp(0.0, side as f64) as u32;
    let to = (start + len).round().clamp(0.0, side as f64) as u32;
    (from, to)
}

impl Surface for RasterSurface {
    fn side(&self) -> u32 {
        self.image.width()
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let side = self.side();
        let (x0, x1) = pixel_span(rect.x, rect.width, side);
        let (y0, y1) = pixel_span(rect.y, rect.height, side);
        let pixel = color.to_rgba();
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, pixel);
            }
        }
    }

    fn draw_logo(&mut self, logo: &Logo, target: Rect) -> Result<()> {
        let width = (target.width.round() as u32).max(1);
        let height = (target.height.round() as u32).max(1);
        let scaled = imageops::resize(logo.image(), width, height, FilterType::Lanczos3);
        imageops::overlay(
            &mut self.image,
            &scaled,
            target.x.round() as i64,
            target.y.round() as i64,
        );
        Ok(())
    }
}

/// Vector surface backed by a [`VectorDocument`].
#[derive(Debug, Clone)]
pub struct VectorSurface {
    doc: VectorDocument,
}

impl VectorSurface {
    pub fn new(doc: VectorDocument) -> Self {
        Self { doc }
    }

    pub fn into_document(self) -> VectorDocument {
        self.doc
    }
}

impl Surface for VectorSurface {
    fn side(&self) -> u32 {
        self.doc.side()
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.doc.push(VectorNode::Rect { rect, fill: color });
    }

    fn draw_logo(&mut self, logo: &Logo, target: Rect) -> Result<()> {
        let href = logo.to_data_uri()?;
        self.doc.push(VectorNode::Image { frame: target, href });
        Ok(())
    }
}
