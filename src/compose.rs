//! Logo compositing for raster and vector exports.
//!
//! The logo sits in a square centered on the canvas whose side is
//! `canvas * logo_scale_percent / 100`. Behind it a background-colored pad,
//! [`LOGO_PADDING_PX`] wider on every side, keeps the surrounding modules
//! readable. The logo is fitted into the square without cropping or
//! stretching.
//!
//! # Example
//!
//! ```rust
//! use qirust_studio::compose::LogoPlacement;
//!
//! let placement = LogoPlacement::new(300, 20);
//! assert_eq!(placement.frame.width, 60.0);
//! assert_eq!(placement.frame.center(), (150.0, 150.0));
//! ```

use image::RgbaImage;
use tracing::{debug, warn};

use crate::error::Result;
use crate::logo::Logo;
use crate::render::Excavation;
use crate::style::Rgb;
use crate::surface::{RasterSurface, Surface, VectorSurface};
use crate::vector::{Rect, VectorDocument};

/// Margin of background color kept around the logo square.
pub const LOGO_PADDING_PX: f64 = 10.0;

/// Where the logo goes on a square canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoPlacement {
    /// Square the logo is fitted into.
    pub frame: Rect,
    /// `frame` grown by [`LOGO_PADDING_PX`], clipped to the canvas.
    pub padding: Rect,
}

impl LogoPlacement {
    /// # Arguments
    ///
    /// * `canvas_px` - Side of the output canvas.
    /// * `logo_scale_percent` - Logo side as a percentage of the canvas, capped at 100.
    pub fn new(canvas_px: u32, logo_scale_percent: u32) -> Self {
        let canvas = canvas_px as f64;
        let side = (canvas * logo_scale_percent.min(100) as f64 / 100.0).round();
        let origin = ((canvas - side) / 2.0).floor();
        let frame = Rect::new(origin, origin, side, side);

        let pad_start = (origin - LOGO_PADDING_PX).max(0.0);
        let pad_end = (origin + side + LOGO_PADDING_PX).min(canvas);
        let padding = Rect::new(pad_start, pad_start, pad_end - pad_start, pad_end - pad_start);

        Self { frame, padding }
    }

    /// The object-fit: contain rectangle for a `width × height` logo.
    pub fn contain(&self, width: u32, height: u32) -> Rect {
        if width == 0 || height == 0 {
            return self.frame;
        }
        let scale = (self.frame.width / width as f64).min(self.frame.height / height as f64);
        let w = width as f64 * scale;
        let h = height as f64 * scale;
        Rect::new(
            self.frame.x + (self.frame.width - w) / 2.0,
            self.frame.y + (self.frame.height - h) / 2.0,
            w,
            h,
        )
    }

    /// Renderer hint that keeps modules out of the padded area.
    pub fn excavation(&self) -> Excavation {
        Excavation { side_px: self.padding.width }
    }
}

/// How the area behind the logo is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoBacking {
    /// Paint the pad in this color over whatever modules are there.
    Painted(Rgb),
    /// The renderer already left the pad free of modules.
    Excavated,
}

/// Draws `logo` at `placement` on any surface.
///
/// A logo with no pixels is skipped and the surface is left as it was.
pub fn overlay_logo<S: Surface>(
    surface: &mut S,
    logo: &Logo,
    placement: &LogoPlacement,
    backing: LogoBacking,
) -> Result<()> {
    if logo.width() == 0 || logo.height() == 0 {
        warn!("logo has no pixels, compositing without it");
        return Ok(());
    }
    if let LogoBacking::Painted(background) = backing {
        surface.fill_rect(placement.padding, background);
    }
    let target = placement.contain(logo.width(), logo.height());
    debug!(
        canvas = surface.side(),
        x = target.x,
        y = target.y,
        width = target.width,
        height = target.height,
        "placing logo"
    );
    surface.draw_logo(logo, target)
}

/// Draws `base` onto a fresh `canvas_px` square and overlays the logo, if any.
///
/// The base is resampled when its size differs from `canvas_px`.
pub fn composite_raster(
    base: &RgbaImage,
    logo: Option<&Logo>,
    logo_scale_percent: u32,
    canvas_px: u32,
    background: Rgb,
) -> Result<RgbaImage> {
    let mut surface = RasterSurface::new(canvas_px, background);
    surface.draw_base(base);
    if let Some(logo) = logo {
        let placement = LogoPlacement::new(canvas_px, logo_scale_percent);
        overlay_logo(&mut surface, logo, &placement, LogoBacking::Painted(background))?;
    }
    Ok(surface.into_image())
}

/// Vector counterpart of [`composite_raster`].
///
/// `base` should have been rendered with [`LogoPlacement::excavation`] when a
/// logo is given; no pad is painted here.
pub fn composite_vector(
    base: VectorDocument,
    logo: Option<&Logo>,
    logo_scale_percent: u32,
    canvas_px: u32,
) -> Result<VectorDocument> {
    let mut surface = VectorSurface::new(base.resized(canvas_px));
    if let Some(logo) = logo {
        let placement = LogoPlacement::new(canvas_px, logo_scale_percent);
        overlay_logo(&mut surface, logo, &placement, LogoBacking::Excavated)?;
    }
    Ok(surface.into_document())
}
