//! Paints a payload's module grid as a raster image or a vector document.
//!
//! The module matrix itself comes from the [`qrcode`] crate. This module adds
//! what the styled generator needs on top of it: a quiet zone, exact output
//! size, foreground/background colors, dot shape, and an optional centered
//! excavation where no modules are drawn.

use image::RgbaImage;
use qrcode::{Color, QrCode};
use tracing::debug;

use crate::error::{ExportError, Result};
use crate::style::{DotShape, EcLevel, Rgb};
use crate::vector::{Rect, VectorDocument, VectorNode};

/// Light modules around the symbol on every side.
pub const QUIET_ZONE: usize = 4;

/// A centered square, in output pixels, kept free of modules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Excavation {
    pub side_px: f64,
}

/// Colors and shape used by both renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub foreground: Rgb,
    pub background: Rgb,
    pub shape: DotShape,
}

/// Module matrix including the quiet zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGrid {
    dimension: usize,
    dark: Vec<bool>,
}

impl ModuleGrid {
    /// Encodes `payload` at the given error correction level.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Render`] if the payload does not fit in any
    /// code version at this level.
    pub fn encode(payload: &str, ec: EcLevel) -> Result<Self> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), ec.into())
            .map_err(|e| ExportError::Render(e.to_string()))?;
        let width = code.width();
        let dimension = width + 2 * QUIET_ZONE;
        let mut dark = vec![false; dimension * dimension];
        for (i, color) in code.to_colors().iter().enumerate() {
            if *color == Color::Dark {
                let x = i % width + QUIET_ZONE;
                let y = i / width + QUIET_ZONE;
                dark[y * dimension + x] = true;
            }
        }
        Ok(Self { dimension, dark })
    }

    /// Side length in modules, quiet zone included.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns whether the module at (x, y) is dark. Outside the grid is light.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.dimension && y < self.dimension && self.dark[y * self.dimension + x]
    }

    /// Clears every module whose cell intersects the centered excavation
    /// square on a canvas of `canvas_px`.
    pub fn excavate(&mut self, excavation: Excavation, canvas_px: u32) {
        let canvas = canvas_px as f64;
        let side = excavation.side_px.clamp(0.0, canvas);
        if side <= 0.0 {
            return;
        }
        let module_px = canvas / self.dimension as f64;
        let start = (canvas - side) / 2.0;
        let end = start + side;
        let first = (start / module_px).floor() as usize;
        let last = ((end / module_px).ceil() as usize).min(self.dimension);
        for y in first..last {
            for x in first..last {
                self.dark[y * self.dimension + x] = false;
            }
        }
    }
}

fn prepare(payload: &str, ec: EcLevel, size_px: u32, excavation: Option<Excavation>) -> Result<ModuleGrid> {
    let mut grid = ModuleGrid::encode(payload, ec)?;
    if let Some(excavation) = excavation {
        grid.excavate(excavation, size_px);
    }
    debug!(
        payload_len = payload.len(),
        modules = grid.dimension(),
        size_px,
        excavated = excavation.is_some(),
        "encoded module grid"
    );
    Ok(grid)
}

/// Renders the payload into an RGBA image of exactly `size_px × size_px`.
///
/// Each output pixel samples the module under its center, so the size need
/// not be a multiple of the module count.
///
/// # Arguments
///
/// * `payload` - The text to encode.
/// * `ec` - Error correction level.
/// * `size_px` - Side of the output image in pixels.
/// * `paint` - Colors and dot shape.
/// * `excavation` - Optional centered region left free of modules.
pub fn encode_to_raster(
    payload: &str,
    ec: EcLevel,
    size_px: u32,
    paint: Paint,
    excavation: Option<Excavation>,
) -> Result<RgbaImage> {
    let grid = prepare(payload, ec, size_px, excavation)?;
    let size_px = size_px.max(1);
    let mut img = RgbaImage::from_pixel(size_px, size_px, paint.background.to_rgba());
    let dimension = grid.dimension();
    let scale = size_px as f64 / dimension as f64;
    let dark = paint.foreground.to_rgba();

    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let fx = (x as f64 + 0.5) / scale;
        let fy = (y as f64 + 0.5) / scale;
        let mx = (fx as usize).min(dimension - 1);
        let my = (fy as usize).min(dimension - 1);
        if !grid.is_dark(mx, my) {
            continue;
        }
        let inside = match paint.shape {
            DotShape::Square => true,
            DotShape::Rounded => {
                let dx = fx - mx as f64 - 0.5;
                let dy = fy - my as f64 - 0.5;
                dx * dx + dy * dy <= 0.25
            }
        };
        if inside {
            *pixel = dark;
        }
    }

    Ok(img)
}

/// Renders the payload into a vector document of `size_px` pixels.
///
/// Same arguments as [`encode_to_raster`].
pub fn encode_to_vector(
    payload: &str,
    ec: EcLevel,
    size_px: u32,
    paint: Paint,
    excavation: Option<Excavation>,
) -> Result<VectorDocument> {
    let grid = prepare(payload, ec, size_px, excavation)?;
    let dimension = grid.dimension();
    let side = size_px as f64;

    let mut d = String::new();
    for y in 0..dimension {
        for x in 0..dimension {
            if !grid.is_dark(x, y) {
                continue;
            }
            if !d.is_empty() {
                d += " ";
            }
            match paint.shape {
                DotShape::Square => d += &format!("M{},{}h1v1h-1z", x, y),
                DotShape::Rounded => {
                    d += &format!("M{},{}.5a.5,.5 0 1,0 1,0a.5,.5 0 1,0 -1,0z", x, y)
                }
            }
        }
    }

    let mut doc = VectorDocument::new(size_px);
    doc.push(VectorNode::Rect { rect: Rect::new(0.0, 0.0, side, side), fill: paint.background });
    doc.push(VectorNode::Modules { d, scale: side / dimension as f64, fill: paint.foreground });
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAINT: Paint = Paint {
        foreground: Rgb::BLACK,
        background: Rgb::WHITE,
        shape: DotShape::Square,
    };

    fn module_center(module: usize, size_px: u32, dimension: usize) -> u32 {
        ((module as f64 + 0.5) * size_px as f64 / dimension as f64) as u32
    }

    #[test]
    fn test_grid_has_quiet_zone() {
        let grid = ModuleGrid::encode("HELLO WORLD", EcLevel::High).unwrap();
        assert_eq!((grid.dimension() - 2 * QUIET_ZONE - 17) % 4, 0);
        for i in 0..grid.dimension() {
            assert!(!grid.is_dark(i, 0));
            assert!(!grid.is_dark(0, i));
        }
        // top-left finder corner
        assert!(grid.is_dark(QUIET_ZONE, QUIET_ZONE));
    }

    #[test]
    fn test_raster_exact_size() {
        for size in [128, 200, 257, 512] {
            let img = encode_to_raster("https://example.com", EcLevel::High, size, PAINT, None).unwrap();
            assert_eq!(img.dimensions(), (size, size));
        }
    }

    #[test]
    fn test_raster_colors() {
        let paint = Paint { foreground: Rgb([0x3b, 0x82, 0xf6]), background: Rgb([0xf0, 0xfd, 0xf4]), ..PAINT };
        let grid = ModuleGrid::encode("HELLO WORLD", EcLevel::High).unwrap();
        let img = encode_to_raster("HELLO WORLD", EcLevel::High, 330, paint, None).unwrap();
        assert_eq!(*img.get_pixel(0, 0), paint.background.to_rgba());
        let c = module_center(QUIET_ZONE, 330, grid.dimension());
        assert_eq!(*img.get_pixel(c, c), paint.foreground.to_rgba());
    }

    #[test]
    fn test_rounded_dots_leave_cell_corners_light() {
        let paint = Paint { shape: DotShape::Rounded, ..PAINT };
        let grid = ModuleGrid::encode("HELLO WORLD", EcLevel::High).unwrap();
        let img = encode_to_raster("HELLO WORLD", EcLevel::High, 512, paint, None).unwrap();
        let scale = 512.0 / grid.dimension() as f64;
        let corner = (QUIET_ZONE as f64 * scale).ceil() as u32;
        assert_eq!(*img.get_pixel(corner, corner), Rgb::WHITE.to_rgba());
        let c = module_center(QUIET_ZONE, 512, grid.dimension());
        assert_eq!(*img.get_pixel(c, c), Rgb::BLACK.to_rgba());
    }

    #[test]
    fn test_excavation_clears_center() {
        let size = 300;
        let side = 90.0;
        let img = encode_to_raster(
            "https://example.com/some/longer/path?with=query",
            EcLevel::High,
            size,
            PAINT,
            Some(Excavation { side_px: side }),
        )
        .unwrap();
        let start = ((size as f64 - side) / 2.0) as u32;
        for y in start..start + side as u32 {
            for x in start..start + side as u32 {
                assert_eq!(*img.get_pixel(x, y), Rgb::WHITE.to_rgba());
            }
        }
    }

    #[test]
    fn test_excavation_only_touches_overlapping_modules() {
        let mut grid = ModuleGrid::encode("HELLO WORLD", EcLevel::High).unwrap();
        grid.excavate(Excavation { side_px: 60.0 }, 300);
        // finder patterns sit in the corners, far from a 20% center square
        assert!(grid.is_dark(QUIET_ZONE, QUIET_ZONE));
        let far = grid.dimension() - QUIET_ZONE - 1;
        assert!(grid.is_dark(far, QUIET_ZONE));
        assert!(grid.is_dark(QUIET_ZONE, far));
    }

    #[test]
    fn test_vector_document() {
        let doc = encode_to_vector("HELLO WORLD", EcLevel::High, 256, PAINT, None).unwrap();
        assert_eq!(doc.side(), 256);
        let svg = doc.to_svg_string();
        assert!(svg.contains("viewBox=\"0 0 256 256\""));
        assert!(svg.contains(&format!("M{0},{0}h1v1h-1z", QUIET_ZONE)));
    }

    #[test]
    fn test_vector_rounded_and_excavated() {
        let paint = Paint { shape: DotShape::Rounded, ..PAINT };
        let plain = encode_to_vector("HELLO WORLD", EcLevel::High, 256, paint, None).unwrap();
        let dug = encode_to_vector("HELLO WORLD", EcLevel::High, 256, paint, Some(Excavation { side_px: 80.0 }))
            .unwrap();
        let count = |doc: &VectorDocument| doc.to_svg_string().matches('M').count();
        assert!(count(&dug) < count(&plain));
        assert!(plain.to_svg_string().contains("a.5,.5 0 1,0 1,0"));
    }

    #[test]
    fn test_payload_too_long() {
        let payload = "a".repeat(3000);
        let err = encode_to_raster(&payload, EcLevel::High, 256, PAINT, None).unwrap_err();
        assert!(matches!(err, ExportError::Render(_)));
    }
}
