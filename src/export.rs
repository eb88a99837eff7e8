//! Export pipeline: render a request at full resolution, then save it or
//! copy it to the clipboard.
//!
//! The on-screen preview is capped at [`PREVIEW_CAP_PX`], but downloads and
//! clipboard images are always rendered at the requested size. Every call
//! renders a fresh asset, so nothing is shared between two exports.
//!
//! # Example
//!
//! ```rust,no_run
//! use qirust_studio::export::{DirectorySink, ExportFormat, ExportRequest};
//! use qirust_studio::style::StyleSpec;
//!
//! let request = ExportRequest::new("https://example.com", StyleSpec::default(), ExportFormat::Png);
//! let mut sink = DirectorySink::default();
//! request.export(None, "qrcode", &mut sink).unwrap();
//! ```

use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::compose::{composite_raster, composite_vector, LogoPlacement};
use crate::error::{ClipboardError, ExportError, Result};
use crate::logo::Logo;
use crate::render::{encode_to_raster, encode_to_vector, Paint};
use crate::style::StyleSpec;
use crate::vector::VectorDocument;

/// Largest side the on-screen preview is drawn at.
pub const PREVIEW_CAP_PX: u32 = 300;

/// How long the "copied" indicator stays up.
pub const COPY_FEEDBACK: Duration = Duration::from_secs(2);

/// File stem used when the caller gives no file name.
pub const DEFAULT_FILE_STEM: &str = "qrcode";

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Svg,
}

impl ExportFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
        }
    }

    pub const fn media_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Svg => "image/svg+xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A finished, composited code.
#[derive(Debug, Clone)]
pub enum Asset {
    Raster(RgbaImage),
    Vector(VectorDocument),
}

impl Asset {
    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Asset::Raster(img) => img.dimensions(),
            Asset::Vector(doc) => (doc.side(), doc.side()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Asset::Raster(_) => "raster",
            Asset::Vector(_) => "vector",
        }
    }

    /// Serializes the asset.
    ///
    /// # Errors
    ///
    /// Raster assets only serialize to PNG and vector assets only to SVG;
    /// any other pairing returns [`ExportError::UnsupportedFormat`].
    pub fn to_bytes(&self, format: ExportFormat) -> Result<Vec<u8>> {
        match (self, format) {
            (Asset::Raster(img), ExportFormat::Png) => {
                let mut bytes = Vec::new();
                img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
                Ok(bytes)
            }
            (Asset::Vector(doc), ExportFormat::Svg) => Ok(doc.to_svg_string().into_bytes()),
            (asset, format) => Err(ExportError::UnsupportedFormat { asset: asset.kind(), format }),
        }
    }
}

/// Side the preview is drawn at for a requested size.
pub fn preview_side(requested_px: u32) -> u32 {
    requested_px.min(PREVIEW_CAP_PX)
}

/// One export action: what to encode, how it looks, and the file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub payload: String,
    pub style: StyleSpec,
    pub format: ExportFormat,
}

impl ExportRequest {
    pub fn new(payload: impl Into<String>, style: StyleSpec, format: ExportFormat) -> Self {
        Self { payload: payload.into(), style, format }
    }

    /// Renders the asset at the requested resolution.
    pub fn render(&self, logo: Option<&Logo>) -> Result<Asset> {
        let style = self.style.normalized();
        self.render_at(&style, style.code_pixel_size, self.format, logo)
    }

    /// Renders the raster preview, capped at [`PREVIEW_CAP_PX`].
    pub fn render_preview(&self, logo: Option<&Logo>) -> Result<Asset> {
        let style = self.style.normalized();
        self.render_at(&style, preview_side(style.code_pixel_size), ExportFormat::Png, logo)
    }

    fn render_at(
        &self,
        style: &StyleSpec,
        side: u32,
        format: ExportFormat,
        logo: Option<&Logo>,
    ) -> Result<Asset> {
        let paint = Paint {
            foreground: style.foreground_color,
            background: style.background_color,
            shape: style.dot_shape,
        };
        let ec = style.error_correction;
        debug!(side, %format, with_logo = logo.is_some(), "rendering asset");
        match format {
            ExportFormat::Png => {
                let base = encode_to_raster(&self.payload, ec, side, paint, None)?;
                let image = composite_raster(
                    &base,
                    logo,
                    style.logo_scale_percent,
                    side,
                    style.background_color,
                )?;
                Ok(Asset::Raster(image))
            }
            ExportFormat::Svg => {
                let excavation =
                    logo.map(|_| LogoPlacement::new(side, style.logo_scale_percent).excavation());
                let base = encode_to_vector(&self.payload, ec, side, paint, excavation)?;
                let doc = composite_vector(base, logo, style.logo_scale_percent, side)?;
                Ok(Asset::Vector(doc))
            }
        }
    }

    /// Renders and hands the file to `sink`. Returns whether a file was saved.
    pub fn export<D: DownloadSink + ?Sized>(
        &self,
        logo: Option<&Logo>,
        filename: &str,
        sink: &mut D,
    ) -> Result<bool> {
        let asset = self.render(logo)?;
        export_asset(Some(&asset), filename, self.format, sink)
    }

    /// Renders a full-resolution PNG and copies it to the clipboard.
    pub fn copy_to_clipboard<C: Clipboard + ?Sized>(&self, logo: Option<&Logo>, clipboard: &mut C) -> bool {
        let request = Self { format: ExportFormat::Png, ..self.clone() };
        match request.render(logo) {
            Ok(asset) => copy_asset_to_clipboard(Some(&asset), clipboard),
            Err(err) => {
                warn!(error = %err, "could not render code for clipboard");
                false
            }
        }
    }
}

/// Host download mechanism.
pub trait DownloadSink {
    fn save(&mut self, filename: &str, media_type: &str, bytes: &[u8]) -> std::io::Result<()>;
}

/// Saves downloads into a directory, creating it on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl Default for DirectorySink {
    fn default() -> Self {
        Self::new("generated")
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, filename: &str, media_type: &str, bytes: &[u8]) -> std::io::Result<()> {
        if !self.directory.exists() {
            fs::create_dir_all(&self.directory)?;
        }
        let path = self.directory.join(filename);
        debug!(path = %path.display(), media_type, len = bytes.len(), "saving export");
        fs::write(path, bytes)
    }
}

/// Final file name: directory parts dropped, default stem when empty, and
/// the format's extension appended unless already present.
pub fn file_name_for(filename: &str, format: ExportFormat) -> String {
    let base = Path::new(filename.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("");
    let base = if base.is_empty() { DEFAULT_FILE_STEM } else { base };
    let has_extension = Path::new(base)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(format.extension()));
    if has_extension {
        base.to_string()
    } else {
        format!("{}.{}", base, format.extension())
    }
}

/// Serializes `asset` and hands it to the download sink.
///
/// With no asset this does nothing and returns `Ok(false)`.
///
/// # Errors
///
/// Fails on a format the asset cannot produce or when the sink cannot
/// store the file.
pub fn export_asset<D: DownloadSink + ?Sized>(
    asset: Option<&Asset>,
    filename: &str,
    format: ExportFormat,
    sink: &mut D,
) -> Result<bool> {
    let Some(asset) = asset else {
        warn!("nothing to export");
        return Ok(false);
    };
    let bytes = asset.to_bytes(format)?;
    let name = file_name_for(filename, format);
    sink.save(&name, format.media_type(), &bytes)?;
    Ok(true)
}

/// PNG image handed to a clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Host clipboard.
pub trait Clipboard {
    fn set_image(&mut self, image: ClipboardImage) -> Result<(), ClipboardError>;
}

/// Places a raster asset on the clipboard as a PNG.
///
/// Returns `false` when there is no asset, the asset is a vector document,
/// or the host refuses the write. Failures are logged, never raised.
pub fn copy_asset_to_clipboard<C: Clipboard + ?Sized>(asset: Option<&Asset>, clipboard: &mut C) -> bool {
    let Some(asset) = asset else {
        warn!("nothing to copy");
        return false;
    };
    let Asset::Raster(img) = asset else {
        warn!("only raster codes can be copied");
        return false;
    };
    let png = match asset.to_bytes(ExportFormat::Png) {
        Ok(png) => png,
        Err(err) => {
            warn!(error = %err, "could not encode clipboard image");
            return false;
        }
    };
    let (width, height) = img.dimensions();
    match clipboard.set_image(ClipboardImage { width, height, png }) {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "clipboard write failed");
            false
        }
    }
}

/// Transient "copied" indicator.
///
/// Shows for [`COPY_FEEDBACK`] after the last successful copy; copying again
/// restarts the timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
}

impl CopyFeedback {
    pub fn mark_copied(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    /// Records the outcome of a copy. Failed copies leave the indicator as is.
    pub fn record(&mut self, copied: bool, now: Instant) {
        if copied {
            self.mark_copied(now);
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < COPY_FEEDBACK)
    }
}
