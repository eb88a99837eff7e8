//! Error types for rendering, compositing and exporting codes.

use thiserror::Error;

use crate::export::ExportFormat;

/// Errors that can occur while rendering or exporting a code.
///
/// Payload encoding never fails, so there is no encoder error here.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The payload could not be turned into a module matrix.
    #[error("code rendering failed: {0}")]
    Render(String),

    /// Image encoding or decoding failed.
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// Writing the exported file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The asset cannot be serialized in the requested format.
    #[error("{asset} asset cannot be exported as {format}")]
    UnsupportedFormat {
        asset: &'static str,
        format: ExportFormat,
    },

    /// A style or content document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Error returned when a hex color string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color: {input:?}")]
pub struct ColorParseError {
    pub input: String,
}

/// Error reported by a host clipboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    /// The host refused access to the clipboard.
    #[error("clipboard access denied")]
    PermissionDenied,

    /// The host clipboard is not available in this environment.
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
}

/// Convenience alias used across the crate.
pub type Result<T, E = ExportError> = std::result::Result<T, E>;
