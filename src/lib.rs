//! # qirust-studio
//!
//! Payload encoding and styled export for QR codes.
//!
//! `qirust-studio` turns structured content (a URL, a contact card, a
//! messaging link, an email, an SMS or a calendar event) into the exact text
//! scanner apps expect, then renders that text as a styled QR code with an
//! optional centered logo and exports it as PNG, SVG or a clipboard image.
//!
//! ## Features
//!
//! - Encode vCard 3.0, iCalendar VEVENT, `mailto:`, `sms:` and `wa.me` payloads.
//! - Keep every content type's fields for the whole session with [`state::ContentState`].
//! - Custom foreground/background colors, square or rounded dots, presets.
//! - Logo overlay with a background pad (PNG) or module excavation (SVG).
//! - Exports at the requested resolution, independent of the capped preview.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Example
//!
//! Encode a contact card:
//!
//! ```rust
//! use qirust_studio::payload::{encode, Contact, ContentModel};
//!
//! let card = ContentModel::Contact(Contact {
//!     first_name: "Jane".into(),
//!     last_name: "Doe".into(),
//!     ..Default::default()
//! });
//! assert!(encode(&card).starts_with("BEGIN:VCARD\nVERSION:3.0\nN:Doe;Jane;;;"));
//! ```
//!
//! Render and save a styled PNG with a logo:
//!
//! ```rust,no_run
//! use qirust_studio::export::{DirectorySink, ExportFormat, ExportRequest};
//! use qirust_studio::logo::Logo;
//! use qirust_studio::style::{ColorPreset, StyleSpec};
//!
//! let logo = Logo::decode_lenient(&std::fs::read("logo.png").unwrap_or_default());
//! let style = StyleSpec { code_pixel_size: 512, ..StyleSpec::default() }.with_preset(ColorPreset::Modern);
//! let request = ExportRequest::new("https://example.com", style, ExportFormat::Png);
//! request.export(logo.as_ref(), "styled_qr", &mut DirectorySink::new("output")).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`payload`]: Content models and payload encoding.
//! - [`state`]: Session state holding all content types at once.
//! - [`style`]: Colors, sizes, dot shape and presets.
//! - [`render`]: Module grid painting for raster and vector output.
//! - [`compose`]: Logo placement and compositing.
//! - [`export`]: Preview/export rendering, downloads and clipboard.

#![forbid(unsafe_code)]

pub mod compose;
pub mod error;
pub mod export;
pub mod logo;
pub mod payload;
pub mod render;
pub mod state;
pub mod style;
pub mod surface;
pub mod vector;

pub use error::{ExportError, Result};
pub use payload::{encode, ContentModel};
pub use state::{ContentKind, ContentState};
