//! Visual style of a rendered code: colors, size, logo scale and dot shape.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::{ColorParseError, Result};

/// Smallest selectable code size in pixels.
pub const MIN_CODE_PX: u32 = 128;
/// Largest selectable code size in pixels.
pub const MAX_CODE_PX: u32 = 512;
/// Smallest logo side, as a percentage of the code size.
pub const MIN_LOGO_PERCENT: u32 = 10;
/// Largest logo side, as a percentage of the code size.
pub const MAX_LOGO_PERCENT: u32 = 100;

/// A 24-bit sRGB color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([0xff, 0xff, 0xff]);
    pub const BLACK: Rgb = Rgb([0x00, 0x00, 0x00]);

    /// Opaque pixel of this color.
    pub const fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.0[0], self.0[1], self.0[2], 0xff])
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Parses `#rrggbb` or `#rgb`; the `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError { input: s.to_string() };
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if !hex.is_ascii() {
            return Err(err());
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map_err(|_| err());
        match hex.len() {
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
                Ok(Rgb([byte(0)?, byte(2)?, byte(4)?]))
            }
            3 => Ok(Rgb([nibble(0)? * 0x11, nibble(1)? * 0x11, nibble(2)? * 0x11])),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

/// Shape used to paint each dark module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DotShape {
    #[default]
    Square,
    Rounded,
}

/// Error correction level of the code.
///
/// Styled codes always use [`EcLevel::High`], since the logo hides modules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EcLevel {
    /// Recovers up to about 7% damaged codewords.
    #[serde(rename = "L")]
    Low,
    /// Recovers up to about 15% damaged codewords.
    #[serde(rename = "M")]
    Medium,
    /// Recovers up to about 25% damaged codewords.
    #[serde(rename = "Q")]
    Quartile,
    /// Recovers up to about 30% damaged codewords.
    #[default]
    #[serde(rename = "H")]
    High,
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(value: EcLevel) -> Self {
        match value {
            EcLevel::Low => qrcode::EcLevel::L,
            EcLevel::Medium => qrcode::EcLevel::M,
            EcLevel::Quartile => qrcode::EcLevel::Q,
            EcLevel::High => qrcode::EcLevel::H,
        }
    }
}

/// Named foreground/background pairs offered next to the color pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorPreset {
    Classic,
    Modern,
    Nature,
    Royal,
}

impl ColorPreset {
    pub const ALL: [ColorPreset; 4] = [
        ColorPreset::Classic,
        ColorPreset::Modern,
        ColorPreset::Nature,
        ColorPreset::Royal,
    ];

    /// `(foreground, background)`.
    pub const fn colors(self) -> (Rgb, Rgb) {
        match self {
            ColorPreset::Classic => (Rgb([0x0f, 0x17, 0x2a]), Rgb::WHITE),
            ColorPreset::Modern => (Rgb([0x3b, 0x82, 0xf6]), Rgb::WHITE),
            ColorPreset::Nature => (Rgb([0x06, 0x5f, 0x46]), Rgb([0xf0, 0xfd, 0xf4])),
            ColorPreset::Royal => (Rgb([0x43, 0x38, 0xca]), Rgb([0xf5, 0xf3, 0xff])),
        }
    }
}

/// Style parameters shared by preview and export.
///
/// Loaded from JSON with [`StyleSpec::from_json`]; missing keys take the
/// defaults and out-of-range numbers are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleSpec {
    pub foreground_color: Rgb,
    pub background_color: Rgb,
    pub code_pixel_size: u32,
    pub logo_scale_percent: u32,
    pub dot_shape: DotShape,
    pub error_correction: EcLevel,
}

impl Default for StyleSpec {
    fn default() -> Self {
        let (foreground_color, background_color) = ColorPreset::Classic.colors();
        Self {
            foreground_color,
            background_color,
            code_pixel_size: 256,
            logo_scale_percent: 20,
            dot_shape: DotShape::Square,
            error_correction: EcLevel::High,
        }
    }
}

impl StyleSpec {
    /// Parses a (possibly partial) JSON style document.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Config`](crate::error::ExportError::Config) if
    /// the document is not valid JSON or a color is malformed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use qirust_studio::style::StyleSpec;
    ///
    /// let style = StyleSpec::from_json(r##"{"foregroundColor":"#3b82f6","codePixelSize":9000}"##).unwrap();
    /// assert_eq!(style.code_pixel_size, 512);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let style: StyleSpec = serde_json::from_str(json)?;
        Ok(style.normalized())
    }

    /// Clamps sizes into range and pins error correction to `H`.
    pub fn normalized(self) -> Self {
        Self {
            code_pixel_size: self.code_pixel_size.clamp(MIN_CODE_PX, MAX_CODE_PX),
            logo_scale_percent: self.logo_scale_percent.clamp(MIN_LOGO_PERCENT, MAX_LOGO_PERCENT),
            error_correction: EcLevel::High,
            ..self
        }
    }

    pub fn with_preset(self, preset: ColorPreset) -> Self {
        let (foreground_color, background_color) = preset.colors();
        Self { foreground_color, background_color, ..self }
    }
}
