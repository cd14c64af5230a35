//! Layout configuration: page geometry, colors, fonts and logo.
//!
//! Every field has a default, so a JSON file only needs to name what it
//! changes. Units are page units (PDF points at the default 2100 x 2970
//! page size).

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options controlling how a section tree is laid out and drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Palette
    pub colors: ColorConfig,

    /// Page size, margins and box geometry
    pub dimensions: Dimensions,

    /// Font files and sizes
    pub font: FontConfig,

    /// Optional footer logo
    pub logo: LogoConfig,

    /// Title of the cover page; `None` skips the cover page
    pub cover_title: Option<String>,
}

impl LayoutConfig {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse a config from JSON text and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the page size.
    pub fn with_page_size(mut self, width: f32, height: f32) -> Self {
        self.dimensions.page = PageSize { width, height };
        self
    }

    /// Set the cover page title.
    pub fn with_cover_title(mut self, title: impl Into<String>) -> Self {
        self.cover_title = Some(title.into());
        self
    }

    /// Do not emit a cover page.
    pub fn without_cover(mut self) -> Self {
        self.cover_title = None;
        self
    }

    /// Set the regular and bold font files.
    pub fn with_fonts(mut self, regular: impl Into<PathBuf>, bold: impl Into<PathBuf>) -> Self {
        self.font.regular = regular.into();
        self.font.bold = bold.into();
        self
    }

    /// Set the logo file.
    pub fn with_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo.path = Some(path.into());
        self
    }

    /// Do not draw a logo.
    pub fn without_logo(mut self) -> Self {
        self.logo.path = None;
        self
    }

    /// Top edge of the content area (where the cursor starts on each page).
    pub fn content_top(&self) -> f32 {
        self.dimensions.main_content_top_margin + self.dimensions.feature_margin
    }

    /// Lowest y a box may reach.
    pub fn usable_bottom(&self) -> f32 {
        self.dimensions.page.height - self.dimensions.main_content_top_margin
    }

    /// Height available to boxes on an empty page.
    pub fn available_height(&self) -> f32 {
        self.usable_bottom() - self.content_top()
    }

    /// Check that the geometry leaves room for content.
    pub fn validate(&self) -> Result<()> {
        let d = &self.dimensions;
        if d.page.width <= 0.0 || d.page.height <= 0.0 {
            return Err(Error::Config(format!(
                "page size must be positive, got {} x {}",
                d.page.width, d.page.height
            )));
        }
        if self.available_height() <= 0.0 {
            return Err(Error::Config(
                "top margins leave no room for content".to_string(),
            ));
        }
        if d.main_content_side_margin + d.inner_width > d.page.width {
            return Err(Error::Config(
                "inner width does not fit between the side margins".to_string(),
            ));
        }
        if d.title_box_width <= 0.0 || d.content_box_width <= 0.0 {
            return Err(Error::Config("text columns must be wider than zero".to_string()));
        }
        for (name, ratio) in [
            ("child_band_ratio", d.child_band_ratio),
            ("grandchild_band_ratio", d.grandchild_band_ratio),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(Error::Config(format!("{} must be in (0, 1], got {}", name, ratio)));
            }
        }
        if self.font.sizes.regular <= 0.0 || self.font.sizes.large <= 0.0 {
            return Err(Error::Config("font sizes must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            colors: ColorConfig::default(),
            dimensions: Dimensions::default(),
            font: FontConfig::default(),
            logo: LogoConfig::default(),
            cover_title: Some("Document".to_string()),
        }
    }
}

/// Palette used by the PDF writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Page rules and child section bands
    pub primary: Color,
    /// Grandchild bands and content panels
    pub secondary: Color,
    /// Rules around great-grandchild sections
    pub border: Color,
    /// Page fill
    pub background: Color,
    /// Badge digits
    pub text_secondary: Color,
    /// Body text
    pub text: Color,
    /// Text drawn on primary bands
    pub text_on_primary: Color,
    /// Header badge circle
    pub badge: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: Color::rgb(0x4B, 0x59, 0x47),
            secondary: Color::rgb(0xF3, 0xF5, 0xF3),
            border: Color::rgb(0xC7, 0xD9, 0xC3),
            background: Color::rgb(0xF8, 0xF7, 0xF7),
            text_secondary: Color::rgb(0x77, 0x7F, 0x74),
            text: Color::rgb(0x00, 0x00, 0x00),
            text_on_primary: Color::rgb(0xFF, 0xFF, 0xFF),
            badge: Color::rgb(0xD9, 0xD9, 0xD9),
        }
    }
}

/// Page size in page units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

/// Page geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub page: PageSize,
    /// Gap between boxes, and between the header rule and the first box
    pub feature_margin: f32,
    pub main_content_side_margin: f32,
    /// Distance from the top (and bottom) page edge to the header (footer) rule
    pub main_content_top_margin: f32,
    pub border_height: f32,
    /// Width of the content area between side margins
    pub inner_width: f32,
    /// Vertical padding above and below a box's text
    pub inner_box_margin: f32,
    pub title_box_width: f32,
    pub content_box_width: f32,
    /// Horizontal offset of a box's title from its left edge
    pub text_inset_x: f32,
    /// Vertical offset of a box's text from its top edge
    pub text_inset_y: f32,
    /// Gap between the title column and the content column
    pub content_offset: f32,
    pub badge_radius: f32,
    /// Share of the inner width used by child section bands
    pub child_band_ratio: f32,
    /// Share of the inner width used by grandchild section bands
    pub grandchild_band_ratio: f32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            page: PageSize {
                width: 2100.0,
                height: 2970.0,
            },
            feature_margin: 43.0,
            main_content_side_margin: 120.0,
            main_content_top_margin: 200.0,
            border_height: 3.0,
            inner_width: 1860.0,
            inner_box_margin: 20.0,
            title_box_width: 580.0,
            content_box_width: 1100.0,
            text_inset_x: 36.0,
            text_inset_y: 26.0,
            content_offset: 156.0,
            badge_radius: 35.0,
            child_band_ratio: 1.0,
            grandchild_band_ratio: 0.5,
        }
    }
}

/// Font files (TrueType) and sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub regular: PathBuf,
    pub bold: PathBuf,
    pub sizes: FontSizes,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular: PathBuf::from("./calibri-regular.ttf"),
            bold: PathBuf::from("./calibri-bold.ttf"),
            sizes: FontSizes::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSizes {
    /// Box text and badge digits
    pub regular: f32,
    /// Page titles
    pub large: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            regular: 36.0,
            large: 48.0,
        }
    }
}

/// Footer logo. The file is optional: when missing it is skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogoConfig {
    pub path: Option<PathBuf>,
    pub width: f32,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from("./icons/logo.png")),
            width: 200.0,
        }
    }
}

/// An sRGB color, written as `#RRGGBB` in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Config(format!("invalid color {:?}", hex)));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| Error::Config(format!("invalid color {:?}", hex)))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Channels scaled to 0.0..=1.0.
    pub fn components(&self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let config = LayoutConfig::default();
        assert_eq!(config.content_top(), 243.0);
        assert_eq!(config.usable_bottom(), 2770.0);
        assert_eq!(config.available_height(), 2527.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = LayoutConfig::new()
            .with_page_size(1000.0, 1400.0)
            .without_cover()
            .without_logo()
            .with_fonts("a.ttf", "b.ttf");

        assert_eq!(config.dimensions.page.height, 1400.0);
        assert!(config.cover_title.is_none());
        assert!(config.logo.path.is_none());
        assert_eq!(config.font.bold, PathBuf::from("b.ttf"));
    }

    #[test]
    fn test_color_hex() {
        let color = Color::from_hex("#4B5947").unwrap();
        assert_eq!(color, Color::rgb(0x4B, 0x59, 0x47));
        assert_eq!(color.to_string(), "#4B5947");
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("zzzzzz").is_err());
    }

    #[test]
    fn test_partial_json() {
        let config = LayoutConfig::from_json_str(
            r##"{
                "colors": { "primary": "#102030" },
                "dimensions": { "page": { "width": 2100, "height": 1500 } },
                "cover_title": null
            }"##,
        )
        .unwrap();

        assert_eq!(config.colors.primary, Color::rgb(0x10, 0x20, 0x30));
        assert_eq!(config.colors.secondary, ColorConfig::default().secondary);
        assert_eq!(config.dimensions.page.height, 1500.0);
        assert_eq!(config.dimensions.inner_width, 1860.0);
        assert!(config.cover_title.is_none());
    }

    #[test]
    fn test_invalid_json_color() {
        let result = LayoutConfig::from_json_str(r#"{ "colors": { "primary": "green" } }"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_tiny_page() {
        let config = LayoutConfig::new().with_page_size(2100.0, 400.0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
