//! Font loading and text metrics.
//!
//! The layout engine only needs advances and line heights, so it talks to
//! fonts through [`FontMetrics`]. TrueType files are parsed once at load time
//! and their Unicode cmap is flattened into a lookup table; the PDF writer
//! reuses the same table to encode text as glyph ids.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{Error, Result};

use super::config::FontConfig;

/// Horizontal and vertical metrics of a font at a given size.
pub trait FontMetrics {
    /// Advance width of `ch` at `size`.
    fn advance(&self, ch: char, size: f32) -> f32;

    /// Distance between consecutive baselines at `size`.
    fn line_height(&self, size: f32) -> f32;

    /// Height of the ascender above the baseline at `size`.
    fn ascent(&self, size: f32) -> f32;

    /// Advance width of a whole string.
    fn text_width(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.advance(ch, size)).sum()
    }
}

/// A glyph id and its advance in font units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub id: u16,
    pub advance: u16,
}

/// A parsed TrueType font with its program kept for embedding.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    name: String,
    data: Vec<u8>,
    units_per_em: f32,
    ascender: i16,
    descender: i16,
    line_gap: i16,
    cap_height: i16,
    bbox: [i16; 4],
    glyphs: HashMap<char, Glyph>,
    notdef: Glyph,
}

impl TrueTypeFont {
    /// Load a font file. A missing file is a [`Error::MissingResource`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::MissingResource(path.to_path_buf()));
        }

        let data = std::fs::read(path)?;
        let fallback = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Embedded".to_string());
        Self::from_bytes(fallback, data)
    }

    /// Parse a font program held in memory.
    pub fn from_bytes(fallback_name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| Error::FontDecode(e.to_string()))?;

        let mut glyphs = HashMap::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if !subtable.is_unicode() {
                    continue;
                }
                subtable.codepoints(|code_point| {
                    let Some(ch) = char::from_u32(code_point) else {
                        return;
                    };
                    if let Some(id) = subtable.glyph_index(code_point) {
                        let advance = face.glyph_hor_advance(id).unwrap_or(0);
                        glyphs.entry(ch).or_insert(Glyph { id: id.0, advance });
                    }
                });
            }
        }

        if glyphs.is_empty() {
            return Err(Error::FontDecode(
                "font has no Unicode character map".to_string(),
            ));
        }

        let notdef_id = ttf_parser::GlyphId(0);
        let notdef = Glyph {
            id: 0,
            advance: face.glyph_hor_advance(notdef_id).unwrap_or(0),
        };
        let rect = face.global_bounding_box();
        let name = postscript_name(&face).unwrap_or_else(|| fallback_name.into());

        log::debug!("Loaded font {} with {} mapped characters", name, glyphs.len());

        Ok(Self {
            name: sanitize_name(&name),
            units_per_em: face.units_per_em() as f32,
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
            cap_height: face.capital_height().unwrap_or(face.ascender()),
            bbox: [rect.x_min, rect.y_min, rect.x_max, rect.y_max],
            glyphs,
            notdef,
            data,
        })
    }

    /// PostScript name, safe to use as a PDF name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw font program.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Glyph for `ch`, or `.notdef` when the font does not cover it.
    pub fn glyph(&self, ch: char) -> Glyph {
        self.glyphs.get(&ch).copied().unwrap_or(self.notdef)
    }

    /// Scale a value in font units to the PDF glyph space (1000 per em).
    pub fn to_pdf_units(&self, value: i32) -> i64 {
        (value as f32 * 1000.0 / self.units_per_em).round() as i64
    }

    pub fn ascender(&self) -> i16 {
        self.ascender
    }

    pub fn descender(&self) -> i16 {
        self.descender
    }

    pub fn cap_height(&self) -> i16 {
        self.cap_height
    }

    pub fn bbox(&self) -> [i16; 4] {
        self.bbox
    }
}

impl FontMetrics for TrueTypeFont {
    fn advance(&self, ch: char, size: f32) -> f32 {
        self.glyph(ch).advance as f32 * size / self.units_per_em
    }

    fn line_height(&self, size: f32) -> f32 {
        let units = self.ascender as f32 - self.descender as f32 + self.line_gap as f32;
        units * size / self.units_per_em
    }

    fn ascent(&self, size: f32) -> f32 {
        self.ascender as f32 * size / self.units_per_em
    }
}

/// Base-14 fonts every PDF reader provides. Only Courier is offered because
/// its metrics are exact without an AFM table: every glyph is 600 units wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Courier,
    CourierBold,
}

impl StandardFont {
    const UNITS_PER_EM: f32 = 1000.0;
    const ADVANCE: f32 = 600.0;
    const ASCENDER: f32 = 629.0;
    const DESCENDER: f32 = -157.0;

    /// Base font name written into the PDF.
    pub fn base_name(&self) -> &'static str {
        match self {
            StandardFont::Courier => "Courier",
            StandardFont::CourierBold => "Courier-Bold",
        }
    }
}

impl FontMetrics for StandardFont {
    fn advance(&self, _ch: char, size: f32) -> f32 {
        Self::ADVANCE * size / Self::UNITS_PER_EM
    }

    fn line_height(&self, size: f32) -> f32 {
        (Self::ASCENDER - Self::DESCENDER) * size / Self::UNITS_PER_EM
    }

    fn ascent(&self, size: f32) -> f32 {
        Self::ASCENDER * size / Self::UNITS_PER_EM
    }
}

/// A font usable by the layout engine and the PDF writer.
#[derive(Debug, Clone)]
pub enum Font {
    TrueType(TrueTypeFont),
    Standard(StandardFont),
}

impl FontMetrics for Font {
    fn advance(&self, ch: char, size: f32) -> f32 {
        match self {
            Font::TrueType(f) => f.advance(ch, size),
            Font::Standard(f) => f.advance(ch, size),
        }
    }

    fn line_height(&self, size: f32) -> f32 {
        match self {
            Font::TrueType(f) => f.line_height(size),
            Font::Standard(f) => f.line_height(size),
        }
    }

    fn ascent(&self, size: f32) -> f32 {
        match self {
            Font::TrueType(f) => f.ascent(size),
            Font::Standard(f) => f.ascent(size),
        }
    }
}

/// The regular and bold faces used by one render.
#[derive(Debug, Clone)]
pub struct FontSet {
    /// Box text
    pub regular: Font,
    /// Page titles and badges
    pub bold: Font,
}

impl FontSet {
    /// Load the configured TrueType files. Both must exist; this is checked
    /// before either file is parsed.
    pub fn load(config: &FontConfig) -> Result<Self> {
        for path in [&config.regular, &config.bold] {
            if !path.is_file() {
                return Err(Error::MissingResource(path.clone()));
            }
        }

        Ok(Self {
            regular: Font::TrueType(TrueTypeFont::load(&config.regular)?),
            bold: Font::TrueType(TrueTypeFont::load(&config.bold)?),
        })
    }

    /// Built-in Courier faces. Latin-1 only; no files required.
    pub fn courier() -> Self {
        Self {
            regular: Font::Standard(StandardFont::Courier),
            bold: Font::Standard(StandardFont::CourierBold),
        }
    }
}

fn postscript_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    face.names()
        .into_iter()
        .filter(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
        .find_map(|name| name.to_string())
}

/// Keep characters that are legal in a PDF name without escaping.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if cleaned.is_empty() {
        "Embedded".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_courier_metrics() {
        let font = StandardFont::Courier;
        assert_eq!(font.advance('W', 10.0), 6.0);
        assert_eq!(font.text_width("abcd", 10.0), 24.0);
        assert!((font.line_height(100.0) - 78.6).abs() < 1e-3);
    }

    #[test]
    fn test_missing_font_file() {
        let config = FontConfig {
            regular: PathBuf::from("/nonexistent/regular.ttf"),
            bold: PathBuf::from("/nonexistent/bold.ttf"),
            ..FontConfig::default()
        };
        let result = FontSet::load(&config);
        assert!(matches!(result, Err(Error::MissingResource(p)) if p.ends_with("regular.ttf")));
    }

    #[test]
    fn test_garbage_font_data() {
        let result = TrueTypeFont::from_bytes("Broken", b"not a font".to_vec());
        assert!(matches!(result, Err(Error::FontDecode(_))));
    }

    #[test]
    fn test_truetype_fixture_metrics() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSans.ttf");
        let font = TrueTypeFont::load(&path).unwrap();

        assert_eq!(font.name(), "DejaVuSans");
        assert!(font.ascender() > 0 && font.descender() < 0);
        assert_ne!(font.glyph('א').id, 0);
        assert_ne!(font.glyph('A').id, font.glyph('B').id);
        assert!(font.text_width("שלום", 12.0) > 0.0);
        assert!(font.line_height(10.0) > font.ascent(10.0));
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Calibri Bold"), "CalibriBold");
        assert_eq!(sanitize_name("()"), "Embedded");
    }
}
