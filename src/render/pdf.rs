//! PDF output for laid-out documents.
//!
//! Every page shares one resource dictionary: the regular face as `F1`, the
//! bold face as `F2` and the logo (when present) as `Im1`. TrueType faces are
//! embedded as Type0/CIDFontType2 fonts with `Identity-H` encoding, so text
//! is written as glyph ids and a ToUnicode map keeps it extractable. The
//! built-in Courier faces are written as WinAnsi Type1 fonts.

use std::collections::BTreeMap;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use unicode_bidi::BidiInfo;

use crate::error::Result;
use crate::layout::{Color, Font, FontMetrics, FontSet, LayoutConfig, TrueTypeFont};
use crate::model::{Frame, Page, PagedDocument, PlacedSection, SectionLevel};

use super::logo::LogoImage;
use super::result::{RenderResult, RenderStats};

const REGULAR: &str = "F1";
const BOLD: &str = "F2";
const LOGO: &str = "Im1";

/// Control-point distance for approximating a quarter circle with a Bezier.
const KAPPA: f32 = 0.552_284_8;

/// Writes a [`PagedDocument`] as PDF.
pub struct PdfRenderer<'a> {
    config: &'a LayoutConfig,
    fonts: &'a FontSet,
}

impl<'a> PdfRenderer<'a> {
    pub fn new(config: &'a LayoutConfig, fonts: &'a FontSet) -> Self {
        Self { config, fonts }
    }

    /// Render to PDF bytes.
    pub fn render(&self, doc: &PagedDocument) -> Result<Vec<u8>> {
        self.render_with_stats(doc).map(|result| result.bytes)
    }

    /// Render to any writer.
    pub fn render_to_writer<W: Write>(&self, doc: &PagedDocument, writer: &mut W) -> Result<()> {
        let bytes = self.render(doc)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Render to PDF bytes and report what was written.
    pub fn render_with_stats(&self, doc: &PagedDocument) -> Result<RenderResult> {
        let mut pdf = Document::with_version("1.5");
        let mut stats = RenderStats::new();

        let logo = self
            .config
            .logo
            .path
            .as_ref()
            .and_then(LogoImage::load);

        let pages_id = pdf.new_object_id();
        let regular_id = pdf.new_object_id();
        let bold_id = pdf.new_object_id();

        let mut xobjects = Dictionary::new();
        if let Some(image) = &logo {
            xobjects.set(LOGO, image.add_to(&mut pdf));
            stats.add_image();
        }
        let mut resources = dictionary! {
            "Font" => dictionary! {
                REGULAR => regular_id,
                BOLD => bold_id,
            },
        };
        if !xobjects.is_empty() {
            resources.set("XObject", xobjects);
        }
        let resources_id = pdf.add_object(resources);

        let mut regular = TextEncoder::new(&self.fonts.regular);
        let mut bold = TextEncoder::new(&self.fonts.bold);
        let mut kids = Vec::with_capacity(doc.pages.len());

        for page in &doc.pages {
            let mut painter = Painter::new(page.height);
            self.draw_page(&mut painter, page, logo.as_ref(), &mut regular, &mut bold);

            let content = Content {
                operations: painter.ops,
            };
            let content_id = pdf.add_object(Stream::new(Dictionary::new(), content.encode()?));
            let media_box: Vec<Object> = vec![0.into(), 0.into(), page.width.into(), page.height.into()];
            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => media_box,
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::Reference(page_id));
            stats.add_page(page.section_count());
        }

        let page_count = kids.len() as i64;
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count,
            }),
        );

        for (encoder, id) in [(regular, regular_id), (bold, bold_id)] {
            if let Font::TrueType(_) = encoder.font {
                stats.add_embedded_font();
            }
            encoder.write_font(&mut pdf, id)?;
        }

        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = pdf.add_object(dictionary! {
            "Title" => text_string(&doc.metadata.title),
            "Producer" => text_string(&doc.metadata.producer),
            "CreationDate" => Object::string_literal(
                doc.metadata.created.format("D:%Y%m%d%H%M%SZ").to_string(),
            ),
        });
        pdf.trailer.set("Root", catalog_id);
        pdf.trailer.set("Info", info_id);
        pdf.compress();

        let mut bytes = Vec::new();
        pdf.save_to(&mut bytes)?;
        log::debug!("Wrote PDF: {} pages, {} bytes", page_count, bytes.len());

        Ok(RenderResult::new(bytes, doc.metadata.clone(), stats))
    }

    fn draw_page(
        &self,
        painter: &mut Painter,
        page: &Page,
        logo: Option<&LogoImage>,
        regular: &mut TextEncoder<'_>,
        bold: &mut TextEncoder<'_>,
    ) {
        let d = &self.config.dimensions;
        let colors = &self.config.colors;
        let sizes = self.config.font.sizes;

        painter.fill_rect(Frame::new(0.0, 0.0, page.width, page.height), colors.background);

        // header and footer rules
        let top = d.main_content_top_margin;
        let side = d.main_content_side_margin;
        painter.fill_rect(Frame::new(side, top, d.inner_width, d.border_height), colors.primary);
        painter.fill_rect(
            Frame::new(side, page.height - top, d.inner_width, d.border_height),
            colors.primary,
        );

        // badge
        let r = d.badge_radius;
        let (cx, cy) = (side + r + d.feature_margin, top - d.feature_margin - r);
        painter.fill_circle(cx, cy, r, colors.badge);

        painter.text(
            bold,
            BOLD,
            sizes.large,
            cx + r + d.inner_box_margin,
            cy - r / 2.0,
            &page.title,
            colors.text,
        );

        if !page.badge.is_empty() {
            let font = bold.font;
            let width = font.text_width(&page.badge, sizes.regular);
            let top = cy - font.line_height(sizes.regular) / 2.0 + 3.0;
            painter.text(
                bold,
                BOLD,
                sizes.regular,
                cx - width / 2.0,
                top,
                &page.badge,
                colors.text_secondary,
            );
        }

        if let Some(image) = logo {
            let width = self.config.logo.width;
            let frame = Frame::new(
                page.width / 2.0 - width / 2.0,
                page.height - top + side / 2.0,
                width,
                image.scaled_height(width),
            );
            painter.image(LOGO, frame);
        }

        for section in &page.elements {
            self.draw_section(painter, section, regular);
        }
    }

    fn draw_section(&self, painter: &mut Painter, section: &PlacedSection, encoder: &mut TextEncoder<'_>) {
        let d = &self.config.dimensions;
        let colors = &self.config.colors;
        let frame = section.frame;

        let title_color = match section.level {
            SectionLevel::Child => {
                painter.fill_rect(frame, colors.primary);
                colors.text_on_primary
            }
            SectionLevel::Grandchild => {
                painter.fill_rect(frame, colors.secondary);
                colors.text
            }
            SectionLevel::GreatGrandchild => {
                let panel = Frame::new(
                    frame.x + d.title_box_width,
                    frame.y,
                    frame.width - d.title_box_width,
                    frame.height,
                );
                painter.fill_rect(panel, colors.secondary);
                painter.fill_rect(Frame::new(frame.x, frame.y, frame.width, d.border_height), colors.border);
                painter.fill_rect(
                    Frame::new(frame.x, frame.bottom(), frame.width, d.border_height),
                    colors.border,
                );
                colors.text
            }
        };

        let size = self.config.font.sizes.regular;
        let line_height = encoder.font.line_height(size);
        let top = frame.y + d.text_inset_y;

        for (i, line) in section.title_lines.iter().enumerate() {
            let y = top + i as f32 * line_height;
            painter.text(encoder, REGULAR, size, frame.x + d.text_inset_x, y, line, title_color);
        }

        let content_x = frame.x + d.title_box_width + d.content_offset;
        for (i, line) in section.content_lines.iter().enumerate() {
            let y = top + i as f32 * line_height;
            painter.text(encoder, REGULAR, size, content_x, y, line, colors.text);
        }
    }
}

/// Collects content stream operators, flipping layout y into PDF y.
struct Painter {
    ops: Vec<Operation>,
    page_height: f32,
}

impl Painter {
    fn new(page_height: f32) -> Self {
        Self {
            ops: Vec::new(),
            page_height,
        }
    }

    fn fill_color(&mut self, color: Color) {
        let [r, g, b] = color.components();
        self.ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
    }

    fn fill_rect(&mut self, frame: Frame, color: Color) {
        self.fill_color(color);
        self.ops.push(Operation::new(
            "re",
            vec![
                frame.x.into(),
                (self.page_height - frame.bottom()).into(),
                frame.width.into(),
                frame.height.into(),
            ],
        ));
        self.ops.push(Operation::new("f", vec![]));
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) {
        let cy = self.page_height - cy;
        let k = KAPPA * r;
        self.fill_color(color);
        self.ops.push(Operation::new("m", vec![(cx + r).into(), cy.into()]));
        for [x1, y1, x2, y2, x3, y3] in [
            [cx + r, cy + k, cx + k, cy + r, cx, cy + r],
            [cx - k, cy + r, cx - r, cy + k, cx - r, cy],
            [cx - r, cy - k, cx - k, cy - r, cx, cy - r],
            [cx + k, cy - r, cx + r, cy - k, cx + r, cy],
        ] {
            self.ops.push(Operation::new(
                "c",
                vec![x1.into(), y1.into(), x2.into(), y2.into(), x3.into(), y3.into()],
            ));
        }
        self.ops.push(Operation::new("f", vec![]));
    }

    /// Draw one line of text whose top edge is at `top`.
    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        encoder: &mut TextEncoder<'_>,
        resource: &str,
        size: f32,
        x: f32,
        top: f32,
        text: &str,
        color: Color,
    ) {
        if text.is_empty() {
            return;
        }
        let baseline = self.page_height - (top + encoder.font.ascent(size));
        let encoded = encoder.encode(&visual_order(text));

        self.ops.push(Operation::new("BT", vec![]));
        self.fill_color(color);
        self.ops.push(Operation::new("Tf", vec![Object::Name(resource.into()), size.into()]));
        self.ops.push(Operation::new("Td", vec![x.into(), baseline.into()]));
        self.ops.push(Operation::new("Tj", vec![encoded]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn image(&mut self, resource: &str, frame: Frame) {
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                frame.width.into(),
                0.into(),
                0.into(),
                frame.height.into(),
                frame.x.into(),
                (self.page_height - frame.bottom()).into(),
            ],
        ));
        self.ops.push(Operation::new("Do", vec![Object::Name(resource.into())]));
        self.ops.push(Operation::new("Q", vec![]));
    }
}

/// Encodes strings for one font and records the glyphs it used.
struct TextEncoder<'f> {
    font: &'f Font,
    used: BTreeMap<u16, (char, u16)>,
}

impl<'f> TextEncoder<'f> {
    fn new(font: &'f Font) -> Self {
        Self {
            font,
            used: BTreeMap::new(),
        }
    }

    fn encode(&mut self, text: &str) -> Object {
        match self.font {
            Font::TrueType(face) => {
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    let glyph = face.glyph(ch);
                    bytes.extend_from_slice(&glyph.id.to_be_bytes());
                    self.used.entry(glyph.id).or_insert((ch, glyph.advance));
                }
                Object::String(bytes, StringFormat::Hexadecimal)
            }
            Font::Standard(_) => {
                let bytes = text
                    .chars()
                    .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
                    .collect();
                Object::String(bytes, StringFormat::Literal)
            }
        }
    }

    fn write_font(self, pdf: &mut Document, id: ObjectId) -> Result<()> {
        let dict = match self.font {
            Font::Standard(face) => dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_name(),
                "Encoding" => "WinAnsiEncoding",
            },
            Font::TrueType(face) => embed_truetype(pdf, face, &self.used)?,
        };
        pdf.objects.insert(id, Object::Dictionary(dict));
        Ok(())
    }
}

fn embed_truetype(pdf: &mut Document, face: &TrueTypeFont, used: &BTreeMap<u16, (char, u16)>) -> Result<Dictionary> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(face.data())?;
    let compressed = encoder.finish()?;

    let file_id = pdf.add_object(
        Stream::new(
            dictionary! {
                "Length1" => face.data().len() as i64,
                "Filter" => "FlateDecode",
            },
            compressed,
        )
        .with_compression(false),
    );

    let bbox: Vec<Object> = face
        .bbox()
        .iter()
        .map(|v| Object::Integer(face.to_pdf_units(i32::from(*v))))
        .collect();
    let descriptor_id = pdf.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => face.name(),
        "Flags" => 32,
        "FontBBox" => bbox,
        "ItalicAngle" => 0,
        "Ascent" => face.to_pdf_units(i32::from(face.ascender())),
        "Descent" => face.to_pdf_units(i32::from(face.descender())),
        "CapHeight" => face.to_pdf_units(i32::from(face.cap_height())),
        "StemV" => 80,
        "FontFile2" => file_id,
    });

    let mut widths = Vec::with_capacity(used.len() * 2);
    for (gid, (_, advance)) in used {
        widths.push(Object::Integer(i64::from(*gid)));
        widths.push(Object::Array(vec![Object::Integer(
            face.to_pdf_units(i32::from(*advance)),
        )]));
    }

    let cid_font_id = pdf.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => face.name(),
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "W" => widths,
        "CIDToGIDMap" => "Identity",
    });

    let to_unicode_id = pdf.add_object(Stream::new(Dictionary::new(), to_unicode_cmap(used).into_bytes()));

    Ok(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => face.name(),
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    })
}

/// ToUnicode CMap mapping each used glyph id back to its character.
fn to_unicode_cmap(used: &BTreeMap<u16, (char, u16)>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let entries: Vec<(&u16, &(char, u16))> = used.iter().collect();
    // at most 100 entries per bfchar block
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, (ch, _)) in chunk {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|unit| format!("{:04X}", unit))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", gid, hex));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}

/// Reorder one line from logical to visual order.
///
/// Right-to-left runs are reversed and their paired brackets mirrored, so
/// `(4471)` inside Hebrew text still reads as `(4471)`.
fn visual_order(line: &str) -> String {
    let info = BidiInfo::new(line, None);
    let Some(paragraph) = info.paragraphs.first() else {
        return line.to_string();
    };

    let (levels, runs) = info.visual_runs(paragraph, paragraph.range.clone());
    let mut visual = String::with_capacity(line.len());
    for run in runs {
        let text = &line[run.clone()];
        if levels[run.start].is_rtl() {
            visual.extend(text.chars().rev().map(mirror));
        } else {
            visual.push_str(text);
        }
    }
    visual
}

/// Mirrored glyph for paired punctuation in right-to-left runs.
fn mirror(ch: char) -> char {
    match ch {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        '«' => '»',
        '»' => '«',
        other => other,
    }
}

/// A PDF text string: UTF-16BE with a byte order mark.
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
