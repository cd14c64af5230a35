//! # dumpdoc
//!
//! Branch activity report decoding and paginated PDF report generation.
//!
//! The decoder turns the fixed-layout text dump produced by the branch
//! mainframe into per-agent records with aggregated operation counts. The
//! layout engine paginates a four-level section tree into pages, and the
//! renderer writes those pages as PDF.
//!
//! ## Quick Start
//!
//! ```no_run
//! use dumpdoc::{decode_file, render, Sorting};
//!
//! fn main() -> dumpdoc::Result<()> {
//!     // Decode a report dump
//!     let agents = decode_file("branch-042.txt")?;
//!
//!     // Serialize the agents
//!     let json = render::to_json(&agents, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     // Or go straight to a sorted PDF report
//!     let pdf = dumpdoc::Dumpdoc::new()
//!         .with_sorting(Sorting::Operations)
//!         .decode("branch-042.txt")?
//!         .to_pdf()?;
//!     std::fs::write("branch-042.pdf", pdf)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Report decoding**: boundary slicing, agent block splitting, header and
//!   row parsing, per-category aggregation
//! - **Strict or lenient decoding**: fail on malformed data or skip it
//! - **Section layout**: measured boxes, page breaks that never split a box
//! - **PDF output**: embedded TrueType fonts, RTL-aware text, optional logo
//! - **Parallel processing**: Uses Rayon for batch decoding

pub mod decoder;
pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod report;

// Re-export commonly used types
pub use decoder::{DecodeOptions, ErrorMode, OperationTally, ReportDecoder, ReportMarkers};
pub use detect::{detect_report_from_bytes, detect_report_from_path, is_report, ReportFormat};
pub use error::{Error, Result};
pub use layout::{layout, FontSet, LayoutConfig, LayoutEngine};
pub use model::{
    Agent, ChildSection, GrandchildSection, GreatGrandchildSection, Metadata, Operation, Page,
    PagedDocument, PlacedSection, Section, SectionLevel, SectionTree,
};
pub use render::{JsonFormat, PdfRenderer, RenderResult, RenderStats};
pub use report::{
    build_document, AgentView, BranchReport, BranchSummary, OperationView, Sorting,
};

use rayon::prelude::*;
use std::io::Read;
use std::path::Path;

/// Decode a report file into agents.
///
/// # Example
///
/// ```no_run
/// use dumpdoc::decode_file;
///
/// let agents = decode_file("branch-042.txt").unwrap();
/// println!("Agents: {}", agents.len());
/// ```
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<Vec<Agent>> {
    ReportDecoder::open(path)?.decode()
}

/// Decode a report file with custom options.
///
/// # Example
///
/// ```no_run
/// use dumpdoc::{decode_file_with_options, DecodeOptions};
///
/// let options = DecodeOptions::new().lenient();
/// let agents = decode_file_with_options("branch-042.txt", options).unwrap();
/// ```
pub fn decode_file_with_options<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<Vec<Agent>> {
    ReportDecoder::open_with_options(path, options)?.decode()
}

/// Decode a report from bytes. The bytes must be UTF-8.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<Agent>> {
    ReportDecoder::from_bytes(data)?.decode()
}

/// Decode a report from bytes with custom options.
pub fn decode_bytes_with_options(data: &[u8], options: DecodeOptions) -> Result<Vec<Agent>> {
    ReportDecoder::from_bytes_with_options(data, options)?.decode()
}

/// Decode a report from a reader.
pub fn decode_reader<R: Read>(reader: R) -> Result<Vec<Agent>> {
    ReportDecoder::from_reader(reader)?.decode()
}

/// Decode a report from a reader with custom options.
pub fn decode_reader_with_options<R: Read>(reader: R, options: DecodeOptions) -> Result<Vec<Agent>> {
    ReportDecoder::from_reader_with_options(reader, options)?.decode()
}

/// Decode report text.
pub fn decode_str(text: &str) -> Result<Vec<Agent>> {
    ReportDecoder::from_text(text).decode()
}

/// Decode report text with custom options.
pub fn decode_str_with_options(text: &str, options: DecodeOptions) -> Result<Vec<Agent>> {
    ReportDecoder::from_text_with_options(text, options).decode()
}

/// Decode several independent report files in parallel.
///
/// Results come back in the order of `paths`; one failing file does not
/// affect the others.
pub fn decode_files<P>(paths: &[P], options: &DecodeOptions) -> Vec<Result<Vec<Agent>>>
where
    P: AsRef<Path> + Sync,
{
    paths
        .par_iter()
        .map(|path| decode_file_with_options(path, options.clone()))
        .collect()
}

/// Lay out a section tree using the fonts named in `config`.
///
/// Font files are loaded (and their absence reported) before any page is
/// laid out.
pub fn layout_document(tree: &SectionTree, config: &LayoutConfig) -> Result<PagedDocument> {
    let fonts = FontSet::load(&config.font)?;
    layout(tree, config, &fonts)
}

/// Lay out a section tree and write it as PDF bytes.
///
/// # Example
///
/// ```no_run
/// use dumpdoc::{render_pdf, LayoutConfig, Section, SectionTree};
///
/// let tree = SectionTree::new().with_section(Section::new("Branch 042"));
/// let pdf = render_pdf(&tree, &LayoutConfig::default()).unwrap();
/// std::fs::write("report.pdf", pdf).unwrap();
/// ```
pub fn render_pdf(tree: &SectionTree, config: &LayoutConfig) -> Result<Vec<u8>> {
    let fonts = FontSet::load(&config.font)?;
    render_pdf_with_fonts(tree, config, &fonts)
}

/// Lay out and render with an already loaded font set.
pub fn render_pdf_with_fonts(tree: &SectionTree, config: &LayoutConfig, fonts: &FontSet) -> Result<Vec<u8>> {
    let doc = layout(tree, config, fonts)?;
    PdfRenderer::new(config, fonts).render(&doc)
}

/// Lay out a section tree and write the PDF to `path`.
pub fn render_pdf_to_file<P: AsRef<Path>>(tree: &SectionTree, config: &LayoutConfig, path: P) -> Result<()> {
    let bytes = render_pdf(tree, config)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Builder for decoding a report and producing its outputs.
///
/// # Example
///
/// ```no_run
/// use dumpdoc::{Dumpdoc, Sorting, JsonFormat};
///
/// let json = Dumpdoc::new()
///     .lenient()
///     .with_sorting(Sorting::Name)
///     .decode("branch-042.txt")?
///     .to_json(JsonFormat::Pretty)?;
/// # Ok::<(), dumpdoc::Error>(())
/// ```
pub struct Dumpdoc {
    decode_options: DecodeOptions,
    layout_config: LayoutConfig,
    sorting: Option<Sorting>,
    branch: Option<String>,
}

impl Dumpdoc {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            decode_options: DecodeOptions::default(),
            layout_config: LayoutConfig::default(),
            sorting: None,
            branch: None,
        }
    }

    /// Enable lenient decoding mode.
    pub fn lenient(mut self) -> Self {
        self.decode_options = self.decode_options.lenient();
        self
    }

    /// Set custom report markers.
    pub fn with_markers(mut self, markers: ReportMarkers) -> Self {
        self.decode_options = self.decode_options.with_markers(markers);
        self
    }

    /// Set the layout configuration used for PDF output.
    pub fn with_layout_config(mut self, config: LayoutConfig) -> Self {
        self.layout_config = config;
        self
    }

    /// Sort agents before producing output.
    pub fn with_sorting(mut self, sorting: Sorting) -> Self {
        self.sorting = Some(sorting);
        self
    }

    /// Override the branch name (defaults to the file stem).
    pub fn with_branch(mut self, name: impl Into<String>) -> Self {
        self.branch = Some(name.into());
        self
    }

    /// Decode a report file and return a result wrapper.
    pub fn decode<P: AsRef<Path>>(self, path: P) -> Result<DumpdocResult> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.decode_named(stem, &data)
    }

    /// Decode report bytes.
    pub fn decode_bytes(self, data: &[u8]) -> Result<DumpdocResult> {
        self.decode_named(String::new(), data)
    }

    fn decode_named(self, fallback_name: String, data: &[u8]) -> Result<DumpdocResult> {
        let agents = decode_bytes_with_options(data, self.decode_options)?;
        let mut report = BranchReport::new(self.branch.unwrap_or(fallback_name), agents);
        if let Some(sorting) = self.sorting {
            report = report.sorted(sorting);
        }
        Ok(DumpdocResult {
            report,
            source_size: data.len() as u64,
            layout_config: self.layout_config,
        })
    }
}

impl Default for Dumpdoc {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of decoding one report.
pub struct DumpdocResult {
    /// The decoded branch
    pub report: BranchReport,
    /// Size of the source in bytes
    pub source_size: u64,
    layout_config: LayoutConfig,
}

impl DumpdocResult {
    /// Decoded agents.
    pub fn agents(&self) -> &[Agent] {
        &self.report.agents
    }

    /// Agents as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.report.agents, format)
    }

    /// Branch totals.
    pub fn summary(&self) -> BranchSummary {
        self.report.summary(self.source_size)
    }

    /// Section tree for the layout engine.
    pub fn to_section_tree(&self) -> SectionTree {
        build_document(self.layout_config.cover_title.as_deref(), std::slice::from_ref(&self.report))
    }

    /// Render the report as PDF using the configured fonts.
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        render_pdf(&self.to_section_tree(), &self.layout_config)
    }

    /// Render the report as PDF with a given font set.
    pub fn to_pdf_with_fonts(&self, fonts: &FontSet) -> Result<Vec<u8>> {
        render_pdf_with_fonts(&self.to_section_tree(), &self.layout_config, fonts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> String {
        let m = ReportMarkers::default();
        format!(
            "HEADER\n{}\n12  Yossi Cohen  1 2 3  ID123\n5  Category-A\n{}\n{}\n{}\n",
            m.start_boundary, m.row_separator, m.block_splitter, m.end_boundary
        )
    }

    #[test]
    fn test_dumpdoc_builder() {
        let builder = Dumpdoc::new().lenient().with_sorting(Sorting::Operations);
        assert_eq!(builder.decode_options.error_mode, ErrorMode::Lenient);
        assert_eq!(builder.sorting, Some(Sorting::Operations));
    }

    #[test]
    fn test_dumpdoc_builder_default() {
        let builder = Dumpdoc::default();
        assert_eq!(builder.decode_options.error_mode, ErrorMode::Strict);
        assert!(builder.sorting.is_none());
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_decode_bytes_empty_data() {
        let result = decode_bytes(&[]);
        assert!(matches!(result, Err(Error::BoundaryMissing(_))));
    }

    #[test]
    fn test_decode_bytes_invalid_utf8() {
        let result = decode_bytes(&[0xFF, 0xFE, 0x00]);
        assert!(matches!(result, Err(Error::Encoding(_))));
    }

    #[test]
    fn test_decode_str_sample() {
        let agents = decode_str(&sample()).unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].id, "3");
        assert_eq!(agents[0].total_operations(), 17);
    }

    // ==================== Builder Output Tests ====================

    #[test]
    fn test_dumpdoc_decode_bytes() {
        let result = Dumpdoc::new()
            .with_branch("042")
            .decode_bytes(sample().as_bytes())
            .unwrap();

        assert_eq!(result.agents().len(), 1);
        let summary = result.summary();
        assert_eq!(summary.name, "042");
        assert_eq!(summary.total_operations, 17);
        assert_eq!(summary.file_size, sample().len() as u64);

        let tree = result.to_section_tree();
        assert_eq!(tree.title.as_deref(), Some("Document"));
        assert_eq!(tree.sections[0].title, "042");
    }

    #[test]
    fn test_dumpdoc_to_pdf_with_courier() {
        let result = Dumpdoc::new()
            .with_layout_config(LayoutConfig::default().without_logo())
            .decode_bytes(sample().as_bytes())
            .unwrap();

        let pdf = result.to_pdf_with_fonts(&FontSet::courier()).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_pdf_missing_fonts() {
        let config = LayoutConfig::default().with_fonts("/nonexistent/r.ttf", "/nonexistent/b.ttf");
        let result = render_pdf(&SectionTree::new(), &config);
        assert!(matches!(result, Err(Error::MissingResource(_))));
    }
}
