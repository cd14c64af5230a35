//! Rendering result with metadata and statistics.

use crate::model::Metadata;
use serde::{Deserialize, Serialize};

/// Result of rendering a document to PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The PDF file contents
    #[serde(skip)]
    pub bytes: Vec<u8>,

    /// Document metadata (copied from the laid-out document)
    pub metadata: Metadata,

    /// Output statistics
    pub stats: RenderStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(bytes: Vec<u8>, metadata: Metadata, stats: RenderStats) -> Self {
        Self {
            bytes,
            metadata,
            stats,
        }
    }

    /// Get the output length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Statistics collected while writing a PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Number of pages written
    pub page_count: u32,

    /// Number of section boxes drawn
    pub section_count: u32,

    /// Number of TrueType font programs embedded
    pub embedded_font_count: u32,

    /// Number of images embedded
    pub image_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a page holding `sections` boxes.
    pub fn add_page(&mut self, sections: usize) {
        self.page_count += 1;
        self.section_count += sections as u32;
    }

    /// Increment embedded font count.
    pub fn add_embedded_font(&mut self) {
        self.embedded_font_count += 1;
    }

    /// Increment image count.
    pub fn add_image(&mut self) {
        self.image_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_stats_add_page() {
        let mut stats = RenderStats::new();
        stats.add_page(0);
        stats.add_page(7);

        assert_eq!(stats.page_count, 2);
        assert_eq!(stats.section_count, 7);
    }

    #[test]
    fn test_render_result_len() {
        let result = RenderResult::new(b"%PDF".to_vec(), Metadata::new("T"), RenderStats::new());
        assert_eq!(result.len(), 4);
        assert!(!result.is_empty());
    }
}
