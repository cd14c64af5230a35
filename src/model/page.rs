//! Page-level types produced by the layout engine.

use super::{Frame, SectionLevel};
use serde::{Deserialize, Serialize};

/// A single laid-out page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in layout units
    pub width: f32,

    /// Page height in layout units
    pub height: f32,

    /// Title shown in the page header
    pub title: String,

    /// Text inside the header badge (section ordinal); empty on the cover
    pub badge: String,

    /// Sections placed on this page, top to bottom
    pub elements: Vec<PlacedSection>,
}

impl Page {
    /// Create a new empty page.
    pub fn new(number: u32, width: f32, height: f32, title: impl Into<String>) -> Self {
        Self {
            number,
            width,
            height,
            title: title.into(),
            badge: String::new(),
            elements: Vec::new(),
        }
    }

    /// Set the badge text.
    pub fn with_badge(mut self, badge: impl Into<String>) -> Self {
        self.badge = badge.into();
        self
    }

    /// Add a placed section to the page.
    pub fn add_section(&mut self, section: PlacedSection) {
        self.elements.push(section);
    }

    /// Check if the page holds no sections.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Get the number of sections on the page.
    pub fn section_count(&self) -> usize {
        self.elements.len()
    }

    /// Bottom edge of the lowest section, if any.
    pub fn content_bottom(&self) -> Option<f32> {
        self.elements.last().map(|s| s.frame.bottom())
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

/// A section box with its text already wrapped into lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedSection {
    /// Nesting level, selects the box style
    pub level: SectionLevel,

    /// Box position and size
    pub frame: Frame,

    /// Title wrapped to the title column
    pub title_lines: Vec<String>,

    /// Content wrapped to the content column (great-grandchildren only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_lines: Vec<String>,
}

impl PlacedSection {
    /// The unwrapped title.
    pub fn title(&self) -> String {
        self.title_lines.join(" ")
    }
}
