//! Document-level layout result.

use super::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A fully paginated document, ready to be written out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedDocument {
    /// Document metadata
    pub metadata: Metadata,

    /// Pages in output order
    pub pages: Vec<Page>,
}

impl PagedDocument {
    /// Create a new empty document.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            metadata: Metadata::new(title),
            pages: Vec::new(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of placed sections across all pages.
    pub fn section_count(&self) -> usize {
        self.pages.iter().map(Page::section_count).sum()
    }

    /// Titles of every placed section, in reading order.
    pub fn section_titles(&self) -> Vec<String> {
        self.pages
            .iter()
            .flat_map(|page| page.elements.iter().map(|s| s.title()))
            .collect()
    }
}

/// Document metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title (also the cover page title)
    pub title: String,

    /// Producer string written into the PDF info dictionary
    pub producer: String,

    /// Creation date
    pub created: DateTime<Utc>,
}

impl Metadata {
    /// Create metadata stamped with the current time.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            producer: format!("dumpdoc {}", env!("CARGO_PKG_VERSION")),
            created: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_page() {
        let mut doc = PagedDocument::new("Report");
        doc.add_page(Page::new(1, 100.0, 200.0, "Report"));
        doc.add_page(Page::new(2, 100.0, 200.0, "Branch"));

        assert_eq!(doc.page_count(), 2);
        assert!(doc.get_page(0).is_none());
        assert_eq!(doc.get_page(2).map(|p| p.title.as_str()), Some("Branch"));
        assert!(doc.get_page(3).is_none());
    }

    #[test]
    fn test_metadata_producer() {
        let meta = Metadata::new("Report");
        assert!(meta.producer.starts_with("dumpdoc "));
    }
}
