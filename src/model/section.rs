//! Nested section tree consumed by the layout engine.
//!
//! The tree has a fixed depth: a document holds sections, each section holds
//! child sections, which hold grandchildren, which hold great-grandchildren.
//! Only the deepest level carries free-text content. Field names on the wire
//! match the JSON produced by the report dashboard.

use serde::{Deserialize, Serialize};

/// Root of a document description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionTree {
    /// Title for the cover page (overrides the configured cover title)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Top-level sections, one or more pages each
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl SectionTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cover title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Append a section.
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Number of boxes the layout engine will place.
    pub fn box_count(&self) -> usize {
        self.sections.iter().map(Section::box_count).sum()
    }

    /// Check if the tree has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// A top-level section; always starts on a new page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,

    #[serde(default, rename = "childSections")]
    pub children: Vec<ChildSection>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: ChildSection) -> Self {
        self.children.push(child);
        self
    }

    /// Number of boxes placed for this section.
    pub fn box_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| {
                1 + child
                    .grandchildren
                    .iter()
                    .map(|g| 1 + g.great_grandchildren.len())
                    .sum::<usize>()
            })
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildSection {
    pub title: String,

    #[serde(default, rename = "grandChildSections")]
    pub grandchildren: Vec<GrandchildSection>,
}

impl ChildSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            grandchildren: Vec::new(),
        }
    }

    pub fn with_grandchild(mut self, grandchild: GrandchildSection) -> Self {
        self.grandchildren.push(grandchild);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrandchildSection {
    pub title: String,

    #[serde(
        default,
        rename = "greatGrandChildSection",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub great_grandchildren: Vec<GreatGrandchildSection>,
}

impl GrandchildSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            great_grandchildren: Vec::new(),
        }
    }

    pub fn with_great_grandchild(mut self, leaf: GreatGrandchildSection) -> Self {
        self.great_grandchildren.push(leaf);
        self
    }
}

/// Leaf section: a title column and optional wrapped content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GreatGrandchildSection {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl GreatGrandchildSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Nesting level of a placed box. Each level has its own visual weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLevel {
    /// Primary-colored band
    Child,
    /// Secondary band
    Grandchild,
    /// Title column with a content panel
    GreatGrandchild,
}
