//! Section layout engine.
//!
//! Walks a [`SectionTree`] in order and places one box per child,
//! grandchild and great-grandchild section. Each box is measured first;
//! if it would cross the bottom content edge, the engine breaks to a new
//! page carrying the same header and places it there. A box that cannot
//! fit even an empty page is rejected up front, so the break is attempted
//! at most once per box.

use crate::error::{Error, Result};
use crate::model::{Cursor, Page, PagedDocument, PlacedSection, SectionLevel, SectionTree};

use super::config::LayoutConfig;
use super::font::FontSet;
use super::wrap::{text_height, wrap_text};

/// Lay out a section tree into pages.
pub fn layout(tree: &SectionTree, config: &LayoutConfig, fonts: &FontSet) -> Result<PagedDocument> {
    LayoutEngine::new(config, fonts)?.run(tree)
}

/// A measured box that has not been placed yet.
#[derive(Debug, Clone)]
struct PendingBox {
    level: SectionLevel,
    title: String,
    title_lines: Vec<String>,
    content_lines: Vec<String>,
    width: f32,
    height: f32,
}

/// Placement steps for one box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Place,
    Break,
    RetryOnce,
}

/// Header carried over to continuation pages.
#[derive(Debug, Clone, Default)]
struct PageHeader {
    title: String,
    badge: String,
}

/// Single-use layout state for one document render.
pub struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
    fonts: &'a FontSet,
    document: PagedDocument,
    cursor: Cursor,
    header: PageHeader,
}

impl<'a> LayoutEngine<'a> {
    /// Create an engine; fails if the configuration is inconsistent.
    pub fn new(config: &'a LayoutConfig, fonts: &'a FontSet) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fonts,
            document: PagedDocument::new(String::new()),
            cursor: Cursor::default(),
            header: PageHeader::default(),
        })
    }

    /// Consume the engine and lay out `tree`.
    pub fn run(mut self, tree: &SectionTree) -> Result<PagedDocument> {
        let cover = tree.title.clone().or_else(|| self.config.cover_title.clone());
        self.document.metadata.title = cover
            .clone()
            .or_else(|| tree.sections.first().map(|s| s.title.clone()))
            .unwrap_or_default();

        if let Some(title) = cover {
            self.start_page(PageHeader {
                title,
                badge: String::new(),
            });
        }

        for (index, section) in tree.sections.iter().enumerate() {
            self.start_page(PageHeader {
                title: section.title.clone(),
                badge: (index + 1).to_string(),
            });

            for child in &section.children {
                self.place(SectionLevel::Child, &child.title, None)?;

                for grandchild in &child.grandchildren {
                    self.place(SectionLevel::Grandchild, &grandchild.title, None)?;

                    for leaf in &grandchild.great_grandchildren {
                        self.place(
                            SectionLevel::GreatGrandchild,
                            &leaf.title,
                            leaf.content.as_deref(),
                        )?;
                    }
                }
            }
        }

        log::debug!(
            "Laid out {} sections on {} pages",
            self.document.section_count(),
            self.document.page_count()
        );
        Ok(self.document)
    }

    fn place(&mut self, level: SectionLevel, title: &str, content: Option<&str>) -> Result<()> {
        let pending = self.measure(level, title, content);
        self.ensure_fits_page(&pending)?;

        let limit = self.config.usable_bottom();
        let mut step = Step::Place;
        loop {
            step = match step {
                Step::Place | Step::RetryOnce => {
                    let frame = self.cursor.frame(pending.width, pending.height);
                    if frame.fits_above(limit) {
                        self.cursor = self
                            .cursor
                            .below(&frame, self.config.dimensions.feature_margin);
                        self.current_page()?.add_section(PlacedSection {
                            level: pending.level,
                            frame,
                            title_lines: pending.title_lines,
                            content_lines: pending.content_lines,
                        });
                        return Ok(());
                    }
                    if step == Step::RetryOnce {
                        return Err(self.oversized(&pending));
                    }
                    Step::Break
                }
                Step::Break => {
                    log::debug!("Page break before {:?}", pending.title);
                    self.start_page(self.header.clone());
                    Step::RetryOnce
                }
            };
        }
    }

    /// Wrap a box's text and compute its size.
    fn measure(&self, level: SectionLevel, title: &str, content: Option<&str>) -> PendingBox {
        let d = &self.config.dimensions;
        let size = self.config.font.sizes.regular;
        let font = &self.fonts.regular;

        let title_lines = wrap_text(title, font, size, d.title_box_width);
        let content_lines = match content {
            Some(text) if level == SectionLevel::GreatGrandchild => {
                wrap_text(text, font, size, d.content_box_width)
            }
            _ => Vec::new(),
        };

        let tallest = text_height(&title_lines, font, size).max(text_height(&content_lines, font, size));
        let width = match level {
            SectionLevel::Child => d.inner_width * d.child_band_ratio,
            SectionLevel::Grandchild => d.inner_width * d.grandchild_band_ratio,
            SectionLevel::GreatGrandchild => d.inner_width,
        };

        PendingBox {
            level,
            title: title.to_string(),
            title_lines,
            content_lines,
            width,
            height: d.inner_box_margin * 2.0 + tallest,
        }
    }

    fn ensure_fits_page(&self, pending: &PendingBox) -> Result<()> {
        if pending.height > self.config.available_height() {
            return Err(self.oversized(pending));
        }
        Ok(())
    }

    fn oversized(&self, pending: &PendingBox) -> Error {
        Error::OversizedSection {
            title: pending.title.clone(),
            height: pending.height,
            available: self.config.available_height(),
        }
    }

    fn start_page(&mut self, header: PageHeader) {
        let d = &self.config.dimensions;
        let number = self.document.page_count() + 1;
        let page = Page::new(number, d.page.width, d.page.height, header.title.clone())
            .with_badge(header.badge.clone());

        self.document.add_page(page);
        self.cursor = Cursor::new(d.main_content_side_margin, self.config.content_top());
        self.header = header;
    }

    fn current_page(&mut self) -> Result<&mut Page> {
        self.document
            .pages
            .last_mut()
            .ok_or_else(|| Error::Render("no page started before placing a section".to_string()))
    }
}
