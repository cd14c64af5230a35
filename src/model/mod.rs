//! Entity model shared by the decoder and the layout engine.
//!
//! Agents and operations are what the decoder produces. Section trees are
//! what the layout engine consumes, and pages are what it emits. The two
//! halves only meet in the `report` helpers.

mod agent;
mod document;
mod geometry;
mod page;
mod section;

pub use agent::{Agent, Operation};
pub use document::{Metadata, PagedDocument};
pub use geometry::{Cursor, Frame};
pub use page::{Page, PlacedSection};
pub use section::{
    ChildSection, GrandchildSection, GreatGrandchildSection, Section, SectionLevel, SectionTree,
};
