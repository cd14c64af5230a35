//! Section layout: configuration, font metrics, wrapping and pagination.

mod config;
mod engine;
mod font;
mod wrap;

pub use config::{
    Color, ColorConfig, Dimensions, FontConfig, FontSizes, LayoutConfig, LogoConfig, PageSize,
};
pub use engine::{layout, LayoutEngine};
pub use font::{Font, FontMetrics, FontSet, Glyph, StandardFont, TrueTypeFont};
pub use wrap::{text_height, wrap_text};
