//! Rendering module for writing laid-out documents and decoded data.

mod json;
mod logo;
mod pdf;
mod result;

pub use json::{to_json, JsonFormat};
pub use logo::{ColorModel, LogoImage};
pub use pdf::PdfRenderer;
pub use result::{RenderResult, RenderStats};
