//! Error types for the dumpdoc library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dumpdoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while decoding reports or rendering documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A table boundary marker is absent from the raw report.
    #[error("Report boundary marker not found: {0}")]
    BoundaryMissing(&'static str),

    /// A count column did not hold a number.
    #[error("Invalid count {value:?} in row {row:?}")]
    InvalidCount {
        /// The offending token
        value: String,
        /// The row it was read from
        row: String,
    },

    /// An agent block has no usable header row.
    #[error("Malformed agent block: {0}")]
    MalformedBlock(String),

    /// A section box is taller than the usable area of a fresh page.
    #[error("Section {title:?} needs {height:.1} units but a page offers {available:.1}")]
    OversizedSection {
        /// Title of the section that does not fit
        title: String,
        /// Measured box height
        height: f32,
        /// Usable height of an empty page
        available: f32,
    },

    /// A required resource file is missing.
    #[error("Required resource not found: {}", .0.display())]
    MissingResource(PathBuf),

    /// Error decoding font data.
    #[error("Font decoding error: {0}")]
    FontDecode(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error while producing output (PDF, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Input bytes are not valid text.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::Render(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return Error::Io(err.into());
        }
        Error::Config(err.to_string())
    }
}
