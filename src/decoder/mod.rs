//! Branch report decoding module.

mod aggregate;
mod block;
mod normalize;
mod options;
mod report_decoder;

pub use aggregate::{aggregate_operations, OperationTally};
pub use block::{split_blocks, table_region, BlockParser, HeaderRow};
pub use normalize::normalize_text;
pub use options::{DecodeOptions, ErrorMode, ReportMarkers};
pub use report_decoder::ReportDecoder;
