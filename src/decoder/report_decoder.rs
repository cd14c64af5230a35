//! Raw branch report decoder.

use std::borrow::Cow;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::Agent;

use super::block::{split_blocks, table_region, BlockParser};
use super::normalize::normalize_text;
use super::options::{DecodeOptions, ReportMarkers};

/// Decoder for one raw report.
pub struct ReportDecoder {
    text: String,
    options: DecodeOptions,
}

impl ReportDecoder {
    /// Open a report file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, DecodeOptions::default())
    }

    /// Open a report file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: DecodeOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        log::debug!(
            "Read {} bytes from {}",
            data.len(),
            path.as_ref().display()
        );
        Self::from_bytes_with_options(&data, options)
    }

    /// Decode a report from UTF-8 bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, DecodeOptions::default())
    }

    /// Decode a report from UTF-8 bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: DecodeOptions) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::Encoding(format!("report is not valid UTF-8: {}", e)))?;
        Ok(Self::from_text_with_options(text, options))
    }

    /// Decode a report from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, DecodeOptions::default())
    }

    /// Decode a report from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: DecodeOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Decode a report held in memory.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_text_with_options(text, DecodeOptions::default())
    }

    /// Decode a report held in memory with custom options.
    pub fn from_text_with_options(text: impl Into<String>, options: DecodeOptions) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }

    /// The raw report text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Decode the report into agent records, in report order.
    ///
    /// Fails with [`Error::BoundaryMissing`] when the table markers are
    /// absent; nothing is returned in that case.
    pub fn decode(&self) -> Result<Vec<Agent>> {
        let markers = &self.options.markers;
        validate_markers(markers)?;

        let text: Cow<'_, str> = if self.options.normalize {
            normalize_text(&self.text)
        } else {
            Cow::Borrowed(self.text.as_str())
        };

        let table = table_region(&text, markers)?;
        let blocks = split_blocks(table, markers);
        log::debug!("Found {} candidate agent blocks", blocks.len());

        let parser = BlockParser::new(markers, self.options.error_mode);
        let mut agents = Vec::with_capacity(blocks.len());
        for block in blocks {
            if let Some(agent) = parser.parse_block(block)? {
                agents.push(agent);
            }
        }

        Ok(agents)
    }
}

/// Markers the decoder splits on must be non-empty.
pub(crate) fn validate_markers(markers: &ReportMarkers) -> Result<()> {
    let required = [
        ("start_boundary", &markers.start_boundary),
        ("end_boundary", &markers.end_boundary),
        ("row_separator", &markers.row_separator),
        ("block_splitter", &markers.block_splitter),
    ];

    for (name, value) in required {
        if value.is_empty() {
            return Err(Error::Config(format!("report marker {} is empty", name)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::ErrorMode;

    fn sample(body: &str) -> String {
        let m = ReportMarkers::default();
        format!(
            "BRANCH 042 ACTIVITY\n{}\n{}\n{}\nfooter",
            m.start_boundary, body, m.end_boundary
        )
    }

    #[test]
    fn test_decode_single_agent() {
        let m = ReportMarkers::default();
        let text = sample(&format!(
            "12  Dana Levi  Loans 4471  Teller\n5  Deposit\n3  Deposit\n---------\n20\n{}",
            m.block_splitter
        ));

        let agents = ReportDecoder::from_text(text).decode().unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].id, "4471");
        assert_eq!(agents[0].operations.len(), 2);
        assert_eq!(agents[0].operations[0].repeated, 8);
        assert_eq!(agents[0].total_operations(), 20);
    }

    #[test]
    fn test_crlf_input() {
        let m = ReportMarkers::default();
        let text = sample(&format!("4  Dana  Loans 1\r\n2  Deposit\r\n{}", m.block_splitter))
            .replace('\n', "\r\n");

        let agents = ReportDecoder::from_text(text).decode().unwrap();
        assert_eq!(agents[0].operations[0].category, "Deposit");
    }

    #[test]
    fn test_invalid_utf8() {
        let result = ReportDecoder::from_bytes(&[0xff, 0xfe, 0x00]);
        assert!(matches!(result, Err(Error::Encoding(_))));
    }

    #[test]
    fn test_empty_marker_rejected() {
        let markers = ReportMarkers {
            block_splitter: String::new(),
            ..ReportMarkers::default()
        };
        let options = DecodeOptions::new().with_markers(markers);
        let result = ReportDecoder::from_text_with_options(sample(""), options).decode();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_lenient_skips_malformed_block() {
        let m = ReportMarkers::default();
        let text = sample(&format!(
            "just one field\n{s}4  Dana  Loans 1\n{s}",
            s = m.block_splitter
        ));

        let strict = ReportDecoder::from_text(text.clone()).decode();
        assert!(matches!(strict, Err(Error::MalformedBlock(_))));

        let options = DecodeOptions::new().with_error_mode(ErrorMode::Lenient);
        let agents = ReportDecoder::from_text_with_options(text, options)
            .decode()
            .unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].name, "Dana");
    }
}
