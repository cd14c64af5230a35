//! Decoding options and report markers.

use serde::{Deserialize, Serialize};

/// Options for decoding raw reports.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Literal markers that delimit the report table
    pub markers: ReportMarkers,

    /// Normalize line endings and Unicode (NFC) before decoding
    pub normalize: bool,
}

impl DecodeOptions {
    /// Create new decode options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (default bad counts to zero, skip bad blocks).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Replace the report markers.
    pub fn with_markers(mut self, markers: ReportMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// Enable or disable input normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            markers: ReportMarkers::default(),
            normalize: true,
        }
    }
}

/// Error handling mode during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any malformed count or block
    #[default]
    Strict,
    /// Default malformed counts to zero and skip malformed blocks
    Lenient,
}

/// Fixed literals of the mainframe report layout.
///
/// The defaults match the Hebrew branch activity dump. Every field can be
/// overridden from JSON; missing fields keep their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMarkers {
    /// Column header rule that opens the agent table
    pub start_boundary: String,

    /// Rule that closes the agent table
    pub end_boundary: String,

    /// Rule between a header block and its subtotal rows
    pub row_separator: String,

    /// Per-clerk subtotal label ending each agent block
    pub block_splitter: String,

    /// Placeholder that marks a block as not a real agent
    pub exclude_token: String,

    /// Per-site total label preceding the real header of a block
    pub total_for_site: String,

    /// Prefix of the second location's subtotal line
    pub second_location_prefix: String,

    /// Label of a virtual location
    pub virtual_label: String,

    /// Label of the main office location
    pub main_office_label: String,

    /// Responsibility used when the header row has none
    pub default_responsibility: String,
}

impl Default for ReportMarkers {
    fn default() -> Self {
        Self {
            start_boundary: "---------  --------------- ------------ -------------------- --------   -------------------------".to_string(),
            end_boundary: "=========".to_string(),
            row_separator: "---------".to_string(),
            block_splitter: "(סה\"כ לפקיד)ה".to_string(),
            exclude_token: "zehut".to_string(),
            total_for_site: "סה\"כ לאתר".to_string(),
            second_location_prefix: "-סה\"כ ל".to_string(),
            virtual_label: "וירטואלי".to_string(),
            main_office_label: "משרד ראשי".to_string(),
            default_responsibility: "משרד ראשי".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_options_builder() {
        let options = DecodeOptions::new().lenient().with_normalize(false);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.normalize);
    }

    #[test]
    fn test_default_options() {
        let options = DecodeOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.normalize);
        assert_eq!(options.markers.end_boundary, "=========");
    }

    #[test]
    fn test_markers_partial_override() {
        let markers: ReportMarkers =
            serde_json::from_str(r#"{ "exclude_token": "placeholder" }"#).unwrap();
        assert_eq!(markers.exclude_token, "placeholder");
        assert_eq!(markers.row_separator, "---------");
    }
}
