//! JSON rendering for decoded agents, report views and layouts.

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize any value (agents, views, a paged document) to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Agent, Operation, PagedDocument};

    #[test]
    fn test_to_json_pretty() {
        let agents = vec![Agent::new("3", "Yossi Cohen", "ID123")
            .with_operations(vec![Operation::new("Category-A", 5)])];

        let json = to_json(&agents, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"responsibility\""));
        assert!(json.contains("\"repeated\": 5"));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let doc = PagedDocument::new("Report");

        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
        assert!(json.contains("\"pages\":[]"));
    }
}
