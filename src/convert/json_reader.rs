//! Reader for JSON structural record dumps.

use super::SourceReader;
use crate::detect::{detect_format_from_bytes, UTF8_BOM};
use crate::error::{Error, Result};
use crate::model::SourceDocument;

/// Loads `SourceDocument` records from JSON.
///
/// Binary containers (PDF, PPTX) handed to this reader are rejected as
/// unsupported rather than failing as malformed JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonSourceReader;

impl JsonSourceReader {
    /// Create a new JSON record reader.
    pub fn new() -> Self {
        Self
    }
}

impl SourceReader for JsonSourceReader {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "json"
    }

    fn read_bytes(&self, bytes: &[u8]) -> Result<SourceDocument> {
        if let Ok(format) = detect_format_from_bytes(bytes) {
            if format.is_binary() {
                return Err(Error::UnsupportedFormat(format!(
                    "{} content needs a dedicated reader",
                    format
                )));
            }
        }

        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        serde_json::from_slice(bytes)
            .map_err(|e| Error::Extraction(format!("invalid structural record: {}", e)))
    }
}
