//! Source format detection and validation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Source formats the pipeline knows about.
///
/// `Pdf` and `Pptx` are binary containers that need an external reader;
/// `Dump` is a JSON structural record already produced by such a reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Page-based document
    Pdf,
    /// Slide deck
    Pptx,
    /// JSON structural record
    Dump,
}

impl SourceFormat {
    /// Resolve a format from a file extension (case-insensitive, no dot).
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Ok(SourceFormat::Pdf),
            "pptx" => Ok(SourceFormat::Pptx),
            "json" => Ok(SourceFormat::Dump),
            other => Err(Error::UnsupportedFormat(format!(
                ".{} (expected .pdf, .pptx or a .json record)",
                other
            ))),
        }
    }

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Pdf => "pdf",
            SourceFormat::Pptx => "pptx",
            SourceFormat::Dump => "json",
        }
    }

    /// Whether the format is a binary container the core never parses itself.
    pub fn is_binary(&self) -> bool {
        !matches!(self, SourceFormat::Dump)
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Pdf => write!(f, "PDF"),
            SourceFormat::Pptx => write!(f, "PPTX"),
            SourceFormat::Dump => write!(f, "JSON record"),
        }
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
/// ZIP local file header, the container of OOXML decks.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// UTF-8 byte order mark.
pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Detect the source format from a file path.
///
/// The extension wins when it is recognized; otherwise the leading bytes
/// are sniffed.
///
/// # Example
/// ```no_run
/// use deckmd::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("deck.json").unwrap();
/// println!("{}", format);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<SourceFormat> {
    let path = path.as_ref();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if let Ok(format) = SourceFormat::from_extension(ext) {
            return Ok(format);
        }
    }

    let file = File::open(path)?;
    let mut header = Vec::with_capacity(16);
    BufReader::new(file).take(16).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the source format from the first bytes of a file.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<SourceFormat> {
    if data.starts_with(PDF_MAGIC) {
        return Ok(SourceFormat::Pdf);
    }
    if data.starts_with(ZIP_MAGIC) {
        return Ok(SourceFormat::Pptx);
    }

    let body = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    match body.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') => Ok(SourceFormat::Dump),
        _ => Err(Error::UnsupportedFormat(
            "unrecognized file signature".to_string(),
        )),
    }
}
