//! Conversion metadata.

use super::block::count_blocks;
use super::normalize::extract_reservation_codes;
use crate::detect::SourceFormat;
use crate::model::{BlockKind, UnitKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata record returned next to the converted markdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionMeta {
    /// Whether units are slides or pages
    pub unit_kind: UnitKind,

    /// Number of slides or pages assembled
    pub unit_count: u32,

    /// Numbers of the pages whose text came from OCR
    pub ocr_units: Vec<u32>,

    /// Table blocks in the final text
    pub table_count: u32,

    /// Diagram blocks in the final text
    pub diagram_count: u32,

    /// Reservation codes found in the final text
    pub reservation_codes: Vec<String>,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ConversionMeta {
    /// Create an empty record for a unit kind.
    pub fn new(unit_kind: UnitKind) -> Self {
        Self {
            unit_kind,
            unit_count: 0,
            ocr_units: Vec::new(),
            table_count: 0,
            diagram_count: 0,
            reservation_codes: Vec::new(),
            word_count: 0,
            char_count: 0,
        }
    }

    /// Fill the text-derived fields from the final markdown.
    pub fn scan(&mut self, markdown: &str) {
        self.table_count = count_blocks(markdown, BlockKind::Table) as u32;
        self.diagram_count = count_blocks(markdown, BlockKind::Diagram) as u32;
        self.reservation_codes = extract_reservation_codes(markdown);
        self.word_count = 0;
        self.char_count = 0;
        self.count_text(markdown);
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Render the record as YAML frontmatter.
    pub fn to_yaml_frontmatter(
        &self,
        filename: Option<&str>,
        format: SourceFormat,
        converted_at: &DateTime<Utc>,
    ) -> String {
        let mut lines = vec!["---".to_string()];

        if let Some(name) = filename {
            lines.push(format!("source: \"{}\"", escape_yaml(name)));
        }
        lines.push(format!("format: {}", format.extension()));
        lines.push(format!("{}s: {}", self.unit_kind.label().to_lowercase(), self.unit_count));
        if !self.ocr_units.is_empty() {
            let units: Vec<String> = self.ocr_units.iter().map(u32::to_string).collect();
            lines.push(format!("ocr_pages: [{}]", units.join(", ")));
        }
        lines.push(format!("tables: {}", self.table_count));
        lines.push(format!("diagrams: {}", self.diagram_count));
        if !self.reservation_codes.is_empty() {
            let codes: Vec<String> = self
                .reservation_codes
                .iter()
                .map(|c| format!("\"{}\"", escape_yaml(c)))
                .collect();
            lines.push(format!("reservation_codes: [{}]", codes.join(", ")));
        }
        lines.push(format!("converted_at: {}", converted_at.to_rfc3339()));

        lines.push("---".to_string());
        lines.push(String::new());

        lines.join("\n")
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_count_text() {
        let mut meta = ConversionMeta::new(UnitKind::Page);
        meta.count_text("Hello, world! This is a test.");

        assert_eq!(meta.word_count, 6);
        assert_eq!(meta.char_count, 24);
    }

    #[test]
    fn test_scan() {
        let markdown = "## Slide 1\n\n[[TABLE]]\n| a |\n| --- |\n[[/TABLE]]\n\n[[DIAGRAM]]\nSmartArt\n[[/DIAGRAM]]\n\nPZ123456789";
        let mut meta = ConversionMeta::new(UnitKind::Slide);
        meta.scan(markdown);
        assert_eq!(meta.table_count, 1);
        assert_eq!(meta.diagram_count, 1);
        assert_eq!(meta.reservation_codes, vec!["PZ123456789"]);
        assert!(meta.word_count > 0);
    }

    #[test]
    fn test_frontmatter() {
        let mut meta = ConversionMeta::new(UnitKind::Page);
        meta.unit_count = 2;
        meta.ocr_units = vec![2];
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        let fm = meta.to_yaml_frontmatter(Some("scan \"v2\".pdf"), SourceFormat::Pdf, &at);

        assert!(fm.starts_with("---\n"));
        assert!(fm.ends_with("---\n"));
        assert!(fm.contains("source: \"scan \\\"v2\\\".pdf\""));
        assert!(fm.contains("pages: 2"));
        assert!(fm.contains("ocr_pages: [2]"));
        assert!(fm.contains("converted_at: 2024-03-05T12:00:00+00:00"));
    }
}
