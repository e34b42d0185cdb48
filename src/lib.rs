//! # deckmd
//!
//! Slide deck and page document conversion to annotated Markdown for
//! LLM/RAG pipelines.
//!
//! Format readers hand over structural records (slides of positioned
//! elements, or pages of text plus tables). deckmd assembles them into
//! Markdown with `[[TABLE]]`/`[[DIAGRAM]]` blocks, removes structural
//! noise, and normalizes currency amounts and dates.
//!
//! ## Quick Start
//!
//! ```no_run
//! use deckmd::convert_file;
//!
//! fn main() -> deckmd::Result<()> {
//!     let result = convert_file("deck.json")?;
//!     println!("{}", result.markdown);
//!     println!("codes: {:?}", result.meta.reservation_codes);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Reading order**: nested groups flattened, shapes sorted top-to-bottom, left-to-right
//! - **Opaque blocks**: tables and diagrams survive refinement untouched
//! - **OCR fallback**: empty pages recognized through a pluggable engine
//! - **Refinement**: header cleanup, empty bullets, repeated rules and footers, version lists
//! - **Normalization**: `1,000원` → `1000 KRW`, `2024년 3월 5일` → `2024-03-05`
//! - **Parallel processing**: Uses Rayon for multi-unit documents

pub mod assemble;
pub mod convert;
pub mod detect;
pub mod error;
pub mod model;
pub mod ocr;
pub mod render;

// Re-export commonly used types
pub use assemble::{AssembleOptions, HeadingStyle, Locale};
pub use convert::{
    ConvertOptions, ConvertResult, Converter, JsonSourceReader, SourceReader,
};
pub use detect::{detect_format_from_bytes, detect_format_from_path, SourceFormat};
pub use error::{Error, Result};
pub use model::{
    Element, ElementKind, PageRecord, PageSource, PlaceholderRole, SlideDeck, SlideRecord,
    SourceDocument, TableCell, TableModel, TableRow, TextParagraph, UnitKind,
};
pub use ocr::{CommandOcr, OcrCapability, OcrEngine};
pub use render::{
    ConversionMeta, JsonFormat, MarkdownRefiner, NormalizeOptions, RefineOptions, RefinePass,
};

use std::path::Path;

/// Convert a structural record file with default options.
///
/// # Example
///
/// ```no_run
/// use deckmd::convert_file;
///
/// let result = convert_file("slides.json").unwrap();
/// std::fs::write("slides.md", &result.markdown).unwrap();
/// ```
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<ConvertResult> {
    Converter::with_defaults().convert_file(path)
}

/// Convert a structural record file with custom options.
///
/// # Example
///
/// ```no_run
/// use deckmd::{convert_file_with_options, ConvertOptions};
///
/// let options = ConvertOptions::new().with_frontmatter(true).with_normalize(None);
/// let result = convert_file_with_options("pages.json", &options).unwrap();
/// ```
pub fn convert_file_with_options<P: AsRef<Path>>(
    path: P,
    options: &ConvertOptions,
) -> Result<ConvertResult> {
    Converter::with_defaults()
        .with_options(options.clone())
        .convert_file(path)
}

/// Convert an in-memory structural record with default options.
pub fn convert_document(doc: &SourceDocument) -> ConvertResult {
    Converter::with_defaults().convert_document(doc, None)
}

/// Refine already-extracted markdown with default passes.
///
/// # Example
///
/// ```
/// let refined = deckmd::refine_markdown("## 🖼 Slide 1: - 1 -\n\n-\n- item");
/// assert_eq!(refined, "## Slide 1\n\n- item");
/// ```
pub fn refine_markdown(text: &str) -> String {
    MarkdownRefiner::default().refine(text)
}

/// Normalize amounts and dates in markdown with default options.
///
/// # Example
///
/// ```
/// let text = deckmd::normalize_markdown("총 1,000원 (2024년 3월 5일)");
/// assert_eq!(text, "총 1000 KRW (2024-03-05)");
/// ```
pub fn normalize_markdown(text: &str) -> String {
    render::normalize(text, &NormalizeOptions::default())
}

/// Convert a structural record file to a JSON conversion result.
///
/// # Example
///
/// ```no_run
/// use deckmd::{to_json, JsonFormat};
///
/// let json = to_json("deck.json", JsonFormat::Pretty).unwrap();
/// std::fs::write("deck.result.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let result = convert_file(path)?;
    render::to_json(&result, format)
}
