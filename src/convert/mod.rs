//! Conversion pipeline and reader registry.
//!
//! Readers turn input files into structural records; the converter runs
//! every record through assembly, refinement and normalization, and
//! computes the metadata record.
//!
//! # Example
//!
//! ```no_run
//! use deckmd::convert::{Converter, ConvertOptions};
//! use std::path::Path;
//!
//! fn main() -> deckmd::Result<()> {
//!     let converter = Converter::with_defaults().with_options(ConvertOptions::from_env());
//!
//!     let result = converter.convert_file(Path::new("deck.json"))?;
//!     println!("{}", result.markdown);
//!     Ok(())
//! }
//! ```

mod json_reader;

pub use json_reader::JsonSourceReader;

use crate::assemble::{assemble_units, render_units, AssembleOptions};
use crate::detect::SourceFormat;
use crate::error::{Error, Result};
use crate::model::{SourceDocument, UnitKind};
use crate::ocr::OcrCapability;
use crate::render::{normalize, ConversionMeta, MarkdownRefiner, NormalizeOptions, RefineOptions};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Environment variable toggling refinement.
pub const ENV_REFINE: &str = "DECKMD_REFINE";
/// Environment variable toggling normalization.
pub const ENV_NORMALIZE: &str = "DECKMD_NORMALIZE";

/// Options for document conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Assembly options
    pub assemble: AssembleOptions,

    /// Refinement options (`None` skips refinement)
    pub refine: Option<RefineOptions>,

    /// Normalization options (`None` skips normalization)
    pub normalize: Option<NormalizeOptions>,

    /// Prepend YAML frontmatter with the metadata record
    pub include_frontmatter: bool,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read refinement and normalization toggles from the environment.
    ///
    /// `DECKMD_REFINE` and `DECKMD_NORMALIZE` accept `1`, `true` or `yes`
    /// (any case) as on; any other value is off. Unset means on.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let enabled = |key: &str| match lookup(key) {
            Some(value) => matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            ),
            None => true,
        };

        let mut options = Self::default();
        if !enabled(ENV_REFINE) {
            options.refine = None;
        }
        if !enabled(ENV_NORMALIZE) {
            options.normalize = None;
        }
        options
    }

    /// Set assembly options.
    pub fn with_assemble_options(mut self, options: AssembleOptions) -> Self {
        self.assemble = options;
        self
    }

    /// Set refinement options.
    pub fn with_refine(mut self, options: Option<RefineOptions>) -> Self {
        self.refine = options;
        self
    }

    /// Set normalization options.
    pub fn with_normalize(mut self, options: Option<NormalizeOptions>) -> Self {
        self.normalize = options;
        self
    }

    /// Enable frontmatter output.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            assemble: AssembleOptions::default(),
            refine: Some(RefineOptions::default()),
            normalize: Some(NormalizeOptions::default()),
            include_frontmatter: false,
        }
    }
}

/// Result of document conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    /// Final markdown
    pub markdown: String,

    /// Source file name, if converted from a file
    pub filename: Option<String>,

    /// Source format
    pub format: SourceFormat,

    /// Metadata record
    pub meta: ConversionMeta,

    /// Conversion timestamp
    pub converted_at: DateTime<Utc>,
}

impl ConvertResult {
    /// Get markdown length in bytes.
    pub fn content_len(&self) -> usize {
        self.markdown.len()
    }
}

/// Trait for format readers.
///
/// Implement this trait to feed a new source format into the pipeline.
pub trait SourceReader: Send + Sync {
    /// Get the supported file extensions for this reader.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pptx"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this reader.
    fn name(&self) -> &str;

    /// Read a structural record from bytes.
    fn read_bytes(&self, bytes: &[u8]) -> Result<SourceDocument>;

    /// Read a structural record from a file.
    fn read(&self, path: &Path) -> Result<SourceDocument> {
        let bytes = std::fs::read(path)?;
        self.read_bytes(&bytes)
    }

    /// Check if this reader supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry of readers plus the conversion pipeline.
///
/// The OCR capability is resolved once and shared by every conversion.
#[derive(Clone)]
pub struct Converter {
    readers: HashMap<String, Arc<dyn SourceReader>>,
    by_name: HashMap<String, Arc<dyn SourceReader>>,
    ocr: OcrCapability,
    options: ConvertOptions,
}

impl Converter {
    /// Create a converter with no readers.
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
            by_name: HashMap::new(),
            ocr: OcrCapability::disabled(),
            options: ConvertOptions::default(),
        }
    }

    /// Create a converter with the default readers (JSON records).
    pub fn with_defaults() -> Self {
        let mut converter = Self::new();
        converter.register(Arc::new(JsonSourceReader::new()));
        converter
    }

    /// Register a reader for all its supported extensions.
    pub fn register(&mut self, reader: Arc<dyn SourceReader>) {
        for ext in reader.supported_extensions() {
            self.readers.insert(ext.to_lowercase(), reader.clone());
        }
        self.by_name.insert(reader.name().to_lowercase(), reader);
    }

    /// Set the OCR capability.
    pub fn with_ocr(mut self, ocr: OcrCapability) -> Self {
        self.ocr = ocr;
        self
    }

    /// Set conversion options.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Conversion options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// OCR capability in use.
    pub fn ocr(&self) -> &OcrCapability {
        &self.ocr
    }

    /// Get a reader by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn SourceReader>> {
        self.readers.get(&ext.to_lowercase()).cloned()
    }

    /// Get a reader by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn SourceReader>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.readers.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.readers.keys().map(|s| s.as_str()).collect()
    }

    fn reader_for_path(&self, path: &Path) -> Result<Arc<dyn SourceReader>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(format!("{} has no extension", path.display())))?;
        self.reader_for_extension(ext)
    }

    fn reader_for_extension(&self, ext: &str) -> Result<Arc<dyn SourceReader>> {
        self.get_by_extension(ext).ok_or_else(|| match SourceFormat::from_extension(ext) {
            Ok(format) => {
                Error::UnsupportedFormat(format!("no reader registered for {} input", format))
            }
            Err(e) => e,
        })
    }

    /// Convert a file using the reader registered for its extension.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        let path = path.as_ref();
        let reader = self.reader_for_path(path)?;
        log::debug!("reading {} with '{}' reader", path.display(), reader.name());

        let doc = reader.read(path).map_err(Error::into_extraction)?;
        let filename = path.file_name().and_then(|n| n.to_str());
        Ok(self.convert_document(&doc, filename))
    }

    /// Convert bytes using the reader registered for `ext`.
    pub fn convert_bytes(&self, bytes: &[u8], ext: &str) -> Result<ConvertResult> {
        let reader = self.reader_for_extension(ext)?;
        let doc = reader.read_bytes(bytes).map_err(Error::into_extraction)?;
        Ok(self.convert_document(&doc, None))
    }

    /// Run a structural record through the full pipeline.
    pub fn convert_document(&self, doc: &SourceDocument, filename: Option<&str>) -> ConvertResult {
        let options = &self.options;
        let unit_kind = match doc {
            SourceDocument::Slides(_) => UnitKind::Slide,
            SourceDocument::Pages(_) => UnitKind::Page,
        };

        let units = assemble_units(doc, &self.ocr, &options.assemble);
        let mut meta = ConversionMeta::new(unit_kind);
        meta.unit_count = units.len() as u32;
        meta.ocr_units = units
            .iter()
            .filter(|u| u.ocr_applied)
            .map(|u| u.index)
            .collect();

        let mut markdown = render_units(&units, &options.assemble);
        if let Some(refine) = &options.refine {
            markdown = MarkdownRefiner::new(refine.clone()).refine(&markdown);
        }
        if let Some(normalize_options) = &options.normalize {
            markdown = normalize(&markdown, normalize_options);
        }
        meta.scan(&markdown);

        let converted_at = Utc::now();
        let format = doc.format();
        if options.include_frontmatter {
            markdown = format!(
                "{}{}",
                meta.to_yaml_frontmatter(filename, format, &converted_at),
                markdown
            );
        }

        log::debug!(
            "converted {} {}s ({} OCR, {} tables, {} diagrams)",
            meta.unit_count,
            unit_kind.label().to_lowercase(),
            meta.ocr_units.len(),
            meta.table_count,
            meta.diagram_count
        );

        ConvertResult {
            markdown,
            filename: filename.map(str::to_string),
            format,
            meta,
            converted_at,
        }
    }

    /// Convert a file on the tokio runtime.
    ///
    /// The file is read asynchronously; assembly runs on the blocking pool.
    #[cfg(feature = "async")]
    pub async fn convert_file_async<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        let path = path.as_ref();
        let reader = self.reader_for_path(path)?;
        let bytes = tokio::fs::read(path).await?;
        let filename = path.file_name().and_then(|n| n.to_str()).map(str::to_string);
        let converter = self.clone();

        tokio::task::spawn_blocking(move || -> Result<ConvertResult> {
            let doc = reader.read_bytes(&bytes).map_err(Error::into_extraction)?;
            Ok(converter.convert_document(&doc, filename.as_deref()))
        })
        .await
        .map_err(|e| Error::Other(format!("conversion task failed: {}", e)))?
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::with_defaults()
    }
}
