//! OCR collaborator contract and capability.
//!
//! Page assembly asks the OCR collaborator for text when a page carries no
//! native text. The capability is resolved once and passed by reference; a
//! failing engine degrades to an empty string for that page.

use crate::error::{Error, Result};
use std::fmt;
use std::process::Command;
use std::sync::Arc;

/// Default rendering resolution for OCR.
pub const DEFAULT_OCR_DPI: u32 = 300;

/// An OCR engine.
pub trait OcrEngine: Send + Sync {
    /// Engine name for diagnostics.
    fn name(&self) -> &str;

    /// Whether the engine can run in this environment.
    fn is_available(&self) -> bool {
        true
    }

    /// Recognize the text of one page.
    ///
    /// `page_index` is zero-based. An empty string means nothing was recognized.
    fn recognize(&self, handle: &str, page_index: usize, dpi: u32) -> Result<String>;
}

/// Resolved OCR capability.
#[derive(Clone)]
pub struct OcrCapability {
    engine: Option<Arc<dyn OcrEngine>>,
    dpi: u32,
}

impl OcrCapability {
    /// A capability that never recognizes anything.
    pub fn disabled() -> Self {
        Self {
            engine: None,
            dpi: DEFAULT_OCR_DPI,
        }
    }

    /// Resolve a capability from an engine, probing its availability once.
    pub fn resolve(engine: Arc<dyn OcrEngine>) -> Self {
        if engine.is_available() {
            log::debug!("OCR engine '{}' available", engine.name());
            Self {
                engine: Some(engine),
                dpi: DEFAULT_OCR_DPI,
            }
        } else {
            log::warn!(
                "OCR engine '{}' is not available; scanned pages will stay empty",
                engine.name()
            );
            Self::disabled()
        }
    }

    /// Set the rendering resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Whether an engine is present.
    pub fn is_enabled(&self) -> bool {
        self.engine.is_some()
    }

    /// Rendering resolution passed to the engine.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Recognize a page, degrading every failure to an empty string.
    pub fn page_text(&self, handle: &str, page_index: usize) -> String {
        let Some(engine) = &self.engine else {
            return String::new();
        };

        match engine.recognize(handle, page_index, self.dpi) {
            Ok(text) => text,
            Err(e) => {
                log::warn!(
                    "OCR failed for page {} of '{}' ({}): {}",
                    page_index + 1,
                    handle,
                    engine.name(),
                    e
                );
                String::new()
            }
        }
    }
}

impl Default for OcrCapability {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for OcrCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrCapability")
            .field("engine", &self.engine.as_ref().map(|e| e.name().to_string()))
            .field("dpi", &self.dpi)
            .finish()
    }
}

/// OCR engine that runs an external program and reads its stdout.
///
/// Arguments may contain the placeholders `{input}` (document handle),
/// `{page}` (zero-based index), `{page1}` (one-based number) and `{dpi}`.
///
/// # Example
/// ```no_run
/// use deckmd::ocr::{CommandOcr, OcrCapability};
/// use std::sync::Arc;
///
/// let engine = CommandOcr::new("ocr-page").args(["{input}", "--page", "{page1}", "--dpi", "{dpi}"]);
/// let ocr = OcrCapability::resolve(Arc::new(engine));
/// ```
#[derive(Debug, Clone)]
pub struct CommandOcr {
    program: String,
    args: Vec<String>,
}

impl CommandOcr {
    /// Create an engine for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Set the argument template.
    pub fn args<S: Into<String>>(mut self, args: impl IntoIterator<Item = S>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a command line such as `"ocr {input} --page {page}"`.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Ocr("empty OCR command".to_string()))?;
        Ok(Self::new(program).args(parts))
    }

    fn expand_args(&self, handle: &str, page_index: usize, dpi: u32) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace("{input}", handle)
                    .replace("{page1}", &(page_index + 1).to_string())
                    .replace("{page}", &page_index.to_string())
                    .replace("{dpi}", &dpi.to_string())
            })
            .collect()
    }
}

impl OcrEngine for CommandOcr {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn recognize(&self, handle: &str, page_index: usize, dpi: u32) -> Result<String> {
        let output = Command::new(&self.program)
            .args(self.expand_args(handle, page_index, dpi))
            .output()?;

        if !output.status.success() {
            return Err(Error::Ocr(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
