//! Error types for deckmd library.

use std::io;
use thiserror::Error;

/// Result type alias for deckmd operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not in a format any registered reader can handle.
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// A reader accepted the input but failed to extract its structure.
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// The OCR collaborator failed for a page.
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Error during rendering (Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error means the input format itself is not supported,
    /// as opposed to a failure while extracting a supported format.
    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Error::UnsupportedFormat(_))
    }

    /// Fold a reader failure into the whole-document error vocabulary.
    ///
    /// Format and I/O errors pass through; everything else becomes
    /// [`Error::Extraction`].
    pub(crate) fn into_extraction(self) -> Self {
        match self {
            Error::Io(_) | Error::UnsupportedFormat(_) | Error::Extraction(_) => self,
            other => Error::Extraction(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedFormat("docx".to_string());
        assert_eq!(err.to_string(), "Unsupported input format: docx");

        let err = Error::Extraction("broken slide tree".to_string());
        assert_eq!(err.to_string(), "Extraction failed: broken slide tree");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_into_extraction() {
        assert!(Error::UnsupportedFormat("x".into())
            .into_extraction()
            .is_unsupported_format());
        assert!(matches!(
            Error::Render("bad".into()).into_extraction(),
            Error::Extraction(_)
        ));
    }
}
