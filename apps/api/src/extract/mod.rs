//! Document text extraction: picks an extractor by file extension.
//!
//! Unknown or missing extensions map to an empty string, never an error.
//! Extraction failures are per-document and surfaced as `ExtractError`.

use std::collections::HashMap;
use std::path::Path;

use bytes::Bytes;
use thiserror::Error;

pub mod docx;
pub mod pdf;
pub mod plain;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid PDF: {0}")]
    Pdf(String),

    #[error("invalid DOCX: {0}")]
    Docx(String),

    #[error("text is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// A named uploaded document, as received from the caller.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub name: String,
    pub bytes: Bytes,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Lower-cased file extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// Converts the raw bytes of one document format into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Extension → extractor lookup.
pub struct ExtractorRegistry {
    by_extension: HashMap<String, Box<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self {
            by_extension: HashMap::new(),
        }
    }

    pub fn register(&mut self, extension: &str, extractor: Box<dyn TextExtractor>) {
        self.by_extension
            .insert(extension.to_ascii_lowercase(), extractor);
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.by_extension
            .contains_key(&extension.to_ascii_lowercase())
    }

    /// Extracts text from a document. Unsupported extensions yield `""`.
    pub fn extract(&self, document: &RawDocument) -> Result<String, ExtractError> {
        match document
            .extension()
            .and_then(|ext| self.by_extension.get(&ext))
        {
            Some(extractor) => extractor.extract(&document.bytes),
            None => Ok(String::new()),
        }
    }
}

impl Default for ExtractorRegistry {
    /// `.pdf`, `.docx` and `.txt`.
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("pdf", Box::new(pdf::PdfExtractor));
        registry.register("docx", Box::new(docx::DocxExtractor));
        registry.register("txt", Box::new(plain::PlainTextExtractor));
        registry
    }
}
