//! Text-extraction collaborators.
//!
//! Extraction exists solely as the fallback source for the date normalizer
//! when the external classifier yields no usable date. Formats without a
//! text layer (scanned images) simply have no extractor; the resolver treats
//! that the same as "no date found".

pub mod docx;
pub mod pdf;
pub mod text;

use std::path::Path;

use crate::error::ExtractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detects the format from the file extension, falling back to MIME
    /// guessing for unusual extensions.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("txt") | Some("md") | Some("text") => return Some(DocumentFormat::Text),
            Some("pdf") => return Some(DocumentFormat::Pdf),
            Some("docx") => return Some(DocumentFormat::Docx),
            _ => {}
        }

        match mime_guess::from_path(path).first() {
            Some(mime) if mime.type_() == mime_guess::mime::TEXT => Some(DocumentFormat::Text),
            Some(mime) if mime.essence_str() == "application/pdf" => Some(DocumentFormat::Pdf),
            _ => None,
        }
    }
}

pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
    fn supports(&self, format: DocumentFormat) -> bool;
}

pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: vec![
                Box::new(text::PlainTextExtractor::new()),
                Box::new(pdf::PdfTextExtractor::new()),
                Box::new(docx::DocxTextExtractor::new()),
            ],
        }
    }

    pub fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let format = DocumentFormat::from_path(path).ok_or_else(|| {
            let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            ExtractError::UnsupportedFormat(extension.to_string())
        })?;

        for extractor in &self.extractors {
            if extractor.supports(format) {
                return extractor.extract(path);
            }
        }

        Err(ExtractError::UnsupportedFormat(format!("{:?}", format)))
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
