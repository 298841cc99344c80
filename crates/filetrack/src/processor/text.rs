use std::path::Path;

use crate::error::ExtractError;
use crate::processor::{DocumentFormat, TextExtractor};

pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        std::fs::read_to_string(path).map_err(|e| ExtractError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_extract_plain_text() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Application received 2024-03-05.").unwrap();

        let extractor = PlainTextExtractor::new();
        let text = extractor.extract(temp_file.path()).unwrap();
        assert!(text.contains("2024-03-05"));
    }

    #[test]
    fn test_supports_text_only() {
        let extractor = PlainTextExtractor::new();
        assert!(extractor.supports(DocumentFormat::Text));
        assert!(!extractor.supports(DocumentFormat::Pdf));
        assert!(!extractor.supports(DocumentFormat::Docx));
    }
}
