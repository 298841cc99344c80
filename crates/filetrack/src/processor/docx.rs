use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ExtractError;
use crate::processor::{DocumentFormat, TextExtractor};

/// Pulls paragraph text out of a DOCX archive's `word/document.xml`.
pub struct DocxTextExtractor;

impl DocxTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for DocxTextExtractor {
    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let file = std::fs::File::open(path).map_err(|e| ExtractError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut archive = zip::ZipArchive::new(file)
            .map_err(|e| ExtractError::DocxExtraction(format!("Failed to open DOCX: {}", e)))?;

        let mut document_xml = archive.by_name("word/document.xml").map_err(|e| {
            ExtractError::DocxExtraction(format!("Failed to find document.xml: {}", e))
        })?;

        let mut xml_content = String::new();
        document_xml.read_to_string(&mut xml_content).map_err(|e| {
            ExtractError::DocxExtraction(format!("Failed to read document.xml: {}", e))
        })?;

        parse_document_xml(&xml_content)
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        matches!(format, DocumentFormat::Docx)
    }
}

fn parse_document_xml(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut text = String::new();
    let mut in_text_element = false;
    let mut in_paragraph = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_element = true,
                b"p" => in_paragraph = true,
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_element = false,
                b"p" => {
                    if in_paragraph {
                        text.push('\n');
                        in_paragraph = false;
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_element {
                    let raw = e.decode().unwrap_or_default();
                    let decoded = quick_xml::escape::unescape(&raw)
                        .map(|c| c.into_owned())
                        .unwrap_or_else(|_| raw.into_owned());
                    text.push_str(&decoded);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::DocxExtraction(format!(
                    "XML parsing error: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(text)
}
