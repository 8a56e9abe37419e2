use crate::error::ExtractionError;
use async_trait::async_trait;
use log::debug;
use lopdf::{Dictionary, Document, Object};
use std::path::{Path, PathBuf};

/// Title, author and year of one document, from whichever source produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<u16>,
}

/// Source of embedded document metadata.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract(&self, path: &Path) -> Result<DocumentMetadata, ExtractionError>;
}

/// Reads `/Title`, `/Author` and the `/CreationDate` year from the PDF Info dictionary.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfInfoExtractor;

#[async_trait]
impl MetadataExtractor for PdfInfoExtractor {
    async fn extract(&self, path: &Path) -> Result<DocumentMetadata, ExtractionError> {
        let owned: PathBuf = path.to_path_buf();
        let handle = tokio::task::spawn_blocking(move || read_info(&owned));

        match handle.await {
            Ok(result) => result,
            Err(source) => Err(ExtractionError::Task {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Used when embedded metadata is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopExtractor;

#[async_trait]
impl MetadataExtractor for NoopExtractor {
    async fn extract(&self, _path: &Path) -> Result<DocumentMetadata, ExtractionError> {
        Ok(DocumentMetadata::default())
    }
}

fn read_info(path: &Path) -> Result<DocumentMetadata, ExtractionError> {
    let doc = Document::load(path).map_err(|source| ExtractionError::Pdf {
        path: path.to_path_buf(),
        source,
    })?;

    let Some(info) = info_dictionary(&doc) else {
        debug!("No Info dictionary in {:?}", path);
        return Ok(DocumentMetadata::default());
    };

    let metadata = DocumentMetadata {
        title: string_entry(info, b"Title"),
        author: string_entry(info, b"Author"),
        year: string_entry(info, b"CreationDate").and_then(|d| pdf_date_year(&d)),
    };
    debug!("Embedded metadata for {:?}: {:?}", path, metadata);
    Ok(metadata)
}

fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn string_entry(dict: &Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        Object::String(bytes, _) => {
            let text = decode_pdf_string(bytes);
            let text = text.replace('\0', "");
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        _ => None,
    }
}

/// Text strings are UTF-16BE with a byte order mark, otherwise PDFDocEncoding,
/// which is approximated here as UTF-8 falling back to Latin-1.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        return char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// `D:YYYYMMDDHHmmSS...` → `YYYY`
fn pdf_date_year(date: &str) -> Option<u16> {
    let digits = date.trim().trim_start_matches("D:");
    let year: u16 = digits.get(..4)?.parse().ok()?;
    (1500..=2099).contains(&year).then_some(year)
}
