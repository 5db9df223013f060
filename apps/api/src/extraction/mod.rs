//! Document text extraction.
//!
//! Each supported upload format has its own `TextExtractor`. The
//! `ExtractorRegistry` picks one by media type and lower-cases whatever it
//! returns, so every caller downstream sees normalized text.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

pub mod docx;
pub mod pdf;

pub use docx::DocxExtractor;
pub use pdf::PdfExtractor;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported media type: {0}")]
    UnsupportedType(String),

    #[error("Failed to parse {format} document: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

/// Pulls plain text out of one document format.
pub trait TextExtractor: Send + Sync {
    /// The media type this extractor handles.
    fn media_type(&self) -> &'static str;

    /// Extracts the raw (not yet lower-cased) text of the document.
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Media-type keyed set of extractors.
#[derive(Clone)]
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn TextExtractor>>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::empty()
            .with(Arc::new(PdfExtractor))
            .with(Arc::new(DocxExtractor))
    }
}

impl ExtractorRegistry {
    pub fn empty() -> Self {
        Self {
            extractors: Vec::new(),
        }
    }

    /// Registers an extractor. A later registration for the same media type wins.
    pub fn with(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractors
            .retain(|e| e.media_type() != extractor.media_type());
        self.extractors.push(extractor);
        self
    }

    /// Extracts lower-cased text from `bytes` declared as `media_type`.
    pub fn extract(&self, bytes: &[u8], media_type: &str) -> Result<String, ExtractionError> {
        let extractor = self
            .find(media_type)
            .ok_or_else(|| ExtractionError::UnsupportedType(media_type.to_string()))?;
        let text = extractor.extract_text(bytes)?;
        Ok(text.to_lowercase())
    }

    fn find(&self, media_type: &str) -> Option<&Arc<dyn TextExtractor>> {
        let wanted = essence(media_type);
        self.extractors.iter().find(|e| e.media_type() == wanted)
    }
}

/// Resolves the media type of an upload. The declared type wins unless it is
/// missing or the generic `application/octet-stream`, in which case the file
/// extension decides.
pub fn resolve_media_type(declared: Option<&str>, file_name: Option<&str>) -> Option<String> {
    if let Some(declared) = declared.map(essence).filter(|d| !d.is_empty()) {
        if declared != "application/octet-stream" {
            return Some(declared);
        }
    }

    let extension = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())?;

    match extension.as_str() {
        "pdf" => Some(PDF_MEDIA_TYPE.to_string()),
        "docx" => Some(DOCX_MEDIA_TYPE.to_string()),
        _ => None,
    }
}

/// Media type without parameters, lower-cased (`Application/PDF; x=y` -> `application/pdf`).
fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}
