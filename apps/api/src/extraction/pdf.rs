use lopdf::Document;
use tracing::warn;

use super::{ExtractionError, TextExtractor, PDF_MEDIA_TYPE};

/// PDF text extractor backed by `lopdf`.
///
/// Pages are read in document order. A page whose text cannot be extracted
/// contributes nothing instead of failing the whole document; only a byte
/// stream that is not a PDF at all is an error.
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn media_type(&self) -> &'static str {
        PDF_MEDIA_TYPE
    }

    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let doc = Document::load_mem(bytes).map_err(|e| ExtractionError::Parse {
            format: "PDF",
            message: e.to_string(),
        })?;

        // get_pages is a BTreeMap keyed by page number, so iteration is document order
        let pages = doc.get_pages().into_keys().map(|page_number| {
            doc.extract_text(&[page_number])
                .map_err(|e| (page_number, e.to_string()))
        });

        Ok(join_pages(pages))
    }
}

/// Concatenates page texts, turning unreadable pages into empty strings.
fn join_pages<I>(pages: I) -> String
where
    I: IntoIterator<Item = Result<String, (u32, String)>>,
{
    let mut text = String::new();
    for page in pages {
        match page {
            Ok(page_text) => {
                text.push_str(&page_text);
                if !page_text.ends_with('\n') {
                    text.push('\n');
                }
            }
            Err((page_number, reason)) => {
                warn!("Failed to extract text from PDF page {page_number}: {reason}");
            }
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    use super::*;
    use crate::extraction::ExtractorRegistry;

    type PageResult = Result<String, (u32, String)>;

    /// One Courier page per entry, each a single line of text.
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let kids: Vec<Object> = pages
            .iter()
            .map(|line| {
                let content = Content {
                    operations: vec![
                        Operation::new("BT", vec![]),
                        Operation::new("Tf", vec!["F1".into(), 12.into()]),
                        Operation::new("Td", vec![72.into(), 720.into()]),
                        Operation::new("Tj", vec![Object::string_literal(*line)]),
                        Operation::new("ET", vec![]),
                    ],
                };
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "Contents" => content_id,
                })
                .into()
            })
            .collect();

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_extracts_pages_in_order() {
        let bytes = build_pdf(&["Senior Rust Engineer", "Kafka and Kubernetes"]);
        let text = PdfExtractor.extract_text(&bytes).unwrap();
        assert_eq!(text, "Senior Rust Engineer\nKafka and Kubernetes\n");
    }

    #[test]
    fn test_registry_lower_cases_pdf_text() {
        let bytes = build_pdf(&["Jane DOE", "AWS Certified"]);
        let text = ExtractorRegistry::default()
            .extract(&bytes, PDF_MEDIA_TYPE)
            .unwrap();
        assert_eq!(text, "jane doe\naws certified\n");
    }

    #[test]
    fn test_invalid_bytes_are_a_parse_error() {
        let err = PdfExtractor.extract_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Parse { format: "PDF", .. }));
    }

    #[test]
    fn test_join_pages_keeps_document_order() {
        let pages: Vec<PageResult> = vec![Ok("Page one".to_string()), Ok("Page two\n".to_string())];
        assert_eq!(join_pages(pages), "Page one\nPage two\n");
    }

    #[test]
    fn test_unreadable_page_becomes_empty() {
        let pages: Vec<PageResult> = vec![
            Ok("intro".to_string()),
            Err((2, "unsupported font encoding".to_string())),
            Ok("skills".to_string()),
        ];
        assert_eq!(join_pages(pages), "intro\nskills\n");
    }

    #[test]
    fn test_no_pages_yields_empty_text() {
        assert_eq!(join_pages(Vec::<PageResult>::new()), "");
    }
}
