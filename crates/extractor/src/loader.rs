use chrono::Utc;
use lopdf::Document;
use storage::models::{LoadedDocument, MAX_ANALYZED_PAGES};

use crate::error::ExtractorError;

type Result<T> = std::result::Result<T, ExtractorError>;

/// Reads the text of the first pages of an uploaded PDF.
#[derive(Debug, Clone)]
pub struct PdfLoader {
    page_limit: usize,
}

impl PdfLoader {
    pub fn new(page_limit: usize) -> Self {
        Self { page_limit }
    }

    pub fn analyzed_page_count(&self, total_pages: usize) -> usize {
        total_pages.min(self.page_limit)
    }

    /// Parses the PDF on the blocking pool.
    pub async fn load(&self, file_name: String, bytes: Vec<u8>) -> Result<LoadedDocument> {
        let loader = self.clone();
        tokio::task::spawn_blocking(move || loader.load_from_bytes(&file_name, &bytes))
            .await
            .map_err(|e| ExtractorError::PdfError(format!("PDF worker failed: {}", e)))?
    }

    pub fn load_from_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<LoadedDocument> {
        if bytes.is_empty() {
            return Err(ExtractorError::PdfError("uploaded file is empty".to_string()));
        }

        let document =
            Document::load_mem(bytes).map_err(|e| ExtractorError::PdfError(e.to_string()))?;

        let pages = document.get_pages();
        let total_pages = pages.len();
        let analyzed_pages = self.analyzed_page_count(total_pages);

        let mut text = String::new();
        for page_number in pages.keys().take(analyzed_pages) {
            let page_text = document
                .extract_text(&[*page_number])
                .map_err(|e| ExtractorError::PdfError(e.to_string()))?;
            text.push_str(&page_text);
            text.push('\n');
        }

        tracing::info!(
            "Read {} ({} pages, analyzing {}, {} chars of text)",
            file_name,
            total_pages,
            analyzed_pages,
            text.len()
        );

        Ok(LoadedDocument {
            file_name: file_name.to_string(),
            total_pages,
            analyzed_pages,
            text,
            loaded_at: Utc::now(),
        })
    }
}

impl Default for PdfLoader {
    fn default() -> Self {
        Self::new(MAX_ANALYZED_PAGES)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Builds an in-memory PDF whose page `n` shows the text `Page n`.
    pub fn pdf_with_pages(page_count: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids = Vec::with_capacity(page_count);
        for page in 1..=page_count {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::string_literal(format!("Page {}", page))],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}
