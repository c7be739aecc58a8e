//! Text Extractor — turns uploaded PDF bytes into plain text, page by page.

use bytes::Bytes;
use thiserror::Error;

const PDF_EXTENSION: &str = ".pdf";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Could not extract text from PDF. It might be an image-only PDF or empty.")]
    NoText,

    #[error("Failed to read PDF: {0}")]
    Unreadable(String),
}

/// True when the file name ends in `.pdf`, ignoring case.
pub fn is_pdf_file_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(PDF_EXTENSION)
}

/// Extracts the text of every page, in page order, each followed by a newline.
///
/// Whitespace-only output is reported as `NoText` so callers never see an empty prompt.
pub fn extract_text(data: &[u8]) -> Result<String, ExtractError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(data)
        .map_err(|e| ExtractError::Unreadable(e.to_string()))?;

    let text = join_pages(pages);
    if text.trim().is_empty() {
        return Err(ExtractError::NoText);
    }
    Ok(text)
}

/// Runs `extract_text` on the blocking pool.
///
/// The PDF library can panic on malformed input; the panic surfaces here as
/// `Unreadable` and stays confined to this one file.
pub async fn extract_text_blocking(data: Bytes) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || extract_text(&data))
        .await
        .map_err(|e| ExtractError::Unreadable(e.to_string()))?
}

fn join_pages(pages: Vec<String>) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    text
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds a small PDF with one page per entry; `None` produces a blank page.
    pub fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
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

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let operations = match page {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

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
