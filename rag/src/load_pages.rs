use std::path::Path;

use lopdf::Document;

use crate::error::{RagError, Result};

/// Text of a single PDF page. `page_number` starts at 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub page_number: u32,
    pub text: String,
}

pub fn load_pages(path: &Path) -> Result<Vec<Page>> {
    let doc = Document::load(path)
        .map_err(|e| RagError::Pdf(format!("Failed to load {}: {}", path.display(), e)))?;
    pages_from_document(&doc)
}

pub fn load_pages_from_bytes(bytes: &[u8]) -> Result<Vec<Page>> {
    let doc = Document::load_mem(bytes).map_err(|e| RagError::Pdf(format!("Failed to load PDF: {}", e)))?;
    pages_from_document(&doc)
}

fn pages_from_document(doc: &Document) -> Result<Vec<Page>> {
    let mut pages = Vec::new();
    // get_pages is keyed by page number, so iteration is already in document order.
    for (position, page_number) in doc.get_pages().keys().enumerate() {
        let text = match doc.extract_text(&[*page_number]) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("Could not extract text for page {}: {}", page_number, e);
                String::new()
            }
        };
        pages.push(Page {
            page_number: position as u32 + 1,
            text,
        });
    }
    if pages.is_empty() {
        return Err(RagError::Pdf("PDF has no pages".to_string()));
    }
    Ok(pages)
}
