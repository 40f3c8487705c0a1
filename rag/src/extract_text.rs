use std::io::Read;
use std::panic;

use crate::error::{RagError, Result};

/// Reads a whole PDF from `reader` and returns the text of every page in order.
pub fn extract_text<R: Read>(mut reader: R) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    extract_text_from_bytes(&bytes)
}

/// Pages are concatenated as-is; no separator is added between them.
pub fn extract_text_from_bytes(bytes: &[u8]) -> Result<String> {
    let result = catch_parser_panic(|| pdf_extract::extract_text_from_mem(bytes))?;
    let text = result.map_err(|e| RagError::Pdf(format!("Failed to extract text from PDF: {}", e)))?;
    tracing::debug!(bytes = bytes.len(), chars = text.chars().count(), "extracted PDF text");
    Ok(text)
}

/// pdf-extract panics on some malformed inputs instead of returning an error.
/// The panic message goes to the log rather than stderr, which belongs to the
/// terminal UI, and the previous hook is restored afterwards.
fn catch_parser_panic<T>(parse: impl FnOnce() -> T) -> Result<T> {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|info| tracing::warn!("PDF parser panicked: {}", info)));
    let result = panic::catch_unwind(panic::AssertUnwindSafe(parse));
    panic::set_hook(previous);
    result.map_err(|_| RagError::Pdf("PDF parser aborted on malformed input".to_string()))
}
