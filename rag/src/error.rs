//! Error types for the document pipeline.

use thiserror::Error;

/// Errors raised while opening a document or serving an interaction over it.
#[derive(Debug, Error)]
pub enum RagError {
    /// The input could not be parsed as a PDF.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// The PDF parsed but yielded no usable text.
    #[error("Document has no extractable text: {0}")]
    EmptyDocument(String),

    /// Transport or status failure talking to Ollama or Qdrant.
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Vector index error ({backend}): {message}")]
    Index { backend: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RagError {
    pub(crate) fn index(backend: &str, message: impl Into<String>) -> Self {
        Self::Index {
            backend: backend.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RagError>;
