mod build_prompt;
mod chunk_text;
mod config;
mod embed_chunks;
mod embed_query;
mod error;
mod evaluate;
mod extract_text;
mod generate;
mod http;
mod load_pages;
mod qa_chain;
mod questions;
mod quiz;
mod retrieve_chunks;
mod session;
mod store_qdrant;
mod summarize;
mod vector_index;

use std::path::Path;

pub use build_prompt::{build_prompt_with_context, format_context_from_hits, Message};
pub use chunk_text::{chunk_pages, split_text, Chunk};
pub use config::{Config, IndexBackend};
pub use embed_chunks::{Embedder, OllamaEmbedder};
pub use embed_query::embed_query;
pub use error::{RagError, Result};
pub use evaluate::{evaluate_and_store_response, evaluate_user_answer, NO_ANSWER_FEEDBACK};
pub use extract_text::{extract_text, extract_text_from_bytes};
pub use generate::{ChatModel, GenerateOptions, OllamaChat};
pub use load_pages::{load_pages, load_pages_from_bytes, Page};
pub use qa_chain::{ask_question_with_justification, ChainResponse, QaChain, Source};
pub use questions::{generate_questions, generate_questions_with, parse_questions};
pub use quiz::{QuizAction, QuizResponse, QuizSession, QuizState, QuizWarning, ReviewRequest, NO_FEEDBACK};
pub use retrieve_chunks::{retrieve_top, Hit};
pub use session::DocumentSession;
pub use store_qdrant::QdrantIndex;
pub use summarize::Summarizer;
pub use vector_index::{build_index, cosine_similarity, InMemoryIndex, VectorIndex};

/// Loads the PDF at `path` and splits it into page-tagged chunks.
pub fn load_chunks(cfg: &Config, path: &Path) -> Result<Vec<Chunk>> {
    let pages = load_pages(path)?;
    chunks_or_empty(cfg, &pages, &path.display().to_string())
}

pub fn load_chunks_from_bytes(cfg: &Config, bytes: &[u8]) -> Result<Vec<Chunk>> {
    let pages = load_pages_from_bytes(bytes)?;
    chunks_or_empty(cfg, &pages, "in-memory PDF")
}

fn chunks_or_empty(cfg: &Config, pages: &[Page], name: &str) -> Result<Vec<Chunk>> {
    let chunks = chunk_pages(pages, cfg);
    if chunks.is_empty() {
        return Err(RagError::EmptyDocument(name.to_string()));
    }
    tracing::info!(pages = pages.len(), chunks = chunks.len(), "chunked {}", name);
    Ok(chunks)
}
