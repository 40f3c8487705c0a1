use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::chunk_text::Chunk;
use crate::config::Config;
use crate::embed_chunks::Embedder;
use crate::error::{RagError, Result};
use crate::evaluate::evaluate_user_answer;
use crate::extract_text::extract_text_from_bytes;
use crate::generate::ChatModel;
use crate::load_chunks_from_bytes;
use crate::qa_chain::{ask_question_with_justification, ChainResponse, QaChain};
use crate::questions::generate_questions_with;
use crate::summarize::Summarizer;

/// Everything derived from one opened PDF. Built once; read-only afterwards.
pub struct DocumentSession {
    pub path: PathBuf,
    pub summary: String,
    pub chunks: Vec<Chunk>,
    pub chain: QaChain,
    quiz_sample_chars: usize,
    quiz_question_count: usize,
}

impl DocumentSession {
    pub fn open(
        cfg: &Config,
        summarizer: &Summarizer,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn ChatModel>,
        path: &Path,
    ) -> Result<Self> {
        tracing::info!(path = %path.display(), "opening document");
        let bytes = fs::read(path)?;
        let full_text = extract_text_from_bytes(&bytes)?;
        let summary = summarizer.summarize_text(&full_text)?;

        let chunks = load_chunks_from_bytes(cfg, &bytes)?;
        let source_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("document");
        let chain = QaChain::build(cfg, &chunks, embedder, llm, source_name)?;
        tracing::info!(chunks = chunks.len(), "document ready");

        Ok(Self::from_parts(cfg, path, summary, chunks, chain))
    }

    /// Assembles a session from a summary and a chain that were built elsewhere.
    pub fn from_parts(cfg: &Config, path: &Path, summary: String, chunks: Vec<Chunk>, chain: QaChain) -> Self {
        Self {
            path: path.to_path_buf(),
            summary,
            chunks,
            chain,
            quiz_sample_chars: cfg.quiz_sample_chars,
            quiz_question_count: cfg.quiz_question_count,
        }
    }

    pub fn ask(&self, question: &str) -> Result<ChainResponse> {
        ask_question_with_justification(question, &self.chain)
    }

    /// Questions are seeded from the first chunk only.
    pub fn generate_questions(&self) -> Result<Vec<String>> {
        let first = self
            .chunks
            .first()
            .ok_or_else(|| RagError::EmptyDocument(self.path.display().to_string()))?;
        generate_questions_with(&first.text, &self.chain, self.quiz_sample_chars, self.quiz_question_count)
    }

    pub fn evaluate(&self, question: &str, answer: &str) -> Result<ChainResponse> {
        evaluate_user_answer(question, answer, &self.chain)
    }

    pub fn close(self) -> Result<()> {
        self.chain.discard()
    }
}
