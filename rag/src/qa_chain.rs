use std::sync::Arc;

use serde::Serialize;

use crate::build_prompt::build_prompt_with_context;
use crate::chunk_text::Chunk;
use crate::config::Config;
use crate::embed_chunks::Embedder;
use crate::error::{RagError, Result};
use crate::generate::{ChatModel, GenerateOptions};
use crate::retrieve_chunks::{retrieve_top, Hit};
use crate::vector_index::{build_index, VectorIndex};

const JUSTIFICATION_INSTRUCTION: &str = "Answer the following question using only the provided document content. \
Include a brief justification at the end like 'This is supported by paragraph 2 on page X.'";

/// Where a piece of retrieved context came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Source {
    pub page_number: u32,
    pub chunk_index: usize,
    pub score: f32,
}

/// Result of one retrieval + model call. `query` is always the text the
/// caller asked about; `result` is the model's raw reply.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChainResponse {
    pub query: String,
    pub result: String,
    pub sources: Vec<Source>,
}

/// Retrieval over one document's index composed with a chat model.
pub struct QaChain {
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn ChatModel>,
    index: Box<dyn VectorIndex>,
    system_prompt: String,
    top_k: usize,
    options: GenerateOptions,
}

impl QaChain {
    pub fn new(
        cfg: &Config,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn ChatModel>,
        index: Box<dyn VectorIndex>,
    ) -> Self {
        Self {
            embedder,
            llm,
            index,
            system_prompt: cfg.system_prompt.clone(),
            top_k: cfg.top_k,
            options: GenerateOptions::deterministic(),
        }
    }

    /// Embeds every chunk and indexes it on the configured backend.
    pub fn build(
        cfg: &Config,
        chunks: &[Chunk],
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn ChatModel>,
        source_name: &str,
    ) -> Result<Self> {
        let mut vectors = Vec::with_capacity(chunks.len());
        for (batch_no, batch) in chunks.chunks(cfg.embed_batch_size.max(1)).enumerate() {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let batch_vectors = embedder.embed_texts(&texts)?;
            if batch_vectors.len() != texts.len() {
                return Err(RagError::Embedding(format!(
                    "batch {} returned {} vectors for {} chunks",
                    batch_no,
                    batch_vectors.len(),
                    texts.len()
                )));
            }
            vectors.extend(batch_vectors);
            tracing::debug!(batch = batch_no, embedded = vectors.len(), total = chunks.len(), "embedded batch");
        }
        let index = build_index(cfg, chunks, vectors, source_name)?;
        Ok(Self::new(cfg, embedder, llm, index))
    }

    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    pub fn retrieve(&self, query: &str) -> Result<Vec<Hit>> {
        retrieve_top(self.embedder.as_ref(), self.index.as_ref(), query, self.top_k)
    }

    /// Retrieves context for `prompt` and asks the model with it.
    pub fn invoke(&self, prompt: &str) -> Result<ChainResponse> {
        let hits = self.retrieve(prompt)?;
        let (messages, _context) = build_prompt_with_context(&self.system_prompt, prompt, &hits);
        let result = self.llm.chat(&messages, &self.options)?;
        Ok(ChainResponse {
            query: prompt.to_string(),
            result,
            sources: hits
                .iter()
                .map(|h| Source {
                    page_number: h.chunk.page_number,
                    chunk_index: h.chunk.index,
                    score: h.score,
                })
                .collect(),
        })
    }

    /// Drops any state the index keeps outside this process.
    pub fn discard(&self) -> Result<()> {
        self.index.discard()
    }
}

/// Asks `question` with an instruction to justify the answer by page.
/// The returned `query` is the user's question, not the full prompt.
pub fn ask_question_with_justification(question: &str, chain: &QaChain) -> Result<ChainResponse> {
    let full_prompt = format!("{}\n\nQuestion: {}", JUSTIFICATION_INSTRUCTION, question);
    let mut response = chain.invoke(&full_prompt)?;
    response.query = question.to_string();
    tracing::info!(sources = response.sources.len(), "answered question");
    Ok(response)
}
