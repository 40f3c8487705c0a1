//! Similarity search over the chunks of one document.
//!
//! An index is built once per opened document and is read-only afterwards.
//! [`InMemoryIndex`] is the default; [`crate::QdrantIndex`] keeps the same
//! contract on a Qdrant collection scoped to the session.

use std::cmp::Ordering;

use crate::chunk_text::Chunk;
use crate::config::{Config, IndexBackend};
use crate::error::{RagError, Result};
use crate::retrieve_chunks::Hit;
use crate::store_qdrant::QdrantIndex;

pub trait VectorIndex: Send + Sync {
    fn backend(&self) -> &'static str;

    /// Number of indexed chunks.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns at most `k` hits ordered by descending similarity.
    fn search(&self, vector: &[f32], k: usize) -> Result<Vec<Hit>>;

    /// Releases whatever the index holds outside the process.
    fn discard(&self) -> Result<()> {
        Ok(())
    }
}

/// Exhaustive cosine-similarity scan over chunk vectors held in memory.
#[derive(Debug)]
pub struct InMemoryIndex {
    entries: Vec<(Chunk, Vec<f32>)>,
    dimensions: usize,
}

impl InMemoryIndex {
    pub fn build(chunks: &[Chunk], vectors: Vec<Vec<f32>>) -> Result<Self> {
        check_shapes("memory", chunks, &vectors)?;
        let dimensions = vectors.first().map(Vec::len).unwrap_or(0);
        let entries = chunks.iter().cloned().zip(vectors).collect();
        Ok(Self { entries, dimensions })
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

impl VectorIndex for InMemoryIndex {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn search(&self, vector: &[f32], k: usize) -> Result<Vec<Hit>> {
        if vector.len() != self.dimensions && !self.entries.is_empty() {
            return Err(RagError::index(
                "memory",
                format!("query has {} dimensions, index has {}", vector.len(), self.dimensions),
            ));
        }

        let mut scored: Vec<Hit> = self
            .entries
            .iter()
            .map(|(chunk, embedding)| Hit {
                chunk: chunk.clone(),
                score: cosine_similarity(embedding, vector),
            })
            .collect();

        // Stable sort: equal scores stay in document order, so repeated queries agree.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

pub(crate) fn check_shapes(backend: &str, chunks: &[Chunk], vectors: &[Vec<f32>]) -> Result<()> {
    if chunks.len() != vectors.len() {
        return Err(RagError::index(
            backend,
            format!("{} chunks but {} vectors", chunks.len(), vectors.len()),
        ));
    }
    if let Some(first) = vectors.first() {
        if first.is_empty() {
            return Err(RagError::index(backend, "empty embedding vector"));
        }
        if let Some(bad) = vectors.iter().position(|v| v.len() != first.len()) {
            return Err(RagError::index(
                backend,
                format!("vector {} has {} dimensions, expected {}", bad, vectors[bad].len(), first.len()),
            ));
        }
    }
    Ok(())
}

/// Builds the index selected by `cfg.index_backend`.
pub fn build_index(
    cfg: &Config,
    chunks: &[Chunk],
    vectors: Vec<Vec<f32>>,
    source_name: &str,
) -> Result<Box<dyn VectorIndex>> {
    let index: Box<dyn VectorIndex> = match cfg.index_backend {
        IndexBackend::Memory => Box::new(InMemoryIndex::build(chunks, vectors)?),
        IndexBackend::Qdrant => Box::new(QdrantIndex::build(cfg, chunks, vectors, source_name)?),
    };
    tracing::info!(backend = index.backend(), chunks = index.len(), "built retrieval index");
    Ok(index)
}
