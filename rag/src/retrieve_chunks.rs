use crate::chunk_text::Chunk;
use crate::embed_chunks::Embedder;
use crate::embed_query::embed_query;
use crate::error::Result;
use crate::vector_index::VectorIndex;

#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    pub chunk: Chunk,
    pub score: f32,
}

/// Embeds `query` and returns the `k` most similar chunks, best first.
pub fn retrieve_top(
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    query: &str,
    k: usize,
) -> Result<Vec<Hit>> {
    let vector = embed_query(embedder, query)?;
    let hits = index.search(&vector, k)?;
    tracing::debug!(
        backend = index.backend(),
        k,
        pages = ?hits.iter().map(|h| h.chunk.page_number).collect::<Vec<_>>(),
        "retrieved chunks"
    );
    Ok(hits)
}
