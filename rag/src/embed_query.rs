use crate::embed_chunks::Embedder;
use crate::error::{RagError, Result};

pub fn embed_query(embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>> {
    let vecs = embedder.embed_texts(&[text.to_string()])?;
    match vecs.into_iter().next() {
        Some(vec) if !vec.is_empty() => Ok(vec),
        _ => Err(RagError::Embedding("empty embedding for query".to_string())),
    }
}
