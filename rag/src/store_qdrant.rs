use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chunk_text::Chunk;
use crate::config::{sanitize_collection_name, Config};
use crate::error::{RagError, Result};
use crate::http::Http;
use crate::retrieve_chunks::Hit;
use crate::vector_index::{check_shapes, VectorIndex};

#[derive(Serialize)]
struct CreateCollection<'a> {
    vectors: VectorParams<'a>,
}

#[derive(Serialize)]
struct VectorParams<'a> {
    size: usize,
    distance: &'a str,
}

#[derive(Serialize, Deserialize, Clone)]
struct PointPayload {
    page_number: u32,
    chunk_index: usize,
    text: String,
}

#[derive(Serialize)]
struct Point {
    id: u64,
    vector: Vec<f32>,
    payload: PointPayload,
}

#[derive(Serialize)]
struct UpsertPoints<'a> {
    points: &'a [Point],
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct QueryResponse {
    result: Option<QueryResult>,
}

#[derive(Deserialize)]
struct QueryResult {
    points: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    score: f32,
    payload: Option<PointPayload>,
}

/// A Qdrant collection holding the chunks of one session's document.
pub struct QdrantIndex {
    http: Http,
    base_url: String,
    collection: String,
    len: usize,
}

impl QdrantIndex {
    /// Creates a fresh collection for this session and uploads every chunk.
    pub fn build(cfg: &Config, chunks: &[Chunk], vectors: Vec<Vec<f32>>, source_name: &str) -> Result<Self> {
        check_shapes("qdrant", chunks, &vectors)?;
        let index = Self {
            http: Http::new(cfg.http_timeout_secs)?,
            base_url: cfg.qdrant_url.clone(),
            collection: session_collection_name(source_name),
            len: chunks.len(),
        };

        let vector_size = vectors.first().map(Vec::len).unwrap_or(0);
        index.recreate_collection(vector_size, &cfg.distance)?;

        let points: Vec<Point> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| Point {
                id: chunk.index as u64,
                vector,
                payload: PointPayload {
                    page_number: chunk.page_number,
                    chunk_index: chunk.index,
                    text: chunk.text.clone(),
                },
            })
            .collect();
        index.store_points(&points)?;
        tracing::info!(collection = %index.collection, points = points.len(), "stored chunks in Qdrant");
        Ok(index)
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    fn recreate_collection(&self, vector_size: usize, distance: &str) -> Result<()> {
        let url = self.collection_url();
        if self.http.get_json::<Value>(&url).is_ok() {
            self.http.delete_json::<Value>(&url)?;
        }
        let body = CreateCollection {
            vectors: VectorParams {
                size: vector_size,
                distance,
            },
        };
        self.http.put_json::<Value, _>(&url, &body)?;
        Ok(())
    }

    fn store_points(&self, points: &[Point]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }
        let url = format!("{}/points?wait=true", self.collection_url());
        let body = UpsertPoints { points };
        self.http.put_json::<Value, _>(&url, &body)?;
        Ok(())
    }
}

impl VectorIndex for QdrantIndex {
    fn backend(&self) -> &'static str {
        "qdrant"
    }

    fn len(&self) -> usize {
        self.len
    }

    fn search(&self, vector: &[f32], k: usize) -> Result<Vec<Hit>> {
        if vector.is_empty() || self.len == 0 {
            return Ok(vec![]);
        }
        let url = format!("{}/points/query", self.collection_url());
        let req = QueryRequest {
            query: vector,
            limit: k,
            with_payload: true,
        };
        let res = self.http.post_json::<QueryResponse, _>(&url, &req)?;
        let points = res.result.map(|r| r.points).unwrap_or_default();
        points
            .into_iter()
            .map(|p| {
                let payload = p
                    .payload
                    .ok_or_else(|| RagError::index("qdrant", "point without payload"))?;
                Ok(Hit {
                    chunk: Chunk {
                        index: payload.chunk_index,
                        page_number: payload.page_number,
                        text: payload.text,
                    },
                    score: p.score,
                })
            })
            .collect()
    }

    fn discard(&self) -> Result<()> {
        self.http.delete_json::<Value>(&self.collection_url())?;
        tracing::info!(collection = %self.collection, "dropped session collection");
        Ok(())
    }
}

fn session_collection_name(source_name: &str) -> String {
    format!("{}_{}_chunks", sanitize_collection_name(source_name), std::process::id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_name_is_scoped_to_process() {
        let name = session_collection_name("annual report.pdf");
        assert!(name.starts_with("annual_report_pdf_"));
        assert!(name.ends_with(&format!("_{}_chunks", std::process::id())));
    }
}
