use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{RagError, Result};
use crate::http::Http;

/// Turns texts into fixed-dimension vectors, one per input, in input order.
pub trait Embedder: Send + Sync {
    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Serialize)]
struct EmbedLegacyRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Clone, Debug)]
pub struct OllamaEmbedder {
    http: Http,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            http: Http::new(cfg.http_timeout_secs)?,
            base_url: cfg.ollama_url.clone(),
            model: cfg.embed_model.clone(),
        })
    }

    /// Older Ollama servers only expose `/api/embeddings`, one prompt per call.
    fn embed_legacy(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            let req = EmbedLegacyRequest {
                model: &self.model,
                prompt: text,
            };
            let res = self.http.post_json::<Value, _>(&url, &req)?;
            out.extend(parse_embeddings(res)?);
        }
        Ok(out)
    }
}

impl Embedder for OllamaEmbedder {
    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let url = format!("{}/api/embed", self.base_url);
        let req = EmbedRequest {
            model: &self.model,
            input: texts,
        };
        let vectors = match self.http.post_json::<Value, _>(&url, &req) {
            Ok(res) => parse_embeddings(res)?,
            Err(err) => {
                tracing::warn!("{} failed, falling back to legacy endpoint: {}", url, err);
                self.embed_legacy(texts)?
            }
        };
        if vectors.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}

fn parse_embeddings(value: Value) -> Result<Vec<Vec<f32>>> {
    if let Some(embeddings) = value.get("embeddings") {
        return parse_embeddings_value(embeddings);
    }
    if let Some(embedding) = value.get("embedding") {
        return parse_embeddings_value(embedding);
    }
    Err(RagError::Embedding("No embeddings in response".to_string()))
}

fn parse_embeddings_value(value: &Value) -> Result<Vec<Vec<f32>>> {
    if let Some(arr) = value.as_array() {
        if arr.is_empty() {
            return Ok(vec![]);
        }
        if arr[0].is_array() {
            let mut out = Vec::new();
            for row in arr {
                out.push(parse_vec(row)?);
            }
            return Ok(out);
        }
        return Ok(vec![parse_vec(value)?]);
    }
    Err(RagError::Embedding("Invalid embeddings format".to_string()))
}

fn parse_vec(value: &Value) -> Result<Vec<f32>> {
    let arr = value
        .as_array()
        .ok_or_else(|| RagError::Embedding("Embedding is not an array".to_string()))?;
    let mut out = Vec::with_capacity(arr.len());
    for v in arr {
        let n = v
            .as_f64()
            .ok_or_else(|| RagError::Embedding("Embedding value is not a number".to_string()))?;
        out.push(n as f32);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_batched_and_single_embeddings() {
        let batched = parse_embeddings(json!({"embeddings": [[0.5, 1.0], [2.0, -1.0]]})).unwrap();
        assert_eq!(batched, vec![vec![0.5, 1.0], vec![2.0, -1.0]]);

        let legacy = parse_embeddings(json!({"embedding": [0.25, 0.75]})).unwrap();
        assert_eq!(legacy, vec![vec![0.25, 0.75]]);
    }

    #[test]
    fn rejects_malformed_embeddings() {
        assert!(parse_embeddings(json!({"model": "nomic-embed-text"})).is_err());
        assert!(parse_embeddings(json!({"embeddings": [["x"]]})).is_err());
        assert!(parse_embeddings(json!({"embeddings": "nope"})).is_err());
    }
}
