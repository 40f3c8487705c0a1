use std::env;
use std::str::FromStr;

const DEFAULT_SYSTEM_PROMPT: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexBackend {
    Memory,
    Qdrant,
}

impl FromStr for IndexBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" => Ok(Self::Memory),
            "qdrant" => Ok(Self::Qdrant),
            other => Err(format!("unknown index backend '{}'", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub ollama_url: String,
    pub embed_model: String,
    pub chat_model: String,
    pub summary_model: String,
    pub keep_alive: String,
    pub embed_batch_size: usize,
    pub index_backend: IndexBackend,
    pub qdrant_url: String,
    pub distance: String,
    pub top_k: usize,
    pub system_prompt: String,
    pub summary_max_chars: usize,
    pub summary_min_tokens: usize,
    pub summary_max_tokens: usize,
    pub quiz_sample_chars: usize,
    pub quiz_question_count: usize,
    pub http_timeout_secs: u64,
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
            ollama_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            chat_model: "llama3.1:latest".to_string(),
            summary_model: "llama3.1:latest".to_string(),
            keep_alive: "30m".to_string(),
            embed_batch_size: 32,
            index_backend: IndexBackend::Memory,
            qdrant_url: "http://localhost:6333".to_string(),
            distance: "Cosine".to_string(),
            top_k: 4,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            summary_max_chars: 2000,
            summary_min_tokens: 50,
            summary_max_tokens: 130,
            quiz_sample_chars: 3000,
            quiz_question_count: 3,
            http_timeout_secs: 120,
            log_file: "pdf-companion.log".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        // Load .env if present so model and index settings work without manual `source .env`.
        let _ = dotenvy::dotenv();
        let defaults = Self::default();
        let chat_model = env::var("OLLAMA_CHAT_MODEL").unwrap_or(defaults.chat_model);
        Self {
            chunk_size: parse_or("RAG_CHUNK_SIZE", defaults.chunk_size),
            chunk_overlap: parse_or("RAG_CHUNK_OVERLAP", defaults.chunk_overlap),
            ollama_url: env::var("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            embed_model: env::var("OLLAMA_EMBED_MODEL").unwrap_or(defaults.embed_model),
            summary_model: env::var("OLLAMA_SUMMARY_MODEL").unwrap_or_else(|_| chat_model.clone()),
            chat_model,
            keep_alive: env::var("OLLAMA_KEEP_ALIVE").unwrap_or(defaults.keep_alive),
            embed_batch_size: parse_or("RAG_EMBED_BATCH_SIZE", defaults.embed_batch_size).max(1),
            index_backend: parse_or("RAG_INDEX_BACKEND", defaults.index_backend),
            qdrant_url: env::var("QDRANT_URL").unwrap_or(defaults.qdrant_url),
            distance: env::var("QDRANT_DISTANCE").unwrap_or(defaults.distance),
            top_k: parse_or("RAG_TOP_K", defaults.top_k).max(1),
            system_prompt: env::var("RAG_SYSTEM_PROMPT").unwrap_or(defaults.system_prompt),
            summary_max_chars: parse_or("SUMMARY_MAX_CHARS", defaults.summary_max_chars),
            summary_min_tokens: parse_or("SUMMARY_MIN_TOKENS", defaults.summary_min_tokens),
            summary_max_tokens: parse_or("SUMMARY_MAX_TOKENS", defaults.summary_max_tokens),
            quiz_sample_chars: parse_or("QUIZ_SAMPLE_CHARS", defaults.quiz_sample_chars),
            quiz_question_count: parse_or("QUIZ_QUESTION_COUNT", defaults.quiz_question_count),
            http_timeout_secs: parse_or("RAG_HTTP_TIMEOUT_SECS", defaults.http_timeout_secs),
            log_file: env::var("COMPANION_LOG_FILE").unwrap_or(defaults.log_file),
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Turns a document name into something usable as a Qdrant collection name.
pub fn sanitize_collection_name(name: &str) -> String {
    let mut out = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            out.push(c);
        } else if c.is_ascii_whitespace() || c == '.' {
            out.push('_');
        }
    }
    if out.is_empty() { "default".to_string() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_document_pipeline() {
        let cfg = Config::default();
        assert_eq!(cfg.chunk_size, 1000);
        assert_eq!(cfg.chunk_overlap, 100);
        assert_eq!(cfg.top_k, 4);
        assert_eq!(cfg.summary_max_chars, 2000);
        assert_eq!((cfg.summary_min_tokens, cfg.summary_max_tokens), (50, 130));
        assert_eq!(cfg.index_backend, IndexBackend::Memory);
    }

    #[test]
    fn parses_index_backend_names() {
        assert_eq!("Qdrant".parse::<IndexBackend>(), Ok(IndexBackend::Qdrant));
        assert_eq!(" in-memory ".parse::<IndexBackend>(), Ok(IndexBackend::Memory));
        assert!("faiss".parse::<IndexBackend>().is_err());
    }

    #[test]
    fn sanitizes_collection_names() {
        assert_eq!(sanitize_collection_name("My Report.v2"), "My_Report_v2");
        assert_eq!(sanitize_collection_name("ü/§"), "default");
    }
}
