use serde::{Deserialize, Serialize};

use crate::build_prompt::Message;
use crate::config::Config;
use crate::error::{RagError, Result};
use crate::http::Http;

/// Decoding knobs forwarded to the model. `temperature: 0.0` means greedy decoding.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl GenerateOptions {
    pub fn deterministic() -> Self {
        Self {
            temperature: 0.0,
            num_predict: None,
            seed: Some(0),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.num_predict = Some(max_tokens);
        self
    }
}

/// A chat-style language model. Calls are synchronous and not retried.
pub trait ChatModel: Send + Sync {
    fn chat(&self, messages: &[Message], options: &GenerateOptions) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    options: &'a GenerateOptions,
    keep_alive: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct LoadRequest<'a> {
    model: &'a str,
    keep_alive: &'a str,
}

#[derive(Deserialize)]
struct LoadResponse {
    #[serde(default)]
    done: bool,
}

#[derive(Clone, Debug)]
pub struct OllamaChat {
    http: Http,
    base_url: String,
    model: String,
    keep_alive: String,
}

impl OllamaChat {
    pub fn new(cfg: &Config, model: &str) -> Result<Self> {
        Ok(Self {
            http: Http::new(cfg.http_timeout_secs)?,
            base_url: cfg.ollama_url.clone(),
            model: model.to_string(),
            keep_alive: cfg.keep_alive.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Loads the model into server memory. Ollama treats a generate call
    /// without a prompt as a load request.
    pub fn warm_up(&self) -> Result<()> {
        let url = format!("{}/api/generate", self.base_url);
        let req = LoadRequest {
            model: &self.model,
            keep_alive: &self.keep_alive,
        };
        let res = self.http.post_json::<LoadResponse, _>(&url, &req)?;
        if !res.done {
            return Err(RagError::Model(format!("model '{}' did not finish loading", self.model)));
        }
        tracing::info!(model = %self.model, "model loaded");
        Ok(())
    }
}

impl ChatModel for OllamaChat {
    fn chat(&self, messages: &[Message], options: &GenerateOptions) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let req = ChatRequest {
            model: &self.model,
            messages,
            stream: false,
            options,
            keep_alive: &self.keep_alive,
        };
        let res = self.http.post_json::<ChatResponse, _>(&url, &req)?;
        let content = res.message.and_then(|m| m.content).unwrap_or_default();
        if content.trim().is_empty() {
            return Err(RagError::Model(format!("model '{}' returned an empty response", self.model)));
        }
        Ok(content)
    }
}
