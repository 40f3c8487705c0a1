use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::from_str;
use std::time::Duration;

use crate::error::{RagError, Result};

/// Blocking JSON client shared by the Ollama and Qdrant callers.
#[derive(Clone, Debug)]
pub struct Http {
    client: Client,
}

impl Http {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| RagError::Http(e.to_string()))?;
        Ok(Self { client })
    }

    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        send("GET", url, self.client.get(url))
    }

    pub fn post_json<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        send("POST", url, self.client.post(url).header(CONTENT_TYPE, "application/json").json(body))
    }

    pub fn put_json<T: DeserializeOwned, B: Serialize>(&self, url: &str, body: &B) -> Result<T> {
        send("PUT", url, self.client.put(url).header(CONTENT_TYPE, "application/json").json(body))
    }

    pub fn delete_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        send("DELETE", url, self.client.delete(url))
    }
}

fn send<T: DeserializeOwned>(method: &str, url: &str, request: RequestBuilder) -> Result<T> {
    tracing::debug!(method, url, "sending request");
    let resp = request
        .send()
        .map_err(|e| RagError::Http(format!("{} {} failed: {}", method, url, e)))?;
    let status = resp.status();
    let text = resp.text().unwrap_or_default();
    if !status.is_success() {
        return Err(RagError::Http(format!("{} {} failed: {} {}", method, url, status, text)));
    }
    from_str::<T>(&text)
        .map_err(|e| RagError::Http(format!("{} {} decode failed: {} | {}", method, url, e, text)))
}
