use std::sync::Arc;

use crate::build_prompt::Message;
use crate::config::Config;
use crate::error::{RagError, Result};
use crate::generate::{ChatModel, GenerateOptions, OllamaChat};

const SUMMARY_SYSTEM_PROMPT: &str =
    "You are a summarization model. Reply with the summary only, as plain prose.";

/// Abstractive summarizer over the opening part of a document.
///
/// Build it once per process with [`Summarizer::load`] and share it; every
/// call reuses the same loaded model.
pub struct Summarizer {
    model: Arc<dyn ChatModel>,
    max_chars: usize,
    min_tokens: usize,
    max_tokens: usize,
}

impl Summarizer {
    /// Loads the configured summary model into the Ollama server.
    pub fn load(cfg: &Config) -> Result<Self> {
        let model = OllamaChat::new(cfg, &cfg.summary_model)?;
        model.warm_up()?;
        Ok(Self::new(Arc::new(model), cfg))
    }

    pub fn new(model: Arc<dyn ChatModel>, cfg: &Config) -> Self {
        Self {
            model,
            max_chars: cfg.summary_max_chars,
            min_tokens: cfg.summary_min_tokens,
            max_tokens: cfg.summary_max_tokens,
        }
    }

    /// Summarizes the first `max_chars` characters of `text`.
    ///
    /// The cut is on raw characters, so the last sentence of the snippet may
    /// be incomplete. Decoding is greedy and capped at `max_tokens`.
    pub fn summarize_text(&self, text: &str) -> Result<String> {
        let snippet: String = text.chars().take(self.max_chars).collect();
        if snippet.trim().is_empty() {
            return Err(RagError::EmptyDocument("nothing to summarize".to_string()));
        }

        let (min_words, max_words) = word_budget(self.min_tokens, self.max_tokens);
        let prompt = format!(
            "Summarize the following text in {} to {} words. \
The summary must stay between {} and {} tokens.\n\nText:\n{}",
            min_words, max_words, self.min_tokens, self.max_tokens, snippet
        );
        let messages = vec![Message::system(SUMMARY_SYSTEM_PROMPT), Message::user(prompt)];
        let options = GenerateOptions::deterministic().with_max_tokens(self.max_tokens);

        let summary = self.model.chat(&messages, &options)?;
        let summary = summary.trim().to_string();
        let words = summary.split_whitespace().count();
        if words < min_words {
            tracing::warn!(words, min_words, "summary is shorter than requested");
        }
        tracing::info!(input_chars = snippet.chars().count(), summary_words = words, "summarized document");
        Ok(summary)
    }
}

/// Word counts that fit the token limits, at roughly four tokens per three words.
pub(crate) fn word_budget(min_tokens: usize, max_tokens: usize) -> (usize, usize) {
    let max_words = (max_tokens * 3 / 4).max(1);
    let min_words = (min_tokens * 3 / 4).min(max_words);
    (min_words, max_words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_budget_stays_under_the_token_cap() {
        assert_eq!(word_budget(50, 130), (37, 97));
        assert_eq!(word_budget(200, 100), (75, 75));
        assert_eq!(word_budget(0, 1), (0, 1));
    }
}
