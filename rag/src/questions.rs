use crate::error::Result;
use crate::qa_chain::QaChain;

pub const DEFAULT_QUESTION_COUNT: usize = 3;
pub const DEFAULT_SAMPLE_CHARS: usize = 3000;

const UNPARSED_PLACEHOLDER: &str = "The document could not be parsed.";

/// Generates up to `DEFAULT_QUESTION_COUNT` comprehension questions from `doc_text`.
pub fn generate_questions(doc_text: &str, chain: &QaChain) -> Result<Vec<String>> {
    generate_questions_with(doc_text, chain, DEFAULT_SAMPLE_CHARS, DEFAULT_QUESTION_COUNT)
}

/// Only the first `sample_chars` characters of `doc_text` go into the prompt.
/// Fewer than `count` questions is a valid result.
pub fn generate_questions_with(
    doc_text: &str,
    chain: &QaChain,
    sample_chars: usize,
    count: usize,
) -> Result<Vec<String>> {
    let sample: String = doc_text.chars().take(sample_chars).collect();
    let safe_text = if sample.trim().is_empty() {
        UNPARSED_PLACEHOLDER.to_string()
    } else {
        sample
    };
    let gen_prompt = format!(
        "Based on the following document, generate {} logic-based or comprehension questions. \
Each must test reader understanding and be answerable only using the document.\n\nDocument:\n{}",
        number_word(count),
        safe_text
    );
    let raw = chain.invoke(&gen_prompt)?;
    let questions = parse_questions(&raw.result, count);
    if questions.len() < count {
        tracing::warn!(wanted = count, got = questions.len(), "model produced fewer questions than requested");
    }
    Ok(questions)
}

/// Keeps lines that contain a `?`, strips list markers from both ends, returns at most `limit`.
pub fn parse_questions(raw: &str, limit: usize) -> Vec<String> {
    raw.lines()
        .filter(|line| line.contains('?'))
        .map(strip_list_marker)
        .filter(|q| !q.is_empty())
        .take(limit)
        .collect()
}

/// Trims list markers and markdown from both ends of a line.
fn strip_list_marker(line: &str) -> String {
    line.trim_matches(is_list_noise).to_string()
}

fn is_list_noise(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_digit() || matches!(c, '-' | '•' | '*' | '.' | ')' | '#' | '·')
}

fn number_word(n: usize) -> String {
    match n {
        1 => "one".to_string(),
        2 => "two".to_string(),
        3 => "three".to_string(),
        4 => "four".to_string(),
        5 => "five".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_and_numbering() {
        assert_eq!(strip_list_marker("  **1. Why is the sky blue?**"), "Why is the sky blue?");
        assert_eq!(strip_list_marker("• What is wet?"), "What is wet?");
        assert_eq!(strip_list_marker("### 2) Who wrote it?"), "Who wrote it?");
    }

    #[test]
    fn trailing_list_noise_is_trimmed_too() {
        assert_eq!(strip_list_marker("3. What year? 1990."), "What year?");
        assert_eq!(strip_list_marker("- What happened in 1990?"), "What happened in 1990?");
    }

    #[test]
    fn number_words_match_prompt_wording() {
        assert_eq!(number_word(3), "three");
        assert_eq!(number_word(12), "12");
    }
}
