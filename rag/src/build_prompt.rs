use crate::retrieve_chunks::Hit;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

pub fn build_prompt_with_context(
    system_prompt: &str,
    question: &str,
    hits: &[Hit],
) -> (Vec<Message>, String) {
    let context = format_context_from_hits(hits);

    let user_content = format!("{}\n\nQuestion: {}\nHelpful Answer:", context, question);

    let messages = vec![Message::system(system_prompt), Message::user(user_content)];

    (messages, context)
}

/// Labels each retrieved chunk with its page so the model can cite it.
pub fn format_context_from_hits(hits: &[Hit]) -> String {
    let mut context_lines = Vec::new();
    for (i, hit) in hits.iter().enumerate() {
        context_lines.push(format!(
            "[{}] page {} (chunk {})\n{}",
            i + 1,
            hit.chunk.page_number,
            hit.chunk.index,
            hit.chunk.text
        ));
    }

    if context_lines.is_empty() {
        "(no context found)".to_string()
    } else {
        context_lines.join("\n\n")
    }
}
