use crate::error::Result;
use crate::qa_chain::{ChainResponse, QaChain};
use crate::quiz::QuizResponse;

pub const NO_ANSWER_FEEDBACK: &str = "No answer provided.";

/// Grades `answer` against the document. The feedback is free text and is
/// returned as the model wrote it.
pub fn evaluate_user_answer(question: &str, answer: &str, chain: &QaChain) -> Result<ChainResponse> {
    let eval_prompt = format!(
        "Evaluate the user's answer only using the uploaded document content. \
Provide specific feedback and cite paragraph or page if possible.\n\n\
Question: {}\nUser's Answer: {}",
        question, answer
    );
    chain.invoke(&eval_prompt)
}

/// Evaluates and records the pair. A blank answer is not sent to the model.
pub fn evaluate_and_store_response(
    question: &str,
    answer: &str,
    chain: &QaChain,
    responses: &mut Vec<QuizResponse>,
) -> Result<String> {
    if answer.trim().is_empty() {
        return Ok(NO_ANSWER_FEEDBACK.to_string());
    }
    let feedback = evaluate_user_answer(question, answer, chain)?;
    responses.push(QuizResponse {
        question: question.to_string(),
        answer: answer.to_string(),
        feedback: Some(feedback.result.clone()),
    });
    Ok(feedback.result)
}
