//! Progress through a generated quiz, kept as an explicit state machine.
//!
//! ```text
//! AwaitingAnswer(i) --review(answer)--> Reviewed(i)
//! AwaitingAnswer(i) | Reviewed(i) --next(answer)--> AwaitingAnswer(i+1) | Completed
//! any --reset--> AwaitingAnswer(0)
//! ```
//!
//! Blank answers never change state; they produce a [`QuizWarning`].

use std::collections::HashMap;
use std::fmt;

pub const NO_FEEDBACK: &str = "No feedback";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizState {
    AwaitingAnswer(usize),
    Reviewed(usize),
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizWarning {
    EmptyAnswer { action: QuizAction },
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizAction {
    Review,
    Next,
}

impl fmt::Display for QuizWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizWarning::EmptyAnswer { action: QuizAction::Review } => {
                write!(f, "Please enter your answer before reviewing.")
            }
            QuizWarning::EmptyAnswer { action: QuizAction::Next } => {
                write!(f, "Please enter your answer before proceeding.")
            }
            QuizWarning::Finished => write!(f, "The challenge is already complete."),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizResponse {
    pub question: String,
    pub answer: String,
    pub feedback: Option<String>,
}

impl QuizResponse {
    pub fn feedback_text(&self) -> &str {
        self.feedback.as_deref().unwrap_or(NO_FEEDBACK)
    }
}

/// What the caller must send to the evaluator before calling
/// [`QuizSession::record_feedback`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRequest {
    pub index: usize,
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Debug)]
pub struct QuizSession {
    questions: Vec<String>,
    state: QuizState,
    feedback: HashMap<usize, String>,
    responses: Vec<QuizResponse>,
}

impl QuizSession {
    pub fn new(questions: Vec<String>) -> Self {
        let state = initial_state(questions.len());
        Self {
            questions,
            state,
            feedback: HashMap::new(),
            responses: Vec::new(),
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn responses(&self) -> &[QuizResponse] {
        &self.responses
    }

    pub fn is_completed(&self) -> bool {
        self.state == QuizState::Completed
    }

    /// Index and text of the question being answered, if any.
    pub fn current(&self) -> Option<(usize, &str)> {
        match self.state {
            QuizState::AwaitingAnswer(i) | QuizState::Reviewed(i) => {
                self.questions.get(i).map(|q| (i, q.as_str()))
            }
            QuizState::Completed => None,
        }
    }

    pub fn feedback_for(&self, index: usize) -> Option<&str> {
        self.feedback.get(&index).map(String::as_str)
    }

    pub fn request_review(&self, answer: &str) -> Result<ReviewRequest, QuizWarning> {
        let (index, question) = self.current().ok_or(QuizWarning::Finished)?;
        if answer.trim().is_empty() {
            return Err(QuizWarning::EmptyAnswer { action: QuizAction::Review });
        }
        Ok(ReviewRequest {
            index,
            question: question.to_string(),
            answer: answer.to_string(),
        })
    }

    /// Stores feedback for `index`. Feedback for a question that is no
    /// longer current is kept but does not change state.
    pub fn record_feedback(&mut self, index: usize, feedback: String) {
        self.feedback.insert(index, feedback);
        if let QuizState::AwaitingAnswer(i) | QuizState::Reviewed(i) = self.state {
            if i == index {
                self.state = QuizState::Reviewed(i);
            }
        }
    }

    pub fn advance(&mut self, answer: &str) -> Result<QuizState, QuizWarning> {
        let (index, question) = self.current().ok_or(QuizWarning::Finished)?;
        if answer.trim().is_empty() {
            return Err(QuizWarning::EmptyAnswer { action: QuizAction::Next });
        }
        let response = QuizResponse {
            question: question.to_string(),
            answer: answer.to_string(),
            feedback: self.feedback.get(&index).cloned(),
        };
        self.responses.push(response);

        let next = index + 1;
        self.state = if next < self.questions.len() {
            QuizState::AwaitingAnswer(next)
        } else {
            QuizState::Completed
        };
        tracing::debug!(from = index, state = ?self.state, "advanced quiz");
        Ok(self.state)
    }

    /// Clears answers and feedback and starts again from the first question.
    pub fn reset(&mut self) {
        self.feedback.clear();
        self.responses.clear();
        self.state = initial_state(self.questions.len());
    }
}

fn initial_state(total: usize) -> QuizState {
    if total == 0 {
        QuizState::Completed
    } else {
        QuizState::AwaitingAnswer(0)
    }
}
