use thiserror::Error;

/// Failures reported by [`crate::QuestionList`]. Whenever one of these is
/// returned the list is exactly as it was before the call.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("there is no question {} (the quiz has {len})", .index + 1)]
    QuestionIndex { index: usize, len: usize },
    #[error("question {} has no answer choice {} (it has {len})", .question + 1, .choice + 1)]
    ChoiceIndex {
        question: usize,
        choice: usize,
        len: usize,
    },
    #[error("cannot move to question number {target}, it must be within 1-{len}")]
    MoveTarget { target: usize, len: usize },
    #[error("malformed quiz JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown question type {0:?}")]
pub struct UnknownQuestionType(pub String);
