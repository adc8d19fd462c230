//! QuizMaker: an editable, ordered list of quiz questions that exports to JSON.
//!
//! [`QuestionList`] owns every question and is the only thing that mutates
//! them. The binaries (`quizmaker`, `quizio`) are thin callers of it.

pub mod libquizmaker;

pub use libquizmaker::error::{StoreError, UnknownQuestionType};
pub use libquizmaker::prompt::{confirm_delete, prompt_for_question_number, HumanInput, ScriptedInput};
pub use libquizmaker::question::{Question, QuestionPatch, QuestionType, ShapeViolation};
pub use libquizmaker::store::QuestionList;
