use crate::libquizmaker::error::UnknownQuestionType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const TRUE_FALSE_CHOICES: [&str; 2] = ["True", "False"];
const YES_NO_CHOICES: [&str; 2] = ["Yes", "No"];

/// What kind of answer a question expects. `Default` is the placeholder a
/// freshly added question carries until the author picks a real type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[default]
    Default,
    FreeResponse,
    MultipleChoice,
    CheckBox,
    TrueFalse,
    YesNo,
}

impl QuestionType {
    pub const ALL: [QuestionType; 6] = [
        QuestionType::Default,
        QuestionType::FreeResponse,
        QuestionType::MultipleChoice,
        QuestionType::CheckBox,
        QuestionType::TrueFalse,
        QuestionType::YesNo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::Default => "default",
            QuestionType::FreeResponse => "free-response",
            QuestionType::MultipleChoice => "multiple-choice",
            QuestionType::CheckBox => "check-box",
            QuestionType::TrueFalse => "true-false",
            QuestionType::YesNo => "yes-no",
        }
    }

    /// Human readable name, as shown in the editor.
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::Default => "Type of question",
            QuestionType::FreeResponse => "Free Response",
            QuestionType::MultipleChoice => "Multiple Choice",
            QuestionType::CheckBox => "Check Box",
            QuestionType::TrueFalse => "True or False",
            QuestionType::YesNo => "Yes or No",
        }
    }

    /// Whether questions of this type carry answer choices at all.
    pub fn has_choices(self) -> bool {
        !matches!(self, QuestionType::Default | QuestionType::FreeResponse)
    }

    /// The author may add and remove choices only for these types.
    pub fn has_editable_choices(self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::CheckBox)
    }

    pub fn fixed_choices(self) -> Option<[&'static str; 2]> {
        match self {
            QuestionType::TrueFalse => Some(TRUE_FALSE_CHOICES),
            QuestionType::YesNo => Some(YES_NO_CHOICES),
            _ => None,
        }
    }

    pub fn is_multi_select(self) -> bool {
        self == QuestionType::CheckBox
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = UnknownQuestionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestionType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownQuestionType(s.to_owned()))
    }
}

/// One quiz item. Field names serialize in camelCase, matching the exported
/// JSON format (`questionText`, `questionType`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Question {
    pub question_text: String,
    pub question_type: QuestionType,
    pub answer_choices: Vec<String>,
    pub correct_answers_indexes: Vec<usize>,
}

/// A partial update: only the `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPatch {
    pub question_text: Option<String>,
    pub question_type: Option<QuestionType>,
    pub answer_choices: Option<Vec<String>>,
    pub correct_answers_indexes: Option<Vec<usize>>,
}

impl QuestionPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            question_text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn choices(choices: Vec<String>) -> Self {
        Self {
            answer_choices: Some(choices),
            ..Self::default()
        }
    }

    pub fn correct(indexes: Vec<usize>) -> Self {
        Self {
            correct_answers_indexes: Some(indexes),
            ..Self::default()
        }
    }
}

/// A way in which a question breaks the rules for its type. Only reported,
/// the store never produces these through its own operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeViolation {
    #[error("a {0} question must not have answer choices")]
    UnexpectedChoices(QuestionType),
    #[error("a {0} question must not have correct answers")]
    UnexpectedCorrect(QuestionType),
    #[error("a {question_type} question must have exactly the choices {expected:?}")]
    FixedChoices {
        question_type: QuestionType,
        expected: [&'static str; 2],
    },
    #[error("a {0} question may have at most one correct answer")]
    MultipleCorrect(QuestionType),
    #[error("correct answers of a check-box question must be sorted and unique")]
    UnsortedCorrect,
    #[error("correct answer {index} does not point at one of the {len} answer choices")]
    CorrectOutOfRange { index: usize, len: usize },
}

impl Question {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choices and correct answers always start out empty.
    pub fn with_text_and_type(text: impl Into<String>, question_type: QuestionType) -> Self {
        Self {
            question_text: text.into(),
            question_type,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, patch: QuestionPatch) {
        if let Some(text) = patch.question_text {
            self.question_text = text;
        }
        if let Some(question_type) = patch.question_type {
            self.question_type = question_type;
        }
        if let Some(choices) = patch.answer_choices {
            self.answer_choices = choices;
        }
        if let Some(correct) = patch.correct_answers_indexes {
            self.correct_answers_indexes = correct;
        }
    }

    pub fn is_correct(&self, choice: usize) -> bool {
        self.correct_answers_indexes.contains(&choice)
    }

    /// The patch that turns this question into a `target` question while
    /// keeping the type rules intact. `None` when it already is one.
    pub fn retype(&self, target: QuestionType) -> Option<QuestionPatch> {
        if self.question_type == target {
            return None;
        }

        let (answer_choices, correct_answers_indexes): (Option<Vec<String>>, Option<Vec<usize>>) =
            match target {
                QuestionType::Default | QuestionType::FreeResponse => {
                    (Some(Vec::new()), Some(Vec::new()))
                }
                QuestionType::MultipleChoice => {
                    let first = self.correct_answers_indexes.first().copied();
                    (None, Some(first.into_iter().collect()))
                }
                QuestionType::CheckBox => (None, None),
                QuestionType::TrueFalse | QuestionType::YesNo => {
                    let fixed = target
                        .fixed_choices()
                        .map(|choices| choices.iter().map(|c| c.to_string()).collect());
                    (fixed, Some(Vec::new()))
                }
            };

        Some(QuestionPatch {
            question_text: None,
            question_type: Some(target),
            answer_choices,
            correct_answers_indexes,
        })
    }

    /// Correct answers after toggling `choice`. Check-box questions keep a
    /// sorted set; every other type collapses to the toggled choice alone.
    pub fn toggled_correct(&self, choice: usize) -> Vec<usize> {
        let mut correct = self.correct_answers_indexes.clone();
        match correct.iter().position(|&i| i == choice) {
            Some(pos) => {
                correct.remove(pos);
            }
            None => correct.push(choice),
        }

        if self.question_type.is_multi_select() {
            correct.sort_unstable();
            correct
        } else if correct.contains(&choice) {
            vec![choice]
        } else {
            Vec::new()
        }
    }

    /// Correct answers after choice `removed` is deleted, re-based so they
    /// keep pointing at the same choices.
    pub fn rebased_correct(&self, removed: usize) -> Vec<usize> {
        self.correct_answers_indexes
            .iter()
            .filter(|&&i| i != removed)
            .map(|&i| if i > removed { i - 1 } else { i })
            .collect()
    }

    pub fn shape_violations(&self) -> Vec<ShapeViolation> {
        let kind = self.question_type;
        let correct = &self.correct_answers_indexes;
        let mut violations = Vec::new();

        if !kind.has_choices() {
            if !self.answer_choices.is_empty() {
                violations.push(ShapeViolation::UnexpectedChoices(kind));
            }
            if !correct.is_empty() {
                violations.push(ShapeViolation::UnexpectedCorrect(kind));
            }
            return violations;
        }

        if let Some(expected) = kind.fixed_choices() {
            if self.answer_choices != expected {
                violations.push(ShapeViolation::FixedChoices {
                    question_type: kind,
                    expected,
                });
            }
        }

        if kind.is_multi_select() {
            if correct.windows(2).any(|pair| pair[0] >= pair[1]) {
                violations.push(ShapeViolation::UnsortedCorrect);
            }
        } else if correct.len() > 1 {
            violations.push(ShapeViolation::MultipleCorrect(kind));
        }

        let len = self.answer_choices.len();
        violations.extend(
            correct
                .iter()
                .filter(|&&index| index >= len)
                .map(|&index| ShapeViolation::CorrectOutOfRange { index, len }),
        );

        violations
    }
}
