use crate::libquizmaker::error::StoreError;
use crate::libquizmaker::question::{Question, QuestionPatch, QuestionType};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// The ordered list of questions being edited. Position in the list is the
/// question number (0-based here, 1-based wherever it is shown).
///
/// Every fallible operation checks its indexes before touching anything, so
/// an `Err` always leaves the list as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionList {
    questions: Vec<Question>,
}

impl QuestionList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads an exported quiz. Nothing is normalised, so exporting the result
    /// again reproduces the input structure.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let list: QuestionList = serde_json::from_str(json)?;
        debug!("[Store] Loaded {} questions", list.len());
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    pub fn question(&self, index: usize) -> Result<&Question, StoreError> {
        self.questions.get(index).ok_or_else(|| {
            warn!("[Store] No question at index {}", index);
            StoreError::QuestionIndex {
                index,
                len: self.questions.len(),
            }
        })
    }

    pub fn answer_choice(&self, index: usize, choice: usize) -> Result<&str, StoreError> {
        let question = self.question(index)?;
        question
            .answer_choices
            .get(choice)
            .map(String::as_str)
            .ok_or_else(|| {
                warn!("[Store] Question {} has no choice at index {}", index, choice);
                StoreError::ChoiceIndex {
                    question: index,
                    choice,
                    len: question.answer_choices.len(),
                }
            })
    }

    /// Adds a blank question at the end and returns its index.
    pub fn append(&mut self) -> usize {
        self.questions.push(Question::new());
        debug!("[Store] Appended question, {} total", self.questions.len());
        self.questions.len() - 1
    }

    /// Writes the `Some` fields of `patch` into the question at `index`. Every
    /// other edit goes through here.
    pub fn patch(&mut self, index: usize, patch: QuestionPatch) -> Result<(), StoreError> {
        let len = self.questions.len();
        let question = self.questions.get_mut(index).ok_or_else(|| {
            warn!("[Store] Refusing to patch missing question {}", index);
            StoreError::QuestionIndex { index, len }
        })?;
        debug!("[Store] Patching question {}: {:?}", index, patch);
        question.apply(patch);
        Ok(())
    }

    pub fn change_type(&mut self, index: usize, new_type: QuestionType) -> Result<(), StoreError> {
        match self.question(index)?.retype(new_type) {
            Some(patch) => self.patch(index, patch),
            None => Ok(()),
        }
    }

    /// Appends an empty choice and returns its index. The question type is not
    /// checked; callers only offer this for types with editable choices.
    pub fn add_answer_choice(&mut self, index: usize) -> Result<usize, StoreError> {
        let mut choices = self.question(index)?.answer_choices.clone();
        choices.push(String::new());
        let added = choices.len() - 1;
        self.patch(index, QuestionPatch::choices(choices))?;
        Ok(added)
    }

    pub fn set_answer_choice_text(
        &mut self,
        index: usize,
        choice: usize,
        text: impl Into<String>,
    ) -> Result<(), StoreError> {
        self.answer_choice(index, choice)?;
        let mut choices = self.questions[index].answer_choices.clone();
        choices[choice] = text.into();
        self.patch(index, QuestionPatch::choices(choices))
    }

    /// Removes a choice and re-bases the correct answers so they keep marking
    /// the same choices.
    pub fn delete_answer_choice(&mut self, index: usize, choice: usize) -> Result<(), StoreError> {
        self.answer_choice(index, choice)?;
        let question = &self.questions[index];
        let mut choices = question.answer_choices.clone();
        choices.remove(choice);
        let patch = QuestionPatch {
            answer_choices: Some(choices),
            correct_answers_indexes: Some(question.rebased_correct(choice)),
            ..QuestionPatch::default()
        };
        self.patch(index, patch)
    }

    pub fn toggle_correct_answer(&mut self, index: usize, choice: usize) -> Result<(), StoreError> {
        self.answer_choice(index, choice)?;
        let correct = self.questions[index].toggled_correct(choice);
        self.patch(index, QuestionPatch::correct(correct))
    }

    /// Takes the question out, then reinserts it so that it becomes question
    /// number `target` (1-based) of the resulting list.
    pub fn move_question(&mut self, prev_index: usize, target: usize) -> Result<(), StoreError> {
        self.question(prev_index)?;
        let len = self.questions.len();
        if target == 0 || target > len {
            warn!("[Store] Move target {} outside of 1-{}", target, len);
            return Err(StoreError::MoveTarget { target, len });
        }

        let question = self.questions.remove(prev_index);
        self.questions.insert(target - 1, question);
        debug!("[Store] Moved question {} to number {}", prev_index, target);
        Ok(())
    }

    pub fn remove_question(&mut self, index: usize) -> Result<Question, StoreError> {
        self.question(index)?;
        debug!("[Store] Removing question {}", index);
        Ok(self.questions.remove(index))
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, StoreError> {
        Ok(serde_json::to_value(self)?)
    }

    /// The export format: UTF-8 JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<Vec<Question>> for QuestionList {
    fn from(questions: Vec<Question>) -> Self {
        Self { questions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn named(names: &[&str]) -> QuestionList {
        names
            .iter()
            .map(|name| Question::with_text_and_type(*name, QuestionType::FreeResponse))
            .collect::<Vec<_>>()
            .into()
    }

    fn texts(list: &QuestionList) -> Vec<&str> {
        list.iter().map(|q| q.question_text.as_str()).collect()
    }

    fn with_choices(kind: QuestionType, choices: &[&str], correct: &[usize]) -> QuestionList {
        vec![Question {
            question_text: "Pick".into(),
            question_type: kind,
            answer_choices: choices.iter().map(|c| c.to_string()).collect(),
            correct_answers_indexes: correct.to_vec(),
        }]
        .into()
    }

    #[test]
    fn append_adds_blank_question() {
        let mut list = QuestionList::new();
        assert_eq!(list.append(), 0);
        assert_eq!(list.append(), 1);
        assert_eq!(list.len(), 2);
        assert_eq!(list.question(1).unwrap(), &Question::new());
    }

    #[test]
    fn patch_text_leaves_everything_else() {
        let mut list = named(&["A", "B", "C"]);
        let before = list.clone();
        list.patch(1, QuestionPatch::text("changed")).unwrap();

        assert_eq!(list.question(1).unwrap().question_text, "changed");
        assert_eq!(list.question(1).unwrap().question_type, QuestionType::FreeResponse);
        assert_eq!(list.question(0).ok(), before.question(0).ok());
        assert_eq!(list.question(2).ok(), before.question(2).ok());
    }

    #[test]
    fn patch_out_of_range_changes_nothing() {
        let mut list = named(&["A", "B"]);
        let before = list.clone();
        let err = list.patch(2, QuestionPatch::text("nope")).unwrap_err();
        assert!(matches!(err, StoreError::QuestionIndex { index: 2, len: 2 }));
        assert_eq!(list, before);
    }

    #[test]
    fn change_type_normalises() {
        let mut list = with_choices(QuestionType::CheckBox, &["A", "B", "C"], &[0, 2]);
        list.change_type(0, QuestionType::MultipleChoice).unwrap();
        let q = list.question(0).unwrap();
        assert_eq!(q.question_type, QuestionType::MultipleChoice);
        assert_eq!(q.answer_choices, vec!["A", "B", "C"]);
        assert_eq!(q.correct_answers_indexes, vec![0]);

        list.change_type(0, QuestionType::TrueFalse).unwrap();
        let q = list.question(0).unwrap();
        assert_eq!(q.answer_choices, vec!["True", "False"]);
        assert!(q.correct_answers_indexes.is_empty());
    }

    #[test]
    fn change_type_to_same_type_is_a_no_op() {
        let mut list = with_choices(QuestionType::MultipleChoice, &["A", "B"], &[0, 1]);
        let before = list.clone();
        list.change_type(0, QuestionType::MultipleChoice).unwrap();
        assert_eq!(list, before);
    }

    #[test]
    fn add_and_edit_choices() {
        let mut list = with_choices(QuestionType::MultipleChoice, &[], &[]);
        assert_eq!(list.add_answer_choice(0).unwrap(), 0);
        assert_eq!(list.add_answer_choice(0).unwrap(), 1);
        list.set_answer_choice_text(0, 1, "Second").unwrap();
        assert_eq!(list.question(0).unwrap().answer_choices, vec!["", "Second"]);
    }

    #[test]
    fn add_choice_is_not_gated_by_type() {
        let mut list = with_choices(QuestionType::FreeResponse, &[], &[]);
        list.add_answer_choice(0).unwrap();
        assert_eq!(list.question(0).unwrap().answer_choices, vec![""]);
    }

    #[test]
    fn set_choice_text_out_of_range() {
        let mut list = with_choices(QuestionType::CheckBox, &["A"], &[0]);
        let before = list.clone();
        let err = list.set_answer_choice_text(0, 1, "B").unwrap_err();
        assert!(matches!(err, StoreError::ChoiceIndex { question: 0, choice: 1, len: 1 }));
        assert_eq!(list, before);
    }

    #[test]
    fn delete_choice_rebases_correct_answers() {
        let mut list = with_choices(QuestionType::CheckBox, &["A", "B", "C"], &[1, 2]);
        list.delete_answer_choice(0, 1).unwrap();
        let q = list.question(0).unwrap();
        assert_eq!(q.answer_choices, vec!["A", "C"]);
        assert_eq!(q.correct_answers_indexes, vec![1]);
    }

    #[test]
    fn toggle_multiple_choice_collapses() {
        let mut list = with_choices(QuestionType::MultipleChoice, &["A", "B", "C"], &[0]);
        list.toggle_correct_answer(0, 2).unwrap();
        assert_eq!(list.question(0).unwrap().correct_answers_indexes, vec![2]);
    }

    #[test]
    fn toggle_check_box_sorts() {
        let mut list = with_choices(QuestionType::CheckBox, &["A", "B", "C"], &[]);
        list.toggle_correct_answer(0, 2).unwrap();
        list.toggle_correct_answer(0, 0).unwrap();
        assert_eq!(list.question(0).unwrap().correct_answers_indexes, vec![0, 2]);
    }

    #[test]
    fn toggle_rejects_missing_choice() {
        let mut list = with_choices(QuestionType::TrueFalse, &["True", "False"], &[]);
        assert!(matches!(
            list.toggle_correct_answer(0, 2),
            Err(StoreError::ChoiceIndex { .. })
        ));
        assert!(list.question(0).unwrap().correct_answers_indexes.is_empty());
    }

    #[test]
    fn move_removes_then_inserts() {
        let mut list = named(&["A", "B", "C", "D"]);
        list.move_question(0, 3).unwrap();
        assert_eq!(texts(&list), vec!["B", "C", "A", "D"]);

        let mut list = named(&["A", "B", "C", "D"]);
        list.move_question(3, 1).unwrap();
        assert_eq!(texts(&list), vec!["D", "A", "B", "C"]);

        let mut list = named(&["A", "B", "C", "D"]);
        list.move_question(1, 4).unwrap();
        assert_eq!(texts(&list), vec!["A", "C", "D", "B"]);
    }

    #[test]
    fn move_to_own_number_keeps_order() {
        let mut list = named(&["A", "B", "C"]);
        list.move_question(1, 2).unwrap();
        assert_eq!(texts(&list), vec!["A", "B", "C"]);
    }

    #[test]
    fn move_rejects_bad_target() {
        let mut list = named(&["A", "B"]);
        assert!(matches!(
            list.move_question(0, 0),
            Err(StoreError::MoveTarget { target: 0, len: 2 })
        ));
        assert!(matches!(
            list.move_question(0, 3),
            Err(StoreError::MoveTarget { target: 3, len: 2 })
        ));
        assert_eq!(texts(&list), vec!["A", "B"]);
    }

    #[test]
    fn remove_question() {
        let mut list = named(&["A", "B", "C"]);
        let removed = list.remove_question(1).unwrap();
        assert_eq!(removed.question_text, "B");
        assert_eq!(texts(&list), vec!["A", "C"]);
        assert!(list.remove_question(2).is_err());
    }

    #[test]
    fn serializes_empty_list() {
        assert_eq!(QuestionList::new().to_json_value().unwrap(), json!([]));
        assert_eq!(QuestionList::new().to_json_pretty().unwrap(), "[]");
    }

    #[test]
    fn serializes_fields_in_camel_case() {
        let list = with_choices(QuestionType::CheckBox, &["A", "B"], &[1]);
        assert_eq!(
            list.to_json_value().unwrap(),
            json!([{
                "questionText": "Pick",
                "questionType": "check-box",
                "answerChoices": ["A", "B"],
                "correctAnswersIndexes": [1],
            }])
        );
    }

    #[test]
    fn reloading_an_export_is_idempotent() {
        let mut list = named(&["A", "B"]);
        list.change_type(1, QuestionType::YesNo).unwrap();
        list.toggle_correct_answer(1, 0).unwrap();

        let exported = list.to_json_pretty().unwrap();
        let reloaded = QuestionList::from_json(&exported).unwrap();
        assert_eq!(reloaded, list);
        assert_eq!(reloaded.to_json_pretty().unwrap(), exported);
    }

    #[test]
    fn from_json_rejects_bad_shapes() {
        assert!(QuestionList::from_json("{}").is_err());
        assert!(QuestionList::from_json(
            r#"[{"questionText":"","questionType":"essay","answerChoices":[],"correctAnswersIndexes":[]}]"#
        )
        .is_err());
        assert!(QuestionList::from_json(r#"[{"questionText":""}]"#).is_err());
    }
}
