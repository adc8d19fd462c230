use log::debug;
use std::collections::VecDeque;

pub const MOVE_PROMPT: &str = "What number should this question change to?";
pub const DELETE_CONFIRMATION: &str =
    "Are you sure you want to delete this question?\nThis cannot be undone!";

/// Whoever answers questions on behalf of the user.
pub trait HumanInput {
    /// Asks for a line of text. `None` means the user cancelled.
    fn prompt(&mut self, message: &str) -> Option<String>;
    fn confirm(&mut self, message: &str) -> bool;
}

/// Replays prepared answers in order. Once the script runs out every prompt
/// is cancelled and every confirmation declined.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    answers: VecDeque<Option<String>>,
    confirmations: VecDeque<bool>,
    asked: Vec<String>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, text: impl Into<String>) -> Self {
        self.answers.push_back(Some(text.into()));
        self
    }

    pub fn cancel(mut self) -> Self {
        self.answers.push_back(None);
        self
    }

    pub fn confirming(mut self, yes: bool) -> Self {
        self.confirmations.push_back(yes);
        self
    }

    /// Every message shown so far, prompts and confirmations alike.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl HumanInput for ScriptedInput {
    fn prompt(&mut self, message: &str) -> Option<String> {
        self.asked.push(message.to_owned());
        self.answers.pop_front().flatten()
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_owned());
        self.confirmations.pop_front().unwrap_or(false)
    }
}

/// An optional minus followed by at least one ASCII digit, nothing else.
fn is_integer(input: &str) -> bool {
    let digits = input.strip_prefix('-').unwrap_or(input);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Keeps asking for a question number until the user gives one within
/// `1..=quiz_length` or cancels.
pub fn prompt_for_question_number<H: HumanInput + ?Sized>(
    input: &mut H,
    quiz_length: usize,
) -> Option<usize> {
    let mut message = MOVE_PROMPT.to_owned();
    loop {
        let answer = match input.prompt(&message) {
            Some(answer) => answer,
            None => {
                debug!("[Prompt] Question number prompt cancelled");
                return None;
            }
        };

        if !is_integer(&answer) {
            let shown = if answer.is_empty() { "<empty>" } else { answer.as_str() };
            message = format!(
                "Your input of \"{}\" is invalid. Enter a new value, or select cancel.",
                shown
            );
            continue;
        }

        // Anything too large for i64 is out of range anyway.
        match answer.parse::<i64>() {
            Ok(number) if number >= 1 && number as u64 <= quiz_length as u64 => {
                return Some(number as usize)
            }
            _ => {
                message = format!(
                    "Your input of \"{}\" is outside of the range 1-{}. Enter a new value, or select cancel.",
                    answer, quiz_length
                );
            }
        }
    }
}

pub fn confirm_delete<H: HumanInput + ?Sized>(input: &mut H) -> bool {
    let confirmed = input.confirm(DELETE_CONFIRMATION);
    debug!("[Prompt] Delete confirmed: {}", confirmed);
    confirmed
}
