use crate::Error;
use colored::Colorize;
use log::{debug, info, warn};
use quizmaker::{
    confirm_delete, prompt_for_question_number, HumanInput, QuestionList, QuestionPatch,
    QuestionType, UnknownQuestionType,
};
use std::fs;
use std::io::{self, Read, StdinLock, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use text_io::try_read;

/// Name, usage and description of every editor command.
const COMMANDS: &[(&str, &str, &str)] = &[
    ("add", "add", "add a blank question"),
    ("text", "text N", "change the text of question N"),
    (
        "type",
        "type N TYPE",
        "change the type of question N (free-response, multiple-choice, check-box, true-false, yes-no)",
    ),
    ("choice", "choice N", "add an answer choice to question N"),
    ("edit", "edit N K", "change the text of answer choice K of question N"),
    ("drop", "drop N K", "remove answer choice K from question N"),
    ("mark", "mark N K", "mark or unmark answer choice K of question N as correct"),
    ("move", "move N", "give question N a new number"),
    ("delete", "delete N", "delete question N"),
    ("render", "render", "print the quiz as JSON"),
    ("live", "live", "toggle printing the JSON after every change"),
    ("save", "save [FILE]", "write the JSON to FILE, or to the --output file"),
    ("help", "help", "show this list"),
    ("quit", "quit", "leave the editor (also q)"),
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum CommandError {
    #[error("no command given")]
    Empty,
    #[error("unknown command {0:?}, type `help` for a list")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0:?} is not a question or answer choice number")]
    Number(String),
    #[error(transparent)]
    Type(#[from] UnknownQuestionType),
    #[error("\"default\" is only a placeholder, pick a real question type")]
    PlaceholderType,
}

/// A parsed editor command. Question and choice numbers are stored 0-based.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Add,
    Text(usize),
    Type(usize, QuestionType),
    Choice(usize),
    Edit(usize, usize),
    Drop(usize, usize),
    Mark(usize, usize),
    Move(usize),
    Delete(usize),
    Render,
    Live,
    Save(Option<PathBuf>),
    Help,
    Quit,
}

impl Command {
    fn changes_quiz(&self) -> bool {
        !matches!(
            self,
            Command::Render | Command::Live | Command::Save(_) | Command::Help | Command::Quit
        )
    }
}

fn index(number: &str) -> Result<usize, CommandError> {
    match number.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(CommandError::Number(number.to_owned())),
    }
}

fn question_type(name: &str) -> Result<QuestionType, CommandError> {
    match name.parse::<QuestionType>()? {
        QuestionType::Default => Err(CommandError::PlaceholderType),
        kind => Ok(kind),
    }
}

fn usage(name: &str) -> CommandError {
    match COMMANDS.iter().find(|(command, _, _)| *command == name) {
        Some((_, usage, _)) => CommandError::Usage(*usage),
        None => CommandError::Unknown(name.to_owned()),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandError::Empty)?;
        let args: Vec<&str> = words.collect();

        let command = match (name, args.as_slice()) {
            ("add", []) => Command::Add,
            ("text", [n]) => Command::Text(index(n)?),
            ("type", [n, kind]) => Command::Type(index(n)?, question_type(kind)?),
            ("choice", [n]) => Command::Choice(index(n)?),
            ("edit", [n, k]) => Command::Edit(index(n)?, index(k)?),
            ("drop", [n, k]) => Command::Drop(index(n)?, index(k)?),
            ("mark", [n, k]) => Command::Mark(index(n)?, index(k)?),
            ("move", [n]) => Command::Move(index(n)?),
            ("delete", [n]) => Command::Delete(index(n)?),
            ("render", []) => Command::Render,
            ("live", []) => Command::Live,
            ("save", []) => Command::Save(None),
            ("save", [path]) => Command::Save(Some(PathBuf::from(path))),
            ("help", []) => Command::Help,
            ("quit" | "q", []) => Command::Quit,
            (name, _) => return Err(usage(name)),
        };
        Ok(command)
    }
}

/// Stdin as bytes, remembering whether it ran dry.
struct StdinBytes {
    inner: io::Bytes<StdinLock<'static>>,
    exhausted: bool,
}

impl Iterator for StdinBytes {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        match self.inner.next() {
            Some(Ok(byte)) => Some(byte),
            _ => {
                self.exhausted = true;
                None
            }
        }
    }
}

pub(crate) struct TerminalInput {
    bytes: StdinBytes,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self {
            bytes: StdinBytes {
                inner: io::stdin().lock().bytes(),
                exhausted: false,
            },
        }
    }

    /// `None` once stdin is closed.
    fn read_line(&mut self, leader: &str) -> Option<String> {
        print!("{} ", leader);
        io::stdout().flush().ok()?;

        let line: String = try_read!("{}\n", self.bytes).ok()?;
        if line.is_empty() && self.bytes.exhausted {
            return None;
        }
        Some(line.trim_end_matches('\r').to_owned())
    }
}

impl HumanInput for TerminalInput {
    fn prompt(&mut self, message: &str) -> Option<String> {
        println!("{}", message.cyan());
        match self.read_line(&"(q to cancel) >".dimmed().to_string())? {
            answer if answer == "q" => None,
            answer => Some(answer),
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        println!("{}", message.yellow());
        self.read_line(&"[y/N]".dimmed().to_string())
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

pub(crate) struct Editor<H: HumanInput> {
    quiz: QuestionList,
    input: H,
    output: PathBuf,
    live: bool,
}

impl<H: HumanInput> Editor<H> {
    pub fn new(quiz: QuestionList, input: H, output: PathBuf, live: bool) -> Self {
        Self {
            quiz,
            input,
            output,
            live,
        }
    }

    #[cfg(test)]
    fn quiz(&self) -> &QuestionList {
        &self.quiz
    }

    fn editable_choices(&self, index: usize) -> Result<(), Error> {
        let question_type = self.quiz.question(index)?.question_type;
        if question_type.has_editable_choices() {
            Ok(())
        } else if question_type.has_choices() {
            Err(Error::FixedChoices {
                number: index + 1,
                question_type,
            })
        } else {
            Err(Error::NoChoices {
                number: index + 1,
                question_type,
            })
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow, Error> {
        debug!("[Editor] {:?}", command);
        let changes_quiz = command.changes_quiz();

        match command {
            Command::Add => {
                let index = self.quiz.append();
                println!("{}", format!("Added question {}.", index + 1).green());
            }
            Command::Text(n) => {
                self.quiz.question(n)?;
                let message = format!("What should question {} ask?", n + 1);
                if let Some(text) = self.input.prompt(&message) {
                    self.quiz.patch(n, QuestionPatch::text(text))?;
                }
            }
            Command::Type(n, kind) => self.quiz.change_type(n, kind)?,
            Command::Choice(n) => {
                self.editable_choices(n)?;
                let k = self.quiz.add_answer_choice(n)?;
                let message = format!("Text for answer choice {}:", k + 1);
                if let Some(text) = self.input.prompt(&message) {
                    self.quiz.set_answer_choice_text(n, k, text)?;
                }
            }
            Command::Edit(n, k) => {
                self.editable_choices(n)?;
                let current = self.quiz.answer_choice(n, k)?;
                let message = format!("Text for answer choice {} (now {:?}):", k + 1, current);
                if let Some(text) = self.input.prompt(&message) {
                    self.quiz.set_answer_choice_text(n, k, text)?;
                }
            }
            Command::Drop(n, k) => {
                self.editable_choices(n)?;
                self.quiz.delete_answer_choice(n, k)?;
            }
            Command::Mark(n, k) => {
                let question_type = self.quiz.question(n)?.question_type;
                if !question_type.has_choices() {
                    return Err(Error::NoChoices {
                        number: n + 1,
                        question_type,
                    });
                }
                self.quiz.toggle_correct_answer(n, k)?;
            }
            Command::Move(n) => {
                self.quiz.question(n)?;
                if let Some(target) = prompt_for_question_number(&mut self.input, self.quiz.len()) {
                    self.quiz.move_question(n, target)?;
                }
            }
            Command::Delete(n) => {
                self.quiz.question(n)?;
                if confirm_delete(&mut self.input) {
                    self.quiz.remove_question(n)?;
                    println!("{}", format!("Deleted question {}.", n + 1).yellow());
                }
            }
            Command::Render => self.render()?,
            Command::Live => {
                self.live = !self.live;
                println!("{}", format!("live updating: {}", self.live).cyan());
            }
            Command::Save(path) => {
                let path = path.unwrap_or_else(|| self.output.clone());
                self.save(&path)?;
            }
            Command::Help => print_help(),
            Command::Quit => return Ok(Flow::Quit),
        }

        if self.live && changes_quiz {
            self.render()?;
        }
        Ok(Flow::Continue)
    }

    fn render(&self) -> Result<(), Error> {
        println!("{}", self.quiz.to_json_pretty()?);
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<(), Error> {
        let json = self.quiz.to_json_pretty()?;
        fs::write(path, json).map_err(|source| Error::File {
            path: path.to_owned(),
            source,
        })?;
        info!("[Editor] Saved {} questions to {:?}", self.quiz.len(), path);
        println!(
            "{}",
            format!("Saved {} questions to {:?}.", self.quiz.len(), path).green()
        );
        Ok(())
    }

    fn draw(&self) {
        println!(
            "{}",
            format!("==========> QuizMaker ({} questions) <==========", self.quiz.len()).cyan()
        );
        for (i, question) in self.quiz.iter().enumerate() {
            let leading = format!("{}. ", i + 1);
            let text = if question.question_text.is_empty() {
                "Question goes here...".dimmed()
            } else {
                question.question_text.as_str().bold()
            };
            println!(
                "{}{} {}",
                leading.cyan(),
                text,
                format!("[{}]", question.question_type.label()).blue()
            );

            let indent = " ".repeat(leading.len());
            for (k, choice) in question.answer_choices.iter().enumerate() {
                let mark = if question.is_correct(k) {
                    "✔".bright_green()
                } else {
                    " ".normal()
                };
                println!("{}{} {}. {}", indent, mark, k + 1, choice);
            }
        }
    }
}

impl Editor<TerminalInput> {
    pub fn run(&mut self) -> Result<(), Error> {
        println!("{}", "Type `help` for a list of commands.".cyan());
        self.draw();
        loop {
            let line = match self.input.read_line(&">".cyan().to_string()) {
                Some(line) => line,
                None => {
                    debug!("[Editor] Input closed");
                    return Ok(());
                }
            };

            let outcome = line
                .parse::<Command>()
                .map_err(Error::from)
                .and_then(|command| self.execute(command));
            match outcome {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => self.draw(),
                Err(Error::Command(CommandError::Empty)) => {}
                Err(err) => {
                    warn!("[Editor] {}", err);
                    println!("{}", err.to_string().bright_red());
                }
            }
        }
    }
}

fn print_help() {
    for (_, usage, description) in COMMANDS {
        println!("  {:<14}{}", usage.bold(), description);
    }
}
