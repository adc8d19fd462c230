use clap::Parser;
use env_logger::Env;
use log::{debug, info};
use quizmaker::{QuestionList, QuestionType, StoreError};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

mod cli;

use crate::cli::{CommandError, Editor, TerminalInput};

#[derive(Parser, Debug)]
#[command(name = "QuizMaker")]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "error")]
    log_level: String,
    /// Where `save` writes the quiz when no file is given.
    #[arg(short, long, value_name = "FILE", default_value = "data.json")]
    output: PathBuf,
    /// Start from a previously exported quiz instead of an empty one.
    #[arg(short, long, value_name = "FILE")]
    from: Option<PathBuf>,
    /// Print the JSON after every change.
    #[arg(long)]
    live: bool,
}

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("cannot access {path:?}: {source}")]
    File { path: PathBuf, source: io::Error },
    #[error("question {number} is a {question_type} question, its answer choices are fixed")]
    FixedChoices {
        number: usize,
        question_type: QuestionType,
    },
    #[error("question {number} is a {question_type} question, it has no answer choices")]
    NoChoices {
        number: usize,
        question_type: QuestionType,
    },
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let quiz = match &args.from {
        Some(path) => {
            info!("[Setup] Loading quiz from {:?}", path);
            let json = fs::read_to_string(path).map_err(|source| Error::File {
                path: path.clone(),
                source,
            })?;
            QuestionList::from_json(&json)?
        }
        None => QuestionList::new(),
    };
    debug!("[Setup] Starting with {} questions, live: {}", quiz.len(), args.live);

    let mut editor = Editor::new(quiz, TerminalInput::new(), args.output, args.live);
    editor.run()
}
