use colored::Colorize;
use env_logger::Env;
use log::{error, info, warn};
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quizmaker::QuestionList;

#[derive(Parser, Debug)]
#[command(name = "QuizMaker I/O")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "info")]
    log_level: String,
    /// Where `format` writes to. Standard output when absent.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    json: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report questions that break the rules of their question type.
    Check,
    /// Rewrite the quiz in the canonical two-space JSON layout.
    Format,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let json_file = match args.json {
        Some(f) => f,
        None => {
            error!("{}", "Quiz file not specified!".red());
            std::process::exit(1);
        }
    };
    info!("{}", format!("Reading quiz from {:?}", json_file).cyan());

    let json = match fs::read_to_string(&json_file) {
        Ok(json) => json,
        Err(e) => {
            error!("{}{}", "Unable to read quiz file: ".red(), e);
            std::process::exit(1);
        }
    };
    let quiz = match QuestionList::from_json(&json) {
        Ok(quiz) => quiz,
        Err(e) => {
            error!("{}", format!("{}!", e).red());
            std::process::exit(1);
        }
    };

    match args.command {
        Commands::Check => {
            if !check(&quiz) {
                std::process::exit(1);
            }
        }
        Commands::Format => {
            let formatted = match quiz.to_json_pretty() {
                Ok(formatted) => formatted,
                Err(e) => {
                    error!("{}", format!("Cannot serialize quiz: {}!", e).red());
                    std::process::exit(1);
                }
            };
            match args.output {
                Some(path) => {
                    if let Err(e) = fs::write(&path, formatted) {
                        error!("{}{}", "Unable to write quiz file: ".red(), e);
                        std::process::exit(1);
                    }
                    info!("{}", format!("Wrote {} questions to {:?}", quiz.len(), path).green());
                }
                None => println!("{}", formatted),
            }
        }
    }
}

/// Logs every question as a tree, flagging the broken ones. `true` when the
/// whole quiz is well formed.
fn check(quiz: &QuestionList) -> bool {
    info!("{}", format!("Checking quiz... ({} Questions)", quiz.len()).blue());

    let mut broken = 0;
    for (i, question) in quiz.iter().enumerate() {
        let violations = question.shape_violations();
        let line = format!(
            "├ Question {}: {:?} [{}]",
            i + 1,
            question.question_text,
            question.question_type
        );
        if violations.is_empty() {
            info!("{}", line.green());
            continue;
        }

        broken += 1;
        warn!("{}", line.red());
        for violation in violations {
            warn!("{} {}", "│".blue(), format!("├ ✘ {}", violation).red());
        }
    }

    if broken == 0 {
        info!("{}", "Every question is well formed.".green());
    } else {
        error!("{}", format!("{} of {} questions are malformed.", broken, quiz.len()).red());
    }
    broken == 0
}
