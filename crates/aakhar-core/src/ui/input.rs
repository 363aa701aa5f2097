//! User actions and their text form.
//!
//! Views never see raw input; hosts parse a line into an [`Action`] and the
//! router hands it to the current view. Positions typed by the user are
//! 1-based and stored 0-based.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::{Language, LanguageParseError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Pick a category from the selector.
    Select(String),
    Next,
    Previous,
    Shuffle,
    /// Flip one recall card.
    Toggle(usize),
    /// Back to the category selector.
    Back,
    /// Submit the quiz setup form.
    Start { category: String, language: Language },
    Answer(usize),
    /// Move past an answered quiz question.
    Continue,
    /// Abandon the quiz or leave its results.
    Quit,
    Install,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("Empty input")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Expected a position starting at 1, got `{0}`")]
    InvalidPosition(String),

    #[error(transparent)]
    Language(#[from] LanguageParseError),
}

fn position(raw: Option<&str>, command: &'static str) -> Result<usize, InputError> {
    let raw = raw.ok_or(InputError::MissingArgument {
        command,
        argument: "a position",
    })?;
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(InputError::InvalidPosition(raw.to_string())),
    }
}

impl FromStr for Action {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err(InputError::Empty);
        };

        let action = match command.to_ascii_lowercase().as_str() {
            "select" => {
                // "select Common Words" names the same category as "select common_words"
                let id = words.collect::<Vec<_>>().join("_");
                if id.is_empty() {
                    return Err(InputError::MissingArgument {
                        command: "select",
                        argument: "a category",
                    });
                }
                Action::Select(id)
            }
            "next" | "n" => Action::Next,
            "prev" | "previous" | "p" => Action::Previous,
            "shuffle" => Action::Shuffle,
            "toggle" | "t" => Action::Toggle(position(words.next(), "toggle")?),
            "back" => Action::Back,
            "start" => {
                // The language is the last word; everything before it names the category
                let mut rest: Vec<&str> = words.collect();
                let language = rest.pop();
                let (Some(language), false) = (language, rest.is_empty()) else {
                    return Err(InputError::MissingArgument {
                        command: "start",
                        argument: "a category and a language",
                    });
                };
                Action::Start {
                    category: rest.join("_"),
                    language: language.parse()?,
                }
            }
            "answer" | "a" => Action::Answer(position(words.next(), "answer")?),
            "continue" | "c" => Action::Continue,
            "quit" => Action::Quit,
            "install" => Action::Install,
            other => return Err(InputError::Unknown(other.to_string())),
        };
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Select(id) => write!(f, "select {}", id),
            Action::Next => write!(f, "next"),
            Action::Previous => write!(f, "prev"),
            Action::Shuffle => write!(f, "shuffle"),
            Action::Toggle(i) => write!(f, "toggle {}", i + 1),
            Action::Back => write!(f, "back"),
            Action::Start { category, language } => write!(f, "start {} {}", category, language),
            Action::Answer(i) => write!(f, "answer {}", i + 1),
            Action::Continue => write!(f, "continue"),
            Action::Quit => write!(f, "quit"),
            Action::Install => write!(f, "install"),
        }
    }
}
