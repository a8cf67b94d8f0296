//! Operator prompting.
//!
//! Task builders talk to a [`Prompter`] rather than to the terminal, so the same
//! question sequence can be answered interactively ([`InquirePrompter`]),
//! unattended with defaults ([`DefaultsPrompter`]), or from a script in tests
//! ([`ScriptedPrompter`]).

use std::collections::VecDeque;
use std::io::{self, IsTerminal};

use grumgen_core::GrumgenError;
use inquire::{Confirm, CustomType, InquireError, MultiSelect, Select, Text};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while asking the operator a question.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("No input available: {0}")]
    NoInput(String),

    #[error("Prompt cancelled by operator")]
    Cancelled,

    #[error("Invalid answer for '{prompt}': {message}")]
    InvalidAnswer { prompt: String, message: String },

    #[error("Terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for prompt operations.
pub type Result<T> = std::result::Result<T, PromptError>;

impl PromptError {
    fn invalid(prompt: &str, message: impl Into<String>) -> Self {
        Self::InvalidAnswer {
            prompt: prompt.to_string(),
            message: message.into(),
        }
    }
}

impl From<PromptError> for GrumgenError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::Cancelled => GrumgenError::user_abort("prompt cancelled by operator"),
            PromptError::InvalidAnswer { .. } => GrumgenError::invalid_input(err.to_string()),
            other => GrumgenError::Prompt {
                message: other.to_string(),
            },
        }
    }
}

/// A question asker.
///
/// Every method blocks until an answer is available.
pub trait Prompter {
    /// Free text with a default used on empty input.
    fn ask_text(&mut self, prompt: &str, default: &str) -> Result<String>;

    /// Yes/no question.
    fn ask_bool(&mut self, prompt: &str, default: bool) -> Result<bool>;

    /// Integer answer.
    fn ask_int(&mut self, prompt: &str, default: i64) -> Result<i64>;

    /// Pick one (or, with `allow_multiple`, any number) of `options`.
    ///
    /// Returned values are always elements of `options`.
    fn ask_choice(
        &mut self,
        prompt: &str,
        options: &[&str],
        defaults: &[&str],
        allow_multiple: bool,
    ) -> Result<Vec<String>>;
}

/// Interactive terminal prompts backed by `inquire`.
///
/// Fails fast with [`PromptError::NoInput`] when stdin is not a terminal.
#[derive(Debug, Default)]
pub struct InquirePrompter;

impl InquirePrompter {
    pub fn new() -> Self {
        Self
    }

    fn ensure_terminal(prompt: &str) -> Result<()> {
        if io::stdin().is_terminal() {
            Ok(())
        } else {
            Err(PromptError::NoInput(format!(
                "stdin is not a terminal while asking '{prompt}'"
            )))
        }
    }
}

fn map_inquire(prompt: &str, err: InquireError) -> PromptError {
    match err {
        InquireError::NotTTY => PromptError::NoInput(format!("no terminal for '{prompt}'")),
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            PromptError::Cancelled
        }
        InquireError::IO(e) => PromptError::Io(e),
        InquireError::InvalidConfiguration(message) => PromptError::invalid(prompt, message),
        other => PromptError::invalid(prompt, other.to_string()),
    }
}

impl Prompter for InquirePrompter {
    fn ask_text(&mut self, prompt: &str, default: &str) -> Result<String> {
        Self::ensure_terminal(prompt)?;
        Text::new(prompt)
            .with_default(default)
            .prompt()
            .map_err(|e| map_inquire(prompt, e))
    }

    fn ask_bool(&mut self, prompt: &str, default: bool) -> Result<bool> {
        Self::ensure_terminal(prompt)?;
        Confirm::new(prompt)
            .with_default(default)
            .prompt()
            .map_err(|e| map_inquire(prompt, e))
    }

    fn ask_int(&mut self, prompt: &str, default: i64) -> Result<i64> {
        Self::ensure_terminal(prompt)?;
        CustomType::<i64>::new(prompt)
            .with_default(default)
            .with_error_message("Please type a whole number")
            .prompt()
            .map_err(|e| map_inquire(prompt, e))
    }

    fn ask_choice(
        &mut self,
        prompt: &str,
        options: &[&str],
        defaults: &[&str],
        allow_multiple: bool,
    ) -> Result<Vec<String>> {
        if options.is_empty() {
            return Err(PromptError::invalid(prompt, "no options to choose from"));
        }
        Self::ensure_terminal(prompt)?;

        let default_indices: Vec<usize> = options
            .iter()
            .enumerate()
            .filter(|(_, option)| defaults.contains(option))
            .map(|(i, _)| i)
            .collect();

        if allow_multiple {
            MultiSelect::new(prompt, options.to_vec())
                .with_default(&default_indices)
                .prompt()
                .map(|picked| picked.into_iter().map(String::from).collect())
                .map_err(|e| map_inquire(prompt, e))
        } else {
            let cursor = default_indices.first().copied().unwrap_or(0);
            Select::new(prompt, options.to_vec())
                .with_starting_cursor(cursor)
                .prompt()
                .map(|picked| vec![picked.to_string()])
                .map_err(|e| map_inquire(prompt, e))
        }
    }
}

/// Answers every question with its default.
#[derive(Debug, Default)]
pub struct DefaultsPrompter;

impl DefaultsPrompter {
    pub fn new() -> Self {
        Self
    }
}

fn default_choice(options: &[&str], defaults: &[&str], allow_multiple: bool) -> Vec<String> {
    let picked: Vec<String> = options
        .iter()
        .filter(|option| defaults.contains(option))
        .map(|option| option.to_string())
        .collect();

    if allow_multiple {
        picked
    } else {
        picked
            .into_iter()
            .next()
            .or_else(|| options.first().map(|o| o.to_string()))
            .into_iter()
            .collect()
    }
}

impl Prompter for DefaultsPrompter {
    fn ask_text(&mut self, prompt: &str, default: &str) -> Result<String> {
        debug!(prompt, default, "answering with default");
        Ok(default.to_string())
    }

    fn ask_bool(&mut self, prompt: &str, default: bool) -> Result<bool> {
        debug!(prompt, default, "answering with default");
        Ok(default)
    }

    fn ask_int(&mut self, prompt: &str, default: i64) -> Result<i64> {
        debug!(prompt, default, "answering with default");
        Ok(default)
    }

    fn ask_choice(
        &mut self,
        prompt: &str,
        options: &[&str],
        defaults: &[&str],
        allow_multiple: bool,
    ) -> Result<Vec<String>> {
        if options.is_empty() {
            return Err(PromptError::invalid(prompt, "no options to choose from"));
        }
        Ok(default_choice(options, defaults, allow_multiple))
    }
}

/// One scripted reply for [`ScriptedPrompter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Accept whatever default the question offers.
    Default,
    Text(String),
    Bool(bool),
    Int(i64),
    Choice(Vec<String>),
}

/// Replays queued answers; falls back to defaults once the queue is empty.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Prompt texts asked so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, prompt: &str) -> Answer {
        self.asked.push(prompt.to_string());
        self.answers.pop_front().unwrap_or(Answer::Default)
    }
}

impl Prompter for ScriptedPrompter {
    fn ask_text(&mut self, prompt: &str, default: &str) -> Result<String> {
        match self.next(prompt) {
            Answer::Default => Ok(default.to_string()),
            Answer::Text(text) => Ok(text),
            other => Err(PromptError::invalid(prompt, format!("expected text, got {other:?}"))),
        }
    }

    fn ask_bool(&mut self, prompt: &str, default: bool) -> Result<bool> {
        match self.next(prompt) {
            Answer::Default => Ok(default),
            Answer::Bool(value) => Ok(value),
            other => Err(PromptError::invalid(prompt, format!("expected bool, got {other:?}"))),
        }
    }

    fn ask_int(&mut self, prompt: &str, default: i64) -> Result<i64> {
        match self.next(prompt) {
            Answer::Default => Ok(default),
            Answer::Int(value) => Ok(value),
            other => Err(PromptError::invalid(prompt, format!("expected int, got {other:?}"))),
        }
    }

    fn ask_choice(
        &mut self,
        prompt: &str,
        options: &[&str],
        defaults: &[&str],
        allow_multiple: bool,
    ) -> Result<Vec<String>> {
        match self.next(prompt) {
            Answer::Default => Ok(default_choice(options, defaults, allow_multiple)),
            Answer::Choice(picked) => {
                if let Some(unknown) = picked.iter().find(|p| !options.contains(&p.as_str())) {
                    return Err(PromptError::invalid(prompt, format!("'{unknown}' is not an option")));
                }
                if !allow_multiple && picked.len() != 1 {
                    return Err(PromptError::invalid(prompt, "exactly one option must be picked"));
                }
                Ok(picked)
            }
            other => Err(PromptError::invalid(prompt, format!("expected choice, got {other:?}"))),
        }
    }
}
