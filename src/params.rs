//! The synchronous parameter-input boundary: prompt descriptions, the
//! `ParamSource` trait the host dialog implements, and the parsing that turns
//! answer strings into numbers before the core runs.

use crate::geom::Orientation;

/// One input field of a tool's parameter dialog.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub label: String,
    pub default: String,
    /// Enumerated choices; `None` means free-form entry.
    pub choices: Option<Vec<String>>,
}

impl Prompt {
    #[must_use]
    pub fn free(label: &str, default: impl Into<String>) -> Self {
        Self {
            label: label.to_owned(),
            default: default.into(),
            choices: None,
        }
    }

    #[must_use]
    pub fn choice(label: &str, default: impl Into<String>, choices: &[&str]) -> Self {
        Self {
            label: label.to_owned(),
            default: default.into(),
            choices: Some(choices.iter().map(|c| (*c).to_owned()).collect()),
        }
    }
}

/// Presents prompts to the user and returns the answers in prompt order, or
/// `None` when the dialog was cancelled. On cancellation no work happens.
pub trait ParamSource {
    fn input(&mut self, title: &str, prompts: &[Prompt]) -> Option<Vec<String>>;
}

/// Accepts every prompt's default, the "just press OK" path.
#[derive(Debug, Default)]
pub struct AcceptDefaults;

impl ParamSource for AcceptDefaults {
    fn input(&mut self, _title: &str, prompts: &[Prompt]) -> Option<Vec<String>> {
        Some(prompts.iter().map(|p| p.default.clone()).collect())
    }
}

/// Replays a fixed set of answers; used by tests and scripted invocations.
#[derive(Debug)]
pub struct ScriptedInput {
    answers: Vec<String>,
    /// Pretend the user hit cancel instead.
    pub cancelled: bool,
}

impl ScriptedInput {
    #[must_use]
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| (*a).to_owned()).collect(),
            cancelled: false,
        }
    }

    #[must_use]
    pub fn cancelled() -> Self {
        Self {
            answers: Vec::new(),
            cancelled: true,
        }
    }
}

impl ParamSource for ScriptedInput {
    fn input(&mut self, _title: &str, prompts: &[Prompt]) -> Option<Vec<String>> {
        if self.cancelled {
            return None;
        }
        let mut answers = self.answers.clone();
        // Unanswered trailing prompts fall back to their defaults.
        for prompt in prompts.iter().skip(answers.len()) {
            answers.push(prompt.default.clone());
        }
        Some(answers)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("`{value}` is not a valid number for `{field}`")]
    InvalidNumber { field: String, value: String },
    #[error("`{value}` is not a valid length for `{field}`")]
    InvalidLength { field: String, value: String },
    #[error("`{value}` is not one of the choices for `{field}`")]
    UnknownChoice { field: String, value: String },
    #[error("missing answer for `{field}`")]
    MissingAnswer { field: String },
    #[error("no layer named `{name}`")]
    UnknownLayer { name: String },
}

pub fn answer<'a>(answers: &'a [String], index: usize, field: &str) -> Result<&'a str, ParamError> {
    answers
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| ParamError::MissingAnswer {
            field: field.to_owned(),
        })
}

pub fn parse_number(field: &str, value: &str) -> Result<f64, ParamError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ParamError::InvalidNumber {
            field: field.to_owned(),
            value: value.to_owned(),
        })
}

/// Parse a model length. Model units are inches; `6"` is 6.0 and `1'` is
/// twelve inches. A plain number passes through unchanged.
pub fn parse_length(field: &str, value: &str) -> Result<f64, ParamError> {
    let trimmed = value.trim();
    let (number, factor) = if let Some(feet) = trimmed.strip_suffix('\'') {
        (feet, 12.0)
    } else if let Some(inches) = trimmed.strip_suffix('"') {
        (inches, 1.0)
    } else {
        (trimmed, 1.0)
    };
    number
        .trim()
        .parse::<f64>()
        .map(|n| n * factor)
        .map_err(|_| ParamError::InvalidLength {
            field: field.to_owned(),
            value: value.to_owned(),
        })
}

pub fn parse_yes_no(field: &str, value: &str) -> Result<bool, ParamError> {
    match value.trim() {
        "Yes" | "yes" => Ok(true),
        "No" | "no" => Ok(false),
        other => Err(ParamError::UnknownChoice {
            field: field.to_owned(),
            value: other.to_owned(),
        }),
    }
}

pub fn parse_orientation(field: &str, value: &str) -> Result<Orientation, ParamError> {
    match value.trim() {
        "Up" | "up" => Ok(Orientation::Up),
        "Normal" | "normal" => Ok(Orientation::Normal),
        other => Err(ParamError::UnknownChoice {
            field: field.to_owned(),
            value: other.to_owned(),
        }),
    }
}
