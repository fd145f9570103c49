use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::code_block::is_indent_whitespace;

pub const DEFAULT_INDENT_SEQUENCE: &str = "\t";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("indent sequence may only contain spaces and tabs, found {0:?}")]
    InvalidIndentChar(char),
    #[error("indent sequence must be `false` or a string of spaces and tabs, not `true`")]
    MissingIndentText,
    #[error("invalid editor config: {0}")]
    Json(#[from] serde_json::Error),
}

/// One indentation unit for code block lines.
///
/// In JSON this is either `false` (indentation turned off) or the literal
/// sequence, e.g. `"\t"` or `"    "`. An empty string also turns it off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIndentSequence", into = "RawIndentSequence")]
pub enum IndentSequence {
    Disabled,
    Text(String),
}

impl IndentSequence {
    pub fn new(text: impl Into<String>) -> Result<Self, ConfigError> {
        let text = text.into();
        if text.is_empty() {
            return Ok(Self::Disabled);
        }
        if let Some(ch) = text.chars().find(|ch| !is_indent_whitespace(*ch)) {
            return Err(ConfigError::InvalidIndentChar(ch));
        }
        Ok(Self::Text(text))
    }

    pub fn tab() -> Self {
        Self::Text(DEFAULT_INDENT_SEQUENCE.to_string())
    }

    pub fn spaces(count: usize) -> Self {
        if count == 0 {
            return Self::Disabled;
        }
        Self::Text(" ".repeat(count))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Disabled => None,
            Self::Text(text) => Some(text),
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

impl Default for IndentSequence {
    fn default() -> Self {
        Self::tab()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawIndentSequence {
    Flag(bool),
    Text(String),
}

impl TryFrom<RawIndentSequence> for IndentSequence {
    type Error = ConfigError;

    fn try_from(raw: RawIndentSequence) -> Result<Self, Self::Error> {
        match raw {
            RawIndentSequence::Flag(false) => Ok(Self::Disabled),
            RawIndentSequence::Flag(true) => Err(ConfigError::MissingIndentText),
            RawIndentSequence::Text(text) => Self::new(text),
        }
    }
}

impl From<IndentSequence> for RawIndentSequence {
    fn from(value: IndentSequence) -> Self {
        match value {
            IndentSequence::Disabled => RawIndentSequence::Flag(false),
            IndentSequence::Text(text) => RawIndentSequence::Text(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub indent_sequence: IndentSequence,
}

impl EditorConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn with_indent_sequence(mut self, indent_sequence: IndentSequence) -> Self {
        self.indent_sequence = indent_sequence;
        self
    }
}
