//! All error types for the pocatalog crate.
//!
//! Parse errors carry the 1-based line number and the offending line text so
//! diagnostics can point at the exact spot in the source file.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unrecognized line at line {line}: {text:?}")]
    UnrecognizedLine { line: usize, text: String },

    #[error("unexpected {token} at line {line} in state {state}: {text:?}")]
    UnexpectedToken {
        token: &'static str,
        state: &'static str,
        line: usize,
        text: String,
    },

    #[error("incomplete entry at line {line}, ended in state {state}: {text:?}")]
    IncompleteEntry {
        state: &'static str,
        line: usize,
        text: String,
    },

    #[error("msgid at line {line} has no msgstr: {text:?}")]
    MissingTranslation { line: usize, text: String },

    #[error("continuation at line {line} outside any field: {text:?}")]
    ContinuationWithoutField { line: usize, text: String },

    #[error("continuation at line {line} is not fully quoted: {text:?}")]
    MalformedContinuation { line: usize, text: String },

    #[error("invalid plural indexes at line {line}: expected {expected} forms, got {found:?} for {text:?}")]
    PluralForms {
        line: usize,
        expected: usize,
        found: Vec<usize>,
        text: String,
    },

    #[error("invalid header field at line {line}: {detail}: {text:?}")]
    HeaderField {
        detail: String,
        line: usize,
        text: String,
    },

    #[error("unrecognized flag {flag:?} at line {line}: {text:?}")]
    UnrecognizedFlag {
        flag: String,
        line: usize,
        text: String,
    },
}

impl Error {
    /// The source line number this error points at, if it is a parse error.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Io(_) => None,
            Error::UnrecognizedLine { line, .. }
            | Error::UnexpectedToken { line, .. }
            | Error::IncompleteEntry { line, .. }
            | Error::MissingTranslation { line, .. }
            | Error::ContinuationWithoutField { line, .. }
            | Error::MalformedContinuation { line, .. }
            | Error::PluralForms { line, .. }
            | Error::HeaderField { line, .. }
            | Error::UnrecognizedFlag { line, .. } => Some(*line),
        }
    }

    /// The raw line text this error points at, if it is a parse error.
    pub fn source_text(&self) -> Option<&str> {
        match self {
            Error::Io(_) => None,
            Error::UnrecognizedLine { text, .. }
            | Error::UnexpectedToken { text, .. }
            | Error::IncompleteEntry { text, .. }
            | Error::MissingTranslation { text, .. }
            | Error::ContinuationWithoutField { text, .. }
            | Error::MalformedContinuation { text, .. }
            | Error::PluralForms { text, .. }
            | Error::HeaderField { text, .. }
            | Error::UnrecognizedFlag { text, .. } => Some(text),
        }
    }
}

/// A recorded parse failure for collect-and-continue parsing.
///
/// Each block that fails under the keep-going policy contributes one
/// diagnostic; the block itself yields no entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    /// 1-based line number the failure points at.
    pub line: usize,
    /// The raw line text at that position.
    pub text: String,
    /// Full human-readable description.
    pub message: String,
}

impl Diagnostic {
    pub fn from_error(error: &Error) -> Self {
        Diagnostic {
            line: error.line().unwrap_or(0),
            text: error.source_text().unwrap_or_default().to_string(),
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}
