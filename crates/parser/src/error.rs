//! Parser error types.

use makespan_core::MakespanError;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::span::Span;

/// Error type for parsing failures.
#[derive(Debug, Error, Diagnostic)]
#[error("Parse error on line {line}: {message}")]
#[diagnostic(
    code(makespan::parser::error),
    help("each task is four lines: name, duration, group (may be blank), dependencies (may be blank)")
)]
pub struct ParseError {
    pub message: String,

    /// Line number of the offending input (1-based).
    pub line: u32,

    #[source_code]
    pub src: String,

    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl ParseError {
    /// Labels the text covered by `at`, at least one character wide.
    pub fn at(message: impl Into<String>, src: &str, at: Span) -> Self {
        let start = at.location_offset().min(src.len());
        let len = at.fragment().len().max(1);
        let end = (start + len).min(src.len());
        Self {
            message: message.into(),
            line: at.location_line(),
            src: src.to_string(),
            span: Some(SourceSpan::from(start..end)),
        }
    }

    pub fn eof(message: impl Into<String>, src: &str) -> Self {
        let line = src.lines().count().max(1) as u32;
        Self {
            message: message.into(),
            line,
            src: src.to_string(),
            span: Some(SourceSpan::from(src.len().saturating_sub(1)..src.len())),
        }
    }
}

impl From<ParseError> for MakespanError {
    fn from(err: ParseError) -> Self {
        MakespanError::Parse {
            message: err.message,
            line: err.line,
        }
    }
}
