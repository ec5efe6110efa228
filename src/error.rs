//! The single error type raised by every entry point in this crate.
//!
//! Mirrors the `SassFormatException` contract from the host spec: one
//! primary span, an optional set of secondary spans with their own labels,
//! and nothing else -- the parser never attempts recovery, so there is
//! never more than one error in flight.

use codemap::Span;
use thiserror::Error;

/// A parse failure with a primary span and, optionally, secondary spans
/// that help explain it (e.g. "opened here" pointing at an unmatched
/// bracket).
#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct SassError {
    pub message: String,
    pub span: Span,
    pub secondary_spans: Vec<(Span, String)>,
}

pub type SassResult<T> = Result<T, SassError>;

impl SassError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        SassError {
            message: message.into(),
            span,
            secondary_spans: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_secondary(mut self, span: Span, label: impl Into<String>) -> Self {
        self.secondary_spans.push((span, label.into()));
        self
    }
}

impl From<(&str, Span)> for SassError {
    fn from((message, span): (&str, Span)) -> Self {
        SassError::new(message, span)
    }
}

impl From<(String, Span)> for SassError {
    fn from((message, span): (String, Span)) -> Self {
        SassError::new(message, span)
    }
}
