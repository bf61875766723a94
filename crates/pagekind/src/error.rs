// ABOUTME: Error types for page classification.
// ABOUTME: ParseFailure carries the parser message, BrokenInput rejects text that is not HTML at all.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while classifying a page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The HTML could not be turned into a usable tree.
    #[error("failed to parse html: {0}")]
    ParseFailure(String),

    /// The input holds characters no HTML document may contain.
    #[error("broken page or decode issue: {0}")]
    BrokenInput(String),
}

impl ClassifyError {
    /// Creates a ParseFailure from an underlying parser or cleaner message.
    pub fn parse(err: impl fmt::Display) -> Self {
        ClassifyError::ParseFailure(err.to_string())
    }

    /// Creates a BrokenInput for text rejected before parsing.
    pub fn broken(err: impl fmt::Display) -> Self {
        ClassifyError::BrokenInput(err.to_string())
    }

    /// Returns true if this is a ParseFailure.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, ClassifyError::ParseFailure(_))
    }

    pub fn is_broken_input(&self) -> bool {
        matches!(self, ClassifyError::BrokenInput(_))
    }

    /// The underlying parser or cleaner message.
    pub fn reason(&self) -> &str {
        match self {
            ClassifyError::ParseFailure(reason) | ClassifyError::BrokenInput(reason) => reason,
        }
    }
}

/// Result alias for classification operations.
pub type Result<T> = std::result::Result<T, ClassifyError>;
