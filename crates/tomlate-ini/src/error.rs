//! Parser error type
//!
//! Every variant carries the 1-based source line so the fault can be located
//! without re-running with tracing enabled.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: section {name:?} is declared more than once")]
    DuplicateSection { name: String, line: usize },

    #[error("line {line}: option {key:?} is declared more than once in section {section:?}")]
    DuplicateOption { key: String, section: String, line: usize },

    #[error("line {line}: option {key:?} appears before any section header")]
    OptionOutsideSection { key: String, line: usize },

    #[error("line {line}: value interpolation is not supported: {value:?}")]
    Interpolation { line: usize, value: String },

    #[error("line {line}: continuation line without an option to continue")]
    DanglingContinuation { line: usize },

    #[error("line {line}: expected a section header or `key = value`, found {content:?}")]
    InvalidLine { line: usize, content: String },
}

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;
