//! Error types for the intermediate representation

use thiserror::Error;

/// Misuse of the ordered container API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReprError {
    #[error("key {0:?} not found")]
    KeyNotFound(String),

    #[error("key {0:?} already exists")]
    DuplicateKey(String),

    #[error("index {index} out of range for container of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Malformed structural value construction
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// The same key appears in more than one position across the groups of a
    /// grouped key-value list.
    #[error("duplicate key {key:?} across value groups")]
    DuplicateKey { key: String },
}

/// Result type for container operations
pub type Result<T> = std::result::Result<T, ReprError>;
