//! Serialization error type

use thiserror::Error;

/// An intermediate representation value that cannot be legally written in
/// TOML
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Trailing and standalone comments occupy a single line; a comment with
    /// a line break has no valid spelling
    #[error("comment {comment:?} contains a line break")]
    InvalidComment { comment: String },

    /// A comment-only value under a real key has nothing to put on the right
    /// side of `=`
    #[error("value for key {key:?} carries a comment but no value")]
    CommentOnlyValue { key: String },

    /// In TOML, a key-value line following a `[sub.table]` header would
    /// belong to the sub-table, so it cannot express an entry of the parent
    #[error("key {key:?} cannot appear after a sub-table at the same level")]
    KeyAfterTable { key: String },
}

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, SerializationError>;
