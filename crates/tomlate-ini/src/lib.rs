//! Tomlate INI - structure-preserving INI/CFG parser
//!
//! The parser driver consumed by the translator: it reads INI/CFG text into
//! the `tomlate-core` intermediate representation without losing comments,
//! blank lines, or ordering, and rejects source documents that use features
//! the translation cannot faithfully express (duplicate sections or options,
//! value interpolation).

pub mod error;
pub mod parser;

pub use error::ParseError;
pub use parser::{ParseOptions, parse, parse_with};
