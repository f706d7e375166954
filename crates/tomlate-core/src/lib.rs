//! Tomlate Core - intermediate representation for INI to TOML translation
//!
//! This crate provides the data model shared by every stage of the
//! translation pipeline:
//! - `IntermediateRepr`: an ordered container mixing real key-value entries
//!   with hidden markers (comment and blank lines) so that source layout
//!   survives the trip through the pipeline
//! - `Value`/`Scalar`: the structural values stored under the keys
//! - `Commented`, `CommentedList`, `CommentedKv`: comment-bearing wrappers
//!   that group values the way they were laid out in the source document
//! - `Plain`: the comment-free projection produced by `flatten()`
//!
//! Nodes are created by a parser driver, reshaped by intermediate
//! processors, and consumed by a renderer; none of them outlive a single
//! translation call.

pub mod error;
pub mod repr;
pub mod value;

pub use error::{ReprError, StructuralError};
pub use repr::{Entry, HiddenMarker, IntermediateRepr};
pub use value::{Commented, CommentedKv, CommentedList, Group, Plain, Scalar, Value};
