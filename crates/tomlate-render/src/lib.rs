//! Tomlate Render - deterministic TOML emission
//!
//! Turns an `IntermediateRepr` tree into TOML text while reproducing the
//! comments, blank lines, and grouping recorded in the tree:
//!
//! - scalars pick one fixed spelling per runtime type
//! - every table independently becomes inline (`key = {...}`) or a block
//!   `[section]`, based on grouping, comments, and a size threshold
//! - grouped lists render one group per line, each with its own trailing
//!   comment
//! - table subtrees carrying no real data are pruned before emission unless
//!   explicitly marked `always_emit`
//!
//! For a fixed tree and fixed `RenderOptions`, the output is byte-identical
//! across invocations.

pub mod error;
pub mod render;
pub mod scalar;

pub use error::{Result, SerializationError};
pub use render::{RenderOptions, prune, render, render_with};
pub use scalar::{format_key, format_scalar};
