//! Tomlate - INI/CFG to TOML translation with comment preservation
//!
//! The translation pipeline is a fixed, linear sequence:
//!
//! ```text
//! pre-process (text) -> parse -> process (tree) -> render -> post-process (text)
//! ```
//!
//! Source text flows through the selected profile's pre chain, is parsed into
//! the ordered, comment-bearing intermediate representation of
//! [`tomlate_core`], reshaped by the profile's intermediate chain, rendered
//! to TOML by [`tomlate_render`], and finished by the post chain. Which
//! functions sit in those chains is decided once, at startup: extensions
//! register profiles and augmentations through [`TranslatorBuilder`], and the
//! resulting [`Translator`] registry is immutable, so concurrent `translate`
//! calls need no locking.
//!
//! # Example
//!
//! ```
//! use tomlate::Translator;
//!
//! let translator = Translator::new();
//! let toml = translator.translate("[server]\nport = 8080\n", "default").unwrap();
//! assert!(toml.contains("port = \"8080\""));
//! ```
//!
//! Values keep their string form unless an intermediate processor coerces
//! them; the [`transforms`] module provides the usual building blocks.

pub mod error;
pub mod profile;
pub mod tasks;
pub mod transforms;
pub mod translator;

pub use error::{BoxError, BuildError, ProcessorError, Stage, TranslationError};
pub use profile::{Augmentation, IrProcessor, Profile, TextProcessor};
pub use translator::{DEFAULT_PROFILE, ReaderFn, Translator, TranslatorBuilder, WriterFn};

// The data model and the default collaborators, re-exported for extension
// authors
pub use tomlate_core::{
    Commented, CommentedKv, CommentedList, Entry, HiddenMarker, IntermediateRepr, Plain,
    ReprError, Scalar, StructuralError, Value,
};
pub use tomlate_ini::{ParseError, ParseOptions};
pub use tomlate_render::{RenderOptions, SerializationError};
