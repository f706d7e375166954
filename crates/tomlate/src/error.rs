//! Translation error taxonomy
//!
//! Everything surfaces to the caller of `translate`; nothing is swallowed or
//! retried. Chain failures carry enough context (profile, stage, function)
//! to localize the fault without re-running with tracing enabled.

use std::fmt;

use thiserror::Error;

/// Boxed error cause carried across the pipeline boundaries
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The chain a processor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Pre,
    Intermediate,
    Post,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Pre => "pre",
            Stage::Intermediate => "intermediate",
            Stage::Post => "post",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A registered chain function failed
#[derive(Debug, Error)]
#[error("processor {function:?} (#{index}) failed in the {stage} chain of profile {profile:?}")]
pub struct ProcessorError {
    /// Profile selected for the translation call
    pub profile: String,
    /// Which of the three chains the function belonged to
    pub stage: Stage,
    /// Registered name of the offending function
    pub function: String,
    /// Position of the function within its chain
    pub index: usize,
    #[source]
    pub source: BoxError,
}

/// Error raised by `translate`
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("profile {name:?} is not registered and no default profile is available (available: {available:?})")]
    ProfileNotFound { name: String, available: Vec<String> },

    #[error(transparent)]
    Processor(#[from] ProcessorError),

    #[error("failed to parse the source document")]
    Parse(#[source] BoxError),

    #[error("failed to serialize the document")]
    Serialization(#[source] BoxError),
}

/// Error raised while assembling the translator registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("augmentation name {name:?} is not a valid identifier")]
    InvalidAugmentationName { name: String },

    #[error("augmentation {name:?} is already registered")]
    AugmentationExists { name: String },
}
