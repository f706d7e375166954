//! CLI error types with exit code handling

use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;
use tomlate::TranslationError;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// The document could not be translated
    #[error("Translation failed: {message}")]
    #[diagnostic(code(tomlate::cli::translation))]
    Translation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(tomlate::cli::io))]
    Io { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Translation { .. } => exit_codes::TRANSLATION_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
        }
    }

    /// Create an IO error with file context
    pub fn io(context: &str, source: &std::io::Error) -> Self {
        Self::Io { message: format!("{context}: {source}") }
    }
}

impl From<TranslationError> for CliError {
    fn from(err: TranslationError) -> Self {
        let help = match &err {
            TranslationError::ProfileNotFound { available, .. } if available.is_empty() => {
                Some("no profiles are registered; check the installed extensions".to_string())
            }
            TranslationError::ProfileNotFound { available, .. } => {
                Some(format!("registered profiles: {}", available.join(", ")))
            }
            _ => None,
        };
        Self::Translation { message: error_chain(&err), help }
    }
}

/// Join an error with its source chain, outermost first
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        parts.push(cause.to_string());
        source = cause.source();
    }
    parts.join(": ")
}
