//! Profile-independent output clean-up tasks
//!
//! These run as default-active augmentations appended to the post chain of
//! whichever profile is selected, keeping the rendered TOML tidy regardless
//! of how the source document spaced its sections.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::BuildError;
use crate::profile::{Augmentation, Profile, TextProcessor};
use crate::translator::TranslatorBuilder;

static DUPLICATED_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{2,}").expect("static pattern"));
static TABLE_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\[").expect("static pattern"));

/// Builtin extension registering the clean-up tasks
pub fn activate(builder: &mut TranslatorBuilder) -> Result<(), BuildError> {
    builder.augment_profiles(post_process(
        "normalize_newlines",
        "Put exactly one blank line before every table header and none elsewhere",
        normalize_newlines,
    ))?;
    builder.augment_profiles(post_process(
        "ensure_terminating_newline",
        "End the document with a single terminating newline",
        ensure_terminating_newline,
    ))?;
    Ok(())
}

fn post_process(name: &'static str, help_text: &str, run: fn(String) -> String) -> Augmentation {
    Augmentation::new(name, help_text, true, move |profile: &mut Profile| {
        profile.add_post(TextProcessor::infallible(name, run));
    })
}

/// Collapse runs of blank lines, then reintroduce a single blank line before
/// each table header
pub fn normalize_newlines(text: String) -> String {
    let text = DUPLICATED_NEWLINES.replace_all(&text, "\n");
    let mut text = TABLE_HEADER.replace_all(&text, "\n[").into_owned();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text
}

/// POSIX tools expect text files to end with exactly one newline
pub fn ensure_terminating_newline(text: String) -> String {
    let mut text = text.trim().to_string();
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_runs_collapse() {
        let out = normalize_newlines("a = 1\n\n\nb = 2\n".to_string());
        assert_eq!(out, "a = 1\nb = 2\n");
    }

    #[test]
    fn test_blank_line_added_before_headers() {
        let out = normalize_newlines("a = 1\n[t]\nx = 1\n".to_string());
        assert_eq!(out, "a = 1\n\n[t]\nx = 1\n");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_newlines("# c\n\n\n[t] # hdr\nx = 1\n\n[u]\ny = 2\n".to_string());
        let twice = normalize_newlines(once.clone());
        // The leading blank inserted before a header at document start is the
        // one spot ensure_terminating_newline later strips
        assert_eq!(ensure_terminating_newline(twice), ensure_terminating_newline(once));
    }

    #[test]
    fn test_terminating_newline() {
        assert_eq!(ensure_terminating_newline("a = 1".to_string()), "a = 1\n");
        assert_eq!(ensure_terminating_newline("a = 1\n\n".to_string()), "a = 1\n");
    }
}
