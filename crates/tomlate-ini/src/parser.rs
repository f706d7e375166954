//! Line-oriented INI/CFG parser
//!
//! Produces an `IntermediateRepr` that records everything the renderer needs
//! to reproduce the source layout: sections become nested tables (with the
//! header's trailing comment attached), options become string scalars, and
//! full-line comments and blank lines become hidden markers at their exact
//! position.
//!
//! Parsing rules:
//! - a line whose first non-blank character is a comment prefix is a
//!   standalone comment, regardless of indentation
//! - an indented line continues the value of the option above it; the parts
//!   are joined with a line break
//! - text after the option value (including an inline comment) stays part of
//!   the value; only section headers get their trailing comment split off
//! - options keep the exact case and spelling of their keys
//!
//! Unsupported source features fail fast instead of being silently merged:
//! duplicate sections, duplicate options, options before the first section
//! header, and `%(...)s` interpolation are all hard errors.

use tomlate_core::{HiddenMarker, IntermediateRepr, Scalar, Value};

use crate::error::{ParseError, Result};

/// Syntax options for parsing INI/CFG text
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Characters starting a comment (default `#` and `;`)
    pub comment_prefixes: Vec<char>,
    /// Characters separating option keys from values (default `=` and `:`)
    pub delimiters: Vec<char>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { comment_prefixes: vec!['#', ';'], delimiters: vec!['=', ':'] }
    }
}

/// Parse INI text with the default syntax options
pub fn parse(text: &str) -> Result<IntermediateRepr> {
    parse_with(text, &ParseOptions::default())
}

/// Parse INI text into an intermediate representation
pub fn parse_with(text: &str, options: &ParseOptions) -> Result<IntermediateRepr> {
    Parser::new(options).run(text)
}

struct Parser<'o> {
    options: &'o ParseOptions,
    root: IntermediateRepr,
    section: Option<(String, IntermediateRepr)>,
    open_option: Option<String>,
}

impl<'o> Parser<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        Self { options, root: IntermediateRepr::new(), section: None, open_option: None }
    }

    fn run(mut self, text: &str) -> Result<IntermediateRepr> {
        for (i, line) in text.lines().enumerate() {
            self.line(i + 1, line)?;
        }
        self.flush_section();
        Ok(self.root)
    }

    fn line(&mut self, number: usize, line: &str) -> Result<()> {
        let content = line.trim();
        if content.is_empty() {
            self.open_option = None;
            self.container().add_hidden(HiddenMarker::Blank);
            return Ok(());
        }
        if let Some(text) = self.strip_comment(content) {
            self.open_option = None;
            self.container().add_hidden(HiddenMarker::Comment(text.to_string()));
            return Ok(());
        }
        if line.starts_with([' ', '\t']) {
            return self.continuation(number, content);
        }
        if let Some(rest) = content.strip_prefix('[') {
            return self.header(number, rest, content);
        }
        self.option(number, content)
    }

    fn continuation(&mut self, number: usize, content: &str) -> Result<()> {
        let Some(key) = self.open_option.clone() else {
            return Err(ParseError::DanglingContinuation { line: number });
        };
        self.check_interpolation(number, content)?;
        if let Ok(Value::Scalar(Scalar::Str(value))) = self.container().get_mut(&key) {
            if value.is_empty() {
                value.push_str(content);
            } else {
                value.push('\n');
                value.push_str(content);
            }
        }
        Ok(())
    }

    fn header(&mut self, number: usize, rest: &str, content: &str) -> Result<()> {
        let Some(end) = rest.find(']') else {
            return Err(ParseError::InvalidLine { line: number, content: content.to_string() });
        };
        let name = rest[..end].trim();
        if name.is_empty() {
            return Err(ParseError::InvalidLine { line: number, content: content.to_string() });
        }
        let tail = rest[end + 1..].trim();
        let inline_comment = if tail.is_empty() {
            None
        } else {
            match self.strip_comment(tail) {
                Some(text) => Some(text.to_string()),
                None => {
                    return Err(ParseError::InvalidLine {
                        line: number,
                        content: content.to_string(),
                    });
                }
            }
        };

        self.flush_section();
        if self.root.contains_key(name) {
            return Err(ParseError::DuplicateSection { name: name.to_string(), line: number });
        }
        let mut repr = IntermediateRepr::new();
        if let Some(comment) = inline_comment {
            repr.set_inline_comment(comment);
        }
        self.section = Some((name.to_string(), repr));
        self.open_option = None;
        Ok(())
    }

    fn option(&mut self, number: usize, content: &str) -> Result<()> {
        let delimiters = self.options.delimiters.as_slice();
        let Some(at) = content.find(delimiters) else {
            return Err(ParseError::InvalidLine { line: number, content: content.to_string() });
        };
        let key = content[..at].trim();
        if key.is_empty() {
            return Err(ParseError::InvalidLine { line: number, content: content.to_string() });
        }
        let delimiter_len = content[at..].chars().next().map_or(1, char::len_utf8);
        let value = content[at + delimiter_len..].trim();
        self.check_interpolation(number, value)?;

        let Some((name, section)) = self.section.as_mut() else {
            return Err(ParseError::OptionOutsideSection { key: key.to_string(), line: number });
        };
        if section.contains_key(key) {
            return Err(ParseError::DuplicateOption {
                key: key.to_string(),
                section: name.clone(),
                line: number,
            });
        }
        section.set(key, Scalar::Str(value.to_string()));
        self.open_option = Some(key.to_string());
        Ok(())
    }

    fn container(&mut self) -> &mut IntermediateRepr {
        match self.section.as_mut() {
            Some((_, section)) => section,
            None => &mut self.root,
        }
    }

    fn flush_section(&mut self) {
        if let Some((name, repr)) = self.section.take() {
            self.root.set(name, Value::Table(repr));
        }
    }

    fn strip_comment<'a>(&self, content: &'a str) -> Option<&'a str> {
        let mut chars = content.chars();
        let first = chars.next()?;
        if self.options.comment_prefixes.contains(&first) {
            Some(chars.as_str().trim())
        } else {
            None
        }
    }

    fn check_interpolation(&self, number: usize, value: &str) -> Result<()> {
        if value.contains("%(") {
            return Err(ParseError::Interpolation { line: number, value: value.to_string() });
        }
        Ok(())
    }
}
