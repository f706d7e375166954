//! Tree walk and shape decisions
//!
//! The renderer decides, independently for every table, whether it can be
//! written as a single-line inline value or needs its own `[section]` block,
//! prunes table subtrees that carry no real data, and emits everything else
//! at its stored position.

use tomlate_core::{CommentedKv, CommentedList, Entry, HiddenMarker, IntermediateRepr, Scalar, Value};
use tracing::trace;

use crate::error::{Result, SerializationError};
use crate::scalar::{format_key, format_path, format_scalar, format_scalar_inline};

/// Rendering thresholds
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Maximum number of entries a table may have and still be rendered as a
    /// single-line inline table
    pub inline_table_threshold: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { inline_table_threshold: 5 }
    }
}

/// Render an intermediate representation tree as TOML text with default
/// options
pub fn render(repr: &IntermediateRepr) -> Result<String> {
    render_with(repr, &RenderOptions::default())
}

/// Render an intermediate representation tree as TOML text.
///
/// Output is byte-identical across calls for identical input and options.
/// Pruning runs on a private copy; the caller's tree is never mutated.
pub fn render_with(repr: &IntermediateRepr, options: &RenderOptions) -> Result<String> {
    let mut pruned = repr.clone();
    prune(&mut pruned);
    let mut out = String::new();
    emit_table_body(&mut out, &pruned, &[], options)?;
    Ok(out)
}

/// Recursively remove table subtrees that (transitively) contain no real
/// key-value data, unless they are marked `always_emit`.
///
/// Re-running on already-pruned trees is a no-op.
pub fn prune(repr: &mut IntermediateRepr) {
    prune_node(repr);
}

fn prune_node(repr: &mut IntermediateRepr) -> bool {
    let table_keys: Vec<String> = repr
        .pairs()
        .filter(|(_, value)| matches!(value, Value::Table(_)))
        .map(|(key, _)| key.to_string())
        .collect();
    for key in table_keys {
        let keep = match repr.get_mut(&key) {
            Ok(Value::Table(child)) => prune_node(child),
            _ => true,
        };
        if !keep {
            trace!(key = %key, "pruning empty table");
            let _ = repr.remove(&key);
        }
    }
    repr.always_emit() || repr.pairs().next().is_some()
}

fn emit_table_body(
    out: &mut String,
    repr: &IntermediateRepr,
    path: &[String],
    options: &RenderOptions,
) -> Result<()> {
    let mut block_seen = false;
    for entry in repr.iter() {
        match entry {
            Entry::Hidden(HiddenMarker::Blank) => out.push('\n'),
            Entry::Hidden(HiddenMarker::Comment(text)) => {
                out.push_str(&standalone_comment(text)?);
                out.push('\n');
            }
            Entry::Pair { key, value } => {
                if is_block_value(value, options) {
                    block_seen = true;
                    emit_block(out, key, value, path, options)?;
                } else {
                    if block_seen {
                        return Err(SerializationError::KeyAfterTable { key: key.clone() });
                    }
                    emit_line(out, key, value, options)?;
                }
            }
        }
    }
    Ok(())
}

/// One `key = value` line, with any trailing comment the value carries
fn emit_line(
    out: &mut String,
    key: &str,
    value: &Value,
    options: &RenderOptions,
) -> Result<()> {
    let mut line = format!("{} = ", format_key(key));
    match value {
        Value::Scalar(scalar) => line.push_str(&format_scalar(scalar)),
        Value::Commented(commented) => {
            let scalar = commented.value().ok_or_else(|| {
                SerializationError::CommentOnlyValue { key: key.to_string() }
            })?;
            line.push_str(&format_scalar(scalar));
            push_trailing_comment(&mut line, commented.comment())?;
        }
        Value::List(list) => {
            if list.groups().len() > 1 {
                emit_multiline_array(out, &line, list)?;
                return Ok(());
            }
            line.push_str(&inline_array(list));
            let comment = list.groups().first().and_then(|g| g.comment());
            push_trailing_comment(&mut line, comment)?;
        }
        Value::Kv(kv) => {
            line.push_str(&inline_kv(kv));
            let comment = kv.groups().first().and_then(|g| g.comment());
            push_trailing_comment(&mut line, comment)?;
        }
        Value::Table(table) => {
            line.push_str(&inline_table(table, options)?);
            push_trailing_comment(&mut line, table.inline_comment())?;
        }
    }
    out.push_str(&line);
    out.push('\n');
    Ok(())
}

/// A multi-line array: one group per line, each with its own comment
fn emit_multiline_array(out: &mut String, prefix: &str, list: &CommentedList) -> Result<()> {
    out.push_str(prefix);
    out.push_str("[\n");
    for group in list.groups() {
        let values: Vec<String> =
            group.value().into_iter().flatten().map(format_scalar_inline).collect();
        let mut line = String::new();
        if !values.is_empty() {
            line.push_str("    ");
            line.push_str(&values.join(", "));
            line.push(',');
            push_trailing_comment(&mut line, group.comment())?;
        } else if group.has_comment() {
            line.push_str("    ");
            line.push_str(&standalone_comment(group.comment().unwrap_or_default())?);
        }
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("]\n");
    Ok(())
}

/// Block emission for values that cannot fit a single line: nested tables
/// with their own `[header]`, and grouped key-value lists rendered one pair
/// per line
fn emit_block(
    out: &mut String,
    key: &str,
    value: &Value,
    path: &[String],
    options: &RenderOptions,
) -> Result<()> {
    let mut child_path = path.to_vec();
    child_path.push(key.to_string());
    match value {
        Value::Table(table) => {
            let mut header = format!("[{}]", format_path(&child_path));
            push_trailing_comment(&mut header, table.inline_comment())?;
            out.push_str(&header);
            out.push('\n');
            emit_table_body(out, table, &child_path, options)
        }
        Value::Kv(kv) => {
            out.push_str(&format!("[{}]\n", format_path(&child_path)));
            emit_kv_body(out, kv)
        }
        // is_block_value only selects tables and grouped key-value lists
        _ => Ok(()),
    }
}

fn emit_kv_body(out: &mut String, kv: &CommentedKv) -> Result<()> {
    for group in kv.groups() {
        let pairs: Vec<(String, Scalar)> = group.value().cloned().unwrap_or_default();
        match pairs.split_last() {
            Some((last, init)) => {
                for (k, v) in init {
                    out.push_str(&format!("{} = {}\n", format_key(k), format_scalar(v)));
                }
                let (k, v) = last;
                let mut line = format!("{} = {}", format_key(k), format_scalar(v));
                push_trailing_comment(&mut line, group.comment())?;
                out.push_str(&line);
                out.push('\n');
            }
            None if group.has_comment() => {
                out.push_str(&standalone_comment(group.comment().unwrap_or_default())?);
                out.push('\n');
            }
            None => {}
        }
    }
    Ok(())
}

// =============================================================================
// SHAPE DECISIONS
// =============================================================================

/// Whether this value needs its own `[section]` block
fn is_block_value(value: &Value, options: &RenderOptions) -> bool {
    match value {
        Value::Scalar(_) | Value::Commented(_) | Value::List(_) => false,
        // A grouped key-value list with more than one group may never be
        // collapsed to an inline table, whatever its size
        Value::Kv(kv) => {
            kv.group_count() > 1 || kv.pair_count() > options.inline_table_threshold
        }
        Value::Table(table) => !table_inlineable(table, options),
    }
}

/// Whether a table can be rendered inline at its own `key = {...}` line.
/// Its own inline comment may trail the line, but nothing inside an inline
/// table can carry a comment or a blank line.
fn table_inlineable(table: &IntermediateRepr, options: &RenderOptions) -> bool {
    let has_hidden = table.iter().any(|e| matches!(e, Entry::Hidden(_)));
    if has_hidden || table.pairs().count() > options.inline_table_threshold {
        return false;
    }
    table.pairs().all(|(_, value)| nested_inline_ok(value, options))
}

/// Whether a value can appear inside an inline container, where trailing
/// comments are impossible at any depth
fn nested_inline_ok(value: &Value, options: &RenderOptions) -> bool {
    match value {
        Value::Scalar(_) => true,
        Value::Commented(commented) => {
            !commented.has_comment() && !commented.is_comment_only()
        }
        Value::List(list) => list.group_count() <= 1 && !list.has_comments(),
        Value::Kv(kv) => {
            kv.group_count() <= 1
                && !kv.has_comments()
                && kv.pair_count() <= options.inline_table_threshold
        }
        Value::Table(table) => {
            table.inline_comment().is_none() && table_inlineable(table, options)
        }
    }
}

// =============================================================================
// INLINE EMISSION
// =============================================================================

fn inline_array(list: &CommentedList) -> String {
    let values: Vec<String> = list.values().map(format_scalar_inline).collect();
    format!("[{}]", values.join(", "))
}

fn inline_kv(kv: &CommentedKv) -> String {
    let pairs: Vec<String> = kv
        .pairs()
        .map(|(k, v)| format!("{} = {}", format_key(k), format_scalar_inline(v)))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

fn inline_table(table: &IntermediateRepr, options: &RenderOptions) -> Result<String> {
    let mut parts = Vec::new();
    for (key, value) in table.pairs() {
        let rendered = match value {
            Value::Scalar(scalar) => format_scalar_inline(scalar),
            Value::Commented(commented) => {
                let scalar = commented.value().ok_or_else(|| {
                    SerializationError::CommentOnlyValue { key: key.to_string() }
                })?;
                format_scalar_inline(scalar)
            }
            Value::List(list) => inline_array(list),
            Value::Kv(kv) => inline_kv(kv),
            Value::Table(nested) => inline_table(nested, options)?,
        };
        parts.push(format!("{} = {}", format_key(key), rendered));
    }
    Ok(format!("{{{}}}", parts.join(", ")))
}

// =============================================================================
// COMMENTS
// =============================================================================

fn standalone_comment(text: &str) -> Result<String> {
    check_comment(text)?;
    if text.is_empty() {
        Ok("#".to_string())
    } else {
        Ok(format!("# {text}"))
    }
}

fn push_trailing_comment(line: &mut String, comment: Option<&str>) -> Result<()> {
    if let Some(text) = comment {
        check_comment(text)?;
        if !text.is_empty() {
            line.push_str(" # ");
            line.push_str(text);
        }
    }
    Ok(())
}

fn check_comment(text: &str) -> Result<()> {
    if text.contains('\n') || text.contains('\r') {
        return Err(SerializationError::InvalidComment { comment: text.to_string() });
    }
    Ok(())
}
