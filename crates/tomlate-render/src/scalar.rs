//! Scalar and key literal formatting
//!
//! Every choice here is fixed by the TOML grammar plus a deterministic rule
//! for picking among equivalent spellings: strings use basic (escaped) form,
//! switching to multi-line basic form only for strings containing line breaks
//! in positions where TOML allows it.

use tomlate_core::Scalar;

/// Format a key: bare when the characters allow it, quoted otherwise
pub fn format_key(key: &str) -> String {
    let bare = !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare { key.to_string() } else { quote_single_line(key) }
}

/// Format a dotted table header path
pub fn format_path(path: &[String]) -> String {
    path.iter().map(|p| format_key(p)).collect::<Vec<_>>().join(".")
}

/// Format a scalar in block position (a `key = value` line of a table),
/// where multi-line strings are legal
pub fn format_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Str(s) if s.contains('\n') => quote_multiline(s),
        Scalar::Str(s) => quote_single_line(s),
        Scalar::Int(i) => i.to_string(),
        Scalar::Float(f) => format_float(*f),
        Scalar::Bool(b) => b.to_string(),
    }
}

/// Format a scalar inside an inline array or inline table, where raw line
/// breaks are not legal and must be escaped
pub fn format_scalar_inline(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Str(s) => quote_single_line(s),
        other => format_scalar(other),
    }
}

fn format_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        if f.is_sign_negative() { "-inf".to_string() } else { "inf".to_string() }
    } else if f.fract() == 0.0 {
        // A bare integral spelling would re-parse as an integer
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

fn quote_single_line(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn quote_multiline(s: &str) -> String {
    // A leading newline right after the opening quotes is stripped by TOML
    // parsers, so adding one keeps the first content line aligned.
    let mut out = String::with_capacity(s.len() + 8);
    out.push_str("\"\"\"\n");
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\n' | '\t' => out.push(c),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push_str("\"\"\"");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_and_quoted_keys() {
        assert_eq!(format_key("option1"), "option1");
        assert_eq!(format_key("license-file"), "license-file");
        assert_eq!(format_key("a_b2"), "a_b2");
        assert_eq!(format_key("has space"), "\"has space\"");
        assert_eq!(format_key("dotted.name"), "\"dotted.name\"");
        assert_eq!(format_key(""), "\"\"");
    }

    #[test]
    fn test_path_join() {
        let path = vec!["tool".to_string(), "my plugin".to_string()];
        assert_eq!(format_path(&path), "tool.\"my plugin\"");
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(format_scalar(&Scalar::Str("plain".into())), "\"plain\"");
        assert_eq!(format_scalar(&Scalar::Str("say \"hi\"".into())), "\"say \\\"hi\\\"\"");
        assert_eq!(format_scalar(&Scalar::Str("back\\slash".into())), "\"back\\\\slash\"");
        assert_eq!(format_scalar(&Scalar::Str("tab\there".into())), "\"tab\\there\"");
    }

    #[test]
    fn test_multiline_string_in_block_position() {
        assert_eq!(
            format_scalar(&Scalar::Str("first\nsecond".into())),
            "\"\"\"\nfirst\nsecond\"\"\""
        );
    }

    #[test]
    fn test_multiline_string_escapes_quotes() {
        assert_eq!(
            format_scalar(&Scalar::Str("a \"\"\" b\nc".into())),
            "\"\"\"\na \\\"\\\"\\\" b\nc\"\"\""
        );
    }

    #[test]
    fn test_inline_position_escapes_newlines() {
        assert_eq!(
            format_scalar_inline(&Scalar::Str("first\nsecond".into())),
            "\"first\\nsecond\""
        );
    }

    #[test]
    fn test_numbers_and_bools() {
        assert_eq!(format_scalar(&Scalar::Int(42)), "42");
        assert_eq!(format_scalar(&Scalar::Int(-7)), "-7");
        assert_eq!(format_scalar(&Scalar::Bool(true)), "true");
        assert_eq!(format_scalar(&Scalar::Bool(false)), "false");
    }

    #[test]
    fn test_floats_always_reparse_as_floats() {
        assert_eq!(format_scalar(&Scalar::Float(1.0)), "1.0");
        assert_eq!(format_scalar(&Scalar::Float(2.5)), "2.5");
        assert_eq!(format_scalar(&Scalar::Float(-3.0)), "-3.0");
        assert_eq!(format_scalar(&Scalar::Float(f64::INFINITY)), "inf");
        assert_eq!(format_scalar(&Scalar::Float(f64::NEG_INFINITY)), "-inf");
        assert_eq!(format_scalar(&Scalar::Float(f64::NAN)), "nan");
    }
}
