//! Reusable value and type casting transformations
//!
//! Building blocks for intermediate processors: they convert the raw string
//! values produced by the parser into structural values with a proper TOML
//! type, peeling off inline comments where the option layout allows it.
//!
//! Coercion is heuristic: the source format carries no type information, so
//! there is no guarantee the result matches the original author's intent.

use tomlate_core::{Commented, CommentedKv, CommentedList, Scalar, StructuralError};

/// Default comment prefixes recognized inside option values
pub const COMMENT_PREFIXES: [char; 2] = ['#', ';'];

pub fn is_true(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}

pub fn is_false(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "false" | "0" | "no" | "off" | "none" | "null" | "nil"
    )
}

/// Interpret the common INI spellings of booleans
pub fn coerce_bool(value: &str) -> Option<bool> {
    if is_true(value) {
        Some(true)
    } else if is_false(value) {
        Some(false)
    } else {
        None
    }
}

/// Guess a scalar type for a raw option value: integer, then float, then
/// boolean, falling back to the string itself
pub fn coerce_scalar(value: &str) -> Scalar {
    let value = value.trim();
    if let Ok(int) = value.parse::<i64>() {
        return Scalar::Int(int);
    }
    if let Ok(float) = value.parse::<f64>() {
        return Scalar::Float(float);
    }
    if is_true(value) {
        return Scalar::Bool(true);
    }
    if is_false(value) {
        return Scalar::Bool(false);
    }
    Scalar::Str(value.to_string())
}

pub fn kebab_case(field: &str) -> String {
    field.to_ascii_lowercase().replace('_', "-")
}

/// Strip the first matching prefix off `text`, trimming whitespace around
/// both the prefix and the remainder; text starting with none of the
/// prefixes is only trimmed
pub fn remove_prefixes<'a>(text: &'a str, prefixes: &[char]) -> &'a str {
    let text = text.trim();
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if prefixes.contains(&c) => chars.as_str().trim(),
        _ => text,
    }
}

/// Peel a trailing inline comment off a single-line value.
///
/// Multi-line values are left untouched: only whole-line analysis can tell a
/// comment from value content there.
pub fn split_comment(value: &str) -> Commented<String> {
    split_comment_with(value, &COMMENT_PREFIXES)
}

pub fn split_comment_with(value: &str, prefixes: &[char]) -> Commented<String> {
    let value = value.trim();
    if value.lines().count() > 1 || !value.contains(prefixes) {
        return Commented::new(value.to_string());
    }
    if value.starts_with(prefixes) {
        return Commented::comment_only(remove_prefixes(value, prefixes));
    }
    // Only the first prefix that occurs can be analysed
    let prefix = prefixes.iter().copied().find(|p| value.contains(*p));
    match prefix.and_then(|p| value.split_once(p)) {
        Some((content, comment)) => {
            Commented::with_comment(content.trim().to_string(), comment.trim().to_string())
        }
        None => Commented::new(value.to_string()),
    }
}

/// Like [`split_comment`], additionally coercing the value to a scalar
pub fn split_scalar(value: &str) -> Commented<Scalar> {
    split_comment(value).map(|s| coerce_scalar(&s))
}

/// Interpret a (potentially dangling) `sep`-separated list.
///
/// Each source line becomes one group so its trailing comment and line break
/// survive the conversion; values stay strings.
pub fn split_list(value: &str, sep: char) -> CommentedList {
    let prefixes: Vec<char> =
        COMMENT_PREFIXES.iter().copied().filter(|p| *p != sep).collect();
    let mut list = CommentedList::new();
    for line in value.trim().lines() {
        let commented = split_comment_with(line, &prefixes);
        let values: Vec<Scalar> = commented
            .value()
            .map(|content| {
                content
                    .split(sep)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| Scalar::Str(v.to_string()))
                    .collect()
            })
            .unwrap_or_default();
        list.push_line(values, commented.comment());
    }
    list
}

/// Interpret a (potentially dangling) list of `key_sep`-separated pairs,
/// `pair_sep`-separated within each line.
///
/// Fails when the same key appears twice, like any grouped key-value
/// construction.
pub fn split_kv_pairs(
    value: &str,
    key_sep: char,
    pair_sep: char,
) -> Result<CommentedKv, StructuralError> {
    let prefixes: Vec<char> = COMMENT_PREFIXES
        .iter()
        .copied()
        .filter(|p| *p != key_sep && *p != pair_sep)
        .collect();
    let mut kv = CommentedKv::new();
    for line in value.trim().lines() {
        let commented = split_comment_with(line, &prefixes);
        let mut pairs = Vec::new();
        if let Some(content) = commented.value() {
            for item in content.split(pair_sep) {
                if let Some((key, val)) = item.split_once(key_sep) {
                    pairs.push((key.trim().to_string(), Scalar::Str(val.trim().to_string())));
                }
            }
        }
        kv.push_line(pairs, commented.comment())?;
    }
    Ok(kv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_scalar_guesses() {
        assert_eq!(coerce_scalar("42"), Scalar::Int(42));
        assert_eq!(coerce_scalar("-7"), Scalar::Int(-7));
        assert_eq!(coerce_scalar("2.5"), Scalar::Float(2.5));
        assert_eq!(coerce_scalar("yes"), Scalar::Bool(true));
        assert_eq!(coerce_scalar("off"), Scalar::Bool(false));
        assert_eq!(coerce_scalar("plain text"), Scalar::Str("plain text".to_string()));
    }

    #[test]
    fn test_coerce_bool_spellings() {
        assert_eq!(coerce_bool("True"), Some(true));
        assert_eq!(coerce_bool("ON"), Some(true));
        assert_eq!(coerce_bool("0"), Some(false));
        assert_eq!(coerce_bool("nil"), Some(false));
        assert_eq!(coerce_bool("maybe"), None);
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("Home_Page"), "home-page");
    }

    #[test]
    fn test_remove_prefixes_strips_one_prefix() {
        assert_eq!(remove_prefixes("# note", &COMMENT_PREFIXES), "note");
        assert_eq!(remove_prefixes("  ; note  ", &COMMENT_PREFIXES), "note");
        assert_eq!(remove_prefixes("## note", &COMMENT_PREFIXES), "# note");
        assert_eq!(remove_prefixes("plain", &COMMENT_PREFIXES), "plain");
    }

    #[test]
    fn test_split_comment_variants() {
        assert_eq!(split_comment("plain"), Commented::new("plain".to_string()));
        assert_eq!(
            split_comment("value # note"),
            Commented::with_comment("value".to_string(), "note".to_string())
        );
        assert_eq!(split_comment("# only"), Commented::comment_only("only"));
        // Multi-line values are not analysed for inline comments
        assert_eq!(
            split_comment("first # x\nsecond"),
            Commented::new("first # x\nsecond".to_string())
        );
    }

    #[test]
    fn test_split_scalar_coerces_and_keeps_comment() {
        let commented = split_scalar("42 # answer");
        assert_eq!(commented.value(), Some(&Scalar::Int(42)));
        assert_eq!(commented.comment(), Some("answer"));
    }

    #[test]
    fn test_split_list_dangling_lines() {
        let list = split_list("alpha>=1.0 # pinned\nbeta, gamma", ',');
        assert_eq!(list.group_count(), 2);
        let values: Vec<_> = list.values().cloned().collect();
        assert_eq!(
            values,
            vec![
                Scalar::Str("alpha>=1.0".to_string()),
                Scalar::Str("beta".to_string()),
                Scalar::Str("gamma".to_string()),
            ]
        );
        assert_eq!(list.groups()[0].comment(), Some("pinned"));
    }

    #[test]
    fn test_split_list_single_line() {
        let list = split_list("a, b, c", ',');
        assert_eq!(list.group_count(), 1);
        assert_eq!(list.values().count(), 3);
    }

    #[test]
    fn test_split_kv_pairs_dangling_lines() {
        let kv = split_kv_pairs("x = 1 # first\ny = 2, z = 3", '=', ',').unwrap();
        assert_eq!(kv.group_count(), 2);
        assert_eq!(kv.find("z"), Some((1, 1)));
        assert_eq!(kv.groups()[0].comment(), Some("first"));
    }

    #[test]
    fn test_split_kv_pairs_rejects_duplicates() {
        let err = split_kv_pairs("x = 1\nx = 2", '=', ',').unwrap_err();
        assert_eq!(err, StructuralError::DuplicateKey { key: "x".to_string() });
    }
}
