//! Ordered, comment-preserving container
//!
//! `IntermediateRepr` is the node type of the intermediate representation: an
//! ordered sequence of keyed entries interleaved with hidden markers (comment
//! lines and blank lines) that only exist to preserve the source layout.
//! Real keys are unique per container level; hidden markers repeat freely.

use indexmap::IndexMap;

use crate::error::{ReprError, Result};
use crate::value::{Plain, Value};

/// A layout-preserving pseudo-entry carrying no real data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HiddenMarker {
    /// A standalone comment line (text without the comment prefix)
    Comment(String),
    /// A blank line
    Blank,
}

/// One stored entry: a real key-value pair or a hidden marker
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Pair { key: String, value: Value },
    Hidden(HiddenMarker),
}

impl Entry {
    /// The real key of this entry, if it has one
    pub fn key(&self) -> Option<&str> {
        match self {
            Entry::Pair { key, .. } => Some(key),
            Entry::Hidden(_) => None,
        }
    }
}

/// An ordered mapping node of the intermediate representation.
///
/// Iteration yields entries (hidden markers included) in stored order, which
/// equals insertion order unless changed through `insert` or `rename`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntermediateRepr {
    entries: Vec<Entry>,
    inline_comment: Option<String>,
    always_emit: bool,
}

impl IntermediateRepr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comment attached to this container's own header line
    pub fn inline_comment(&self) -> Option<&str> {
        self.inline_comment.as_deref()
    }

    pub fn set_inline_comment(&mut self, comment: impl Into<String>) {
        self.inline_comment = Some(comment.into());
    }

    /// Whether the renderer must keep this table even when it carries no
    /// real data (see the pruning rules of the serializer)
    pub fn always_emit(&self) -> bool {
        self.always_emit
    }

    pub fn mark_always_emit(&mut self) {
        self.always_emit = true;
    }

    /// Number of stored entries, hidden markers included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Position of `key` among the stored entries, hidden markers counted
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.position(key)
    }

    pub fn get(&self, key: &str) -> Result<&Value> {
        match self.position(key) {
            Some(i) => match &self.entries[i] {
                Entry::Pair { value, .. } => Ok(value),
                Entry::Hidden(_) => unreachable!("position only matches real keys"),
            },
            None => Err(ReprError::KeyNotFound(key.to_string())),
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut Value> {
        match self.position(key) {
            Some(i) => match &mut self.entries[i] {
                Entry::Pair { value, .. } => Ok(value),
                Entry::Hidden(_) => unreachable!("position only matches real keys"),
            },
            None => Err(ReprError::KeyNotFound(key.to_string())),
        }
    }

    /// Replace the value stored under `key` in place, or append a new entry
    /// at the end when the key is absent
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => self.entries[i] = Entry::Pair { key, value },
            None => self.entries.push(Entry::Pair { key, value }),
        }
    }

    /// Insert a new entry at `index`, shifting subsequent entries
    pub fn insert(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<()> {
        let key = key.into();
        if self.contains_key(&key) {
            return Err(ReprError::DuplicateKey(key));
        }
        if index > self.entries.len() {
            return Err(ReprError::IndexOutOfRange { index, len: self.entries.len() });
        }
        self.entries.insert(index, Entry::Pair { key, value: value.into() });
        Ok(())
    }

    /// Rename an existing key, keeping its position and value.
    ///
    /// Renaming a key to itself is a no-op.
    pub fn rename(&mut self, old_key: &str, new_key: impl Into<String>) -> Result<()> {
        let new_key = new_key.into();
        if old_key == new_key {
            return Ok(());
        }
        if self.contains_key(&new_key) {
            return Err(ReprError::DuplicateKey(new_key));
        }
        match self.position(old_key) {
            Some(i) => {
                if let Entry::Pair { key, .. } = &mut self.entries[i] {
                    *key = new_key;
                }
                Ok(())
            }
            None => Err(ReprError::KeyNotFound(old_key.to_string())),
        }
    }

    /// Remove the entry stored under `key`, returning its value. The relative
    /// order of the remaining entries is untouched.
    pub fn remove(&mut self, key: &str) -> Result<Value> {
        match self.position(key) {
            Some(i) => match self.entries.remove(i) {
                Entry::Pair { value, .. } => Ok(value),
                Entry::Hidden(_) => unreachable!("position only matches real keys"),
            },
            None => Err(ReprError::KeyNotFound(key.to_string())),
        }
    }

    /// Append a hidden marker at the end
    pub fn add_hidden(&mut self, marker: HiddenMarker) {
        self.entries.push(Entry::Hidden(marker));
    }

    /// Insert a hidden marker at `index`, shifting subsequent entries
    pub fn insert_hidden(&mut self, index: usize, marker: HiddenMarker) -> Result<()> {
        if index > self.entries.len() {
            return Err(ReprError::IndexOutOfRange { index, len: self.entries.len() });
        }
        self.entries.insert(index, Entry::Hidden(marker));
        Ok(())
    }

    /// Iterate over all stored entries, hidden markers included
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Iterate over the real key-value pairs only
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().filter_map(|entry| match entry {
            Entry::Pair { key, value } => Some((key.as_str(), value)),
            Entry::Hidden(_) => None,
        })
    }

    /// Iterate over the real keys only
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs().map(|(k, _)| k)
    }

    /// Strip all comments, grouping, and hidden markers, returning the plain
    /// ordered mapping
    pub fn flatten(&self) -> Plain {
        let mut map = IndexMap::new();
        for (key, value) in self.pairs() {
            if let Some(plain) = value.flatten() {
                map.insert(key.to_string(), plain);
            }
        }
        Plain::Map(map)
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key() == Some(key))
    }
}

impl<'a> IntoIterator for &'a IntermediateRepr {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Commented, Scalar};

    fn keys_of(repr: &IntermediateRepr) -> Vec<String> {
        repr.keys().map(str::to_string).collect()
    }

    #[test]
    fn test_set_then_get() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        assert_eq!(repr.get("a").unwrap(), &Value::Scalar(Scalar::Int(1)));
    }

    #[test]
    fn test_get_missing_key() {
        let repr = IntermediateRepr::new();
        assert_eq!(repr.get("a"), Err(ReprError::KeyNotFound("a".to_string())));
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        repr.set("b", 2);
        repr.set("a", 10);
        assert_eq!(keys_of(&repr), vec!["a", "b"]);
        assert_eq!(repr.get("a").unwrap(), &Value::Scalar(Scalar::Int(10)));
    }

    #[test]
    fn test_sequential_inserts_preserve_order() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        repr.add_hidden(HiddenMarker::Comment("between".to_string()));
        repr.set("b", 2);
        repr.set("c", 3);
        assert_eq!(keys_of(&repr), vec!["a", "b", "c"]);
        let kinds: Vec<bool> = repr.iter().map(|e| matches!(e, Entry::Hidden(_))).collect();
        assert_eq!(kinds, vec![false, true, false, false]);
    }

    #[test]
    fn test_insert_at_position() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        repr.set("c", 3);
        repr.insert(1, "b", 2).unwrap();
        assert_eq!(keys_of(&repr), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_existing_key_fails() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        assert_eq!(repr.insert(0, "a", 2), Err(ReprError::DuplicateKey("a".to_string())));
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        assert_eq!(
            repr.insert(5, "b", 2),
            Err(ReprError::IndexOutOfRange { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_rename_preserves_position_and_value() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        repr.set("b", 2);
        repr.set("c", 3);
        repr.rename("b", "bb").unwrap();
        assert_eq!(keys_of(&repr), vec!["a", "bb", "c"]);
        assert_eq!(repr.get("bb").unwrap(), &Value::Scalar(Scalar::Int(2)));
    }

    #[test]
    fn test_rename_to_existing_key_fails() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        repr.set("b", 2);
        assert_eq!(repr.rename("a", "b"), Err(ReprError::DuplicateKey("b".to_string())));
    }

    #[test]
    fn test_rename_missing_key_fails() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        assert_eq!(repr.rename("x", "y"), Err(ReprError::KeyNotFound("x".to_string())));
    }

    #[test]
    fn test_rename_to_itself_is_noop() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        repr.rename("a", "a").unwrap();
        assert_eq!(keys_of(&repr), vec!["a"]);
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        repr.set("b", 2);
        repr.set("c", 3);
        let removed = repr.remove("b").unwrap();
        assert_eq!(removed, Value::Scalar(Scalar::Int(2)));
        assert_eq!(keys_of(&repr), vec!["a", "c"]);
        assert_eq!(repr.remove("b"), Err(ReprError::KeyNotFound("b".to_string())));
    }

    #[test]
    fn test_index_of_counts_hidden_entries() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        repr.add_hidden(HiddenMarker::Blank);
        repr.set("b", 2);
        assert_eq!(repr.index_of("a"), Some(0));
        assert_eq!(repr.index_of("b"), Some(2));
        assert_eq!(repr.index_of("missing"), None);
    }

    #[test]
    fn test_hidden_markers_repeat_freely() {
        let mut repr = IntermediateRepr::new();
        repr.add_hidden(HiddenMarker::Blank);
        repr.add_hidden(HiddenMarker::Blank);
        repr.add_hidden(HiddenMarker::Comment("x".to_string()));
        assert_eq!(repr.len(), 3);
    }

    #[test]
    fn test_insert_hidden_at_position() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        repr.set("b", 2);
        repr.insert_hidden(1, HiddenMarker::Comment("mid".to_string())).unwrap();
        assert!(matches!(repr.iter().nth(1), Some(Entry::Hidden(HiddenMarker::Comment(_)))));
        assert_eq!(
            repr.insert_hidden(9, HiddenMarker::Blank),
            Err(ReprError::IndexOutOfRange { index: 9, len: 3 })
        );
    }

    #[test]
    fn test_flatten_skips_hidden_and_comment_only() {
        let mut nested = IntermediateRepr::new();
        nested.set("x", 1);
        nested.add_hidden(HiddenMarker::Comment("inner".to_string()));

        let mut repr = IntermediateRepr::new();
        repr.add_hidden(HiddenMarker::Blank);
        repr.set("a", Value::Commented(Commented::with_comment(Scalar::Int(1), "keep")));
        repr.set("ghost", Value::Commented(Commented::comment_only("gone")));
        repr.set("t", nested);

        match repr.flatten() {
            Plain::Map(map) => {
                assert_eq!(map.get("a"), Some(&Plain::Int(1)));
                assert!(!map.contains_key("ghost"));
                match map.get("t").unwrap() {
                    Plain::Map(inner) => assert_eq!(inner.get("x"), Some(&Plain::Int(1))),
                    other => panic!("expected nested map, got {other:?}"),
                }
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_flatten_idempotent_on_container() {
        let mut repr = IntermediateRepr::new();
        repr.set("a", 1);
        let once = repr.flatten();
        assert_eq!(once.flatten(), once);
    }
}
