//! Structural value model
//!
//! These types hold processed option values together with the comments that
//! accompanied them in the source document, so that a renderer can reproduce
//! the comments in the output. Grouping mirrors the line structure of the
//! source: each group renders as one output unit and carries its own optional
//! trailing comment.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::StructuralError;
use crate::repr::{HiddenMarker, IntermediateRepr};

/// A leaf value with a direct TOML correspondence
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// Borrow the string content, if this is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

/// A value wrapped with an optional trailing inline comment.
///
/// The value itself is optional so that a row can be comment-only, e.g. a
/// comment line interleaved in a dangling list.
#[derive(Debug, Clone, PartialEq)]
pub struct Commented<T> {
    value: Option<T>,
    comment: Option<String>,
}

impl<T> Commented<T> {
    pub fn new(value: T) -> Self {
        Self { value: Some(value), comment: None }
    }

    pub fn with_comment(value: T, comment: impl Into<String>) -> Self {
        Self { value: Some(value), comment: Some(comment.into()) }
    }

    pub fn comment_only(comment: impl Into<String>) -> Self {
        Self { value: None, comment: Some(comment.into()) }
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn has_comment(&self) -> bool {
        self.comment.as_deref().is_some_and(|c| !c.is_empty())
    }

    pub fn is_comment_only(&self) -> bool {
        self.value.is_none()
    }

    /// Apply `f` to the wrapped value, keeping the comment
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Commented<U> {
        Commented { value: self.value.map(f), comment: self.comment }
    }
}

/// One grouped line of values sharing a trailing comment
pub type Group<T> = Commented<Vec<T>>;

/// An ordered sequence of value groups.
///
/// The logical array is the concatenation of all group values; each group
/// renders as one output line with its own optional trailing comment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentedList {
    groups: Vec<Group<Scalar>>,
}

impl CommentedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_groups(groups: Vec<Group<Scalar>>) -> Self {
        Self { groups }
    }

    /// Append one line of values; skipped entirely when there is nothing to
    /// record (no values and no comment).
    pub fn push_line(&mut self, values: Vec<Scalar>, comment: Option<&str>) {
        self.insert_line(self.groups.len(), values, comment);
    }

    /// Insert one line of values at `index` (clamped to the group count);
    /// skipped entirely when there is nothing to record.
    pub fn insert_line(&mut self, index: usize, values: Vec<Scalar>, comment: Option<&str>) {
        if values.is_empty() && comment.is_none() {
            return;
        }
        let group = match comment {
            Some(c) => Commented::with_comment(values, c),
            None => Commented::new(values),
        };
        let index = index.min(self.groups.len());
        self.groups.insert(index, group);
    }

    pub fn groups(&self) -> &[Group<Scalar>] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over the logical array values, across all groups
    pub fn values(&self) -> impl Iterator<Item = &Scalar> {
        self.groups.iter().flat_map(|g| g.value().into_iter().flatten())
    }

    /// True if any group carries a non-empty comment
    pub fn has_comments(&self) -> bool {
        self.groups.iter().any(|g| g.has_comment())
    }

    pub fn flatten(&self) -> Plain {
        Plain::Seq(self.values().map(Plain::from_scalar).collect())
    }
}

/// An ordered sequence of key-value groups.
///
/// The logical table is the ordered merge of all groups' pairs. Keys must be
/// unique across all groups; violations are rejected at construction time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommentedKv {
    groups: Vec<Group<(String, Scalar)>>,
}

impl CommentedKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_groups(groups: Vec<Group<(String, Scalar)>>) -> Result<Self, StructuralError> {
        let kv = Self { groups };
        kv.validate()?;
        Ok(kv)
    }

    /// Append one line of pairs; skipped entirely when there is nothing to
    /// record. Fails if any new key is already present.
    pub fn push_line(
        &mut self,
        pairs: Vec<(String, Scalar)>,
        comment: Option<&str>,
    ) -> Result<(), StructuralError> {
        if pairs.is_empty() && comment.is_none() {
            return Ok(());
        }
        let mut fresh = HashSet::new();
        for (key, _) in &pairs {
            if self.find(key).is_some() || !fresh.insert(key.as_str()) {
                return Err(StructuralError::DuplicateKey { key: key.clone() });
            }
        }
        let group = match comment {
            Some(c) => Commented::with_comment(pairs, c),
            None => Commented::new(pairs),
        };
        self.groups.push(group);
        Ok(())
    }

    fn validate(&self) -> Result<(), StructuralError> {
        let mut seen = HashSet::new();
        for (key, _) in self.pairs() {
            if !seen.insert(key.as_str()) {
                return Err(StructuralError::DuplicateKey { key: key.clone() });
            }
        }
        Ok(())
    }

    /// Locate `key`, returning `(group index, position within group)`
    pub fn find(&self, key: &str) -> Option<(usize, usize)> {
        for (i, group) in self.groups.iter().enumerate() {
            for (j, (k, _)) in group.value().into_iter().flatten().enumerate() {
                if k == key {
                    return Some((i, j));
                }
            }
        }
        None
    }

    pub fn groups(&self) -> &[Group<(String, Scalar)>] {
        &self.groups
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Iterate over the logical pairs, across all groups
    pub fn pairs(&self) -> impl Iterator<Item = &(String, Scalar)> {
        self.groups.iter().flat_map(|g| g.value().into_iter().flatten())
    }

    pub fn pair_count(&self) -> usize {
        self.pairs().count()
    }

    /// True if any group carries a non-empty comment
    pub fn has_comments(&self) -> bool {
        self.groups.iter().any(|g| g.has_comment())
    }

    /// Promote this option-shaped value to a section-shaped representation.
    ///
    /// Group comments attach to the last pair of their group, or become a
    /// standalone comment entry for comment-only groups.
    pub fn to_repr(&self) -> IntermediateRepr {
        let mut repr = IntermediateRepr::new();
        for group in &self.groups {
            let mut last: Option<(String, Scalar)> = None;
            for (key, value) in group.value().into_iter().flatten() {
                repr.set(key.clone(), Value::Scalar(value.clone()));
                last = Some((key.clone(), value.clone()));
            }
            if group.has_comment() {
                let comment = group.comment().unwrap_or_default();
                match last {
                    Some((key, value)) => {
                        repr.set(key, Value::Commented(Commented::with_comment(value, comment)));
                    }
                    None => repr.add_hidden(HiddenMarker::Comment(comment.to_string())),
                }
            }
        }
        repr
    }

    pub fn flatten(&self) -> Plain {
        let mut map = IndexMap::new();
        for (key, value) in self.pairs() {
            map.insert(key.clone(), Plain::from_scalar(value));
        }
        Plain::Map(map)
    }
}

/// A structural value stored under a key of the intermediate representation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Commented(Commented<Scalar>),
    List(CommentedList),
    Kv(CommentedKv),
    Table(IntermediateRepr),
}

impl Value {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(s) => Some(s),
            Value::Commented(c) => c.value(),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&IntermediateRepr> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_table_mut(&mut self) -> Option<&mut IntermediateRepr> {
        match self {
            Value::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Strip all comments and grouping, returning the plain logical value.
    ///
    /// Comment-only values project to `None`.
    pub fn flatten(&self) -> Option<Plain> {
        match self {
            Value::Scalar(s) => Some(Plain::from_scalar(s)),
            Value::Commented(c) => c.value().map(Plain::from_scalar),
            Value::List(list) => Some(list.flatten()),
            Value::Kv(kv) => Some(kv.flatten()),
            Value::Table(repr) => Some(repr.flatten()),
        }
    }
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        Value::Scalar(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Scalar(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Scalar(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Scalar(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(v.into())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Scalar(v.into())
    }
}

impl From<Commented<Scalar>> for Value {
    fn from(v: Commented<Scalar>) -> Self {
        Value::Commented(v)
    }
}

impl From<CommentedList> for Value {
    fn from(v: CommentedList) -> Self {
        Value::List(v)
    }
}

impl From<CommentedKv> for Value {
    fn from(v: CommentedKv) -> Self {
        Value::Kv(v)
    }
}

impl From<IntermediateRepr> for Value {
    fn from(v: IntermediateRepr) -> Self {
        Value::Table(v)
    }
}

/// The comment-free projection of a structural value
#[derive(Debug, Clone, PartialEq)]
pub enum Plain {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Seq(Vec<Plain>),
    Map(IndexMap<String, Plain>),
}

impl Plain {
    pub fn from_scalar(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Str(s) => Plain::Str(s.clone()),
            Scalar::Int(i) => Plain::Int(*i),
            Scalar::Float(f) => Plain::Float(*f),
            Scalar::Bool(b) => Plain::Bool(*b),
        }
    }

    /// Flattening an already-flat value is the identity
    pub fn flatten(&self) -> Plain {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_kv() -> CommentedKv {
        CommentedKv::from_groups(vec![
            Commented::new(vec![("a".to_string(), Scalar::Int(1)), ("b".to_string(), Scalar::Int(2))]),
            Commented::new(vec![("c".to_string(), Scalar::Int(3))]),
        ])
        .unwrap()
    }

    #[test]
    fn test_commented_accessors() {
        let c = Commented::with_comment(Scalar::Int(1), "keep");
        assert_eq!(c.value(), Some(&Scalar::Int(1)));
        assert_eq!(c.comment(), Some("keep"));
        assert!(c.has_comment());
        assert!(!c.is_comment_only());

        let only = Commented::<Scalar>::comment_only("note");
        assert!(only.is_comment_only());
        assert_eq!(only.value(), None);
    }

    #[test]
    fn test_list_logical_values_span_groups() {
        let mut list = CommentedList::new();
        list.push_line(vec![Scalar::Int(2), Scalar::Int(3)], Some("grp1"));
        list.push_line(vec![Scalar::Int(4)], None);
        let values: Vec<_> = list.values().cloned().collect();
        assert_eq!(values, vec![Scalar::Int(2), Scalar::Int(3), Scalar::Int(4)]);
        assert_eq!(list.group_count(), 2);
        assert!(list.has_comments());
    }

    #[test]
    fn test_list_skips_vacuous_lines() {
        let mut list = CommentedList::new();
        list.push_line(vec![], None);
        assert!(list.is_empty());
        list.push_line(vec![], Some("just a comment"));
        assert_eq!(list.group_count(), 1);
    }

    #[test]
    fn test_kv_find() {
        let kv = sample_kv();
        assert_eq!(kv.find("a"), Some((0, 0)));
        assert_eq!(kv.find("b"), Some((0, 1)));
        assert_eq!(kv.find("c"), Some((1, 0)));
        assert_eq!(kv.find("d"), None);
    }

    #[test]
    fn test_kv_duplicate_across_groups_rejected() {
        let err = CommentedKv::from_groups(vec![
            Commented::new(vec![("x".to_string(), Scalar::Int(1))]),
            Commented::new(vec![("x".to_string(), Scalar::Int(2))]),
        ])
        .unwrap_err();
        assert_eq!(err, StructuralError::DuplicateKey { key: "x".to_string() });
    }

    #[test]
    fn test_kv_push_line_rejects_existing_key() {
        let mut kv = sample_kv();
        let err = kv.push_line(vec![("a".to_string(), Scalar::Int(9))], None).unwrap_err();
        assert_eq!(err, StructuralError::DuplicateKey { key: "a".to_string() });
        // The failed push must not have been applied
        assert_eq!(kv.pair_count(), 3);
    }

    #[test]
    fn test_kv_to_repr_attaches_group_comment_to_last_pair() {
        let kv = CommentedKv::from_groups(vec![Commented::with_comment(
            vec![("a".to_string(), Scalar::Int(1)), ("b".to_string(), Scalar::Int(2))],
            "tail",
        )])
        .unwrap();
        let repr = kv.to_repr();
        assert!(matches!(repr.get("a"), Ok(Value::Scalar(Scalar::Int(1)))));
        match repr.get("b").unwrap() {
            Value::Commented(c) => {
                assert_eq!(c.value(), Some(&Scalar::Int(2)));
                assert_eq!(c.comment(), Some("tail"));
            }
            other => panic!("expected commented value, got {other:?}"),
        }
    }

    #[test]
    fn test_flatten_strips_comments_and_grouping() {
        let list = CommentedList::from_groups(vec![
            Commented::with_comment(vec![Scalar::Int(2), Scalar::Int(3)], "grp1"),
            Commented::new(vec![Scalar::Int(4)]),
        ]);
        assert_eq!(
            Value::List(list).flatten(),
            Some(Plain::Seq(vec![Plain::Int(2), Plain::Int(3), Plain::Int(4)]))
        );

        let kv = sample_kv();
        match Value::Kv(kv).flatten().unwrap() {
            Plain::Map(map) => {
                let keys: Vec<_> = map.keys().cloned().collect();
                assert_eq!(keys, vec!["a", "b", "c"]);
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let value = Value::List(CommentedList::from_groups(vec![Commented::with_comment(
            vec![Scalar::Str("v".into())],
            "c",
        )]));
        let once = value.flatten().unwrap();
        assert_eq!(once.flatten(), once);
    }

    #[test]
    fn test_comment_only_flattens_to_nothing() {
        let value = Value::Commented(Commented::comment_only("ghost"));
        assert_eq!(value.flatten(), None);
    }
}
