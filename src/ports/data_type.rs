//! Data-type tags and their compatibility rules.
//!
//! Ports may declare zero, one or several data-type tags. A port without
//! tags accepts anything; otherwise two ports are compatible when they share
//! at least one tag. The literal tag `"any"` has no special meaning.

use serde::{Deserialize, Serialize};

/// A declared data-type value: a single tag or a list of tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataType {
    One(String),
    Many(Vec<String>),
}

impl DataType {
    /// Normalized tag list for this value
    pub fn tags(&self) -> Vec<String> {
        normalize(Some(self))
    }

    /// Collapse a tag list back into a value: `None` for no tags, a single
    /// tag for one, a list otherwise.
    pub fn from_tags(mut tags: Vec<String>) -> Option<DataType> {
        match tags.len() {
            0 => None,
            1 => tags.pop().map(DataType::One),
            _ => Some(DataType::Many(tags)),
        }
    }
}

impl From<&str> for DataType {
    fn from(value: &str) -> Self {
        DataType::One(value.to_string())
    }
}

impl From<String> for DataType {
    fn from(value: String) -> Self {
        DataType::One(value)
    }
}

impl From<Vec<String>> for DataType {
    fn from(value: Vec<String>) -> Self {
        DataType::Many(value)
    }
}

impl From<&[&str]> for DataType {
    fn from(value: &[&str]) -> Self {
        DataType::Many(value.iter().map(|s| s.to_string()).collect())
    }
}

/// Normalize a declared value into a tag list.
///
/// Order is preserved and duplicates are kept; empty strings are dropped.
pub fn normalize(value: Option<&DataType>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(DataType::One(tag)) if tag.is_empty() => Vec::new(),
        Some(DataType::One(tag)) => vec![tag.clone()],
        Some(DataType::Many(tags)) => tags.iter().filter(|t| !t.is_empty()).cloned().collect(),
    }
}

/// Concatenate `primary` then `secondary`, keeping the first occurrence of
/// each tag.
pub fn merge(primary: &[String], secondary: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(primary.len() + secondary.len());
    for tag in primary.iter().chain(secondary) {
        if !tag.is_empty() && !merged.contains(tag) {
            merged.push(tag.clone());
        }
    }
    merged
}

/// Whether two tag lists may be connected.
///
/// An empty side is untyped and accepts anything.
pub fn compatible(a: &[String], b: &[String]) -> bool {
    if a.is_empty() || b.is_empty() {
        return true;
    }
    a.iter().any(|tag| b.contains(tag))
}

/// Order-insensitive equality of two tag lists, for memoization keys.
pub fn equal(a: &[String], b: &[String]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut left: Vec<&String> = a.iter().collect();
    let mut right: Vec<&String> = b.iter().collect();
    left.sort();
    right.sort();
    left == right
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalize() {
        assert!(normalize(None).is_empty());
        assert_eq!(normalize(Some(&DataType::from("number"))), tags(&["number"]));
        assert!(normalize(Some(&DataType::from(""))).is_empty());
        let many = DataType::Many(tags(&["a", "", "b", "a"]));
        assert_eq!(normalize(Some(&many)), tags(&["a", "b", "a"]));
    }

    #[test]
    fn test_merge_stable_dedup() {
        let merged = merge(&tags(&["b", "a", "b"]), &tags(&["c", "a"]));
        assert_eq!(merged, tags(&["b", "a", "c"]));
        assert!(merge(&[], &[]).is_empty());
    }

    #[test]
    fn test_compatible() {
        assert!(compatible(&[], &tags(&["x"])));
        assert!(compatible(&tags(&["x"]), &[]));
        assert!(compatible(&[], &[]));
        assert!(!compatible(&tags(&["a"]), &tags(&["b"])));
        assert!(compatible(&tags(&["a", "b"]), &tags(&["b", "c"])));
    }

    #[test]
    fn test_any_is_not_a_wildcard() {
        assert!(!compatible(&tags(&["any"]), &tags(&["number"])));
        assert!(compatible(&tags(&["any"]), &tags(&["any"])));
    }

    #[test]
    fn test_equal_ignores_order() {
        assert!(equal(&tags(&["a", "b"]), &tags(&["b", "a"])));
        assert!(!equal(&tags(&["a"]), &tags(&["a", "b"])));
        assert!(!equal(&tags(&["a", "a"]), &tags(&["a", "b"])));
    }

    #[test]
    fn test_from_tags() {
        assert_eq!(DataType::from_tags(vec![]), None);
        assert_eq!(DataType::from_tags(tags(&["a"])), Some(DataType::from("a")));
        assert_eq!(
            DataType::from_tags(tags(&["a", "b"])),
            Some(DataType::Many(tags(&["a", "b"])))
        );
    }

    #[test]
    fn test_deserialize_single_or_many() {
        let one: DataType = serde_json::from_str("\"image\"").unwrap();
        assert_eq!(one, DataType::from("image"));
        let many: DataType = serde_json::from_str("[\"image\", \"mask\"]").unwrap();
        assert_eq!(many.tags(), tags(&["image", "mask"]));
    }
}
