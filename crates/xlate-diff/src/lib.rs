//! XLATE Diff: recursive change detection over nested configuration trees
//!
//! Walks the union of keys of two JSON objects and classifies every field
//! path as added, removed, modified or unchanged. Used to preview an
//! AI-suggested correction against the current translation, and to report
//! what an accepted correction actually changed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A field that exists on only one side, or is identical on both
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    /// Dotted path from the tree root (e.g. "configuration.engine")
    pub path: String,
    pub value: Value,
}

/// A field present on both sides with different values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldModification {
    pub path: String,
    pub old_value: Value,
    pub new_value: Value,
}

/// The full classification of one diff run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub added: Vec<FieldValue>,
    pub removed: Vec<FieldValue>,
    pub modified: Vec<FieldModification>,
    pub unchanged: Vec<FieldValue>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.modified.is_empty()
    }

    /// Number of fields that actually differ (unchanged excluded)
    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    fn merge(&mut self, child: ChangeSet) {
        self.added.extend(child.added);
        self.removed.extend(child.removed);
        self.modified.extend(child.modified);
        self.unchanged.extend(child.unchanged);
    }
}

/// Diff two nested objects.
///
/// Every key in the union of both objects lands in exactly one category.
/// When both sides hold an object under the same key, the walk recurses and
/// the child's lists are merged into the parent's, path-qualified with dot
/// notation. Key order within each list follows the union iteration
/// (original's keys first, then keys only present in `modified`); only
/// completeness is guaranteed, not a stable order across implementations.
pub fn detect_changes(original: &Map<String, Value>, modified: &Map<String, Value>, path: &str) -> ChangeSet {
    let mut changes = ChangeSet::default();

    let union: Vec<&String> = original
        .keys()
        .chain(modified.keys().filter(|k| !original.contains_key(*k)))
        .collect();

    for key in union {
        let current_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}.{key}")
        };

        match (original.get(key), modified.get(key)) {
            (None, Some(value)) => changes.added.push(FieldValue {
                path: current_path,
                value: value.clone(),
            }),
            (Some(value), None) => changes.removed.push(FieldValue {
                path: current_path,
                value: value.clone(),
            }),
            (Some(old), Some(new)) if old != new => {
                match (old.as_object(), new.as_object()) {
                    (Some(old_map), Some(new_map)) => {
                        changes.merge(detect_changes(old_map, new_map, &current_path));
                    }
                    _ => changes.modified.push(FieldModification {
                        path: current_path,
                        old_value: old.clone(),
                        new_value: new.clone(),
                    }),
                }
            }
            (Some(value), Some(_)) => changes.unchanged.push(FieldValue {
                path: current_path,
                value: value.clone(),
            }),
            // Union keys always exist on at least one side
            (None, None) => {}
        }
    }

    changes
}

/// Convenience wrapper for callers holding whole JSON values. Non-object
/// inputs diff as an empty object on that side.
pub fn detect_value_changes(original: &Value, modified: &Value) -> ChangeSet {
    let empty = Map::new();
    let original = original.as_object().unwrap_or(&empty);
    let modified = modified.as_object().unwrap_or(&empty);
    detect_changes(original, modified, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn classifies_all_four_categories() {
        let original = as_map(json!({
            "kept": 1,
            "dropped": true,
            "renamed": "old",
        }));
        let modified = as_map(json!({
            "kept": 1,
            "renamed": "new",
            "introduced": [1, 2],
        }));

        let changes = detect_changes(&original, &modified, "");

        assert_eq!(changes.added.len(), 1);
        assert_eq!(changes.added[0].path, "introduced");
        assert_eq!(changes.removed.len(), 1);
        assert_eq!(changes.removed[0].path, "dropped");
        assert_eq!(changes.modified.len(), 1);
        assert_eq!(changes.modified[0].old_value, json!("old"));
        assert_eq!(changes.modified[0].new_value, json!("new"));
        assert_eq!(changes.unchanged.len(), 1);
        assert_eq!(changes.unchanged[0].path, "kept");
    }

    #[test]
    fn recursion_qualifies_paths_with_dots() {
        let original = as_map(json!({
            "configuration": {"engine": "postgres", "storage": {"size_gb": 100}}
        }));
        let modified = as_map(json!({
            "configuration": {"engine": "cloudsql-postgres", "storage": {"size_gb": 100}}
        }));

        let changes = detect_changes(&original, &modified, "");

        assert_eq!(changes.modified.len(), 1);
        assert_eq!(changes.modified[0].path, "configuration.engine");
        assert!(changes
            .unchanged
            .iter()
            .any(|f| f.path == "configuration.storage.size_gb"));
    }

    #[test]
    fn every_union_key_lands_in_exactly_one_category() {
        let original = as_map(json!({
            "a": 1, "b": {"x": 1, "y": 2}, "c": "s", "d": null
        }));
        let modified = as_map(json!({
            "b": {"x": 1, "z": 3}, "c": "t", "d": null, "e": 5
        }));

        let changes = detect_changes(&original, &modified, "");

        let mut paths: Vec<String> = Vec::new();
        paths.extend(changes.added.iter().map(|f| f.path.clone()));
        paths.extend(changes.removed.iter().map(|f| f.path.clone()));
        paths.extend(changes.modified.iter().map(|f| f.path.clone()));
        paths.extend(changes.unchanged.iter().map(|f| f.path.clone()));

        let mut sorted = paths.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), paths.len(), "a path was classified twice");

        // Leaf-level union: a, b.x, b.y, b.z, c, d, e
        assert_eq!(paths.len(), 7);
    }

    #[test]
    fn diff_is_idempotent() {
        let original = as_map(json!({"a": {"b": 1}, "c": 2}));
        let modified = as_map(json!({"a": {"b": 2}, "d": 3}));

        let first = detect_changes(&original, &modified, "");
        let second = detect_changes(&original, &modified, "");
        assert_eq!(first, second);
    }

    #[test]
    fn identical_trees_produce_no_changes() {
        let tree = as_map(json!({"a": {"b": [1, 2, 3]}, "c": "x"}));
        let changes = detect_changes(&tree, &tree, "");
        assert!(changes.is_empty());
        assert_eq!(changes.change_count(), 0);
        assert_eq!(changes.unchanged.len(), 2);
    }

    #[test]
    fn type_change_between_object_and_scalar_is_modified() {
        let original = as_map(json!({"q": {"amount": 1}}));
        let modified = as_map(json!({"q": 1}));

        let changes = detect_changes(&original, &modified, "");
        assert_eq!(changes.modified.len(), 1);
        assert_eq!(changes.modified[0].path, "q");
    }
}
