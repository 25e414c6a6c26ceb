//! Tree-shaped locale data.
//!
//! A [`NestedMap`] mirrors one locale file: every node is either a string leaf or a
//! mapping from segment name to child node. Insertion order is kept so rewritten
//! files stay diff-friendly.

use serde_json::{Map, Value};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedMap {
    /// Values are always `Value::String` or `Value::Object`
    root: Map<String, Value>,
}

impl NestedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON value; `None` unless the value is an object.
    ///
    /// Numbers and booleans become string leaves, arrays are kept as their JSON
    /// text and `null` entries are dropped.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                root: normalize(map),
            }),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of string leaves in the whole tree
    pub fn leaf_count(&self) -> usize {
        count_leaves(&self.root)
    }

    /// Leaf string at `path`.
    ///
    /// `None` when a segment is missing, when the walk hits a leaf before the last
    /// segment, or when the last segment holds a mapping.
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        let (last, parents) = path.split_last()?;
        let mut current = &self.root;
        for segment in parents {
            current = current.get(segment.as_ref())?.as_object()?;
        }
        current.get(last.as_ref())?.as_str()
    }

    /// Store `value` at `path`, creating intermediate mappings.
    ///
    /// A leaf found in the middle of the path is replaced by an empty mapping, which
    /// drops its text. A mapping at the final segment is replaced by the leaf.
    /// An empty path is ignored.
    pub fn set<S: AsRef<str>>(&mut self, path: &[S], value: impl Into<String>) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut current = &mut self.root;
        for segment in parents {
            let node = current
                .entry(segment.as_ref())
                .or_insert_with(|| Value::Object(Map::new()));
            if !node.is_object() {
                warn!(
                    segment = segment.as_ref(),
                    "overwriting leaf with a mapping to descend further"
                );
                *node = Value::Object(Map::new());
            }
            match node {
                Value::Object(map) => current = map,
                _ => return,
            }
        }
        current.insert(last.as_ref().to_string(), Value::String(value.into()));
    }

    /// Combine two maps without overwriting anything in `existing`.
    ///
    /// Paths only in `incoming` are adopted (leaf or whole subtree). Where both maps
    /// have a node, `existing` is kept; two mappings are merged recursively.
    pub fn merge(existing: &NestedMap, incoming: &NestedMap) -> NestedMap {
        let mut merged = existing.clone();
        merged.merge_from(incoming);
        merged
    }

    /// In-place form of [`NestedMap::merge`], with `self` as the existing side
    pub fn merge_from(&mut self, incoming: &NestedMap) {
        merge_into(&mut self.root, &incoming.root);
    }
}

impl From<NestedMap> for Value {
    fn from(map: NestedMap) -> Self {
        Value::Object(map.root)
    }
}

fn normalize(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(_) => Some((key, value)),
            Value::Object(inner) => Some((key, Value::Object(normalize(inner)))),
            Value::Null => None,
            Value::Bool(_) | Value::Number(_) | Value::Array(_) => {
                Some((key, Value::String(value.to_string())))
            }
        })
        .collect()
}

fn count_leaves(map: &Map<String, Value>) -> usize {
    map.values()
        .map(|value| match value {
            Value::Object(inner) => count_leaves(inner),
            _ => 1,
        })
        .sum()
}

fn merge_into(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match target.get_mut(key) {
            None => {
                target.insert(key.clone(), value.clone());
            }
            Some(Value::Object(existing)) => {
                if let Value::Object(incoming) = value {
                    merge_into(existing, incoming);
                }
            }
            Some(_) => {}
        }
    }
}
