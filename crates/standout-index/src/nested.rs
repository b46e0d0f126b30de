//! Nested maps returned by grouped queries and projections.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::Key;

/// A tree of keys ending in leaves of `V`.
///
/// Grouping by `n` attributes produces `n` levels of [`NestedMap::Branch`]
/// followed by a [`NestedMap::Leaf`] at every populated path. Branches keep
/// the order in which their keys were first seen. A map with nothing in it
/// is an empty branch, whatever its intended depth.
///
/// Serializes as nested JSON-style objects keyed by each key's string form.
#[derive(Debug, Clone, PartialEq)]
pub enum NestedMap<V> {
    Branch(IndexMap<Key, NestedMap<V>>),
    Leaf(V),
}

impl<V> NestedMap<V> {
    pub fn new() -> Self {
        NestedMap::Branch(IndexMap::new())
    }

    /// Number of entries at the top level (1 for a bare leaf).
    pub fn len(&self) -> usize {
        match self {
            NestedMap::Branch(children) => children.len(),
            NestedMap::Leaf(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, NestedMap::Branch(children) if children.is_empty())
    }

    /// Branch levels above the first leaf.
    pub fn depth(&self) -> usize {
        match self {
            NestedMap::Branch(children) => children.values().next().map_or(0, |c| c.depth() + 1),
            NestedMap::Leaf(_) => 0,
        }
    }

    /// The subtree at `path`.
    pub fn get(&self, path: &[Key]) -> Option<&NestedMap<V>> {
        let mut node = self;
        for key in path {
            match node {
                NestedMap::Branch(children) => node = children.get(key)?,
                NestedMap::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    /// The leaf value at `path`.
    pub fn leaf(&self, path: &[Key]) -> Option<&V> {
        match self.get(path)? {
            NestedMap::Leaf(v) => Some(v),
            NestedMap::Branch(_) => None,
        }
    }

    /// Child subtree keyed by `key`.
    pub fn child(&self, key: impl Into<Key>) -> Option<&NestedMap<V>> {
        match self {
            NestedMap::Branch(children) => children.get(&key.into()),
            NestedMap::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&V> {
        match self {
            NestedMap::Leaf(v) => Some(v),
            NestedMap::Branch(_) => None,
        }
    }

    /// Every leaf with its full key path, in map order.
    pub fn leaves(&self) -> Vec<(Vec<&Key>, &V)> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        self.collect_leaves(&mut path, &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, path: &mut Vec<&'a Key>, out: &mut Vec<(Vec<&'a Key>, &'a V)>) {
        match self {
            NestedMap::Leaf(v) => out.push((path.clone(), v)),
            NestedMap::Branch(children) => {
                for (key, child) in children {
                    path.push(key);
                    child.collect_leaves(path, out);
                    path.pop();
                }
            }
        }
    }

    /// Applies `f` to every leaf, keeping the shape.
    pub fn map_leaves<U, F>(self, f: &mut F) -> NestedMap<U>
    where
        F: FnMut(V) -> U,
    {
        match self {
            NestedMap::Leaf(v) => NestedMap::Leaf(f(v)),
            NestedMap::Branch(children) => NestedMap::Branch(
                children
                    .into_iter()
                    .map(|(key, child)| (key, child.map_leaves(f)))
                    .collect(),
            ),
        }
    }

    /// Puts `value` at `path`, or merges it into the leaf already there.
    pub(crate) fn place<F>(&mut self, path: &[Key], value: V, merge: F)
    where
        F: FnOnce(&mut V, V),
    {
        match (self, path.split_first()) {
            (NestedMap::Leaf(existing), None) => merge(existing, value),
            (node, None) => *node = NestedMap::Leaf(value),
            (NestedMap::Branch(children), Some((head, rest))) => children
                .entry(head.clone())
                .or_insert_with(NestedMap::new)
                .place(rest, value, merge),
            (node, Some(_)) => {
                *node = NestedMap::new();
                node.place(path, value, merge);
            }
        }
    }

    /// Puts `value` at `path` unless a leaf is already there.
    pub(crate) fn insert_first(&mut self, path: &[Key], value: V) {
        self.place(path, value, |_, _| {});
    }
}

impl<V> NestedMap<Vec<V>> {
    /// Appends `value` to the list at `path`.
    pub(crate) fn push(&mut self, path: &[Key], value: V) {
        self.place(path, vec![value], |existing, mut more| existing.append(&mut more));
    }

    /// All list items in map order.
    pub fn flatten(self) -> Vec<V> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<V>) {
        match self {
            NestedMap::Leaf(values) => out.extend(values),
            NestedMap::Branch(children) => {
                for (_, child) in children {
                    child.flatten_into(out);
                }
            }
        }
    }
}

impl<V> Default for NestedMap<V> {
    fn default() -> Self {
        NestedMap::new()
    }
}

impl<V: Serialize> Serialize for NestedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NestedMap::Leaf(v) => v.serialize(serializer),
            NestedMap::Branch(children) => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (key, child) in children {
                    map.serialize_entry(&key.to_string(), child)?;
                }
                map.end()
            }
        }
    }
}
