//! The value tree of one secondary index.

use indexmap::{IndexMap, IndexSet};

use crate::value::Key;

/// One level of an index tree.
///
/// A tree built for `n` attributes has `n` levels of [`Node::Branch`] keyed
/// by attribute value, ending in [`Node::Leaf`] lists of identities. A tree
/// for zero attributes is a single leaf.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Branch(IndexMap<Key, Node>),
    Leaf(Vec<Key>),
}

impl Node {
    /// An empty node with `depth` branch levels below it.
    pub fn with_depth(depth: usize) -> Self {
        if depth == 0 {
            Node::Leaf(Vec::new())
        } else {
            Node::Branch(IndexMap::new())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Node::Branch(children) => children.is_empty(),
            Node::Leaf(ids) => ids.is_empty(),
        }
    }

    /// Appends `id` to the leaf at `path`, creating branches on the way.
    pub fn insert(&mut self, path: &[Key], id: Key) {
        let mut node = self;
        for (level, key) in path.iter().enumerate() {
            node = match node {
                Node::Branch(children) => children
                    .entry(key.clone())
                    .or_insert_with(|| Node::with_depth(path.len() - level - 1)),
                Node::Leaf(_) => return,
            };
        }
        if let Node::Leaf(ids) = node {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }

    /// Removes `id` from the leaf at `path` and prunes every branch the
    /// removal leaves empty. Returns `true` when this node itself is empty
    /// afterwards; the caller decides whether to drop it.
    pub fn remove(&mut self, path: &[Key], id: &Key) -> bool {
        match self {
            Node::Leaf(ids) => {
                ids.retain(|existing| existing != id);
            }
            Node::Branch(children) => {
                if let Some((head, rest)) = path.split_first() {
                    let emptied = match children.get_mut(head) {
                        Some(child) => child.remove(rest, id),
                        None => false,
                    };
                    if emptied {
                        children.shift_remove(head);
                    }
                }
            }
        }
        self.is_empty()
    }

    /// Collects every identity below this node, in tree order.
    pub fn collect_into(&self, out: &mut IndexSet<Key>) {
        match self {
            Node::Leaf(ids) => out.extend(ids.iter().cloned()),
            Node::Branch(children) => {
                for child in children.values() {
                    child.collect_into(out);
                }
            }
        }
    }

    /// Collects the identities reachable by following, at each level, any of
    /// the keys listed for that level.
    pub fn select(&self, levels: &[Vec<Key>], out: &mut IndexSet<Key>) {
        match (self, levels.split_first()) {
            (node, None) => node.collect_into(out),
            (Node::Branch(children), Some((wanted, rest))) => {
                for key in wanted {
                    if let Some(child) = children.get(key) {
                        child.select(rest, out);
                    }
                }
            }
            (Node::Leaf(_), Some(_)) => {}
        }
    }

    /// Visits every leaf with the path of keys leading to it.
    pub fn for_each_leaf<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&[&'a Key], &'a [Key]),
    {
        let mut path = Vec::new();
        self.walk(&mut path, visit);
    }

    fn walk<'a, F>(&'a self, path: &mut Vec<&'a Key>, visit: &mut F)
    where
        F: FnMut(&[&'a Key], &'a [Key]),
    {
        match self {
            Node::Leaf(ids) => visit(path.as_slice(), ids),
            Node::Branch(children) => {
                for (key, child) in children {
                    path.push(key);
                    child.walk(path, visit);
                    path.pop();
                }
            }
        }
    }
}
