//! Secondary index engine.
//!
//! An [`IndexRegistry`] holds every index a collection has built so far,
//! keyed by [`Signature`], together with the reverse index that records, for
//! each identity, the value path it occupies in each of those indexes. The
//! registry never reads entities itself: callers compute value paths (the
//! fallible part, since attribute access can fail) and hand them in, so a
//! failed read never leaves an index half-updated.

mod node;

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use crate::signature::{Layout, Signature};
use crate::value::Key;

pub(crate) use node::Node;

/// One built index.
#[derive(Debug, Clone)]
pub(crate) struct SecondaryIndex {
    pub layout: Layout,
    pub root: Node,
}

impl SecondaryIndex {
    pub fn select(&self, levels: &[Vec<Key>]) -> IndexSet<Key> {
        let mut out = IndexSet::new();
        self.root.select(levels, &mut out);
        out
    }
}

/// Identity → signature → value path.
type ReverseIndex = HashMap<Key, HashMap<Signature, Vec<Key>>>;

#[derive(Debug, Default)]
pub(crate) struct IndexRegistry {
    indexes: IndexMap<Signature, SecondaryIndex>,
    reverse: ReverseIndex,
}

impl IndexRegistry {
    pub fn contains(&self, signature: &Signature) -> bool {
        self.indexes.contains_key(signature)
    }

    pub fn get(&self, signature: &Signature) -> Option<&SecondaryIndex> {
        self.indexes.get(signature)
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.indexes.keys()
    }

    /// Layouts of every built index, in build order.
    pub fn layouts(&self) -> impl Iterator<Item = &Layout> {
        self.indexes.values().map(|index| &index.layout)
    }

    /// Signatures `id` is registered under, if any.
    #[cfg(test)]
    pub fn registrations(&self, id: &Key) -> Option<&HashMap<Signature, Vec<Key>>> {
        self.reverse.get(id)
    }

    /// Installs a freshly scanned index.
    ///
    /// `rows` holds one `(identity, value path)` pair per entity of the
    /// primary store, in store order.
    pub fn build(&mut self, layout: Layout, rows: Vec<(Key, Vec<Key>)>) {
        let mut root = Node::with_depth(layout.depth());
        let entities = rows.len();
        for (id, path) in rows {
            root.insert(&path, id.clone());
            self.reverse
                .entry(id)
                .or_default()
                .insert(layout.signature.clone(), path);
        }
        debug!(
            signature = %layout.signature,
            depth = layout.depth(),
            entities,
            "built secondary index"
        );
        self.indexes
            .insert(layout.signature.clone(), SecondaryIndex { layout, root });
    }

    /// Files `id` under the given path in each listed index, moving it out of
    /// its previous path first when that path differs.
    pub fn place(&mut self, id: &Key, paths: Vec<(Signature, Vec<Key>)>) {
        if paths.is_empty() {
            return;
        }
        let slots = self.reverse.entry(id.clone()).or_default();
        for (signature, path) in paths {
            let Some(index) = self.indexes.get_mut(&signature) else {
                continue;
            };
            match slots.get(&signature) {
                Some(old) if *old == path => continue,
                Some(old) => {
                    trace!(%signature, ?id, from = ?old, to = ?path, "moving identity");
                    index.root.remove(old, id);
                }
                None => trace!(%signature, ?id, ?path, "indexing identity"),
            }
            index.root.insert(&path, id.clone());
            slots.insert(signature, path);
        }
    }

    /// Removes `id` from every index it is registered in and forgets it.
    ///
    /// An identity that was never indexed (no index built yet) is a no-op.
    pub fn evict(&mut self, id: &Key) {
        let Some(slots) = self.reverse.remove(id) else {
            return;
        };
        for (signature, path) in slots {
            if let Some(index) = self.indexes.get_mut(&signature) {
                trace!(%signature, ?id, ?path, "evicting identity");
                index.root.remove(&path, id);
            }
        }
    }

    pub fn clear(&mut self) {
        debug!(indexes = self.indexes.len(), "dropping secondary indexes");
        self.indexes.clear();
        self.reverse.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(s: &str) -> Key {
        Key::from(s)
    }

    fn group_registry() -> (IndexRegistry, Signature) {
        let mut registry = IndexRegistry::default();
        let layout = Layout::new(["group"]);
        let signature = layout.signature.clone();
        registry.build(
            layout,
            vec![
                (Key::Int(1), vec![k("asdf")]),
                (Key::Int(2), vec![k("zxcv")]),
                (Key::Int(3), vec![k("zxcv")]),
            ],
        );
        (registry, signature)
    }

    fn ids(registry: &IndexRegistry, signature: &Signature, value: &str) -> Vec<Key> {
        registry
            .get(signature)
            .unwrap()
            .select(&[vec![k(value)]])
            .into_iter()
            .collect()
    }

    #[test]
    fn build_registers_reverse_paths() {
        let (registry, signature) = group_registry();
        assert_eq!(registry.len(), 1);
        assert_eq!(ids(&registry, &signature, "zxcv"), vec![Key::Int(2), Key::Int(3)]);
        assert_eq!(
            registry.registrations(&Key::Int(2)).unwrap()[&signature],
            vec![k("zxcv")]
        );
    }

    #[test]
    fn place_moves_between_paths() {
        let (mut registry, signature) = group_registry();
        registry.place(&Key::Int(2), vec![(signature.clone(), vec![k("asdf")])]);

        assert_eq!(ids(&registry, &signature, "zxcv"), vec![Key::Int(3)]);
        assert_eq!(ids(&registry, &signature, "asdf"), vec![Key::Int(1), Key::Int(2)]);
    }

    #[test]
    fn place_same_path_keeps_position() {
        let (mut registry, signature) = group_registry();
        registry.place(&Key::Int(2), vec![(signature.clone(), vec![k("zxcv")])]);
        assert_eq!(ids(&registry, &signature, "zxcv"), vec![Key::Int(2), Key::Int(3)]);
    }

    #[test]
    fn evict_prunes_and_forgets() {
        let (mut registry, signature) = group_registry();
        registry.evict(&Key::Int(1));

        assert!(ids(&registry, &signature, "asdf").is_empty());
        assert!(registry.registrations(&Key::Int(1)).is_none());
        match &registry.get(&signature).unwrap().root {
            Node::Branch(children) => assert!(!children.contains_key(&k("asdf"))),
            Node::Leaf(_) => panic!("expected branch root"),
        }
    }

    #[test]
    fn evict_unindexed_identity_is_noop() {
        let mut registry = IndexRegistry::default();
        registry.evict(&Key::Int(42));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn clear_drops_everything() {
        let (mut registry, signature) = group_registry();
        registry.clear();
        assert!(!registry.contains(&signature));
        assert!(registry.registrations(&Key::Int(1)).is_none());
    }
}
