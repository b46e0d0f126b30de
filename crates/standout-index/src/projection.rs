//! Grouped views of a whole collection.
//!
//! A projection reuses (or builds) the index for its path, walks the index
//! leaves once and re-nests them in the order the caller named the
//! attributes. Projections only read the index.

use std::fmt;

use indexmap::IndexMap;

use crate::collection::Collection;
use crate::error::Result;
use crate::nested::NestedMap;
use crate::signature::Layout;
use crate::traits::Indexable;
use crate::value::Key;

/// Attribute name → key, over an entity type's declared attributes.
pub type Record = IndexMap<String, Key>;

/// What [`Collection::get_array_map`] collects for each entity.
pub enum Target<T> {
    /// The entity's identity.
    Identity,
    /// One attribute, normalized.
    Attribute(String),
    /// A value computed from the entity.
    Derive(Box<dyn Fn(&T) -> Key>),
}

impl<T> Target<T> {
    pub fn attribute(name: impl Into<String>) -> Self {
        Target::Attribute(name.into())
    }

    pub fn derive<F>(f: F) -> Self
    where
        F: Fn(&T) -> Key + 'static,
    {
        Target::Derive(Box::new(f))
    }
}

impl<T> fmt::Debug for Target<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Identity => f.write_str("Identity"),
            Target::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            Target::Derive(_) => f.write_str("Derive(..)"),
        }
    }
}

impl<T: Indexable> Collection<T> {
    /// Every entity, grouped by `path`.
    ///
    /// ```
    /// use standout_index::{Collection, Indexable, Key, Number, Value};
    ///
    /// struct Task {
    ///     id: i64,
    ///     group: &'static str,
    /// }
    ///
    /// impl Indexable for Task {
    ///     fn attribute(&self, name: &str) -> Option<Value<'_>> {
    ///         match name {
    ///             "id" => Some(Value::Number(Number::I64(self.id))),
    ///             "group" => Some(Value::String(self.group)),
    ///             _ => None,
    ///         }
    ///     }
    /// }
    ///
    /// let tasks = Collection::with_entities(
    ///     Default::default(),
    ///     [
    ///         Task { id: 1, group: "b" },
    ///         Task { id: 2, group: "a" },
    ///         Task { id: 3, group: "b" },
    ///     ],
    /// )?;
    /// let by_group = tasks.to_map(&["group"])?;
    /// let b = by_group.leaf(&[Key::from("b")]).unwrap();
    /// assert_eq!(b.iter().map(|t| t.id).collect::<Vec<_>>(), [1, 3]);
    /// # Ok::<(), standout_index::IndexError>(())
    /// ```
    pub fn to_map<S: AsRef<str>>(&self, path: &[S]) -> Result<NestedMap<Vec<&T>>> {
        let mut map = NestedMap::new();
        self.walk_grouped(path, |keys, _, entity| {
            map.push(keys, entity);
            Ok(())
        })?;
        Ok(map)
    }

    /// The first entity at every path.
    pub fn to_one_map<S: AsRef<str>>(&self, path: &[S]) -> Result<NestedMap<&T>> {
        let mut map = NestedMap::new();
        self.walk_grouped(path, |keys, _, entity| {
            map.insert_first(keys, entity);
            Ok(())
        })?;
        Ok(map)
    }

    /// Attribute records of every entity, grouped by `path`.
    pub fn to_array_map<S: AsRef<str>>(&self, path: &[S]) -> Result<NestedMap<Vec<Record>>> {
        let mut map = NestedMap::new();
        self.walk_grouped(path, |keys, _, entity| {
            map.push(keys, self.record_of(entity)?);
            Ok(())
        })?;
        Ok(map)
    }

    /// The attribute record of the first entity at every path.
    pub fn to_array_one_map<S: AsRef<str>>(&self, path: &[S]) -> Result<NestedMap<Record>> {
        let mut map = NestedMap::new();
        self.walk_grouped(path, |keys, _, entity| {
            if map.leaf(keys).is_none() {
                map.insert_first(keys, self.record_of(entity)?);
            }
            Ok(())
        })?;
        Ok(map)
    }

    /// One key per entity, chosen by `target`, grouped by `path`.
    pub fn get_array_map<S: AsRef<str>>(
        &self,
        path: &[S],
        target: &Target<T>,
    ) -> Result<NestedMap<Vec<Key>>> {
        let mut map = NestedMap::new();
        self.walk_grouped(path, |keys, id, entity| {
            let value = match target {
                Target::Identity => id.clone(),
                Target::Attribute(name) => self.attribute_key(entity, name)?,
                Target::Derive(f) => f(entity),
            };
            map.push(keys, value);
            Ok(())
        })?;
        Ok(map)
    }

    /// Normalized values of every declared attribute of `entity`.
    pub fn record_of(&self, entity: &T) -> Result<Record> {
        let mut record = Record::with_capacity(T::attributes().len());
        for name in T::attributes() {
            record.insert((*name).to_string(), self.attribute_key(entity, name)?);
        }
        Ok(record)
    }

    /// Visits every entity with its key path in the caller's `path` order.
    fn walk_grouped<'s, S, F>(&'s self, path: &[S], mut visit: F) -> Result<()>
    where
        S: AsRef<str>,
        F: FnMut(&[Key], &Key, &'s T) -> Result<()>,
    {
        let layout = Layout::new(path);
        self.ensure(&layout)?;

        let mut order = Vec::with_capacity(layout.depth());
        for name in path {
            if let Some(level) = layout.level_of(name.as_ref()) {
                if !order.contains(&level) {
                    order.push(level);
                }
            }
        }

        let registry = self.indexes.borrow();
        let Some(index) = registry.get(&layout.signature) else {
            return Ok(());
        };
        let mut leaves = Vec::new();
        index.root.for_each_leaf(&mut |keys, ids| {
            let reordered: Vec<Key> = order.iter().map(|&level| keys[level].clone()).collect();
            leaves.push((reordered, ids));
        });

        for (keys, ids) in leaves {
            for id in ids {
                if let Some(entity) = self.entities.get(id) {
                    visit(&keys, id, entity)?;
                }
            }
        }
        Ok(())
    }
}
