//! The indexed collection: primary store plus lazily built indexes.

use std::cell::RefCell;

use indexmap::{IndexMap, IndexSet};
use tracing::trace;

use crate::accessor::Accessor;
use crate::config::{CollectionConfig, IdentityStrategy};
use crate::criteria::{Criteria, Criterion, Operand};
use crate::error::{IndexError, Result};
use crate::index::IndexRegistry;
use crate::ordering::Dir;
use crate::signature::{Layout, Signature};
use crate::traits::Indexable;
use crate::value::{Key, Value};

/// An insertion-ordered set of entities, queryable by any combination of
/// attributes.
///
/// Every distinct set of attribute names used in a query gets its own
/// secondary index. Indexes are built on first use with a single scan of
/// the collection and then kept current by [`add`](Self::add) and
/// [`remove`](Self::remove), so repeated queries cost a tree walk rather
/// than a scan.
///
/// Indexes live behind a `RefCell`, which lets read queries take `&self`
/// and makes the collection `!Sync`: share it across threads only behind
/// your own lock.
///
/// # Example
///
/// ```
/// use standout_index::{Collection, Criteria, Indexable, Number, Value};
///
/// struct Task {
///     id: u32,
///     group: &'static str,
/// }
///
/// impl Indexable for Task {
///     fn attribute(&self, name: &str) -> Option<Value<'_>> {
///         match name {
///             "id" => Some(Value::Number(Number::from(self.id))),
///             "group" => Some(Value::String(self.group)),
///             _ => None,
///         }
///     }
/// }
///
/// let mut tasks = Collection::new(Default::default());
/// tasks.add(Task { id: 1, group: "docs" })?;
/// tasks.add(Task { id: 2, group: "bugs" })?;
/// tasks.add(Task { id: 3, group: "docs" })?;
///
/// let docs = tasks.find_by(&Criteria::new().eq("group", "docs"))?;
/// assert_eq!(docs.iter().map(|t| t.id).collect::<Vec<_>>(), [1, 3]);
/// # Ok::<(), standout_index::IndexError>(())
/// ```
pub struct Collection<T> {
    pub(crate) config: CollectionConfig<T>,
    pub(crate) accessor: Accessor,
    pub(crate) entities: IndexMap<Key, T>,
    pub(crate) indexes: RefCell<IndexRegistry>,
}

impl<T: Indexable> Collection<T> {
    pub fn new(config: CollectionConfig<T>) -> Self {
        let accessor = Accessor::new(config.get_access_style());
        Collection {
            config,
            accessor,
            entities: IndexMap::new(),
            indexes: RefCell::new(IndexRegistry::default()),
        }
    }

    /// Creates a collection and adds `entities` to it in order.
    pub fn with_entities<I>(config: CollectionConfig<T>, entities: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut collection = Collection::new(config);
        collection.add_all(entities)?;
        Ok(collection)
    }

    pub fn config(&self) -> &CollectionConfig<T> {
        &self.config
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Adds an entity, replacing any entity with the same identity.
    ///
    /// A replacement keeps the original's position in insertion order and is
    /// refiled under its new attribute values in every built index. Returns
    /// the replaced entity.
    ///
    /// Fails with [`IndexError::TypeMismatch`] if the entity's kind is not
    /// allowed, or [`IndexError::AttributeAccess`] if an indexed attribute
    /// cannot be read. On failure the collection is unchanged.
    pub fn add(&mut self, entity: T) -> Result<Option<T>> {
        self.check_kind(&entity)?;
        let id = self.identity_of(&entity)?;

        let paths = {
            let registry = self.indexes.borrow();
            let mut paths = Vec::with_capacity(registry.len());
            for layout in registry.layouts() {
                let path = self.path_of(&entity, &layout.attributes)?;
                paths.push((layout.signature.clone(), path));
            }
            paths
        };
        self.indexes.get_mut().place(&id, paths);

        let replaced = self.entities.insert(id, entity);
        Ok(replaced)
    }

    /// Adds entities in order, stopping at the first failure.
    pub fn add_all<I>(&mut self, entities: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        for entity in entities {
            self.add(entity)?;
        }
        Ok(())
    }

    /// Removes the entity with identity `id`.
    ///
    /// `id` is normalized like a stored identity first, so it matches
    /// whatever [`find_by`](Self::find_by) would match on the identity
    /// attribute.
    pub fn remove(&mut self, id: impl Into<Key>) -> Option<T> {
        let id = self.lookup_key(id.into());
        self.remove_stored(&id)
    }

    /// Removes the entity sharing `entity`'s identity.
    pub fn remove_entity(&mut self, entity: &T) -> Result<Option<T>> {
        let id = self.identity_of(entity)?;
        Ok(self.remove_stored(&id))
    }

    /// Removes every entity and drops every index.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.indexes.get_mut().clear();
    }

    // ========================================================================
    // Primary store access
    // ========================================================================

    /// The entity with identity `id`.
    pub fn find(&self, id: impl Into<Key>) -> Option<&T> {
        self.entities.get(&self.lookup_key(id.into()))
    }

    /// The stored entity sharing `entity`'s identity.
    pub fn find_entity(&self, entity: &T) -> Result<Option<&T>> {
        let id = self.identity_of(entity)?;
        Ok(self.entities.get(&id))
    }

    pub fn contains(&self, id: impl Into<Key>) -> bool {
        self.entities.contains_key(&self.lookup_key(id.into()))
    }

    pub fn first(&self) -> Option<&T> {
        self.entities.first().map(|(_, entity)| entity)
    }

    pub fn last(&self) -> Option<&T> {
        self.entities.last().map(|(_, entity)| entity)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entities.values()
    }

    /// Entities in reverse insertion order.
    pub fn iter_reversed(&self) -> impl Iterator<Item = &T> {
        self.entities.values().rev()
    }

    /// Entities ordered by identity.
    pub fn iter_sorted_by_identity(&self, dir: Dir) -> impl Iterator<Item = &T> {
        let mut entries: Vec<(&Key, &T)> = self.entities.iter().collect();
        entries.sort_by(|a, b| dir.apply(a.0.cmp(b.0)));
        entries.into_iter().map(|(_, entity)| entity)
    }

    /// Identities in insertion order.
    pub fn identities(&self) -> impl Iterator<Item = &Key> {
        self.entities.keys()
    }

    /// Entities in insertion order.
    pub fn to_vec(&self) -> Vec<&T> {
        self.entities.values().collect()
    }

    // ========================================================================
    // Index management
    // ========================================================================

    /// Builds the index for `names` now instead of on first query.
    pub fn ensure_index<S: AsRef<str>>(&self, names: &[S]) -> Result<Signature> {
        let layout = Layout::new(names);
        self.ensure(&layout)?;
        Ok(layout.signature)
    }

    /// Whether an index for `names` has been built.
    pub fn has_index<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.indexes.borrow().contains(&Signature::new(names))
    }

    /// Number of indexes built so far.
    pub fn index_count(&self) -> usize {
        self.indexes.borrow().len()
    }

    /// Signatures of the built indexes, in build order.
    pub fn index_signatures(&self) -> Vec<Signature> {
        self.indexes.borrow().signatures().cloned().collect()
    }

    // ========================================================================
    // Internals shared by the resolver and projections
    // ========================================================================

    fn check_kind(&self, entity: &T) -> Result<()> {
        let kind = entity.kind();
        if self.config.accepts_kind(kind) {
            Ok(())
        } else {
            Err(IndexError::TypeMismatch {
                expected: self.config.allowed_kinds().join(" | "),
                actual: kind.to_string(),
            })
        }
    }

    pub(crate) fn identity_of(&self, entity: &T) -> Result<Key> {
        match self.config.identity() {
            IdentityStrategy::Attribute(name) => {
                let value = self.accessor.get(entity, name)?;
                Ok(self.config.normalize(&value, Some(name)))
            }
            IdentityStrategy::Extract(f) => Ok(f(entity)),
        }
    }

    /// Normalizes a caller-supplied identity the way stored identities are.
    ///
    /// Identities produced by an extraction function are stored as returned,
    /// so caller keys pass through unchanged.
    fn lookup_key(&self, id: Key) -> Key {
        match self.config.identity() {
            IdentityStrategy::Attribute(name) => self.config.normalize(&id.as_value(), Some(name)),
            IdentityStrategy::Extract(_) => id,
        }
    }

    /// Removes a stored identity from the store and every index.
    pub(crate) fn remove_stored(&mut self, id: &Key) -> Option<T> {
        let removed = self.entities.shift_remove(id)?;
        self.indexes.get_mut().evict(id);
        trace!(?id, "removed entity");
        Some(removed)
    }

    pub(crate) fn attribute_key(&self, entity: &T, name: &str) -> Result<Key> {
        let value: Value<'_> = self.accessor.get(entity, name)?;
        Ok(self.config.normalize(&value, Some(name)))
    }

    pub(crate) fn path_of<S: AsRef<str>>(&self, entity: &T, attributes: &[S]) -> Result<Vec<Key>> {
        attributes
            .iter()
            .map(|name| self.attribute_key(entity, name.as_ref()))
            .collect()
    }

    pub(crate) fn operand_key(&self, operand: &Operand<'_, T>, name: &str) -> Result<Key> {
        match operand {
            Operand::Key(key) => Ok(self.config.normalize(&key.as_value(), Some(name))),
            Operand::Entity(entity) => {
                let id = self.identity_of(entity)?;
                Ok(self.config.normalize(&id.as_value(), Some(name)))
            }
        }
    }

    /// Builds the index for `layout` with one scan, unless it exists.
    pub(crate) fn ensure(&self, layout: &Layout) -> Result<()> {
        if self.indexes.borrow().contains(&layout.signature) {
            return Ok(());
        }
        let mut rows = Vec::with_capacity(self.entities.len());
        for (id, entity) in &self.entities {
            rows.push((id.clone(), self.path_of(entity, &layout.attributes)?));
        }
        self.indexes.borrow_mut().build(layout.clone(), rows);
        Ok(())
    }

    /// Identities matching `criteria`, in index order, deduplicated.
    pub(crate) fn resolve(&self, criteria: &Criteria<'_, T>) -> Result<IndexSet<Key>> {
        let layout = Layout::new(criteria.names());
        self.ensure(&layout)?;

        let mut levels = Vec::with_capacity(layout.depth());
        for name in &layout.attributes {
            let operands = match criteria.get(name) {
                Some(Criterion::One(operand)) => std::slice::from_ref(operand),
                Some(Criterion::AnyOf(operands)) => operands.as_slice(),
                None => &[],
            };
            let mut keys = Vec::with_capacity(operands.len());
            for operand in operands {
                keys.push(self.operand_key(operand, name)?);
            }
            levels.push(keys);
        }

        let registry = self.indexes.borrow();
        Ok(registry
            .get(&layout.signature)
            .map(|index| index.select(&levels))
            .unwrap_or_default())
    }
}

impl<T: Indexable> Default for Collection<T> {
    fn default() -> Self {
        Collection::new(CollectionConfig::default())
    }
}

impl<T: Indexable + Clone> Clone for Collection<T> {
    /// Clones the entities and configuration; indexes are rebuilt lazily.
    fn clone(&self) -> Self {
        Collection {
            config: self.config.clone(),
            accessor: Accessor::new(self.config.get_access_style()),
            entities: self.entities.clone(),
            indexes: RefCell::new(IndexRegistry::default()),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("entities", &self.entities)
            .field("indexes", &self.indexes.borrow().len())
            .finish()
    }
}

impl<'a, T: Indexable> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = indexmap::map::Values<'a, Key, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.values()
    }
}
