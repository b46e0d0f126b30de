//! Query builder.
//!
//! [`Query`] is the fluent form of criteria lookups: start it with
//! [`Collection::query`], add equality criteria, then finish with one of the
//! executing methods.

use crate::collection::Collection;
use crate::criteria::{Criteria, Criterion};
use crate::error::Result;
use crate::nested::NestedMap;
use crate::traits::Indexable;
use crate::value::Key;

/// A pending lookup against one collection.
///
/// Criteria are combined with AND. Listing several values for one attribute
/// with [`by_any`](Query::by_any) matches any of them.
///
/// # Example
///
/// ```
/// use standout_index::{Collection, Indexable, Number, Value};
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
///         Task { id: 1, group: "docs" },
///         Task { id: 2, group: "bugs" },
///         Task { id: 3, group: "docs" },
///     ],
/// )?;
///
/// let found = tasks.query().by("group", "docs").by_any("id", [2, 3]).all()?;
/// assert_eq!(found.len(), 1);
/// assert!(tasks.query().by("group", "bugs").exists()?);
/// # Ok::<(), standout_index::IndexError>(())
/// ```
pub struct Query<'c, 'a, T> {
    collection: &'c Collection<T>,
    criteria: Criteria<'a, T>,
}

impl<'c, 'a, T: Indexable> Query<'c, 'a, T> {
    pub fn new(collection: &'c Collection<T>) -> Self {
        Query {
            collection,
            criteria: Criteria::new(),
        }
    }

    // ========================================================================
    // Criteria
    // ========================================================================

    /// `name` must equal `key`.
    pub fn by(mut self, name: &str, key: impl Into<Key>) -> Self {
        self.criteria = self.criteria.eq(name, key);
        self
    }

    /// `name` must equal the identity of `entity`.
    pub fn by_entity(mut self, name: &str, entity: &'a T) -> Self {
        self.criteria = self.criteria.eq_entity(name, entity);
        self
    }

    /// `name` must equal one of `keys`.
    pub fn by_any<I>(mut self, name: &str, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        self.criteria = self.criteria.any_of(name, keys);
        self
    }

    /// `name` must equal the identity of one of `entities`.
    pub fn by_any_entity<I>(mut self, name: &str, entities: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
    {
        self.criteria = self.criteria.any_of_entities(name, entities);
        self
    }

    pub fn with(mut self, name: &str, criterion: Criterion<'a, T>) -> Self {
        self.criteria = self.criteria.with(name, criterion);
        self
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Every matching entity.
    pub fn all(&self) -> Result<Vec<&'c T>> {
        self.collection.find_by(&self.criteria)
    }

    /// The first matching entity.
    pub fn one(&self) -> Result<Option<&'c T>> {
        self.collection.find_one_by(&self.criteria)
    }

    /// Whether anything matches.
    pub fn exists(&self) -> Result<bool> {
        self.collection.has_by(&self.criteria)
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.all()?.len())
    }

    /// Matching entities grouped by `keys`.
    pub fn to_map(&self, keys: &[&str]) -> Result<NestedMap<Vec<&'c T>>> {
        self.collection.find_to_map_by(&self.criteria, Some(keys))
    }

    /// The first matching entity at every `keys` path.
    pub fn to_one_map(&self, keys: &[&str]) -> Result<NestedMap<&'c T>> {
        self.collection.find_one_to_map_by(&self.criteria, Some(keys))
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn criteria(&self) -> &Criteria<'a, T> {
        &self.criteria
    }

    pub fn into_criteria(self) -> Criteria<'a, T> {
        self.criteria
    }

    /// Returns `true` if no criteria were added (matches everything).
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

impl<T: Indexable> Collection<T> {
    /// Starts a [`Query`] against this collection.
    pub fn query<'a>(&self) -> Query<'_, 'a, T> {
        Query::new(self)
    }
}
