//! Criteria for equality lookups.
//!
//! [`Criteria`] maps attribute names to a [`Criterion`]: either one operand
//! that must be equal, or a list of operands any of which may be equal (OR).
//! An [`Operand`] is a key or a reference to another entity, which is
//! replaced by that entity's identity when the criteria are resolved.

use std::fmt;

use indexmap::IndexMap;

use crate::signature::word;
use crate::value::Key;

/// A single value to compare an attribute against.
pub enum Operand<'a, T> {
    Key(Key),
    /// Stands for the referenced entity's identity.
    Entity(&'a T),
}

impl<'a, T> Operand<'a, T> {
    pub fn key(key: impl Into<Key>) -> Self {
        Operand::Key(key.into())
    }

    pub fn entity(entity: &'a T) -> Self {
        Operand::Entity(entity)
    }
}

impl<T> Clone for Operand<'_, T> {
    fn clone(&self) -> Self {
        match self {
            Operand::Key(key) => Operand::Key(key.clone()),
            Operand::Entity(entity) => Operand::Entity(entity),
        }
    }
}

impl<T> fmt::Debug for Operand<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Operand::Entity(_) => f.write_str("Entity(..)"),
        }
    }
}

/// What an attribute must equal.
pub enum Criterion<'a, T> {
    One(Operand<'a, T>),
    /// Any listed operand matches. An empty list matches nothing.
    AnyOf(Vec<Operand<'a, T>>),
}

impl<'a, T> Criterion<'a, T> {
    pub fn operands(&self) -> &[Operand<'a, T>] {
        match self {
            Criterion::One(operand) => std::slice::from_ref(operand),
            Criterion::AnyOf(operands) => operands,
        }
    }
}

impl<T> Clone for Criterion<'_, T> {
    fn clone(&self) -> Self {
        match self {
            Criterion::One(operand) => Criterion::One(operand.clone()),
            Criterion::AnyOf(operands) => Criterion::AnyOf(operands.clone()),
        }
    }
}

impl<T> fmt::Debug for Criterion<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::One(operand) => f.debug_tuple("One").field(operand).finish(),
            Criterion::AnyOf(operands) => f.debug_tuple("AnyOf").field(operands).finish(),
        }
    }
}

/// An ordered set of attribute criteria, combined with AND.
///
/// Attribute names are compared by word form, so setting `group_id` and then
/// `groupId` replaces the first criterion rather than adding a second one.
///
/// ```
/// use standout_index::Criteria;
///
/// struct Task;
///
/// let criteria = Criteria::<Task>::new()
///     .eq("group", "qwer")
///     .any_of("id", [3, 4]);
/// assert_eq!(criteria.names().collect::<Vec<_>>(), ["group", "id"]);
/// ```
pub struct Criteria<'a, T> {
    entries: IndexMap<String, (String, Criterion<'a, T>)>,
}

impl<'a, T> Criteria<'a, T> {
    /// Empty criteria, which match every entity.
    pub fn new() -> Self {
        Criteria {
            entries: IndexMap::new(),
        }
    }

    pub fn with(mut self, name: &str, criterion: Criterion<'a, T>) -> Self {
        self.entries
            .insert(word(name), (name.to_string(), criterion));
        self
    }

    /// `name` must equal `key`.
    pub fn eq(self, name: &str, key: impl Into<Key>) -> Self {
        self.with(name, Criterion::One(Operand::key(key)))
    }

    /// `name` must equal the identity of `entity`.
    pub fn eq_entity(self, name: &str, entity: &'a T) -> Self {
        self.with(name, Criterion::One(Operand::Entity(entity)))
    }

    /// `name` must equal one of `keys`.
    pub fn any_of<I>(self, name: &str, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let operands = keys.into_iter().map(|key| Operand::Key(key.into())).collect();
        self.with(name, Criterion::AnyOf(operands))
    }

    /// `name` must equal the identity of one of `entities`.
    pub fn any_of_entities<I>(self, name: &str, entities: I) -> Self
    where
        I: IntoIterator<Item = &'a T>,
    {
        let operands = entities.into_iter().map(Operand::Entity).collect();
        self.with(name, Criterion::AnyOf(operands))
    }

    /// Attribute names in the order they were first given.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(name, _)| name.as_str())
    }

    /// The criterion for `name`, matched by word form.
    pub fn get(&self, name: &str) -> Option<&Criterion<'a, T>> {
        self.entries.get(&word(name)).map(|(_, criterion)| criterion)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for Criteria<'_, T> {
    fn default() -> Self {
        Criteria::new()
    }
}

impl<T> Clone for Criteria<'_, T> {
    fn clone(&self) -> Self {
        Criteria {
            entries: self.entries.clone(),
        }
    }
}

impl<T> fmt::Debug for Criteria<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.values().map(|(name, c)| (name, c)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item;

    #[test]
    fn builder_keeps_first_order() {
        let criteria = Criteria::<Item>::new()
            .eq("b", 1)
            .eq("a", 2)
            .eq("b", 3);
        assert_eq!(criteria.names().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(criteria.len(), 2);
        match criteria.get("b").unwrap() {
            Criterion::One(Operand::Key(key)) => assert_eq!(*key, Key::Int(3)),
            other => panic!("unexpected criterion {:?}", other),
        }
    }

    #[test]
    fn names_match_by_word() {
        let criteria = Criteria::<Item>::new().eq("group_id", 1);
        assert!(criteria.get("groupId").is_some());
        assert!(criteria.get("GroupId").is_some());
        assert!(criteria.get("group").is_none());
    }

    #[test]
    fn any_of_collects_operands() {
        let criteria = Criteria::<Item>::new().any_of("group", ["x", "y"]);
        assert_eq!(criteria.get("group").unwrap().operands().len(), 2);

        let empty = Criteria::<Item>::new().any_of("group", Vec::<i64>::new());
        assert!(empty.get("group").unwrap().operands().is_empty());
    }

    #[test]
    fn entity_operands() {
        let a = Item;
        let b = Item;
        let criteria = Criteria::new()
            .eq_entity("owner", &a)
            .any_of_entities("peer", [&a, &b]);
        assert!(matches!(
            criteria.get("owner"),
            Some(Criterion::One(Operand::Entity(_)))
        ));
        assert_eq!(criteria.get("peer").unwrap().operands().len(), 2);
    }

    #[test]
    fn criterion_debug() {
        let criterion: Criterion<'_, Item> = Criterion::One(Operand::key(5));
        assert_eq!(format!("{:?}", criterion), "One(Key(Int(5)))");
    }

    #[test]
    fn empty_criteria() {
        assert!(Criteria::<Item>::default().is_empty());
    }
}
