//! Criteria queries against a [`Collection`].
//!
//! Every query resolves its criteria to a list of identities through the
//! index for the criteria's signature, then dereferences them against the
//! primary store. Identities are returned in index order: grouped by the
//! first attribute in signature order, then by insertion within a group.

use indexmap::IndexSet;

use crate::collection::Collection;
use crate::criteria::Criteria;
use crate::error::Result;
use crate::nested::NestedMap;
use crate::traits::Indexable;
use crate::value::Key;

impl<T: Indexable> Collection<T> {
    /// Whether any entity matches `criteria`.
    pub fn has_by(&self, criteria: &Criteria<'_, T>) -> Result<bool> {
        let ids = self.resolve(criteria)?;
        Ok(ids.iter().any(|id| self.entities.contains_key(id)))
    }

    /// Every entity matching `criteria`.
    ///
    /// Empty criteria match every entity; an [`any_of`](Criteria::any_of)
    /// criterion with no values matches none.
    pub fn find_by(&self, criteria: &Criteria<'_, T>) -> Result<Vec<&T>> {
        let ids = self.resolve(criteria)?;
        Ok(self.dereference(ids).collect())
    }

    /// The earliest-inserted entity matching `criteria`.
    pub fn find_one_by(&self, criteria: &Criteria<'_, T>) -> Result<Option<&T>> {
        let ids = self.resolve(criteria)?;
        Ok(self
            .first_stored(&ids)
            .and_then(|position| self.entities.get_index(position))
            .map(|(_, entity)| entity))
    }

    /// Matching entities grouped by `keys`, or by the criteria's own
    /// attributes (in criteria order) when `keys` is `None`.
    ///
    /// ```
    /// use standout_index::{Collection, Criteria, Indexable, Key, Number, Value};
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
    ///     [Task { id: 3, group: "qwer" }, Task { id: 4, group: "qwer" }],
    /// )?;
    /// let map = tasks.find_to_map_by(&Criteria::new().eq("group", "qwer"), Some(&["group", "id"][..]))?;
    /// let leaf = map.leaf(&[Key::from("qwer"), Key::Int(4)]).unwrap();
    /// assert_eq!(leaf[0].id, 4);
    /// # Ok::<(), standout_index::IndexError>(())
    /// ```
    pub fn find_to_map_by(
        &self,
        criteria: &Criteria<'_, T>,
        keys: Option<&[&str]>,
    ) -> Result<NestedMap<Vec<&T>>> {
        let names = grouping_names(criteria, keys);
        let ids = self.resolve(criteria)?;
        let mut map = NestedMap::new();
        for entity in self.dereference(ids) {
            let path = self.path_of(entity, &names)?;
            map.push(&path, entity);
        }
        Ok(map)
    }

    /// Like [`find_to_map_by`](Self::find_to_map_by), keeping only the first
    /// entity at each path.
    pub fn find_one_to_map_by(
        &self,
        criteria: &Criteria<'_, T>,
        keys: Option<&[&str]>,
    ) -> Result<NestedMap<&T>> {
        let names = grouping_names(criteria, keys);
        let ids = self.resolve(criteria)?;
        let mut map = NestedMap::new();
        for entity in self.dereference(ids) {
            let path = self.path_of(entity, &names)?;
            map.insert_first(&path, entity);
        }
        Ok(map)
    }

    /// Removes the earliest-inserted entity matching `criteria`.
    pub fn remove_by(&mut self, criteria: &Criteria<'_, T>) -> Result<Option<T>> {
        let ids = self.resolve(criteria)?;
        let first = self
            .first_stored(&ids)
            .and_then(|position| self.entities.get_index(position))
            .map(|(id, _)| id.clone());
        Ok(first.and_then(|id| self.remove_stored(&id)))
    }

    /// Stored entities for `ids`, skipping identities no longer present.
    fn dereference(&self, ids: IndexSet<Key>) -> impl Iterator<Item = &T> {
        ids.into_iter().filter_map(move |id| self.entities.get(&id))
    }

    /// Store position of the earliest-inserted identity in `ids`.
    ///
    /// An any-of criterion yields one leaf per listed value, so index order
    /// follows the list rather than insertion.
    fn first_stored(&self, ids: &IndexSet<Key>) -> Option<usize> {
        ids.iter().filter_map(|id| self.entities.get_index_of(id)).min()
    }
}

fn grouping_names<T>(criteria: &Criteria<'_, T>, keys: Option<&[&str]>) -> Vec<String> {
    match keys {
        Some(keys) => keys.iter().map(|key| key.to_string()).collect(),
        None => criteria.names().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectionConfig;
    use crate::value::{Number, Value};

    #[derive(Debug, Clone, PartialEq)]
    struct Task {
        id: i64,
        group: &'static str,
        owner: Option<i64>,
    }

    impl Indexable for Task {
        fn attribute(&self, name: &str) -> Option<Value<'_>> {
            match name {
                "id" => Some(Value::Number(Number::I64(self.id))),
                "group" => Some(Value::String(self.group)),
                "owner" => Some(match self.owner {
                    Some(owner) => Value::Number(Number::I64(owner)),
                    None => Value::None,
                }),
                _ => None,
            }
        }
    }

    fn task(id: i64, group: &'static str) -> Task {
        Task { id, group, owner: None }
    }

    fn tasks(groups: &[&'static str]) -> Collection<Task> {
        Collection::with_entities(
            CollectionConfig::new(),
            groups.iter().enumerate().map(|(i, g)| task(i as i64 + 1, g)),
        )
        .unwrap()
    }

    fn ids(found: Vec<&Task>) -> Vec<i64> {
        found.into_iter().map(|t| t.id).collect()
    }

    #[test]
    fn find_one_by_identity_attribute() {
        let tasks = tasks(&["asdf", "zxcv", "qwer"]);
        let found = tasks.find_one_by(&Criteria::new().eq("id", 2)).unwrap();
        assert_eq!(found.unwrap().group, "zxcv");
        assert!(tasks.find_one_by(&Criteria::new().eq("id", 9)).unwrap().is_none());
    }

    #[test]
    fn or_list_unions_without_duplicates() {
        let tasks = tasks(&["asdf", "zxcv", "qwer", "zxcv", "hjkl"]);
        let criteria = Criteria::new().any_of("group", ["zxcv", "qwer", "zxcv"]);
        assert_eq!(ids(tasks.find_by(&criteria).unwrap()), [2, 4, 3]);
    }

    #[test]
    fn empty_or_list_matches_nothing() {
        let tasks = tasks(&["asdf"]);
        let criteria = Criteria::new().any_of("group", Vec::<&str>::new());
        assert!(tasks.find_by(&criteria).unwrap().is_empty());
        assert!(!tasks.has_by(&criteria).unwrap());
    }

    #[test]
    fn empty_criteria_match_everything() {
        let tasks = tasks(&["a", "b", "c"]);
        assert_eq!(ids(tasks.find_by(&Criteria::new()).unwrap()), [1, 2, 3]);
    }

    #[test]
    fn criteria_order_shares_index() {
        let tasks = tasks(&["a", "b", "a"]);
        let forward = Criteria::new().eq("group", "a").eq("id", 3);
        let backward = Criteria::new().eq("id", 3).eq("group", "a");
        assert_eq!(
            ids(tasks.find_by(&forward).unwrap()),
            ids(tasks.find_by(&backward).unwrap())
        );
        assert_eq!(tasks.index_count(), 1);
    }

    #[test]
    fn entity_operand_uses_identity() {
        let mut tasks = tasks(&["a", "b"]);
        tasks
            .add(Task { id: 3, group: "c", owner: Some(1) })
            .unwrap();
        let owner = task(1, "ignored");
        let found = tasks
            .find_by(&Criteria::new().eq_entity("owner", &owner))
            .unwrap();
        assert_eq!(ids(found), [3]);
    }

    #[test]
    fn unset_attribute_is_null() {
        let tasks = tasks(&["a", "b"]);
        let found = tasks.find_by(&Criteria::new().eq("owner", Key::Null)).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn missing_attribute_is_an_error() {
        let tasks = tasks(&["a"]);
        assert!(tasks.find_by(&Criteria::new().eq("nope", 1)).is_err());
    }

    #[test]
    fn map_defaults_to_criteria_names() {
        let tasks = tasks(&["a", "b", "a"]);
        let map = tasks
            .find_to_map_by(&Criteria::new().any_of("group", ["a", "b"]), None)
            .unwrap();
        assert_eq!(map.depth(), 1);
        assert_eq!(ids(map.leaf(&[Key::from("a")]).unwrap().clone()), [1, 3]);
    }

    #[test]
    fn one_map_keeps_first() {
        let tasks = tasks(&["a", "b", "a"]);
        let map = tasks
            .find_one_to_map_by(&Criteria::new(), Some(&["group"][..]))
            .unwrap();
        assert_eq!(map.leaf(&[Key::from("a")]).unwrap().id, 1);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn first_match_follows_insertion_order_across_or_values() {
        let mut tasks = tasks(&["qwer", "zxcv", "qwer"]);
        let criteria = Criteria::new().any_of("group", ["zxcv", "qwer"]);
        assert_eq!(ids(tasks.find_by(&criteria).unwrap()), [2, 1, 3]);
        assert_eq!(tasks.find_one_by(&criteria).unwrap().unwrap().id, 1);

        assert_eq!(tasks.remove_by(&criteria).unwrap().unwrap().id, 1);
        assert_eq!(tasks.remove_by(&criteria).unwrap().unwrap().id, 2);
        assert_eq!(ids(tasks.find_by(&criteria).unwrap()), [3]);
    }

    #[test]
    fn remove_by_first_match() {
        let mut tasks = tasks(&["a", "b", "a"]);
        let removed = tasks.remove_by(&Criteria::new().eq("group", "a")).unwrap();
        assert_eq!(removed.unwrap().id, 1);
        assert_eq!(ids(tasks.find_by(&Criteria::new().eq("group", "a")).unwrap()), [3]);
        assert!(tasks.remove_by(&Criteria::new().eq("group", "z")).unwrap().is_none());
    }
}
