//! Property-based tests for collections using proptest.

use proptest::prelude::*;
use standout_index::{Collection, CollectionConfig, Criteria, Indexable, Key, Number, Value};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: i64,
    group: String,
    zone: u8,
}

impl Indexable for Item {
    fn attribute(&self, name: &str) -> Option<Value<'_>> {
        match name {
            "id" => Some(Value::Number(Number::I64(self.id))),
            "group" => Some(Value::String(&self.group)),
            "zone" => Some(Value::Number(Number::from(self.zone))),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Step {
    Add(Item),
    Remove(i64),
    Query(String, u8),
}

fn item_strategy() -> impl Strategy<Value = Item> {
    (0i64..20, "[a-c]", 0u8..3).prop_map(|(id, group, zone)| Item { id, group, zone })
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => item_strategy().prop_map(Step::Add),
        2 => (0i64..20).prop_map(Step::Remove),
        1 => ("[a-c]", 0u8..3).prop_map(|(group, zone)| Step::Query(group, zone)),
    ]
}

/// Reference model: the collection's contents as a plain ordered list.
fn apply_to_model(model: &mut Vec<Item>, step: &Step) {
    match step {
        Step::Add(item) => match model.iter_mut().find(|m| m.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => model.push(item.clone()),
        },
        Step::Remove(id) => model.retain(|m| m.id != *id),
        Step::Query(..) => {}
    }
}

fn scan<'a>(model: &'a [Item], group: &str, zone: u8) -> Vec<&'a Item> {
    model
        .iter()
        .filter(|m| m.group == group && m.zone == zone)
        .collect()
}

fn sorted_ids(items: &[&Item]) -> Vec<i64> {
    let mut ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    ids.sort();
    ids
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// An index maintained through adds and removes answers like a rescan.
    #[test]
    fn index_matches_rescan(steps in prop::collection::vec(step_strategy(), 0..60)) {
        let mut collection = Collection::new(CollectionConfig::new());
        let mut model: Vec<Item> = Vec::new();

        for step in &steps {
            match step {
                Step::Add(item) => {
                    collection.add(item.clone()).unwrap();
                }
                Step::Remove(id) => {
                    collection.remove(*id);
                }
                Step::Query(group, zone) => {
                    let criteria = Criteria::new().eq("group", group.as_str()).eq("zone", *zone);
                    let found = collection.find_by(&criteria).unwrap();
                    prop_assert_eq!(sorted_ids(&found), sorted_ids(&scan(&model, group, *zone)));
                }
            }
            apply_to_model(&mut model, step);
        }

        prop_assert_eq!(collection.len(), model.len());
        let stored: Vec<&Item> = collection.iter().collect();
        let expected: Vec<&Item> = model.iter().collect();
        prop_assert_eq!(stored, expected);

        for group in ["a", "b", "c"] {
            for zone in 0u8..3 {
                let criteria = Criteria::new().eq("group", group).eq("zone", zone);
                let found = collection.find_by(&criteria).unwrap();
                prop_assert_eq!(sorted_ids(&found), sorted_ids(&scan(&model, group, zone)));
                prop_assert_eq!(collection.has_by(&criteria).unwrap(), !found.is_empty());
            }
        }
    }

    /// Criteria order never changes the result or the index used.
    #[test]
    fn criteria_order_independent(
        items in prop::collection::vec(item_strategy(), 0..40),
        group in "[a-c]",
        zone in 0u8..3,
    ) {
        let collection = Collection::with_entities(CollectionConfig::new(), items).unwrap();
        let forward = Criteria::new().eq("group", group.as_str()).eq("zone", zone);
        let backward = Criteria::new().eq("zone", zone).eq("group", group.as_str());

        let a: Vec<i64> = collection.find_by(&forward).unwrap().iter().map(|i| i.id).collect();
        let b: Vec<i64> = collection.find_by(&backward).unwrap().iter().map(|i| i.id).collect();
        prop_assert_eq!(a, b);
        prop_assert_eq!(collection.index_count(), 1);
    }

    /// An OR list returns the union of its single-value results, once each.
    #[test]
    fn or_list_is_union(
        items in prop::collection::vec(item_strategy(), 0..40),
        groups in prop::collection::vec("[a-c]", 0..4),
    ) {
        let collection = Collection::with_entities(CollectionConfig::new(), items).unwrap();
        let union = collection
            .find_by(&Criteria::new().any_of("group", groups.iter().map(String::as_str)))
            .unwrap();

        let mut expected: Vec<i64> = Vec::new();
        for group in &groups {
            for item in collection.find_by(&Criteria::new().eq("group", group.as_str())).unwrap() {
                if !expected.contains(&item.id) {
                    expected.push(item.id);
                }
            }
        }

        let got: Vec<i64> = union.iter().map(|i| i.id).collect();
        prop_assert_eq!(got, expected);
    }

    /// Flattening a grouped map gives back every entity exactly once.
    #[test]
    fn to_map_flatten_round_trip(items in prop::collection::vec(item_strategy(), 0..40)) {
        let collection = Collection::with_entities(CollectionConfig::new(), items).unwrap();
        let map = collection.to_map(&["zone", "group"]).unwrap();

        for (path, leaf) in map.leaves() {
            for item in leaf {
                prop_assert_eq!(path[0], &Key::from(item.zone));
                prop_assert_eq!(path[1], &Key::from(item.group.as_str()));
            }
        }

        let flat = map.flatten();
        prop_assert_eq!(sorted_ids(&flat), sorted_ids(&collection.to_vec()));
    }

    /// Removing everything leaves empty indexes behind, not stale branches.
    #[test]
    fn removing_everything_empties_projections(items in prop::collection::vec(item_strategy(), 0..30)) {
        let mut collection = Collection::with_entities(CollectionConfig::new(), items).unwrap();
        collection.to_map(&["group"]).unwrap();

        let ids: Vec<Key> = collection.identities().cloned().collect();
        for id in ids {
            prop_assert!(collection.remove(id).is_some());
        }

        prop_assert!(collection.to_map(&["group"]).unwrap().is_empty());
        prop_assert!(!collection.has_by(&Criteria::new()).unwrap());
    }
}
