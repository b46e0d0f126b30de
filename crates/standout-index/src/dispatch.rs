//! Method-name dispatch.
//!
//! Names of the form `<verb>_by_<attr>[_and_<attr>...]` (or their camel-case
//! spelling, `getByGroupAndId`) are parsed into a [`Method`] and routed to
//! the matching collection operation by [`Collection::call`]. Attribute
//! names keep the spelling convention of the method name, so camel-case
//! methods read camel-case attributes. This lets
//! callers that only know attribute names at runtime, such as a command
//! line or a scripting bridge, reach the same indexes as typed code.

use std::fmt;
use std::str::FromStr;

use heck::{ToLowerCamelCase, ToSnakeCase};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::collection::Collection;
use crate::criteria::{Criteria, Criterion};
use crate::error::{IndexError, Result};
use crate::nested::NestedMap;
use crate::signature::{Layout, Signature};
use crate::traits::Indexable;

static METHOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-z]+)_by_([a-z0-9]+(?:_[a-z0-9]+)*)$").expect("valid method regex")
});

/// Operation named by a method's verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Find every matching entity.
    Get,
    /// Test whether anything matches.
    Has,
    /// Build the index ahead of time.
    Set,
    /// Remove the first matching entity.
    Remove,
    /// Group the whole collection by the named attributes.
    Group,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Has => "has",
            Verb::Set => "set",
            Verb::Remove => "remove",
            Verb::Group => "group",
        }
    }

    /// Whether the verb takes one criterion per attribute.
    pub fn takes_criteria(self) -> bool {
        matches!(self, Verb::Get | Verb::Has | Verb::Remove)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed method name.
///
/// ```
/// use standout_index::{Method, Verb};
///
/// let method: Method = "getByGroupAndId".parse()?;
/// assert_eq!(method.verb, Verb::Get);
/// assert_eq!(method.attributes, ["group", "id"]);
/// # Ok::<(), standout_index::IndexError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub verb: Verb,
    /// Attribute names in the order they appear in the name, snake case for
    /// snake-case methods and lower camel case for camel-case ones.
    pub attributes: Vec<String>,
}

impl Method {
    pub fn parse(name: &str) -> Result<Self> {
        let snake = name.to_snake_case();
        let caps = METHOD_RE
            .captures(&snake)
            .ok_or_else(|| IndexError::unsupported(name, "expected <verb>_by_<attr>[_and_<attr>...]"))?;

        let verb = match &caps[1] {
            "get" => Verb::Get,
            "has" => Verb::Has,
            "set" => Verb::Set,
            "remove" => Verb::Remove,
            "group" => Verb::Group,
            other => {
                return Err(IndexError::unsupported(
                    name,
                    format!("unknown verb '{}'", other),
                ))
            }
        };

        let segments: Vec<&str> = caps[2].split("_and_").collect();
        if segments.iter().any(|a| a.is_empty() || *a == "and") {
            return Err(IndexError::unsupported(name, "empty attribute name"));
        }
        let camel = !name.contains('_');
        let attributes = segments
            .into_iter()
            .map(|segment| {
                if camel {
                    segment.to_lower_camel_case()
                } else {
                    segment.to_string()
                }
            })
            .collect();

        Ok(Method { verb, attributes })
    }

    pub fn signature(&self) -> Signature {
        Signature::new(&self.attributes)
    }

    /// Number of arguments a call must supply.
    pub fn arity(&self) -> usize {
        if self.verb.takes_criteria() {
            self.attributes.len()
        } else {
            0
        }
    }
}

impl FromStr for Method {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self> {
        Method::parse(s)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attributes: Vec<String> = self.attributes.iter().map(|a| a.to_snake_case()).collect();
        write!(f, "{}_by_{}", self.verb, attributes.join("_and_"))
    }
}

/// What a dispatched call produced.
#[derive(Debug)]
pub enum Outcome<'c, T> {
    Found(Vec<&'c T>),
    Exists(bool),
    Indexed(Signature),
    Removed(Option<T>),
    Grouped(NestedMap<Vec<&'c T>>),
}

impl<'c, T> Outcome<'c, T> {
    pub fn found(self) -> Option<Vec<&'c T>> {
        match self {
            Outcome::Found(entities) => Some(entities),
            _ => None,
        }
    }

    pub fn exists(&self) -> Option<bool> {
        match self {
            Outcome::Exists(exists) => Some(*exists),
            _ => None,
        }
    }

    pub fn removed(self) -> Option<T> {
        match self {
            Outcome::Removed(entity) => entity,
            _ => None,
        }
    }

    pub fn grouped(self) -> Option<NestedMap<Vec<&'c T>>> {
        match self {
            Outcome::Grouped(map) => Some(map),
            _ => None,
        }
    }
}

impl<T: Indexable> Collection<T> {
    /// Calls an operation by method name.
    ///
    /// `get`, `has` and `remove` take one criterion per attribute, in the
    /// order the attributes appear in the name. `set` and `group` take none.
    ///
    /// `getByGroupId` reads the attribute `groupId` and `get_by_group_id`
    /// reads `group_id`, before the collection's [`AccessStyle`] applies.
    /// Both spellings share one index.
    ///
    /// [`AccessStyle`]: crate::AccessStyle
    ///
    /// ```
    /// use standout_index::{Collection, Criterion, Indexable, Number, Operand, Outcome, Value};
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
    /// let mut tasks = Collection::with_entities(
    ///     Default::default(),
    ///     [Task { id: 1, group: "docs" }, Task { id: 2, group: "bugs" }],
    /// )?;
    ///
    /// let args = vec![Criterion::One(Operand::key("bugs"))];
    /// let found = tasks.call("getByGroup", args)?.found().unwrap();
    /// assert_eq!(found[0].id, 2);
    /// # Ok::<(), standout_index::IndexError>(())
    /// ```
    pub fn call<'a>(&mut self, method: &str, args: Vec<Criterion<'a, T>>) -> Result<Outcome<'_, T>> {
        let parsed = Method::parse(method)?;
        if args.len() != parsed.arity() {
            return Err(IndexError::unsupported(
                method,
                format!("expected {} argument(s), got {}", parsed.arity(), args.len()),
            ));
        }

        let layout = Layout::new(&parsed.attributes);
        if parsed.verb != Verb::Set {
            self.ensure(&layout)?;
        }

        let criteria = parsed
            .attributes
            .iter()
            .zip(args)
            .fold(Criteria::new(), |criteria, (name, criterion)| {
                criteria.with(name, criterion)
            });

        match parsed.verb {
            Verb::Get => Ok(Outcome::Found(self.find_by(&criteria)?)),
            Verb::Has => Ok(Outcome::Exists(self.has_by(&criteria)?)),
            Verb::Set => Ok(Outcome::Indexed(self.ensure_index(&parsed.attributes)?)),
            Verb::Remove => Ok(Outcome::Removed(self.remove_by(&criteria)?)),
            Verb::Group => Ok(Outcome::Grouped(self.to_map(&parsed.attributes)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectionConfig;
    use crate::criteria::Operand;
    use crate::value::{Key, Number, Value};

    #[derive(Debug, PartialEq)]
    struct Task {
        id: i64,
        group: &'static str,
    }

    impl Indexable for Task {
        fn attribute(&self, name: &str) -> Option<Value<'_>> {
            match name {
                "id" => Some(Value::Number(Number::I64(self.id))),
                "group" => Some(Value::String(self.group)),
                _ => None,
            }
        }
    }

    fn tasks() -> Collection<Task> {
        Collection::with_entities(
            CollectionConfig::new(),
            [
                Task { id: 1, group: "asdf" },
                Task { id: 2, group: "zxcv" },
                Task { id: 3, group: "qwer" },
            ],
        )
        .unwrap()
    }

    fn one<'a>(key: impl Into<Key>) -> Criterion<'a, Task> {
        Criterion::One(Operand::key(key))
    }

    #[test]
    fn parse_snake_and_camel() {
        let snake = Method::parse("get_by_group_and_id").unwrap();
        let camel = Method::parse("getByGroupAndId").unwrap();
        assert_eq!(snake, camel);
        assert_eq!(snake.to_string(), "get_by_group_and_id");
        assert_eq!(snake.arity(), 2);
    }

    #[test]
    fn parse_multiword_attribute() {
        let camel = Method::parse("hasByGroupIdAndCreatedAt").unwrap();
        assert_eq!(camel.verb, Verb::Has);
        assert_eq!(camel.attributes, ["groupId", "createdAt"]);
        assert_eq!(camel.signature(), Signature::new(["createdAt", "GroupId"]));
        assert_eq!(camel.to_string(), "has_by_group_id_and_created_at");

        let snake = Method::parse("has_by_group_id_and_created_at").unwrap();
        assert_eq!(snake.attributes, ["group_id", "created_at"]);
        assert_eq!(snake.signature(), camel.signature());
    }

    #[test]
    fn parse_rejects_unknown_verbs_and_shapes() {
        for name in ["fetchById", "getBy", "group", "get_id", "by_id", ""] {
            let err = Method::parse(name).unwrap_err();
            assert!(
                matches!(err, IndexError::UnsupportedOperation { .. }),
                "{}: {:?}",
                name,
                err
            );
        }
    }

    #[test]
    fn get_and_has() {
        let mut tasks = tasks();
        let found = tasks.call("getByGroup", vec![one("qwer")]).unwrap().found().unwrap();
        assert_eq!(found, [&Task { id: 3, group: "qwer" }]);

        let exists = tasks
            .call("has_by_group_and_id", vec![one("zxcv"), one(2)])
            .unwrap()
            .exists();
        assert_eq!(exists, Some(true));
    }

    #[test]
    fn any_of_argument() {
        let mut tasks = tasks();
        let args = vec![Criterion::AnyOf(vec![Operand::key("asdf"), Operand::key("qwer")])];
        let found = tasks.call("getByGroup", args).unwrap().found().unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn set_builds_index_without_query() {
        let mut tasks = tasks();
        let outcome = tasks.call("setByGroup", Vec::new()).unwrap();
        assert!(matches!(outcome, Outcome::Indexed(ref s) if s.as_str() == "Group"));
        assert!(tasks.has_index(&["group"]));
    }

    #[test]
    fn get_builds_index_on_demand() {
        let mut tasks = tasks();
        assert_eq!(tasks.index_count(), 0);
        tasks.call("getById", vec![one(1)]).unwrap();
        assert!(tasks.has_index(&["id"]));
    }

    #[test]
    fn remove_and_group() {
        let mut tasks = tasks();
        let removed = tasks.call("removeById", vec![one(2)]).unwrap().removed();
        assert_eq!(removed.unwrap().id, 2);
        assert_eq!(tasks.len(), 2);

        let grouped = tasks.call("groupByGroup", Vec::new()).unwrap().grouped().unwrap();
        assert_eq!(grouped.len(), 2);
        assert!(grouped.child("zxcv").is_none());
    }

    #[derive(Debug)]
    struct Member {
        id: i64,
        group_id: i64,
    }

    impl Indexable for Member {
        fn attribute(&self, name: &str) -> Option<Value<'_>> {
            match name {
                "id" => Some(Value::Number(Number::I64(self.id))),
                "groupId" => Some(Value::Number(Number::I64(self.group_id))),
                _ => None,
            }
        }
    }

    #[test]
    fn camel_method_reads_camel_attribute_as_is() {
        let mut members = Collection::with_entities(
            CollectionConfig::new(),
            [Member { id: 1, group_id: 7 }, Member { id: 2, group_id: 8 }],
        )
        .unwrap();
        let found = members
            .call("getByGroupId", vec![Criterion::One(Operand::key(8))])
            .unwrap()
            .found()
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 2);

        assert_eq!(members.index_count(), 1);
        assert!(members.has_index(&["group_id"]));
    }

    #[test]
    fn argument_count_must_match() {
        let mut tasks = tasks();
        let err = tasks.call("getByGroupAndId", vec![one("qwer")]).unwrap_err();
        assert!(matches!(err, IndexError::UnsupportedOperation { ref method, .. } if method == "getByGroupAndId"));

        let err = tasks.call("setByGroup", vec![one("qwer")]).unwrap_err();
        assert!(matches!(err, IndexError::UnsupportedOperation { .. }));
    }
}
