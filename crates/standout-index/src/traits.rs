//! Traits for derive macro support.
//!
//! [`Indexable`] is the single seam between a collection and the entities it
//! holds: the collection never looks inside an entity except through
//! [`Indexable::attribute`]. It is usually generated by
//! `#[derive(Indexable)]` (feature `derive`).

use crate::value::{Timestamp, Value};

/// Trait for types that can be held in an indexed [`Collection`].
///
/// # Derive Usage
///
/// ```ignore
/// use standout_index::{Collection, Criteria, Indexable};
///
/// #[derive(Indexable)]
/// struct Task {
///     #[index(Number)]
///     id: u32,
///     #[index(String)]
///     group: String,
///     #[index(skip)]
///     notes: String,
/// }
///
/// let tasks = Collection::with_entities(Default::default(), vec![
///     Task { id: 1, group: "docs".into(), notes: String::new() },
/// ])?;
/// assert!(tasks.has_by(&Criteria::new().eq(Task::GROUP, "docs"))?);
/// ```
///
/// # Manual Implementation
///
/// ```
/// use standout_index::{Indexable, Number, Value};
///
/// struct Task {
///     id: u32,
///     group: String,
/// }
///
/// impl Indexable for Task {
///     fn attribute(&self, name: &str) -> Option<Value<'_>> {
///         match name {
///             "id" => Some(Value::Number(Number::from(self.id))),
///             "group" => Some(Value::String(&self.group)),
///             _ => None,
///         }
///     }
///
///     fn attributes() -> &'static [&'static str] {
///         &["id", "group"]
///     }
/// }
/// ```
///
/// [`Collection`]: crate::Collection
pub trait Indexable {
    /// Returns the value of a named attribute.
    ///
    /// Returning `None` means the attribute does not exist on this entity,
    /// which the collection reports as [`IndexError::AttributeAccess`]. An
    /// attribute that exists but is unset should return `Some(Value::None)`.
    ///
    /// [`IndexError::AttributeAccess`]: crate::IndexError::AttributeAccess
    fn attribute(&self, name: &str) -> Option<Value<'_>>;

    /// Names of every attribute, in declaration order.
    ///
    /// Used by record projections ([`Collection::to_array_map`]). The default
    /// is empty, which yields empty records.
    ///
    /// [`Collection::to_array_map`]: crate::Collection::to_array_map
    fn attributes() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }

    /// The kind name checked against a collection's allowed kinds.
    ///
    /// Defaults to the unqualified type name. Enum entities usually override
    /// this to report the variant.
    fn kind(&self) -> &str {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base)
    }
}

impl<T: Indexable> Indexable for Box<T> {
    fn attribute(&self, name: &str) -> Option<Value<'_>> {
        (**self).attribute(name)
    }

    fn attributes() -> &'static [&'static str] {
        T::attributes()
    }

    fn kind(&self) -> &str {
        (**self).kind()
    }
}

impl<T: Indexable> Indexable for std::rc::Rc<T> {
    fn attribute(&self, name: &str) -> Option<Value<'_>> {
        (**self).attribute(name)
    }

    fn attributes() -> &'static [&'static str] {
        T::attributes()
    }

    fn kind(&self) -> &str {
        (**self).kind()
    }
}

/// Helper trait for converting enum attributes to discriminant values.
///
/// Used by `#[derive(Indexable)]` for fields marked `#[index(Enum)]`.
///
/// ```
/// use standout_index::IndexEnum;
///
/// #[derive(Clone, Copy)]
/// enum Status {
///     Pending,
///     Done,
/// }
///
/// impl IndexEnum for Status {
///     fn index_discriminant(&self) -> u32 {
///         match self {
///             Status::Pending => 0,
///             Status::Done => 1,
///         }
///     }
/// }
/// ```
pub trait IndexEnum {
    /// Returns a stable discriminant for this variant.
    fn index_discriminant(&self) -> u32;
}

/// Helper trait for converting attributes to timestamps.
///
/// Used by `#[derive(Indexable)]` for fields marked `#[index(Timestamp)]`.
pub trait IndexTimestamp {
    /// Converts this value to a [`Timestamp`].
    fn index_timestamp(&self) -> Timestamp;
}

impl IndexTimestamp for i64 {
    fn index_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl IndexTimestamp for u64 {
    fn index_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self as i64)
    }
}

impl IndexTimestamp for std::time::SystemTime {
    fn index_timestamp(&self) -> Timestamp {
        match self.duration_since(std::time::UNIX_EPOCH) {
            Ok(d) => Timestamp::from_millis(d.as_millis() as i64),
            Err(e) => Timestamp::from_millis(-(e.duration().as_millis() as i64)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Number;

    struct TestItem {
        name: String,
        count: i32,
    }

    impl Indexable for TestItem {
        fn attribute(&self, name: &str) -> Option<Value<'_>> {
            match name {
                "name" => Some(Value::String(&self.name)),
                "count" => Some(Value::Number(Number::I64(self.count as i64))),
                _ => None,
            }
        }
    }

    #[test]
    fn manual_impl() {
        let item = TestItem {
            name: "test".to_string(),
            count: 42,
        };

        assert_eq!(item.attribute("name"), Some(Value::String("test")));
        assert_eq!(
            item.attribute("count"),
            Some(Value::Number(Number::I64(42)))
        );
        assert_eq!(item.attribute("unknown"), None);
        assert!(TestItem::attributes().is_empty());
    }

    #[test]
    fn default_kind_is_unqualified_type_name() {
        let item = TestItem {
            name: String::new(),
            count: 0,
        };
        assert_eq!(item.kind(), "TestItem");
        assert_eq!(Box::new(item).kind(), "TestItem");
    }

    #[derive(Clone, Copy)]
    enum Status {
        Pending,
        Active,
    }

    impl IndexEnum for Status {
        fn index_discriminant(&self) -> u32 {
            match self {
                Status::Pending => 0,
                Status::Active => 1,
            }
        }
    }

    #[test]
    fn enum_discriminant() {
        assert_eq!(Status::Pending.index_discriminant(), 0);
        assert_eq!(Status::Active.index_discriminant(), 1);
    }

    #[test]
    fn timestamps() {
        assert_eq!(1000i64.index_timestamp(), Timestamp(1000));
        let later = std::time::UNIX_EPOCH + std::time::Duration::from_secs(2);
        assert_eq!(later.index_timestamp(), Timestamp(2000));
    }
}
