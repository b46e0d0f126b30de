//! Indexed in-memory collections.
//!
//! A [`Collection`] stores entities in insertion order and answers equality
//! lookups on any combination of their attributes. The first query on a set
//! of attributes builds a secondary index for that set with one scan; later
//! queries, and every [`add`](Collection::add) and
//! [`remove`](Collection::remove), keep it current. It supports:
//!
//! - Lookups by identity or by attribute criteria, with OR lists per attribute
//! - Entity operands that stand for the referenced entity's identity
//! - Grouped projections into nested maps, ordered as the caller names them
//! - A query builder and a method-name dispatcher over the same indexes
//!
//! # Quick Start
//!
//! ```rust
//! use standout_index::{Collection, Criteria, Indexable, Key, Number, Value};
//!
//! // Define your data
//! struct Task {
//!     id: i64,
//!     group: String,
//! }
//!
//! // Tell the collection how to read attributes
//! impl Indexable for Task {
//!     fn attribute(&self, name: &str) -> Option<Value<'_>> {
//!         match name {
//!             "id" => Some(Value::Number(Number::I64(self.id))),
//!             "group" => Some(Value::String(&self.group)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut tasks = Collection::with_entities(
//!     Default::default(),
//!     vec![
//!         Task { id: 1, group: "asdf".into() },
//!         Task { id: 2, group: "zxcv".into() },
//!         Task { id: 3, group: "qwer".into() },
//!     ],
//! )?;
//!
//! let two = tasks.find_one_by(&Criteria::new().eq("id", 2))?;
//! assert_eq!(two.map(|t| t.group.as_str()), Some("zxcv"));
//!
//! tasks.add(Task { id: 4, group: "qwer".into() })?;
//! let by_group = tasks.find_to_map_by(
//!     &Criteria::new().eq("group", "qwer"),
//!     Some(&["group", "id"][..]),
//! )?;
//! assert!(by_group.leaf(&[Key::from("qwer"), Key::Int(4)]).is_some());
//! # Ok::<(), standout_index::IndexError>(())
//! ```
//!
//! # Keys
//!
//! Attribute values are normalized into a [`Key`] before they are indexed or
//! compared:
//!
//! | Value | Key |
//! |-------|-----|
//! | String | `Str` |
//! | Integral number | `Int` |
//! | Fractional or out-of-range number | `Str` (decimal form) |
//! | Timestamp | `Int` (milliseconds) |
//! | Enum | `Int` (discriminant) |
//! | Bool | `Bool` |
//! | None | `Null` |
//!
//! A [`CollectionConfig::normalizer`] replaces this mapping per collection.

mod accessor;
mod collection;
mod config;
mod criteria;
mod dispatch;
mod error;
mod index;
mod nested;
mod ordering;
mod projection;
mod query;
mod resolver;
mod signature;
mod traits;
mod value;

// Re-export public API
pub use accessor::AccessStyle;
pub use collection::Collection;
pub use config::{CollectionConfig, IdentityFn, IdentityStrategy, KeyNormalizer};
pub use criteria::{Criteria, Criterion, Operand};
pub use dispatch::{Method, Outcome, Verb};
pub use error::{IndexError, Result};
pub use nested::NestedMap;
pub use ordering::Dir;
pub use projection::{Record, Target};
pub use query::Query;
pub use signature::Signature;
pub use traits::{IndexEnum, IndexTimestamp, Indexable};
pub use value::{Key, Number, Timestamp, Value};

// Re-export derive macro when feature is enabled
#[cfg(feature = "derive")]
pub use standout_index_macros::Indexable;
