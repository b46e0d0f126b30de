//! Attribute access.
//!
//! Query code speaks in attribute names; entities answer to access keys. An
//! [`AccessStyle`] derives the access key from a name, and [`Accessor`]
//! memoizes that derivation once per name for the life of a collection.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use heck::{ToLowerCamelCase, ToSnakeCase};
use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::traits::Indexable;
use crate::value::Value;

/// How an attribute name is turned into the key passed to
/// [`Indexable::attribute`].
///
/// ```
/// use standout_index::AccessStyle;
///
/// assert_eq!(AccessStyle::AsIs.access_key("createdAt"), "createdAt");
/// assert_eq!(AccessStyle::SnakeCase.access_key("createdAt"), "created_at");
/// assert_eq!(AccessStyle::CamelCase.access_key("created_at"), "createdAt");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessStyle {
    /// Use the name unchanged.
    #[default]
    AsIs,
    /// Convert the name to `snake_case` (matches Rust field names).
    SnakeCase,
    /// Convert the name to `lowerCamelCase`.
    CamelCase,
}

impl AccessStyle {
    pub fn access_key(self, name: &str) -> String {
        match self {
            AccessStyle::AsIs => name.to_string(),
            AccessStyle::SnakeCase => name.to_snake_case(),
            AccessStyle::CamelCase => name.to_lower_camel_case(),
        }
    }
}

/// Resolves attribute names against entities, caching derived access keys.
#[derive(Debug, Default)]
pub(crate) struct Accessor {
    style: AccessStyle,
    keys: RefCell<HashMap<String, Rc<str>>>,
}

impl Accessor {
    pub fn new(style: AccessStyle) -> Self {
        Accessor {
            style,
            keys: RefCell::new(HashMap::new()),
        }
    }

    pub fn access_key(&self, name: &str) -> Rc<str> {
        let cached = self.keys.borrow().get(name).cloned();
        if let Some(key) = cached {
            return key;
        }
        let key: Rc<str> = Rc::from(self.style.access_key(name));
        self.keys
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&key));
        key
    }

    /// Reads `name` from `entity`.
    ///
    /// A missing attribute is an error: indexing it as null would silently
    /// file the entity under the wrong branch.
    pub fn get<'a, T: Indexable>(&self, entity: &'a T, name: &str) -> Result<Value<'a>> {
        let key = self.access_key(name);
        entity
            .attribute(&key)
            .ok_or_else(|| IndexError::AttributeAccess {
                attribute: name.to_string(),
                kind: entity.kind().to_string(),
            })
    }

    #[cfg(test)]
    pub fn cached_names(&self) -> usize {
        self.keys.borrow().len()
    }
}
