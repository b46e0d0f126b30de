//! Per-collection configuration.
//!
//! Each [`Collection`] owns one immutable [`CollectionConfig`], so two
//! collections of the same entity type can be keyed, normalized and
//! type-checked differently.
//!
//! [`Collection`]: crate::Collection

use std::fmt;
use std::rc::Rc;

use crate::accessor::AccessStyle;
use crate::value::{Key, Value};

/// Extracts an identity from an entity.
pub type IdentityFn<T> = Rc<dyn Fn(&T) -> Key>;

/// Normalizes an attribute value into a key. Receives the attribute name
/// when one is known.
pub type KeyNormalizer = Rc<dyn Fn(&Value<'_>, Option<&str>) -> Key>;

/// How a collection derives an entity's identity.
pub enum IdentityStrategy<T> {
    /// Read the named attribute and normalize it.
    Attribute(String),
    /// Call a function.
    Extract(IdentityFn<T>),
}

impl<T> Clone for IdentityStrategy<T> {
    fn clone(&self) -> Self {
        match self {
            IdentityStrategy::Attribute(name) => IdentityStrategy::Attribute(name.clone()),
            IdentityStrategy::Extract(f) => IdentityStrategy::Extract(Rc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for IdentityStrategy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityStrategy::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            IdentityStrategy::Extract(_) => f.write_str("Extract(..)"),
        }
    }
}

/// Configuration for a [`Collection`](crate::Collection).
///
/// ```
/// use standout_index::{AccessStyle, CollectionConfig, Key};
///
/// struct Task {
///     slug: String,
/// }
///
/// let config = CollectionConfig::<Task>::new()
///     .identity_fn(|task| Key::from(&task.slug))
///     .access_style(AccessStyle::SnakeCase)
///     .allow_kind("Task");
/// assert_eq!(config.allowed_kinds(), ["Task".to_string()]);
/// ```
pub struct CollectionConfig<T> {
    identity: IdentityStrategy<T>,
    normalizer: Option<KeyNormalizer>,
    allowed_kinds: Vec<String>,
    access_style: AccessStyle,
}

impl<T> CollectionConfig<T> {
    /// Entities keyed by their `id` attribute, any kind allowed.
    pub fn new() -> Self {
        CollectionConfig {
            identity: IdentityStrategy::Attribute("id".to_string()),
            normalizer: None,
            allowed_kinds: Vec::new(),
            access_style: AccessStyle::default(),
        }
    }

    /// Derives identities from the named attribute.
    pub fn identity_attribute(mut self, name: impl Into<String>) -> Self {
        self.identity = IdentityStrategy::Attribute(name.into());
        self
    }

    /// Derives identities with a function.
    pub fn identity_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Key + 'static,
    {
        self.identity = IdentityStrategy::Extract(Rc::new(f));
        self
    }

    /// Replaces the default value → key normalization.
    ///
    /// The normalizer sees attribute values read from entities as well as
    /// the keys supplied as criteria, identities passed to `find` and
    /// `remove`, and the identities of entity operands, so every side
    /// compares alike. It may see a key it already produced and must map it
    /// to itself.
    pub fn normalizer<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value<'_>, Option<&str>) -> Key + 'static,
    {
        self.normalizer = Some(Rc::new(f));
        self
    }

    /// Accepts entities of this kind. With no kinds configured every kind is
    /// accepted.
    pub fn allow_kind(mut self, kind: impl Into<String>) -> Self {
        self.allowed_kinds.push(kind.into());
        self
    }

    pub fn allow_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_kinds.extend(kinds.into_iter().map(Into::into));
        self
    }

    pub fn access_style(mut self, style: AccessStyle) -> Self {
        self.access_style = style;
        self
    }

    pub fn identity(&self) -> &IdentityStrategy<T> {
        &self.identity
    }

    pub fn allowed_kinds(&self) -> &[String] {
        &self.allowed_kinds
    }

    pub fn get_access_style(&self) -> AccessStyle {
        self.access_style
    }

    pub fn accepts_kind(&self, kind: &str) -> bool {
        self.allowed_kinds.is_empty() || self.allowed_kinds.iter().any(|k| k == kind)
    }

    /// Normalizes a value with the configured normalizer, or
    /// [`Value::to_key`] when none is set.
    pub fn normalize(&self, value: &Value<'_>, attribute: Option<&str>) -> Key {
        match &self.normalizer {
            Some(f) => f(value, attribute),
            None => value.to_key(),
        }
    }
}

impl<T> Default for CollectionConfig<T> {
    fn default() -> Self {
        CollectionConfig::new()
    }
}

impl<T> Clone for CollectionConfig<T> {
    fn clone(&self) -> Self {
        CollectionConfig {
            identity: self.identity.clone(),
            normalizer: self.normalizer.clone(),
            allowed_kinds: self.allowed_kinds.clone(),
            access_style: self.access_style,
        }
    }
}

impl<T> fmt::Debug for CollectionConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionConfig")
            .field("identity", &self.identity)
            .field("normalizer", &self.normalizer.as_ref().map(|_| ".."))
            .field("allowed_kinds", &self.allowed_kinds)
            .field("access_style", &self.access_style)
            .finish()
    }
}
