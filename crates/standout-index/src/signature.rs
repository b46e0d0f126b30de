//! Criteria signatures.
//!
//! A signature names one secondary index by the *set* of attributes it is
//! keyed on. Names are word-normalized to UpperCamelCase, sorted and
//! deduplicated, so `["id", "group"]`, `["group", "id"]` and
//! `["Group", "ID"]` all share one index.

use std::fmt;

use heck::ToUpperCamelCase;

/// Normalized, order-independent label for a set of attribute names.
///
/// ```
/// use standout_index::Signature;
///
/// assert_eq!(Signature::new(["id", "group"]), Signature::new(["group", "id"]));
/// assert_eq!(Signature::new(["group_id"]), Signature::new(["groupId"]));
/// assert_eq!(Signature::new(["group", "id"]).as_str(), "Group,Id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(String);

impl Signature {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Layout::new(names).signature
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Word form of an attribute name used for signature comparison.
pub(crate) fn word(name: &str) -> String {
    name.to_upper_camel_case()
}

/// The canonical level order of an index.
///
/// `attributes` keeps the caller's spelling of each name (the first spelling
/// seen for a word), in signature order. Levels of the index tree follow
/// this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Layout {
    pub signature: Signature,
    pub attributes: Vec<String>,
    words: Vec<String>,
}

impl Layout {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pairs: Vec<(String, String)> = Vec::new();
        for name in names {
            let name = name.as_ref();
            let w = word(name);
            if !pairs.iter().any(|(existing, _)| *existing == w) {
                pairs.push((w, name.to_string()));
            }
        }
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let words: Vec<String> = pairs.iter().map(|(w, _)| w.clone()).collect();
        let signature = Signature(words.join(","));
        Layout {
            signature,
            attributes: pairs.into_iter().map(|(_, name)| name).collect(),
            words,
        }
    }

    pub fn depth(&self) -> usize {
        self.attributes.len()
    }

    /// Level of the index that `name` is keyed at.
    pub fn level_of(&self, name: &str) -> Option<usize> {
        let w = word(name);
        self.words.iter().position(|existing| *existing == w)
    }
}
