//! Direction for [`Collection::iter_sorted_by_identity`].
//!
//! [`Collection::iter_sorted_by_identity`]: crate::Collection::iter_sorted_by_identity

use std::cmp::Ordering;

/// Identity sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    /// Orients a key comparison: unchanged for `Asc`, reversed for `Desc`.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }
}
