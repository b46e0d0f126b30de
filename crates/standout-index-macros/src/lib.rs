//! Proc macros for standout-index.
//!
//! # Available Macros
//!
//! - [`Indexable`] - Generate the `Indexable` attribute accessor and
//!   attribute-name constants from struct field annotations
//!
//! Enable the `derive` feature of `standout-index` to use it as
//! `standout_index::Indexable`.

mod index;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Indexable` trait for structs held in a `Collection`.
///
/// Only annotated fields become attributes; unannotated fields are ignored.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | Field that derefs to `str` |
/// | `Number` | Integer or float field (any `Into<Number>` type) |
/// | `Timestamp` | Field implementing `IndexTimestamp` |
/// | `Enum` | Field implementing `IndexEnum` |
/// | `Bool` | Boolean field |
/// | `optional` | The field is an `Option`; `None` reads as unset (`Key::Null`) |
/// | `skip` | Exclude this field |
/// | `rename = "..."` | Use a custom attribute name |
///
/// # Container Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `kind = "..."` | Kind name checked against a collection's allowed kinds |
///
/// # Generated Code
///
/// 1. Attribute name constants (e.g., `Task::ID`, `Task::GROUP`)
/// 2. `Indexable::attribute()`, `Indexable::attributes()` and `Indexable::kind()`
///
/// # Example
///
/// ```ignore
/// use standout_index::{Collection, Criteria, Indexable};
///
/// #[derive(Indexable)]
/// struct Task {
///     #[index(Number)]
///     id: u32,
///
///     #[index(String)]
///     group: String,
///
///     #[index(Number, optional)]
///     parent: Option<u32>,
///
///     #[index(skip)]
///     notes: String,
/// }
///
/// let tasks = Collection::with_entities(Default::default(), vec![
///     Task { id: 1, group: "docs".into(), parent: None, notes: String::new() },
///     Task { id: 2, group: "docs".into(), parent: Some(1), notes: String::new() },
/// ])?;
///
/// let children = tasks.find_by(&Criteria::new().eq(Task::PARENT, 1))?;
/// assert_eq!(children.len(), 1);
/// ```
///
/// # Enum Fields
///
/// For enum fields, implement `IndexEnum` on your enum type:
///
/// ```ignore
/// use standout_index::IndexEnum;
///
/// #[derive(Clone, Copy)]
/// enum Status { Pending, Active, Done }
///
/// impl IndexEnum for Status {
///     fn index_discriminant(&self) -> u32 {
///         *self as u32
///     }
/// }
///
/// #[derive(Indexable)]
/// struct Task {
///     #[index(Enum)]
///     status: Status,
/// }
/// ```
#[proc_macro_derive(Indexable, attributes(index, indexable))]
pub fn indexable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    index::indexable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
