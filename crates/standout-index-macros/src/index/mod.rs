//! Implementation of the `#[derive(Indexable)]` macro.
//!
//! Generates attribute accessors and attribute-name constants from
//! `#[index(...)]` field annotations.

mod attrs;
mod derive;

pub use derive::indexable_derive_impl;
