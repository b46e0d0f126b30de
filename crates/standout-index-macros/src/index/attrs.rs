//! Attribute parsing for the Indexable derive macro.
//!
//! Parses the `#[index(...)]` field attributes and the optional
//! `#[indexable(...)]` container attribute.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Lit, Meta, Result, Token,
};

/// How a field's value is presented to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// `#[index(String)]`: anything that derefs to `&str`.
    String,
    /// `#[index(Number)]`: any type with `Into<Number>`.
    Number,
    /// `#[index(Timestamp)]`: requires `IndexTimestamp`.
    Timestamp,
    /// `#[index(Enum)]`: requires `IndexEnum`.
    Enum,
    /// `#[index(Bool)]`.
    Bool,
}

impl IndexType {
    fn parse(name: &str, span: Span) -> Result<Self> {
        match name {
            "String" | "string" => Ok(IndexType::String),
            "Number" | "number" => Ok(IndexType::Number),
            "Timestamp" | "timestamp" => Ok(IndexType::Timestamp),
            "Enum" | "enum" | "enumeration" => Ok(IndexType::Enum),
            "Bool" | "bool" | "boolean" => Ok(IndexType::Bool),
            other => Err(Error::new(
                span,
                format!(
                    "unknown index type: '{}'. Expected one of: String, Number, Timestamp, Enum, Bool",
                    other
                ),
            )),
        }
    }
}

/// Field-level attributes from `#[index(...)]`.
#[derive(Debug, Clone)]
pub struct IndexAttr {
    pub index_type: Option<IndexType>,
    /// Leave the field out of the accessor.
    pub skip: bool,
    /// The field is an `Option`; `None` reads as an unset value.
    pub optional: bool,
    /// Attribute name used in queries (default: field name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for IndexAttr {
    fn default() -> Self {
        IndexAttr {
            index_type: None,
            skip: false,
            optional: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

fn string_literal(expr: &Expr, what: &str) -> Result<(String, Span)> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok((s.value(), s.span())),
        other => Err(Error::new(
            other.span(),
            format!("{} must be a string literal", what),
        )),
    }
}

impl Parse for IndexAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = IndexAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                // index(String), index(skip), index(optional)
                Meta::Path(p) => {
                    if p.is_ident("skip") {
                        attr.skip = true;
                    } else if p.is_ident("optional") {
                        attr.optional = true;
                    } else if let Some(ident) = p.get_ident() {
                        attr.index_type = Some(IndexType::parse(&ident.to_string(), ident.span())?);
                        attr.span = ident.span();
                    } else {
                        return Err(Error::new(
                            p.span(),
                            "expected index type: String, Number, Timestamp, Enum, Bool, skip, or optional",
                        ));
                    }
                }

                // rename = "name", ty = "enum"
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("rename") {
                        attr.rename = Some(string_literal(&nv.value, "rename")?.0);
                    } else if nv.path.is_ident("ty") {
                        let (ty, span) = string_literal(&nv.value, "ty")?;
                        attr.index_type = Some(IndexType::parse(&ty, span)?);
                        attr.span = span;
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename or ty",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown index attribute. Expected: String, Number, Timestamp, Enum, Bool, skip, optional, rename = \"...\", or ty = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[index(...)]` attributes from a field's attributes.
pub fn parse_index_attrs(attrs: &[Attribute]) -> Result<IndexAttr> {
    for attr in attrs {
        if attr.path().is_ident("index") {
            return attr.parse_args::<IndexAttr>();
        }
    }
    Ok(IndexAttr::default())
}

/// Container-level attributes from `#[indexable(...)]`.
#[derive(Debug, Clone, Default)]
pub struct ContainerAttr {
    /// Kind name reported to the collection (default: the type name).
    pub kind: Option<String>,
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;
        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("kind") => {
                    attr.kind = Some(string_literal(&nv.value, "kind")?.0);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown indexable attribute. Expected: kind = \"...\"",
                    ))
                }
            }
        }
        Ok(attr)
    }
}

pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    for attr in attrs {
        if attr.path().is_ident("indexable") {
            return attr.parse_args::<ContainerAttr>();
        }
    }
    Ok(ContainerAttr::default())
}
