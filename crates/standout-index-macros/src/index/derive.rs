//! Implementation of the `#[derive(Indexable)]` macro.
//!
//! This macro generates an implementation of the `Indexable` trait and
//! attribute name constants for typed criteria.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_container_attrs, parse_index_attrs, IndexType};

/// Main implementation of the Indexable derive macro.
pub fn indexable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let container = parse_container_attrs(&input.attrs)?;

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Indexable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Indexable can only be derived for structs",
            ))
        }
    };

    let mut attribute_arms: Vec<TokenStream> = Vec::new();
    let mut attribute_names: Vec<String> = Vec::new();
    let mut constants: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let index_attrs = parse_index_attrs(&field.attrs)?;
        if index_attrs.skip {
            continue;
        }
        let index_type = match index_attrs.index_type {
            Some(t) => t,
            None => continue,
        };

        let attribute_name = index_attrs
            .rename
            .unwrap_or_else(|| field_name.to_string());
        if attribute_names.contains(&attribute_name) {
            return Err(Error::new(
                index_attrs.span,
                format!("duplicate index attribute name '{}'", attribute_name),
            ));
        }

        let const_name = format_ident!("{}", to_screaming_snake_case(&attribute_name));
        constants.push(quote! {
            /// Attribute name constant for typed criteria.
            pub const #const_name: &'static str = #attribute_name;
        });

        let read = |value: TokenStream| -> TokenStream {
            match index_type {
                IndexType::String => {
                    quote! { ::standout_index::Value::String(::core::convert::AsRef::<str>::as_ref(#value)) }
                }
                IndexType::Number => {
                    quote! { ::standout_index::Value::Number(::standout_index::Number::from(::core::clone::Clone::clone(#value))) }
                }
                IndexType::Timestamp => {
                    quote! {
                        ::standout_index::Value::Timestamp(
                            ::standout_index::IndexTimestamp::index_timestamp(#value)
                        )
                    }
                }
                IndexType::Enum => {
                    quote! {
                        ::standout_index::Value::Enum(
                            ::standout_index::IndexEnum::index_discriminant(#value)
                        )
                    }
                }
                IndexType::Bool => {
                    quote! { ::standout_index::Value::Bool(*#value) }
                }
            }
        };

        let value_expr = if index_attrs.optional {
            let present = read(quote! { value });
            quote! {
                match &self.#field_name {
                    ::core::option::Option::Some(value) => #present,
                    ::core::option::Option::None => ::standout_index::Value::None,
                }
            }
        } else {
            read(quote! { &self.#field_name })
        };

        attribute_arms.push(quote! {
            #attribute_name => ::core::option::Option::Some(#value_expr),
        });
        attribute_names.push(attribute_name);
    }

    let kind = container.kind.unwrap_or_else(|| struct_name.to_string());
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#constants)*
        }

        impl #impl_generics ::standout_index::Indexable for #struct_name #ty_generics #where_clause {
            fn attribute(&self, name: &str) -> ::core::option::Option<::standout_index::Value<'_>> {
                match name {
                    #(#attribute_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn attributes() -> &'static [&'static str] {
                &[#(#attribute_names),*]
            }

            fn kind(&self) -> &str {
                #kind
            }
        }
    };

    Ok(expanded)
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphabetic();
        }
    }

    result
}
