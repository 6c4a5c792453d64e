//! Derive macro for registering error kinds with `wari`.
//!
//! Every error kind is a Rust type implementing `wari::Details`. The trait
//! pins the kind's tag, so the tag-to-payload mapping is checked by the
//! compiler instead of a runtime registry.
//!
//! ## Usage
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! wari = { version = "0.3", features = ["derive"] }
//! ```
//!
//! ## Examples
//!
//! ```rust,ignore
//! use serde::Serialize;
//! use wari::Details;
//!
//! #[derive(Serialize, Details)]
//! struct JsonError {
//!     text: String,
//! }
//!
//! #[derive(Serialize, Details)]
//! #[details(tag = "HttpError")]
//! struct Http {
//!     method: String,
//!     url: String,
//!     status: u16,
//! }
//!
//! assert_eq!(JsonError::TAG, "JsonError");
//! assert_eq!(Http::TAG, "HttpError");
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, LitStr, Result, parse_macro_input};

/// Derive macro for implementing the `Details` trait.
///
/// ## Attributes
///
/// - `#[details(tag = "...")]` - Optional. The tag of the error kind. Defaults
///   to the name of the type.
///
/// The type must also implement `serde::Serialize`.
///
/// ## Example
///
/// ```rust,ignore
/// #[derive(Serialize, Details)]
/// #[details(tag = "FileError")]
/// struct FileFailure {
///     operation: Operation,
///     file_path: String,
/// }
/// ```
#[proc_macro_derive(Details, attributes(details))]
pub fn derive_details(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match derive_details_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_details_impl(input: DeriveInput) -> Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let tag = match parse_tag_attr(&input)? {
        Some(tag) => tag,
        None => LitStr::new(&name.to_string(), name.span()),
    };

    Ok(quote! {
        impl #impl_generics ::wari::Details for #name #ty_generics #where_clause {
            const TAG: &'static str = #tag;
        }
    })
}

/// Parse the `tag = "..."` value from `#[details(...)]` attributes.
fn parse_tag_attr(input: &DeriveInput) -> Result<Option<LitStr>> {
    let mut tag = None;

    for attr in &input.attrs {
        if !attr.path().is_ident("details") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("tag") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().is_empty() {
                    return Err(meta.error("tag cannot be empty"));
                }
                if tag.is_some() {
                    return Err(meta.error("duplicate `tag` in #[details(...)]"));
                }
                tag = Some(value);
                Ok(())
            } else {
                Err(meta.error("unsupported details attribute, expected `tag = \"...\"`"))
            }
        })?;
    }

    Ok(tag)
}
