//! Derive macro for `redacterr`.
//!
//! This crate generates the `Redact` implementation behind
//! `#[derive(Redact)]`. It:
//! - reads the message template from `#[redact("...")]`, `#[error("...")]` or
//!   doc comments
//! - reads `#[safe]` and `#[redact(nested)]` field attributes
//! - emits a `fmt_redacted` body with the bounds the chosen strategies need
//!
//! It does **not** implement `Display` or `Error`. Pair it with `thiserror`
//! (or a hand-written impl) so the same template drives both renderings.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

#[allow(unused_extern_crates)]
extern crate proc_macro;

use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Result, parse_macro_input};

mod strategy;
mod template;
use template::{FORMATTER, RedactOutput, derive_redact_body};

/// Derives `redacterr::Redact` from a message template.
///
/// # Template
///
/// Taken from the first of:
///
/// - `#[redact("...")]` on the type or variant
/// - `#[error("...")]` (thiserror-style)
/// - doc comments (displaydoc-style)
///
/// If none is present, the derive fails. `#[error(transparent)]` has no
/// template of its own and must be paired with `#[redact("...")]`.
///
/// # Field Annotations
///
/// - *(none)*: rendered as `<redacted TYPE>`, the value never appears
/// - `#[safe]`: rendered raw via `Display`/`Debug`
/// - `#[redact(nested)]`: rendered via the field's own `Redact` impl
///
/// Only fields the template references are rendered. Unions are rejected.
///
/// # Example
///
/// ```ignore
/// use redacterr::Redact;
///
/// #[derive(Debug, thiserror::Error, Redact)]
/// #[error("user {user} not found after {attempts} attempts")]
/// struct LookupError {
///     user: String,
///     #[safe]
///     attempts: u32,
/// }
/// ```
#[proc_macro_derive(Redact, attributes(redact, safe, error))]
pub fn derive_redact(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

fn expand(input: DeriveInput) -> Result<TokenStream> {
    let DeriveInput {
        ident,
        mut generics,
        data,
        attrs,
        ..
    } = input;

    let RedactOutput { body, predicates } = derive_redact_body(&ident, &data, &attrs)?;
    if !predicates.is_empty() {
        generics.make_where_clause().predicates.extend(predicates);
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let redact_path = crate_path("Redact");
    let formatter = format_ident!("{}", FORMATTER);
    Ok(quote! {
        impl #impl_generics #redact_path for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn fmt_redacted(&self, #formatter: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                #body
            }
        }
    })
}

/// Returns the token stream to reference the redacterr crate root.
///
/// Handles crate renaming (e.g., `errs = { package = "redacterr", ... }`)
/// and internal usage (when the derive is used inside redacterr itself).
fn crate_root() -> TokenStream {
    match crate_name("redacterr") {
        Ok(FoundCrate::Itself) => quote! { crate },
        Ok(FoundCrate::Name(name)) => {
            let ident = format_ident!("{}", name);
            quote! { ::#ident }
        }
        Err(_) => quote! { ::redacterr },
    }
}

fn crate_path(item: &str) -> TokenStream {
    let root = crate_root();
    let item_ident = format_ident!("{}", item);
    quote! { #root::#item_ident }
}
