//! Parsing of `#[safe]` and `#[redact(nested)]` field attributes.
//!
//! This module maps attribute syntax to rendering decisions and produces
//! structured errors for invalid forms.

use proc_macro2::Span;
use syn::{Attribute, Meta, Result, spanned::Spanned};

/// How a field referenced by the message template is rendered.
///
/// ## Strategy Mapping
///
/// | Attribute            | Strategy      | Behavior                                  |
/// |----------------------|---------------|-------------------------------------------|
/// | None                 | `Placeholder` | Rendered as `<redacted TYPE>`             |
/// | `#[safe]`            | `Safe`        | Rendered raw via `Display`/`Debug`        |
/// | `#[redact(nested)]`  | `Nested`      | Rendered via the field's own `Redact` impl |
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Strategy {
    /// No annotation: the value never appears, only its type name.
    Placeholder,
    /// `#[safe]`: the value is known not to be sensitive.
    Safe,
    /// `#[redact(nested)]`: the value knows how to redact itself.
    Nested,
}

fn set_strategy(target: &mut Option<Strategy>, next: Strategy, span: Span) -> Result<()> {
    if target.is_some() {
        return Err(syn::Error::new(
            span,
            "multiple #[safe] or #[redact] attributes on the same field",
        ));
    }
    *target = Some(next);
    Ok(())
}

pub(crate) fn parse_field_strategy(attrs: &[Attribute]) -> Result<Strategy> {
    let mut strategy: Option<Strategy> = None;
    for attr in attrs {
        if attr.path().is_ident("safe") {
            match &attr.meta {
                Meta::Path(_) => set_strategy(&mut strategy, Strategy::Safe, attr.span())?,
                _ => {
                    return Err(syn::Error::new(
                        attr.span(),
                        "#[safe] does not take arguments",
                    ));
                }
            }
            continue;
        }

        if !attr.path().is_ident("redact") {
            continue;
        }

        let nested = match &attr.meta {
            Meta::List(list) => syn::parse2::<syn::Ident>(list.tokens.clone())
                .ok()
                .filter(|ident| ident == "nested"),
            _ => None,
        };
        match nested {
            Some(_) => set_strategy(&mut strategy, Strategy::Nested, attr.span())?,
            None => {
                return Err(syn::Error::new(
                    attr.span(),
                    "expected #[redact(nested)] on a field",
                ));
            }
        }
    }

    Ok(strategy.unwrap_or(Strategy::Placeholder))
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::DeriveInput;

    use super::*;

    fn parse_attrs(tokens: proc_macro2::TokenStream) -> Vec<Attribute> {
        let input: DeriveInput = syn::parse2(quote! {
            #tokens
            struct Dummy;
        })
        .expect("should parse as DeriveInput");
        input.attrs
    }

    #[test]
    fn no_attribute_returns_placeholder() {
        let attrs = parse_attrs(quote! {});
        assert_eq!(parse_field_strategy(&attrs).unwrap(), Strategy::Placeholder);
    }

    #[test]
    fn safe_returns_safe() {
        let attrs = parse_attrs(quote! { #[safe] });
        assert_eq!(parse_field_strategy(&attrs).unwrap(), Strategy::Safe);
    }

    #[test]
    fn safe_with_args_errors() {
        let attrs = parse_attrs(quote! { #[safe(yes)] });
        let err = parse_field_strategy(&attrs).unwrap_err();
        assert!(err.to_string().contains("does not take arguments"));
    }

    #[test]
    fn redact_nested_returns_nested() {
        let attrs = parse_attrs(quote! { #[redact(nested)] });
        assert_eq!(parse_field_strategy(&attrs).unwrap(), Strategy::Nested);
    }

    #[test]
    fn redact_with_template_on_field_errors() {
        let attrs = parse_attrs(quote! { #[redact("user {id}")] });
        let err = parse_field_strategy(&attrs).unwrap_err();
        assert!(err.to_string().contains("#[redact(nested)]"));
    }

    #[test]
    fn bare_redact_errors() {
        let attrs = parse_attrs(quote! { #[redact] });
        assert!(parse_field_strategy(&attrs).is_err());
    }

    #[test]
    fn safe_and_nested_errors() {
        let attrs = parse_attrs(quote! {
            #[safe]
            #[redact(nested)]
        });
        let err = parse_field_strategy(&attrs).unwrap_err();
        assert!(err.to_string().contains("multiple"));
    }

    #[test]
    fn other_attributes_ignored() {
        let attrs = parse_attrs(quote! {
            #[source]
            #[serde(skip)]
        });
        assert_eq!(parse_field_strategy(&attrs).unwrap(), Strategy::Placeholder);
    }
}
