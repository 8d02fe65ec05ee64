//! Redacted message formatting for `#[derive(Redact)]`.
//!
//! The message template is taken from `#[redact("...")]`, from thiserror-style
//! `#[error("...")]` strings or from displaydoc-style doc comments, in that
//! order. The same template can therefore drive both `Display` and `Redact`.
//!
//! Fields referenced in a template render as placeholders by default. Use
//! `#[safe]` for raw output or `#[redact(nested)]` to delegate to the field's
//! own `Redact` impl.

use std::collections::BTreeMap;

use proc_macro2::{Ident, Span, TokenStream};
use quote::{format_ident, quote, quote_spanned};
use syn::{
    Attribute, Data, DataEnum, DataStruct, Fields, LitStr, Result, WherePredicate, ext::IdentExt,
    parse_quote, spanned::Spanned,
};

use crate::{
    crate_path,
    strategy::{Strategy, parse_field_strategy},
};

/// Name of the formatter argument in the generated `fmt_redacted`.
pub(crate) const FORMATTER: &str = "__formatter";

pub(crate) struct RedactOutput {
    pub(crate) body: TokenStream,
    pub(crate) predicates: Vec<WherePredicate>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum FormatMode {
    Display,
    Debug,
    Both,
}

#[derive(Clone, Debug)]
enum PlaceholderKey {
    Named(Ident),
    Index(usize),
}

#[derive(Clone, Debug)]
struct Placeholder {
    key: PlaceholderKey,
    mode: FormatMode,
    span: Span,
}

struct FieldInfo<'a> {
    /// Binding used in the generated match pattern.
    binding: Ident,
    /// Field member: its name, or its index for tuple fields.
    member: syn::Member,
    ty: &'a syn::Type,
    strategy: Strategy,
    span: Span,
}

struct FormatArgsOutput {
    prelude: TokenStream,
    predicates: Vec<WherePredicate>,
}

pub(crate) fn derive_redact_body(
    name: &Ident,
    data: &Data,
    attrs: &[Attribute],
) -> Result<RedactOutput> {
    match data {
        Data::Struct(data) => derive_struct_body(name, data, attrs),
        Data::Enum(data) => derive_enum_body(name, data),
        Data::Union(u) => Err(syn::Error::new(
            u.union_token.span(),
            "`Redact` cannot be derived for unions",
        )),
    }
}

fn derive_struct_body(name: &Ident, data: &DataStruct, attrs: &[Attribute]) -> Result<RedactOutput> {
    let template = template_from_attrs(attrs, name.span())?;
    let fields = build_fields(&data.fields)?;
    let format_args = build_format_args(&template, &fields)?;
    let prelude = format_args.prelude;
    let pattern = match_pattern(quote! { Self }, &data.fields, &fields);
    let body = quote! {
        match self {
            #pattern => {
                #prelude
            }
        }
    };
    Ok(RedactOutput {
        body,
        predicates: format_args.predicates,
    })
}

fn derive_enum_body(name: &Ident, data: &DataEnum) -> Result<RedactOutput> {
    if data.variants.is_empty() {
        return Ok(RedactOutput {
            body: quote! { match *self {} },
            predicates: Vec::new(),
        });
    }

    let mut arms = Vec::new();
    let mut predicates = Vec::new();

    for variant in &data.variants {
        let template = template_from_attrs(&variant.attrs, variant.ident.span())?;
        let fields = build_fields(&variant.fields)?;
        let format_args = build_format_args(&template, &fields)?;
        let prelude = format_args.prelude;
        let variant_ident = &variant.ident;
        let pattern = match_pattern(quote! { #name::#variant_ident }, &variant.fields, &fields);
        arms.push(quote! {
            #pattern => {
                #prelude
            }
        });
        predicates.extend(format_args.predicates);
    }

    let body = quote! {
        match self {
            #(#arms),*
        }
    };

    Ok(RedactOutput { body, predicates })
}

fn match_pattern(path: TokenStream, shape: &Fields, fields: &[FieldInfo<'_>]) -> TokenStream {
    let bindings = fields.iter().map(|field| &field.binding);
    match shape {
        // Named bindings reuse the field ident, so the pattern is shorthand.
        Fields::Named(_) => quote! { #path { #(#bindings),* } },
        Fields::Unnamed(_) => quote! { #path ( #(#bindings),* ) },
        Fields::Unit => path,
    }
}

fn build_fields(fields: &Fields) -> Result<Vec<FieldInfo<'_>>> {
    fields
        .iter()
        .enumerate()
        .map(|(index, field)| {
            let strategy = parse_field_strategy(&field.attrs)?;
            let (binding, member) = match &field.ident {
                Some(ident) => (ident.clone(), syn::Member::Named(ident.clone())),
                None => (
                    format_ident!("field_{index}"),
                    syn::Member::Unnamed(index.into()),
                ),
            };
            Ok(FieldInfo {
                binding,
                member,
                ty: &field.ty,
                strategy,
                span: field.span(),
            })
        })
        .collect()
}

fn build_format_args(template: &LitStr, fields: &[FieldInfo<'_>]) -> Result<FormatArgsOutput> {
    let placeholders = parse_placeholders(template)?;
    let mut named_args: BTreeMap<String, (Ident, &'_ FieldInfo<'_>, FormatMode)> = BTreeMap::new();
    let mut positional_args: Vec<Option<(Ident, &'_ FieldInfo<'_>, FormatMode)>> = Vec::new();

    for placeholder in placeholders {
        match placeholder.key {
            PlaceholderKey::Named(name) => {
                let field = fields
                    .iter()
                    .find(|field| {
                        matches!(&field.member, syn::Member::Named(ident) if ident.unraw() == name)
                    })
                    .ok_or_else(|| {
                        syn::Error::new(
                            placeholder.span,
                            format!("unknown field `{name}` in format string"),
                        )
                    })?;
                let arg_ident = format_ident!("__redacted_{}", name.unraw());
                let entry = named_args.entry(name.to_string()).or_insert((
                    arg_ident,
                    field,
                    placeholder.mode,
                ));
                entry.2 = merge_mode(entry.2, placeholder.mode);
            }
            PlaceholderKey::Index(index) => {
                if positional_args.len() <= index {
                    positional_args.resize_with(index + 1, || None);
                }
                let field = fields.get(index).ok_or_else(|| {
                    syn::Error::new(
                        placeholder.span,
                        format!("unknown positional field index {index} in format string"),
                    )
                })?;
                let arg_ident = format_ident!("__redacted_{index}");
                let entry =
                    positional_args[index].get_or_insert((arg_ident, field, placeholder.mode));
                entry.2 = merge_mode(entry.2, placeholder.mode);
            }
        }
    }

    if positional_args.iter().any(Option::is_none) {
        return Err(syn::Error::new(
            template.span(),
            "positional placeholders must not skip a field index",
        ));
    }

    let mut prelude_bindings = Vec::new();
    let mut positional_idents = Vec::new();
    let mut named_pairs = Vec::new();
    let mut predicates = Vec::new();

    for (name, (arg_ident, field, mode)) in named_args {
        let expr = redacted_expr_for_field(field);
        collect_predicates(field, mode, &mut predicates);
        prelude_bindings.push(quote! {
            let #arg_ident = #expr;
        });
        let name_ident = format_ident!("{name}");
        named_pairs.push(quote! { #name_ident = #arg_ident });
    }

    for (arg_ident, field, mode) in positional_args.into_iter().flatten() {
        let expr = redacted_expr_for_field(field);
        collect_predicates(field, mode, &mut predicates);
        prelude_bindings.push(quote! {
            let #arg_ident = #expr;
        });
        positional_idents.push(arg_ident);
    }

    let format_args = match (positional_idents.is_empty(), named_pairs.is_empty()) {
        (true, true) => quote! { format_args!(#template) },
        (false, true) => quote! { format_args!(#template, #(#positional_idents),*) },
        (true, false) => quote! { format_args!(#template, #(#named_pairs),*) },
        (false, false) => {
            quote! { format_args!(#template, #(#positional_idents),*, #(#named_pairs),*) }
        }
    };

    let formatter = format_ident!("{}", FORMATTER);
    let prelude = quote! {
        #(#prelude_bindings)*
        #formatter.write_fmt(#format_args)
    };

    Ok(FormatArgsOutput {
        prelude,
        predicates,
    })
}

fn redacted_expr_for_field(field: &FieldInfo<'_>) -> TokenStream {
    let binding = &field.binding;
    let span = field.span;
    match field.strategy {
        Strategy::Placeholder => {
            let placeholder_path = crate_path("Placeholder");
            quote_spanned! { span =>
                #placeholder_path::of(#binding)
            }
        }
        Strategy::Safe => quote_spanned! { span =>
            #binding
        },
        Strategy::Nested => {
            let redacted_ref_path = crate_path("RedactedRef");
            quote_spanned! { span =>
                #redacted_ref_path::new(#binding)
            }
        }
    }
}

fn collect_predicates(field: &FieldInfo<'_>, mode: FormatMode, predicates: &mut Vec<WherePredicate>) {
    let ty = field.ty;
    match field.strategy {
        Strategy::Placeholder => {}
        Strategy::Safe => {
            if matches!(mode, FormatMode::Display | FormatMode::Both) {
                predicates.push(parse_quote!(#ty: ::core::fmt::Display));
            }
            if matches!(mode, FormatMode::Debug | FormatMode::Both) {
                predicates.push(parse_quote!(#ty: ::core::fmt::Debug));
            }
        }
        Strategy::Nested => {
            let redact_path = crate_path("Redact");
            predicates.push(parse_quote!(#ty: #redact_path));
        }
    }
}

fn merge_mode(existing: FormatMode, next: FormatMode) -> FormatMode {
    match (existing, next) {
        (FormatMode::Both, _) | (_, FormatMode::Both) => FormatMode::Both,
        (FormatMode::Display, FormatMode::Debug) | (FormatMode::Debug, FormatMode::Display) => {
            FormatMode::Both
        }
        (FormatMode::Display, FormatMode::Display) => FormatMode::Display,
        (FormatMode::Debug, FormatMode::Debug) => FormatMode::Debug,
    }
}

fn template_from_attrs(attrs: &[Attribute], span: Span) -> Result<LitStr> {
    if let Some(template) = literal_template_from_attrs(attrs, "redact")? {
        return Ok(template);
    }
    if let Some(template) = literal_template_from_attrs(attrs, "error")? {
        return Ok(template);
    }
    if let Some(doc) = doc_template_from_attrs(attrs) {
        return Ok(doc);
    }
    Err(syn::Error::new(
        span,
        "missing message template: add #[redact(\"...\")], #[error(\"...\")] or a doc comment",
    ))
}

fn literal_template_from_attrs(attrs: &[Attribute], name: &str) -> Result<Option<LitStr>> {
    for attr in attrs {
        if !attr.path().is_ident(name) {
            continue;
        }
        let expected = format!("expected #[{name}(\"...\")]");
        return match &attr.meta {
            syn::Meta::List(list) => {
                if name == "error"
                    && syn::parse2::<Ident>(list.tokens.clone())
                        .is_ok_and(|ident| ident == "transparent")
                {
                    return Err(syn::Error::new(
                        attr.span(),
                        "#[error(transparent)] has no template; add #[redact(\"...\")]",
                    ));
                }
                syn::parse2::<LitStr>(list.tokens.clone())
                    .map(Some)
                    .map_err(|_| syn::Error::new(attr.span(), expected))
            }
            _ => Err(syn::Error::new(attr.span(), expected)),
        };
    }
    Ok(None)
}

fn doc_template_from_attrs(attrs: &[Attribute]) -> Option<LitStr> {
    let mut lines = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let syn::Meta::NameValue(value) = &attr.meta
            && let syn::Expr::Lit(expr) = &value.value
            && let syn::Lit::Str(lit) = &expr.lit
        {
            lines.push(lit.value().trim_start().to_string());
        }
    }
    if lines.is_empty() {
        return None;
    }
    let text = lines.join("\n");
    Some(LitStr::new(text.trim(), Span::call_site()))
}

fn parse_placeholders(template: &LitStr) -> Result<Vec<Placeholder>> {
    let value = template.value();
    let mut chars = value.chars().peekable();
    let mut placeholders = Vec::new();
    let mut implicit_index = 0usize;

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if matches!(chars.peek(), Some('{')) {
                    chars.next();
                    continue;
                }
                let mut inside = String::new();
                let mut closed = false;
                for next in chars.by_ref() {
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    inside.push(next);
                }
                if !closed {
                    return Err(syn::Error::new(
                        template.span(),
                        "unmatched `{` in format string",
                    ));
                }

                let (arg_part, spec_part) = inside.split_once(':').unwrap_or((&inside, ""));
                let arg_part = arg_part.trim();
                let mode = format_mode_from_spec(spec_part, template.span())?;
                let key = if arg_part.is_empty() {
                    let index = implicit_index;
                    implicit_index += 1;
                    PlaceholderKey::Index(index)
                } else if arg_part.chars().all(|c| c.is_ascii_digit()) {
                    let index = arg_part
                        .parse::<usize>()
                        .map_err(|_| syn::Error::new(template.span(), "invalid index"))?;
                    PlaceholderKey::Index(index)
                } else if is_ident(arg_part) {
                    PlaceholderKey::Named(Ident::new(arg_part, template.span()))
                } else {
                    return Err(syn::Error::new(
                        template.span(),
                        format!("unsupported format placeholder `{arg_part}`"),
                    ));
                };
                placeholders.push(Placeholder {
                    key,
                    mode,
                    span: template.span(),
                });
            }
            '}' => {
                if matches!(chars.peek(), Some('}')) {
                    chars.next();
                } else {
                    return Err(syn::Error::new(
                        template.span(),
                        "unmatched `}` in format string",
                    ));
                }
            }
            _ => {}
        }
    }

    Ok(placeholders)
}

fn format_mode_from_spec(spec_part: &str, span: Span) -> Result<FormatMode> {
    let spec = spec_part.trim();
    if spec.is_empty() {
        return Ok(FormatMode::Display);
    }
    if spec.contains('$') || spec.contains('*') {
        return Err(syn::Error::new(
            span,
            "format specifiers with dynamic width/precision are not supported",
        ));
    }
    let last = spec.chars().last().unwrap_or_default();
    match last {
        '?' => Ok(FormatMode::Debug),
        'x' | 'X' | 'o' | 'b' | 'p' | 'e' | 'E' => Err(syn::Error::new(
            span,
            format!("unsupported format specifier `{spec}`; only Display and Debug are supported"),
        )),
        _ => Ok(FormatMode::Display),
    }
}

fn is_ident(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(ch) if ch == '_' || ch.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|ch| ch == '_' || ch.is_ascii_alphanumeric())
}
