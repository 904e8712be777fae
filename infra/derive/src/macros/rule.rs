use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::Parser;
use syn::{Data, DeriveInput, Expr, Fields, Lit, LitStr, Meta};

use super::derived_trait_names;

/// Expands the `#[rule_model]` attribute macro.
pub fn expand_rule_model(args: TokenStream, input: DeriveInput) -> TokenStream {
    let tag = match parse_tag(args) {
        Ok(tag) => tag,
        Err(err) => return err.to_compile_error(),
    };
    if let Err(err) = check_shape(&input) {
        return err.to_compile_error();
    }

    let name = &input.ident;
    let tag_expr = tag.map_or_else(
        || {
            let default = LitStr::new(&name.to_string(), Span::call_site());
            quote! { ::core::concat!(::core::env!("CARGO_CRATE_NAME"), ".", #default) }
        },
        |lit| quote! { #lit },
    );

    let derives = serde_derives(&input);

    quote! {
        #derives
        #input

        #[automatically_derived]
        impl ::rulekit_codec::RuleModel for #name {
            const TAG: &'static str = #tag_expr;

            fn type_info() -> &'static ::rulekit_codec::RuleTypeInfo {
                static INFO: ::rulekit_codec::RuleTypeInfo = ::rulekit_codec::RuleTypeInfo::of::<#name>(
                    ::core::env!("CARGO_CRATE_NAME"),
                    <#name as ::rulekit_codec::RuleModel>::TAG,
                );
                &INFO
            }
        }

        ::rulekit_codec::__private::inventory::submit! {
            ::rulekit_codec::RuleRegistration::new(
                <#name as ::rulekit_codec::RuleModel>::type_info,
            )
        }
    }
}

fn serde_derives(input: &DeriveInput) -> TokenStream {
    let present = derived_trait_names(&input.attrs);
    let mut missing = Vec::new();
    if !present.contains("Debug") {
        missing.push(quote! { Debug });
    }
    let needs_serde = !present.contains("Serialize") || !present.contains("Deserialize");
    if !present.contains("Serialize") {
        missing.push(quote! { ::rulekit_codec::serde::Serialize });
    }
    if !present.contains("Deserialize") {
        missing.push(quote! { ::rulekit_codec::serde::Deserialize });
    }

    let derive = if missing.is_empty() { quote! {} } else { quote! { #[derive(#(#missing),*)] } };
    let serde_attr = if needs_serde {
        quote! { #[serde(crate = "::rulekit_codec::serde", deny_unknown_fields)] }
    } else {
        quote! {}
    };

    quote! {
        #derive
        #serde_attr
    }
}

fn check_shape(input: &DeriveInput) -> syn::Result<()> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(&input.ident, "rule_model only supports structs"));
    };
    if !matches!(data.fields, Fields::Named(_)) {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "rule_model requires named fields; use `struct Name {}` for a rule without fields",
        ));
    }
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "rule_model types must be concrete; generic rules cannot be registered",
        ));
    }
    Ok(())
}

fn parse_tag(args: TokenStream) -> syn::Result<Option<LitStr>> {
    let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
    let mut tag = None;

    for meta in parser.parse2(args)? {
        let Meta::NameValue(name_value) = meta else {
            return Err(syn::Error::new_spanned(meta, "Expected `tag = \"...\"`"));
        };
        if !name_value.path.is_ident("tag") {
            return Err(syn::Error::new_spanned(
                name_value.path,
                "Only `tag = \"...\"` is supported",
            ));
        }
        if tag.is_some() {
            return Err(syn::Error::new_spanned(name_value, "Duplicate `tag = \"...\"` argument"));
        }

        let Expr::Lit(syn::ExprLit { lit: Lit::Str(lit), .. }) = &name_value.value else {
            return Err(syn::Error::new_spanned(
                &name_value.value,
                "Expected string literal for `tag = \"...\"`",
            ));
        };
        if lit.value().trim().is_empty() {
            return Err(syn::Error::new_spanned(lit, "Rule tag cannot be empty"));
        }
        tag = Some(lit.clone());
    }

    Ok(tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(args: TokenStream, item: TokenStream) -> String {
        let input: DeriveInput = syn::parse2(item).expect("test input should parse");
        expand_rule_model(args, input).to_string()
    }

    #[test]
    fn explicit_tag_is_used_verbatim() {
        let out = expand(quote! { tag = "calendar.every_day" }, quote! { pub struct EveryDay {} });
        assert!(out.contains("\"calendar.every_day\""));
        assert!(out.contains("inventory :: submit"));
        assert!(!out.contains("compile_error"));
    }

    #[test]
    fn default_tag_uses_crate_name() {
        let out = expand(quote! {}, quote! { pub struct EveryDay {} });
        assert!(out.contains("CARGO_CRATE_NAME"));
        assert!(out.contains("\"EveryDay\""));
    }

    #[test]
    fn existing_derives_are_not_duplicated() {
        let out = expand(quote! {}, quote! { #[derive(Debug, Clone)] pub struct Plain { pub n: u8 } });
        assert_eq!(out.matches("Debug").count(), 1);
        assert!(out.contains("deny_unknown_fields"));
    }

    #[test]
    fn rejects_unsupported_shapes() {
        for item in [
            quote! { pub struct Tuple(u8); },
            quote! { pub struct Unit; },
            quote! { pub enum Kind { A } },
            quote! { pub struct Generic<T> { pub inner: T } },
        ] {
            assert!(expand(quote! {}, item).contains("compile_error"));
        }
    }

    #[test]
    fn rejects_malformed_arguments() {
        let item = quote! { pub struct Rule {} };
        assert!(expand(quote! { name = "x" }, item.clone()).contains("Only `tag"));
        assert!(expand(quote! { tag = 1 }, item.clone()).contains("string literal"));
        assert!(expand(quote! { tag = "" }, item.clone()).contains("cannot be empty"));
        assert!(expand(quote! { tag = "a", tag = "b" }, item).contains("Duplicate"));
    }
}
