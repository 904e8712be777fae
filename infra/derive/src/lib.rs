#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros for the rule codec workspace.
//!
//! * [`rule_model`] turns a plain struct into a registered, serializable rule type.
//! * [`rulekit_error`] wires an error enum into the workspace error conventions.
//!
//! The examples are `ignore`d to avoid compiling in this crate; the consuming crates
//! (`rulekit-codec`, `rulekit-calendar`) exercise both macros in their own tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro that declares a concrete rule type.
///
/// The annotated struct becomes discoverable by the type registry of the crate
/// (the *rule module*) it is defined in, and serializable through the polymorphic
/// rule codec.
///
/// # Injected Behaviors
///
/// * **Derives**: Adds `Debug`, `Serialize` and `Deserialize` when missing. Serde is
///   resolved through `rulekit_codec::serde`, so consumers do not need a direct
///   serde dependency.
/// * **Serde Policy**: `deny_unknown_fields`, so decoding rejects objects written
///   for a different schema.
/// * **Discriminator**: Implements `rulekit_codec::RuleModel` with the tag given by
///   `tag = "..."`, or `"<crate>.<StructName>"` by default.
/// * **Registration**: Submits the type to the link-time registry under the
///   defining crate's name (`CARGO_CRATE_NAME`).
///
/// The struct must still implement `rulekit_codec::Rule` by hand.
///
/// # Errors
/// Emits a compile-time error for enums, unions, tuple or unit structs, generic
/// structs, and malformed arguments.
///
/// # Example
/// ```rust,ignore
/// use rulekit_codec::prelude::*;
///
/// #[rule_model(tag = "billing.month_end")]
/// pub struct MonthEnd {}
///
/// impl Rule for MonthEnd {
///     fn matches(&self, date: NaiveDate) -> bool {
///         date.succ_opt().is_some_and(|next| next.day() == 1)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn rule_model(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::rule::expand_rule_model(args.into(), input).into()
}

/// Attribute macro for defining domain-specific error enums.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` when missing.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to `Result<T, Name>` and to results of every wrapped source error.
/// * **Standard Conversions**: Implements `From<Source>` for variants holding a
///   `source` field (or a field marked `#[source]`/`#[from]`), so `?` just works.
/// * **Internal Fallback**: Implements `From<&'static str>` and `From<String>` when an
///   `Internal` variant exists.
/// * **Formatting Helper**: Emits a private `format_context` function for use in
///   `#[error(...)]` strings.
///
/// # Requirements
///
/// 1. Applies to enums only.
/// 2. Every variant uses named fields.
/// 3. A variant wrapping a source error must also have
///    `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[rulekit_derive::rulekit_error]
/// pub enum StoreError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String, StoreError> {
///     std::fs::read_to_string(path).context("Reading rule file")
/// }
/// ```
#[proc_macro_attribute]
pub fn rulekit_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_error(input).into()
}
