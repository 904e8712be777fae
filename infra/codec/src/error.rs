//! # Codec Errors
//!
//! This module defines the [`CodecError`] enum used throughout the codec crate for
//! reporting module scan, type resolution and text format failures.

use std::borrow::Cow;

/// A specialized [`CodecError`] enum for registry and codec failures.
#[rulekit_derive::rulekit_error]
pub enum CodecError {
    /// A rule module could not be enumerated.
    ///
    /// Raised when the module is not linked into the binary or was never declared
    /// with [`declare_rule_module!`](crate::declare_rule_module).
    #[error("Cannot scan rule module `{module}`{}: {message}", format_context(.context))]
    ModuleScan {
        module: Cow<'static, str>,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// A type source was neither a module nor a rule type reference.
    #[error("Invalid type source kind{}: {kind}", format_context(.context))]
    InvalidArgumentKind { kind: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A rule type is absent from the known type set of the current call.
    #[error("Unknown rule type{}: {type_name}", format_context(.context))]
    UnknownType { type_name: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The input text is not a well-formed rule document.
    #[error("Malformed rule text{}: {source}", format_context(.context))]
    MalformedText { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// The decoded rule is not of the type requested by the caller.
    #[error("Rule type mismatch{}: expected {expected}, found {found}", format_context(.context))]
    TypeMismatch {
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// Two distinct rule types claim the same discriminator tag.
    #[error(
        "Duplicate rule tag `{tag}`{}: claimed by {first} and {second}",
        format_context(.context)
    )]
    DuplicateTag {
        tag: Cow<'static, str>,
        first: Cow<'static, str>,
        second: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    /// A rule value could not be turned into text.
    #[error("Encoding error{}: {message}", format_context(.context))]
    Encoding { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal codec error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CodecError {
    pub(crate) fn unknown_type(type_name: impl Into<Cow<'static, str>>) -> Self {
        Self::UnknownType { type_name: type_name.into(), context: None }
    }

    pub(crate) fn invalid_kind(kind: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidArgumentKind { kind: kind.into(), context: None }
    }
}
