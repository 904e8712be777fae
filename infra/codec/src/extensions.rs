//! # Rule Extensions
//!
//! The [`RuleExt`] extension trait lets a concrete rule encode and decode itself
//! through a [`RuleSerializer`], and [`BoxedRuleExt`] gives `Box<dyn Rule>` the
//! typed accessors that `dyn Any` would.

use crate::engine::{RuleSerializer, downcast};
use crate::error::CodecError;
use crate::source::TypeSource;
use crate::types::{Rule, RuleModel};

/// Extension trait implemented for every concrete rule type.
pub trait RuleExt: Rule + RuleModel {
    /// Encodes the rule, with `extra` sources known in addition to the defaults.
    ///
    /// # Errors
    /// See [`RuleSerializer::serialize`].
    fn to_text(&self, serializer: &RuleSerializer, extra: &[TypeSource]) -> Result<String, CodecError> {
        serializer.serialize(self, extra)
    }

    /// Decodes a rule of this type.
    ///
    /// # Errors
    /// See [`RuleSerializer::deserialize`].
    fn from_text(
        serializer: &RuleSerializer,
        text: &str,
        extra: &[TypeSource],
    ) -> Result<Self, CodecError> {
        serializer.deserialize(text, extra)
    }

    /// A [`TypeSource`] naming exactly this type.
    #[must_use]
    fn type_source() -> TypeSource {
        TypeSource::rule::<Self>()
    }
}

impl<T: Rule + RuleModel> RuleExt for T {}

/// Typed access to boxed rules.
pub trait BoxedRuleExt {
    /// Returns `true` if the boxed rule is a `T`.
    fn is<T: Rule>(&self) -> bool;

    fn downcast_ref<T: Rule>(&self) -> Option<&T>;

    /// Moves the boxed rule into its concrete type.
    ///
    /// # Errors
    /// Returns [`CodecError::TypeMismatch`] if the rule is not a `T`.
    fn downcast<T: Rule>(self) -> Result<T, CodecError>;
}

impl BoxedRuleExt for Box<dyn Rule> {
    fn is<T: Rule>(&self) -> bool {
        self.rule_type().is::<T>()
    }

    fn downcast_ref<T: Rule>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    fn downcast<T: Rule>(self) -> Result<T, CodecError> {
        downcast(self)
    }
}
