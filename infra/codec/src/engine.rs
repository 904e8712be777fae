use std::any::type_name;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::builder::RuleSerializerBuilder;
use crate::error::CodecError;
use crate::known::{KnownTypeSet, KnownTypeSetBuilder};
use crate::registry::TypeRegistry;
use crate::scope::ScopeGuard;
use crate::source::TypeSource;
use crate::types::{Rule, RuleModule};

#[derive(Debug)]
pub(crate) struct RuleSerializerInner {
    pub(crate) registry: TypeRegistry,
    pub(crate) core: RuleModule,
    pub(crate) defaults: Vec<TypeSource>,
    pub(crate) pretty: bool,
}

/// Converts rule values to text and back.
///
/// A serializer is bound to a *core module* whose types are always known. Each
/// call may name extra [`TypeSource`]s; together with the configured defaults
/// they determine the rule types allowed to appear in the text. The module scan
/// cache is held by a [`TypeRegistry`] shared by every clone of the serializer.
///
/// ### Text Format
/// Every rule is encoded as a JSON object whose `"$type"` key carries the tag of
/// its concrete type, followed by the fields of the rule. Nested rules use the
/// same shape:
///
/// ```text
/// {"$type":"calendar.day_offset","days":3,"rule":{"$type":"calendar.every_day"}}
/// ```
///
/// ### Example
/// ```rust
/// use rulekit_codec::prelude::*;
///
/// rulekit_codec::declare_rule_module!(static RULES);
///
/// #[rule_model(tag = "doc.weekend")]
/// struct Weekend {}
///
/// impl Rule for Weekend {
///     fn matches(&self, date: NaiveDate) -> bool {
///         matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
///     }
/// }
///
/// # fn main() -> Result<(), CodecError> {
/// let codec = RuleSerializer::builder(&RULES).build();
///
/// let text = codec.serialize(&Weekend {}, &[])?;
/// assert_eq!(text, r#"{"$type":"doc.weekend"}"#);
///
/// let restored: Weekend = codec.deserialize(&text, &[])?;
/// assert!(restored.matches(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RuleSerializer {
    pub(crate) inner: Arc<RuleSerializerInner>,
}

impl RuleSerializer {
    /// Returns a new [`RuleSerializerBuilder`] for the given core module.
    #[must_use]
    pub fn builder(core: &RuleModule) -> RuleSerializerBuilder {
        RuleSerializerBuilder::new(core.clone())
    }

    #[must_use]
    pub fn core_module(&self) -> &RuleModule {
        &self.inner.core
    }

    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.inner.registry
    }

    #[must_use]
    pub fn default_sources(&self) -> &[TypeSource] {
        &self.inner.defaults
    }

    /// Computes the rule types known to a call with the given extra sources.
    ///
    /// # Errors
    /// * [`CodecError::ModuleScan`] if a requested module cannot be scanned.
    /// * [`CodecError::DuplicateTag`] if two distinct known types share a tag.
    pub fn known_types(&self, extra: &[TypeSource]) -> Result<KnownTypeSet, CodecError> {
        KnownTypeSetBuilder::new(&self.inner.registry, &self.inner.core)
            .with_defaults(&self.inner.defaults)
            .build(extra)
    }

    /// Encodes a rule, and every rule nested in it, to text.
    ///
    /// # Results
    /// Returns the encoded text.
    ///
    /// # Errors
    /// * [`CodecError::UnknownType`] if the rule or a nested rule is not known.
    /// * [`CodecError::Encoding`] if a field cannot be encoded.
    /// * See [`RuleSerializer::known_types`] for type set failures.
    #[instrument(level = "trace", skip_all, fields(rule = rule.rule_type().tag()))]
    pub fn serialize(
        &self,
        rule: &(dyn Rule + 'static),
        extra: &[TypeSource],
    ) -> Result<String, CodecError> {
        let scope = ScopeGuard::enter(self.known_types(extra)?);

        let encoded = if self.inner.pretty {
            serde_json::to_string_pretty(rule)
        } else {
            serde_json::to_string(rule)
        };

        encoded.map_err(|err| {
            scope.take_failure().unwrap_or_else(|| {
                debug!(error = %err, "Rule encoding failed");
                CodecError::Encoding { message: err.to_string().into(), context: None }
            })
        })
    }

    /// Encodes a rule with extra sources given as text (`module:<name>`, `type:<tag>`).
    ///
    /// The whole list is validated before anything is scanned.
    ///
    /// # Errors
    /// * [`CodecError::InvalidArgumentKind`] if an entry is not a valid source.
    /// * See [`RuleSerializer::serialize`].
    pub fn serialize_with<S: AsRef<str>>(
        &self,
        rule: &(dyn Rule + 'static),
        extra: &[S],
    ) -> Result<String, CodecError> {
        self.serialize(rule, &TypeSource::parse_all(extra)?)
    }

    /// Decodes text into a rule whose concrete type is only known at runtime.
    ///
    /// # Errors
    /// * [`CodecError::MalformedText`] if the text is not a well-formed rule document.
    /// * [`CodecError::UnknownType`] if a tag in the text is not known.
    /// * See [`RuleSerializer::known_types`] for type set failures.
    #[instrument(level = "trace", skip_all)]
    pub fn deserialize_dyn(
        &self,
        text: &str,
        extra: &[TypeSource],
    ) -> Result<Box<dyn Rule>, CodecError> {
        let scope = ScopeGuard::enter(self.known_types(extra)?);

        serde_json::from_str::<Box<dyn Rule>>(text).map_err(|source| {
            scope.take_failure().unwrap_or_else(|| {
                debug!(error = %source, "Rule text rejected");
                CodecError::MalformedText { source, context: None }
            })
        })
    }

    /// Decodes text into the rule type `T`.
    ///
    /// # Errors
    /// * [`CodecError::TypeMismatch`] if the text holds a different rule type.
    /// * See [`RuleSerializer::deserialize_dyn`].
    pub fn deserialize<T: Rule>(&self, text: &str, extra: &[TypeSource]) -> Result<T, CodecError> {
        downcast(self.deserialize_dyn(text, extra)?)
    }

    /// Decodes text with extra sources given as text.
    ///
    /// # Errors
    /// * [`CodecError::InvalidArgumentKind`] if an entry is not a valid source.
    /// * See [`RuleSerializer::deserialize`].
    pub fn deserialize_with<T: Rule, S: AsRef<str>>(
        &self,
        text: &str,
        extra: &[S],
    ) -> Result<T, CodecError> {
        self.deserialize(text, &TypeSource::parse_all(extra)?)
    }
}

/// Moves a decoded rule into its concrete type.
///
/// # Errors
/// Returns [`CodecError::TypeMismatch`] if `rule` is not a `T`.
pub fn downcast<T: Rule>(rule: Box<dyn Rule>) -> Result<T, CodecError> {
    let found = rule.rule_type().type_name();
    rule.into_any().downcast::<T>().map(|rule| *rule).map_err(|_| CodecError::TypeMismatch {
        expected: type_name::<T>().into(),
        found: found.into(),
        context: None,
    })
}
