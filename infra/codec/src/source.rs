use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;
use crate::scanner::find_rule_type;
use crate::types::{RuleModel, RuleModule, RuleTypeInfo};

/// One entry of the extra type list a caller passes to the serializer.
///
/// Either a whole module, whose types are all included, or a single rule type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSource {
    Module(RuleModule),
    Type(&'static RuleTypeInfo),
}

/// A textual source whose kind has been checked but whose tag is not resolved yet.
enum RawSource<'a> {
    Module(&'a str),
    Tag(&'a str),
}

impl<'a> RawSource<'a> {
    fn parse(text: &'a str) -> Result<Self, CodecError> {
        let Some((kind, value)) = text.split_once(':') else {
            return Err(CodecError::invalid_kind("plain string"));
        };
        let (kind, value) = (kind.trim(), value.trim());

        match kind {
            "module" if !value.is_empty() => Ok(Self::Module(value)),
            "type" if !value.is_empty() => Ok(Self::Tag(value)),
            "module" | "type" => Err(CodecError::invalid_kind(format!("empty {kind} reference"))),
            other => Err(CodecError::invalid_kind(other.to_owned())),
        }
    }

    fn resolve(self) -> Result<TypeSource, CodecError> {
        match self {
            Self::Module(name) => Ok(TypeSource::Module(RuleModule::named(name.to_owned()))),
            Self::Tag(tag) => find_rule_type(tag).map(TypeSource::Type),
        }
    }
}

impl TypeSource {
    /// Refers to the single rule type `T`.
    #[must_use]
    pub fn rule<T: RuleModel>() -> Self {
        Self::Type(T::type_info())
    }

    /// Parses a textual type source.
    ///
    /// Accepted forms are `module:<crate name>` and `type:<tag>`.
    ///
    /// # Errors
    /// * [`CodecError::InvalidArgumentKind`] for any other form.
    /// * [`CodecError::UnknownType`] if a `type:` tag is not registered.
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        RawSource::parse(text)?.resolve()
    }

    /// Parses a whole list.
    ///
    /// The kind of every entry is checked before any `type:` tag is resolved, so
    /// an invalid entry is reported ahead of an unknown tag.
    ///
    /// # Errors
    /// See [`TypeSource::parse`].
    pub fn parse_all<I, S>(texts: I) -> Result<Vec<Self>, CodecError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let texts: Vec<S> = texts.into_iter().collect();
        let specs = texts
            .iter()
            .map(|text| RawSource::parse(text.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        specs.into_iter().map(RawSource::resolve).collect()
    }
}

impl From<RuleModule> for TypeSource {
    fn from(module: RuleModule) -> Self {
        Self::Module(module)
    }
}

impl From<&RuleModule> for TypeSource {
    fn from(module: &RuleModule) -> Self {
        Self::Module(module.clone())
    }
}

impl From<&'static RuleTypeInfo> for TypeSource {
    fn from(info: &'static RuleTypeInfo) -> Self {
        Self::Type(info)
    }
}

impl FromStr for TypeSource {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TypeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(module) => write!(f, "module:{module}"),
            Self::Type(info) => write!(f, "type:{}", info.tag()),
        }
    }
}
