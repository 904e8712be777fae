use fxhash::FxHashMap;
use std::any::TypeId;
use tracing::trace;

use crate::error::CodecError;
use crate::registry::TypeRegistry;
use crate::source::TypeSource;
use crate::types::{RuleModule, RuleTypeInfo};

/// The rule types that may appear in the text of one encode or decode call.
///
/// Indexed both by discriminator tag (decoding) and by concrete type (encoding).
#[derive(Debug, Clone, Default)]
pub struct KnownTypeSet {
    by_tag: FxHashMap<&'static str, &'static RuleTypeInfo>,
    by_type: FxHashMap<TypeId, &'static RuleTypeInfo>,
}

impl KnownTypeSet {
    /// Adds a type to the set.
    ///
    /// # Results
    /// Returns `true` if the type was not in the set before.
    ///
    /// # Errors
    /// Returns [`CodecError::DuplicateTag`] if a different type already uses the
    /// same tag.
    pub fn insert(&mut self, info: &'static RuleTypeInfo) -> Result<bool, CodecError> {
        if let Some(existing) = self.by_tag.get(info.tag()) {
            if *existing == info {
                return Ok(false);
            }
            return Err(CodecError::DuplicateTag {
                tag: info.tag().into(),
                first: existing.type_name().into(),
                second: info.type_name().into(),
                context: None,
            });
        }

        self.by_tag.insert(info.tag(), info);
        self.by_type.insert(info.type_id(), info);
        Ok(true)
    }

    /// Resolves a discriminator tag.
    #[must_use]
    pub fn by_tag(&self, tag: &str) -> Option<&'static RuleTypeInfo> {
        self.by_tag.get(tag).copied()
    }

    #[must_use]
    pub fn contains(&self, info: &RuleTypeInfo) -> bool {
        self.by_type.contains_key(&info.type_id())
    }

    #[must_use]
    pub fn contains_type<T: 'static>(&self) -> bool {
        self.by_type.contains_key(&TypeId::of::<T>())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static RuleTypeInfo> + '_ {
        self.by_type.values().copied()
    }
}

/// Computes the [`KnownTypeSet`] of a call.
///
/// The set always contains the core module and the configured default sources.
/// Every module is resolved through the shared [`TypeRegistry`], and because the
/// set is built from everything the registry has scanned so far, types of modules
/// requested by earlier calls remain known to later ones.
#[derive(Debug, Clone, Copy)]
pub struct KnownTypeSetBuilder<'a> {
    registry: &'a TypeRegistry,
    core: &'a RuleModule,
    defaults: &'a [TypeSource],
}

impl<'a> KnownTypeSetBuilder<'a> {
    #[must_use]
    pub const fn new(registry: &'a TypeRegistry, core: &'a RuleModule) -> Self {
        Self { registry, core, defaults: &[] }
    }

    /// Sources included in every set built by this builder.
    #[must_use]
    pub const fn with_defaults(mut self, defaults: &'a [TypeSource]) -> Self {
        self.defaults = defaults;
        self
    }

    /// Builds the set for a call with the given extra sources.
    ///
    /// # Errors
    /// * [`CodecError::ModuleScan`] if a requested module cannot be scanned.
    /// * [`CodecError::DuplicateTag`] if two distinct types share a tag.
    pub fn build(&self, extra: &[TypeSource]) -> Result<KnownTypeSet, CodecError> {
        let sources = self.defaults.iter().chain(extra);
        let mut single_types = Vec::new();

        self.registry.ensure_scanned(self.core)?;
        for source in sources {
            match source {
                TypeSource::Module(module) => self.registry.ensure_scanned(module)?,
                TypeSource::Type(info) => single_types.push(*info),
            }
        }

        let mut known = KnownTypeSet::default();
        for info in self.registry.all_known_types().into_iter().chain(single_types) {
            known.insert(info)?;
        }

        trace!(core = self.core.name(), types = known.len(), "Built known rule type set");
        Ok(known)
    }

    /// Parses textual sources and builds the set.
    ///
    /// The whole list is validated before any module is scanned.
    ///
    /// # Errors
    /// See [`TypeSource::parse`] and [`KnownTypeSetBuilder::build`].
    pub fn build_from_text<S: AsRef<str>>(&self, extra: &[S]) -> Result<KnownTypeSet, CodecError> {
        let sources = TypeSource::parse_all(extra)?;
        self.build(&sources)
    }
}
