use std::sync::Arc;

use crate::engine::{RuleSerializer, RuleSerializerInner};
use crate::error::CodecError;
use crate::registry::TypeRegistry;
use crate::scanner::ModuleScanner;
use crate::source::TypeSource;
use crate::types::RuleModule;

/// A builder for the [`RuleSerializer`].
///
/// By default the serializer gets its own [`TypeRegistry`] backed by the
/// inventory scanner, no default sources and compact output.
#[derive(Debug)]
pub struct RuleSerializerBuilder {
    core: RuleModule,
    registry: Option<TypeRegistry>,
    defaults: Vec<TypeSource>,
    pretty: bool,
}

impl RuleSerializerBuilder {
    #[must_use]
    pub const fn new(core: RuleModule) -> Self {
        Self { core, registry: None, defaults: Vec::new(), pretty: false }
    }

    /// Shares an existing registry, and its scan cache, with the serializer.
    #[must_use]
    pub fn registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Backs a fresh registry with a custom module scanner.
    #[must_use]
    pub fn scanner(self, scanner: impl ModuleScanner + 'static) -> Self {
        self.registry(TypeRegistry::with_scanner(scanner))
    }

    /// Adds a source known to every call, in addition to the core module.
    #[must_use]
    pub fn default_source(mut self, source: impl Into<TypeSource>) -> Self {
        self.defaults.push(source.into());
        self
    }

    #[must_use]
    pub fn default_sources(mut self, sources: impl IntoIterator<Item = TypeSource>) -> Self {
        self.defaults.extend(sources);
        self
    }

    /// Adds default sources given as text (`module:<name>`, `type:<tag>`).
    ///
    /// # Errors
    /// Returns [`CodecError::InvalidArgumentKind`] or [`CodecError::UnknownType`]
    /// if an entry cannot be parsed.
    pub fn default_sources_from_text<S: AsRef<str>>(
        self,
        sources: impl IntoIterator<Item = S>,
    ) -> Result<Self, CodecError> {
        Ok(self.default_sources(TypeSource::parse_all(sources)?))
    }

    /// Enables indented, multi-line output.
    #[must_use]
    pub const fn pretty(mut self, enabled: bool) -> Self {
        self.pretty = enabled;
        self
    }

    #[must_use]
    pub fn build(self) -> RuleSerializer {
        let inner = RuleSerializerInner {
            registry: self.registry.unwrap_or_default(),
            core: self.core,
            defaults: self.defaults,
            pretty: self.pretty,
        };
        RuleSerializer { inner: Arc::new(inner) }
    }
}
