use fxhash::{FxHashMap, FxHashSet};
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::{CodecError, CodecErrorExt};
use crate::scanner::{InventoryScanner, ModuleScanner};
use crate::types::{RuleModule, RuleTypeInfo};

type ModuleTypes = Arc<[&'static RuleTypeInfo]>;

/// Process-wide cache of the rule types discovered per module.
///
/// Each module is scanned at most once over the lifetime of the registry; later
/// requests for the same module are served from memory. The registry is cheap to
/// clone and clones share one cache, so it can be handed to any number of
/// serializers and threads.
#[derive(Clone)]
pub struct TypeRegistry {
    scanner: Arc<dyn ModuleScanner>,
    modules: Arc<RwLock<FxHashMap<RuleModule, ModuleTypes>>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("scanner", &self.scanner)
            .field("modules", &self.scanned_modules())
            .finish()
    }
}

impl TypeRegistry {
    /// Creates an empty registry backed by the [`InventoryScanner`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_scanner(InventoryScanner)
    }

    /// Creates an empty registry backed by a custom scanner.
    #[must_use]
    pub fn with_scanner(scanner: impl ModuleScanner + 'static) -> Self {
        Self::with_shared_scanner(Arc::new(scanner))
    }

    #[must_use]
    pub fn with_shared_scanner(scanner: Arc<dyn ModuleScanner>) -> Self {
        Self { scanner, modules: Arc::default() }
    }

    /// Makes sure the types of `module` are cached, scanning it on first use.
    ///
    /// Scan results are filtered to the types `module` actually owns. If two
    /// threads race on the same module, both may scan but the first insertion
    /// wins and later callers observe that entry.
    ///
    /// # Errors
    /// * [`CodecError::ModuleScan`] if the scanner fails.
    /// * [`CodecError::DuplicateTag`] if a type of `module` reuses the tag of a
    ///   different type that is already cached, or of another type of `module`.
    ///
    /// Nothing is cached for the module when an error is returned.
    pub fn ensure_scanned(&self, module: &RuleModule) -> Result<(), CodecError> {
        if self.modules.read().contains_key(module) {
            trace!(module = module.name(), "Rule module served from cache");
            return Ok(());
        }

        let mut seen = FxHashSet::default();
        let discovered: ModuleTypes = self
            .scanner
            .scan(module)?
            .into_iter()
            .filter(|info| {
                let owned = module.owns(info);
                if !owned {
                    trace!(module = module.name(), tag = info.tag(), "Skipping foreign rule type");
                }
                owned && seen.insert(info.type_id())
            })
            .collect();

        let mut modules = self.modules.write();
        if modules.contains_key(module) {
            trace!(module = module.name(), "Rule module was cached by a concurrent scan");
            return Ok(());
        }

        let cached = modules.values().flat_map(|types| types.iter().copied());
        check_tags(cached, &discovered)
            .context(format!("Scanning rule module {module}"))?;

        debug!(module = module.name(), types = discovered.len(), "Scanned rule module");
        modules.insert(module.clone(), discovered);

        Ok(())
    }

    /// Returns the union of the types of every module scanned so far.
    ///
    /// Each type appears once even if several modules reported it.
    #[must_use]
    pub fn all_known_types(&self) -> Vec<&'static RuleTypeInfo> {
        let modules = self.modules.read();
        let mut seen = FxHashSet::default();
        modules
            .values()
            .flat_map(|types| types.iter().copied())
            .filter(|info| seen.insert(info.type_id()))
            .collect()
    }

    /// Returns the cached types of `module`, if it has been scanned.
    #[must_use]
    pub fn module_types(&self, module: &RuleModule) -> Option<Vec<&'static RuleTypeInfo>> {
        self.modules.read().get(module).map(|types| types.to_vec())
    }

    #[must_use]
    pub fn is_scanned(&self, module: &RuleModule) -> bool {
        self.modules.read().contains_key(module)
    }

    #[must_use]
    pub fn scanned_modules(&self) -> Vec<RuleModule> {
        self.modules.read().keys().cloned().collect()
    }

    /// Number of scanned modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.read().len()
    }
}

/// Fails if a discovered type shares its tag with a different cached or discovered type.
fn check_tags(
    cached: impl Iterator<Item = &'static RuleTypeInfo>,
    discovered: &[&'static RuleTypeInfo],
) -> Result<(), CodecError> {
    let mut by_tag: FxHashMap<&'static str, &'static RuleTypeInfo> =
        cached.map(|info| (info.tag(), info)).collect();

    for &info in discovered {
        match by_tag.entry(info.tag()) {
            Entry::Occupied(existing) if *existing.get() != info => {
                return Err(CodecError::DuplicateTag {
                    tag: info.tag().into(),
                    first: existing.get().type_name().into(),
                    second: info.type_name().into(),
                    context: None,
                });
            },
            Entry::Occupied(_) => {},
            Entry::Vacant(slot) => {
                slot.insert(info);
            },
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    crate::declare_rule_module!(static UNIT_RULES);

    #[rule_model(tag = "registry.odd_day")]
    struct OddDay {}

    impl Rule for OddDay {
        fn matches(&self, date: NaiveDate) -> bool {
            date.day() % 2 == 1
        }
    }

    /// Shares its tag with [`OddDay`] but belongs to another module.
    #[derive(Debug, serde::Serialize, serde::Deserialize)]
    struct EvenDay {}

    const TWIN_MODULE: &str = "twin_rules";

    impl RuleModel for EvenDay {
        const TAG: &'static str = "registry.odd_day";

        fn type_info() -> &'static RuleTypeInfo {
            static INFO: RuleTypeInfo = RuleTypeInfo::of::<EvenDay>(TWIN_MODULE, EvenDay::TAG);
            &INFO
        }
    }

    impl Rule for EvenDay {
        fn matches(&self, date: NaiveDate) -> bool {
            date.day() % 2 == 0
        }
    }

    #[derive(Debug, Default)]
    struct Counting {
        scans: AtomicUsize,
    }

    impl ModuleScanner for Counting {
        fn scan(&self, module: &RuleModule) -> Result<Vec<&'static RuleTypeInfo>, CodecError> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            if module.name() == TWIN_MODULE {
                return Ok(vec![EvenDay::type_info()]);
            }
            InventoryScanner.scan(module)
        }
    }

    fn tags(types: &[&'static RuleTypeInfo]) -> Vec<&'static str> {
        let mut tags: Vec<_> = types.iter().map(|info| info.tag()).collect();
        tags.sort_unstable();
        tags
    }

    #[test]
    fn scans_each_module_once() {
        let counting = Arc::new(Counting::default());
        let registry = TypeRegistry::with_scanner(Arc::clone(&counting));

        registry.ensure_scanned(&UNIT_RULES).unwrap();
        let after_first = tags(&registry.all_known_types());

        registry.ensure_scanned(&UNIT_RULES).unwrap();
        registry.clone().ensure_scanned(&UNIT_RULES).unwrap();

        assert_eq!(counting.scans.load(Ordering::SeqCst), 1);
        assert!(registry.is_scanned(&UNIT_RULES));
        assert_eq!(tags(&registry.all_known_types()), after_first);
        assert!(registry.all_known_types().iter().any(|info| info.is::<OddDay>()));
    }

    #[test]
    fn failed_scans_are_not_cached() {
        let registry = TypeRegistry::new();
        let ghost = RuleModule::named("ghost_rules");

        assert!(registry.ensure_scanned(&ghost).is_err());
        assert!(!registry.is_scanned(&ghost));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn clashing_modules_are_rejected_without_caching() {
        let registry = TypeRegistry::with_scanner(Counting::default());
        let twin = RuleModule::named(TWIN_MODULE);

        registry.ensure_scanned(&UNIT_RULES).unwrap();
        let before = tags(&registry.all_known_types());

        let err = registry.ensure_scanned(&twin).unwrap_err();
        assert!(
            matches!(err, CodecError::DuplicateTag { ref tag, ref context, .. }
                if tag == "registry.odd_day" && context.is_some()),
            "got {err:?}"
        );
        assert!(!registry.is_scanned(&twin));
        assert_eq!(tags(&registry.all_known_types()), before);

        let alone = TypeRegistry::with_scanner(Counting::default());
        alone.ensure_scanned(&twin).unwrap();
        assert!(alone.all_known_types()[0].is::<EvenDay>());
    }
}
