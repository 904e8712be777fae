//! # Module Scanning
//!
//! Enumerates the rule types a module defines. The production [`InventoryScanner`]
//! walks the link-time registration records; tests and embedders may plug their
//! own [`ModuleScanner`] into the registry.

use std::sync::Arc;

use crate::error::CodecError;
use crate::types::{RuleModule, RuleRegistration, RuleTypeInfo};

/// Enumerates the rule types defined by a module.
///
/// Scanning is expected to be expensive; the [`TypeRegistry`](crate::TypeRegistry)
/// calls it at most once per module and caches the result.
pub trait ModuleScanner: Send + Sync + std::fmt::Debug {
    /// Returns every rule type that `module` defines.
    ///
    /// # Errors
    /// Returns [`CodecError::ModuleScan`] if the module cannot be enumerated.
    fn scan(&self, module: &RuleModule) -> Result<Vec<&'static RuleTypeInfo>, CodecError>;
}

impl<S: ModuleScanner + ?Sized> ModuleScanner for Arc<S> {
    fn scan(&self, module: &RuleModule) -> Result<Vec<&'static RuleTypeInfo>, CodecError> {
        (**self).scan(module)
    }
}

/// Scanner backed by the registrations compiled into the running binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct InventoryScanner;

impl ModuleScanner for InventoryScanner {
    fn scan(&self, module: &RuleModule) -> Result<Vec<&'static RuleTypeInfo>, CodecError> {
        if !linked_modules().any(|linked| linked == module) {
            return Err(CodecError::ModuleScan {
                module: module.name().to_owned().into(),
                message: "module is not linked or was never declared with `declare_rule_module!`"
                    .into(),
                context: None,
            });
        }

        Ok(registered_rule_types().filter(|info| module.owns(info)).collect())
    }
}

/// Iterates over every rule module declared in the running binary.
pub fn linked_modules() -> impl Iterator<Item = &'static RuleModule> {
    inventory::iter::<RuleModule>.into_iter()
}

/// Iterates over every rule type registered in the running binary.
pub fn registered_rule_types() -> impl Iterator<Item = &'static RuleTypeInfo> {
    inventory::iter::<RuleRegistration>.into_iter().map(RuleRegistration::info)
}

/// Looks up a registered rule type by its tag.
///
/// # Errors
/// Returns [`CodecError::UnknownType`] if no linked type carries `tag`.
pub fn find_rule_type(tag: &str) -> Result<&'static RuleTypeInfo, CodecError> {
    registered_rule_types()
        .find(|info| info.tag() == tag)
        .ok_or_else(|| CodecError::unknown_type(tag.to_owned()))
}
