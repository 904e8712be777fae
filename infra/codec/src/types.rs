//! # Rule Types
//!
//! The object-safe [`Rule`] capability, the static per-type descriptor
//! [`RuleTypeInfo`] and the link-time registration records that let a module
//! enumerate the rule types it defines.

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key carrying the concrete type tag inside every encoded rule object.
pub const TYPE_KEY: &str = "$type";

/// A date rule.
///
/// Every concrete rule type implements this trait and is declared with
/// [`rule_model`](crate::rule_model), which supplies the [`RuleObject`] plumbing.
/// Rule values are used as `&dyn Rule` or `Box<dyn Rule>` and may nest other rules
/// in their fields.
pub trait Rule: RuleObject {
    /// Returns `true` when `date` satisfies the rule.
    fn matches(&self, date: NaiveDate) -> bool;
}

/// Object-safe access to the concrete type behind a `dyn Rule`.
///
/// Implemented automatically for every [`RuleModel`]; never implement it by hand.
pub trait RuleObject: Any + fmt::Debug + Send + Sync {
    /// Returns the static descriptor of the concrete type.
    fn rule_type(&self) -> &'static RuleTypeInfo;

    /// Encodes the fields of the value, without the type discriminator.
    ///
    /// # Errors
    /// Returns the serializer error of a field that cannot be encoded.
    fn encode_fields(&self) -> Result<Value, serde_json::Error>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T> RuleObject for T
where
    T: RuleModel + Serialize + fmt::Debug + Send + Sync,
{
    fn rule_type(&self) -> &'static RuleTypeInfo {
        T::type_info()
    }

    fn encode_fields(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Static identity of a concrete rule type.
///
/// Generated by [`rule_model`](crate::rule_model).
pub trait RuleModel: Sized + 'static {
    /// Discriminator written into encoded text. Unique among the types of a call.
    const TAG: &'static str;

    /// Returns the descriptor registered for this type.
    fn type_info() -> &'static RuleTypeInfo;
}

type DecodeFn = fn(Value) -> Result<Box<dyn Rule>, serde_json::Error>;

/// Runtime descriptor of one concrete rule type.
///
/// Descriptors live in statics and are compared by the [`TypeId`] of the type
/// they describe.
pub struct RuleTypeInfo {
    module: &'static str,
    tag: &'static str,
    type_name: fn() -> &'static str,
    type_id: fn() -> TypeId,
    decode: DecodeFn,
}

impl RuleTypeInfo {
    /// Builds the descriptor of `T`, owned by `module` and encoded as `tag`.
    #[must_use]
    pub const fn of<T>(module: &'static str, tag: &'static str) -> Self
    where
        T: Rule + DeserializeOwned,
    {
        Self {
            module,
            tag,
            type_name: std::any::type_name::<T>,
            type_id: TypeId::of::<T>,
            decode: decode_boxed::<T>,
        }
    }

    /// Name of the module (crate) defining the type.
    #[must_use]
    pub const fn module(&self) -> &'static str {
        self.module
    }

    /// Discriminator tag of the type.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Fully qualified Rust type name, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Returns `true` when this descriptor belongs to `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id() == TypeId::of::<T>()
    }

    pub(crate) fn decode(&self, fields: Value) -> Result<Box<dyn Rule>, serde_json::Error> {
        (self.decode)(fields)
    }
}

fn decode_boxed<T>(fields: Value) -> Result<Box<dyn Rule>, serde_json::Error>
where
    T: Rule + DeserializeOwned,
{
    serde_json::from_value::<T>(fields).map(|rule| Box::new(rule) as Box<dyn Rule>)
}

impl fmt::Debug for RuleTypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleTypeInfo")
            .field("module", &self.module)
            .field("tag", &self.tag)
            .field("type_name", &self.type_name())
            .finish()
    }
}

impl PartialEq for RuleTypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for RuleTypeInfo {}

impl Hash for RuleTypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id().hash(state);
    }
}

/// Link-time record announcing one rule type.
///
/// Submitted by [`rule_model`](crate::rule_model) for every declared type.
#[derive(Debug)]
pub struct RuleRegistration {
    info: fn() -> &'static RuleTypeInfo,
}

impl RuleRegistration {
    #[must_use]
    pub const fn new(info: fn() -> &'static RuleTypeInfo) -> Self {
        Self { info }
    }

    #[must_use]
    pub fn info(&self) -> &'static RuleTypeInfo {
        (self.info)()
    }
}

inventory::collect!(RuleRegistration);

/// A named collection of rule types: everything one crate declares.
///
/// Modules are identified by crate name. Declare the module of a crate with
/// [`declare_rule_module!`](crate::declare_rule_module); refer to a module by
/// name (for example from configuration) with [`RuleModule::named`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleModule {
    name: Cow<'static, str>,
}

impl RuleModule {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self { name: Cow::Borrowed(name) }
    }

    /// Refers to a module by a runtime name.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` when `info` is owned by this module.
    #[must_use]
    pub fn owns(&self, info: &RuleTypeInfo) -> bool {
        info.module() == self.name()
    }
}

impl fmt::Display for RuleModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

inventory::collect!(RuleModule);

/// Declares the rule module of the current crate as a `static`.
///
/// The module is named after the crate (`CARGO_CRATE_NAME`), which is also the
/// owner recorded by every [`rule_model`](crate::rule_model) in that crate.
///
/// ```rust
/// rulekit_codec::declare_rule_module!(pub static RULES);
///
/// assert!(rulekit_codec::linked_modules().any(|module| module == &RULES));
/// ```
#[macro_export]
macro_rules! declare_rule_module {
    ($vis:vis static $name:ident) => {
        $vis static $name: $crate::RuleModule =
            $crate::RuleModule::new(::core::env!("CARGO_CRATE_NAME"));

        $crate::__private::inventory::submit! {
            $crate::RuleModule::new(::core::env!("CARGO_CRATE_NAME"))
        }
    };
}
