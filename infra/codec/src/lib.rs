//! A dynamic rule type registry and a polymorphic text codec for rule objects.
//!
//! Rules are small date predicates that nest: a rule may hold other rules behind
//! `Box<dyn Rule>` without knowing their concrete types. This crate turns such
//! trees into self-describing text and back.
//!
//! ## Rule Modules
//!
//! Every crate that defines rule types is a *rule module*. A module declares
//! itself once with [`declare_rule_module!`] and each rule type with
//! [`rule_model`]. The [`TypeRegistry`] enumerates the types of a module on first
//! use and keeps the result for the life of the process.
//!
//! ## Known Types
//!
//! Each encode or decode call works against a [`KnownTypeSet`]: the core module
//! of the serializer, its configured defaults, the extra [`TypeSource`]s of the
//! call, and every module any earlier call caused to be scanned. Text naming a
//! type outside that set is rejected with [`CodecError::UnknownType`].
//!
//! ## Examples
//!
//! ### Nested rules
//! ```rust
//! use rulekit_codec::prelude::*;
//!
//! rulekit_codec::declare_rule_module!(static RULES);
//!
//! #[rule_model(tag = "doc.always")]
//! struct Always {}
//!
//! #[rule_model(tag = "doc.not")]
//! struct Not {
//!     rule: Box<dyn Rule>,
//! }
//!
//! impl Rule for Always {
//!     fn matches(&self, _date: NaiveDate) -> bool {
//!         true
//!     }
//! }
//!
//! impl Rule for Not {
//!     fn matches(&self, date: NaiveDate) -> bool {
//!         !self.rule.matches(date)
//!     }
//! }
//!
//! # fn main() -> Result<(), CodecError> {
//! let codec = RuleSerializer::builder(&RULES).build();
//!
//! let text = codec.serialize(&Not { rule: Box::new(Always {}) }, &[])?;
//! assert_eq!(text, r#"{"$type":"doc.not","rule":{"$type":"doc.always"}}"#);
//!
//! let restored = codec.deserialize_dyn(&text, &[])?;
//! assert!(restored.is::<Not>());
//! assert!(!restored.matches(NaiveDate::from_ymd_opt(2015, 3, 3).unwrap()));
//! # Ok(())
//! # }
//! ```

extern crate self as rulekit_codec;

mod builder;
mod engine;
mod error;
pub mod extensions;
mod known;
mod registry;
mod scanner;
mod scope;
mod source;
mod types;

pub use builder::RuleSerializerBuilder;
pub use engine::{RuleSerializer, downcast};
pub use error::{CodecError, CodecErrorExt};
pub use known::{KnownTypeSet, KnownTypeSetBuilder};
pub use registry::TypeRegistry;
pub use rulekit_derive::rule_model;
pub use scanner::{
    InventoryScanner, ModuleScanner, find_rule_type, linked_modules, registered_rule_types,
};
pub use serde;
pub use source::TypeSource;
pub use types::{
    Rule, RuleModel, RuleModule, RuleObject, RuleRegistration, RuleTypeInfo, TYPE_KEY,
};

pub mod prelude {
    pub use crate::engine::RuleSerializer;
    pub use crate::error::{CodecError, CodecErrorExt};
    pub use crate::extensions::{BoxedRuleExt, RuleExt};
    pub use crate::source::TypeSource;
    pub use crate::types::{Rule, RuleModel, RuleModule};
    pub use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
    pub use rulekit_derive::rule_model;
}

#[doc(hidden)]
pub mod __private {
    pub use inventory;
}
