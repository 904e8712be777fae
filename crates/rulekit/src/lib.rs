//! Facade crate for rulekit hosts.
//! Re-exports the codec, the built-in calendar rules and the shared config/kernel
//! primitives, and wires configuration into serializers and logging.
//! Keep this crate thin: it should compose other crates, not implement codec logic.
//!
//! ## Usage
//! - [`shared`] returns the process-wide serializer bound to the calendar module;
//!   the free [`serialize`] and [`deserialize`] functions go through it.
//! - [`build_serializer`] creates a private serializer from a [`CodecConfig`].
//! - [`init`] installs logging and builds the configured serializer in one step.
//!
//! ```rust
//! use rulekit::prelude::*;
//! use rulekit::calendar::{DayOffset, EveryDay, NthOccurrence};
//!
//! # fn main() -> Result<(), CodecError> {
//! let rule = DayOffset {
//!     days: 3,
//!     rule: Box::new(NthOccurrence { occurrence: 28, rule: Box::new(EveryDay {}) }),
//! };
//!
//! let text = rulekit::serialize(&rule, &[])?;
//! let restored: DayOffset = rulekit::deserialize(&text, &[])?;
//! assert!(restored.matches(NaiveDate::from_ymd_opt(2015, 3, 3).unwrap()));
//! # Ok(())
//! # }
//! ```

mod error;

pub use crate::error::{RulekitError, RulekitErrorExt};
pub use rulekit_calendar as calendar;
pub use rulekit_codec as codec;
pub use rulekit_domain as domain;
pub use rulekit_kernel as kernel;
pub use rulekit_logger as logger;

use rulekit_calendar::CALENDAR;
use rulekit_codec::{CodecError, CodecErrorExt, Rule, RuleModule, RuleSerializer, RuleSerializerBuilder, TypeSource};
use rulekit_domain::config::{CodecConfig, RulekitConfig};
use rulekit_logger::Logger;
use std::sync::LazyLock;
use tracing::info;

pub mod prelude {
    pub use crate::RulekitError;
    pub use rulekit_codec::prelude::*;
}

static SHARED: LazyLock<RuleSerializer> = LazyLock::new(|| RuleSerializer::builder(&CALENDAR).build());

/// The process-wide serializer bound to the built-in calendar module.
///
/// Every caller shares one scan cache, so a module scanned by one call stays
/// known to all later calls. Build a private serializer with
/// [`build_serializer`] or [`RuleSerializer::builder`] when that is unwanted.
#[must_use]
pub fn shared() -> &'static RuleSerializer {
    &SHARED
}

/// Encodes a rule with the [`shared`] serializer.
///
/// # Errors
/// See [`RuleSerializer::serialize`].
pub fn serialize(rule: &(dyn Rule + 'static), extra: &[TypeSource]) -> Result<String, CodecError> {
    SHARED.serialize(rule, extra)
}

/// Decodes a rule of type `T` with the [`shared`] serializer.
///
/// # Errors
/// See [`RuleSerializer::deserialize`].
pub fn deserialize<T: Rule>(text: &str, extra: &[TypeSource]) -> Result<T, CodecError> {
    SHARED.deserialize(text, extra)
}

/// Decodes a rule of any known type with the [`shared`] serializer.
///
/// # Errors
/// See [`RuleSerializer::deserialize_dyn`].
pub fn deserialize_dyn(text: &str, extra: &[TypeSource]) -> Result<Box<dyn Rule>, CodecError> {
    SHARED.deserialize_dyn(text, extra)
}

/// Prepares a serializer builder for `core` from codec settings.
///
/// # Errors
/// Returns [`CodecError::InvalidArgumentKind`] or [`CodecError::UnknownType`] if
/// a configured default source cannot be parsed.
pub fn configure(core: &RuleModule, config: &CodecConfig) -> Result<RuleSerializerBuilder, CodecError> {
    let builder = RuleSerializer::builder(core)
        .pretty(config.pretty)
        .default_sources_from_text(&config.default_sources);
    CodecErrorExt::context(builder, "Invalid codec.default_sources")
}

/// Builds a private serializer for `core` from codec settings.
///
/// # Errors
/// See [`configure`].
pub fn build_serializer(core: &RuleModule, config: &CodecConfig) -> Result<RuleSerializer, CodecError> {
    Ok(configure(core, config)?.build())
}

/// A running rulekit host: the configured serializer and the logging handle.
#[must_use = "Dropping the host stops background logging."]
#[derive(Debug)]
pub struct Rulekit {
    serializer: RuleSerializer,
    logger: Logger,
}

impl Rulekit {
    #[must_use]
    pub const fn serializer(&self) -> &RuleSerializer {
        &self.serializer
    }

    #[must_use]
    pub const fn logger(&self) -> &Logger {
        &self.logger
    }
}

/// Installs logging and builds a serializer bound to the calendar module.
///
/// Load `config` with [`kernel::config::load_config`] to layer a file with
/// `RULEKIT__` environment overrides.
///
/// # Errors
/// * [`RulekitError::Logger`] if logging cannot be installed, e.g. a global
///   subscriber already exists.
/// * [`RulekitError::Codec`] if a configured default source is invalid.
pub fn init(config: &RulekitConfig) -> Result<Rulekit, RulekitError> {
    let serializer = build_serializer(&CALENDAR, &config.codec)?;
    let logger = Logger::from_config(&config.logging)?;

    info!(
        core = %serializer.core_module(),
        defaults = serializer.default_sources().len(),
        pretty = config.codec.pretty,
        "Rule serializer initialized"
    );

    Ok(Rulekit { serializer, logger })
}
