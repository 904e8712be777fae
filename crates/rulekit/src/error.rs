use std::borrow::Cow;

use rulekit_codec::CodecError;
use rulekit_kernel::config::ConfigError;
use rulekit_logger::LoggerError;

/// Errors raised while bringing up a rulekit host.
#[rulekit_derive::rulekit_error]
pub enum RulekitError {
    #[error("Codec setup failed{}: {source}", format_context(.context))]
    Codec { source: CodecError, context: Option<Cow<'static, str>> },

    #[error("Configuration failed{}: {source}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    #[error("Logging setup failed{}: {source}", format_context(.context))]
    Logger { source: LoggerError, context: Option<Cow<'static, str>> },
}
