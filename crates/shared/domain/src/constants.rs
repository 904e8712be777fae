/// Configuration file looked up when no explicit path is given (any supported extension).
pub const DEFAULT_CONFIG_FILE: &str = "rulekit";

/// Prefix of environment variables overriding configuration values.
pub const ENV_PREFIX: &str = "RULEKIT";

/// Separator between nested keys in environment variable names.
pub const ENV_SEPARATOR: &str = "__";

pub const DEFAULT_LOG_NAME: &str = "rulekit";
pub const DEFAULT_MAX_LOG_FILES: usize = 10;
