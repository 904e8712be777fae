use config::{Config, Environment, File, Map};
use rulekit_domain::constants::{DEFAULT_CONFIG_FILE, ENV_PREFIX, ENV_SEPARATOR};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Custom error type for config loading.
#[rulekit_derive::rulekit_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A layered configuration loader: one file, then environment overrides.
///
/// Environment variables are read from the process unless an explicit map is
/// supplied with [`ConfigLoader::env_source`].
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    path: PathBuf,
    required: bool,
    prefix: Cow<'static, str>,
    env: Option<Map<String, String>>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            required: true,
            prefix: Cow::Borrowed(ENV_PREFIX),
            env: None,
        }
    }
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration file. The extension selects the format; without
    /// one, every supported extension is tried.
    #[must_use]
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    /// Allows the file to be missing, leaving defaults and environment overrides.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Replaces the process environment with an explicit variable map.
    #[must_use]
    pub fn env_source<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Builds the layered configuration and deserializes it into `T`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Config`] if a required file is missing, a source
    /// cannot be parsed, or the merged values do not match `T`.
    pub fn load<T>(self) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
    {
        let builder = Config::builder()
            .add_source(File::from(self.path.as_path()).required(self.required))
            .add_source(
                Environment::with_prefix(&self.prefix)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("codec.default_sources")
                    .source(self.env),
            );

        info!("Loading config from {}", self.path.display());

        let config = builder
            .build()
            .context("Failed to build config")?
            .try_deserialize::<T>()
            .context("Failed to deserialize config")?;

        Ok(config)
    }
}

/// Loads configuration from a file layered with `RULEKIT__` environment overrides.
///
/// 1. **Base File**: `path`, or the `rulekit` file (any supported extension) in
///    the working directory when `None`.
/// 2. **Environment Overrides**: variables prefixed with `RULEKIT__`; nested
///    keys use double underscores (`RULEKIT__CODEC__PRETTY=true` maps to
///    `codec.pretty`). `RULEKIT__CODEC__DEFAULT_SOURCES` takes a comma separated
///    list.
///
/// # Errors
/// This function will return an error if:
/// * The specified (or default) configuration file cannot be found.
/// * The content of the file does not match the structure of type `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let loader = ConfigLoader::new();
    let loader = match path {
        Some(path) => loader.path(path),
        None => loader,
    };
    loader.load()
}
