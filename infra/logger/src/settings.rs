//! Conversions from the serde configuration models to tracing types.

use rulekit_domain::config::{LogLevel, LogRotation, LoggingConfig};
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;

use crate::error::LoggerError;
use crate::{Logger, LoggerBuilder, Named};

pub(crate) const fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

pub(crate) const fn rotation(rotation: LogRotation) -> Rotation {
    match rotation {
        LogRotation::Minutely => Rotation::MINUTELY,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Never => Rotation::NEVER,
    }
}

impl Logger {
    /// Initializes the global subscriber from a [`LoggingConfig`].
    ///
    /// # Errors
    /// See [`LoggerBuilder::init`].
    pub fn from_config(config: &LoggingConfig) -> Result<Self, LoggerError> {
        let builder = configured(config);

        match &config.file {
            Some(file) => {
                let builder = builder
                    .path(&file.directory)
                    .rotation(rotation(file.rotation))
                    .max_files(file.max_files);
                if file.json { builder.json().init() } else { builder.init() }
            },
            None => builder.init(),
        }
    }
}

fn configured(config: &LoggingConfig) -> LoggerBuilder<Named> {
    let builder = Logger::builder()
        .name(config.name.as_str())
        .console(config.console)
        .level(level_filter(config.level));

    match &config.filter {
        Some(filter) => builder.env_filter(filter.as_str()),
        None => builder,
    }
}
