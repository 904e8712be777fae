//! # Logger
//!
//! Installs the global `tracing` subscriber for applications embedding the rule
//! codec. Library crates only emit events; hosts call [`Logger::from_config`] or
//! the [`Logger::builder`] once at startup.
//!
//! Console output is compact and colored. Rolling file output runs on a
//! non-blocking worker, so keep the returned [`Logger`] alive until shutdown.
//! Module-directed filters (e.g., `"rulekit_codec=trace,info"`) go through
//! [`LoggerBuilder::env_filter`]; without one, `RUST_LOG` is honored.
//!
//! ## Example
//!
//! ```rust
//! # use rulekit_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("rules-host")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;
mod output;
mod settings;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::marker::PhantomData;
use std::path::PathBuf;

use stage::Stage;
use tracing_appender::non_blocking::WorkerGuard;

use crate::output::{FileOutput, OutputPlan};

/// Builder stage before [`LoggerBuilder::name`] is called.
#[derive(Debug)]
pub struct Unnamed;
/// Builder stage with a name and console-only output.
#[derive(Debug)]
pub struct Named;
/// Builder stage with rolling file output configured.
#[derive(Debug)]
pub struct WithFile;

mod stage {
    pub trait Stage {}
    pub trait HasName: Stage {}
}
impl Stage for Unnamed {}
impl Stage for Named {}
impl Stage for WithFile {}
impl stage::HasName for Named {}
impl stage::HasName for WithFile {}

/// Configures and installs the global tracing subscriber.
///
/// The name comes first because it prefixes log files. File options only
/// exist after [`LoggerBuilder::path`].
#[derive(Debug)]
pub struct LoggerBuilder<S: Stage = Unnamed> {
    plan: OutputPlan,
    stage: PhantomData<S>,
}

impl<S: Stage> LoggerBuilder<S> {
    fn advance<T: Stage>(self) -> LoggerBuilder<T> {
        LoggerBuilder { plan: self.plan, stage: PhantomData }
    }
}

impl LoggerBuilder<Unnamed> {
    pub fn name(mut self, name: impl Into<String>) -> LoggerBuilder<Named> {
        self.plan.name = name.into();
        self.advance()
    }
}

impl LoggerBuilder<Named> {
    /// Enables rolling file output into `path`.
    pub fn path(mut self, path: impl Into<PathBuf>) -> LoggerBuilder<WithFile> {
        self.plan.file = Some(FileOutput::new(path.into()));
        self.advance()
    }
}

impl LoggerBuilder<WithFile> {
    fn file(&mut self) -> Option<&mut FileOutput> {
        self.plan.file.as_mut()
    }

    /// Maximum number of rotated files to keep.
    #[must_use = "The builder must be configured before it can initialize the logger."]
    pub fn max_files(mut self, max: usize) -> Self {
        if let Some(file) = self.file() {
            file.max_files = max;
        }
        self
    }

    #[must_use = "The builder must be configured before it can initialize the logger."]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        if let Some(file) = self.file() {
            file.rotation = rotation;
        }
        self
    }

    /// Writes file output as JSON lines.
    #[must_use = "The builder must be configured before it can initialize the logger."]
    pub fn json(mut self) -> Self {
        if let Some(file) = self.file() {
            file.json = true;
        }
        self
    }
}

impl<S: stage::HasName> LoggerBuilder<S> {
    /// Default minimum level, applied when neither `RUST_LOG` nor an explicit
    /// filter names a target.
    #[must_use = "The builder must be configured before it can initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.plan.level = level;
        self
    }

    /// Invalid filters cause [`LoggerBuilder::init`] to return an error.
    #[must_use = "The builder must be configured before it can initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.plan.filter = Some(filter.into());
        self
    }

    #[must_use = "The builder must be configured before it can initialize the logger."]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.plan.console = enabled;
        self
    }

    /// Consumes the builder and installs the global subscriber.
    ///
    /// The returned [`Logger`] owns the file writer's [`WorkerGuard`].
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, a zero file
    ///   budget, no enabled output, or an unparsable filter.
    /// * [`LoggerError::Io`] or [`LoggerError::Appender`] if file output cannot be prepared.
    /// * [`LoggerError::Subscriber`] if a global subscriber has already been set.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let guard = self.plan.install()?;
        Ok(Logger { guard })
    }
}

/// Handle to the installed logging system.
///
/// Dropping it stops the file worker after flushing buffered lines.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`].
    ///
    /// ```rust
    /// use rulekit_logger::{LevelFilter, Logger};
    ///
    /// let _logger = Logger::builder()
    ///     .name("rules-host")
    ///     .level(LevelFilter::DEBUG)
    ///     .init()
    ///     .unwrap();
    /// ```
    #[must_use = "The builder must be configured before it can initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { plan: OutputPlan::default(), stage: PhantomData }
    }

    /// The file writer's guard, present iff file output is enabled.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Flushing file log output before shutdown");
        }
    }
}
