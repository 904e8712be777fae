//! What the subscriber writes to, and how the layers for it are assembled.

use std::fs;
use std::path::PathBuf;

use rulekit_domain::constants::DEFAULT_MAX_LOG_FILES;
use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::{LoggerError, LoggerErrorExt};

const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Rolling file output below `directory`.
#[derive(Debug)]
pub(crate) struct FileOutput {
    pub(crate) directory: PathBuf,
    pub(crate) rotation: Rotation,
    pub(crate) max_files: usize,
    pub(crate) json: bool,
}

impl FileOutput {
    pub(crate) const fn new(directory: PathBuf) -> Self {
        Self { directory, rotation: Rotation::DAILY, max_files: DEFAULT_MAX_LOG_FILES, json: false }
    }
}

/// Everything the builder collected before the subscriber is installed.
#[derive(Debug)]
pub(crate) struct OutputPlan {
    pub(crate) name: String,
    pub(crate) console: bool,
    pub(crate) level: LevelFilter,
    pub(crate) filter: Option<String>,
    pub(crate) file: Option<FileOutput>,
}

impl Default for OutputPlan {
    fn default() -> Self {
        Self { name: String::new(), console: true, level: LevelFilter::INFO, filter: None, file: None }
    }
}

impl OutputPlan {
    /// Installs the global subscriber. The guard is present iff file output is on.
    pub(crate) fn install(self) -> Result<Option<WorkerGuard>, LoggerError> {
        self.check()?;
        let filter = self.env_filter()?;

        let mut layers = Vec::new();
        if self.console {
            layers.push(console_layer());
        }

        let guard = match &self.file {
            Some(file) => {
                let (file_layer, guard) = file_layer(&self.name, file)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(filter).with(layers).try_init()?;
        Ok(guard)
    }

    pub(crate) fn check(&self) -> Result<(), LoggerError> {
        let problem = if self.name.trim().is_empty() {
            Some("Logger name cannot be empty")
        } else if self.file.as_ref().is_some_and(|file| file.max_files == 0) {
            Some("max_files must be greater than zero")
        } else if !self.console && self.file.is_none() {
            Some("No logging layers enabled. Enable console or file output.")
        } else {
            None
        };

        problem.map_or(Ok(()), |message| {
            Err(LoggerError::InvalidConfiguration { message: message.into(), context: None })
        })
    }

    /// `RUST_LOG` applies unless an explicit filter was given.
    pub(crate) fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        let Some(filter) = &self.filter else {
            return Ok(builder.from_env_lossy());
        };

        builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
            message: format!("Invalid env filter '{filter}': {e}").into(),
            context: None,
        })
    }
}

fn console_layer<S>() -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    layer().compact().with_ansi(true).boxed()
}

fn file_layer<S>(name: &str, file: &FileOutput) -> Result<(BoxedLayer<S>, WorkerGuard), LoggerError>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fs::create_dir_all(&file.directory)
        .context(format!("Failed to create path: {}", file.directory.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(file.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(file.max_files)
        .build(&file.directory)?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let plain = layer().with_writer(writer).with_ansi(false);
    let boxed = if file.json { plain.json().boxed() } else { plain.boxed() };

    Ok((boxed, guard))
}
