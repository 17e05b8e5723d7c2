use std::io::Write;
use std::sync::Mutex;

use log::{debug, LevelFilter};

use crate::error::{TelemetryError, TelemetryResult};

enum LoggingStatus {
    Uninitialized,
    Initialized,
    Failed,
}

static LOGGING_STATUS: Mutex<LoggingStatus> = Mutex::new(LoggingStatus::Uninitialized);

#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Overrides the `RUST_LOG` filter when set.
    pub filter: Option<String>,
    /// Number of `-v` flags; each one raises the default level by one step.
    pub verbosity: u8,
}

/// Installs the process-wide logger. Fails if a logger is already installed.
pub fn init_logging(options: &LoggingOptions) -> TelemetryResult<()> {
    let mut status = LOGGING_STATUS
        .lock()
        .map_err(|e| TelemetryError::internal(e.to_string()))?;

    match *status {
        LoggingStatus::Uninitialized => match build_logger(options) {
            Ok(logger) => {
                let max_level = logger.filter();
                if let Err(e) = log::set_boxed_logger(Box::new(logger)) {
                    *status = LoggingStatus::Failed;
                    return Err(TelemetryError::internal(e.to_string()));
                }
                log::set_max_level(max_level);
                *status = LoggingStatus::Initialized;
                debug!("logging initialized at level {max_level}");
                Ok(())
            }
            Err(e) => {
                *status = LoggingStatus::Failed;
                Err(e)
            }
        },
        LoggingStatus::Initialized => Err(TelemetryError::internal("logging already initialized")),
        LoggingStatus::Failed => Err(TelemetryError::internal(
            "logging failed to initialize previously",
        )),
    }
}

fn build_logger(options: &LoggingOptions) -> TelemetryResult<env_logger::Logger> {
    let default_level = level_for_verbosity(options.verbosity);
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_level.as_str().to_lowercase()),
    );
    if let Some(filter) = &options.filter {
        if filter.trim().is_empty() {
            return Err(TelemetryError::invalid("empty log filter"));
        }
        builder.parse_filters(filter);
    }
    let logger = builder
        .format(move |buf, record| {
            let level = record.level();
            let target = record.target();
            let style = buf.default_level_style(level);
            let timestamp = buf.timestamp();
            let args = record.args();
            writeln!(buf, "[{timestamp} {style}{level}{style:#} {target}] {args}")
        })
        .build();
    Ok(logger)
}

fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
