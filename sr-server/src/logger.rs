//! Global logger setup built on fern.
//!
//! One line format everywhere; the only choices are where output goes
//! (stdout or an append-only file) and whether levels are colored.
//! Files never get color codes.

use crate::error::{Result as ServerErrorResult, ServerError};

use std::fmt::Arguments;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{Record, info};

/// Install the process-wide logger. Fails if one is already installed.
pub fn initialize(
    level: sr_config::LogLevel,
    log_file: Option<PathBuf>,
    colored: bool,
) -> ServerErrorResult<()> {
    let dispatch = Dispatch::new().level(level.0);

    let dispatch = match &log_file {
        Some(path) => dispatch.format(plain_format).chain(open_log_file(path)?),
        None if colored => {
            let colors = ColoredLevelConfig::new()
                .trace(Color::Magenta)
                .debug(Color::Blue)
                .info(Color::Green)
                .warn(Color::Yellow)
                .error(Color::Red);

            dispatch
                .format(move |out, message, record| {
                    out.finish(format_args!(
                        "[{} - {}] {} [{}:{}]",
                        humantime::format_rfc3339(SystemTime::now()),
                        colors.color(record.level()),
                        message,
                        record.file().unwrap_or("unknown"),
                        record.line().unwrap_or(0),
                    ))
                })
                .chain(std::io::stdout())
        }
        None => dispatch.format(plain_format).chain(std::io::stdout()),
    };

    dispatch.apply().map_err(|e| ServerError::Logger {
        message: format!("Failed to install logger: {e}"),
    })?;

    match &log_file {
        Some(path) => info!("Logging at {:?} to {}", level.0, path.display()),
        None => info!("Logging at {:?} to stdout", level.0),
    }

    Ok(())
}

fn plain_format(out: FormatCallback<'_>, message: &Arguments<'_>, record: &Record<'_>) {
    out.finish(format_args!(
        "[{} - {}] {} [{}:{}]",
        humantime::format_rfc3339(SystemTime::now()),
        record.level(),
        message,
        record.file().unwrap_or("unknown"),
        record.line().unwrap_or(0),
    ))
}

fn open_log_file(path: &Path) -> ServerErrorResult<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ServerError::Logger {
            message: format!("Cannot open log file {}: {e}", path.display()),
        })
}
