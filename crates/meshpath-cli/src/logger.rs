//! Log output for the driver.
//!
//! Library crates log through the `log` facade; `tracing-subscriber` picks
//! those records up and writes them to stderr, and also to `--log-file`
//! when one is given.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::CliError;

/// Map the `-v` count to the default level. `RUST_LOG` still overrides it.
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Stderr, teed into `log_file` (opened for append) when given.
pub fn make_writer(log_file: Option<&Path>) -> Result<BoxMakeWriter, CliError> {
    let Some(path) = log_file else {
        return Ok(BoxMakeWriter::new(std::io::stderr));
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(CliError::write(path))?;
    Ok(BoxMakeWriter::new(std::io::stderr.and(Mutex::new(file))))
}

/// Install the global subscriber. Call once, from `main`.
pub fn init(verbose: u8, log_file: Option<&Path>) -> Result<(), CliError> {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbose).into())
        .from_env_lossy();

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_ansi(log_file.is_none())
        .with_writer(make_writer(log_file)?)
        .init();
    Ok(())
}
