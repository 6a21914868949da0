//! Console plus log file output, one format for both.

use log::warn;
use simplelog::*;
use std::{
    fs::{File, OpenOptions},
    io,
    path::Path,
};

pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Opens the log file, appending unless `truncate` is set.
pub fn open_log_file(path: &Path, truncate: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    if truncate {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }
    options.open(path)
}

fn config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build()
}

/// Installs the process logger: stdout and `log_file` at `level`.
///
/// Falls back to stdout alone when the file cannot be opened.
pub fn init(level: LevelFilter, log_file: &Path, truncate: bool) {
    let config = config();

    match open_log_file(log_file, truncate) {
        Ok(file) => {
            CombinedLogger::init(vec![
                TermLogger::new(level, config.clone(), TerminalMode::Stdout, ColorChoice::Auto),
                WriteLogger::new(level, config, file),
            ])
            .ok(); // ignore logging failure
        }
        Err(e) => {
            TermLogger::init(level, config, TerminalMode::Stdout, ColorChoice::Auto).ok();
            warn!("Cannot open log file {}: {}", log_file.display(), e);
        }
    }
}
