//! Logger for synthesis runs. Every record goes to stderr, and to a log file
//! when one is given. Each run gets an id so a log can be matched with the
//! placements it produced.

use anyhow::{Context, Result};
use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

pub struct SynthLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl SynthLogger {
    /// Installs the logger and returns the id of this run
    pub fn init(level: LevelFilter, log_file: Option<&Path>) -> Result<String> {
        let file = match log_file {
            Some(path) => Some(Mutex::new(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file: {}", path.display()))?,
            )),
            None => None,
        };

        log::set_boxed_logger(Box::new(Self { level, file }))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        let run_id = new_run_id();
        log::info!("synthesis run {}", run_id);
        Ok(run_id)
    }
}

/// `{timestamp}_{short uuid}`
pub fn new_run_id() -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let uuid_string = Uuid::new_v4().to_string();
    let uuid = uuid_string.split('-').next().unwrap_or("unknown");
    format!("{timestamp}_{uuid}")
}

impl Log for SynthLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let message = format!("{} {} [{}] {}", timestamp, record.level(), record.target(), record.args());

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{}", message);
            }
        }
        eprintln!("{}", message);
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// Maps `-v` repetitions to a level: warnings by default, then info, debug
/// and trace
pub fn level_from_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
