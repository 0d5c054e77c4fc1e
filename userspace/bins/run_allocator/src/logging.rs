use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// A logger that writes every record as a single line to stderr so that stdout only carries harness output.
#[derive(Debug)]
pub struct HarnessLogger {
    pub initial_log_level: Level,
}

impl HarnessLogger {
    pub const fn new(initial_log_level: Level) -> HarnessLogger {
        HarnessLogger { initial_log_level }
    }

    pub fn install(&'static self) -> Result<(), SetLoggerError> {
        log::set_logger(self).map(|_| log::set_max_level(self.initial_log_level.to_level_filter()))
    }

    /// Change the maximum log level once the configuration is known.
    pub fn update_log_level(&'static self, level: LevelFilter) {
        log::set_max_level(level);
    }
}

impl Log for HarnessLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            writeln!(
                std::io::stderr().lock(),
                "{} - {}: {}",
                record.level(),
                record.target(),
                record.args(),
            )
            .expect("Could not write log message to stderr")
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
