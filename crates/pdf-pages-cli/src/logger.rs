use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};

/// Writes log records to stderr with a local timestamp
pub struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    /// `verbosity` counts `-v` flags: none shows info, one debug, more trace.
    pub fn new(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        Self { level }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now().format("%H:%M:%S");
        if record.level() <= Level::Info {
            eprintln!("[{}] {:<5} {}", timestamp, record.level(), record.args());
        } else {
            eprintln!(
                "[{}] {:<5} {}: {}",
                timestamp,
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}
