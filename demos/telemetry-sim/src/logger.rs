use std::{
    io::Write,
    str::FromStr,
    sync::atomic::{AtomicBool, Ordering},
};

use embassy_time::Instant;
use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable holding the maximum log level (`error` to `trace`, or `off`).
pub const LOG_LEVEL_ENV: &str = "TELENODE_LOGLEVEL";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::Info;

struct StdoutLogger;

static LOGGER: StdoutLogger = StdoutLogger;
static INITIALIZED: AtomicBool = AtomicBool::new(false);

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let millis = Instant::now().as_millis();
        let mut stdout = std::io::stdout().lock();
        // Nowhere to report a failing stdout.
        let _ = writeln!(
            stdout,
            "{:>6}.{:03} {:<5} [{}] {}",
            millis / 1000,
            millis % 1000,
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// Installs the stdout logger, with the level taken from [`LOG_LEVEL_ENV`].
///
/// Unknown levels fall back to `info`. Later calls have no effect.
pub fn init_logger_from_env() {
    if INITIALIZED.swap(true, Ordering::AcqRel) {
        return;
    }

    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|level| LevelFilter::from_str(level.trim()).ok())
        .unwrap_or(DEFAULT_LEVEL);

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
