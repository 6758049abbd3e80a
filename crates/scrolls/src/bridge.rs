//! `log` facade bridge.
//!
//! Installs a [`log::Log`] implementation that forwards facade records
//! into the scrolls hierarchy, so libraries using the `log` macros show
//! up alongside native scrolls output. Targets map onto logger names
//! (`my_crate::module` becomes `my_crate.module`).

use log::{Log, Metadata, Record as FacadeRecord, SetLoggerError};
use scrolls_core::{Level, ROOT_NAME, get_logger, root_logger};

/// Routes `log` crate records into the scrolls logger tree.
pub struct LogBridge;

impl LogBridge {
    /// Install as the global `log` logger.
    ///
    /// Fails if another logger was already set.
    pub fn init() -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(LogBridge))?;
        log::set_max_level(log::LevelFilter::Trace);
        Ok(())
    }

    /// Install, ignoring an already-set logger.
    pub fn try_init() {
        let _ = Self::init();
    }
}

impl Log for LogBridge {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        // Filtering is a handler concern in scrolls; accept everything.
        true
    }

    fn log(&self, record: &FacadeRecord) {
        let level = match record.level() {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warning,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        };
        let logger = get_logger(&bridge_name(record.target())).unwrap_or_else(|_| root_logger());
        // The facade message is final text, not a scrolls template;
        // escape braces so the renderer passes it through verbatim.
        let msg = record.args().to_string().replace('{', "{{").replace('}', "}}");
        logger.log(level, &msg, vec![]);
    }

    fn flush(&self) {}
}

/// Map a `log` target onto a valid logger name.
fn bridge_name(target: &str) -> String {
    let cleaned: String = target
        .replace("::", ".")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let joined = cleaned
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".");
    if joined.is_empty() {
        ROOT_NAME.to_string()
    } else {
        joined
    }
}
