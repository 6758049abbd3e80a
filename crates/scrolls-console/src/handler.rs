//! Terminal handler: records to styled console lines.

use std::sync::Arc;

use scrolls_core::{Handler, Level, Logger, Record};

use crate::console::Console;
use crate::format::{format_plain, indent};

/// Writes records to a [`Console`] with a styled, timestamp-bracket
/// prefix, nesting indentation, and `| `-joined continuation lines for
/// multi-line messages.
pub struct ConsoleHandler {
    console: Arc<Console>,
    prefix: String,
}

impl ConsoleHandler {
    /// Handler with the default (INFO-styled) prefix.
    #[must_use]
    pub fn new(console: Arc<Console>) -> Self {
        Self::for_level(console, Level::Info)
    }

    /// Handler with the conventional prefix colors for one level.
    #[must_use]
    pub fn for_level(console: Arc<Console>, level: Level) -> Self {
        Self::with_prefix(console, level_prefix(level))
    }

    /// Handler with a custom prefix template.
    ///
    /// The prefix resolves named fields against the record (`time`,
    /// `name`, `level`, extender-added keys) and may use styled spans.
    #[must_use]
    pub fn with_prefix(console: Arc<Console>, prefix: impl Into<String>) -> Self {
        Self {
            console,
            prefix: prefix.into(),
        }
    }
}

impl Handler for ConsoleHandler {
    fn process_record(&self, record: &Record) {
        let message = continuation_lines(&record.msg);

        // One lock for the whole prefix + indent + message sequence so
        // concurrent records never interleave on the terminal.
        self.console.with_renderer(|r| {
            // Dry-run plainly first: a malformed template or argument
            // mismatch degrades to the fallback line instead of losing
            // the record or crashing the caller.
            if format_plain(&self.prefix, &record.args, record).is_ok() {
                let _ = r.render(&self.prefix, &record.args, record);
            } else {
                r.write_plain(&format!("[{} {}] ", record.name, record.level));
            }

            r.write_plain(&indent(record.nesting));

            if format_plain(&message, &record.args, record).is_ok() {
                let _ = r.render(&message, &record.args, record);
            } else {
                r.write_plain(&fallback_line(record));
            }
            r.write_plain("\n");
        });
    }
}

/// Attach one [`ConsoleHandler`] per level to `logger`, with the
/// conventional level colors. Attaching to the root catches records from
/// every descendant.
pub fn install_default_handlers(logger: &Logger, console: &Arc<Console>) {
    for level in Level::ALL {
        logger.add_handler(level, Arc::new(ConsoleHandler::for_level(console.clone(), level)));
    }
}

// Level color conventions: INFO white, WARNING yellow, ERROR white on
// red, DEBUG grey.
fn level_prefix(level: Level) -> String {
    let style = match level {
        Level::Debug => "grey",
        Level::Info => "white",
        Level::Warning => "yellow",
        Level::Error => "white,red",
    };
    format!(
        "{{'[' # grey}}{{time:[hour]:[minute]:[second] # grey}} \
         {{name # intense-white}} {{level # {style}}}{{']' # grey}} "
    )
}

fn continuation_lines(msg: &str) -> String {
    msg.trim().lines().collect::<Vec<_>>().join("\n        | ")
}

fn fallback_line(record: &Record) -> String {
    format!("{} [unformatted args: {:?}]", record.msg, record.args)
}
