//! Byte sinks and the plain-text sink handler.
//!
//! A sink is the trivial end of the handler boundary: it takes fully
//! formatted text and writes it somewhere. Rotation, email, and syslog
//! delivery implement the same contract elsewhere; only the plain
//! stream and append-to-file variants live here.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use scrolls_core::{Handler, Record};

use crate::format::{format_plain, indent};

/// Destination for formatted log text.
pub trait Sink: Send {
    /// Write already-formatted text. Failures are swallowed.
    fn write_text(&mut self, text: &str);

    /// Flush buffered output.
    fn flush(&mut self);
}

/// Sink over any writer.
pub struct StreamSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> StreamSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> Sink for StreamSink<W> {
    fn write_text(&mut self, text: &str) {
        let _ = self.writer.write_all(text.as_bytes());
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

/// Append-only file sink.
pub struct FileSink {
    file: File,
}

impl FileSink {
    /// Open (creating if needed) a log file for appending.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file })
    }
}

impl Sink for FileSink {
    fn write_text(&mut self, text: &str) {
        let _ = self.file.write_all(text.as_bytes());
    }

    fn flush(&mut self) {
        let _ = self.file.flush();
    }
}

/// Formats records plainly (no color) and writes them to a sink.
///
/// The format + write sequence holds the sink lock so concurrent
/// records never interleave bytes.
pub struct SinkHandler {
    sink: Mutex<Box<dyn Sink>>,
    prefix: String,
}

/// Default uncolored prefix for sink output.
pub const PLAIN_PREFIX: &str = "[{time:[hour]:[minute]:[second]} {name} {level}] ";

impl SinkHandler {
    /// Handler with the default plain prefix.
    #[must_use]
    pub fn new(sink: Box<dyn Sink>) -> Self {
        Self::with_prefix(sink, PLAIN_PREFIX)
    }

    /// Handler with a custom prefix template.
    #[must_use]
    pub fn with_prefix(sink: Box<dyn Sink>, prefix: impl Into<String>) -> Self {
        Self {
            sink: Mutex::new(sink),
            prefix: prefix.into(),
        }
    }
}

impl Handler for SinkHandler {
    fn process_record(&self, record: &Record) {
        let mut line = format_plain(&self.prefix, &record.args, record)
            .unwrap_or_else(|_| format!("[{} {}] ", record.name, record.level));
        line.push_str(&indent(record.nesting));
        match format_plain(&record.msg, &record.args, record) {
            Ok(text) => line.push_str(&text),
            Err(_) => {
                line.push_str(&record.msg);
                line.push_str(&format!(" [unformatted args: {:?}]", record.args));
            }
        }
        line.push('\n');

        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        sink.write_text(&line);
        sink.flush();
    }
}
