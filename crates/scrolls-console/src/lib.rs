//! Terminal rendering for the scrolls logging system.
//!
//! This crate holds the style-aware side of scrolls:
//! - [`ColorBackend`] — the terminal capability (ANSI, native Windows
//!   console, or no-op), selected once at startup
//! - [`StyleTable`] — symbolic color names mapped to backend codes,
//!   with lenient normalized lookup
//! - [`StyleRenderer`] — the `{ref:spec # fg,bg}` template engine with
//!   exact save/restore of color state around styled spans
//! - [`ConsoleHandler`] / [`SinkHandler`] — handlers binding the
//!   renderer to a terminal or a byte sink
//!
//! # Example
//!
//! ```ignore
//! use scrolls_console::{console, install_default_handlers};
//! use scrolls_core::root_logger;
//!
//! install_default_handlers(&root_logger(), &console_arc);
//! scrolls_core::get_logger("svc.worker")?.info("hello", vec![]);
//! ```

#![cfg_attr(not(windows), forbid(unsafe_code))]

mod backend;
mod console;
mod format;
mod handler;
mod sink;
mod styles;

pub use backend::{AnsiBackend, ColorBackend, ColorState, NoOpBackend, detect_backend};
#[cfg(windows)]
pub use backend::WinConsoleBackend;
pub use console::{Console, console, init_console};
pub use format::{
    FieldSource, MAX_SPEC_RECURSION, NoFields, StyleRenderer, format_plain, format_value, indent,
};
pub use handler::{ConsoleHandler, install_default_handlers};
pub use sink::{FileSink, PLAIN_PREFIX, Sink, SinkHandler, StreamSink};
pub use styles::{Color, StyleTable};
