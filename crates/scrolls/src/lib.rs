//! Hierarchical structured logging with a style-aware terminal renderer.
//!
//! scrolls gives an application a tree of named loggers with per-level
//! handlers and record-enrichment middleware, plus a terminal renderer
//! that embeds color directives directly inside format strings:
//!
//! ```ignore
//! use scrolls::prelude::*;
//!
//! install_default_handlers(&root_logger(), &std::sync::Arc::new(Console::detect()));
//!
//! let logger = get_logger("svc.worker")?;
//! logger.info("start {0}", args!["job-42"]);
//! {
//!     let _section = logger.section("processing", vec![]);
//!     logger.debug("indented one unit", vec![]);
//! }
//! ```
//!
//! Records propagate from the logging logger up to the root, so one
//! handler attached to the root catches everything; children add
//! supplementary handlers. Styled output uses fields like
//! `{'ready' # green}` or `{level:7 # white,red}`, resolved through a
//! per-backend color table with lenient lookup.
//!
//! The crates split the two subsystems: `scrolls-core` is the logger
//! hierarchy and dispatch protocol, `scrolls-console` the renderer and
//! terminal backends. This crate re-exports both and adds the [`log`]
//! facade bridge ([`LogBridge`]).

#![forbid(unsafe_code)]

mod bridge;

pub use bridge::LogBridge;

pub use scrolls_core::{
    Handler, Level, Logger, ProcInfoExtender, ROOT_NAME, Record, RecordExtender, Registry,
    ScrollsError, ScrollsResult, Section, Value, args, get_logger, registry, root_logger,
};

pub use scrolls_console::{
    AnsiBackend, Color, ColorBackend, ColorState, Console, ConsoleHandler, FieldSource, FileSink,
    NoFields, NoOpBackend, Sink, SinkHandler, StreamSink, StyleRenderer, StyleTable, console,
    detect_backend, format_plain, init_console, install_default_handlers,
};

/// The common imports.
pub mod prelude {
    pub use scrolls_core::{
        Handler, Level, Logger, Record, RecordExtender, ScrollsError, ScrollsResult, Value,
        get_logger, root_logger,
    };

    pub use scrolls_console::{
        Console, ConsoleHandler, SinkHandler, console, install_default_handlers,
    };
}
