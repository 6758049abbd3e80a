//! Core types for the scrolls logging system.
//!
//! This crate provides the logger hierarchy and record-dispatch
//! protocol:
//! - [`Logger`] nodes forming a tree via dot-separated names, one
//!   singleton instance per name owned by the [`Registry`]
//! - [`Record`] values built once per `log()` call, enriched by the
//!   [`RecordExtender`] chain and dispatched to every [`Handler`] on the
//!   ancestor chain
//! - [`Section`] guards tracking nesting depth for indented output
//!
//! Rendering lives in `scrolls-console`; this crate knows nothing about
//! terminals.
//!
//! # Example
//!
//! ```ignore
//! use scrolls_core::{args, get_logger, Level};
//!
//! let logger = get_logger("svc.worker")?;
//! logger.info("start {0}", args!["job-42"]);
//! let _section = logger.section("processing", vec![]);
//! logger.debug("inside, indented one unit", vec![]);
//! ```

#![forbid(unsafe_code)]

mod error;
mod extend;
mod handler;
mod level;
mod logger;
mod record;
pub mod testing;

pub use error::{ScrollsError, ScrollsResult};
pub use extend::{ProcInfoExtender, RecordExtender};
pub use handler::Handler;
pub use level::Level;
pub use logger::{
    Logger, ROOT_NAME, Registry, Section, get_logger, registry, root_logger,
};
pub use record::{Record, Value};
