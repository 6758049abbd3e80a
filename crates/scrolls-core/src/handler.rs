//! The handler boundary.
//!
//! A handler consumes a fully built record and turns it into output,
//! typically through a renderer bound to a sink. Handlers are
//! side-effecting only and must not panic on a well-formed record; an
//! unconfigured logger (no handlers anywhere on its chain) silently
//! drops records, which is a valid quiet state rather than an error.

use crate::record::Record;

/// Consumes records produced by logger dispatch.
pub trait Handler: Send + Sync {
    /// Process one record. Side-effecting only; no return value.
    fn process_record(&self, record: &Record);
}
