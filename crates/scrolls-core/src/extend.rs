//! Record enrichment.
//!
//! Extenders run once per record, in registration order, the logging
//! logger's extenders before its ancestors'. They mutate the record's
//! extension map in place and must be safe to run multiple times across
//! the chain: later writes to the same key overwrite, nothing is removed.

use crate::record::Record;

/// Enriches a record with additional fields before dispatch.
pub trait RecordExtender: Send + Sync {
    /// Mutate the record in place.
    fn extend_record(&self, record: &mut Record);
}

/// Adds `pid` and `tid` fields to every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcInfoExtender;

impl RecordExtender for ProcInfoExtender {
    fn extend_record(&self, record: &mut Record) {
        record.set("pid", i64::from(std::process::id()));
        // Stable Rust exposes no numeric thread id; the Debug form is
        // unique per live thread.
        record.set("tid", format!("{:?}", std::thread::current().id()));
    }
}
