//! Logger hierarchy, registry, and record dispatch.
//!
//! Loggers form a tree through dot-separated names: the parent of
//! `a.b.c` is `a.b`, single-segment names hang off the root. Exactly one
//! logger exists per name for the life of the process; the registry owns
//! every node (children hold only a weak parent reference) and creates
//! missing ancestors lazily on first lookup.
//!
//! A `log()` call runs two passes over the ancestor chain, child first:
//! an **extension** pass that lets every logger's extenders enrich the
//! record, then a **dispatch** pass that hands the record to every
//! handler registered for its level. Attaching one handler to the root
//! therefore catches everything; children add supplementary handlers,
//! never exclusive ones.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

use crate::error::{ScrollsError, ScrollsResult};
use crate::extend::RecordExtender;
use crate::handler::Handler;
use crate::level::Level;
use crate::record::{Record, Value};

/// Reserved name of the root logger.
pub const ROOT_NAME: &str = "root";

/// A named node in the logger tree.
pub struct Logger {
    name: String,
    parent: Weak<Logger>,
    handlers: Mutex<HashMap<Level, Vec<Arc<dyn Handler>>>>,
    extenders: Mutex<Vec<Arc<dyn RecordExtender>>>,
    nesting: AtomicUsize,
}

impl Logger {
    fn new(name: &str, parent: Weak<Logger>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            handlers: Mutex::new(HashMap::new()),
            extenders: Mutex::new(Vec::new()),
            nesting: AtomicUsize::new(0),
        }
    }

    /// The logger's full dot-separated name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parent logger; `None` only for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Arc<Logger>> {
        self.parent.upgrade()
    }

    /// Current section nesting depth.
    #[must_use]
    pub fn nesting(&self) -> usize {
        self.nesting.load(Ordering::Relaxed)
    }

    /// Register a handler for one level on this logger only.
    ///
    /// Idempotent: re-adding the same handler instance for the same
    /// level is a no-op.
    pub fn add_handler(&self, level: Level, handler: Arc<dyn Handler>) {
        let mut map = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let list = map.entry(level).or_default();
        if !list.iter().any(|h| Arc::ptr_eq(h, &handler)) {
            list.push(handler);
        }
    }

    /// Append an extender; extenders run in registration order.
    pub fn add_extender(&self, extender: Arc<dyn RecordExtender>) {
        self.extenders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(extender);
    }

    /// Build a record and run extension then dispatch over the ancestor
    /// chain. A chain with no handlers for `level` drops the record
    /// silently.
    pub fn log(&self, level: Level, msg: &str, args: Vec<Value>) {
        let mut record = Record::new(level, &self.name, msg, args, self.nesting());

        self.run_extenders(&mut record);
        let mut node = self.parent();
        while let Some(logger) = node {
            logger.run_extenders(&mut record);
            node = logger.parent();
        }

        self.run_handlers(&record);
        let mut node = self.parent();
        while let Some(logger) = node {
            logger.run_handlers(&record);
            node = logger.parent();
        }
    }

    /// Log at DEBUG.
    pub fn debug(&self, msg: &str, args: Vec<Value>) {
        self.log(Level::Debug, msg, args);
    }

    /// Log at INFO.
    pub fn info(&self, msg: &str, args: Vec<Value>) {
        self.log(Level::Info, msg, args);
    }

    /// Log at WARNING.
    pub fn warning(&self, msg: &str, args: Vec<Value>) {
        self.log(Level::Warning, msg, args);
    }

    /// Log at ERROR.
    pub fn error(&self, msg: &str, args: Vec<Value>) {
        self.log(Level::Error, msg, args);
    }

    /// Log `title` at INFO and open a nested section.
    ///
    /// The depth increment is undone when the returned guard drops, on
    /// every exit path. Nesting affects rendering only, never routing.
    pub fn section(&self, title: &str, args: Vec<Value>) -> Section<'_> {
        self.info(title, args);
        self.nesting.fetch_add(1, Ordering::Relaxed);
        Section { logger: self }
    }

    // Handler and extender lists are cloned out of the lock so user
    // callbacks never run under it (a handler is allowed to log).
    fn run_extenders(&self, record: &mut Record) {
        let extenders: Vec<_> = self
            .extenders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for extender in extenders {
            extender.extend_record(record);
        }
    }

    fn run_handlers(&self, record: &Record) {
        let handlers: Vec<_> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&record.level)
            .cloned()
            .unwrap_or_default();
        for handler in handlers {
            handler.process_record(record);
        }
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("nesting", &self.nesting())
            .finish_non_exhaustive()
    }
}

/// Scoped guard opened by [`Logger::section`].
#[must_use = "dropping the guard ends the section; bind it to a variable"]
pub struct Section<'a> {
    logger: &'a Logger,
}

impl Drop for Section<'_> {
    fn drop(&mut self) {
        self.logger.nesting.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Process-wide, name-keyed logger store.
///
/// The registry owns every logger (`create on first lookup, never
/// destroyed`). A global instance backs [`get_logger`]; standalone
/// registries exist for tests that need isolation.
pub struct Registry {
    root: Arc<Logger>,
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
}

impl Registry {
    /// Create a registry with a fresh root logger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Arc::new(Logger::new(ROOT_NAME, Weak::new())),
            loggers: Mutex::new(HashMap::new()),
        }
    }

    /// The root logger.
    #[must_use]
    pub fn root(&self) -> &Arc<Logger> {
        &self.root
    }

    /// Return the singleton logger for `name`, creating it and any
    /// missing ancestors on first access.
    ///
    /// Fails with [`ScrollsError::InvalidName`] if the name is empty,
    /// contains characters outside `[A-Za-z0-9._-]`, or has an empty
    /// dot-segment.
    pub fn get(&self, name: &str) -> ScrollsResult<Arc<Logger>> {
        validate_name(name)?;
        if name == ROOT_NAME {
            return Ok(self.root.clone());
        }
        let mut map = self.loggers.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.get_locked(&mut map, name))
    }

    fn get_locked(&self, map: &mut HashMap<String, Arc<Logger>>, name: &str) -> Arc<Logger> {
        // Ancestor creation may reach the reserved name too (a lookup
        // like "root.child"); it must resolve to the one root, never a
        // shadow entry in the map.
        if name == ROOT_NAME {
            return self.root.clone();
        }
        if let Some(logger) = map.get(name) {
            return logger.clone();
        }
        let parent = match name.rsplit_once('.') {
            Some((ancestor, _)) => self.get_locked(map, ancestor),
            None => self.root.clone(),
        };
        let logger = Arc::new(Logger::new(name, Arc::downgrade(&parent)));
        map.insert(name.to_string(), logger.clone());
        logger
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_name(name: &str) -> ScrollsResult<()> {
    if name.is_empty() {
        return Err(ScrollsError::invalid_name(name, "name is empty"));
    }
    if name.split('.').any(str::is_empty) {
        return Err(ScrollsError::invalid_name(name, "empty dot-segment"));
    }
    if name
        .chars()
        .any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(ScrollsError::invalid_name(
            name,
            "characters outside [A-Za-z0-9._-]",
        ));
    }
    Ok(())
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry backing [`get_logger`].
#[must_use]
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Return the process-wide singleton logger for `name`.
pub fn get_logger(name: &str) -> ScrollsResult<Arc<Logger>> {
    registry().get(name)
}

/// The process-wide root logger.
#[must_use]
pub fn root_logger() -> Arc<Logger> {
    registry().root().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::CaptureHandler;

    #[test]
    fn test_get_returns_identical_instance() {
        let reg = Registry::new();
        let a = reg.get("svc.worker").unwrap();
        let b = reg.get("svc.worker").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        // Identity survives interleaved ancestor lookups too.
        let _ = reg.get("svc").unwrap();
        let c = reg.get("svc.worker").unwrap();
        assert!(Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_ancestors_created_lazily() {
        let reg = Registry::new();
        let leaf = reg.get("a.b.c").unwrap();
        let parent = leaf.parent().unwrap();
        assert_eq!(parent.name(), "a.b");
        let grandparent = parent.parent().unwrap();
        assert_eq!(grandparent.name(), "a");
        let root = grandparent.parent().unwrap();
        assert!(Arc::ptr_eq(&root, reg.root()));
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_ancestor_lookup_matches_created() {
        let reg = Registry::new();
        let leaf = reg.get("a.b.c").unwrap();
        let mid = reg.get("a.b").unwrap();
        assert!(Arc::ptr_eq(&leaf.parent().unwrap(), &mid));
    }

    #[test]
    fn test_root_name_resolves_to_root() {
        let reg = Registry::new();
        let root = reg.get("root").unwrap();
        assert!(Arc::ptr_eq(&root, reg.root()));
    }

    #[test]
    fn test_ancestor_creation_through_root_name() {
        let reg = Registry::new();
        // Creating descendants of the reserved name must hang them off
        // the one root, not a second logger named "root".
        let child = reg.get("root.child").unwrap();
        let parent = child.parent().unwrap();
        assert!(Arc::ptr_eq(&parent, reg.root()));
        // The root stays a singleton afterwards too.
        let root = reg.get("root").unwrap();
        assert!(Arc::ptr_eq(&root, reg.root()));

        let capture = Arc::new(CaptureHandler::new());
        reg.root().add_handler(Level::Info, capture.clone());
        child.info("up", vec![]);
        assert_eq!(capture.len(), 1);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let reg = Registry::new();
        for bad in ["", "a..b", ".a", "a.", "a b", "svc/worker", "svc!"] {
            assert!(
                matches!(reg.get(bad), Err(ScrollsError::InvalidName { .. })),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_valid_name_characters() {
        let reg = Registry::new();
        assert!(reg.get("svc-1.worker_2.Q3").is_ok());
    }

    #[test]
    fn test_root_handler_sees_descendant_records_in_order() {
        let reg = Registry::new();
        let capture = Arc::new(CaptureHandler::new());
        reg.root().add_handler(Level::Info, capture.clone());

        reg.get("a").unwrap().info("one", vec![]);
        reg.get("a.b").unwrap().info("two", vec![]);
        reg.get("a.b.c").unwrap().info("three", vec![]);

        let msgs: Vec<String> = capture.records().iter().map(|r| r.msg.clone()).collect();
        assert_eq!(msgs, ["one", "two", "three"]);
        let names: Vec<String> = capture.records().iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, ["a", "a.b", "a.b.c"]);
    }

    #[test]
    fn test_level_isolation() {
        let reg = Registry::new();
        let errors = Arc::new(CaptureHandler::new());
        reg.root().add_handler(Level::Error, errors.clone());

        let logger = reg.get("svc").unwrap();
        logger.debug("d", vec![]);
        logger.info("i", vec![]);
        logger.warning("w", vec![]);
        logger.error("e", vec![]);

        let records = errors.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::Error);
        assert_eq!(records[0].msg, "e");
    }

    #[test]
    fn test_child_handlers_are_supplementary() {
        let reg = Registry::new();
        let at_root = Arc::new(CaptureHandler::new());
        let at_child = Arc::new(CaptureHandler::new());
        reg.root().add_handler(Level::Info, at_root.clone());
        let child = reg.get("svc").unwrap();
        child.add_handler(Level::Info, at_child.clone());

        child.info("hello", vec![]);

        assert_eq!(at_child.len(), 1);
        assert_eq!(at_root.len(), 1);
    }

    #[test]
    fn test_add_handler_is_idempotent() {
        let reg = Registry::new();
        let capture = Arc::new(CaptureHandler::new());
        let logger = reg.get("svc").unwrap();
        let as_dyn: Arc<dyn Handler> = capture.clone();
        logger.add_handler(Level::Info, as_dyn.clone());
        logger.add_handler(Level::Info, as_dyn.clone());
        // Same handler at a different level is a distinct registration.
        logger.add_handler(Level::Error, as_dyn);

        logger.info("once", vec![]);
        assert_eq!(capture.len(), 1);
        logger.error("err", vec![]);
        assert_eq!(capture.len(), 2);
    }

    #[test]
    fn test_unconfigured_logger_drops_silently() {
        let reg = Registry::new();
        reg.get("quiet.corner").unwrap().info("nobody", vec![]);
    }

    #[test]
    fn test_extenders_run_child_first_parent_overwrites() {
        struct Tag(&'static str);
        impl RecordExtender for Tag {
            fn extend_record(&self, record: &mut Record) {
                record.set("tag", self.0);
            }
        }

        let reg = Registry::new();
        let capture = Arc::new(CaptureHandler::new());
        reg.root().add_handler(Level::Info, capture.clone());
        reg.root().add_extender(Arc::new(Tag("root")));
        let child = reg.get("svc").unwrap();
        child.add_extender(Arc::new(Tag("child")));

        child.info("m", vec![]);

        // Child extenders run first, so the root's later write wins.
        let records = capture.records();
        assert_eq!(records[0].get("tag"), Some(&Value::Str("root".into())));
    }

    #[test]
    fn test_section_round_trip() {
        let reg = Registry::new();
        let logger = reg.get("svc").unwrap();
        assert_eq!(logger.nesting(), 0);
        {
            let _outer = logger.section("outer", vec![]);
            assert_eq!(logger.nesting(), 1);
            {
                let _inner = logger.section("inner", vec![]);
                assert_eq!(logger.nesting(), 2);
            }
            assert_eq!(logger.nesting(), 1);
        }
        assert_eq!(logger.nesting(), 0);
    }

    #[test]
    fn test_section_unwinds_on_panic() {
        let reg = Registry::new();
        let logger = reg.get("svc").unwrap();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = logger.section("doomed", vec![]);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(logger.nesting(), 0);
    }

    #[test]
    fn test_record_nesting_captured_at_log_time() {
        let reg = Registry::new();
        let capture = Arc::new(CaptureHandler::new());
        reg.root().add_handler(Level::Info, capture.clone());
        let logger = reg.get("svc").unwrap();

        let _outer = logger.section("outer", vec![]);
        let _inner = logger.section("inner", vec![]);
        logger.info("deep", vec![]);

        let records = capture.records();
        // "outer" logged at depth 0, "inner" at 1, "deep" at 2.
        assert_eq!(records[0].nesting, 0);
        assert_eq!(records[1].nesting, 1);
        assert_eq!(records[2].nesting, 2);
    }

    #[test]
    fn test_global_registry_identity() {
        let a = get_logger("global.identity.check").unwrap();
        let b = get_logger("global.identity.check").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(root_logger().parent().is_none());
    }
}
