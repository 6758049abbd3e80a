//! Log levels.
//!
//! The level set is fixed: `DEBUG`, `INFO`, `WARNING`, `ERROR`. The typed
//! API makes an out-of-set level unrepresentable; [`Level::parse`] is the
//! boundary where an invalid level string is rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::{ScrollsError, ScrollsResult};

/// Severity of a log record, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    /// Diagnostic detail, normally invisible.
    Debug,
    /// Ordinary progress events.
    Info,
    /// Recoverable problems.
    Warning,
    /// Failures.
    Error,
}

impl Level {
    /// All levels, in severity order.
    pub const ALL: [Level; 4] = [Level::Debug, Level::Info, Level::Warning, Level::Error];

    /// Canonical upper-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }

    /// Parse a level name, case-insensitively.
    ///
    /// Fails with [`ScrollsError::InvalidLevel`] for anything outside the
    /// fixed set.
    pub fn parse(s: &str) -> ScrollsResult<Level> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARNING" => Ok(Level::Warning),
            "ERROR" => Ok(Level::Error),
            _ => Err(ScrollsError::InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ScrollsError;

    fn from_str(s: &str) -> ScrollsResult<Level> {
        Level::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        assert_eq!(Level::parse("DEBUG").unwrap(), Level::Debug);
        assert_eq!(Level::parse("INFO").unwrap(), Level::Info);
        assert_eq!(Level::parse("WARNING").unwrap(), Level::Warning);
        assert_eq!(Level::parse("ERROR").unwrap(), Level::Error);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Level::parse("info").unwrap(), Level::Info);
        assert_eq!(Level::parse("Warning").unwrap(), Level::Warning);
        assert_eq!(Level::parse(" error ").unwrap(), Level::Error);
    }

    #[test]
    fn test_parse_rejects_unknown_levels() {
        for bad in ["TRACE", "WARN", "EXC", "", "INFO2"] {
            assert!(matches!(
                Level::parse(bad),
                Err(ScrollsError::InvalidLevel(_))
            ));
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
    }

    #[test]
    fn test_display_matches_as_str() {
        for level in Level::ALL {
            assert_eq!(level.to_string(), level.as_str());
        }
    }
}
