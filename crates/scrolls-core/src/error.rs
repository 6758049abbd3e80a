//! Error types for scrolls operations.
//!
//! Setup errors ([`ScrollsError::InvalidName`], [`ScrollsError::InvalidLevel`])
//! surface immediately at the call site since they indicate a programming
//! mistake. Rendering errors are recovered by handlers with a best-effort
//! fallback line; logging is never allowed to crash the host application.

/// Result alias used throughout the scrolls crates.
pub type ScrollsResult<T> = Result<T, ScrollsError>;

/// Error taxonomy for the logging and rendering subsystems.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScrollsError {
    /// A logger name was empty, contained invalid characters, or had an
    /// empty dot-segment.
    #[error("invalid logger name {name:?}: {reason}")]
    InvalidName {
        /// The offending name as given by the caller.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// A level string was not one of `DEBUG`, `INFO`, `WARNING`, `ERROR`.
    #[error("invalid log level {0:?}")]
    InvalidLevel(String),

    /// A format template had unbalanced braces or an invalid field.
    #[error("malformed template at byte {position}: {reason}")]
    MalformedTemplate {
        /// Byte offset into the template where parsing failed.
        position: usize,
        /// Why parsing failed.
        reason: String,
    },

    /// A field referenced a positional index or keyword that was not
    /// supplied.
    #[error("missing argument {0:?}")]
    MissingArgument(String),

    /// A format spec recursed past the fixed nesting bound.
    #[error("format spec recursion limit exceeded")]
    RecursionLimit,

    /// A terminal backend could not be initialized. Recovered locally by
    /// falling back to the no-op backend.
    #[error("unsupported terminal: {0}")]
    UnsupportedTerminal(String),
}

impl ScrollsError {
    pub(crate) fn invalid_name(name: &str, reason: &'static str) -> Self {
        Self::InvalidName {
            name: name.to_string(),
            reason,
        }
    }

    /// Construct a [`ScrollsError::MalformedTemplate`].
    #[must_use]
    pub fn malformed(position: usize, reason: impl Into<String>) -> Self {
        Self::MalformedTemplate {
            position,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_name() {
        let err = ScrollsError::invalid_name("a..b", "empty dot-segment");
        let msg = err.to_string();
        assert!(msg.contains("a..b"));
        assert!(msg.contains("empty dot-segment"));
    }

    #[test]
    fn test_error_display_malformed() {
        let err = ScrollsError::malformed(7, "unbalanced '{'");
        assert!(err.to_string().contains("byte 7"));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(ScrollsError::RecursionLimit, ScrollsError::RecursionLimit);
        assert_ne!(
            ScrollsError::MissingArgument("0".into()),
            ScrollsError::MissingArgument("1".into())
        );
    }
}
