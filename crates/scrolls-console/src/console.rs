//! Shared console over a color backend.
//!
//! All styled output for one terminal funnels through a single
//! [`Console`], which serializes "format + write" sequences behind one
//! lock so concurrent `log()` calls never interleave the bytes (or the
//! color transitions) of two records.

use std::sync::{Mutex, OnceLock, PoisonError};

use scrolls_core::{ScrollsResult, Value};

use crate::backend::{ColorBackend, detect_backend};
use crate::format::{FieldSource, StyleRenderer};

/// A mutex-guarded color backend.
pub struct Console {
    backend: Mutex<Box<dyn ColorBackend + Send>>,
}

impl Console {
    /// Probe the stderr stream once and build the matching console.
    #[must_use]
    pub fn detect() -> Self {
        Self::with_backend(detect_backend())
    }

    /// Build a console over an explicit backend (tests, alternate
    /// streams).
    #[must_use]
    pub fn with_backend(backend: Box<dyn ColorBackend + Send>) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }

    /// Render one template under the console lock.
    pub fn render(
        &self,
        template: &str,
        positional: &[Value],
        named: &dyn FieldSource,
    ) -> ScrollsResult<()> {
        self.with_renderer(|r| r.render(template, positional, named))
    }

    /// Run a multi-step render sequence under one lock acquisition.
    ///
    /// Handlers use this so prefix, indentation, and message of a single
    /// record reach the terminal contiguously.
    pub fn with_renderer<R>(&self, f: impl FnOnce(&mut StyleRenderer<'_>) -> R) -> R {
        let mut backend = self.backend.lock().unwrap_or_else(PoisonError::into_inner);
        let mut renderer = StyleRenderer::new(backend.as_mut());
        f(&mut renderer)
    }

    /// Return the terminal to its default look.
    pub fn reset(&self) {
        self.backend
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset_color();
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::detect()
    }
}

static CONSOLE: OnceLock<Console> = OnceLock::new();

/// The process-wide console, built on first use via [`Console::detect`].
#[must_use]
pub fn console() -> &'static Console {
    CONSOLE.get_or_init(Console::detect)
}

/// Install a specific console as the process-wide one.
///
/// Must run before any output; fails if the console was already built.
pub fn init_console(console: Console) -> Result<(), &'static str> {
    CONSOLE
        .set(console)
        .map_err(|_| "console already initialized")
}
