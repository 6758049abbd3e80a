//! Terminal color backends.
//!
//! A [`ColorBackend`] abstracts the terminal capability the renderer
//! paints through. Three variants exist: ANSI escape sequences, the
//! native Windows console API, and a no-op for non-interactive streams.
//! Selection happens once at startup via [`detect_backend`] and is never
//! re-evaluated per call.
//!
//! Every backend is stateful: `set_color` tracks the currently painted
//! pair so it can return the previous one, which makes exact
//! save/restore possible by replaying the returned state.

use std::io::{self, IsTerminal, Write};

use crate::styles::{Color, StyleTable};

/// The `(fg, bg)` pair currently painted on the terminal. `None` is the
/// terminal default for that channel.
pub type ColorState = (Option<Color>, Option<Color>);

/// Terminal capability consumed by the renderer.
pub trait ColorBackend: Send {
    /// Assign both channels absolutely (`None` = terminal default) and
    /// return the previous pair.
    fn set_color(&mut self, fg: Option<Color>, bg: Option<Color>) -> ColorState;

    /// The pair currently painted.
    fn current_colors(&self) -> ColorState;

    /// Return the terminal to its default look.
    fn reset_color(&mut self);

    /// Write text through the backend. I/O failures are swallowed;
    /// logging never crashes the host.
    fn write(&mut self, text: &str);

    /// The style table for this backend.
    fn style_table(&self) -> &StyleTable;
}

/// ANSI escape-sequence backend.
pub struct AnsiBackend<W: Write + Send> {
    writer: W,
    current: ColorState,
    table: StyleTable,
}

impl<W: Write + Send> AnsiBackend<W> {
    /// Wrap a writer, assuming the terminal starts at its default look.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            current: (None, None),
            table: StyleTable::ansi(),
        }
    }
}

impl AnsiBackend<io::Stderr> {
    /// ANSI backend over stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> ColorBackend for AnsiBackend<W> {
    fn set_color(&mut self, fg: Option<Color>, bg: Option<Color>) -> ColorState {
        let prev = self.current;
        self.current = (fg, bg);

        // A leading 0 clears whatever was painted, then both channels
        // are re-applied; a None channel is simply left at its default.
        let mut codes = String::from("0");
        if let Some(c) = fg {
            if c.is_intense() {
                codes.push_str(";1");
            }
            codes.push_str(&format!(";3{}", c.base()));
        }
        if let Some(c) = bg {
            codes.push_str(&format!(";4{}", c.base()));
        }
        let _ = write!(self.writer, "\x1b[{codes}m");
        prev
    }

    fn current_colors(&self) -> ColorState {
        self.current
    }

    fn reset_color(&mut self) {
        self.current = (None, None);
        let _ = self.writer.write_all(b"\x1b[0m");
    }

    fn write(&mut self, text: &str) {
        let _ = self.writer.write_all(text.as_bytes());
    }

    fn style_table(&self) -> &StyleTable {
        &self.table
    }
}

/// Backend for non-interactive output: text passes through, color
/// requests do nothing.
pub struct NoOpBackend<W: Write + Send> {
    writer: W,
    table: StyleTable,
}

impl<W: Write + Send> NoOpBackend<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            table: StyleTable::empty(),
        }
    }
}

impl<W: Write + Send> ColorBackend for NoOpBackend<W> {
    fn set_color(&mut self, _fg: Option<Color>, _bg: Option<Color>) -> ColorState {
        (None, None)
    }

    fn current_colors(&self) -> ColorState {
        (None, None)
    }

    fn reset_color(&mut self) {}

    fn write(&mut self, text: &str) {
        let _ = self.writer.write_all(text.as_bytes());
    }

    fn style_table(&self) -> &StyleTable {
        &self.table
    }
}

/// Native Windows console backend.
///
/// Colors are painted with `SetConsoleTextAttribute`; the attribute word
/// captured at startup supplies the default for any channel set to
/// `None`. Construction fails with
/// [`UnsupportedTerminal`](scrolls_core::ScrollsError::UnsupportedTerminal)
/// when the console API is unavailable (redirected handle, no console),
/// and the caller falls back to [`NoOpBackend`].
#[cfg(windows)]
pub use win::WinConsoleBackend;

#[cfg(windows)]
mod win {
    #![allow(unsafe_code)]

    use std::io::{self, Write};

    use scrolls_core::{ScrollsError, ScrollsResult};
    use windows::Win32::Foundation::HANDLE;
    use windows::Win32::System::Console::{
        CONSOLE_CHARACTER_ATTRIBUTES, CONSOLE_SCREEN_BUFFER_INFO, GetConsoleScreenBufferInfo,
        GetStdHandle, STD_ERROR_HANDLE, SetConsoleTextAttribute,
    };

    use super::{Color, ColorBackend, ColorState, StyleTable};

    pub struct WinConsoleBackend {
        handle: HANDLE,
        default_attrs: u16,
        current: ColorState,
        table: StyleTable,
    }

    impl WinConsoleBackend {
        /// Attach to the stderr console buffer.
        pub fn stderr() -> ScrollsResult<Self> {
            let handle = unsafe { GetStdHandle(STD_ERROR_HANDLE) }
                .map_err(|e| ScrollsError::UnsupportedTerminal(e.to_string()))?;
            let mut info = CONSOLE_SCREEN_BUFFER_INFO::default();
            unsafe { GetConsoleScreenBufferInfo(handle, &mut info) }
                .map_err(|e| ScrollsError::UnsupportedTerminal(e.to_string()))?;
            Ok(Self {
                handle,
                default_attrs: info.wAttributes.0,
                current: (None, None),
                table: StyleTable::windows(),
            })
        }

        fn apply(&self) {
            let fg = self
                .current
                .0
                .map_or(self.default_attrs & 0x000F, |c| u16::from(c.0));
            let bg = self
                .current
                .1
                .map_or(self.default_attrs & 0x00F0, |c| u16::from(c.0) << 4);
            let attrs = (self.default_attrs & 0xFF00) | fg | bg;
            let _ = unsafe {
                SetConsoleTextAttribute(self.handle, CONSOLE_CHARACTER_ATTRIBUTES(attrs))
            };
        }
    }

    impl ColorBackend for WinConsoleBackend {
        fn set_color(&mut self, fg: Option<Color>, bg: Option<Color>) -> ColorState {
            let prev = self.current;
            self.current = (fg, bg);
            self.apply();
            prev
        }

        fn current_colors(&self) -> ColorState {
            self.current
        }

        fn reset_color(&mut self) {
            self.current = (None, None);
            self.apply();
        }

        fn write(&mut self, text: &str) {
            let mut stderr = io::stderr();
            let _ = stderr.write_all(text.as_bytes());
            let _ = stderr.flush();
        }

        fn style_table(&self) -> &StyleTable {
            &self.table
        }
    }
}

/// Probe the stderr stream once and pick a backend.
///
/// Non-interactive streams get the no-op backend; on Windows the native
/// console is tried first and an unsupported-terminal failure degrades
/// to no-op; everywhere else ANSI is assumed.
#[must_use]
pub fn detect_backend() -> Box<dyn ColorBackend + Send> {
    if !io::stderr().is_terminal() {
        return Box::new(NoOpBackend::new(io::stderr()));
    }
    #[cfg(windows)]
    {
        match WinConsoleBackend::stderr() {
            Ok(backend) => Box::new(backend),
            Err(_) => Box::new(NoOpBackend::new(io::stderr())),
        }
    }
    #[cfg(not(windows))]
    {
        Box::new(AnsiBackend::stderr())
    }
}
