//! Symbolic color names and their backend-specific codes.
//!
//! Each backend carries one [`StyleTable`]. Lookup is lenient by design:
//! an unknown name resolves to `None` and the renderer leaves the span
//! unstyled, so future color names degrade gracefully instead of
//! crashing output.

use std::collections::HashMap;

/// A backend-specific color code.
///
/// The low three bits select the base color in the backend's own
/// numbering; bit 3 is the intense/bold flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8);

impl Color {
    /// Intense/bold flag, shared by both backends.
    pub const INTENSE: u8 = 8;

    /// Base color number without the intense flag.
    #[must_use]
    pub fn base(self) -> u8 {
        self.0 & 0x7
    }

    /// Whether the intense flag is set.
    #[must_use]
    pub fn is_intense(self) -> bool {
        self.0 & Self::INTENSE != 0
    }
}

/// Maps symbolic color names to backend codes.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    entries: HashMap<&'static str, Color>,
}

impl StyleTable {
    /// A table with no entries; every lookup misses. Used by the no-op
    /// backend.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table for ANSI escape-sequence terminals.
    ///
    /// ANSI numbering: black 0, red 1, green 2, yellow 3, blue 4,
    /// magenta 5, cyan 6, white 7.
    #[must_use]
    pub fn ansi() -> Self {
        Self::with_numbering([0, 1, 2, 3, 4, 5, 6, 7])
    }

    /// The table for the native Windows console.
    ///
    /// Attribute numbering: black 0, red 4, green 2, yellow 6, blue 1,
    /// magenta 5, cyan 3, white 7.
    #[must_use]
    pub fn windows() -> Self {
        Self::with_numbering([0, 4, 2, 6, 1, 5, 3, 7])
    }

    // Codes in canonical order: black, red, green, yellow, blue,
    // magenta, cyan, white.
    fn with_numbering(codes: [u8; 8]) -> Self {
        const NAMES: [&str; 8] = [
            "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
        ];
        const INTENSE_NAMES: [&str; 8] = [
            "intense_black",
            "intense_red",
            "intense_green",
            "intense_yellow",
            "intense_blue",
            "intense_magenta",
            "intense_cyan",
            "intense_white",
        ];
        const BOLD_ALIASES: [&str; 8] = [
            "bold_black",
            "bold_red",
            "bold_green",
            "bold_yellow",
            "bold_blue",
            "bold_magenta",
            "bold_cyan",
            "bold_white",
        ];

        let mut entries = HashMap::new();
        for (i, name) in NAMES.iter().enumerate() {
            entries.insert(*name, Color(codes[i]));
        }
        for (i, name) in INTENSE_NAMES.iter().enumerate() {
            entries.insert(*name, Color(codes[i] | Color::INTENSE));
        }
        for (i, name) in BOLD_ALIASES.iter().enumerate() {
            entries.insert(*name, Color(codes[i] | Color::INTENSE));
        }
        // Aliases carried over from long use: grey is bright black,
        // gold renders as yellow.
        let bright_black = Color(codes[0] | Color::INTENSE);
        entries.insert("grey", bright_black);
        entries.insert("gray", bright_black);
        entries.insert("dark_grey", bright_black);
        entries.insert("dark_gray", bright_black);
        entries.insert("gold", Color(codes[3]));

        Self { entries }
    }

    /// Resolve a symbolic name, or `None` on a miss.
    ///
    /// Input is normalized: trimmed, ASCII-lowercased, with runs of
    /// spaces, hyphens, and underscores collapsed to one underscore.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Color> {
        self.entries.get(normalize(name).as_str()).copied()
    }

    /// Number of known names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.trim().chars() {
        if c == ' ' || c == '-' || c == '_' {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push('_');
                pending_sep = false;
            }
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}
