//! Style-aware format renderer.
//!
//! Templates mix ordinary fields with style-tagged fields:
//!
//! ```text
//! {ref}            {ref:spec}
//! {ref # style}    {ref:spec # style}
//! ```
//!
//! `ref` is a decimal positional index, a bare identifier looked up in
//! the named source, or a single/double-quoted literal used verbatim.
//! `style` is `fg` or `fg,bg`; each side may be empty and whitespace is
//! insignificant. Literal braces are doubled (`{{`, `}}`).
//!
//! A format spec may itself contain fields; it is expanded through the
//! same engine one recursion level down (plain expansion, styles have no
//! meaning inside a spec), bounded by [`MAX_SPEC_RECURSION`].
//!
//! A styled span paints through the backend: set the resolved colors
//! (unspecified channels keep their current value), write the formatted
//! text, then replay the previous state returned by `set_color`. Spans
//! therefore sequence and nest correctly. Unknown color names resolve to
//! "no change": the span is written plainly with no transition at all.

use std::collections::{BTreeMap, HashMap};

use scrolls_core::{Record, ScrollsError, ScrollsResult, Value};
use time::format_description;

use crate::backend::ColorBackend;

/// Format specs may nest this many levels deep before
/// [`ScrollsError::RecursionLimit`] fires.
pub const MAX_SPEC_RECURSION: usize = 2;

const INDENT_UNIT: &str = "    ";

/// Supplies named-field values to the renderer.
pub trait FieldSource {
    /// Resolve a field by name.
    fn field(&self, name: &str) -> Option<Value>;
}

impl FieldSource for Record {
    fn field(&self, name: &str) -> Option<Value> {
        Record::field(self, name)
    }
}

impl FieldSource for BTreeMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl FieldSource for HashMap<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// The empty named source.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFields;

impl FieldSource for NoFields {
    fn field(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// One indent unit per nesting depth.
#[must_use]
pub fn indent(depth: usize) -> String {
    INDENT_UNIT.repeat(depth)
}

// ───────────────────────────────────────────────────────────
// Template parsing
// ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Piece {
    Literal(String),
    Field(Field),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Field {
    pub reference: FieldRef,
    pub spec: Option<String>,
    pub fg: Option<String>,
    pub bg: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum FieldRef {
    Index(usize),
    Name(String),
    Literal(String),
}

pub(crate) fn parse_template(template: &str) -> ScrollsResult<Vec<Piece>> {
    let bytes = template.as_bytes();
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => {
                literal.push('{');
                i += 2;
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => {
                literal.push('}');
                i += 2;
            }
            b'{' => {
                let end = matching_brace(template, i)
                    .ok_or_else(|| ScrollsError::malformed(i, "unbalanced '{'"))?;
                if !literal.is_empty() {
                    pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                }
                pieces.push(Piece::Field(parse_field(&template[i + 1..end], i + 1)?));
                i = end + 1;
            }
            b'}' => {
                return Err(ScrollsError::malformed(i, "unmatched '}'"));
            }
            _ => {
                // Advance one whole character, not one byte.
                let ch = template[i..].chars().next().unwrap_or('\0');
                literal.push(ch);
                i += ch.len_utf8();
            }
        }
    }
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}

// Byte index of the '}' matching the '{' at `open`.
fn matching_brace(template: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, c) in template[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_field(content: &str, pos: usize) -> ScrollsResult<Field> {
    let trimmed_start = content.trim_start();
    let (reference, rest) = if let Some(quote) = leading_quote(trimmed_start) {
        let inner = &trimmed_start[1..];
        let close = inner
            .find(quote)
            .ok_or_else(|| ScrollsError::malformed(pos, "unterminated quoted literal"))?;
        (
            FieldRef::Literal(inner[..close].to_string()),
            &inner[close + 1..],
        )
    } else {
        let split = content
            .find(|c| c == ':' || c == '#')
            .unwrap_or(content.len());
        let token = content[..split].trim();
        if token.is_empty() {
            return Err(ScrollsError::malformed(pos, "empty field reference"));
        }
        // Nested fields belong in the spec, not the reference; a stray
        // brace here is a template mistake, not a missing argument.
        if token.contains(['{', '}']) {
            return Err(ScrollsError::malformed(
                pos,
                "brace inside field reference",
            ));
        }
        let reference = if token.bytes().all(|b| b.is_ascii_digit()) {
            let index = token
                .parse()
                .map_err(|_| ScrollsError::malformed(pos, "positional index out of range"))?;
            FieldRef::Index(index)
        } else {
            FieldRef::Name(token.to_string())
        };
        (reference, &content[split..])
    };

    let rest = rest.trim_start();
    let (spec, style) = match rest.chars().next() {
        None => (None, None),
        Some(':') => {
            let body = &rest[1..];
            // The spec runs to a '#' outside any nested field.
            let mut depth = 0usize;
            let mut split = body.len();
            for (offset, c) in body.char_indices() {
                match c {
                    '{' => depth += 1,
                    '}' => depth = depth.saturating_sub(1),
                    '#' if depth == 0 => {
                        split = offset;
                        break;
                    }
                    _ => {}
                }
            }
            let spec = body[..split].trim();
            let style = if split < body.len() {
                Some(&body[split + 1..])
            } else {
                None
            };
            (
                (!spec.is_empty()).then(|| spec.to_string()),
                style,
            )
        }
        Some('#') => (None, Some(&rest[1..])),
        Some(_) => {
            return Err(ScrollsError::malformed(
                pos,
                format!("unexpected text after field reference: {rest:?}"),
            ));
        }
    };

    let (fg, bg) = match style {
        None => (None, None),
        Some(style) => {
            let mut parts = style.split(',');
            let fg = parts.next().map(str::trim).unwrap_or_default();
            let bg = parts.next().map(str::trim).unwrap_or_default();
            if parts.next().is_some() {
                return Err(ScrollsError::malformed(
                    pos,
                    "style spec has more than two color names",
                ));
            }
            (
                (!fg.is_empty()).then(|| fg.to_string()),
                (!bg.is_empty()).then(|| bg.to_string()),
            )
        }
    };

    Ok(Field {
        reference,
        spec,
        fg,
        bg,
    })
}

fn leading_quote(s: &str) -> Option<char> {
    match s.chars().next() {
        Some(q @ ('\'' | '"')) => Some(q),
        _ => None,
    }
}

// ───────────────────────────────────────────────────────────
// Value formatting
// ───────────────────────────────────────────────────────────

/// Apply a format spec to a value.
///
/// Ordinary values take `[[fill]align][width][.precision]` (numbers
/// default right-aligned, text left-aligned). [`Value::Time`] takes a
/// `time` crate format description such as
/// `[hour]:[minute]:[second]`.
pub fn format_value(value: &Value, spec: &str) -> ScrollsResult<String> {
    if spec.is_empty() {
        return Ok(value.to_string());
    }
    if let Value::Time(t) = value {
        let description = format_description::parse(spec)
            .map_err(|e| ScrollsError::malformed(0, format!("bad time spec: {e}")))?;
        return t
            .format(&description)
            .map_err(|e| ScrollsError::malformed(0, format!("bad time spec: {e}")));
    }

    let parsed = MiniSpec::parse(spec)
        .ok_or_else(|| ScrollsError::malformed(0, format!("bad format spec {spec:?}")))?;

    let mut text = match (value, parsed.precision) {
        (Value::Float(x), Some(p)) => format!("{x:.p$}"),
        (Value::Str(s), Some(p)) => s.chars().take(p).collect(),
        _ => value.to_string(),
    };

    if let Some(width) = parsed.width {
        let len = text.chars().count();
        if len < width {
            let pad = width - len;
            let fill = parsed.fill.unwrap_or(' ');
            let align = parsed.align.unwrap_or(match value {
                Value::Int(_) | Value::Float(_) => '>',
                _ => '<',
            });
            let filler = |n: usize| fill.to_string().repeat(n);
            text = match align {
                '>' => format!("{}{}", filler(pad), text),
                '^' => format!("{}{}{}", filler(pad / 2), text, filler(pad - pad / 2)),
                _ => format!("{}{}", text, filler(pad)),
            };
        }
    }
    Ok(text)
}

struct MiniSpec {
    fill: Option<char>,
    align: Option<char>,
    width: Option<usize>,
    precision: Option<usize>,
}

impl MiniSpec {
    fn parse(spec: &str) -> Option<Self> {
        let mut chars: Vec<char> = spec.chars().collect();
        let mut fill = None;
        let mut align = None;

        if chars.len() >= 2 && matches!(chars[1], '<' | '>' | '^') {
            fill = Some(chars[0]);
            align = Some(chars[1]);
            chars.drain(..2);
        } else if chars.first().is_some_and(|c| matches!(c, '<' | '>' | '^')) {
            align = Some(chars[0]);
            chars.drain(..1);
        }

        let rest: String = chars.into_iter().collect();
        let (width_part, precision) = match rest.split_once('.') {
            Some((w, p)) => (w.to_string(), Some(p.parse().ok()?)),
            None => (rest, None),
        };
        let width = if width_part.is_empty() {
            None
        } else {
            Some(width_part.parse().ok()?)
        };
        Some(Self {
            fill,
            align,
            width,
            precision,
        })
    }
}

// ───────────────────────────────────────────────────────────
// Rendering
// ───────────────────────────────────────────────────────────

/// Renders templates through a [`ColorBackend`], painting styled spans
/// with exact save/restore of the color state.
pub struct StyleRenderer<'a> {
    backend: &'a mut (dyn ColorBackend + Send),
}

impl<'a> StyleRenderer<'a> {
    /// Borrow a backend for the duration of a render sequence.
    pub fn new(backend: &'a mut (dyn ColorBackend + Send)) -> Self {
        Self { backend }
    }

    /// Render a template, writing output through the backend.
    pub fn render(
        &mut self,
        template: &str,
        positional: &[Value],
        named: &dyn FieldSource,
    ) -> ScrollsResult<()> {
        render_into(self.backend, template, positional, named, 0)
    }

    /// Write text with no field or style processing.
    pub fn write_plain(&mut self, text: &str) {
        self.backend.write(text);
    }
}

fn render_into(
    backend: &mut (dyn ColorBackend + Send),
    template: &str,
    positional: &[Value],
    named: &dyn FieldSource,
    depth: usize,
) -> ScrollsResult<()> {
    for piece in parse_template(template)? {
        match piece {
            Piece::Literal(text) => backend.write(&text),
            Piece::Field(field) => {
                let value = resolve(&field.reference, positional, named)?;
                let spec = expand_spec(field.spec.as_deref(), positional, named, depth)?;
                let text = format_value(&value, &spec)?;

                let (fg, bg) = {
                    let table = backend.style_table();
                    (
                        field.fg.as_deref().and_then(|n| table.resolve(n)),
                        field.bg.as_deref().and_then(|n| table.resolve(n)),
                    )
                };
                if fg.is_none() && bg.is_none() {
                    backend.write(&text);
                } else {
                    let current = backend.current_colors();
                    let prev = backend.set_color(fg.or(current.0), bg.or(current.1));
                    backend.write(&text);
                    backend.set_color(prev.0, prev.1);
                }
            }
        }
    }
    Ok(())
}

/// Expand a template to a plain string: fields resolve and format,
/// style tags are ignored. Used for spec recursion and colorless sinks.
pub fn format_plain(
    template: &str,
    positional: &[Value],
    named: &dyn FieldSource,
) -> ScrollsResult<String> {
    format_plain_at(template, positional, named, 0)
}

fn format_plain_at(
    template: &str,
    positional: &[Value],
    named: &dyn FieldSource,
    depth: usize,
) -> ScrollsResult<String> {
    let mut out = String::new();
    for piece in parse_template(template)? {
        match piece {
            Piece::Literal(text) => out.push_str(&text),
            Piece::Field(field) => {
                let value = resolve(&field.reference, positional, named)?;
                let spec = expand_spec(field.spec.as_deref(), positional, named, depth)?;
                out.push_str(&format_value(&value, &spec)?);
            }
        }
    }
    Ok(out)
}

fn expand_spec(
    spec: Option<&str>,
    positional: &[Value],
    named: &dyn FieldSource,
    depth: usize,
) -> ScrollsResult<String> {
    let Some(spec) = spec else {
        return Ok(String::new());
    };
    if !spec.contains('{') {
        return Ok(spec.to_string());
    }
    if depth + 1 > MAX_SPEC_RECURSION {
        return Err(ScrollsError::RecursionLimit);
    }
    format_plain_at(spec, positional, named, depth + 1)
}

fn resolve(
    reference: &FieldRef,
    positional: &[Value],
    named: &dyn FieldSource,
) -> ScrollsResult<Value> {
    match reference {
        FieldRef::Index(i) => positional
            .get(*i)
            .cloned()
            .ok_or_else(|| ScrollsError::MissingArgument(i.to_string())),
        FieldRef::Name(name) => named
            .field(name)
            .ok_or_else(|| ScrollsError::MissingArgument(name.clone())),
        FieldRef::Literal(text) => Ok(Value::Str(text.clone())),
    }
}
