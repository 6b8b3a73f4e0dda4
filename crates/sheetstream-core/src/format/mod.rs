//! Number format rendering
//!
//! Renders a cell value through an Excel number format code. A code has up
//! to four `;`-separated sections (positive, negative, zero, text).
//! Supported syntax:
//!
//! - `General` and the text placeholder `@`
//! - literals: `"quoted"`, `\x`, `_x` (space), `*x` (fill, dropped)
//! - bracket tokens: colors and conditions are ignored, `[$sym-409]`
//!   renders `sym`, `[h]`/`[mm]`/`[ss]` are elapsed time
//! - digit placeholders `0 # ?`, grouping and scaling commas, `%`,
//!   scientific `E+`/`E-`, fractions `?/?`
//! - date and time tokens, see [`date`](self::date)
//!
//! Values that are not numbers only ever see the text section.

mod date;
mod number;

pub use date::{datetime_to_serial, parse_iso_datetime, serial_to_datetime};

use crate::cell::CellKind;

/// Render `value` through the format `code`.
///
/// `kind` decides whether a numeric-looking value is treated as a number;
/// shared and inline strings are always text.
///
/// ```
/// use sheetstream_core::{format::format_value, CellKind};
///
/// assert_eq!(format_value("1234.5", "#,##0.00", false, CellKind::Default), "1,234.50");
/// assert_eq!(format_value("0.25", "0%", false, CellKind::Default), "25%");
/// assert_eq!(format_value("45000", "yyyy-mm-dd", false, CellKind::Default), "2023-03-15");
/// assert_eq!(format_value("Total", "0.00", false, CellKind::SharedString), "Total");
/// ```
pub fn format_value(value: &str, code: &str, date1904: bool, kind: CellKind) -> String {
    let sections = split_sections(code);
    let number = if kind.is_text() {
        None
    } else {
        value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
    };
    let Some(number) = number else {
        return format_text(value, &sections);
    };

    let (section, number, auto_negative) = pick_section(&sections, number);
    if is_general(section) {
        return if auto_negative {
            value.to_string()
        } else {
            number::format_general(number)
        };
    }
    if is_text_section(section) {
        return render_text(section, value);
    }
    if has_date_tokens(section) {
        return date::format_serial(number, section, date1904)
            .unwrap_or_else(|| value.to_string());
    }
    number::format_number(number, section, auto_negative)
}

/// Whether a format code contains date or time tokens
pub fn has_date_tokens(code: &str) -> bool {
    let mut chars = code.chars();
    let mut in_quotes = false;
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                in_quotes = false;
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                let content: String = chars.by_ref().take_while(|c| *c != ']').collect();
                if is_elapsed_token(&content) {
                    return true;
                }
            }
            'y' | 'Y' | 'm' | 'M' | 'd' | 'D' | 'h' | 'H' | 's' | 'S' => return true,
            _ => {}
        }
    }
    false
}

fn is_elapsed_token(content: &str) -> bool {
    let lower = content.to_ascii_lowercase();
    !lower.is_empty()
        && (lower.chars().all(|c| c == 'h')
            || lower.chars().all(|c| c == 'm')
            || lower.chars().all(|c| c == 's'))
}

/// Split a code into sections on `;` outside quotes, escapes and brackets
fn split_sections(code: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut escaped = false;

    for (idx, ch) in code.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '"' if !in_brackets => in_quotes = !in_quotes,
            '\\' if !in_quotes => escaped = true,
            '[' if !in_quotes => in_brackets = true,
            ']' if !in_quotes => in_brackets = false,
            ';' if !in_quotes && !in_brackets => {
                sections.push(&code[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    sections.push(&code[start..]);
    sections
}

/// Choose the section for a number; returns the section, the value to
/// render and whether a minus sign must be added automatically.
fn pick_section<'a>(sections: &[&'a str], number: f64) -> (&'a str, f64, bool) {
    match sections {
        [only] => (*only, number, true),
        [positive, negative, rest @ ..] => {
            if number < 0.0 {
                (*negative, -number, false)
            } else if number == 0.0 && !rest.is_empty() {
                (rest[0], number, false)
            } else {
                (*positive, number, false)
            }
        }
        [] => ("General", number, true),
    }
}

fn format_text(value: &str, sections: &[&str]) -> String {
    if let Some(text) = sections.get(3) {
        return render_text(text, value);
    }
    match sections {
        [only] if is_text_section(only) => render_text(only, value),
        _ => value.to_string(),
    }
}

fn is_general(section: &str) -> bool {
    render_literal(section).trim().eq_ignore_ascii_case("general")
}

/// A section with `@` and no digit placeholders
fn is_text_section(section: &str) -> bool {
    let syntax = syntax_chars(section);
    syntax.iter().any(|(_, c)| *c == '@')
        && !syntax.iter().any(|(_, c)| matches!(c, '0' | '#' | '?'))
}

/// Characters of a section that are format syntax rather than literal text,
/// with their byte offsets.
pub(crate) fn syntax_chars(section: &str) -> Vec<(usize, char)> {
    let mut out = Vec::new();
    let mut chars = section.char_indices();
    let mut in_quotes = false;
    while let Some((idx, ch)) = chars.next() {
        if in_quotes {
            if ch == '"' {
                in_quotes = false;
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '\\' | '_' | '*' => {
                chars.next();
            }
            '[' => {
                for (_, c) in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                }
            }
            _ => out.push((idx, ch)),
        }
    }
    out
}

/// Render the literal parts of a format fragment
pub(crate) fn render_literal(segment: &str) -> String {
    render_text(segment, "@")
}

/// Render a text section, substituting `@` with `text`
fn render_text(section: &str, text: &str) -> String {
    let mut out = String::new();
    let mut chars = section.chars();
    let mut in_quotes = false;

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                in_quotes = false;
            } else {
                out.push(ch);
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '_' => {
                chars.next();
                out.push(' ');
            }
            '*' => {
                chars.next();
            }
            '[' => {
                let content: String = chars.by_ref().take_while(|c| *c != ']').collect();
                if let Some(symbol) = currency_symbol(&content) {
                    out.push_str(symbol);
                }
            }
            '@' => out.push_str(text),
            _ => out.push(ch),
        }
    }
    out
}

/// `$€-407` -> `€`
fn currency_symbol(content: &str) -> Option<&str> {
    let after = content.strip_prefix('$')?;
    let symbol = after.split_once('-').map_or(after, |(s, _)| s);
    (!symbol.is_empty()).then_some(symbol)
}
