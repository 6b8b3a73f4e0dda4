//! Cell value resolution: type dispatch, shared and inline strings

use std::sync::Arc;

use log::debug;
use sheetstream_core::format::{datetime_to_serial, parse_iso_datetime};
use sheetstream_core::{CellKind, Font, RawCell, RichText, RichTextRun};

use crate::error::FormatError;
use crate::formatter::{Formatted, ValueFormatter};
use crate::shared_strings::{RunProperties, SharedStringItem, SharedStringTable};

/// Turns [`RawCell`]s into rich text.
///
/// Cheap to clone; the tables are shared.
#[derive(Debug, Clone)]
pub struct CellResolver {
    formatter: ValueFormatter,
    shared_strings: Arc<SharedStringTable>,
}

impl CellResolver {
    /// Create a resolver over a formatter and a shared string table
    pub fn new(formatter: ValueFormatter, shared_strings: Arc<SharedStringTable>) -> Self {
        Self {
            formatter,
            shared_strings,
        }
    }

    /// The value formatter
    pub fn formatter(&self) -> &ValueFormatter {
        &self.formatter
    }

    /// Resolve one cell by its declared kind
    pub fn resolve(&self, cell: &RawCell) -> Formatted {
        match cell.kind {
            CellKind::Boolean => self.resolve_bool(cell),
            CellKind::Date => self.resolve_date(cell),
            CellKind::SharedString => self.resolve_shared(cell),
            CellKind::InlineString => {
                let text = cell.inline.as_deref().unwrap_or(&cell.value);
                self.formatter.apply_style(text, cell.style, cell.kind)
            }
            CellKind::Default => {
                let value = if self.formatter.is_raw() {
                    None
                } else {
                    normalize_number(&cell.value)
                };
                let value = value.as_deref().unwrap_or(&cell.value);
                self.formatter.apply_style(value, cell.style, cell.kind)
            }
        }
    }

    fn resolve_bool(&self, cell: &RawCell) -> Formatted {
        let text = match cell.value.as_str() {
            _ if self.formatter.is_raw() => cell.value.as_str(),
            "1" => "TRUE",
            "0" => "FALSE",
            other => other,
        };
        self.formatter.apply_font(text, cell.style)
    }

    fn resolve_date(&self, cell: &RawCell) -> Formatted {
        if self.formatter.is_raw() {
            return Formatted::ok(RichText::plain(cell.value.as_str()));
        }
        match parse_iso_datetime(&cell.value) {
            Some(dt) => {
                let serial = datetime_to_serial(dt, self.formatter.date1904());
                self.formatter
                    .apply_style(&serial.to_string(), cell.style, cell.kind)
            }
            None => {
                debug!("cell {:?}: unparsable date {:?}", cell.reference, cell.value);
                Formatted::degraded(
                    RichText::plain(cell.value.as_str()),
                    FormatError::InvalidDate(cell.value.clone()),
                )
            }
        }
    }

    fn resolve_shared(&self, cell: &RawCell) -> Formatted {
        let item = cell
            .value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| self.shared_strings.get(index));

        match item {
            Some(SharedStringItem::Plain(text)) => {
                self.formatter.apply_style(&text, cell.style, cell.kind)
            }
            Some(SharedStringItem::Rich(runs)) => {
                let runs = runs
                    .into_iter()
                    .map(|run| RichTextRun {
                        font: run.properties.as_ref().map(|props| self.run_font(props)),
                        text: run.text,
                    })
                    .collect();
                Formatted::ok(RichText::from_runs(runs))
            }
            None => self
                .formatter
                .apply_style(&cell.value, cell.style, cell.kind),
        }
    }

    fn run_font(&self, props: &RunProperties) -> Font {
        Font {
            bold: props.bold.unwrap_or(false),
            italic: props.italic.unwrap_or(false),
            strike: props.strike.unwrap_or(false),
            underline: props.underline.unwrap_or_default(),
            color: props
                .color
                .as_ref()
                .and_then(|c| self.formatter.colors().font_color(c)),
            name: props.name.clone(),
            size: props.size,
        }
    }
}

/// Re-serialize a numeric value.
///
/// Values with more than 15 significant digits are cut to 15 (`%G` style,
/// exponent when needed); others get their shortest round-trip form.
/// Non-numeric values return `None`.
pub(crate) fn normalize_number(value: &str) -> Option<String> {
    let number: f64 = value.trim().parse().ok().filter(|n: &f64| n.is_finite())?;
    let shortest = number.to_string();
    let precision = shortest
        .chars()
        .filter(char::is_ascii_digit)
        .skip_while(|c| *c == '0')
        .count();
    if precision > 15 {
        Some(format_g15(number))
    } else {
        Some(shortest)
    }
}

/// `%.15G`: 15 significant digits, trailing zeros dropped
fn format_g15(number: f64) -> String {
    if number == 0.0 {
        return "0".to_string();
    }
    let scientific = format!("{:.14e}", number);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if !(-4..15).contains(&exponent) {
        let mantissa = trim_fraction(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}E{}{:02}", mantissa, sign, exponent.unsigned_abs())
    } else {
        let decimals = (14 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, number)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
