//! Date and time serials
//!
//! Spreadsheet dates are day counts from an epoch with the time of day as
//! the fraction. The 1900 system keeps the phantom 1900-02-29 (serial 60),
//! so serials before March 1900 are offset by one day.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};

const MS_PER_DAY: f64 = 86_400_000.0;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

fn epoch(date1904: bool, early: bool) -> Option<NaiveDateTime> {
    let date = match (date1904, early) {
        (true, _) => NaiveDate::from_ymd_opt(1904, 1, 1),
        (false, true) => NaiveDate::from_ymd_opt(1899, 12, 31),
        (false, false) => NaiveDate::from_ymd_opt(1899, 12, 30),
    }?;
    date.and_hms_opt(0, 0, 0)
}

/// Convert a serial to a date-time; negative serials have no date
pub fn serial_to_datetime(serial: f64, date1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let base = epoch(date1904, !date1904 && serial < 61.0)?;
    let ms = (serial * MS_PER_DAY).round() as i64;
    base.checked_add_signed(Duration::milliseconds(ms))
}

/// Convert a date-time to a serial in the given date system
pub fn datetime_to_serial(dt: NaiveDateTime, date1904: bool) -> f64 {
    let march_1900 = NaiveDate::from_ymd_opt(1900, 3, 1).and_then(|d| d.and_hms_opt(0, 0, 0));
    let early = !date1904 && march_1900.is_some_and(|m| dt < m);
    match epoch(date1904, early) {
        Some(base) => (dt - base).num_milliseconds() as f64 / MS_PER_DAY,
        None => 0.0,
    }
}

/// Parse the ISO 8601 text stored in `t="d"` cells.
///
/// Accepts date-times with optional fraction and zone, plain dates and
/// plain times (which land on the epoch day).
pub fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    let value = value.strip_suffix('Z').unwrap_or(value);
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    let time = chrono::NaiveTime::parse_from_str(value, "%H:%M:%S%.f").ok()?;
    NaiveDate::from_ymd_opt(1899, 12, 30).map(|d| d.and_time(time))
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Literal(String),
    Year(usize),
    Month(usize),
    Day(usize),
    Hour(usize),
    Minute(usize),
    Second(usize),
    SubSecond(usize),
    AmPm { short: bool },
    ElapsedHours(usize),
    ElapsedMinutes(usize),
    ElapsedSeconds(usize),
}

impl Token {
    fn is_literal(&self) -> bool {
        matches!(self, Token::Literal(_))
    }
}

fn tokenize(section: &str) -> Vec<Token> {
    let chars: Vec<char> = section.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    let run_len = |start: usize, target: char| {
        chars[start..]
            .iter()
            .take_while(|c| c.eq_ignore_ascii_case(&target))
            .count()
    };

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '"' => {
                let text: String = chars[i + 1..].iter().take_while(|c| **c != '"').collect();
                i += text.chars().count() + 2;
                tokens.push(Token::Literal(text));
            }
            '\\' => {
                if let Some(next) = chars.get(i + 1) {
                    tokens.push(Token::Literal(next.to_string()));
                }
                i += 2;
            }
            '_' => {
                tokens.push(Token::Literal(" ".into()));
                i += 2;
            }
            '*' => i += 2,
            '[' => {
                let content: String = chars[i + 1..].iter().take_while(|c| **c != ']').collect();
                i += content.chars().count() + 2;
                let lower = content.to_ascii_lowercase();
                let width = lower.len();
                if !lower.is_empty() && lower.chars().all(|c| c == 'h') {
                    tokens.push(Token::ElapsedHours(width));
                } else if !lower.is_empty() && lower.chars().all(|c| c == 'm') {
                    tokens.push(Token::ElapsedMinutes(width));
                } else if !lower.is_empty() && lower.chars().all(|c| c == 's') {
                    tokens.push(Token::ElapsedSeconds(width));
                } else if let Some(symbol) = super::currency_symbol(&content) {
                    tokens.push(Token::Literal(symbol.to_string()));
                }
            }
            'y' | 'Y' => {
                let n = run_len(i, 'y');
                tokens.push(Token::Year(n));
                i += n;
            }
            'm' | 'M' => {
                let n = run_len(i, 'm');
                tokens.push(Token::Month(n));
                i += n;
            }
            'd' | 'D' => {
                let n = run_len(i, 'd');
                tokens.push(Token::Day(n));
                i += n;
            }
            'h' | 'H' => {
                let n = run_len(i, 'h');
                tokens.push(Token::Hour(n));
                i += n;
            }
            's' | 'S' => {
                let n = run_len(i, 's');
                tokens.push(Token::Second(n));
                i += n;
            }
            'a' | 'A' => {
                let rest: String = chars[i..].iter().take(5).collect();
                if rest.eq_ignore_ascii_case("am/pm") {
                    tokens.push(Token::AmPm { short: false });
                    i += 5;
                } else if rest.is_char_boundary(3) && rest.len() >= 3 && rest[..3].eq_ignore_ascii_case("a/p") {
                    tokens.push(Token::AmPm { short: true });
                    i += 3;
                } else {
                    tokens.push(Token::Literal(ch.to_string()));
                    i += 1;
                }
            }
            '.' if matches!(tokens.last(), Some(Token::Second(_) | Token::ElapsedSeconds(_)))
                && chars.get(i + 1) == Some(&'0') =>
            {
                let n = chars[i + 1..].iter().take_while(|c| **c == '0').count();
                tokens.push(Token::SubSecond(n));
                i += n + 1;
            }
            _ => {
                tokens.push(Token::Literal(ch.to_string()));
                i += 1;
            }
        }
    }

    resolve_minutes(&mut tokens);
    tokens
}

/// `m`/`mm` next to an hour or second token is a minute
fn resolve_minutes(tokens: &mut [Token]) {
    for idx in 0..tokens.len() {
        let &Token::Month(n) = &tokens[idx] else {
            continue;
        };
        if n > 2 {
            continue;
        }
        let prev = tokens[..idx].iter().rev().find(|t| !t.is_literal());
        let next = tokens[idx + 1..].iter().find(|t| !t.is_literal());
        let after_hour = matches!(prev, Some(Token::Hour(_) | Token::ElapsedHours(_)));
        let before_second = matches!(
            next,
            Some(Token::Second(_) | Token::ElapsedSeconds(_))
        );
        if after_hour || before_second {
            tokens[idx] = Token::Minute(n);
        }
    }
}

/// Render a serial through a date section; `None` when it has no date
pub(crate) fn format_serial(serial: f64, section: &str, date1904: bool) -> Option<String> {
    let tokens = tokenize(section);
    let sub_digits = tokens
        .iter()
        .find_map(|t| match t {
            Token::SubSecond(n) => Some(*n),
            _ => None,
        })
        .unwrap_or(0);

    // round to the displayed precision
    let step_ms = 1000.0 / 10f64.powi(sub_digits.min(3) as i32);
    let rounded = ((serial * MS_PER_DAY) / step_ms).round() * step_ms / MS_PER_DAY;

    let dt = serial_to_datetime(rounded, date1904)?;
    let twelve_hour = tokens.iter().any(|t| matches!(t, Token::AmPm { .. }));

    let mut out = String::new();
    for token in &tokens {
        match token {
            Token::Literal(text) => out.push_str(text),
            Token::Year(n) if *n <= 2 => out.push_str(&format!("{:02}", dt.year() % 100)),
            Token::Year(_) => out.push_str(&format!("{:04}", dt.year())),
            Token::Month(n) => {
                let name = MONTH_NAMES[dt.month0() as usize];
                match *n {
                    1 => out.push_str(&dt.month().to_string()),
                    2 => out.push_str(&format!("{:02}", dt.month())),
                    3 => out.push_str(&name[..3]),
                    5 => out.push_str(&name[..1]),
                    _ => out.push_str(name),
                }
            }
            Token::Day(n) => {
                let name = DAY_NAMES[dt.weekday().num_days_from_sunday() as usize];
                match *n {
                    1 => out.push_str(&dt.day().to_string()),
                    2 => out.push_str(&format!("{:02}", dt.day())),
                    3 => out.push_str(&name[..3]),
                    _ => out.push_str(name),
                }
            }
            Token::Hour(n) => {
                let hour = if twelve_hour {
                    match dt.hour() % 12 {
                        0 => 12,
                        h => h,
                    }
                } else {
                    dt.hour()
                };
                push_padded(&mut out, hour as u64, *n);
            }
            Token::Minute(n) => push_padded(&mut out, dt.minute() as u64, *n),
            Token::Second(n) => push_padded(&mut out, dt.second() as u64, *n),
            Token::SubSecond(n) => {
                let ms = dt.nanosecond() / 1_000_000;
                let digits = format!("{:03}", ms);
                out.push('.');
                out.push_str(&digits[..(*n).min(3)]);
                for _ in 3..*n {
                    out.push('0');
                }
            }
            Token::AmPm { short } => {
                let pm = dt.hour() >= 12;
                out.push_str(match (*short, pm) {
                    (false, false) => "AM",
                    (false, true) => "PM",
                    (true, false) => "A",
                    (true, true) => "P",
                });
            }
            Token::ElapsedHours(n) => {
                push_padded(&mut out, (rounded * 24.0).floor() as u64, *n)
            }
            Token::ElapsedMinutes(n) => {
                push_padded(&mut out, (rounded * 1440.0).floor() as u64, *n)
            }
            Token::ElapsedSeconds(n) => {
                push_padded(&mut out, (rounded * 86_400.0).floor() as u64, *n)
            }
        }
    }
    Some(out)
}

fn push_padded(out: &mut String, value: u64, width: usize) {
    out.push_str(&format!("{:0width$}", value, width = width.min(2)));
}
