use super::{render_literal, syntax_chars};

/// Render a number through a numeric section.
///
/// `value` is already sign-adjusted for the chosen section; with
/// `auto_negative` a minus sign is prefixed to negative values.
pub(crate) fn format_number(value: f64, section: &str, auto_negative: bool) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let syntax = syntax_chars(section);
    let percent = syntax.iter().filter(|(_, c)| *c == '%').count();
    let mut placeholders = syntax
        .iter()
        .filter(|(_, c)| matches!(c, '0' | '#' | '?'))
        .map(|(idx, _)| *idx);

    let Some(start) = placeholders.next() else {
        let mut out = render_literal(section);
        if value < 0.0 && auto_negative {
            out.insert(0, '-');
        }
        return out;
    };
    let last = placeholders.last().unwrap_or(start);

    // trailing scaling commas belong to the number
    let bytes = section.as_bytes();
    let mut end = last + 1;
    while end < bytes.len() && bytes[end] == b',' {
        end += 1;
    }

    let prefix = render_literal(&section[..start]);
    let suffix = render_literal(&section[end..]);
    let body = &section[start..end];

    let mut v = value.abs();
    for _ in 0..percent {
        v *= 100.0;
    }

    let out = if let Some(spec) = FractionSpec::parse(body) {
        spec.render(v)
    } else if let Some(spec) = ScientificSpec::parse(body) {
        spec.render(v)
    } else {
        FixedSpec::parse(body).render(v)
    };

    let mut s = format!("{prefix}{out}{suffix}");
    if value < 0.0 && auto_negative && out.chars().any(|c| c.is_ascii_digit() && c != '0') {
        s.insert(0, '-');
    }
    s
}

/// `General` in a section other than the first
pub(crate) fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string().replace('e', "E")
}

#[derive(Debug, Default)]
struct FixedSpec {
    min_int: usize,
    min_frac: usize,
    max_frac: usize,
    grouping: bool,
    scale: i32,
}

impl FixedSpec {
    fn parse(body: &str) -> Self {
        let mut spec = FixedSpec::default();
        let syntax = syntax_chars(body);
        let mut seen_decimal = false;
        let mut seen_placeholder = false;
        let mut pending_commas = 0;

        for (_, ch) in syntax {
            match ch {
                '.' if !seen_decimal => {
                    seen_decimal = true;
                    pending_commas = 0;
                }
                '0' | '#' | '?' => {
                    if pending_commas > 0 && !seen_decimal {
                        spec.grouping = true;
                    }
                    pending_commas = 0;
                    seen_placeholder = true;
                    if seen_decimal {
                        spec.max_frac += 1;
                        if ch == '0' {
                            spec.min_frac = spec.max_frac;
                        }
                    } else if ch == '0' {
                        spec.min_int += 1;
                    }
                }
                ',' if seen_placeholder => pending_commas += 1,
                _ => {}
            }
        }
        spec.scale = pending_commas;
        spec
    }

    fn render(&self, value: f64) -> String {
        let scaled = value / 1000f64.powi(self.scale);
        let rendered = format!("{:.*}", self.max_frac, scaled);
        let (int_raw, frac_raw) = rendered.split_once('.').unwrap_or((&rendered, ""));

        let mut int_part = int_raw.trim_start_matches('0').to_string();
        if int_part.len() < self.min_int {
            int_part = format!("{}{}", "0".repeat(self.min_int - int_part.len()), int_part);
        }
        if self.grouping {
            int_part = group_thousands(&int_part);
        }

        let mut frac_part = frac_raw.to_string();
        while frac_part.len() > self.min_frac && frac_part.ends_with('0') {
            frac_part.pop();
        }

        if self.max_frac > 0 && (!frac_part.is_empty() || self.min_frac > 0) {
            format!("{int_part}.{frac_part}")
        } else if self.max_frac > 0 && self.min_int == 0 && int_part.is_empty() {
            "0".to_string()
        } else {
            int_part
        }
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug)]
struct ScientificSpec {
    mantissa: FixedSpec,
    exp_digits: usize,
    always_sign: bool,
}

impl ScientificSpec {
    fn parse(body: &str) -> Option<Self> {
        let syntax = syntax_chars(body);
        let pos = syntax
            .iter()
            .position(|(_, c)| matches!(c, 'E' | 'e'))?;
        let (idx, _) = syntax[pos];
        let sign = syntax.get(pos + 1).map(|(_, c)| *c)?;
        if sign != '+' && sign != '-' {
            return None;
        }
        let exp_digits = syntax[pos + 2..]
            .iter()
            .filter(|(_, c)| matches!(c, '0' | '#' | '?'))
            .count()
            .max(1);
        Some(Self {
            mantissa: FixedSpec::parse(&body[..idx]),
            exp_digits,
            always_sign: sign == '+',
        })
    }

    fn render(&self, value: f64) -> String {
        let mut exponent = if value == 0.0 {
            0
        } else {
            value.abs().log10().floor() as i32
        };
        let mut mantissa = value / 10f64.powi(exponent);

        // rounding may carry the mantissa to 10
        let rounded: f64 = format!("{:.*}", self.mantissa.max_frac, mantissa)
            .parse()
            .unwrap_or(mantissa);
        if rounded >= 10.0 {
            exponent += 1;
            mantissa = value / 10f64.powi(exponent);
        }

        let sign = if exponent < 0 {
            "-"
        } else if self.always_sign {
            "+"
        } else {
            ""
        };
        format!(
            "{}E{}{:0width$}",
            self.mantissa.render(mantissa),
            sign,
            exponent.unsigned_abs(),
            width = self.exp_digits
        )
    }
}

#[derive(Debug)]
struct FractionSpec {
    whole: bool,
    denominator: Denominator,
}

#[derive(Debug)]
enum Denominator {
    Fixed(u64),
    MaxDigits(u32),
}

impl FractionSpec {
    fn parse(body: &str) -> Option<Self> {
        let syntax = syntax_chars(body);
        let slash = syntax.iter().position(|(_, c)| *c == '/')?;

        let before = &syntax[..slash];
        // a gap between placeholder groups separates the whole part
        let whole = before
            .iter()
            .skip_while(|(_, c)| !matches!(c, '0' | '#' | '?'))
            .skip_while(|(_, c)| matches!(c, '0' | '#' | '?' | ','))
            .any(|(_, c)| matches!(c, '0' | '#' | '?'));

        let after: String = syntax[slash + 1..]
            .iter()
            .map(|(_, c)| *c)
            .take_while(|c| c.is_ascii_digit() || matches!(c, '#' | '?'))
            .collect();
        let denominator = if !after.is_empty() && after.chars().all(|c| c.is_ascii_digit()) {
            Denominator::Fixed(after.parse().ok().filter(|d| *d > 0)?)
        } else {
            Denominator::MaxDigits(after.len().clamp(1, 4) as u32)
        };
        Some(Self { whole, denominator })
    }

    fn render(&self, value: f64) -> String {
        let (mut int, frac) = if self.whole {
            (value.trunc() as u64, value.fract())
        } else {
            (0, value)
        };

        let (mut num, den) = match self.denominator {
            Denominator::Fixed(den) => ((frac * den as f64).round() as u64, den),
            Denominator::MaxDigits(digits) => best_fraction(frac, 10u64.pow(digits) - 1),
        };
        if self.whole && num == den {
            int += 1;
            num = 0;
        }

        match (self.whole, int, num) {
            (true, int, 0) => int.to_string(),
            (true, 0, num) => format!("{num}/{den}"),
            (true, int, num) => format!("{int} {num}/{den}"),
            (false, _, num) => format!("{num}/{den}"),
        }
    }
}

/// Closest `num/den` to `value` with `den <= max_den`
fn best_fraction(value: f64, max_den: u64) -> (u64, u64) {
    let mut best = ((value.round()) as u64, 1);
    let mut best_err = (value - best.0 as f64).abs();
    for den in 2..=max_den {
        let num = (value * den as f64).round();
        let err = (value - num / den as f64).abs();
        if err < best_err - f64::EPSILON {
            best = (num as u64, den);
            best_err = err;
        }
    }
    best
}
