use chrono::NaiveDate;

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use vahan_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a scaled epsilon so exact binary midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` is "0.xx"; keep ".xx".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a registration count with thousands separators.
///
/// ```
/// use vahan_core::formatting::format_count;
///
/// assert_eq!(format_count(1_250_000), "1,250,000");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a fractional growth rate as a signed percentage with one decimal,
/// or `"n/a"` when the rate is undefined.
///
/// ```
/// use vahan_core::formatting::format_pct;
///
/// assert_eq!(format_pct(Some(0.5)), "+50.0%");
/// assert_eq!(format_pct(Some(-0.125)), "-12.5%");
/// assert_eq!(format_pct(Some(0.0)), "0.0%");
/// assert_eq!(format_pct(None), "n/a");
/// ```
pub fn format_pct(rate: Option<f64>) -> String {
    match rate {
        None => "n/a".to_string(),
        Some(r) => {
            let body = format_number(r * 100.0, 1);
            if body.starts_with('-') || body == "0.0" {
                format!("{}%", body)
            } else {
                format!("+{}%", body)
            }
        }
    }
}

/// Month label used in headings, e.g. `"Jan 2023"`.
pub fn format_month(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
