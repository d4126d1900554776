//! Text formatting for KPI tiles and table cells

/// Formats a number with "." thousands separators and "," as decimal mark
///
/// # Examples
///
/// ```
/// use dashboard_client::shared::format::format_number_with_decimals;
///
/// assert_eq!(format_number_with_decimals(1234.567, 2), "1.234,57");
/// ```
pub fn format_number_with_decimals(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);

    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };

    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    match decimal_part {
        Some(d) => format!("{}{},{}", sign, grouped, d),
        None => format!("{}{}", sign, grouped),
    }
}

/// Money in Brazilian reais: "R$ 1.234,56"
pub fn format_brl(value: f64) -> String {
    format!("R$ {}", format_number_with_decimals(value, 2))
}

/// Minutes with one decimal, "-" when unavailable
pub fn format_minutes(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.1} min", v),
        _ => "-".to_string(),
    }
}

/// Satisfaction score with two decimals, "-" when unavailable
pub fn format_score(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "-".to_string(),
    }
}

/// Percentage already on the 0-100 scale: "81.4%"
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.1}%", v),
        _ => "-".to_string(),
    }
}

/// Fraction in [0, 1] shown as a percentage: 0.125 -> "12.5%"
pub fn format_fraction(value: f64) -> String {
    format_percent(Some(value * 100.0))
}
