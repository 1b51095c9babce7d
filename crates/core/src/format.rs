//! Display formatting for prices, market caps, and percent changes.
//!
//! These are the threshold rules the dashboard UI renders with. All
//! computation elsewhere in the crate stays full-precision; rounding
//! happens only here.

/// Format a price with precision scaled to its magnitude:
/// thousands-grouped with 2 decimals above 1000, then 2 / 4 / 6 decimals
/// as the price shrinks, and 8 decimals below 0.0001.
pub fn format_price(price: f64) -> String {
    let abs = price.abs();
    if abs >= 1000.0 {
        group_thousands(price, 2)
    } else if abs >= 1.0 {
        format!("{price:.2}")
    } else if abs >= 0.01 {
        format!("{price:.4}")
    } else if abs >= 0.0001 {
        format!("{price:.6}")
    } else {
        format!("{price:.8}")
    }
}

/// Format a market cap with a magnitude suffix: trillions, billions, or
/// millions with 2 decimals; smaller values thousands-grouped.
pub fn format_market_cap(value: f64) -> String {
    if value >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else {
        group_thousands(value, 0)
    }
}

/// Format a percent change with an explicit sign and 2 decimals,
/// e.g. "+400.00%" / "-12.34%".
pub fn format_change(change_pct: f64) -> String {
    if change_pct >= 0.0 {
        format!("+{change_pct:.2}%")
    } else {
        format!("{change_pct:.2}%")
    }
}

/// Fixed-decimal formatting with `,` separators every three integer digits.
fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{value:.decimals$}");
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
