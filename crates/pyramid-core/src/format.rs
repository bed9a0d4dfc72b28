// crates/pyramid-core/src/format.rs

//! Compact number formatting for labels and tooltips. At most two decimals.

const MAX_DECIMALS: usize = 2;

/// `1_234_567.0` → `"1.23M"`; `0.0` → `"0"`.
///
/// ```rust
/// use pyramid_core::format::format_compact;
///
/// assert_eq!(format_compact(1_420_000_000.0, 2), "1.42B");
/// assert_eq!(format_compact(56_000.0, 0), "56K");
/// assert_eq!(format_compact(999.0, 1), "999.0");
/// ```
pub fn format_compact(n: f64, decimals: usize) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    let d = decimals.min(MAX_DECIMALS);
    let abs = n.abs();
    if abs >= 1e9 {
        format!("{:.*}B", d, n / 1e9)
    } else if abs >= 1e6 {
        format!("{:.*}M", d, n / 1e6)
    } else if abs >= 1e3 {
        format!("{:.*}K", d, n / 1e3)
    } else {
        format!("{:.*}", d, n)
    }
}

pub fn format_population(n: u64) -> String {
    format_compact(n as f64, MAX_DECIMALS)
}

pub fn format_percent(n: f64, decimals: usize) -> String {
    if n == 0.0 {
        return "0%".to_string();
    }
    format!("{:.*}%", decimals.min(MAX_DECIMALS), n)
}

/// Growth rate with an explicit sign: `"+1.25%"`, `"-0.40%"`.
pub fn format_growth(rate: f64) -> String {
    let sign = if rate >= 0.0 { "+" } else { "" };
    format!("{sign}{rate:.2}%")
}

/// Table cell: an em dash for zero.
pub fn format_table_number(n: f64) -> String {
    if n == 0.0 {
        "\u{2014}".to_string()
    } else {
        format_compact(n, MAX_DECIMALS)
    }
}

/// `None` renders as "n/a".
pub fn format_optional_percent(n: Option<f64>) -> String {
    n.map(|v| format_percent(v, MAX_DECIMALS))
        .unwrap_or_else(|| "n/a".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_keeps_sign() {
        assert_eq!(format_growth(1.254), "+1.25%");
        assert_eq!(format_growth(-0.4), "-0.40%");
        assert_eq!(format_growth(0.0), "+0.00%");
    }

    #[test]
    fn decimals_are_capped() {
        assert_eq!(format_percent(12.34567, 5), "12.35%");
        assert_eq!(format_compact(2_500_000.0, 9), "2.50M");
    }

    #[test]
    fn zero_and_missing_cells() {
        assert_eq!(format_table_number(0.0), "\u{2014}");
        assert_eq!(format_optional_percent(None), "n/a");
    }
}
