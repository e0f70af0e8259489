//! Numeric and display helpers shared by the valuation services.

/// Round half away from negative infinity, matching the rounding used by
/// spreadsheet-style valuation tools (`2.5 -> 3`, `-2.5 -> -2`).
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Round to a fixed number of decimal places using [`round_half_up`].
pub fn round_to(x: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    round_half_up(x * factor) / factor
}

/// Format a currency amount in compact form.
///
/// Billions and millions get a `B`/`M` suffix with two decimals; smaller
/// amounts are printed with two decimals.
pub fn format_compact_currency(amount: f64) -> String {
    const BILLION: f64 = 1_000_000_000.0;
    const MILLION: f64 = 1_000_000.0;

    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();

    if abs >= BILLION {
        format!("{sign}${:.2}B", abs / BILLION)
    } else if abs >= MILLION {
        format!("{sign}${:.2}M", abs / MILLION)
    } else {
        format!("{sign}${abs:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(2.4), 2.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(26.67), 27.0);
    }

    #[test]
    fn test_round_to() {
        assert!((round_to(2279.280_075, 2) - 2279.28).abs() < 1e-9);
        assert!((round_to(0.125, 1) - 0.1).abs() < 1e-9);
        assert_eq!(round_to(42.0, 0), 42.0);
    }

    #[test]
    fn test_format_compact_currency() {
        assert_eq!(format_compact_currency(2_500_000_000.0), "$2.50B");
        assert_eq!(format_compact_currency(12_340_000.0), "$12.34M");
        assert_eq!(format_compact_currency(999.5), "$999.50");
        assert_eq!(format_compact_currency(-3_000_000.0), "-$3.00M");
    }
}
