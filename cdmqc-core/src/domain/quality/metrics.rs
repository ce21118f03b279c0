// cdmqc-core/src/domain/quality/metrics.rs
//
// Ratio arithmetic shared by the single-schema checks. Two different
// division policies exist in this report and they must not be conflated:
//   - "share of total" denominators of 0 yield 0 (here),
//   - "percent change" denominators of 0 yield None (compare.rs).

/// Rounds to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Percentage of `part` over `total`, rounded. A zero denominator is a valid
/// empty-table state, not an error: the share is 0.
pub fn share_of_total(part: i64, total: i64, decimals: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to((part as f64 * 100.0) / total as f64, decimals)
}

/// Fixed-decimal display, matching the published tables (11.1, -5.00, ...).
pub fn format_percentage(value: f64, decimals: u32) -> String {
    format!("{value:.prec$}", prec = decimals as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_rounds_to_one_decimal() {
        // 10 orphans over 90 distinct ids in the table -> 11.1%.
        assert_eq!(share_of_total(10, 90, 1), 11.1);
    }

    #[test]
    fn test_share_two_decimals() {
        assert_eq!(share_of_total(1, 3, 2), 33.33);
    }

    #[test]
    fn test_zero_denominator_is_zero_not_an_error() {
        assert_eq!(share_of_total(0, 0, 1), 0.0);
        assert_eq!(share_of_total(5, 0, 2), 0.0);
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(11.1, 1), "11.1");
        assert_eq!(format_percentage(0.0, 2), "0.00");
    }
}
