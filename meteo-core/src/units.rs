//! Rounding and defaulting of provider measurements.
//!
//! Continuous measurements (temperatures, precipitation) collapse to `0.0`
//! when absent; optional quantities (pressure, probabilities, wind direction)
//! stay `None`.

/// Round `value` to `decimals` places, half away from zero.
///
/// Callers substitute a default for missing values before rounding.
pub fn round(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// One-decimal rounding, the precision used for almost every snapshot field.
pub fn round1(value: f64) -> f64 {
    round(value, 1)
}

pub fn or_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Round a percentage to an integer in `0..=100`.
pub fn percent(value: Option<f64>) -> Option<u8> {
    value
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, 100.0) as u8)
}

/// Sample at `idx` of a series whose entries may be null.
pub fn value_at(series: &[Option<f64>], idx: usize) -> Option<f64> {
    series.get(idx).copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round(1.05, 1), 1.1);
        assert_eq!(round(1.0, 1), 1.0);
        assert_eq!(round(-2.25, 1), -2.3);
        assert_eq!(round(2.5, 0), 3.0);
    }

    #[test]
    fn rounding_honours_precision() {
        assert_eq!(round(12.3456, 2), 12.35);
        assert_eq!(round(12.3456, 0), 12.0);
    }

    #[test]
    fn rounding_is_idempotent() {
        for value in [0.0, 1.05, 7.449, -3.351, 18.95, 1013.26, 99.99] {
            let once = round1(value);
            assert_eq!(round1(once), once, "value {value}");
        }
    }

    #[test]
    fn percent_clamps_and_rounds() {
        assert_eq!(percent(Some(44.6)), Some(45));
        assert_eq!(percent(Some(130.0)), Some(100));
        assert_eq!(percent(Some(-1.0)), Some(0));
        assert_eq!(percent(Some(f64::NAN)), None);
        assert_eq!(percent(None), None);
    }

    #[test]
    fn value_at_handles_gaps_and_short_series() {
        let series = vec![Some(1.0), None, Some(3.0)];
        assert_eq!(value_at(&series, 0), Some(1.0));
        assert_eq!(value_at(&series, 1), None);
        assert_eq!(value_at(&series, 7), None);
        assert_eq!(or_zero(value_at(&series, 1)), 0.0);
    }
}
