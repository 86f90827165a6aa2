//! Presentation helpers. Values are only rounded here, never between
//! aggregation steps.

/// Decimal places used when reporting hours.
pub const HOURS_DECIMALS: u32 = 2;

/// Decimal places used when reporting distances.
pub const DISTANCE_DECIMALS: u32 = 3;

/// Round `value` to `decimals` places.
///
/// # Examples
///
/// ```
/// use shift_core::formatting::round_to;
///
/// assert_eq!(round_to(2.5333, 2), 2.53);
/// assert_eq!(round_to(43.7499, 3), 43.75);
/// assert_eq!(round_to(0.0, 2), 0.0);
/// ```
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    // Nudge by a relative epsilon so binary midpoints such as 1.005 round up.
    let epsilon = f64::EPSILON * value.abs() * factor;
    ((value * factor) + epsilon.copysign(value)).round() / factor
}

/// Convert seconds to hours, rounded for reporting.
///
/// # Examples
///
/// ```
/// use shift_core::formatting::seconds_to_hours;
///
/// assert_eq!(seconds_to_hours(9120), 2.53);
/// assert_eq!(seconds_to_hours(5400), 1.5);
/// ```
pub fn seconds_to_hours(seconds: i64) -> f64 {
    round_to(seconds as f64 / 3600.0, HOURS_DECIMALS)
}

/// Round a distance for reporting.
pub fn round_distance(distance: f64) -> f64 {
    round_to(distance, DISTANCE_DECIMALS)
}

/// Format seconds as `HH:MM`, truncating leftover seconds.
///
/// Hours are not wrapped at 24, so long totals stay readable.
///
/// # Examples
///
/// ```
/// use shift_core::formatting::seconds_to_hhmm;
///
/// assert_eq!(seconds_to_hhmm(9120), "02:32");
/// assert_eq!(seconds_to_hhmm(0), "00:00");
/// assert_eq!(seconds_to_hhmm(50_400), "14:00");
/// assert_eq!(seconds_to_hhmm(100 * 3600 + 59), "100:00");
/// ```
pub fn seconds_to_hhmm(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{:02}:{:02}", hours, minutes)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_midpoint() {
        assert_eq!(round_to(1.005, 2), 1.01);
        assert_eq!(round_to(2.0005, 3), 2.001);
    }

    #[test]
    fn test_round_to_negative() {
        assert_eq!(round_to(-1.234, 2), -1.23);
        assert_eq!(round_to(-1.005, 2), -1.01);
    }

    #[test]
    fn test_seconds_to_hours_rounds_two_places() {
        assert_eq!(seconds_to_hours(3600), 1.0);
        assert_eq!(seconds_to_hours(50_400), 14.0);
        // 1000 s = 0.2777… h
        assert_eq!(seconds_to_hours(1000), 0.28);
    }

    #[test]
    fn test_round_distance_three_places() {
        assert_eq!(round_distance(6.25), 6.25);
        assert_eq!(round_distance(1.23456), 1.235);
        assert_eq!(round_distance(0.0004), 0.0);
    }

    #[test]
    fn test_seconds_to_hhmm_truncates_seconds() {
        assert_eq!(seconds_to_hhmm(3599), "00:59");
        assert_eq!(seconds_to_hhmm(26 * 3600), "26:00");
    }

    #[test]
    fn test_seconds_to_hhmm_negative_clamps() {
        assert_eq!(seconds_to_hhmm(-60), "00:00");
    }
}
