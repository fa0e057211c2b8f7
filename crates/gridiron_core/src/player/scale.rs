//! Raw rating → [0, 1] scaling rule
//!
//! Roster data arrives on two scales: 0-100 ratings and 0-10000 fixed-point
//! ratings. Values above 1000 are taken as the fixed-point scale.

/// Threshold above which a raw value is read as the 0-10000 scale.
pub const FIXED_POINT_THRESHOLD: f64 = 1000.0;

/// Normalize one raw input. Non-finite values count as absent.
pub fn normalize_raw(raw: f64) -> Option<f64> {
    if !raw.is_finite() {
        return None;
    }
    let scaled = if raw > FIXED_POINT_THRESHOLD {
        raw / 10_000.0
    } else {
        raw / 100.0
    };
    Some(scaled.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_scale() {
        assert_eq!(normalize_raw(75.0), Some(0.75));
        assert_eq!(normalize_raw(0.0), Some(0.0));
        assert_eq!(normalize_raw(1000.0), Some(1.0));
    }

    #[test]
    fn test_fixed_point_scale() {
        assert_eq!(normalize_raw(7500.0), Some(0.75));
        assert_eq!(normalize_raw(1001.0), Some(0.1001));
        assert_eq!(normalize_raw(25_000.0), Some(1.0));
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(normalize_raw(-20.0), Some(0.0));
        assert_eq!(normalize_raw(f64::NAN), None);
        assert_eq!(normalize_raw(f64::INFINITY), None);
    }
}
