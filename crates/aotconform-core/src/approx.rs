//! Tolerance comparison, for use only after the exact floating-point
//! baseline has passed.

/// `|a - b| < max_delta`, written as the two one-sided differences so that
/// no intermediate negation is needed. False whenever either side is NaN.
#[must_use]
pub fn approx_equal_f32(a: f32, b: f32, max_delta: f32) -> bool {
    if a > b {
        (a - b) < max_delta
    } else {
        (b - a) < max_delta
    }
}

#[must_use]
pub fn approx_equal_f64(a: f64, b: f64, max_delta: f64) -> bool {
    if a > b {
        (a - b) < max_delta
    } else {
        (b - a) < max_delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_exclusive() {
        assert!(approx_equal_f32(1.0, 1.0, 0.001));
        assert!(approx_equal_f64(123456.78987654321, 123456.7899, 0.001));
        assert!(!approx_equal_f64(1.0, 1.5, 0.5));
        assert!(!approx_equal_f32(1.0, 1.0, 0.0));
    }

    #[test]
    fn nan_never_approximates() {
        assert!(!approx_equal_f32(f32::NAN, f32::NAN, f32::INFINITY));
        assert!(!approx_equal_f64(1.0, f64::NAN, 1.0e300));
    }
}
