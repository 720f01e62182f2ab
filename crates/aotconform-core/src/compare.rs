//! Comparison oracle.
//!
//! Three families:
//! - ordered relations (`<, <=, >, >=, ==, !=`), where any NaN operand makes
//!   every relation false except `!=`;
//! - bytecode bias compares `cmpl`/`cmpg`, where an unordered pair yields
//!   the bias (-1 for `cmpl`, +1 for `cmpg`);
//! - [`compare_ordered_f32`]/[`compare_ordered_f64`], a total three-way
//!   compare that places NaN at a caller-chosen extreme.

/// Result layout for relation batteries: `[lt, le, gt, ge, eq, ne]`.
pub type Relations = [bool; 6];

/// Where NaN sorts in [`compare_ordered_f32`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NanOrder {
    /// NaN is greater than every number.
    Greatest,
    /// NaN is less than every number.
    Least,
}

#[must_use]
pub fn relations_i32(a: i32, b: i32) -> Relations {
    [a < b, a <= b, a > b, a >= b, a == b, a != b]
}

#[must_use]
pub fn relations_i64(a: i64, b: i64) -> Relations {
    [a < b, a <= b, a > b, a >= b, a == b, a != b]
}

#[must_use]
pub fn relations_f32(a: f32, b: f32) -> Relations {
    relations_f64(f64::from(a), f64::from(b))
}

#[must_use]
pub fn relations_f64(a: f64, b: f64) -> Relations {
    if a.is_nan() || b.is_nan() {
        return [false, false, false, false, false, true];
    }
    [a < b, a <= b, a > b, a >= b, a == b, a != b]
}

/// `cmpl-float`: unordered yields -1.
#[must_use]
pub fn cmpl_f32(a: f32, b: f32) -> i32 {
    bias_compare(f64::from(a), f64::from(b), -1)
}

/// `cmpg-float`: unordered yields +1.
#[must_use]
pub fn cmpg_f32(a: f32, b: f32) -> i32 {
    bias_compare(f64::from(a), f64::from(b), 1)
}

#[must_use]
pub fn cmpl_f64(a: f64, b: f64) -> i32 {
    bias_compare(a, b, -1)
}

#[must_use]
pub fn cmpg_f64(a: f64, b: f64) -> i32 {
    bias_compare(a, b, 1)
}

fn bias_compare(a: f64, b: f64, bias: i32) -> i32 {
    match a.partial_cmp(&b) {
        Some(std::cmp::Ordering::Less) => -1,
        Some(std::cmp::Ordering::Equal) => 0,
        Some(std::cmp::Ordering::Greater) => 1,
        None => bias,
    }
}

/// Three-way compare with NaN at the `order` extreme.
///
/// Two NaNs compare equal, and `-0.0 == 0.0`.
#[must_use]
pub fn compare_ordered_f32(a: f32, b: f32, order: NanOrder) -> i32 {
    compare_ordered_f64(f64::from(a), f64::from(b), order)
}

#[must_use]
pub fn compare_ordered_f64(a: f64, b: f64, order: NanOrder) -> i32 {
    let nan_rank = match order {
        NanOrder::Greatest => 1,
        NanOrder::Least => -1,
    };
    match (a.is_nan(), b.is_nan()) {
        (true, true) => 0,
        (true, false) => nan_rank,
        (false, true) => -nan_rank,
        (false, false) => bias_compare(a, b, 0),
    }
}

/// `[cmpl(a,b), cmpg(a,b)]` for floats.
#[must_use]
pub fn float_cmp(a: f32, b: f32) -> [i32; 2] {
    [cmpl_f32(a, b), cmpg_f32(a, b)]
}

#[must_use]
pub fn double_cmp(a: f64, b: f64) -> [i32; 2] {
    [cmpl_f64(a, b), cmpg_f64(a, b)]
}

#[cfg(test)]
mod tests {
    use super::*;

    const NANS_32: [f32; 3] = [f32::NAN, -f32::NAN, f32::INFINITY - f32::INFINITY];

    #[test]
    fn nan_makes_ordered_relations_false() {
        for nan in NANS_32 {
            for x in [-5.0f32, 0.0, -0.0, 4.0, f32::INFINITY, f32::NEG_INFINITY, nan] {
                assert_eq!(relations_f32(x, nan), [false, false, false, false, false, true]);
                assert_eq!(relations_f32(nan, x), [false, false, false, false, false, true]);
            }
        }
    }

    #[test]
    fn nan_extreme_compare() {
        for a in [-5.0f32, 0.0, 4.0, f32::MAX, f32::INFINITY] {
            assert_eq!(compare_ordered_f32(a, f32::NAN, NanOrder::Greatest), -1);
            assert_eq!(compare_ordered_f32(f32::NAN, a, NanOrder::Greatest), 1);
            assert_eq!(compare_ordered_f32(a, f32::NAN, NanOrder::Least), 1);
            assert_eq!(compare_ordered_f32(f32::NAN, a, NanOrder::Least), -1);
        }
        assert_eq!(compare_ordered_f64(f64::NAN, f64::NAN, NanOrder::Least), 0);
        assert_eq!(compare_ordered_f64(-0.0, 0.0, NanOrder::Greatest), 0);
    }

    #[test]
    fn bias_compares() {
        assert_eq!(float_cmp(-5.0, 4.0), [-1, -1]);
        assert_eq!(float_cmp(4.0, 4.0), [0, 0]);
        assert_eq!(float_cmp(4.0, -5.0), [1, 1]);
        assert_eq!(float_cmp(4.0, f32::NAN), [-1, 1]);
        assert_eq!(double_cmp(f64::NAN, 4.0), [-1, 1]);
    }

    #[test]
    fn integer_relations() {
        assert_eq!(relations_i32(-5, 4), [true, true, false, false, false, true]);
        assert_eq!(relations_i32(4, 4), [false, true, false, true, true, false]);
        assert_eq!(
            relations_i64(-5, -4_294_967_287),
            [false, false, true, true, false, true]
        );
    }
}
