//! Numeric conversion oracle.
//!
//! Floating-to-integer conversions truncate toward zero, map NaN to 0 and
//! saturate at the integer extremes. The range checks are written out
//! against the exact power-of-two bounds instead of relying on `as`.

const TWO_POW_31: f64 = 2_147_483_648.0;
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

#[must_use]
pub fn f64_to_i32(d: f64) -> i32 {
    if d.is_nan() {
        0
    } else if d >= TWO_POW_31 {
        i32::MAX
    } else if d <= -TWO_POW_31 {
        i32::MIN
    } else {
        d.trunc() as i32
    }
}

#[must_use]
pub fn f64_to_i64(d: f64) -> i64 {
    if d.is_nan() {
        0
    } else if d >= TWO_POW_63 {
        i64::MAX
    } else if d <= -TWO_POW_63 {
        i64::MIN
    } else {
        d.trunc() as i64
    }
}

// Every f32 is exactly representable as f64, so widening first is lossless.

#[must_use]
pub fn f32_to_i32(f: f32) -> i32 {
    f64_to_i32(f64::from(f))
}

#[must_use]
pub fn f32_to_i64(f: f32) -> i64 {
    f64_to_i64(f64::from(f))
}

/// Round-to-nearest-even.
#[must_use]
pub fn i32_to_f32(i: i32) -> f32 {
    i as f32
}

#[must_use]
pub fn i64_to_f32(l: i64) -> f32 {
    l as f32
}

#[must_use]
pub fn i32_to_f64(i: i32) -> f64 {
    f64::from(i)
}

#[must_use]
pub fn i64_to_f64(l: i64) -> f64 {
    l as f64
}

#[must_use]
pub fn f64_to_f32(d: f64) -> f32 {
    d as f32
}

#[must_use]
pub fn f32_to_f64(f: f32) -> f64 {
    f64::from(f)
}

/// int → float → int. Saturates for values whose float rounding leaves the
/// int range (e.g. `i32::MAX` rounds up to 2^31).
#[must_use]
pub fn round_trip_int(i: i32) -> i32 {
    f32_to_i32(i32_to_f32(i))
}

/// float → int → float.
#[must_use]
pub fn round_trip_float(f: f32) -> f32 {
    i32_to_f32(f32_to_i32(f))
}

/// Conversions to int.
///
/// Layout: `(int) l, (int) f, (int) d, (int) (1/zero), (int) (-1/zero), (int) NaN`
/// where the last three are produced from the float `zero` argument.
#[must_use]
pub fn conv_i(l: i64, f: f32, d: f64, zero: f32) -> [i32; 6] {
    let inf = 1.0f32 / zero;
    [
        crate::int_math::long_to_int(l),
        f32_to_i32(f),
        f64_to_i32(d),
        f32_to_i32(inf),
        f32_to_i32(-1.0 / zero),
        f32_to_i32(inf / inf),
    ]
}

/// Conversions to long, same layout as [`conv_i`] with a double `zero`.
#[must_use]
pub fn conv_l(i: i32, f: f32, d: f64, zero: f64) -> [i64; 6] {
    let inf = 1.0f64 / zero;
    [
        i64::from(i),
        f32_to_i64(f),
        f64_to_i64(d),
        f64_to_i64(inf),
        f64_to_i64(-1.0 / zero),
        f64_to_i64(inf / inf),
    ]
}

/// `[(float) i, (float) l, (float) d]`.
#[must_use]
pub fn conv_f(i: i32, l: i64, d: f64) -> [f32; 3] {
    [i32_to_f32(i), i64_to_f32(l), f64_to_f32(d)]
}

/// `[(double) i, (double) l, (double) f]`.
#[must_use]
pub fn conv_d(i: i32, l: i64, f: f32) -> [f64; 3] {
    [i32_to_f64(i), i64_to_f64(l), f32_to_f64(f)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturation_and_nan() {
        assert_eq!(f32_to_i32(f32::NAN), 0);
        assert_eq!(f32_to_i32(3.0e10), i32::MAX);
        assert_eq!(f32_to_i32(-3.0e10), i32::MIN);
        assert_eq!(f64_to_i64(f64::INFINITY), i64::MAX);
        assert_eq!(f64_to_i64(f64::NEG_INFINITY), i64::MIN);
        assert_eq!(f64_to_i32(-3.875), -3);
        assert_eq!(f64_to_i32(2_147_483_647.9), i32::MAX);
    }

    #[test]
    fn round_trip_saturates_instead_of_wrapping() {
        assert_eq!(round_trip_int(i32::MIN), i32::MIN);
        assert_eq!(round_trip_int(i32::MAX), i32::MAX);
        assert_eq!(round_trip_float(-3.0e9), -2_147_483_648.0);
        assert_eq!(round_trip_float(3.0e9), 2_147_483_648.0);
    }

    #[test]
    fn conv_fixtures() {
        assert_eq!(
            conv_i(0x8877_6655_4433_2211_u64 as i64, 123.456, -3.875, 0.0),
            [0x4433_2211, 123, -3, i32::MAX, i32::MIN, 0]
        );
        assert_eq!(
            conv_l(0x8877_6655_u32 as i32, 123.456, -3.875, 0.0),
            [0xffff_ffff_8877_6655_u64 as i64, 123, -3, i64::MAX, i64::MIN, 0]
        );
        let f = conv_f(0x8877_6655_u32 as i32, 0x8877_6655_4433_2211_u64 as i64, -3.875);
        assert_eq!(f[0], -2_005_440_939.0);
        assert_eq!(f[2], -3.875f32);
        let d = conv_d(0x8877_6655_u32 as i32, 0x8877_6655_4433_2211_u64 as i64, 123.456);
        assert_eq!(d[0], -2_005_440_939.0);
        assert_eq!(d[2], f64::from(123.456f32));
    }
}
