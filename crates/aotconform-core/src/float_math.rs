//! Floating-point arithmetic oracle.
//!
//! Basic IEEE operations are correctly rounded, so these batteries are
//! compared bit-exactly. `min`/`max` follow the managed-language rules
//! (NaN-propagating, `-0.0 < 0.0`) which differ from `f32::min`.

/// Binary operator battery over two floats.
///
/// Layout: `x+y, x-y, x*y, x/y, x%-y, (x+y)*(x-y), -x, -(x*0), x/x`.
#[must_use]
pub fn float_oper(x: f32, y: f32) -> [f32; 9] {
    [
        x + y,
        x - y,
        x * y,
        x / y,
        x % -y,
        (x + y) * (x - y),
        -x,
        -(x * 0.0),
        x / x,
    ]
}

/// 64-bit counterpart of [`float_oper`].
#[must_use]
pub fn double_oper(x: f64, y: f64) -> [f64; 9] {
    [
        x + y,
        x - y,
        x * y,
        x / y,
        x % -y,
        (x + y) * (x - y),
        -x,
        -(x * 0.0),
        x / x,
    ]
}

#[must_use]
pub fn negate_f32(f: f32) -> f32 {
    -f
}

#[must_use]
pub fn negate_f64(d: f64) -> f64 {
    -d
}

/// Constants a code generator must materialize exactly.
#[must_use]
pub fn float_consts() -> [f32; 6] {
    [
        10.0,
        -1.0,
        f32::MAX,
        f32::from_bits(1),
        -0.0,
        f32::INFINITY,
    ]
}

#[must_use]
pub fn double_consts() -> [f64; 6] {
    [
        10.0,
        -1.0,
        f64::MAX,
        f64::from_bits(1),
        -0.0,
        f64::NEG_INFINITY,
    ]
}

#[must_use]
pub fn min_f32(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        return f32::NAN;
    }
    if a == 0.0 && b == 0.0 {
        return if a.is_sign_negative() { a } else { b };
    }
    if a < b { a } else { b }
}

#[must_use]
pub fn max_f32(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        return f32::NAN;
    }
    if a == 0.0 && b == 0.0 {
        return if a.is_sign_positive() { a } else { b };
    }
    if a > b { a } else { b }
}

#[must_use]
pub fn min_f64(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a == 0.0 && b == 0.0 {
        return if a.is_sign_negative() { a } else { b };
    }
    if a < b { a } else { b }
}

#[must_use]
pub fn max_f64(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a == 0.0 && b == 0.0 {
        return if a.is_sign_positive() { a } else { b };
    }
    if a > b { a } else { b }
}

/// `abs(f), abs(-f), min(f,-5), max(f,-5)`.
#[must_use]
pub fn jlm_float(ff: f32) -> [f32; 4] {
    [
        f32::from_bits(ff.to_bits() & 0x7fff_ffff),
        f32::from_bits((-ff).to_bits() & 0x7fff_ffff),
        min_f32(ff, -5.0),
        max_f32(ff, -5.0),
    ]
}

#[must_use]
pub fn jlm_double(dd: f64) -> [f64; 4] {
    [
        f64::from_bits(dd.to_bits() & 0x7fff_ffff_ffff_ffff),
        f64::from_bits((-dd).to_bits() & 0x7fff_ffff_ffff_ffff),
        min_f64(dd, -5.0),
        max_f64(dd, -5.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_oper_fixture() {
        let r = float_oper(70000.0, -3.0);
        assert_eq!(r[0], 69997.0);
        assert_eq!(r[1], 70003.0);
        assert_eq!(r[2], -210000.0);
        assert_eq!(r[4], 1.0);
        assert_eq!(r[6], -70000.0);
        assert_eq!(r[7].to_bits(), (-0.0f32).to_bits());
        assert_eq!(r[8], 1.0);
    }

    #[test]
    fn double_oper_fixture() {
        let r = double_oper(70000.0, -3.0);
        assert_eq!(r[3], 70000.0 / -3.0);
        assert_eq!(r[5], 69997.0 * 70003.0);
        assert!(r[7].is_sign_negative());
    }

    #[test]
    fn min_max_rules() {
        assert!(min_f32(f32::NAN, 1.0).is_nan());
        assert!(max_f64(1.0, f64::NAN).is_nan());
        assert!(min_f32(0.0, -0.0).is_sign_negative());
        assert!(max_f32(-0.0, 0.0).is_sign_positive());
        assert_eq!(jlm_float(123.456), [123.456, 123.456, -5.0, 123.456]);
        assert_eq!(jlm_double(-2.5)[..2], [2.5, 2.5]);
    }
}
