//! Bit-exact floating point. Everything compared with a tolerance later
//! depends on these passing first.

use aotconform_core::{Scalar, float_math};

use super::{double, doubles, float, floats};
use crate::case::{TestCase, TestSuite};

pub(super) fn suite() -> TestSuite {
    let mut s = TestSuite::new("float_baseline").float_baseline();

    for (name, x, y) in [
        ("float_oper", 70000.0f32, -3.0f32),
        ("float_oper_fractional", 123.456, -3.875),
        ("float_oper_huge", f32::MAX, 0.5),
    ] {
        s.push(
            TestCase::call(name, "FloatMath.floatOper", vec![float(x), float(y)])
                .expect(move || floats(float_math::float_oper(x, y))),
        );
    }
    for (name, x, y) in [
        ("double_oper", 70000.0f64, -3.0f64),
        ("double_oper_fractional", 123.456, -3.875),
        ("double_oper_subnormal", f64::from_bits(1), 2.0),
    ] {
        s.push(
            TestCase::call(name, "FloatMath.doubleOper", vec![double(x), double(y)])
                .expect(move || doubles(float_math::double_oper(x, y))),
        );
    }

    // Negating zero must flip the sign bit, not compute `0 - x`.
    for (name, f) in [("negate_float_zero", 0.0f32), ("negate_float", -17.5)] {
        s.push(
            TestCase::call(name, "FloatMath.negateFloat", vec![float(f)])
                .expect(move || Scalar::Float(float_math::negate_f32(f)).into()),
        );
    }
    for (name, d) in [("negate_double_zero", -0.0f64), ("negate_double", 2.25)] {
        s.push(
            TestCase::call(name, "FloatMath.negateDouble", vec![double(d)])
                .expect(move || Scalar::Double(float_math::negate_f64(d)).into()),
        );
    }

    s.push(
        TestCase::call("float_consts", "FloatMath.floatConsts", Vec::new())
            .expect(|| floats(float_math::float_consts())),
    );
    s.push(
        TestCase::call("double_consts", "FloatMath.doubleConsts", Vec::new())
            .expect(|| doubles(float_math::double_consts())),
    );

    for (name, f) in [("jlm_float", -7.25f32), ("jlm_float_zero", 0.0), ("jlm_float_tie", -5.0)] {
        s.push(
            TestCase::call(name, "FloatMath.jlmFloat", vec![float(f)])
                .expect(move || floats(float_math::jlm_float(f))),
        );
    }
    for (name, d) in [("jlm_double", 7.5f64), ("jlm_double_negative_zero", -0.0)] {
        s.push(
            TestCase::call(name, "FloatMath.jlmDouble", vec![double(d)])
                .expect(move || doubles(float_math::jlm_double(d))),
        );
    }
    s
}
