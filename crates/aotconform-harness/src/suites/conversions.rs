use aotconform_core::{Scalar, conv, int_math};

use super::{double, doubles, float, floats, int, ints, long, longs};
use crate::case::{TestCase, TestSuite};
use crate::policy::Policy;

pub(super) fn suite() -> TestSuite {
    let mut s = TestSuite::new("conversions");

    // Float-to-int saturates and sends NaN to zero.
    for (name, l, f, d) in [
        ("conv_i", 0x1_0000_0001_i64, -3.99f32, 1.0e10f64),
        ("conv_i_negative", -0x8000_0001_i64, 2.5e9, -1.0e300),
    ] {
        s.push(
            TestCase::call(
                name,
                "FloatMath.convI",
                vec![long(l), float(f), double(d), float(0.0)],
            )
            .expect(move || ints(conv::conv_i(l, f, d, 0.0))),
        );
    }
    for (name, i, f, d) in [
        ("conv_l", -7, 1.0e20f32, -1.0e30f64),
        ("conv_l_fractional", i32::MAX, -0.75, 9.5e18),
    ] {
        s.push(
            TestCase::call(
                name,
                "FloatMath.convL",
                vec![int(i), float(f), double(d), double(0.0)],
            )
            .expect(move || longs(conv::conv_l(i, f, d, 0.0))),
        );
    }
    s.push(
        TestCase::call(
            "conv_f_rounding",
            "FloatMath.convF",
            vec![int(16_777_217), long(i64::MAX), double(1.0e300)],
        )
        .expect(|| floats(conv::conv_f(16_777_217, i64::MAX, 1.0e300))),
    );
    s.push(
        TestCase::call(
            "conv_d",
            "FloatMath.convD",
            vec![int(i32::MIN), long(i64::MAX), float(0.1)],
        )
        .expect(|| doubles(conv::conv_d(i32::MIN, i64::MAX, 0.1))),
    );

    for (name, i) in [
        ("round_trip_int_max", i32::MAX),
        ("round_trip_int_inexact", 16_777_217),
        ("round_trip_int_min", i32::MIN),
    ] {
        s.push(
            TestCase::call(name, "FloatMath.roundTripInt", vec![int(i)])
                .expect(move || Scalar::Int(conv::round_trip_int(i)).into()),
        );
    }
    for (name, f) in [
        ("round_trip_float_truncates", -2.75f32),
        ("round_trip_float_saturates", 1.0e10),
        ("round_trip_float_nan", f32::NAN),
    ] {
        s.push(
            TestCase::call(name, "FloatMath.roundTripFloat", vec![float(f)])
                .expect(move || Scalar::Float(conv::round_trip_float(f)).into()),
        );
    }

    // Only the low word of the narrowed long is defined by the fixture.
    s.push(
        TestCase::call(
            "narrow_low_word",
            "IntMath.convIntLong",
            vec![int(-1), long(0x7fff_ffff_0000_0001)],
        )
        .expect(|| longs(int_math::conv_int_long(-1, 0x7fff_ffff_0000_0001)))
        .with_policy(Policy::Masked { mask: 0xffff_ffff }),
    );
    s
}
