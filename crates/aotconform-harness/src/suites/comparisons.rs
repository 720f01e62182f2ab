//! Ordered relations, bias compares and NaN-extreme compares.

use aotconform_core::Scalar;
use aotconform_core::compare::{self, NanOrder};
use aotconform_core::int_math;

use super::{bools, double, float, int, ints, long};
use crate::case::{TestCase, TestSuite};

pub(super) fn suite() -> TestSuite {
    let mut s = TestSuite::new("comparisons");

    for (name, a, b) in [
        ("relations_int", -1, 1),
        ("relations_int_equal_extremes", i32::MIN, i32::MIN),
    ] {
        s.push(
            TestCase::call(name, "IntMath.relationsInt", vec![int(a), int(b)])
                .expect(move || bools(compare::relations_i32(a, b))),
        );
    }
    s.push(
        TestCase::call(
            "relations_long",
            "IntMath.relationsLong",
            vec![long(i64::MAX), long(i64::MIN)],
        )
        .expect(|| bools(compare::relations_i64(i64::MAX, i64::MIN))),
    );

    // Any NaN operand leaves only `!=` true; signed zeros are equal.
    for (name, a, b) in [
        ("relations_float", 1.5f32, 2.5f32),
        ("relations_float_nan", 1.0, f32::NAN),
        ("relations_float_signed_zero", -0.0, 0.0),
    ] {
        s.push(
            TestCase::call(name, "Compare.relationsFloat", vec![float(a), float(b)])
                .expect(move || bools(compare::relations_f32(a, b))),
        );
    }
    for (name, a, b) in [
        ("relations_double_nan_pair", f64::NAN, f64::NAN),
        ("relations_double_infinities", f64::NEG_INFINITY, f64::INFINITY),
    ] {
        s.push(
            TestCase::call(name, "Compare.relationsDouble", vec![double(a), double(b)])
                .expect(move || bools(compare::relations_f64(a, b))),
        );
    }

    for (name, a, b) in [
        ("float_cmp", 2.0f32, 1.0f32),
        ("float_cmp_nan_bias", f32::NAN, 1.0),
        ("float_cmp_signed_zero", -0.0, 0.0),
    ] {
        s.push(
            TestCase::call(name, "Compare.floatCmp", vec![float(a), float(b)])
                .expect(move || ints(compare::float_cmp(a, b))),
        );
    }
    for (name, a, b) in [("double_cmp", -3.0f64, 4.0f64), ("double_cmp_nan_bias", 1.0, f64::NAN)] {
        s.push(
            TestCase::call(name, "Compare.doubleCmp", vec![double(a), double(b)])
                .expect(move || ints(compare::double_cmp(a, b))),
        );
    }

    let nan_pairs = [
        ("nan_first", f64::NAN, 1.0f64),
        ("nan_second", 1.0, f64::NAN),
        ("both_nan", f64::NAN, f64::NAN),
        ("signed_zero", -0.0, 0.0),
        ("ordered", -2.0, 3.0),
    ];
    for (routine, order, label) in [
        ("Compare.compareNanGreatest", NanOrder::Greatest, "nan_greatest"),
        ("Compare.compareNanLeast", NanOrder::Least, "nan_least"),
    ] {
        for (pair, a, b) in nan_pairs {
            s.push(
                TestCase::call(format!("{label}_{pair}"), routine, vec![double(a), double(b)])
                    .expect(move || Scalar::Int(compare::compare_ordered_f64(a, b, order)).into()),
            );
        }
    }

    for (name, a, b) in [
        ("cmp_long_extremes", i64::MIN, i64::MAX),
        ("cmp_long_equal", 5, 5),
        ("cmp_long_greater", 0, -1),
    ] {
        s.push(
            TestCase::call(name, "IntMath.cmpLong", vec![long(a), long(b)])
                .expect(move || Scalar::Int(int_math::cmp_long(a, b)).into()),
        );
    }
    s
}
