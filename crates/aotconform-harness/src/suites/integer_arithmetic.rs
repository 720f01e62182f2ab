use aotconform_core::int_math;
use aotconform_core::{ArrayValue, FaultKind, Scalar};

use super::{fault, int, ints, long, longs, or_fault};
use crate::case::{TestCase, TestSuite};

pub(super) fn suite() -> TestSuite {
    let mut s = TestSuite::new("integer_arithmetic");

    for (name, x, y) in [
        ("int_oper", 70000, -3),
        ("int_oper_wraps", i32::MAX, 2),
        ("int_oper_min_by_minus_one", i32::MIN, -1),
    ] {
        s.push(
            TestCase::call(name, "IntMath.intOper", vec![int(x), int(y)])
                .expect(move || or_fault(int_math::int_oper(x, y).map(ints))),
        );
    }
    s.push(
        TestCase::call("int_oper_zero_divisor", "IntMath.intOper", vec![int(5), int(0)])
            .expect(|| fault(FaultKind::Arithmetic)),
    );

    for (name, x, y) in [
        ("long_oper", 70_000_000_000i64, -3i64),
        ("long_oper_min_by_minus_one", i64::MIN, -1),
    ] {
        s.push(
            TestCase::call(name, "IntMath.longOper", vec![long(x), long(y)])
                .expect(move || or_fault(int_math::long_oper(x, y).map(longs))),
        );
    }
    s.push(
        TestCase::call("long_oper_zero_divisor", "IntMath.longOper", vec![long(1), long(0)])
            .expect(|| fault(FaultKind::Arithmetic)),
    );

    for (name, x) in [("lit16", 77777), ("lit16_negative", -77777)] {
        s.push(
            TestCase::call(name, "IntMath.lit16", vec![int(x)])
                .expect(move || ints(int_math::lit16(x))),
        );
    }
    s.push(
        TestCase::call("lit8", "IntMath.lit8", vec![int(-55555)])
            .expect(|| ints(int_math::lit8(-55555))),
    );

    // Distances at and past the operand width must be masked.
    for (name, v, d) in [
        ("int_shift", 0xff00_aa01_u32 as i32, 8),
        ("int_shift_masked_distance", 0x1234_5678, 36),
        ("int_shift_full_width", i32::MIN, 31),
    ] {
        s.push(
            TestCase::call(name, "IntMath.intShift", vec![int(v), int(d)])
                .expect(move || ints(int_math::int_shift(v, d))),
        );
    }
    for (name, v, d) in [
        ("long_shift", 0x0123_4567_89ab_cdef_i64, 7),
        ("long_shift_masked_distance", i64::MIN, 65),
    ] {
        s.push(
            TestCase::call(name, "IntMath.longShift", vec![long(v), int(d)])
                .expect(move || longs(int_math::long_shift(v, d))),
        );
    }
    for n in [32, 63, 64] {
        s.push(
            TestCase::call(format!("shift_by_{n}"), "IntMath.shiftBy", vec![int(n)])
                .expect(move || longs(int_math::shift_by(n))),
        );
    }

    let bytes = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88];
    s.push(
        TestCase::call(
            "pack_bytes",
            "IntMath.packBytes",
            vec![ArrayValue::Int(bytes.to_vec()).into()],
        )
        .expect(move || longs(int_math::pack_bytes(bytes))),
    );

    s.push(
        TestCase::call(
            "unsigned_shift_sub_int",
            "IntMath.unsignedShift",
            vec![
                Scalar::Byte(-1).into(),
                Scalar::Short(-1).into(),
                Scalar::Char(0xffff).into(),
                int(-1),
                int(2),
            ],
        )
        .expect(|| ints(int_math::unsigned_shift(-1, -1, 0xffff, -1, 2))),
    );
    s.push(
        TestCase::call(
            "conv_int_long",
            "IntMath.convIntLong",
            vec![int(-7), long(0x1_2345_6789)],
        )
        .expect(|| longs(int_math::conv_int_long(-7, 0x1_2345_6789))),
    );
    s.push(
        TestCase::call(
            "char_sub_zero_extends",
            "IntMath.charSub",
            vec![Scalar::Char(3).into(), Scalar::Char(0xffff).into()],
        )
        .expect(|| Scalar::Int(int_math::char_sub(3, 0xffff)).into()),
    );
    s.push(
        TestCase::call("truncate", "IntMath.truncate", vec![int(0xfedc_ba98_u32 as i32)])
            .expect(|| ints(int_math::truncate(0xfedc_ba98_u32 as i32))),
    );

    for (name, i, l) in [("big_divide", 7, 7i64), ("big_divide_minus_one", -1, -1)] {
        s.push(
            TestCase::call(name, "IntMath.bigDivide", vec![int(i), long(l)])
                .expect(move || or_fault(int_math::big_divide(i, l).map(longs))),
        );
    }
    s.push(
        TestCase::call("big_divide_zero", "IntMath.bigDivide", vec![int(0), long(1)])
            .expect(|| fault(FaultKind::Arithmetic)),
    );

    s.push(
        TestCase::call("divide_nonzero", "IntMath.divideByZero", vec![int(5)])
            .expect(|| or_fault(int_math::div32(100, 5).map(Scalar::Int))),
    );
    s.push(
        TestCase::call("unop", "IntMath.unop", vec![int(38)])
            .expect(|| Scalar::Int(int_math::unop(38)).into()),
    );

    for (name, i, l) in [
        ("jlm", -17, -9_000_000_000i64),
        ("jlm_extremes", i32::MIN, i64::MIN),
    ] {
        s.push(
            TestCase::call(name, "IntMath.jlm", vec![int(i), long(l)])
                .expect(move || longs(int_math::jlm(i, l))),
        );
    }
    s.push(
        TestCase::call("div_literal", "IntMath.divLiteral", vec![int(-20), int(40)])
            .expect(|| ints(int_math::div_literal(-20, 40))),
    );
    s
}
