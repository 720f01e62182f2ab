//! Instance field stores and loads at every primitive width.

use aotconform_abi::Arg;
use aotconform_core::objects::TypeDesc;
use aotconform_core::{ArrayValue, FaultKind, Outcome, Scalar};

use super::{fault, long};
use crate::case::{TestCase, TestSuite};

fn inst_field() -> Arg {
    Arg::New(TypeDesc::class("InstField"))
}

pub(super) fn suite() -> TestSuite {
    let mut s = TestSuite::new("fields");

    for (name, values) in [
        (
            "assign_fields",
            [
                Scalar::Bool(true),
                Scalar::Byte(-128),
                Scalar::Char(0xfffe),
                Scalar::Short(-32768),
                Scalar::Int(i32::MIN),
                Scalar::Long(0x0123_4567_89ab_cdef),
                Scalar::Float(-0.0),
                Scalar::Double(f64::MIN_POSITIVE),
            ],
        ),
        (
            "assign_fields_zeroes",
            [
                Scalar::Bool(false),
                Scalar::Byte(0),
                Scalar::Char(0),
                Scalar::Short(0),
                Scalar::Int(0),
                Scalar::Long(0),
                Scalar::Float(0.0),
                Scalar::Double(0.0),
            ],
        ),
    ] {
        s.push(
            TestCase::call(
                name,
                "InstField.assignFields",
                values.iter().copied().map(Arg::from).collect(),
            )
            .expect(move || ArrayValue::Long(values.iter().map(Scalar::widened).collect()).into()),
        );
    }

    s.push(
        TestCase::call("read_int_fresh", "InstField.readInt", vec![inst_field()])
            .expect(|| Scalar::Int(0).into()),
    );
    s.push(
        TestCase::call("read_int_null", "InstField.readInt", vec![Arg::Null])
            .expect(|| fault(FaultKind::NullPointer)),
    );
    s.push(
        TestCase::call(
            "write_int",
            "InstField.writeInt",
            vec![inst_field(), Scalar::Int(5).into()],
        )
        .expect(|| Outcome::Unit),
    );
    s.push(
        TestCase::call(
            "write_int_null",
            "InstField.writeInt",
            vec![Arg::Null, Scalar::Int(5).into()],
        )
        .expect(|| fault(FaultKind::NullPointer)),
    );

    // A volatile long must not tear into two halves.
    for (name, v) in [
        ("volatile_long_min", i64::MIN),
        ("volatile_long_mixed", -0x7fff_ffff_0000_0001),
    ] {
        s.push(
            TestCase::call(name, "InstField.volatileLong", vec![long(v)])
                .expect(move || Scalar::Long(v).into()),
        );
    }

    s.push(
        TestCase::call(
            "string_field",
            "InstField.stringField",
            vec![Arg::Text("hello".into())],
        )
        .expect(|| Outcome::Text("hello".into())),
    );
    s
}
