//! Array payloads, bounds and allocation.
//!
//! Every index outside `0..len` raises the bounds fault, and access through
//! a null array raises the null-pointer fault before any bounds check.

use aotconform_abi::Arg;
use aotconform_core::arrays::{self, CHECK_STRINGS};
use aotconform_core::objects::{TypeDesc, store_check};
use aotconform_core::{ArrayValue, FaultKind, Outcome, Scalar};

use super::{boolean, fault, int, ints, long, or_fault};
use crate::case::{TestCase, TestSuite};

fn unit(result: Result<(), FaultKind>) -> Outcome {
    or_fault(result.map(|()| Outcome::Unit))
}

pub(super) fn suite() -> TestSuite {
    let mut s = TestSuite::new("arrays");
    verify_cases(&mut s);
    fill_cases(&mut s);
    access_cases(&mut s);
    allocation_cases(&mut s);

    for store_base in [false, true] {
        s.push(
            TestCase::call(
                format!("store_covariant_{}", if store_base { "base" } else { "exact" }),
                "Arrays.storeCovariant",
                vec![boolean(store_base)],
            )
            .expect(move || {
                let value = TypeDesc::class(if store_base { "X" } else { "Y" });
                unit(store_check(&TypeDesc::class("Y"), Some(&value)))
            }),
        );
    }
    s
}

/// Arrays built by the harness and checked element by element inside the
/// routine; a mismatch surfaces as an assertion fault.
fn verify_cases(s: &mut TestSuite) {
    let payloads = [
        ("verify_bytes", "Arrays.verifyBytes", ArrayValue::Byte(arrays::CHECK_BYTES.to_vec())),
        ("verify_shorts", "Arrays.verifyShorts", ArrayValue::Short(arrays::CHECK_SHORTS.to_vec())),
        ("verify_chars", "Arrays.verifyChars", ArrayValue::Char(arrays::CHECK_CHARS.to_vec())),
        ("verify_ints", "Arrays.verifyInts", ArrayValue::Int(arrays::CHECK_INTS.to_vec())),
        (
            "verify_booleans",
            "Arrays.verifyBooleans",
            ArrayValue::Bool(arrays::CHECK_BOOLEANS.to_vec()),
        ),
        ("verify_floats", "Arrays.verifyFloats", ArrayValue::Float(arrays::CHECK_FLOATS.to_vec())),
        ("verify_longs", "Arrays.verifyLongs", ArrayValue::Long(arrays::CHECK_LONGS.to_vec())),
        (
            "verify_strings",
            "Arrays.verifyStrings",
            ArrayValue::Str(CHECK_STRINGS.iter().map(|s| Some((*s).to_string())).collect()),
        ),
    ];
    for (name, routine, payload) in payloads {
        s.push(TestCase::call(name, routine, vec![payload.into()]).expect(|| Outcome::Unit));
    }

    s.push(
        TestCase::call(
            "verify_ints_short_array",
            "Arrays.verifyInts",
            vec![ArrayValue::Int(vec![70000]).into()],
        )
        .expect(|| fault(FaultKind::AssertionFailed)),
    );
    let mut wrong = arrays::CHECK_FLOATS;
    wrong[2] = -0.0;
    s.push(
        TestCase::call(
            "verify_floats_signed_zero",
            "Arrays.verifyFloats",
            vec![ArrayValue::Float(wrong.to_vec()).into()],
        )
        .expect(|| fault(FaultKind::AssertionFailed)),
    );
    s.push(
        TestCase::call("verify_ints_null", "Arrays.verifyInts", vec![Arg::Null])
            .expect(|| fault(FaultKind::NullPointer)),
    );
}

fn fill_cases(s: &mut TestSuite) {
    s.push(
        TestCase::call("fill_bytes", "Arrays.fillBytes", Vec::new())
            .expect(|| ArrayValue::Byte(arrays::FILL_BYTES.to_vec()).into()),
    );
    s.push(
        TestCase::call("fill_chars", "Arrays.fillChars", Vec::new())
            .expect(|| ArrayValue::Char(arrays::FILL_CHARS.to_vec()).into()),
    );
    s.push(
        TestCase::call("fill_longs", "Arrays.fillLongs", Vec::new())
            .expect(|| ArrayValue::Long(arrays::FILL_LONGS.to_vec()).into()),
    );
    s.push(
        TestCase::call("filled_new_array", "Arrays.filledNewArray", vec![int(1), int(-2), int(3)])
            .expect(|| ints(arrays::filled_new_array(1, -2, 3))),
    );
}

const INTS: [i32; 3] = [10, 20, 30];
const LONGS: [i64; 3] = [i64::MIN, 0, i64::MAX];

/// `(label, index)` pairs for three-element arrays, in range and out.
const INDICES: [(&str, i32); 6] = [
    ("first", 0),
    ("last", 2),
    ("at_len", 3),
    ("past_len", 4),
    ("minus_one", -1),
    ("int_min", i32::MIN),
];

fn access_cases(s: &mut TestSuite) {
    for (label, idx) in INDICES {
        s.push(
            TestCase::call(
                format!("get_int_{label}"),
                "Arrays.getInt",
                vec![ArrayValue::Int(INTS.to_vec()).into(), int(idx)],
            )
            .expect(move || or_fault(arrays::element(Some(&INTS[..]), idx).map(Scalar::Int))),
        );
        s.push(
            TestCase::call(
                format!("put_int_{label}"),
                "Arrays.putInt",
                vec![ArrayValue::Int(INTS.to_vec()).into(), int(idx), int(-9)],
            )
            .expect(move || or_fault(arrays::store(Some(&INTS[..]), idx, -9).map(ArrayValue::Int))),
        );
        s.push(
            TestCase::call(
                format!("get_long_{label}"),
                "Arrays.getLong",
                vec![ArrayValue::Long(LONGS.to_vec()).into(), int(idx)],
            )
            .expect(move || or_fault(arrays::element(Some(&LONGS[..]), idx).map(Scalar::Long))),
        );
        s.push(
            TestCase::call(
                format!("put_long_{label}"),
                "Arrays.putLong",
                vec![ArrayValue::Long(LONGS.to_vec()).into(), int(idx), long(7)],
            )
            .expect(move || {
                or_fault(arrays::store(Some(&LONGS[..]), idx, 7).map(ArrayValue::Long))
            }),
        );
    }

    s.push(
        TestCase::call(
            "get_int_empty",
            "Arrays.getInt",
            vec![ArrayValue::Int(Vec::new()).into(), int(0)],
        )
        .expect(|| {
            let empty: &[i32] = &[];
            or_fault(arrays::element(Some(empty), 0).map(Scalar::Int))
        }),
    );
    s.push(
        TestCase::call("get_int_null", "Arrays.getInt", vec![Arg::Null, int(0)])
            .expect(|| or_fault(arrays::element::<i32>(None, 0).map(Scalar::Int))),
    );
    // Null wins over an index that is also out of range.
    s.push(
        TestCase::call("put_long_null", "Arrays.putLong", vec![Arg::Null, int(-1), long(1)])
            .expect(|| or_fault(arrays::store::<i64>(None, -1, 1).map(ArrayValue::Long))),
    );
}

fn allocation_cases(s: &mut TestSuite) {
    for (name, count) in [
        ("new_int_array", 5),
        ("new_int_array_empty", 0),
        ("new_int_array_negative", -1),
        ("new_int_array_int_min", i32::MIN),
    ] {
        s.push(
            TestCase::call(name, "Arrays.newIntArray", vec![int(count)])
                .expect(move || or_fault(arrays::alloc_check(count).map(|n| Scalar::Int(n as i32)))),
        );
    }
    for (name, count) in [("new_object_array", 4), ("new_object_array_negative", -5)] {
        s.push(
            TestCase::call(name, "Arrays.newObjectArray", vec![int(count)])
                .expect(move || or_fault(arrays::alloc_check(count).map(|n| Scalar::Int(n as i32)))),
        );
    }
    // Every dimension is checked before anything is allocated.
    for (name, outer, inner) in [
        ("new_nested", 3, 4),
        ("new_nested_empty_outer", 0, 5),
        ("new_nested_negative_outer", -1, 4),
        ("new_nested_negative_inner", 3, -1),
        ("new_nested_empty_outer_negative_inner", 0, -1),
    ] {
        s.push(
            TestCase::call(name, "Arrays.newNested", vec![int(outer), int(inner)]).expect(move || {
                or_fault(arrays::nested_alloc_check(&[outer, inner]).map(|n| Scalar::Int(n as i32)))
            }),
        );
    }
}
