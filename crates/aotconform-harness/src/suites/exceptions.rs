//! Raising, catching and rethrowing faults.
//!
//! A rethrown fault must be the fault that was originally raised, so the
//! rethrow cases compare fault identity as well as kind.

use aotconform_abi::Arg;
use aotconform_core::{ArrayValue, FaultKind, Outcome, Scalar, arrays, int_math};

use super::{fault, int, or_fault};
use crate::case::{TestCase, TestSuite};
use crate::policy::Policy;

/// What `catchCode(x)` returns: 1 for a null-pointer fault, 2 for any other
/// runtime fault, 0 when nothing is raised. The assertion fault is not a
/// runtime fault and escapes.
fn catch_code(x: i32) -> Outcome {
    match x {
        0 => Scalar::Int(1).into(),
        1 | 2 => Scalar::Int(2).into(),
        3 => fault(FaultKind::AssertionFailed),
        _ => Scalar::Int(0).into(),
    }
}

pub(super) fn suite() -> TestSuite {
    let mut s = TestSuite::new("exceptions");

    s.push(
        TestCase::call("null_field", "Throw.nullField", Vec::new())
            .expect(|| fault(FaultKind::NullPointer)),
    );
    s.push(
        TestCase::call("null_method", "Throw.nullMethod", Vec::new())
            .expect(|| fault(FaultKind::NullPointer)),
    );
    s.push(
        TestCase::call("divide_by_zero", "IntMath.divideByZero", vec![int(0)])
            .expect(|| or_fault(int_math::div32(100, 0).map(Scalar::Int))),
    );
    s.push(
        TestCase::call(
            "index_minus_one",
            "Arrays.getInt",
            vec![ArrayValue::Int(vec![1, 2]).into(), int(-1)],
        )
        .expect(|| or_fault(arrays::element(Some(&[1, 2][..]), -1).map(Scalar::Int))),
    );
    s.push(
        TestCase::call("negative_size", "Arrays.newIntArray", vec![int(-1)])
            .expect(|| or_fault(arrays::alloc_check(-1).map(|n| Scalar::Int(n as i32)))),
    );

    // The pair has two elements; 5 is out of range, 1 is not.
    for (name, routine, idx) in [
        ("rethrow_out_of_range", "Throw.rethrow", 5),
        ("rethrow_in_range", "Throw.rethrow", 1),
        ("rethrow_fresh_in_range", "Throw.rethrowFresh", 0),
    ] {
        s.push(
            TestCase::call(name, routine, vec![int(idx)])
                .expect(move || or_fault(arrays::element(Some(&[0, 0][..]), idx).map(Scalar::Int)))
                .with_policy(Policy::FaultIdentity),
        );
    }

    for x in 0..=4 {
        s.push(
            TestCase::call(format!("catch_code_{x}"), "Throw.catchCode", vec![int(x)])
                .expect(move || catch_code(x)),
        );
    }

    s.push(
        TestCase::call("null_receiver_tag", "Classes.virtualTag", vec![Arg::Null])
            .expect(|| fault(FaultKind::NullPointer)),
    );
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catch_codes() {
        assert_eq!(catch_code(0), Scalar::Int(1).into());
        assert_eq!(catch_code(2), Scalar::Int(2).into());
        assert!(catch_code(3).as_fault().is_some());
        assert_eq!(catch_code(7), Scalar::Int(0).into());
    }

    #[test]
    fn rethrow_cases_check_identity() {
        let s = suite();
        assert!(
            s.cases
                .iter()
                .filter(|c| c.routine().starts_with("Throw.rethrow"))
                .all(|c| c.policy == Policy::FaultIdentity)
        );
    }
}
