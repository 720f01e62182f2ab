//! Compare an actual outcome with the oracle's expectation.
//!
//! Fault handling always comes first: an expected fault is matched by kind
//! whatever the policy, and a fault nobody expected is a failure that keeps
//! the raw fault text. Only then are the shapes compared, and only when the
//! shapes agree is the value compared under the case's policy.

use aotconform_core::approx::{approx_equal_f32, approx_equal_f64};
use aotconform_core::{ArrayValue, Outcome, RaisedFault, Scalar};

use crate::diff::{array_mismatch, render_diff, render_outcome};
use crate::policy::Policy;

/// Result of one comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
}

impl Verdict {
    #[must_use]
    pub fn pass() -> Self {
        Self {
            passed: true,
            message: String::from("ok"),
        }
    }

    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Compare `actual` with `expected` under `policy`.
///
/// `raised` lists the faults journaled during the invocation, oldest first;
/// only [`Policy::FaultIdentity`] consults it. The escaping fault must be the
/// first one raised of its kind: faults of other kinds that the routine
/// caught along the way do not count.
#[must_use]
pub fn verify(policy: Policy, expected: &Outcome, actual: &Outcome, raised: &[RaisedFault]) -> Verdict {
    match (expected, actual) {
        (Outcome::Fault(want), Outcome::Fault(got)) if want.kind == got.kind => {
            if policy == Policy::FaultIdentity {
                let first = raised.iter().find(|r| r.kind == got.kind).map(|r| r.token);
                return match (got.token, first) {
                    (Some(token), Some(first)) if token == first => Verdict::pass(),
                    (Some(token), Some(first)) => Verdict::fail(format!(
                        "fault {} is not the original: escaped {token}, first raised {first}",
                        got.kind
                    )),
                    _ => Verdict::fail(format!("fault {} carries no traceable identity", got.kind)),
                };
            }
            Verdict::pass()
        }
        (Outcome::Fault(want), Outcome::Fault(got)) => Verdict::fail(format!(
            "expected fault {}, got fault {got}",
            want.kind
        )),
        (Outcome::Fault(want), other) => Verdict::fail(format!(
            "expected fault {}, no fault raised (returned {})",
            want.kind,
            render_outcome(other)
        )),
        (_, Outcome::Fault(got)) => Verdict::fail(format!("unexpected fault {got}")),
        _ if expected.shape() != actual.shape() => Verdict::fail(format!(
            "shape mismatch: expected {}, got {}",
            expected.shape(),
            actual.shape()
        )),
        _ => compare_values(policy, expected, actual),
    }
}

fn compare_values(policy: Policy, expected: &Outcome, actual: &Outcome) -> Verdict {
    let equal = match (expected, actual) {
        (Outcome::Unit, Outcome::Unit) => true,
        (Outcome::Scalar(e), Outcome::Scalar(a)) => scalars_match(policy, e, a),
        (Outcome::Array(e), Outcome::Array(a)) => arrays_match(policy, e, a),
        (Outcome::Text(e), Outcome::Text(a)) => {
            if e != a {
                return Verdict::fail(format!("text differs\n{}", render_diff(e, a)));
            }
            true
        }
        (Outcome::Liveness(e), Outcome::Liveness(a)) => e == a,
        // Handles are run-specific; a case has to observe them instead.
        (Outcome::Weak(_), Outcome::Weak(_)) => {
            return Verdict::fail("weak handles are not comparable values");
        }
        _ => false,
    };
    if equal {
        return Verdict::pass();
    }
    match (expected, actual) {
        (Outcome::Array(e), Outcome::Array(a)) => {
            Verdict::fail(format!("{policy} mismatch: {}", array_mismatch(e, a)))
        }
        _ => Verdict::fail(format!(
            "{policy} mismatch: expected {}, got {}",
            render_outcome(expected),
            render_outcome(actual)
        )),
    }
}

fn scalars_match(policy: Policy, e: &Scalar, a: &Scalar) -> bool {
    match (policy, e, a) {
        (Policy::Masked { mask }, _, _) => e.raw_bits() & mask == a.raw_bits() & mask,
        (Policy::Approx { max_delta }, Scalar::Float(x), Scalar::Float(y)) => {
            approx_equal_f32(*x, *y, max_delta as f32)
        }
        (Policy::Approx { max_delta }, Scalar::Double(x), Scalar::Double(y)) => {
            approx_equal_f64(*x, *y, max_delta)
        }
        _ => e.bits_eq(a),
    }
}

fn arrays_match(policy: Policy, e: &ArrayValue, a: &ArrayValue) -> bool {
    match policy {
        Policy::Masked { .. } | Policy::Approx { .. } => {
            if e.len() != a.len() {
                return false;
            }
            // String arrays have no scalar view; they compare exactly.
            if let (ArrayValue::Str(x), ArrayValue::Str(y)) = (e, a) {
                return x == y;
            }
            (0..e.len()).all(|i| match (e.scalar_at(i), a.scalar_at(i)) {
                (Some(x), Some(y)) => scalars_match(policy, &x, &y),
                _ => false,
            })
        }
        _ => e.bits_eq(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aotconform_core::{FaultKind, FaultSignal, FaultToken, Liveness};

    fn fault(kind: FaultKind) -> Outcome {
        Outcome::Fault(FaultSignal::of(kind))
    }

    fn int(v: i32) -> Outcome {
        Outcome::Scalar(Scalar::Int(v))
    }

    #[test]
    fn expected_fault_of_matching_kind_passes() {
        let actual = Outcome::Fault(
            FaultSignal::of(FaultKind::Arithmetic)
                .with_token(FaultToken(3))
                .with_message("divide by zero"),
        );
        let v = verify(Policy::Exact, &fault(FaultKind::Arithmetic), &actual, &[]);
        assert!(v.passed, "{}", v.message);
    }

    #[test]
    fn fault_kind_mismatch_names_both_kinds() {
        let v = verify(
            Policy::Exact,
            &fault(FaultKind::Arithmetic),
            &fault(FaultKind::NullPointer),
            &[],
        );
        assert!(!v.passed);
        assert!(v.message.contains("arithmetic"), "{}", v.message);
        assert!(v.message.contains("null-pointer"), "{}", v.message);
    }

    #[test]
    fn missing_fault_fails() {
        let v = verify(Policy::Exact, &fault(FaultKind::Arithmetic), &int(4), &[]);
        assert!(!v.passed);
        assert!(v.message.contains("no fault raised"));
    }

    #[test]
    fn unexpected_fault_keeps_raw_message() {
        let actual = Outcome::Fault(
            FaultSignal::of(FaultKind::IndexOutOfBounds).with_message("index 9, length 3"),
        );
        let v = verify(Policy::Exact, &int(1), &actual, &[]);
        assert!(!v.passed);
        assert!(v.message.contains("index 9, length 3"));
    }

    #[test]
    fn shape_mismatch_is_a_failure_not_a_panic() {
        let v = verify(
            Policy::Exact,
            &int(1),
            &Outcome::Scalar(Scalar::Long(1)),
            &[],
        );
        assert!(!v.passed);
        assert!(v.message.starts_with("shape mismatch"));
    }

    #[test]
    fn exact_distinguishes_signed_zero() {
        let v = verify(
            Policy::Exact,
            &Outcome::Scalar(Scalar::Float(0.0)),
            &Outcome::Scalar(Scalar::Float(-0.0)),
            &[],
        );
        assert!(!v.passed);
    }

    #[test]
    fn masked_ignores_high_bits() {
        let policy = Policy::Masked { mask: 0xffff };
        let v = verify(
            policy,
            &Outcome::Scalar(Scalar::Long(0x1234_0000_0000_abcd)),
            &Outcome::Scalar(Scalar::Long(0xabcd)),
            &[],
        );
        assert!(v.passed);
    }

    #[test]
    fn approx_checks_every_array_element() {
        let policy = Policy::Approx { max_delta: 1.0e-6 };
        let e = Outcome::Array(ArrayValue::Double(vec![1.0, 2.0]));
        let close = Outcome::Array(ArrayValue::Double(vec![1.0 + 1.0e-9, 2.0]));
        let far = Outcome::Array(ArrayValue::Double(vec![1.0, 2.1]));
        assert!(verify(policy, &e, &close, &[]).passed);
        let v = verify(policy, &e, &far, &[]);
        assert!(!v.passed);
        assert!(v.message.contains("element 1"), "{}", v.message);
    }

    fn raised(token: u64, kind: FaultKind) -> RaisedFault {
        RaisedFault {
            token: FaultToken(token),
            kind,
        }
    }

    #[test]
    fn identity_requires_first_raised_token() {
        let escaped = Outcome::Fault(
            FaultSignal::of(FaultKind::IndexOutOfBounds).with_token(FaultToken(7)),
        );
        let want = fault(FaultKind::IndexOutOfBounds);
        let only = [raised(7, FaultKind::IndexOutOfBounds)];
        assert!(verify(Policy::FaultIdentity, &want, &escaped, &only).passed);

        let fresh = [
            raised(6, FaultKind::IndexOutOfBounds),
            raised(7, FaultKind::IndexOutOfBounds),
        ];
        let v = verify(Policy::FaultIdentity, &want, &escaped, &fresh);
        assert!(!v.passed);
        assert!(v.message.contains("not the original"));
    }

    #[test]
    fn identity_ignores_caught_faults_of_other_kinds() {
        let escaped = Outcome::Fault(
            FaultSignal::of(FaultKind::IndexOutOfBounds).with_token(FaultToken(7)),
        );
        let want = fault(FaultKind::IndexOutOfBounds);
        let caught_first = [
            raised(6, FaultKind::NullPointer),
            raised(7, FaultKind::IndexOutOfBounds),
        ];
        let v = verify(Policy::FaultIdentity, &want, &escaped, &caught_first);
        assert!(v.passed, "{}", v.message);

        let then_fresh = [
            raised(5, FaultKind::NullPointer),
            raised(6, FaultKind::IndexOutOfBounds),
            raised(7, FaultKind::IndexOutOfBounds),
        ];
        assert!(!verify(Policy::FaultIdentity, &want, &escaped, &then_fresh).passed);
    }

    #[test]
    fn identity_without_a_journaled_fault_fails() {
        let escaped = Outcome::Fault(
            FaultSignal::of(FaultKind::IndexOutOfBounds).with_token(FaultToken(7)),
        );
        let other_kind = [raised(7, FaultKind::NullPointer)];
        let v = verify(
            Policy::FaultIdentity,
            &fault(FaultKind::IndexOutOfBounds),
            &escaped,
            &other_kind,
        );
        assert!(!v.passed);
    }

    #[test]
    fn liveness_compares_state() {
        let v = verify(
            Policy::Liveness,
            &Outcome::Liveness(Liveness::Dead),
            &Outcome::Liveness(Liveness::Alive),
            &[],
        );
        assert!(!v.passed);
        assert!(v.message.contains("expected dead"), "{}", v.message);
    }
}
