//! Local-handle lifecycle. Every call must leave occupancy where it found it,
//! and a routine that never releases its handles either overflows the frame
//! or grows it, depending on the runtime's overflow policy.

use aotconform_core::locals::{self, LOOP_ITERATIONS};
use aotconform_core::{FaultKind, Scalar};
use aotconform_runtime::{OverflowPolicy, RuntimeConfig};

use super::{fault, int};
use crate::case::{TestCase, TestSuite};

pub(super) fn suite(config: &RuntimeConfig) -> TestSuite {
    let mut s = TestSuite::new("local_handles").checking_occupancy();

    for (name, n) in [
        ("loop_standard", LOOP_ITERATIONS),
        ("loop_once", 1),
        ("loop_empty", 0),
    ] {
        s.push(
            TestCase::call(name, "LocalRef.loop", vec![int(n)])
                .expect(move || locals::handle_loop_outcome(n).into()),
        );
    }

    let capacity = i32::try_from(config.local_capacity).unwrap_or(i32::MAX);
    let half = capacity / 2;
    s.push(
        TestCase::call("leak_within_capacity", "LocalRef.leak", vec![int(half)])
            .expect(move || Scalar::Int(half).into()),
    );

    let over = capacity.saturating_add(1);
    let overflow = config.overflow;
    s.push(
        TestCase::call("leak_past_capacity", "LocalRef.leak", vec![int(over)]).expect(move || {
            match overflow {
                OverflowPolicy::Fault => fault(FaultKind::HandleOverflow),
                OverflowPolicy::Grow => Scalar::Int(over).into(),
            }
        }),
    );
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use aotconform_core::Outcome;

    fn leak_case(suite: &TestSuite) -> Outcome {
        suite
            .cases
            .iter()
            .find(|c| c.name == "leak_past_capacity")
            .unwrap()
            .expected()
    }

    #[test]
    fn overflow_expectation_follows_policy() {
        let faulting = suite(&RuntimeConfig::default().with_local_capacity(16));
        assert!(faulting.check_occupancy);
        assert!(leak_case(&faulting).as_fault().is_some());

        let growing = suite(
            &RuntimeConfig::default()
                .with_local_capacity(16)
                .with_overflow(OverflowPolicy::Grow),
        );
        assert_eq!(leak_case(&growing), Scalar::Int(17).into());
    }
}
