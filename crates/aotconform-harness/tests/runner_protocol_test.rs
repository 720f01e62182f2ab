//! Integration test: runner protocol against misbehaving libraries.
//!
//! Validates that:
//! 1. A rethrow that raises a fresh fault fails the identity check.
//! 2. A missing routine aborts only its own suite, and every case still
//!    gets exactly one record.
//! 3. A routine that leaves local handles behind fails the occupancy check.
//! 4. Liveness cases collect before they observe.
//!
//! Run: cargo test -p aotconform-harness --test runner_protocol_test

use std::sync::Mutex;

use aotconform_abi::{Arg, BridgeError, NativeBridge, Probe, ReferenceBridge};
use aotconform_core::{
    FaultKind, FaultSignal, FaultToken, Liveness, Outcome, RaisedFault, Scalar, WeakToken,
};
use aotconform_harness::{Policy, Registry, TestCase, TestRunner, TestSuite};
use aotconform_runtime::{CollectionStats, RuntimeConfig};

#[derive(Default)]
struct State {
    occupancy: usize,
    faults: Vec<RaisedFault>,
    collections: u64,
}

/// A library whose routines misbehave in scripted ways.
#[derive(Default)]
struct ScriptedBridge {
    state: Mutex<State>,
}

impl State {
    fn raise(&mut self, kind: FaultKind) -> FaultToken {
        let token = FaultToken(self.faults.len() as u64 + 1);
        self.faults.push(RaisedFault { token, kind });
        token
    }
}

fn escaping(kind: FaultKind, token: FaultToken) -> Result<Outcome, BridgeError> {
    Ok(FaultSignal::of(kind).with_token(token).into())
}

impl NativeBridge for ScriptedBridge {
    fn invoke(&self, id: &str, _args: &[Arg]) -> Result<Outcome, BridgeError> {
        let mut state = self.state.lock().unwrap();
        match id {
            // Catches the original fault and throws a new one of the same kind.
            "Scripted.freshRethrow" => {
                state.raise(FaultKind::IndexOutOfBounds);
                let fresh = state.raise(FaultKind::IndexOutOfBounds);
                escaping(FaultKind::IndexOutOfBounds, fresh)
            }
            "Scripted.rethrow" => {
                let token = state.raise(FaultKind::IndexOutOfBounds);
                escaping(FaultKind::IndexOutOfBounds, token)
            }
            // Catches a null-pointer fault, then lets a bounds fault escape
            // unchanged.
            "Scripted.catchThenRethrow" => {
                state.raise(FaultKind::NullPointer);
                let token = state.raise(FaultKind::IndexOutOfBounds);
                escaping(FaultKind::IndexOutOfBounds, token)
            }
            // As above, but the bounds fault is replaced by a fresh one.
            "Scripted.catchThenFresh" => {
                state.raise(FaultKind::NullPointer);
                state.raise(FaultKind::IndexOutOfBounds);
                let fresh = state.raise(FaultKind::IndexOutOfBounds);
                escaping(FaultKind::IndexOutOfBounds, fresh)
            }
            "Scripted.leak" => {
                state.occupancy += 1;
                Ok(Scalar::Int(0).into())
            }
            "Scripted.clean" => Ok(Scalar::Int(0).into()),
            "Scripted.weak" => Ok(Outcome::Weak(WeakToken(9))),
            "Scripted.notWeak" => Ok(Scalar::Int(1).into()),
            other => Err(BridgeError::Unavailable(other.to_string())),
        }
    }

    fn request_full_collection(&self) -> Result<CollectionStats, BridgeError> {
        self.state.lock().unwrap().collections += 1;
        Ok(CollectionStats::default())
    }

    fn liveness(&self, token: WeakToken) -> Result<Liveness, BridgeError> {
        if token != WeakToken(9) {
            return Err(BridgeError::UnknownHandle(token.0));
        }
        // Only a collection clears the referent.
        if self.state.lock().unwrap().collections > 0 {
            Ok(Liveness::Dead)
        } else {
            Ok(Liveness::Alive)
        }
    }

    fn probe(&self) -> Probe {
        let state = self.state.lock().unwrap();
        Probe {
            local_occupancy: state.occupancy,
            local_peak: state.occupancy,
            faults_raised: state.faults.len(),
            object_count: 0,
            collections: state.collections,
            swept_total: 0,
        }
    }

    fn faults_since(&self, mark: usize) -> Vec<RaisedFault> {
        let state = self.state.lock().unwrap();
        state.faults.get(mark..).unwrap_or_default().to_vec()
    }

    fn signature(&self, _id: &str) -> Option<&'static str> {
        None
    }
}

fn out_of_bounds() -> Outcome {
    FaultSignal::of(FaultKind::IndexOutOfBounds).into()
}

fn registry_of(suites: Vec<TestSuite>) -> Registry {
    let mut registry = Registry::new();
    for suite in suites {
        registry.add_suite(suite).unwrap();
    }
    registry
}

#[test]
fn fresh_rethrow_fails_identity_check() {
    let registry = registry_of(vec![
        TestSuite::new("rethrow")
            .case(
                TestCase::call("original", "Scripted.rethrow", Vec::new())
                    .expect(out_of_bounds)
                    .with_policy(Policy::FaultIdentity),
            )
            .case(
                TestCase::call("fresh", "Scripted.freshRethrow", Vec::new())
                    .expect(out_of_bounds)
                    .with_policy(Policy::FaultIdentity),
            )
            .case(
                // Kind alone is enough without the identity policy.
                TestCase::call("fresh_kind_only", "Scripted.freshRethrow", Vec::new())
                    .expect(out_of_bounds),
            ),
    ]);
    let bridge = ScriptedBridge::default();
    let tracker = TestRunner::new(&bridge).run(&registry);
    let records = tracker.records();

    assert!(records[0].passed, "{}", records[0].message);
    assert!(!records[1].passed);
    assert!(
        records[1].message.contains("not the original"),
        "{}",
        records[1].message
    );
    assert!(records[2].passed, "{}", records[2].message);
}

#[test]
fn caught_fault_of_another_kind_does_not_break_identity() {
    let registry = registry_of(vec![
        TestSuite::new("rethrow")
            .case(
                TestCase::call("after_catch", "Scripted.catchThenRethrow", Vec::new())
                    .expect(out_of_bounds)
                    .with_policy(Policy::FaultIdentity),
            )
            .case(
                TestCase::call("after_catch_fresh", "Scripted.catchThenFresh", Vec::new())
                    .expect(out_of_bounds)
                    .with_policy(Policy::FaultIdentity),
            ),
    ]);
    let bridge = ScriptedBridge::default();
    let tracker = TestRunner::new(&bridge).run(&registry);
    let records = tracker.records();
    assert!(records[0].passed, "{}", records[0].message);
    assert!(!records[1].passed);
    assert!(records[1].message.contains("not the original"), "{}", records[1].message);
}

#[test]
fn reference_rethrow_routines_keep_and_lose_identity() {
    let registry = registry_of(vec![
        TestSuite::new("rethrow")
            .case(
                TestCase::call("rethrow", "Throw.rethrow", vec![Scalar::Int(5).into()])
                    .expect(out_of_bounds)
                    .with_policy(Policy::FaultIdentity),
            )
            .case(
                TestCase::call("rethrow_fresh", "Throw.rethrowFresh", vec![
                    Scalar::Int(5).into(),
                ])
                .expect(out_of_bounds)
                .with_policy(Policy::FaultIdentity),
            ),
    ]);
    let bridge = ReferenceBridge::new(RuntimeConfig::default());
    let tracker = TestRunner::new(&bridge).run(&registry);
    let records = tracker.records();
    assert!(records[0].passed, "{}", records[0].message);
    assert!(!records[1].passed);
}

#[test]
fn unavailable_routine_aborts_only_its_suite() {
    let config = RuntimeConfig::default();
    let registry = Registry::standard(&config).unwrap();
    let bridge = ReferenceBridge::without_routines(config, &["Arrays.getInt"]);
    let tracker = TestRunner::new(&bridge).run(&registry);

    assert_eq!(tracker.len(), registry.case_count());
    let names: Vec<String> = tracker.records().iter().map(|r| r.qualified_name()).collect();
    let expected: Vec<String> = registry.qualified_names().collect();
    assert_eq!(names, expected);

    let arrays = registry.suite("arrays").unwrap();
    let first_missing = arrays
        .cases
        .iter()
        .position(|c| c.routine() == "Arrays.getInt")
        .unwrap();
    let records: Vec<_> = tracker
        .records()
        .iter()
        .filter(|r| r.suite == "arrays")
        .collect();
    assert!(records[..first_missing].iter().all(|r| r.passed));
    assert!(records[first_missing..].iter().all(|r| !r.passed));
    assert!(
        records[first_missing..]
            .iter()
            .all(|r| r.message.contains("Arrays.getInt")),
    );

    // The exceptions suite also calls the missing routine; nothing else does.
    for r in tracker.failures() {
        assert!(
            r.suite == "arrays" || r.suite == "exceptions",
            "{}: {}",
            r.qualified_name(),
            r.message
        );
    }
    assert!(
        tracker
            .records()
            .iter()
            .filter(|r| r.suite == "objects" || r.suite == "local_handles")
            .all(|r| r.passed)
    );
}

#[test]
fn leaked_handles_fail_occupancy_check() {
    let registry = registry_of(vec![
        TestSuite::new("unchecked").case(
            TestCase::call("leak", "Scripted.leak", Vec::new()).expect(|| Scalar::Int(0).into()),
        ),
        TestSuite::new("checked")
            .checking_occupancy()
            .case(
                TestCase::call("clean", "Scripted.clean", Vec::new())
                    .expect(|| Scalar::Int(0).into()),
            )
            .case(
                TestCase::call("leak", "Scripted.leak", Vec::new())
                    .expect(|| Scalar::Int(0).into()),
            ),
    ]);
    let bridge = ScriptedBridge::default();
    let tracker = TestRunner::new(&bridge).run(&registry);
    let records = tracker.records();

    assert!(records[0].passed);
    assert!(records[1].passed);
    assert!(!records[2].passed);
    assert!(records[2].message.contains("occupancy"), "{}", records[2].message);
}

#[test]
fn liveness_cases_collect_before_observing() {
    let registry = registry_of(vec![
        TestSuite::new("liveness")
            .case(
                TestCase::observe("collected", "Scripted.weak")
                    .expect(|| Liveness::Dead.into()),
            )
            .case(
                TestCase::observe("not_a_weak_handle", "Scripted.notWeak")
                    .expect(|| Liveness::Dead.into()),
            ),
    ]);
    let bridge = ScriptedBridge::default();
    let tracker = TestRunner::new(&bridge).run(&registry);
    let records = tracker.records();

    assert!(records[0].passed, "{}", records[0].message);
    assert_eq!(bridge.state.lock().unwrap().collections, 1);
    assert!(!records[1].passed);
    assert!(records[1].message.contains("shape mismatch"), "{}", records[1].message);
}
