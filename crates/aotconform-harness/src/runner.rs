//! Test execution engine.
//!
//! Suites run in registry order and cases in declaration order. Each case is
//! one bridge invocation followed by one oracle call, and leaves exactly one
//! record in the tracker. A routine the library does not provide ends its
//! suite: the case that hit it and every case after it are recorded as
//! failures naming that routine, and the next suite starts normally.

use std::time::Instant;

use aotconform_abi::{BridgeError, NativeBridge};
use aotconform_core::Outcome;
use aotconform_runtime::CollectionStats;
use serde_json::json;

use crate::case::{Invocation, TestCase, TestSuite};
use crate::registry::Registry;
use crate::structured_log::{LogEmitter, LogLevel, Outcome as LogOutcome};
use crate::tracker::AssertionTracker;
use crate::verify::{Verdict, verify};

/// What one case produced before it was recorded.
struct Executed {
    verdict: Verdict,
    collection: Option<CollectionStats>,
}

/// Runs a registry against a bridge and collects assertion records.
pub struct TestRunner<'a> {
    bridge: &'a dyn NativeBridge,
}

impl<'a> TestRunner<'a> {
    #[must_use]
    pub fn new(bridge: &'a dyn NativeBridge) -> Self {
        Self { bridge }
    }

    /// Run every suite without logging.
    #[must_use]
    pub fn run(&self, registry: &Registry) -> AssertionTracker {
        let mut tracker = AssertionTracker::new();
        for suite in registry.suites() {
            self.run_suite(suite, &mut tracker, &mut Quiet);
        }
        tracker
    }

    /// Run every suite, writing the structured log to `log`.
    pub fn run_logged(
        &self,
        registry: &Registry,
        log: &mut LogEmitter,
    ) -> std::io::Result<AssertionTracker> {
        let mut sink = Logged { log, error: None };
        let started = Instant::now();
        sink.emit(|log| {
            log.entry(LogLevel::Info, "run_start").with_details(json!({
                "suites": registry.suites().len(),
                "cases": registry.case_count(),
                "fingerprint": registry.fingerprint(),
            }))
        });

        let mut tracker = AssertionTracker::new();
        for suite in registry.suites() {
            self.run_suite(suite, &mut tracker, &mut sink);
        }

        let summary = tracker.summary();
        let probe = self.bridge.probe();
        sink.emit(|log| {
            log.entry(LogLevel::Info, "run_end")
                .with_outcome(LogOutcome::from_passed(summary.all_passed()))
                .with_exit_code(i32::from(!summary.all_passed()))
                .with_duration_us(elapsed_us(started))
                .with_details(json!({
                    "total": summary.total,
                    "passed": summary.passed,
                    "failed": summary.failed,
                    "collections": probe.collections,
                    "swept": probe.swept_total,
                    "local_peak": probe.local_peak,
                }))
        });
        if let Some(err) = sink.error {
            return Err(err);
        }
        log.flush()?;
        Ok(tracker)
    }

    fn run_suite(&self, suite: &TestSuite, tracker: &mut AssertionTracker, sink: &mut dyn Sink) {
        sink.enter(&suite.name);
        sink.emit(&mut |log: &mut LogEmitter| {
            log.entry(LogLevel::Info, "suite_start")
                .with_suite(&suite.name)
                .with_details(json!({ "cases": suite.cases.len() }))
        });
        let started = Instant::now();
        let before = tracker.len();

        let mut cases = suite.cases.iter();
        while let Some(case) = cases.next() {
            let case_started = Instant::now();
            match self.execute(suite, case) {
                Ok(executed) => {
                    if let Some(stats) = executed.collection {
                        sink.emit(&mut |log: &mut LogEmitter| {
                            log.entry(LogLevel::Debug, "collection")
                                .with_suite(&suite.name)
                                .with_case(&case.name)
                                .with_details(json!({
                                    "marked": stats.marked_count,
                                    "swept": stats.swept_count,
                                    "weak_cleared": stats.weak_cleared,
                                }))
                        });
                    }
                    let verdict = executed.verdict;
                    sink.emit(&mut |log: &mut LogEmitter| {
                        case_entry(log, suite, case, LogOutcome::from_passed(verdict.passed))
                            .with_duration_us(elapsed_us(case_started))
                            .with_details(json!({ "message": verdict.message }))
                    });
                    tracker.record(&suite.name, &case.name, verdict.passed, verdict.message);
                }
                Err(err) if err.is_fatal() => {
                    let message = err.to_string();
                    sink.emit(&mut |log: &mut LogEmitter| {
                        log.entry(LogLevel::Error, "suite_abort")
                            .with_suite(&suite.name)
                            .with_case(&case.name)
                            .with_routine(case.routine())
                            .with_details(json!({ "error": message }))
                    });
                    tracker.record(&suite.name, &case.name, false, &message);
                    for skipped in cases.by_ref() {
                        let note = format!("not run: {message}");
                        sink.emit(&mut |log: &mut LogEmitter| {
                            case_entry(log, suite, skipped, LogOutcome::Error)
                                .with_details(json!({ "message": note }))
                        });
                        tracker.record(&suite.name, &skipped.name, false, note);
                    }
                }
                Err(err) => {
                    let message = format!("bridge error: {err}");
                    sink.emit(&mut |log: &mut LogEmitter| {
                        case_entry(log, suite, case, LogOutcome::Fail)
                            .with_duration_us(elapsed_us(case_started))
                            .with_details(json!({ "message": message }))
                    });
                    tracker.record(&suite.name, &case.name, false, message);
                }
            }
        }

        let records = &tracker.records()[before..];
        let failed = records.iter().filter(|r| !r.passed).count();
        sink.emit(&mut |log: &mut LogEmitter| {
            log.entry(LogLevel::Info, "suite_end")
                .with_suite(&suite.name)
                .with_outcome(LogOutcome::from_passed(failed == 0))
                .with_duration_us(elapsed_us(started))
                .with_details(json!({ "total": records.len(), "failed": failed }))
        });
        sink.leave();
    }

    /// One invocation, one oracle call, one verdict.
    fn execute(&self, suite: &TestSuite, case: &TestCase) -> Result<Executed, BridgeError> {
        let before = self.bridge.probe();
        let mut collection = None;

        let actual = match &case.invocation {
            Invocation::Call { routine, args } => self.bridge.invoke(routine, args)?,
            Invocation::Observe { routine } => match self.bridge.invoke(routine, &[])? {
                Outcome::Weak(token) => {
                    collection = Some(self.bridge.request_full_collection()?);
                    Outcome::Liveness(self.bridge.liveness(token)?)
                }
                // Anything else is compared as returned and fails on shape.
                other => other,
            },
        };

        let raised = self.bridge.faults_since(before.faults_raised);
        let mut verdict = verify(case.policy, &case.expected(), &actual, &raised);

        if suite.check_occupancy && verdict.passed {
            let after = self.bridge.probe();
            if after.local_occupancy != before.local_occupancy {
                verdict = Verdict::fail(format!(
                    "local handle occupancy {} before the call, {} after",
                    before.local_occupancy, after.local_occupancy
                ));
            }
        }
        Ok(Executed {
            verdict,
            collection,
        })
    }
}

fn case_entry(
    log: &mut LogEmitter,
    suite: &TestSuite,
    case: &TestCase,
    outcome: LogOutcome,
) -> crate::structured_log::LogEntry {
    let level = match outcome {
        LogOutcome::Pass => LogLevel::Info,
        LogOutcome::Fail | LogOutcome::Error => LogLevel::Warn,
    };
    log.entry(level, "case_result")
        .with_suite(&suite.name)
        .with_case(&case.name)
        .with_routine(case.routine())
        .with_policy(case.policy.to_string())
        .with_outcome(outcome)
}

fn elapsed_us(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_micros()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// Log sinks. The unlogged path builds no entries at all.
// ---------------------------------------------------------------------------

type BuildEntry<'b> = dyn FnMut(&mut LogEmitter) -> crate::structured_log::LogEntry + 'b;

trait Sink {
    fn enter(&mut self, _scope: &str) {}
    fn leave(&mut self) {}
    fn emit(&mut self, build: &mut BuildEntry<'_>);
}

struct Quiet;

impl Sink for Quiet {
    fn emit(&mut self, _build: &mut BuildEntry<'_>) {}
}

/// Keeps the first write error and stops logging after it, so a full disk
/// never changes the records a run produces.
struct Logged<'l> {
    log: &'l mut LogEmitter,
    error: Option<std::io::Error>,
}

impl Logged<'_> {
    fn emit(&mut self, mut build: impl FnMut(&mut LogEmitter) -> crate::structured_log::LogEntry) {
        Sink::emit(self, &mut build);
    }
}

impl Sink for Logged<'_> {
    fn enter(&mut self, scope: &str) {
        self.log.enter_scope(scope);
    }

    fn leave(&mut self) {
        self.log.leave_scope();
    }

    fn emit(&mut self, build: &mut BuildEntry<'_>) {
        if self.error.is_some() {
            return;
        }
        let entry = build(&mut *self.log);
        if let Err(err) = self.log.emit_entry(entry) {
            self.error = Some(err);
        }
    }
}
