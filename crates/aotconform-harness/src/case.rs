//! Test cases: one routine invocation, one oracle, one policy.

use std::fmt;

use aotconform_abi::Arg;
use aotconform_core::Outcome;

use crate::policy::Policy;

/// Reference computation of a case's expected outcome.
pub type Oracle = Box<dyn Fn() -> Outcome + Send + Sync>;

/// What the runner does with the bridge for one case.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// Invoke the routine and compare what it returns.
    Call { routine: &'static str, args: Vec<Arg> },
    /// Invoke a routine returning a weak handle, request a full collection,
    /// then compare the handle's liveness.
    Observe { routine: &'static str },
}

impl Invocation {
    #[must_use]
    pub fn routine(&self) -> &'static str {
        match self {
            Self::Call { routine, .. } | Self::Observe { routine } => routine,
        }
    }
}

pub struct TestCase {
    pub name: String,
    pub invocation: Invocation,
    pub policy: Policy,
    oracle: Oracle,
}

impl TestCase {
    /// A call case. Until [`TestCase::expect`] is given, the oracle expects a
    /// void return.
    #[must_use]
    pub fn call(name: impl Into<String>, routine: &'static str, args: Vec<Arg>) -> Self {
        Self {
            name: name.into(),
            invocation: Invocation::Call { routine, args },
            policy: Policy::Exact,
            oracle: Box::new(|| Outcome::Unit),
        }
    }

    /// A liveness case; the oracle must yield `Outcome::Liveness`.
    #[must_use]
    pub fn observe(name: impl Into<String>, routine: &'static str) -> Self {
        Self {
            name: name.into(),
            invocation: Invocation::Observe { routine },
            policy: Policy::Liveness,
            oracle: Box::new(|| Outcome::Unit),
        }
    }

    #[must_use]
    pub fn expect(mut self, oracle: impl Fn() -> Outcome + Send + Sync + 'static) -> Self {
        self.oracle = Box::new(oracle);
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn routine(&self) -> &'static str {
        self.invocation.routine()
    }

    /// Run the oracle.
    #[must_use]
    pub fn expected(&self) -> Outcome {
        (self.oracle)()
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("invocation", &self.invocation)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// An ordered group of cases covering one semantic area.
#[derive(Debug)]
pub struct TestSuite {
    pub name: String,
    pub cases: Vec<TestCase>,
    /// Marks the exact floating-point baseline; tolerance cases may only
    /// appear in later suites.
    pub float_baseline: bool,
    /// After every call, local-handle occupancy must be back at its
    /// pre-call value.
    pub check_occupancy: bool,
}

impl TestSuite {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
            float_baseline: false,
            check_occupancy: false,
        }
    }

    #[must_use]
    pub fn float_baseline(mut self) -> Self {
        self.float_baseline = true;
        self
    }

    #[must_use]
    pub fn checking_occupancy(mut self) -> Self {
        self.check_occupancy = true;
        self
    }

    #[must_use]
    pub fn case(mut self, case: TestCase) -> Self {
        self.cases.push(case);
        self
    }

    pub fn push(&mut self, case: TestCase) {
        self.cases.push(case);
    }
}
