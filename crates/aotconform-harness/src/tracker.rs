//! Assertion tracker: the append-only record of every case result.

use serde::Serialize;

/// One case's result. Never mutated after it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionRecord {
    pub suite: String,
    pub case: String,
    pub passed: bool,
    pub message: String,
}

impl AssertionRecord {
    /// `suite.case`, as printed on failure lines.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.suite, self.case)
    }
}

/// Counts and the failures worth showing first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// First failing record of each suite, in suite order.
    pub first_failures: Vec<AssertionRecord>,
}

impl Summary {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    #[must_use]
    pub fn pass_rate_pct(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.passed as f64 / self.total as f64) * 100.0
    }
}

#[derive(Debug, Default)]
pub struct AssertionTracker {
    records: Vec<AssertionRecord>,
}

impl AssertionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        suite: impl Into<String>,
        case: impl Into<String>,
        passed: bool,
        message: impl Into<String>,
    ) {
        self.records.push(AssertionRecord {
            suite: suite.into(),
            case: case.into(),
            passed,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn records(&self) -> &[AssertionRecord] {
        &self.records
    }

    pub fn failures(&self) -> impl Iterator<Item = &AssertionRecord> {
        self.records.iter().filter(|r| !r.passed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        let passed = self.records.iter().filter(|r| r.passed).count();
        let mut first_failures: Vec<AssertionRecord> = Vec::new();
        for r in self.failures() {
            if !first_failures.iter().any(|f| f.suite == r.suite) {
                first_failures.push(r.clone());
            }
        }
        Summary {
            total: self.records.len(),
            passed,
            failed: self.records.len() - passed,
            first_failures,
        }
    }

    /// Consume the tracker, keeping its records.
    #[must_use]
    pub fn into_records(self) -> Vec<AssertionRecord> {
        self.records
    }
}
