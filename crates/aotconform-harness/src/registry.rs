//! The ordered set of suites a run executes.

use aotconform_runtime::RuntimeConfig;

use crate::case::TestSuite;
use crate::error::RegistryError;
use crate::suites;

/// Suites in declaration order. Validated on insertion and never reordered.
#[derive(Debug, Default)]
pub struct Registry {
    suites: Vec<TestSuite>,
    baseline_seen: bool,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every standard suite, with local-handle expectations sized for
    /// `config`.
    pub fn standard(config: &RuntimeConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for suite in suites::standard(config) {
            registry.add_suite(suite)?;
        }
        Ok(registry)
    }

    /// Append `suite`.
    ///
    /// Suite names are unique, case names are unique within a suite, and a
    /// tolerance policy may only appear after the floating-point baseline
    /// suite (and never inside it).
    pub fn add_suite(&mut self, suite: TestSuite) -> Result<(), RegistryError> {
        if self.suites.iter().any(|s| s.name == suite.name) {
            return Err(RegistryError::DuplicateSuite(suite.name));
        }
        for (i, case) in suite.cases.iter().enumerate() {
            if suite.cases[..i].iter().any(|c| c.name == case.name) {
                return Err(RegistryError::DuplicateCase {
                    suite: suite.name.clone(),
                    case: case.name.clone(),
                });
            }
            if case.policy.is_tolerance() && (suite.float_baseline || !self.baseline_seen) {
                return Err(RegistryError::ToleranceBeforeBaseline {
                    suite: suite.name.clone(),
                    case: case.name.clone(),
                });
            }
        }
        self.baseline_seen |= suite.float_baseline;
        self.suites.push(suite);
        Ok(())
    }

    #[must_use]
    pub fn suites(&self) -> &[TestSuite] {
        &self.suites
    }

    #[must_use]
    pub fn suite(&self, name: &str) -> Option<&TestSuite> {
        self.suites.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn case_count(&self) -> usize {
        self.suites.iter().map(|s| s.cases.len()).sum()
    }

    /// `suite.case` names in execution order.
    pub fn qualified_names(&self) -> impl Iterator<Item = String> + '_ {
        self.suites
            .iter()
            .flat_map(|s| s.cases.iter().map(move |c| format!("{}.{}", s.name, c.name)))
    }

    /// blake3 digest (hex) of the ordered case names. Equal fingerprints
    /// mean identical execution order.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for name in self.qualified_names() {
            hasher.update(name.as_bytes());
            hasher.update(b"\n");
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::TestCase;
    use crate::policy::Policy;

    fn case(name: &str) -> TestCase {
        TestCase::call(name, "IntMath.unop", Vec::new())
    }

    fn approx(name: &str) -> TestCase {
        case(name).with_policy(Policy::Approx { max_delta: 1.0e-6 })
    }

    #[test]
    fn rejects_duplicates() {
        let mut r = Registry::new();
        r.add_suite(TestSuite::new("a").case(case("x"))).unwrap();
        assert_eq!(
            r.add_suite(TestSuite::new("a")),
            Err(RegistryError::DuplicateSuite("a".into()))
        );
        assert_eq!(
            r.add_suite(TestSuite::new("b").case(case("x")).case(case("x"))),
            Err(RegistryError::DuplicateCase {
                suite: "b".into(),
                case: "x".into()
            })
        );
        assert_eq!(r.suites().len(), 1);
    }

    #[test]
    fn tolerance_only_after_baseline() {
        let mut r = Registry::new();
        assert!(matches!(
            r.add_suite(TestSuite::new("early").case(approx("h"))),
            Err(RegistryError::ToleranceBeforeBaseline { .. })
        ));
        assert!(matches!(
            r.add_suite(TestSuite::new("base").float_baseline().case(approx("h"))),
            Err(RegistryError::ToleranceBeforeBaseline { .. })
        ));
        r.add_suite(TestSuite::new("base").float_baseline().case(case("f")))
            .unwrap();
        r.add_suite(TestSuite::new("late").case(approx("h"))).unwrap();
    }

    #[test]
    fn fingerprint_tracks_order() {
        let build = |names: [&str; 2]| {
            let mut r = Registry::new();
            let mut s = TestSuite::new("s");
            for n in names {
                s.push(case(n));
            }
            r.add_suite(s).unwrap();
            r
        };
        assert_eq!(build(["a", "b"]).fingerprint(), build(["a", "b"]).fingerprint());
        assert_ne!(build(["a", "b"]).fingerprint(), build(["b", "a"]).fingerprint());
        assert_eq!(build(["a", "b"]).fingerprint().len(), 64);
    }

    #[test]
    fn standard_registry_is_valid_and_stable() {
        let config = RuntimeConfig::default();
        let a = Registry::standard(&config).unwrap();
        let b = Registry::standard(&config).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert!(a.case_count() > 150);
        let names: Vec<&str> = a.suites().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names.first(), Some(&"integer_arithmetic"));
        assert_eq!(names.last(), Some(&"local_handles"));
    }
}
