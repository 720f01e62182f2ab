//! Harness configuration, built from command-line flags.

use std::path::PathBuf;

use aotconform_runtime::RuntimeConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Markdown report path; a `.json` sibling is written next to it.
    pub report: Option<PathBuf>,
    /// Structured JSONL log path.
    pub log: Option<PathBuf>,
    /// Print the ordered registry and exit without running anything.
    pub list: bool,
    pub runtime: RuntimeConfig,
}

impl HarnessConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.report = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.log = Some(path.into());
        self
    }

    #[must_use]
    pub fn listing(mut self) -> Self {
        self.list = true;
        self
    }

    #[must_use]
    pub fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    /// Where the JSON form of the report goes.
    #[must_use]
    pub fn json_report(&self) -> Option<PathBuf> {
        self.report.as_ref().map(|p| p.with_extension("json"))
    }

    /// Where the artifact index goes: beside the report, or beside the log
    /// when there is no report.
    #[must_use]
    pub fn artifact_index(&self) -> Option<PathBuf> {
        self.report
            .as_ref()
            .or(self.log.as_ref())
            .map(|p| p.with_extension("artifacts.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths() {
        let config = HarnessConfig::new().with_report("out/report.md");
        assert_eq!(config.json_report(), Some(PathBuf::from("out/report.json")));
        assert_eq!(
            config.artifact_index(),
            Some(PathBuf::from("out/report.artifacts.json"))
        );

        let logged = HarnessConfig::new().with_log("run.jsonl");
        assert_eq!(logged.json_report(), None);
        assert_eq!(
            logged.artifact_index(),
            Some(PathBuf::from("run.artifacts.json"))
        );
        assert_eq!(HarnessConfig::new().artifact_index(), None);
    }
}
