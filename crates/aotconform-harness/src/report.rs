//! Report generation for conformance results.

use aotconform_runtime::RuntimeConfig;
use serde::Serialize;

use crate::registry::Registry;
use crate::structured_log::now_utc;
use crate::tracker::{AssertionRecord, AssertionTracker, Summary};

/// A conformance report: the tracker's final state plus what is needed to
/// compare two runs.
#[derive(Debug, Clone, Serialize)]
pub struct ConformanceReport {
    /// Report title.
    pub title: String,
    /// Timestamp (UTC).
    pub timestamp: String,
    /// Registry fingerprint; equal fingerprints mean identical case order.
    pub fingerprint: String,
    /// Local-handle table capacity the run used.
    pub local_capacity: usize,
    /// Overflow policy of the local-handle table.
    pub overflow: String,
    pub summary: Summary,
    /// Every record, in execution order.
    pub records: Vec<AssertionRecord>,
}

impl ConformanceReport {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        registry: &Registry,
        runtime: &RuntimeConfig,
        tracker: &AssertionTracker,
    ) -> Self {
        Self {
            title: title.into(),
            timestamp: now_utc(),
            fingerprint: registry.fingerprint(),
            local_capacity: runtime.local_capacity,
            overflow: runtime.overflow.as_str().to_string(),
            summary: tracker.summary(),
            records: tracker.records().to_vec(),
        }
    }

    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Fingerprint: `{}`\n", self.fingerprint));
        out.push_str(&format!(
            "- Local handles: capacity {}, overflow {}\n",
            self.local_capacity, self.overflow
        ));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n", self.summary.failed));
        out.push_str(&format!("- Pass rate: {:.1}%\n\n", self.summary.pass_rate_pct()));

        if !self.summary.first_failures.is_empty() {
            out.push_str("## First failure per suite\n\n");
            for r in &self.summary.first_failures {
                out.push_str(&format!("- `{}`: {}\n", r.qualified_name(), first_line(&r.message)));
            }
            out.push('\n');
        }

        out.push_str("| Case | Status | Message |\n");
        out.push_str("|------|--------|---------|\n");
        for r in &self.records {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                r.qualified_name(),
                status,
                table_cell(&r.message)
            ));
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

/// Diff messages span lines and may contain pipes.
fn table_cell(message: &str) -> String {
    message.replace('|', "\\|").replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ConformanceReport {
        let mut tracker = AssertionTracker::new();
        tracker.record("arrays", "get_int_first", true, "ok");
        tracker.record("arrays", "get_int_last", false, "Exact mismatch: expected 30, got 3");
        tracker.record("fields", "string_field", false, "--- expected\n+++ actual\n|x|");
        ConformanceReport::new(
            "unit",
            &Registry::new(),
            &RuntimeConfig::default(),
            &tracker,
        )
    }

    #[test]
    fn markdown_lists_every_record() {
        let md = report().to_markdown();
        assert!(md.starts_with("# unit\n"));
        assert!(md.contains("- Failed: 2\n"));
        assert!(md.contains("| arrays.get_int_first | PASS | ok |"));
        assert!(md.contains("| arrays.get_int_last | FAIL |"));
        assert!(md.contains("--- expected<br>+++ actual<br>\\|x\\|"));
        assert!(md.contains("- `fields.string_field`: --- expected\n"));
    }

    #[test]
    fn json_carries_summary_and_records() {
        let value: serde_json::Value = serde_json::from_str(&report().to_json()).unwrap();
        assert_eq!(value["summary"]["total"], 3);
        assert_eq!(value["summary"]["first_failures"].as_array().unwrap().len(), 2);
        assert_eq!(value["records"][1]["case"], "get_int_last");
        assert_eq!(value["local_capacity"], 512);
        assert_eq!(value["overflow"], "fault");
    }
}
