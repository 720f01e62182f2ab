//! CLI entrypoint for the aotconform conformance harness.

use std::path::PathBuf;
use std::process::ExitCode;

use aotconform_abi::{NativeBridge, ReferenceBridge};
use aotconform_harness::structured_log::{ArtifactIndex, LogEmitter};
use aotconform_harness::{ConformanceReport, HarnessConfig, HarnessError, Registry, TestRunner};
use aotconform_runtime::config::DEFAULT_LOCAL_CAPACITY;
use aotconform_runtime::{OverflowPolicy, RuntimeConfig};
use clap::Parser;

/// Run every registered conformance suite against the reference routines.
#[derive(Debug, Parser)]
#[command(name = "harness")]
#[command(about = "Conformance harness for ahead-of-time compiled routines")]
struct Cli {
    /// Output report path (markdown); a JSON sibling is written next to it.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Structured JSONL log path.
    #[arg(long)]
    log: Option<PathBuf>,
    /// Print the ordered registry with routine signatures, then exit.
    #[arg(long)]
    list: bool,
    /// Local-handle table capacity.
    #[arg(long, default_value_t = DEFAULT_LOCAL_CAPACITY, value_parser = parse_capacity)]
    local_capacity: usize,
    /// What a full local-handle table does (`fault` or `grow`).
    #[arg(long, default_value = "fault", value_parser = parse_overflow)]
    overflow: OverflowPolicy,
}

fn parse_capacity(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("capacity must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_overflow(s: &str) -> Result<OverflowPolicy, String> {
    OverflowPolicy::from_str_loose(s)
        .ok_or_else(|| format!("unknown overflow policy {s:?} (expected fault or grow)"))
}

impl Cli {
    fn into_config(self) -> HarnessConfig {
        let runtime = RuntimeConfig::default()
            .with_local_capacity(self.local_capacity)
            .with_overflow(self.overflow);
        let mut config = HarnessConfig::new().with_runtime(runtime);
        if let Some(report) = self.report {
            config = config.with_report(report);
        }
        if let Some(log) = self.log {
            config = config.with_log(log);
        }
        if self.list {
            config = config.listing();
        }
        config
    }
}

/// Exit 1 is reserved for failing records, so anything that stops the run
/// itself exits 2.
fn main() -> ExitCode {
    let config = Cli::parse().into_config();
    match run(&config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("harness: {err}");
            ExitCode::from(2)
        }
    }
}

fn run(config: &HarnessConfig) -> Result<ExitCode, HarnessError> {
    let registry = Registry::standard(&config.runtime)?;
    let bridge = ReferenceBridge::new(config.runtime);

    if config.list {
        for suite in registry.suites() {
            for case in &suite.cases {
                let routine = case.routine();
                println!(
                    "{}.{}\t{routine}\t{}",
                    suite.name,
                    case.name,
                    bridge.signature(routine).unwrap_or("unavailable")
                );
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let run_id = format!("run-{}", std::process::id());
    eprintln!(
        "Running {} cases in {} suites (fingerprint {})",
        registry.case_count(),
        registry.suites().len(),
        registry.fingerprint()
    );

    let runner = TestRunner::new(&bridge);
    let tracker = match &config.log {
        Some(path) => {
            let mut log = LogEmitter::to_file(path, &run_id)?;
            runner.run_logged(&registry, &mut log)?
        }
        None => runner.run(&registry),
    };

    for record in tracker.failures() {
        println!("{}: {}", record.qualified_name(), record.message.replace('\n', " "));
    }
    let summary = tracker.summary();
    println!("{}/{}", summary.passed, summary.total);

    let mut index = ArtifactIndex::new(&run_id);
    if let (Some(md_path), Some(json_path)) = (&config.report, config.json_report()) {
        let report = ConformanceReport::new(
            "aotconform conformance report",
            &registry,
            &config.runtime,
            &tracker,
        );
        std::fs::write(md_path, report.to_markdown())?;
        std::fs::write(&json_path, report.to_json())?;
        index.add_file(md_path, "report_markdown")?;
        index.add_file(&json_path, "report_json")?;
        eprintln!("Report written to {}", md_path.display());
    }
    if let Some(log_path) = &config.log {
        index.add_file(log_path, "log_jsonl")?;
    }
    if let Some(index_path) = config.artifact_index() {
        std::fs::write(&index_path, index.to_json()?)?;
    }

    Ok(if summary.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
