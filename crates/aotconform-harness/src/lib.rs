//! Conformance harness for ahead-of-time compiled routines.
//!
//! This crate provides:
//! - Test cases and suites: one routine invocation, one oracle, one policy
//! - The registry: ordered, validated suites with a stable fingerprint
//! - The runner: drives a [`aotconform_abi::NativeBridge`] through every case
//! - The assertion tracker and report generation
//! - A structured JSONL log of each run

#![forbid(unsafe_code)]

pub mod case;
pub mod config;
pub mod diff;
pub mod error;
pub mod policy;
pub mod registry;
pub mod report;
pub mod runner;
pub mod structured_log;
mod suites;
pub mod tracker;
pub mod verify;

pub use case::{Invocation, Oracle, TestCase, TestSuite};
pub use config::HarnessConfig;
pub use error::{HarnessError, RegistryError};
pub use policy::Policy;
pub use registry::Registry;
pub use report::ConformanceReport;
pub use runner::TestRunner;
pub use tracker::{AssertionRecord, AssertionTracker, Summary};
pub use verify::{Verdict, verify};
