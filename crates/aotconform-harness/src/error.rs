//! Harness error types.

use thiserror::Error;

/// A registry that cannot be run as declared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("suite {0} is registered twice")]
    DuplicateSuite(String),
    #[error("suite {suite} declares case {case} twice")]
    DuplicateCase { suite: String, case: String },
    #[error("{suite}.{case} uses a tolerance policy before the floating-point baseline suite")]
    ToleranceBeforeBaseline { suite: String, case: String },
}

/// Top-level error of the `harness` binary.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("registry: {0}")]
    Registry(#[from] RegistryError),
}
