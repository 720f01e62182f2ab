//! Runtime errors and the unwind channel used by routines.
//!
//! Two very different things can stop a routine early:
//! - a managed fault ([`Thrown`]), which routines may catch and which the
//!   harness compares against expectations;
//! - a [`RuntimeError`], meaning the routine misused the runtime (stale
//!   handle, wrong field type). These are never catchable.

use aotconform_core::{FaultKind, FaultToken};
use thiserror::Error;

use crate::heap::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("stale local handle {index}/{generation}")]
    StaleLocal { index: u32, generation: u32 },
    #[error("unknown weak handle {0}")]
    UnknownWeak(u64),
    #[error("object {0} is not on the heap")]
    DanglingObject(u64),
    #[error("unknown class {0}")]
    UnknownClass(String),
    #[error("class {class} has no field {field}")]
    UnknownField { class: String, field: String },
    #[error("field {field} has type {expected}, got {found}")]
    FieldType {
        field: String,
        expected: String,
        found: String,
    },
    #[error("expected {expected}, found {found}")]
    UnexpectedObject { expected: &'static str, found: String },
    #[error("array element type {expected}, got {found}")]
    ElementType { expected: String, found: String },
}

/// A managed fault in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thrown {
    /// The throwable object on the heap.
    pub object: ObjectId,
    pub kind: FaultKind,
    pub token: FaultToken,
    pub message: String,
}

/// Why a runtime operation did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unwind {
    #[error("thrown {}: {}", .0.kind, .0.message)]
    Throw(Thrown),
    #[error(transparent)]
    Error(#[from] RuntimeError),
}

impl From<Thrown> for Unwind {
    fn from(t: Thrown) -> Self {
        Self::Throw(t)
    }
}

impl Unwind {
    /// The fault, if this is a managed throw.
    #[must_use]
    pub fn thrown(&self) -> Option<&Thrown> {
        match self {
            Self::Throw(t) => Some(t),
            Self::Error(_) => None,
        }
    }
}

pub type EnvResult<T> = Result<T, Unwind>;
